// src/gui/components/filter_panel.rs
//
// Left side panel: filters, headline metrics, resolve controls, status.

use eframe::egui::{self, RichText, widgets::Spinner};

use crate::{data::Origin, gui::{actions, app::App}};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.heading("Filters");
    ui.add_space(4.0);

    let mut changed = false;

    if let Some(ds) = app.dataset.as_ref() {
        // Country
        let filter = &mut app.state.gui.filter;
        let selected = filter.country.clone().unwrap_or_else(|| s!("All countries"));
        egui::ComboBox::from_label("Country")
            .selected_text(selected)
            .width(180.0)
            .show_ui(ui, |ui| {
                changed |= ui.selectable_value(&mut filter.country, None, "All countries").changed();
                for c in ds.countries() {
                    changed |= ui.selectable_value(&mut filter.country, Some(s!(c)), c).changed();
                }
            });

        // Score range
        if let Some((lo, hi)) = ds.score_bounds() {
            let (mut min, mut max) = filter.score.unwrap_or((lo, hi));
            ui.label("Score range");
            changed |= ui.add(egui::Slider::new(&mut min, lo..=hi).text("min")).changed();
            changed |= ui.add(egui::Slider::new(&mut max, lo..=hi).text("max")).changed();
            if min > max {
                std::mem::swap(&mut min, &mut max);
            }
            filter.score = Some((min, max));
        }

        if ui.button("Reset filters").clicked() {
            filter.country = None;
            filter.score = ds.score_bounds();
            changed = true;
        }
    } else {
        ui.label("No data loaded");
    }

    if changed {
        logd!("UI: filter → {:?}", app.state.gui.filter);
        app.rebuild_view();
    }

    ui.separator();
    ui.heading("Overview");
    if let Some(view) = app.view() {
        let s = view.summary();
        ui.label(format!("Universities: {}", s.count));
        match s.mean_score {
            Some(m) => ui.label(format!("Mean score: {:.2}", m)),
            None => ui.label("Mean score: -"),
        };
        ui.label(format!("Countries: {}", view.top_countries(usize::MAX).len()));
        ui.label(format!("On map: {}", view.map_points().len()));
    }
    if let Some(ds) = app.dataset.as_ref() {
        if ds.origin() == Origin::Approximate {
            ui.label(RichText::new("Map positions are approximate").italics().weak());
        }
    }

    ui.separator();
    ui.heading("Coordinates");
    ui.horizontal(|ui| {
        let running = app.running();
        if ui.add_enabled(!running, egui::Button::new("Resolve")).clicked() {
            actions::start_resolve(app, ui.ctx());
        }
        if ui.add_enabled(running, egui::Button::new("Stop")).clicked() {
            actions::stop_resolve(app);
        }
        if running {
            ui.add(Spinner::new());
        }
    });
    ui.add_enabled_ui(!app.running(), |ui| {
        ui.checkbox(&mut app.state.resolve.resume, "Resume from previous output");
    });

    ui.separator();
    ui.label(RichText::new(app.status_text()).small());
}
