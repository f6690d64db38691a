// src/gui/components/data_table.rs
//
// Searchable table of the filtered rows. Purely a view; the search box and
// Copy button write back into App.

use eframe::egui::{self, Align, Layout, RichText, TextWrapMode};
use egui_extras::{Column, TableBuilder};

use crate::{config::consts::HEADERS, gui::{actions, app::App}};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let ctx = ui.ctx().clone();

    ui.horizontal(|ui| {
        ui.label("Search:");
        let resp = ui.text_edit_singleline(&mut app.state.gui.search);
        if resp.changed() {
            app.rebuild_view();
        }
        if ui.button("Clear").clicked() && !app.state.gui.search.is_empty() {
            app.state.gui.search.clear();
            app.rebuild_view();
        }
        ui.label(format!("{} row(s)", app.table_ix.len()));
        if ui.button("Copy").clicked() {
            actions::copy(app, &ctx);
        }
    });

    let Some(ds) = app.dataset.as_ref() else { return };
    let rows = &app.table_ix;

    // "#" plus the six stored columns
    let widths = [40.0, 50.0, 320.0, 140.0, 60.0, 80.0, 80.0];
    let numeric = [true, true, false, false, true, true, true];

    let avail_h = ui.available_height();
    let mut table = TableBuilder::new(ui)
        .striped(true)
        .min_scrolled_height(0.0)
        .max_scroll_height(avail_h);
    for w in widths {
        table = table.column(Column::initial(w).resizable(true).clip(true).at_least(20.0));
    }

    table
        .header(22.0, |mut header| {
            let labels = std::iter::once("#").chain(HEADERS.iter().copied());
            for (ci, label) in labels.enumerate() {
                header.col(|ui| {
                    let rt = RichText::new(label).strong();
                    if numeric[ci] {
                        ui.centered_and_justified(|ui| { ui.label(rt); });
                    } else {
                        ui.label(rt);
                    }
                });
            }
        })
        .body(|body| {
            body.rows(20.0, rows.len(), |mut row| {
                let n = row.index();
                let Some(e) = rows.get(n).and_then(|&ix| ds.entities().get(ix)) else { return };

                let (lat, lon) = match e.coordinates() {
                    Some(c) => (format!("{:.4}", c.lat), format!("{:.4}", c.lon)),
                    None => (s!(), s!()),
                };
                let score = e.score().to_string();
                let rank = e.rank().to_string();
                // 1-based display position, not the ranking
                let pos = (n + 1).to_string();
                let cells = [pos.as_str(), rank.as_str(), e.name(), e.country(), score.as_str(), lat.as_str(), lon.as_str()];

                for (ci, cell) in cells.iter().enumerate() {
                    row.col(|ui| {
                        ui.style_mut().wrap_mode = Some(TextWrapMode::Truncate);
                        if numeric[ci] {
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| { ui.label(*cell); });
                        } else {
                            ui.with_layout(Layout::left_to_right(Align::Center), |ui| { ui.label(*cell); });
                        }
                    });
                }
            });
        });
}
