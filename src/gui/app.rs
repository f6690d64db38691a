// src/gui/app.rs
use std::{
    error::Error,
    sync::{Arc, Mutex},
};

use eframe::egui;

use crate::{
    config::state::AppState,
    data::{Dataset, Origin, View},
};

use super::actions::{self, ResolveJob};

pub fn run(options: eframe::NativeOptions) -> Result<(), Box<dyn Error>> {
    eframe::run_native(
        "University Atlas",
        options,
        Box::new(|_cc| Ok(Box::new(App::new(AppState::default())))),
    )?;
    Ok(())
}

pub struct App {
    // single source of truth (UI thread only)
    pub state: AppState,

    // what's on screen
    pub dataset: Option<Dataset>,
    pub load_error: Option<String>,

    // cached views: filter → row_ix, filter + search → table_ix
    pub row_ix: Vec<usize>,
    pub table_ix: Vec<usize>,

    // status/progress (worker writes here)
    pub status: Arc<Mutex<String>>,
    pub job: Option<ResolveJob>,
}

impl App {
    pub fn new(state: AppState) -> Self {
        let mut app = Self {
            state,
            dataset: None,
            load_error: None,
            row_ix: Vec::new(),
            table_ix: Vec::new(),
            status: Arc::new(Mutex::new(s!("Idle"))),
            job: None,
        };
        app.reload();
        app
    }

    #[inline]
    pub fn status<T: Into<String>>(&self, msg: T) {
        if let Ok(mut s) = self.status.lock() {
            *s = msg.into();
        }
    }

    pub fn status_text(&self) -> String {
        self.status.lock().map(|s| s.clone()).unwrap_or_default()
    }

    #[inline]
    pub fn running(&self) -> bool { self.job.is_some() }

    /// Current filtered view, if a dataset is loaded.
    pub fn view(&self) -> Option<View<'_>> {
        self.dataset.as_ref().map(|ds| View::from_indices(ds, self.row_ix.clone()))
    }

    /// (Re)load from disk and reset the filter to the data's full span.
    pub fn reload(&mut self) {
        match Dataset::load(&self.state.dashboard, &mut rand::thread_rng()) {
            Ok(ds) => {
                logf!("Init: {} rows from {} ({:?})", ds.len(), ds.path().display(), ds.origin());
                let msg = match ds.origin() {
                    Origin::Enriched => format!("Loaded {}", ds.path().display()),
                    Origin::Approximate => format!(
                        "Loaded {} (no coordinates yet; map positions are approximate)",
                        ds.path().display()
                    ),
                };
                self.state.gui.filter.country = None;
                self.state.gui.filter.score = ds.score_bounds();
                self.dataset = Some(ds);
                self.load_error = None;
                self.status(msg);
            }
            Err(e) => {
                loge!("Init: {e}");
                self.dataset = None;
                self.load_error = Some(e.to_string());
                self.status("No data");
            }
        }
        self.rebuild_view();
    }

    /// Recompute cached indexes after a filter or search change.
    pub fn rebuild_view(&mut self) {
        let Some(ds) = self.dataset.as_ref() else {
            self.row_ix.clear();
            self.table_ix.clear();
            return;
        };
        let view = ds.view(&self.state.gui.filter);
        self.table_ix = view.search(&self.state.gui.search);
        self.row_ix = view.row_ix;
        logd!("View: rows={} table={}", self.row_ix.len(), self.table_ix.len());
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        actions::poll_resolve(self);

        egui::SidePanel::left("filters")
            .resizable(false)
            .min_width(240.0)
            .show(ctx, |ui| {
                super::components::filter_panel::draw(ui, self);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(view) = self.view() else {
                ui.heading("No data");
                if let Some(err) = &self.load_error {
                    ui.label(err);
                }
                return;
            };

            ui.columns(2, |cols| {
                super::components::charts::top_countries(&mut cols[0], &view, self.state.dashboard.top_countries);
                super::components::charts::histogram(&mut cols[1], &view, self.state.dashboard.histogram_bins);
            });
            ui.separator();
            super::components::world_map::draw(ui, &view);
            ui.separator();
            drop(view);
            super::components::data_table::draw(ui, self);
        });

        if self.running() {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }
    }
}
