// src/gui/actions/copy.rs
use eframe::egui;

use crate::{csv::to_export_string, gui::app::App};

/// Table rows currently shown (filter + search) → clipboard, tab separated.
pub fn copy(app: &mut App, ui_ctx: &egui::Context) {
    if app.table_ix.is_empty() {
        app.status("Nothing to copy");
        logd!("Copy: Clicked, but there's nothing to copy");
        return;
    }
    let Some(ds) = app.dataset.as_ref() else {
        app.status("Nothing to copy (no data loaded)");
        return;
    };

    let rows = app.table_ix.iter().filter_map(|&ix| ds.entities().get(ix));
    let txt = to_export_string(rows, b'\t');
    logf!("Copy: rows={}", app.table_ix.len());

    ui_ctx.copy_text(txt);
    app.status(format!("Copied {} row(s) to clipboard", app.table_ix.len()));
}
