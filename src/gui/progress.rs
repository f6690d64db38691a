// src/gui/progress.rs
use std::{path::Path, sync::{Arc, Mutex}};

use eframe::egui;

use crate::progress::Progress;

/// Worker-side progress sink: writes a status line the UI thread reads, and
/// pokes the UI so it repaints.
pub struct GuiProgress {
    status: Arc<Mutex<String>>,
    ctx: egui::Context,
    done: usize,
    found: usize,
    total: usize,
}

impl GuiProgress {
    pub fn new(status: Arc<Mutex<String>>, ctx: egui::Context) -> Self {
        Self { status, ctx, done: 0, found: 0, total: 0 }
    }

    fn set_status(&self, msg: impl Into<String>) {
        if let Ok(mut s) = self.status.lock() {
            *s = msg.into();
        }
        self.ctx.request_repaint();
    }
}

impl Progress for GuiProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.set_status(format!("Resolving {} row(s)…", total));
    }
    fn log(&mut self, msg: &str) {
        self.set_status(s!(msg));
    }
    fn item_done(&mut self, _index: usize, name: &str) {
        self.done += 1;
        self.found += 1;
        self.set_status(format!("{}/{} ({} found) · {}", self.done, self.total, self.found, name));
    }
    fn item_failed(&mut self, _index: usize, name: &str) {
        self.done += 1;
        self.set_status(format!("{}/{} ({} found) · not found: {}", self.done, self.total, self.found, name));
    }
    fn checkpoint(&mut self, path: &Path, rows: usize) {
        logd!("GUI: checkpoint {} rows → {}", rows, path.display());
    }
    fn finish(&mut self) {
        if self.total == 0 {
            self.set_status(s!("Nothing to resolve"));
        } else {
            self.set_status(format!("Resolve finished ({}/{}, {} found)", self.done, self.total, self.found));
        }
    }
}
