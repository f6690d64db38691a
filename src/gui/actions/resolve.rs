// src/gui/actions/resolve.rs
//
// Resolution runs on its own thread. The UI thread keeps drawing the last
// loaded dataset, watches the status line, and reloads from disk once the
// worker reports back.

use std::{
    sync::mpsc::{self, Receiver, TryRecvError},
    thread,
};

use eframe::egui;

use crate::{
    geo::{self, CancelToken, PassSummary},
    gui::{app::App, progress::GuiProgress},
};

pub struct ResolveJob {
    cancel: CancelToken,
    rx: Receiver<Result<PassSummary, String>>,
}

pub fn start_resolve(app: &mut App, ctx: &egui::Context) {
    if app.running() {
        return;
    }
    let opts = app.state.resolve.clone();
    if let Err(e) = opts.validate() {
        app.status(format!("Resolve: {e}"));
        return;
    }

    let cancel = CancelToken::new();
    let (tx, rx) = mpsc::channel();
    let mut prog = GuiProgress::new(app.status.clone(), ctx.clone());
    let worker_cancel = cancel.clone();
    let ctx2 = ctx.clone();

    logf!("Resolve: Begin {} → {}", opts.input.display(), opts.output.display());
    app.status("Resolving…");

    thread::spawn(move || {
        let res = geo::resolve_with_nominatim(&opts, Some(&mut prog), Some(&worker_cancel))
            .map(|(_, summary)| summary)
            .map_err(|e| e.to_string());
        // Receiver gone means the window closed; nothing left to tell.
        let _ = tx.send(res);
        ctx2.request_repaint();
    });

    app.job = Some(ResolveJob { cancel, rx });
}

pub fn stop_resolve(app: &mut App) {
    if let Some(job) = &app.job {
        job.cancel.cancel();
        app.status("Stopping after the current lookup…");
        logf!("Resolve: Stop requested");
    }
}

/// Called every frame. Picks up the worker's result once.
pub fn poll_resolve(app: &mut App) {
    let Some(job) = &app.job else { return };

    let outcome = match job.rx.try_recv() {
        Ok(res) => res,
        Err(TryRecvError::Empty) => return,
        Err(TryRecvError::Disconnected) => Err(s!("resolver thread exited without a result")),
    };
    app.job = None;

    match outcome {
        Ok(sum) => {
            logf!(
                "Resolve: OK resolved={} missed={} failed={} interrupted={}",
                sum.resolved, sum.missed, sum.failed, sum.interrupted
            );
            app.reload();
            let verb = if sum.interrupted { "Stopped" } else { "Done" };
            app.status(format!(
                "{verb}: {} new, {} not found, {} failed, {} still unresolved",
                sum.resolved,
                sum.missed,
                sum.failed,
                sum.unresolved()
            ));
        }
        Err(e) => {
            loge!("Resolve: Error: {e}");
            app.status(format!("Resolve error: {e}"));
        }
    }
}
