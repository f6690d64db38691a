// src/geo/driver.rs
//
// Resolution Driver: one sequential pass over the working set.
//
//  - rows that already have coordinates are skipped (this is what makes a
//    rerun resume instead of starting over);
//  - every other row gets one two-stage attempt; misses and transport errors
//    leave it unresolved and the pass moves on;
//  - every `checkpoint_every` attempts the whole working set (unresolved rows
//    included) replaces the output file;
//  - at the end only resolved rows are written, replacing the last checkpoint.
//
// Only a failed initial load or a failed final write is returned as an error.

use std::{
    path::Path,
    sync::{Arc, atomic::{AtomicBool, Ordering}},
};

use super::{
    lookup::Geocoder,
    pacer::Clock,
    resolver::{Attempt, Resolver},
};
use crate::{
    config::options::ResolveOptions,
    entity::Entity,
    error::{ResolveError, StoreError},
    progress::{NullProgress, Progress},
    store,
};

/// Shared stop flag. The pass checks it between entities.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self { Self::default() }
    pub fn cancel(&self) { self.0.store(true, Ordering::Relaxed) }
    pub fn is_cancelled(&self) -> bool { self.0.load(Ordering::Relaxed) }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Rows in the working set.
    pub total: usize,
    /// Rows that already had coordinates when the pass started.
    pub already_resolved: usize,
    /// Of those, how many came from a previous output file.
    pub carried_over: usize,
    /// Rows that got a lookup attempt this pass.
    pub attempted: usize,
    pub resolved: usize,
    /// Both stages said "not found".
    pub missed: usize,
    /// Transport / timeout / bad response.
    pub failed: usize,
    pub timeouts: usize,
    /// Outbound calls (one or two per attempt).
    pub lookups: usize,
    pub checkpoints: usize,
    pub checkpoint_failures: usize,
    /// Rows in the final output. Zero if interrupted.
    pub written: usize,
    pub interrupted: bool,
}

impl PassSummary {
    pub fn unresolved(&self) -> usize {
        self.total - self.already_resolved - self.resolved
    }
}

/// Source rows, plus coordinates carried over from a previous output when
/// `resume` is on. Returns the working set and how many rows were carried.
pub fn load_working_set(opts: &ResolveOptions) -> Result<(Vec<Entity>, usize), ResolveError> {
    let mut rows = store::load(&opts.input).map_err(ResolveError::Load)?;

    if !opts.resume || opts.output == opts.input {
        return Ok((rows, 0));
    }

    let carried = match store::load(&opts.output) {
        Ok(prior) => {
            let n = store::carry_over(&mut rows, &prior);
            logf!("Resume: carried {} coordinate pair(s) from {}", n, opts.output.display());
            n
        }
        Err(StoreError::SourceNotFound(_)) => 0,
        Err(e) => {
            logw!("Resume: ignoring unreadable prior output: {e}");
            0
        }
    };
    Ok((rows, carried))
}

/// Load, resolve, and write. See module docs.
pub fn run<G: Geocoder, C: Clock>(
    opts: &ResolveOptions,
    resolver: &mut Resolver<G, C>,
    progress: Option<&mut dyn Progress>,
    cancel: Option<&CancelToken>,
) -> Result<(Vec<Entity>, PassSummary), ResolveError> {
    opts.validate().map_err(ResolveError::Options)?;

    let (mut rows, carried) = load_working_set(opts)?;
    logf!("Pass: {} rows from {}", rows.len(), opts.input.display());

    let mut summary = run_pass(&mut rows, resolver, &opts.output, opts.checkpoint_every, progress, cancel)?;
    summary.carried_over = carried;
    Ok((rows, summary))
}

fn checkpoint(rows: &[Entity], output: &Path, summary: &mut PassSummary, progress: &mut dyn Progress) {
    match store::save(rows, output) {
        Ok(()) => {
            summary.checkpoints += 1;
            logf!(
                "Checkpoint: {} rows ({} attempted) → {}",
                rows.len(),
                summary.attempted,
                output.display()
            );
            progress.checkpoint(output, rows.len());
        }
        Err(e) => {
            // Previous checkpoint is still intact (atomic rename); keep going.
            summary.checkpoint_failures += 1;
            loge!("Checkpoint: write failed: {e}");
            progress.log(&format!("checkpoint failed, continuing: {e}"));
        }
    }
}

/// Resolve an in-memory working set and persist it to `output`.
pub fn run_pass<G: Geocoder, C: Clock>(
    rows: &mut [Entity],
    resolver: &mut Resolver<G, C>,
    output: &Path,
    checkpoint_every: usize,
    progress: Option<&mut dyn Progress>,
    cancel: Option<&CancelToken>,
) -> Result<PassSummary, ResolveError> {
    let mut null = NullProgress;
    let progress: &mut dyn Progress = match progress {
        Some(p) => p,
        None => &mut null,
    };
    let every = checkpoint_every.max(1);
    let calls_before = resolver.client().calls();

    let mut summary = PassSummary {
        total: rows.len(),
        already_resolved: rows.iter().filter(|e| e.is_resolved()).count(),
        ..PassSummary::default()
    };

    progress.begin(summary.total - summary.already_resolved);

    for i in 0..rows.len() {
        if rows[i].is_resolved() {
            continue;
        }
        if cancel.is_some_and(CancelToken::is_cancelled) {
            summary.interrupted = true;
            break;
        }

        let attempt = resolver.resolve(&rows[i]);
        summary.attempted += 1;

        let entity = &mut rows[i];
        match attempt {
            Attempt::Found { coords, stage } => {
                entity.mark_resolved(coords);
                summary.resolved += 1;
                logd!("Resolved #{} '{}' {} via {:?}", entity.rank(), entity.name(), coords, stage);
                progress.item_done(i, entity.name());
            }
            Attempt::Miss => {
                summary.missed += 1;
                logd!("Miss #{} '{}'", entity.rank(), entity.name());
                progress.item_failed(i, entity.name());
            }
            Attempt::Failed { stage, error } => {
                summary.failed += 1;
                if error.is_timeout() {
                    summary.timeouts += 1;
                }
                logw!("Lookup failed #{} '{}' at {:?}: {}", entity.rank(), entity.name(), stage, error);
                progress.item_failed(i, entity.name());
            }
        }

        if summary.attempted % every == 0 {
            checkpoint(rows, output, &mut summary, progress);
        }
    }

    summary.lookups = resolver.client().calls() - calls_before;

    if summary.interrupted {
        logf!("Pass: interrupted after {} attempt(s)", summary.attempted);
        progress.log(&format!("interrupted after {} attempt(s)", summary.attempted));
        checkpoint(rows, output, &mut summary, progress);
        progress.finish();
        return Ok(summary);
    }

    let written = store::save_resolved(rows, output).map_err(|source| ResolveError::FinalWrite {
        path: output.to_path_buf(),
        source,
    });
    progress.finish();
    summary.written = written?;

    logf!(
        "Pass: done total={} resolved_now={} missed={} failed={} (timeouts={}) lookups={} written={} → {}",
        summary.total,
        summary.resolved,
        summary.missed,
        summary.failed,
        summary.timeouts,
        summary.lookups,
        summary.written,
        output.display()
    );
    Ok(summary)
}
