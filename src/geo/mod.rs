// src/geo/mod.rs
//! # Location resolution
//!
//! Turns `(name, country)` pairs from the ranking table into coordinates.
//!
//! ## Pieces, leaves first
//! - `lookup` – the `Geocoder` seam (free text → optional coordinates).
//! - `nominatim` – the real geocoder, blocking HTTPS against OSM Nominatim.
//! - `pacer` – `RateLimitedClient`: one global minimum gap between outbound
//!   calls, plus a per-call timeout. Time is injected through `Clock`.
//! - `resolver` – two-stage lookup per entity (`"name, country"` then `"name"`).
//! - `driver` – the pass: skip resolved rows, attempt the rest, checkpoint the
//!   whole working set every N attempts, finish with resolved rows only.
//! - `jitter` – display-only fallback (country centroid + noise) for when no
//!   resolved output exists.
//!
//! ## Call chain
//! ```text
//! CLI / GUI → driver::run → resolver::resolve → pacer::lookup → Nominatim
//!                 ↘ store::save (checkpoints) / store::save_resolved (final)
//! ```
//!
//! Everything is sequential. One pass owns its working set; nothing else
//! touches it until the pass returns.

pub mod driver;
pub mod jitter;
pub mod lookup;
pub mod nominatim;
pub mod pacer;
pub mod resolver;

pub use driver::{CancelToken, PassSummary};
pub use lookup::Geocoder;
pub use pacer::{Clock, ManualClock, RateLimitedClient, SystemClock};
pub use resolver::{Attempt, Resolver, Stage};

use crate::{
    config::options::ResolveOptions,
    entity::Entity,
    error::ResolveError,
    progress::Progress,
};

/// A full pass against Nominatim on the wall clock.
pub fn resolve_with_nominatim(
    opts: &ResolveOptions,
    progress: Option<&mut dyn Progress>,
    cancel: Option<&CancelToken>,
) -> Result<(Vec<Entity>, PassSummary), ResolveError> {
    let geocoder = nominatim::Nominatim::new(&opts.pacing)
        .map_err(|e| ResolveError::Options(e.to_string()))?;
    let client = RateLimitedClient::from_options(geocoder, &opts.pacing);
    let mut resolver = Resolver::new(client);
    driver::run(opts, &mut resolver, progress, cancel)
}
