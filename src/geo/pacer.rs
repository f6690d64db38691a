// src/geo/pacer.rs
//
// Global request pacing. Every outbound lookup in a pass goes through one
// `RateLimitedClient`, which guarantees at least `min_delay` between the
// starts of consecutive calls. Time comes from a `Clock` so tests can run
// the real pacing logic without sleeping.

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use super::lookup::Geocoder;
use crate::{config::options::PacingOptions, entity::Coordinates, error::LookupError};

pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, d: Duration);
}

/// Wall clock; `sleep` blocks the thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant { Instant::now() }
    fn sleep(&self, d: Duration) { std::thread::sleep(d) }
}

/// Deterministic clock: time only moves on `sleep` or `advance`.
/// Clones share the same timeline.
#[derive(Clone, Debug)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Arc<Mutex<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self { Self::new() }
}

impl ManualClock {
    pub fn new() -> Self {
        Self { origin: Instant::now(), elapsed: Arc::new(Mutex::new(Duration::ZERO)) }
    }

    pub fn advance(&self, d: Duration) {
        if let Ok(mut e) = self.elapsed.lock() { *e += d; }
    }

    /// Time since the clock was created.
    pub fn elapsed(&self) -> Duration {
        self.elapsed.lock().map(|e| *e).unwrap_or_default()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant { self.origin + self.elapsed() }
    fn sleep(&self, d: Duration) { self.advance(d) }
}

pub struct RateLimitedClient<G, C = SystemClock> {
    inner: G,
    clock: C,
    min_delay: Duration,
    timeout: Duration,
    last_call: Option<Instant>,
    calls: usize,
    waited: Duration,
}

impl<G: Geocoder> RateLimitedClient<G, SystemClock> {
    pub fn new(inner: G, min_delay: Duration, timeout: Duration) -> Self {
        Self::with_clock(inner, SystemClock, min_delay, timeout)
    }

    pub fn from_options(inner: G, pacing: &PacingOptions) -> Self {
        Self::new(inner, pacing.min_delay, pacing.timeout)
    }
}

impl<G: Geocoder, C: Clock> RateLimitedClient<G, C> {
    pub fn with_clock(inner: G, clock: C, min_delay: Duration, timeout: Duration) -> Self {
        Self {
            inner,
            clock,
            min_delay,
            timeout,
            last_call: None,
            calls: 0,
            waited: Duration::ZERO,
        }
    }

    /// Wait out the remainder of `min_delay` since the previous call, then
    /// forward to the wrapped geocoder with the configured timeout.
    pub fn lookup(&mut self, query: &str) -> Result<Option<Coordinates>, LookupError> {
        if let Some(last) = self.last_call {
            let since = self.clock.now().saturating_duration_since(last);
            if since < self.min_delay {
                let wait = self.min_delay - since;
                self.clock.sleep(wait);
                self.waited += wait;
            }
        }

        self.last_call = Some(self.clock.now());
        self.calls += 1;
        logd!("Lookup #{}: {query}", self.calls);
        self.inner.lookup(query, self.timeout)
    }

    /// Outbound calls made so far.
    pub fn calls(&self) -> usize { self.calls }

    /// Total time spent waiting for the pacing window.
    pub fn total_wait(&self) -> Duration { self.waited }

    pub fn inner(&self) -> &G { &self.inner }
}
