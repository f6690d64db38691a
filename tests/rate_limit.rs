// tests/rate_limit.rs
//
// Pacing on a manual clock: the geocoder records when each call starts, so
// spacing can be checked exactly without sleeping.

use std::time::Duration;

use univ_atlas::entity::{Coordinates, Entity};
use univ_atlas::error::LookupError;
use univ_atlas::geo::{driver, Geocoder, ManualClock, RateLimitedClient, Resolver};

struct Recorder {
    clock: ManualClock,
    /// Clock time at each call
    starts: Vec<Duration>,
    timeouts: Vec<Duration>,
    /// Simulated time each call takes
    cost: Duration,
}

impl Recorder {
    fn new(clock: &ManualClock, cost: Duration) -> Self {
        Self { clock: clock.clone(), starts: Vec::new(), timeouts: Vec::new(), cost }
    }
}

impl Geocoder for Recorder {
    fn lookup(&mut self, _query: &str, timeout: Duration) -> Result<Option<Coordinates>, LookupError> {
        self.starts.push(self.clock.elapsed());
        self.timeouts.push(timeout);
        self.clock.advance(self.cost);
        Ok(None)
    }
}

fn gaps(starts: &[Duration]) -> Vec<Duration> {
    starts.windows(2).map(|w| w[1] - w[0]).collect()
}

#[test]
fn first_call_does_not_wait() {
    let clock = ManualClock::new();
    let mut client = RateLimitedClient::with_clock(
        Recorder::new(&clock, Duration::ZERO),
        clock.clone(),
        Duration::from_millis(1200),
        Duration::from_secs(10),
    );
    client.lookup("a").unwrap();
    assert_eq!(client.inner().starts, vec![Duration::ZERO]);
    assert_eq!(client.total_wait(), Duration::ZERO);
}

#[test]
fn back_to_back_calls_are_spaced_by_min_delay() {
    let clock = ManualClock::new();
    let min = Duration::from_millis(1200);
    let mut client = RateLimitedClient::with_clock(Recorder::new(&clock, Duration::from_millis(200)), clock.clone(), min, Duration::from_secs(10));

    for q in ["a", "b", "c", "d"] {
        client.lookup(q).unwrap();
    }
    let starts = &client.inner().starts;
    assert_eq!(starts.len(), 4);
    for g in gaps(starts) {
        assert_eq!(g, min);
    }
    // 200ms of each gap was the call itself
    assert_eq!(client.total_wait(), Duration::from_millis(3 * 1000));
}

#[test]
fn slow_calls_are_not_delayed_further() {
    let clock = ManualClock::new();
    let min = Duration::from_millis(1200);
    let mut client = RateLimitedClient::with_clock(Recorder::new(&clock, Duration::from_secs(3)), clock.clone(), min, Duration::from_secs(10));

    client.lookup("a").unwrap();
    client.lookup("b").unwrap();
    assert_eq!(gaps(&client.inner().starts), vec![Duration::from_secs(3)]);
    assert_eq!(client.total_wait(), Duration::ZERO);
}

#[test]
fn idle_time_counts_toward_the_gap() {
    let clock = ManualClock::new();
    let min = Duration::from_millis(1200);
    let mut client = RateLimitedClient::with_clock(Recorder::new(&clock, Duration::ZERO), clock.clone(), min, Duration::from_secs(10));

    client.lookup("a").unwrap();
    clock.advance(Duration::from_millis(1000));
    client.lookup("b").unwrap();
    assert_eq!(gaps(&client.inner().starts), vec![min]);
    assert_eq!(client.total_wait(), Duration::from_millis(200));
}

#[test]
fn configured_timeout_reaches_the_geocoder() {
    let clock = ManualClock::new();
    let timeout = Duration::from_millis(2500);
    let mut client = RateLimitedClient::with_clock(Recorder::new(&clock, Duration::ZERO), clock.clone(), Duration::from_millis(1200), timeout);
    client.lookup("a").unwrap();
    client.lookup("b").unwrap();
    assert_eq!(client.inner().timeouts, vec![timeout, timeout]);
}

#[test]
fn whole_pass_never_beats_the_limit() {
    let clock = ManualClock::new();
    let min = Duration::from_millis(1200);
    let client = RateLimitedClient::with_clock(Recorder::new(&clock, Duration::from_millis(50)), clock.clone(), min, Duration::from_secs(10));
    let mut resolver = Resolver::new(client);

    // Every entity misses, so each costs two calls.
    let mut rows: Vec<Entity> = (1..=6).map(|i| Entity::new(i, format!("U{i}"), "Nowhere", 50.0)).collect();
    let dir = std::env::temp_dir().join("univ_atlas_rate_pass");
    let _ = std::fs::remove_dir_all(&dir);
    let sum = driver::run_pass(&mut rows, &mut resolver, &dir.join("out.csv"), 2, None, None).unwrap();

    assert_eq!(sum.lookups, 12);
    let starts = &resolver.client().inner().starts;
    assert_eq!(starts.len(), 12);
    assert!(gaps(starts).iter().all(|g| *g >= min));
}
