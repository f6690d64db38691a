// tests/resolve_pass.rs
//
// Full passes against a scripted geocoder on a manual clock: no network, no
// sleeping. Outputs go to a temp dir and are compared byte for byte.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use univ_atlas::config::options::ResolveOptions;
use univ_atlas::entity::{Coordinates, Entity};
use univ_atlas::error::{LookupError, ResolveError, StoreError};
use univ_atlas::geo::{driver, CancelToken, Geocoder, ManualClock, PassSummary, RateLimitedClient, Resolver};
use univ_atlas::progress::Progress;
use univ_atlas::{file, store};

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("univ_atlas_pass_{}", name));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

/// Answers from a fixed table; anything else is a miss. Queries listed in
/// `broken` fail with a transport error, those in `slow` time out.
#[derive(Default)]
struct Scripted {
    hits: HashMap<String, Coordinates>,
    broken: Vec<String>,
    slow: Vec<String>,
    queries: Vec<String>,
    cancel_after: Option<(usize, CancelToken)>,
    /// Directory squatting on this path during the first lookup, gone from
    /// the second on. Makes exactly one checkpoint write fail.
    jam: Option<PathBuf>,
}

impl Scripted {
    fn hit(mut self, query: &str, lat: f64, lon: f64) -> Self {
        self.hits.insert(query.to_string(), Coordinates::new(lat, lon));
        self
    }
    fn broken(mut self, query: &str) -> Self {
        self.broken.push(query.to_string());
        self
    }
    fn slow(mut self, query: &str) -> Self {
        self.slow.push(query.to_string());
        self
    }
}

impl Geocoder for Scripted {
    fn lookup(&mut self, query: &str, _timeout: Duration) -> Result<Option<Coordinates>, LookupError> {
        self.queries.push(query.to_string());
        if let Some((n, token)) = &self.cancel_after {
            if self.queries.len() >= *n {
                token.cancel();
            }
        }
        if let Some(jam) = &self.jam {
            if self.queries.len() == 1 {
                fs::create_dir_all(jam).unwrap();
            } else if jam.exists() {
                fs::remove_dir_all(jam).unwrap();
            }
        }
        if self.slow.iter().any(|q| q == query) {
            return Err(LookupError::Timeout { query: query.to_string() });
        }
        if self.broken.iter().any(|q| q == query) {
            return Err(LookupError::Transport { query: query.to_string(), reason: "connection reset".into() });
        }
        Ok(self.hits.get(query).copied())
    }
}

fn resolver(g: &mut Scripted) -> Resolver<&mut Scripted, ManualClock> {
    Resolver::new(RateLimitedClient::with_clock(
        g,
        ManualClock::new(),
        Duration::from_millis(1200),
        Duration::from_secs(10),
    ))
}

/// Keeps a copy of the output file at every checkpoint.
#[derive(Default)]
struct Snapshots(Vec<Vec<u8>>);

impl Progress for Snapshots {
    fn checkpoint(&mut self, path: &Path, _rows: usize) {
        self.0.push(fs::read(path).unwrap());
    }
}

/// Collects status lines.
#[derive(Default)]
struct Lines(Vec<String>);

impl Progress for Lines {
    fn log(&mut self, msg: &str) {
        self.0.push(msg.to_string());
    }
}

fn opts(dir: &Path, input: &Path, every: usize) -> ResolveOptions {
    ResolveOptions {
        input: input.to_path_buf(),
        output: dir.join("out.csv"),
        checkpoint_every: every,
        resume: true,
        ..ResolveOptions::default()
    }
}

fn write_source(dir: &Path, rows: &[Entity]) -> PathBuf {
    let p = dir.join("source.csv");
    store::save(rows, &p).unwrap();
    p
}

fn run(o: &ResolveOptions, g: &mut Scripted, progress: Option<&mut dyn Progress>) -> PassSummary {
    let mut r = resolver(g);
    let (_, sum) = driver::run(o, &mut r, progress, None).unwrap();
    sum
}

/// (lat, lon) cells for every data row of a CSV snapshot.
fn coordinate_cells(bytes: &[u8]) -> Vec<(String, String)> {
    let mut rdr = csv::Reader::from_reader(bytes);
    rdr.records()
        .map(|r| {
            let r = r.unwrap();
            (r[4].to_string(), r[5].to_string())
        })
        .collect()
}

fn acme() -> Vec<Entity> {
    vec![Entity::new(1, "Acme U", "USA", 90.0)]
}

#[test]
fn first_stage_hit_is_written() {
    let dir = tmp_dir("stage1");
    let src = write_source(&dir, &acme());
    let o = opts(&dir, &src, 50);
    let mut g = Scripted::default().hit("Acme U, USA", 40.0, -75.0);

    let sum = run(&o, &mut g, None);
    assert_eq!(sum.resolved, 1);
    assert_eq!(sum.written, 1);
    assert_eq!(g.queries, vec!["Acme U, USA"]);

    let out = store::load(&o.output).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].coordinates(), Some(Coordinates::new(40.0, -75.0)));
}

#[test]
fn second_stage_uses_name_only() {
    let dir = tmp_dir("stage2");
    let src = write_source(&dir, &acme());
    let o = opts(&dir, &src, 50);
    let mut g = Scripted::default().hit("Acme U", 41.0, -76.0);

    let sum = run(&o, &mut g, None);
    assert_eq!(sum.resolved, 1);
    assert_eq!(sum.lookups, 2);
    assert_eq!(g.queries, vec!["Acme U, USA", "Acme U"]);

    let out = store::load(&o.output).unwrap();
    assert_eq!(out[0].coordinates(), Some(Coordinates::new(41.0, -76.0)));
}

#[test]
fn total_miss_is_dropped_from_final_but_kept_in_checkpoint() {
    let dir = tmp_dir("miss");
    let src = write_source(&dir, &acme());
    let o = opts(&dir, &src, 1);
    let mut g = Scripted::default();
    let mut snaps = Snapshots::default();

    let sum = run(&o, &mut g, Some(&mut snaps));
    assert_eq!(sum.missed, 1);
    assert_eq!(sum.written, 0);
    assert!(store::load(&o.output).unwrap().is_empty());

    let last = snaps.0.last().expect("one checkpoint");
    assert_eq!(coordinate_cells(last), vec![(String::new(), String::new())]);
    assert!(String::from_utf8_lossy(last).contains("Acme U"));
}

fn campus() -> (Vec<Entity>, Scripted) {
    let rows = vec![
        Entity::new(1, "Alpha Institute", "USA", 99.1),
        Entity::new(2, "Beta College", "UK", 95.0),
        Entity::new(3, "Gamma University", "Japan", 91.3),
        Entity::new(4, "Delta Polytechnic", "Germany", 88.0),
        Entity::new(5, "Epsilon School", "Neverland", 80.2),
        Entity::new(6, "Zeta Academy", "France", 79.9),
        Entity::new(7, "Eta University", "Chile", 70.0),
    ];
    let g = Scripted::default()
        .hit("Alpha Institute, USA", 42.36, -71.09)
        .hit("Beta College", 51.75, -1.25)
        .hit("Delta Polytechnic, Germany", 48.15, 11.57)
        .hit("Zeta Academy, France", 48.85, 2.35)
        .hit("Eta University", -33.45, -70.66);
    (rows, g)
}

#[test]
fn rerun_from_any_checkpoint_matches_uninterrupted_run() {
    let dir = tmp_dir("resume_all");
    let (rows, mut g) = campus();
    let src = write_source(&dir, &rows);
    let o = opts(&dir, &src, 2);

    let mut snaps = Snapshots::default();
    let full = run(&o, &mut g, Some(&mut snaps));
    let expected = fs::read(&o.output).unwrap();
    assert_eq!(full.resolved, 5);
    assert_eq!(snaps.0.len(), 3); // after attempts 2, 4, 6

    for (k, snap) in snaps.0.iter().enumerate() {
        // As if the process died right after checkpoint k.
        let run_dir = tmp_dir(&format!("resume_{k}"));
        let out = run_dir.join("out.csv");
        fs::write(&out, snap).unwrap();

        let (_, mut again) = campus();
        let o2 = ResolveOptions { output: out.clone(), ..o.clone() };
        let sum = run(&o2, &mut again, None);

        assert_eq!(fs::read(&out).unwrap(), expected, "checkpoint {k}");
        assert!(sum.carried_over > 0);
        assert!(sum.lookups < full.lookups);
    }
}

#[test]
fn checkpoint_as_input_gives_same_result() {
    let dir = tmp_dir("resume_input");
    let (rows, mut g) = campus();
    let src = write_source(&dir, &rows);
    let o = opts(&dir, &src, 3);

    let mut snaps = Snapshots::default();
    run(&o, &mut g, Some(&mut snaps));
    let expected = fs::read(&o.output).unwrap();

    let snap_path = dir.join("checkpoint.csv");
    fs::write(&snap_path, &snaps.0[0]).unwrap();
    let o2 = ResolveOptions {
        input: snap_path,
        output: dir.join("from_checkpoint.csv"),
        ..o.clone()
    };
    let (_, mut again) = campus();
    let sum = run(&o2, &mut again, None);

    assert_eq!(sum.already_resolved, 2); // Alpha and Beta resolved in the first three
    assert_eq!(fs::read(&o2.output).unwrap(), expected);
}

#[test]
fn fully_resolved_input_makes_no_calls_and_same_bytes() {
    let dir = tmp_dir("idempotent");
    let rows = vec![
        Entity::new(1, "Alpha Institute", "USA", 99.1).with_coordinates(42.36, -71.09),
        Entity::new(2, "Beta College", "UK", 95.5).with_coordinates(51.75, -1.25),
    ];
    let src = write_source(&dir, &rows);
    let o = opts(&dir, &src, 1);
    let mut g = Scripted::default();

    let sum = run(&o, &mut g, None);
    assert_eq!(sum.lookups, 0);
    assert_eq!(sum.attempted, 0);
    assert_eq!(sum.checkpoints, 0);
    assert!(g.queries.is_empty());
    assert_eq!(fs::read(&o.output).unwrap(), fs::read(&src).unwrap());

    // And once more on its own output.
    let before = fs::read(&o.output).unwrap();
    let o2 = ResolveOptions { input: o.output.clone(), output: dir.join("again.csv"), ..o.clone() };
    let sum2 = run(&o2, &mut g, None);
    assert_eq!(sum2.lookups, 0);
    assert_eq!(fs::read(&o2.output).unwrap(), before);
}

#[test]
fn coordinates_are_paired_in_every_checkpoint_and_in_final() {
    let dir = tmp_dir("pairing");
    let (rows, mut g) = campus();
    let src = write_source(&dir, &rows);
    let o = opts(&dir, &src, 1);

    let mut snaps = Snapshots::default();
    run(&o, &mut g, Some(&mut snaps));
    assert_eq!(snaps.0.len(), rows.len());

    for snap in &snaps.0 {
        for (lat, lon) in coordinate_cells(snap) {
            assert_eq!(lat.is_empty(), lon.is_empty());
            if !lat.is_empty() {
                assert!(lat.parse::<f64>().is_ok() && lon.parse::<f64>().is_ok());
            }
        }
    }
    for (lat, lon) in coordinate_cells(&fs::read(&o.output).unwrap()) {
        assert!(lat.parse::<f64>().is_ok());
        assert!(lon.parse::<f64>().is_ok());
    }
}

#[test]
fn transport_error_skips_second_stage_and_pass_continues() {
    let dir = tmp_dir("transport");
    let rows = vec![
        Entity::new(1, "Acme U", "USA", 90.0),
        Entity::new(2, "Beta College", "UK", 80.0),
    ];
    let src = write_source(&dir, &rows);
    let o = opts(&dir, &src, 50);
    let mut g = Scripted::default()
        .broken("Acme U, USA")
        .hit("Acme U", 1.0, 1.0)
        .hit("Beta College, UK", 51.75, -1.25);

    let sum = run(&o, &mut g, None);
    assert_eq!(sum.failed, 1);
    assert_eq!(sum.resolved, 1);
    assert_eq!(g.queries, vec!["Acme U, USA", "Beta College, UK"]);

    let out = store::load(&o.output).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].name(), "Beta College");
}

#[test]
fn carry_over_from_previous_output() {
    let dir = tmp_dir("carry");
    let (rows, _) = campus();
    let src = write_source(&dir, &rows);
    let o = opts(&dir, &src, 50);

    // A previous run found Gamma (which the scripted geocoder never would).
    let prior = vec![Entity::new(3, "Gamma University", "Japan", 91.3).with_coordinates(35.7, 139.7)];
    store::save(&prior, &o.output).unwrap();

    let (_, mut g) = campus();
    let sum = run(&o, &mut g, None);
    assert_eq!(sum.carried_over, 1);
    assert!(!g.queries.iter().any(|q| q.starts_with("Gamma")));

    let out = store::load(&o.output).unwrap();
    assert!(out.iter().any(|e| e.name() == "Gamma University"));
    assert_eq!(out.len(), 6);

    // Without resume the prior file is ignored.
    store::save(&prior, &o.output).unwrap();
    let (_, mut g2) = campus();
    let fresh = ResolveOptions { resume: false, ..o.clone() };
    let sum2 = run(&fresh, &mut g2, None);
    assert_eq!(sum2.carried_over, 0);
    assert_eq!(store::load(&o.output).unwrap().len(), 5);
}

#[test]
fn cancel_writes_checkpoint_and_stops() {
    let dir = tmp_dir("cancel");
    let (rows, mut g) = campus();
    let src = write_source(&dir, &rows);
    let o = opts(&dir, &src, 50);

    let token = CancelToken::new();
    g.cancel_after = Some((3, token.clone()));
    let mut r = resolver(&mut g);
    let (working, sum) = driver::run(&o, &mut r, None, Some(&token)).unwrap();

    assert!(sum.interrupted);
    assert_eq!(sum.written, 0);
    assert!(sum.attempted < rows.len());
    assert_eq!(sum.checkpoints, 1);

    // Whole working set, unresolved rows included.
    let saved = store::load(&o.output).unwrap();
    assert_eq!(saved.len(), rows.len());
    assert_eq!(saved, working);
}

#[test]
fn missing_source_is_fatal() {
    let dir = tmp_dir("missing");
    let o = opts(&dir, &dir.join("nope.csv"), 50);
    let mut g = Scripted::default();
    let mut r = resolver(&mut g);

    let err = driver::run(&o, &mut r, None, None).unwrap_err();
    assert!(matches!(err, ResolveError::Load(StoreError::SourceNotFound(_))));
}

#[test]
fn failed_final_write_is_reported() {
    let dir = tmp_dir("final_write");
    let src = write_source(&dir, &acme());
    // Parent of the output is a regular file.
    let blocker = dir.join("blocker");
    fs::write(&blocker, b"x").unwrap();
    let o = ResolveOptions { output: blocker.join("out.csv"), ..opts(&dir, &src, 1) };
    let mut g = Scripted::default().hit("Acme U, USA", 40.0, -75.0);
    let mut r = resolver(&mut g);

    let err = driver::run(&o, &mut r, None, None).unwrap_err();
    assert!(matches!(err, ResolveError::FinalWrite { .. }));
}

#[test]
fn failed_checkpoint_is_counted_and_pass_continues() {
    let dir = tmp_dir("checkpoint_fail");
    let rows = vec![
        Entity::new(1, "Alpha Institute", "USA", 99.1),
        Entity::new(2, "Beta College", "UK", 95.0),
        Entity::new(3, "Gamma University", "Japan", 91.3),
    ];
    let src = write_source(&dir, &rows);
    let o = opts(&dir, &src, 1);
    let mut g = Scripted::default()
        .hit("Alpha Institute, USA", 42.36, -71.09)
        .hit("Beta College, UK", 51.75, -1.25)
        .hit("Gamma University, Japan", 35.71, 139.76);
    g.jam = Some(file::temp_path_for(&o.output));

    let mut lines = Lines::default();
    let sum = run(&o, &mut g, Some(&mut lines));

    assert_eq!(sum.attempted, 3);
    assert_eq!(sum.resolved, 3);
    assert_eq!(sum.checkpoint_failures, 1);
    assert_eq!(sum.checkpoints, 2);
    assert_eq!(sum.written, 3);
    assert!(lines.0.iter().any(|l| l.contains("checkpoint failed")));

    let out = store::load(&o.output).unwrap();
    assert_eq!(out.len(), 3);
    assert!(out.iter().all(Entity::is_resolved));
}

#[test]
fn timeout_leaves_row_unresolved_and_is_counted() {
    let dir = tmp_dir("timeout");
    let rows = vec![
        Entity::new(1, "Acme U", "USA", 90.0),
        Entity::new(2, "Beta College", "UK", 80.0),
    ];
    let src = write_source(&dir, &rows);
    let o = opts(&dir, &src, 1);
    let mut g = Scripted::default()
        .slow("Acme U, USA")
        .hit("Acme U", 1.0, 1.0)
        .hit("Beta College, UK", 51.75, -1.25);

    let mut snaps = Snapshots::default();
    let sum = run(&o, &mut g, Some(&mut snaps));
    assert_eq!(sum.timeouts, 1);
    assert_eq!(sum.failed, 1);
    assert_eq!(sum.resolved, 1);
    assert_eq!(sum.unresolved(), 1);
    // a timeout ends the attempt like any other failure
    assert_eq!(g.queries, vec!["Acme U, USA", "Beta College, UK"]);

    // still in the checkpoint, without coordinates
    let first = &snaps.0[0];
    assert_eq!(coordinate_cells(first)[0], (String::new(), String::new()));

    let out = store::load(&o.output).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].name(), "Beta College");
}

#[test]
fn interrupt_is_reported_through_progress() {
    let dir = tmp_dir("cancel_log");
    let (rows, mut g) = campus();
    let src = write_source(&dir, &rows);
    let o = opts(&dir, &src, 50);

    let token = CancelToken::new();
    g.cancel_after = Some((1, token.clone()));
    let mut lines = Lines::default();
    let mut r = resolver(&mut g);
    let (_, sum) = driver::run(&o, &mut r, Some(&mut lines), Some(&token)).unwrap();

    assert!(sum.interrupted);
    assert_eq!(sum.attempted, 1);
    assert_eq!(lines.0, vec!["interrupted after 1 attempt(s)"]);
}
