// src/cli.rs
use std::{path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};

use crate::{
    config::options::{DashboardOptions, ResolveOptions},
    data::{Dataset, Filter, Origin},
    geo::{self, PassSummary},
    progress::Progress,
};

#[derive(Parser, Debug)]
#[command(name = "univ_atlas", version, about = "Geocode a university ranking and summarize it")]
pub struct Cli {
    /// More log output (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Look up coordinates for every unresolved row and write the enriched table
    Resolve(ResolveArgs),
    /// Print metrics for a (filtered) table
    Summary(SummaryArgs),
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Save the whole working set every N lookup attempts
    #[arg(long)]
    pub checkpoint_every: Option<usize>,
    /// Minimum gap between outbound calls, in milliseconds
    #[arg(long)]
    pub min_delay: Option<u64>,
    /// Per-call timeout, in milliseconds
    #[arg(long)]
    pub timeout: Option<u64>,
    #[arg(long)]
    pub user_agent: Option<String>,
    #[arg(long)]
    pub endpoint: Option<String>,
    /// Start from the source only; ignore coordinates in an existing output
    #[arg(long)]
    pub no_resume: bool,
}

impl ResolveArgs {
    pub fn into_options(self) -> ResolveOptions {
        let mut opts = ResolveOptions::default();
        if let Some(p) = self.input { opts.input = p; }
        if let Some(p) = self.output { opts.output = p; }
        if let Some(n) = self.checkpoint_every { opts.checkpoint_every = n; }
        if let Some(ms) = self.min_delay { opts.pacing.min_delay = Duration::from_millis(ms); }
        if let Some(ms) = self.timeout { opts.pacing.timeout = Duration::from_millis(ms); }
        if let Some(ua) = self.user_agent { opts.pacing.user_agent = ua; }
        if let Some(ep) = self.endpoint { opts.pacing.endpoint = ep; }
        opts.resume = !self.no_resume;
        opts
    }
}

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Table to read. Default: enriched output, else the raw ranking
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub min_score: Option<f64>,
    #[arg(long)]
    pub max_score: Option<f64>,
    /// Only count rows whose name or country contains this
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long, default_value_t = crate::config::consts::TOP_COUNTRIES)]
    pub top: usize,
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Resolve(args) => resolve(args),
        Command::Summary(args) => summary(args),
    }
}

/* ---------- resolve ---------- */

/// Prints one line per attempt to stderr.
struct CliProgress {
    done: usize,
    total: usize,
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        eprintln!("Resolving {} row(s)…", total);
    }
    fn log(&mut self, msg: &str) { eprintln!("{msg}"); }
    fn item_done(&mut self, _index: usize, name: &str) {
        self.done += 1;
        eprintln!("[{}/{}] ok   {}", self.done, self.total, name);
    }
    fn item_failed(&mut self, _index: usize, name: &str) {
        self.done += 1;
        eprintln!("[{}/{}] miss {}", self.done, self.total, name);
    }
    fn checkpoint(&mut self, path: &std::path::Path, rows: usize) {
        eprintln!("checkpoint: {} rows → {}", rows, path.display());
    }
}

fn resolve(args: ResolveArgs) -> Result<()> {
    let opts = args.into_options();
    let mut prog = CliProgress { done: 0, total: 0 };
    let (_, sum) = geo::resolve_with_nominatim(&opts, Some(&mut prog), None)
        .wrap_err_with(|| format!("resolving {}", opts.input.display()))?;
    print_pass(&sum, &opts);
    Ok(())
}

fn print_pass(sum: &PassSummary, opts: &ResolveOptions) {
    println!("rows:             {}", sum.total);
    println!("already resolved: {} ({} carried over)", sum.already_resolved, sum.carried_over);
    println!("attempted:        {}", sum.attempted);
    println!("resolved now:     {}", sum.resolved);
    println!("not found:        {}", sum.missed);
    println!("failed:           {} ({} timeouts)", sum.failed, sum.timeouts);
    println!("lookups:          {}", sum.lookups);
    println!("checkpoints:      {}", sum.checkpoints);
    println!("still unresolved: {}", sum.unresolved());
    println!("written:          {} → {}", sum.written, opts.output.display());
}

/* ---------- summary ---------- */

fn summary(args: SummaryArgs) -> Result<()> {
    let mut dash = DashboardOptions::default();
    if let Some(p) = &args.input {
        // An explicit file is shown as-is.
        dash.enriched_paths = vec![p.clone()];
        dash.raw_paths = Vec::new();
    }
    let ds = Dataset::load(&dash, &mut rand::thread_rng()).wrap_err("loading ranking table")?;

    let filter = Filter {
        country: args.country.clone(),
        score: match (args.min_score, args.max_score) {
            (None, None) => None,
            (lo, hi) => Some((lo.unwrap_or(f64::NEG_INFINITY), hi.unwrap_or(f64::INFINITY))),
        },
    };
    if let Some((lo, hi)) = filter.score {
        if lo > hi {
            return Err(eyre!("--min-score {lo} is above --max-score {hi}"));
        }
    }

    let mut view = ds.view(&filter);
    if let Some(term) = &args.search {
        view.row_ix = view.search(term);
    }

    let origin = match ds.origin() {
        Origin::Enriched => "resolved coordinates",
        Origin::Approximate => "approximate coordinates",
    };
    println!("source: {} ({})", ds.path().display(), origin);

    let s = view.summary();
    println!("universities: {}", s.count);
    match s.mean_score {
        Some(m) => println!("mean score:   {:.2}", m),
        None => println!("mean score:   -"),
    }
    println!("on map:       {}", view.map_points().len());

    println!();
    println!("top countries:");
    for (country, n) in view.top_countries(args.top) {
        println!("  {:<28} {}", country, n);
    }

    if let Some(h) = view.histogram(dash.histogram_bins) {
        println!();
        println!("score histogram:");
        let peak = h.counts.iter().copied().max().unwrap_or(0).max(1);
        for (i, n) in h.counts.iter().enumerate() {
            let (lo, hi) = h.bin_range(i);
            let bar = "#".repeat(n * 40 / peak);
            println!("  {:>7.2}–{:<7.2} {:>5} {}", lo, hi, n, bar);
        }
    }
    Ok(())
}
