// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;

/// Everything a resolution pass needs to know, independent of the frontend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolveOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Persist the whole working set after this many lookup attempts.
    pub checkpoint_every: usize,
    pub pacing: PacingOptions,
    /// Carry coordinates over from an existing output before starting.
    pub resume: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            checkpoint_every: CHECKPOINT_EVERY,
            pacing: PacingOptions::default(),
            resume: true,
        }
    }
}

impl ResolveOptions {
    pub fn validate(&self) -> Result<(), String> {
        if self.checkpoint_every == 0 {
            return Err(s!("checkpoint interval must be at least 1"));
        }
        if self.pacing.user_agent.trim().is_empty() {
            return Err(s!("a unique user agent is required by the geocoder"));
        }
        if self.input.as_os_str().is_empty() || self.output.as_os_str().is_empty() {
            return Err(s!("input and output paths must not be empty"));
        }
        Ok(())
    }
}

/// Outbound lookup settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PacingOptions {
    pub endpoint: String,
    pub user_agent: String,
    pub min_delay: Duration,
    pub timeout: Duration,
}

impl Default for PacingOptions {
    fn default() -> Self {
        Self {
            endpoint: s!(NOMINATIM_ENDPOINT),
            user_agent: s!(USER_AGENT),
            min_delay: Duration::from_millis(MIN_DELAY_MS),
            timeout: Duration::from_millis(LOOKUP_TIMEOUT_MS),
        }
    }
}

/// Where the dashboard looks for data, and how it aggregates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardOptions {
    pub enriched_paths: Vec<PathBuf>,
    pub raw_paths: Vec<PathBuf>,
    pub histogram_bins: usize,
    pub top_countries: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            enriched_paths: ENRICHED_SEARCH_PATHS.iter().map(PathBuf::from).collect(),
            raw_paths: RAW_SEARCH_PATHS.iter().map(PathBuf::from).collect(),
            histogram_bins: HISTOGRAM_BINS,
            top_countries: TOP_COUNTRIES,
        }
    }
}
