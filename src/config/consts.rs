// src/config/consts.rs

// Geocoder
pub const NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
pub const USER_AGENT: &str = "univ_ranking_project_student_v2";
pub const MIN_DELAY_MS: u64 = 1_200; // Nominatim usage policy; do not lower
pub const LOOKUP_TIMEOUT_MS: u64 = 10_000;

// Resolution pass
pub const CHECKPOINT_EVERY: usize = 50;

// Input / output
pub const DEFAULT_INPUT: &str = "data/data_univ_2000.csv";
pub const DEFAULT_OUTPUT: &str = "data_univ_full_coord.csv";
pub const ENRICHED_SEARCH_PATHS: &[&str] = &["data/data_univ_full_coord.csv", "data_univ_full_coord.csv"];
pub const RAW_SEARCH_PATHS: &[&str] = &["data/data_univ_2000.csv", "data_univ_2000.csv"];

// CSV columns, in write order
pub const COL_RANK: &str = "Rank";
pub const COL_NAME: &str = "Universitas";
pub const COL_COUNTRY: &str = "Negara";
pub const COL_SCORE: &str = "Score";
pub const COL_LAT: &str = "lat";
pub const COL_LON: &str = "lon";
pub const HEADERS: [&str; 6] = [COL_RANK, COL_NAME, COL_COUNTRY, COL_SCORE, COL_LAT, COL_LON];

// Fallback jitter
pub const JITTER_KNOWN_DEG: f64 = 3.0;
pub const JITTER_DEFAULT_LAT_DEG: f64 = 3.0;
pub const JITTER_DEFAULT_LON_DEG: f64 = 5.0;
pub const DEFAULT_CENTROID: (f64, f64) = (48.0, 15.0);

// Dashboard
pub const HISTOGRAM_BINS: usize = 20;
pub const TOP_COUNTRIES: usize = 10;

// Local store (logs, temp files)
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = "debug.log";
