// src/log.rs
//
// Subscriber setup. The rest of the crate logs through `logf!`/`logd!`/
// `logw!`/`loge!` (macros.rs); `init` wires up stderr plus an append-only
// debug log under the local store directory.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::consts::{LOG_FILE, STORE_DIR};

#[doc(hidden)]
pub use tracing;

/// Map a `-v` count to a default filter directive. `RUST_LOG` wins if set.
fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "univ_atlas=info",
        1 => "univ_atlas=debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = open_log_file().map(|file| {
        fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
}

fn open_log_file() -> Option<fs::File> {
    let dir = Path::new(STORE_DIR);
    if !dir.exists() {
        fs::create_dir_all(dir).ok()?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
        .ok()
}
