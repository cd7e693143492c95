//! File-backed tracing setup.
//!
//! The viewer owns the terminal, so diagnostics go to a log file under the
//! platform data directory. Filtering follows the `GRIDVIEW_LOG` env var
//! (`tracing_subscriber::EnvFilter` syntax), defaulting to `info`.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Local;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "GRIDVIEW_LOG";

/// Where the log file lives, if a data directory exists.
pub fn log_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("gridview").join("gridview.log"))
}

/// Install the subscriber. Failure to create the file or to set the global
/// subscriber degrades to no logging; the viewer must never die over
/// diagnostics.
pub fn init_tracing() {
    let Some(path) = log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(
            target: "session",
            "session started {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );
    }
}
