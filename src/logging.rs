//! Logging setup for the `eqt` binary.
//!
//! Diagnostics go to stderr so stdout stays clean for `--json` output.
//! When a log directory is configured, warnings and errors are also appended
//! as JSON lines to a daily `error_log_YYYYMMDD.txt` file.

use chrono::{NaiveDate, Utc};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::{Result, TrackerError};

/// Environment variable that overrides the verbosity flags.
pub const LOG_ENV: &str = "EQT_LOG";

/// `error_log_YYYYMMDD.txt` for the given day.
#[must_use]
pub fn log_file_name(day: NaiveDate) -> String {
    format!("error_log_{}.txt", day.format("%Y%m%d"))
}

/// Path of today's error log inside `log_dir`.
#[must_use]
pub fn daily_log_path(log_dir: &Path) -> PathBuf {
    log_dir.join(log_file_name(Utc::now().date_naive()))
}

const fn default_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns `Io` if the log directory or file cannot be opened, or `Config` if
/// a subscriber is already installed.
pub fn init_logging(verbose: u8, quiet: bool, log_dir: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose, quiet)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose > 1)
        .without_time();

    let file_layer = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(daily_log_path(dir))?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(Mutex::new(file))
                    .with_filter(LevelFilter::WARN),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| TrackerError::Config(format!("failed to initialize logging: {e}")))
}

/// Route `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_daily() {
        let day = NaiveDate::from_ymd_opt(2026, 1, 19).unwrap();
        assert_eq!(log_file_name(day), "error_log_20260119.txt");
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(default_level(0, false), "warn");
        assert_eq!(default_level(2, false), "debug");
        assert_eq!(default_level(9, false), "trace");
        assert_eq!(default_level(3, true), "error");
    }

    #[test]
    fn test_logging_can_be_initialized_twice() {
        init_test_logging();
        init_test_logging();
        tracing::debug!("still alive");
    }
}
