//! Structured test logging for CI debugging.
//!
//! Call [`init_global_test_logging`] at the start of a test to capture every
//! tracing event as JSONL in `target/test-logs/nsa_tests.jsonl`, in addition
//! to the human-readable output cargo shows for failing tests.
//!
//! ```ignore
//! #[test]
//! fn test_example() {
//!     nsa_common::testing::init_global_test_logging();
//!     tracing::info!("captured in JSONL");
//! }
//! ```

use std::path::PathBuf;
use std::sync::{Mutex, Once};
use tracing_subscriber::prelude::*;

static GLOBAL_LOGGING_INIT: Once = Once::new();

/// Initialize global JSONL logging for tests.
///
/// Safe to call multiple times; initialization only happens once.
///
/// # Environment Variables
///
/// - `NSA_TEST_LOG_FILE`: Override the log file path
/// - `NSA_TEST_LOG_LEVEL`: Set log level filter (default: `debug`)
pub fn init_global_test_logging() {
    GLOBAL_LOGGING_INIT.call_once(|| {
        let file_layer = create_global_log_file().map(|file| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(Mutex::new(file))
                .with_current_span(true)
                .with_file(true)
                .with_line_number(true)
        });

        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_target(true)
            .compact();

        let level = std::env::var("NSA_TEST_LOG_LEVEL").unwrap_or_else(|_| "debug".to_string());
        let filter =
            tracing_subscriber::EnvFilter::try_new(format!("nsa={level},nsa_common={level}"))
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(stderr_layer);

        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

fn create_global_log_file() -> Option<std::fs::File> {
    if let Ok(custom_path) = std::env::var("NSA_TEST_LOG_FILE") {
        if let Some(parent) = PathBuf::from(&custom_path).parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        return std::fs::File::create(&custom_path).ok();
    }

    let log_dir = find_target_dir().join("test-logs");
    let _ = std::fs::create_dir_all(&log_dir);
    std::fs::File::create(log_dir.join("nsa_tests.jsonl")).ok()
}

/// Find the target directory by searching up from current dir.
fn find_target_dir() -> PathBuf {
    if let Ok(target_dir) = std::env::var("CARGO_TARGET_DIR") {
        return PathBuf::from(target_dir);
    }

    let mut cwd = std::env::current_dir().unwrap_or_default();
    loop {
        let target = cwd.join("target");
        if target.is_dir() {
            return target;
        }
        if !cwd.pop() {
            return PathBuf::from("target");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_global_test_logging();
        init_global_test_logging();
        tracing::info!(test = "init_is_idempotent", "logging ready");
    }
}
