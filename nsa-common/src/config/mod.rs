//! Configuration system for NSA.
//!
//! Raw build parameters are assembled in layers, lowest precedence first:
//! - defaults ([`RawParameters::default`](crate::RawParameters))
//! - a TOML parameter file
//! - `NSA_*` environment variables
//! - explicit CLI/build-step overrides (applied by the caller)
//!
//! Every value can carry its [`ConfigSource`] for debugging.

pub mod env;
pub mod file;
pub mod layer;
pub mod source;

pub use env::{EnvError, EnvParser};
pub use file::{ConfigError, default_config_path, load_or_default, load_raw_parameters};
pub use source::{ConfigSource, Sourced};

#[cfg(test)]
pub(crate) fn env_test_lock() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
