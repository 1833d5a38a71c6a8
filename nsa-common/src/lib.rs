//! Shared types and utilities for NSA build parameter handling.
//!
//! The core entry point is [`ParamsAdapter::new`], which reconciles a
//! [`RawParameters`] source and an [`AdapterRequest`] of explicit overrides
//! into one validated, immutable configuration for a security test step.

pub mod config;
pub mod errors;
pub mod locator;
pub mod logging;
pub mod params;
pub mod proxy;
pub mod source;
pub mod testing;
pub mod util;

pub use config::{ConfigError, ConfigSource, EnvError, EnvParser, Sourced};
pub use errors::{ErrorEntry, ValidationError, ValidationErrorKind};
pub use locator::{
    LocateDecision, LocateMiss, LocatedFile, ProbeOutcome, has_file, locate_file, locate_matching,
};
pub use logging::{LogConfig, LogFormat, init_logging};
pub use params::{DEFAULT_API_URL, DEFAULT_TOOL_NAME, ParamsAdapter, ParamsSnapshot};
pub use proxy::ProxySettings;
pub use source::{AdapterRequest, FileReference, RawParameters, WaitOverload};
