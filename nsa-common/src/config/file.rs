//! TOML parameter files.

use super::source::Sourced;
use crate::errors::ErrorCode;
use crate::source::RawParameters;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File name looked up under the user config directory.
pub const CONFIG_FILE_NAME: &str = "params.toml";

/// Errors loading a parameter file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    /// Catalog code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } => ErrorCode::ConfigReadError,
            Self::Parse { .. } => ErrorCode::ConfigParseError,
        }
    }
}

/// Default location: `<config dir>/nsa/params.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("nsa").join(CONFIG_FILE_NAME))
}

/// Read and parse a parameter file.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] if the file cannot be read and
/// [`ConfigError::Parse`] if it is not valid TOML for [`RawParameters`].
pub fn load_raw_parameters(path: &Path) -> Result<Sourced<RawParameters>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let params = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loaded parameter file");
    Ok(Sourced::from_file(params, path))
}

/// Load `path` when given, otherwise the default file if it exists.
///
/// Falls back to [`RawParameters::default`] when no file applies.
///
/// # Errors
///
/// Propagates [`load_raw_parameters`] failures. An explicit `path` that does
/// not exist is an error; a missing default file is not.
pub fn load_or_default(path: Option<&Path>) -> Result<Sourced<RawParameters>, ConfigError> {
    if let Some(path) = path {
        return load_raw_parameters(path);
    }
    match default_config_path() {
        Some(default) if default.is_file() => load_raw_parameters(&default),
        _ => Ok(Sourced::default_value(RawParameters::default())),
    }
}
