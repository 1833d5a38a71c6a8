//! Source tracking for configuration values.

use std::fmt;
use std::path::PathBuf;

/// Where a configuration value came from, lowest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::File => write!(f, "file"),
            Self::Environment => write!(f, "environment"),
        }
    }
}

/// A value paired with the source it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sourced<T> {
    pub value: T,
    pub source: ConfigSource,
    /// Environment variable name, when `source` is `Environment`.
    pub env_var: Option<String>,
    /// File path, when `source` is `File`.
    pub file: Option<PathBuf>,
}

impl<T> Sourced<T> {
    pub fn default_value(value: T) -> Self {
        Self {
            value,
            source: ConfigSource::Default,
            env_var: None,
            file: None,
        }
    }

    pub fn from_env(value: T, env_var: impl Into<String>) -> Self {
        Self {
            value,
            source: ConfigSource::Environment,
            env_var: Some(env_var.into()),
            file: None,
        }
    }

    pub fn from_file(value: T, file: impl Into<PathBuf>) -> Self {
        Self {
            value,
            source: ConfigSource::File,
            env_var: None,
            file: Some(file.into()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            value: f(self.value),
            source: self.source,
            env_var: self.env_var,
            file: self.file,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Sourced<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.env_var, &self.file) {
            (Some(var), _) => write!(f, "{} (from {})", self.value, var),
            (None, Some(file)) => write!(f, "{} (from {})", self.value, file.display()),
            (None, None) => write!(f, "{} ({})", self.value, self.source),
        }
    }
}
