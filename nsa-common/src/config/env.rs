//! Environment variable parsing with type safety.
//!
//! Provides a type-safe parser for `NSA_` environment variables with
//! validation, error collection, and source tracking.

use super::source::Sourced;
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during environment variable parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    /// Invalid value for a variable.
    #[error("Invalid value for {var}: expected {expected}, got '{value}'")]
    InvalidValue {
        var: String,
        expected: String,
        value: String,
    },

    /// Value out of valid range.
    #[error("Value out of range for {var}: {value} (valid: {min}..={max})")]
    OutOfRange {
        var: String,
        value: String,
        min: String,
        max: String,
    },

    /// Invalid log level.
    #[error("Invalid log level for {var}: {value}")]
    InvalidLogLevel { var: String, value: String },
}

/// Type-safe environment variable parser.
///
/// Collects errors during parsing so all issues can be reported at once.
#[derive(Debug)]
pub struct EnvParser {
    prefix: &'static str,
    errors: Vec<EnvError>,
}

impl EnvParser {
    /// Create a new parser with the NSA_ prefix.
    pub fn new() -> Self {
        Self {
            prefix: "NSA_",
            errors: Vec::new(),
        }
    }

    /// Get all accumulated errors.
    pub fn errors(&self) -> &[EnvError] {
        &self.errors
    }

    /// Check if any errors occurred.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Take ownership of errors.
    pub fn take_errors(&mut self) -> Vec<EnvError> {
        std::mem::take(&mut self.errors)
    }

    /// Get the full variable name with prefix.
    pub fn var_name(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    /// Get an optional string (None if not set or empty).
    pub fn get_optional_string(&mut self, name: &str) -> Sourced<Option<String>> {
        let var_name = self.var_name(name);
        match env::var(&var_name) {
            Ok(value) if value.is_empty() => Sourced::from_env(None, var_name),
            Ok(value) => Sourced::from_env(Some(value), var_name),
            Err(_) => Sourced::default_value(None),
        }
    }

    /// Get a boolean value with default.
    ///
    /// Accepts: 1, true, yes, on (for true)
    ///          0, false, no, off, "" (for false)
    pub fn get_bool(&mut self, name: &str, default: bool) -> Sourced<bool> {
        self.get_optional_bool(name)
            .map(|value| value.unwrap_or(default))
    }

    /// Get a boolean value, `None` when unset or invalid.
    pub fn get_optional_bool(&mut self, name: &str) -> Sourced<Option<bool>> {
        let var_name = self.var_name(name);
        match env::var(&var_name) {
            Ok(value) => match parse_bool(&value) {
                Some(parsed) => Sourced::from_env(Some(parsed), var_name),
                None => {
                    self.errors.push(EnvError::InvalidValue {
                        var: var_name.clone(),
                        expected: "boolean (true/false/1/0/yes/no)".to_string(),
                        value,
                    });
                    Sourced::from_env(None, var_name)
                }
            },
            Err(_) => Sourced::default_value(None),
        }
    }

    /// Get a numeric value, `None` when unset, unparsable, or out of range.
    pub fn get_optional_range<T>(
        &mut self,
        name: &str,
        expected: &str,
        min: T,
        max: T,
    ) -> Sourced<Option<T>>
    where
        T: FromStr + PartialOrd + Display + Copy,
    {
        let var_name = self.var_name(name);
        match env::var(&var_name) {
            Ok(value) => match value.parse::<T>() {
                Ok(n) if n >= min && n <= max => Sourced::from_env(Some(n), var_name),
                Ok(n) => {
                    self.errors.push(EnvError::OutOfRange {
                        var: var_name.clone(),
                        value: n.to_string(),
                        min: min.to_string(),
                        max: max.to_string(),
                    });
                    Sourced::from_env(None, var_name)
                }
                Err(_) => {
                    self.errors.push(EnvError::InvalidValue {
                        var: var_name.clone(),
                        expected: expected.to_string(),
                        value,
                    });
                    Sourced::default_value(None)
                }
            },
            Err(_) => Sourced::default_value(None),
        }
    }

    /// Get an optional path with ~ expansion (None if not set or empty).
    pub fn get_optional_path(&mut self, name: &str) -> Sourced<Option<PathBuf>> {
        self.get_optional_string(name)
            .map(|value| value.map(|v| expand_path(&v)))
    }

    /// Get a log level value with validation.
    pub fn get_log_level(&mut self, name: &str, default: &str) -> Sourced<String> {
        let var_name = self.var_name(name);
        match env::var(&var_name) {
            Ok(value) => {
                let lower = value.to_lowercase();
                match lower.as_str() {
                    "trace" | "debug" | "info" | "warn" | "error" | "off" => {
                        Sourced::from_env(lower, var_name)
                    }
                    _ => {
                        self.errors.push(EnvError::InvalidLogLevel {
                            var: var_name.clone(),
                            value: value.clone(),
                        });
                        Sourced::from_env(default.to_string(), var_name)
                    }
                }
            }
            Err(_) => Sourced::default_value(default.to_string()),
        }
    }
}

impl Default for EnvParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Expand `~` and environment references in a path string.
pub(crate) fn expand_path(value: &str) -> PathBuf {
    match shellexpand::full(value) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(value),
    }
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use crate::config::{ConfigSource, env_test_lock};
    use proptest::prelude::*;
    use std::env;

    fn cleanup_env(vars: &[&str]) {
        for var in vars {
            // SAFETY: Tests are serialized via env_test_lock
            unsafe { env::remove_var(var) };
        }
    }

    fn set_env(key: &str, value: &str) {
        // SAFETY: Tests are serialized via env_test_lock
        unsafe { env::set_var(key, value) };
    }

    #[test]
    fn test_get_bool_true_values() {
        let _guard = env_test_lock();
        let vars = ["NSA_TEST_BOOL_TRUE"];
        cleanup_env(&vars);

        for val in &["1", "true", "yes", "on", "TRUE", "Yes"] {
            set_env("NSA_TEST_BOOL_TRUE", val);
            let mut parser = EnvParser::new();
            let result = parser.get_bool("TEST_BOOL_TRUE", false);
            assert!(result.value, "Expected true for '{}'", val);
            assert!(!parser.has_errors());
        }

        cleanup_env(&vars);
    }

    #[test]
    fn test_get_bool_false_values() {
        let _guard = env_test_lock();
        let vars = ["NSA_TEST_BOOL_FALSE"];
        cleanup_env(&vars);

        for val in &["0", "false", "no", "off", "FALSE", ""] {
            set_env("NSA_TEST_BOOL_FALSE", val);
            let mut parser = EnvParser::new();
            let result = parser.get_bool("TEST_BOOL_FALSE", true);
            assert!(!result.value, "Expected false for '{}'", val);
            assert!(!parser.has_errors());
        }

        cleanup_env(&vars);
    }

    #[test]
    fn test_get_bool_invalid_uses_default() {
        let _guard = env_test_lock();
        let vars = ["NSA_BAD_BOOL"];
        cleanup_env(&vars);

        set_env("NSA_BAD_BOOL", "maybe");
        let mut parser = EnvParser::new();
        let result = parser.get_bool("BAD_BOOL", false);
        assert!(!result.value);
        assert!(parser.has_errors());

        cleanup_env(&vars);
    }

    #[test]
    fn test_get_optional_range_rejects_out_of_range() {
        let _guard = env_test_lock();
        let vars = ["NSA_TEST_PORT_OOR"];
        cleanup_env(&vars);

        set_env("NSA_TEST_PORT_OOR", "70000");
        let mut parser = EnvParser::new();
        let result = parser.get_optional_range("TEST_PORT_OOR", "port", 1u16, u16::MAX);
        assert_eq!(result.value, None);
        assert!(matches!(parser.errors()[0], EnvError::InvalidValue { .. }));

        set_env("NSA_TEST_PORT_OOR", "0");
        let mut parser = EnvParser::new();
        let result = parser.get_optional_range("TEST_PORT_OOR", "port", 1u16, u16::MAX);
        assert_eq!(result.value, None);
        assert!(matches!(parser.errors()[0], EnvError::OutOfRange { .. }));

        cleanup_env(&vars);
    }

    #[test]
    fn test_get_optional_path_expands_home() {
        let _guard = env_test_lock();
        let vars = ["NSA_TEST_PATH", "HOME"];
        let saved_home = env::var("HOME").ok();

        set_env("HOME", "/home/ci");
        set_env("NSA_TEST_PATH", "~/artifacts");
        let mut parser = EnvParser::new();
        let result = parser.get_optional_path("TEST_PATH");
        assert_eq!(result.value, Some(PathBuf::from("/home/ci/artifacts")));
        assert_eq!(result.env_var.as_deref(), Some("NSA_TEST_PATH"));

        cleanup_env(&vars);
        if let Some(home) = saved_home {
            set_env("HOME", &home);
        }
    }

    #[test]
    fn test_get_log_level_invalid() {
        let _guard = env_test_lock();
        let vars = ["NSA_LOG_LEVEL"];
        cleanup_env(&vars);

        set_env("NSA_LOG_LEVEL", "verbose");
        let mut parser = EnvParser::new();
        let result = parser.get_log_level("LOG_LEVEL", "info");
        assert!(parser.has_errors());
        assert_eq!(result.value, "info");

        set_env("NSA_LOG_LEVEL", "DEBUG");
        let mut parser = EnvParser::new();
        assert_eq!(parser.get_log_level("LOG_LEVEL", "info").value, "debug");

        cleanup_env(&vars);
    }

    #[test]
    fn test_get_optional_string() {
        let _guard = env_test_lock();
        let vars = ["NSA_TEST_OPT"];
        cleanup_env(&vars);

        // Not set
        let mut parser = EnvParser::new();
        let result = parser.get_optional_string("TEST_OPT");
        assert!(result.value.is_none());
        assert_eq!(result.source, ConfigSource::Default);

        // Set to empty
        set_env("NSA_TEST_OPT", "");
        let mut parser = EnvParser::new();
        assert!(parser.get_optional_string("TEST_OPT").value.is_none());

        // Set to value
        set_env("NSA_TEST_OPT", "value");
        let mut parser = EnvParser::new();
        let result = parser.get_optional_string("TEST_OPT");
        assert_eq!(result.value, Some("value".to_string()));
        assert_eq!(result.env_var.as_deref(), Some("NSA_TEST_OPT"));

        cleanup_env(&vars);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn test_parse_bool_valid_only(s in "[a-zA-Z0-9_-]{0,20}") {
            let result = parse_bool(&s);
            let valid = ["1", "true", "yes", "on", "0", "false", "no", "off", ""];
            let is_valid = valid.iter().any(|v| s.eq_ignore_ascii_case(v));
            prop_assert_eq!(result.is_some(), is_valid);
        }

        #[test]
        fn test_env_parser_get_optional_range(value in "[-0-9a-zA-Z.]{0,12}") {
            let _guard = env_test_lock();
            let var = "NSA_PROPTEST_I32";
            cleanup_env(&[var]);

            set_env(var, &value);
            let mut parser = EnvParser::new();
            let result = parser.get_optional_range("PROPTEST_I32", "integer", 0, 100);

            match value.parse::<i32>() {
                Ok(n) if (0..=100).contains(&n) => {
                    prop_assert_eq!(result.value, Some(n));
                    prop_assert!(!parser.has_errors());
                }
                _ => {
                    prop_assert_eq!(result.value, None);
                    prop_assert!(parser.has_errors());
                }
            }

            cleanup_env(&[var]);
        }
    }
}
