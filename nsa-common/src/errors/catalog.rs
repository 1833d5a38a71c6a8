//! Error catalog for NSA build parameter handling.
//!
//! Each error code carries a stable `NSA-Exxx` identifier, a message and
//! remediation steps that the build step surfaces to the user when it aborts.
//!
//! | Range      | Category    | Description                          |
//! |------------|-------------|--------------------------------------|
//! | E001-E009  | Validation  | Build parameter validation failures  |
//! | E010-E019  | Config      | Configuration loading errors         |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Validation,
    Config,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Config => write!(f, "config"),
        }
    }
}

/// Error code enumeration covering all NSA error scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorCode {
    // =========================================================================
    // Validation Errors (E001-E009)
    // =========================================================================
    /// API key is missing or empty
    MissingCredential,
    /// No binary file was referenced
    MissingArtifact,
    /// Referenced binary could not be found
    ArtifactNotFound,

    // =========================================================================
    // Config Errors (E010-E019)
    // =========================================================================
    /// Configuration file could not be read
    ConfigReadError,
    /// Configuration file contains invalid TOML
    ConfigParseError,
    /// Environment variable has invalid value
    ConfigEnvError,
}

impl ErrorCode {
    /// All error codes, in code-number order.
    pub fn all() -> &'static [ErrorCode] {
        &[
            Self::MissingCredential,
            Self::MissingArtifact,
            Self::ArtifactNotFound,
            Self::ConfigReadError,
            Self::ConfigParseError,
            Self::ConfigEnvError,
        ]
    }

    /// Numeric part of the code.
    #[must_use]
    pub const fn code_number(&self) -> u16 {
        match self {
            Self::MissingCredential => 1,
            Self::MissingArtifact => 2,
            Self::ArtifactNotFound => 3,
            Self::ConfigReadError => 10,
            Self::ConfigParseError => 11,
            Self::ConfigEnvError => 12,
        }
    }

    /// Formatted code string, e.g. `NSA-E001`.
    #[must_use]
    pub fn code_string(&self) -> String {
        format!("NSA-E{:03}", self.code_number())
    }

    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self.code_number() {
            1..=9 => ErrorCategory::Validation,
            _ => ErrorCategory::Config,
        }
    }

    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::MissingCredential => "Security test API key is missing or empty",
            Self::MissingArtifact => "No binary file was specified for the security test",
            Self::ArtifactNotFound => "Binary file for the security test could not be found",
            Self::ConfigReadError => "Failed to read parameter file",
            Self::ConfigParseError => "Parameter file contains invalid TOML syntax",
            Self::ConfigEnvError => "Environment variable has invalid value",
        }
    }

    #[must_use]
    pub const fn remediation(&self) -> &'static [&'static str] {
        match self {
            Self::MissingCredential => &[
                "Set api_key in the job parameters or pass --api-key",
                "Check that the NSA_API_KEY credential is bound to this build",
            ],
            Self::MissingArtifact => &[
                "Set binary_file in the job parameters or pass --binary",
            ],
            Self::ArtifactNotFound => &[
                "Check that the build produced the binary before this step runs",
                "Relative paths resolve against the artifacts directory, then the workspace",
                "Zero-length files are rejected",
            ],
            Self::ConfigReadError => &["Check that the parameter file exists and is readable"],
            Self::ConfigParseError => &["Validate the file with a TOML linter"],
            Self::ConfigEnvError => {
                &["Run with --verbose to see which NSA_* variable was rejected"]
            }
        }
    }

    /// Build the full catalog entry.
    #[must_use]
    pub fn entry(&self) -> ErrorEntry {
        ErrorEntry {
            code: self.code_string(),
            category: self.category(),
            message: self.message().to_string(),
            remediation: self
                .remediation()
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code_string())
    }
}

/// Catalog entry for an error code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Error code string (e.g., "NSA-E001")
    pub code: String,
    pub category: ErrorCategory,
    pub message: String,
    /// Steps to remediate the error
    pub remediation: Vec<String>,
}

impl ErrorEntry {
    /// Formats the error for display with full remediation steps.
    #[must_use]
    pub fn format_full(&self) -> String {
        let mut output = format!("[{}] {}\n", self.code, self.message);

        if !self.remediation.is_empty() {
            output.push_str("\nRemediation steps:\n");
            for (i, step) in self.remediation.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, step));
            }
        }

        output
    }

    /// Formats the error as a single line.
    #[must_use]
    pub fn format_brief(&self) -> String {
        format!("[{}] {}", self.code, self.message)
    }
}

impl fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_brief())
    }
}
