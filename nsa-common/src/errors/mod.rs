//! Error definitions for NSA build parameter handling.
//!
//! [`ValidationError`] is the single failure type of
//! [`ParamsAdapter::new`](crate::ParamsAdapter::new). Every variant is fatal
//! to the build step; the catalog supplies the code and remediation text
//! shown to the user.

pub mod catalog;

pub use catalog::{ErrorCategory, ErrorCode, ErrorEntry};

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a set of build parameters was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The resolved API key was absent or empty.
    #[error("API key is missing or empty")]
    MissingCredential,

    /// Neither a path string nor a file handle was supplied.
    #[error("no binary file was specified")]
    MissingArtifact,

    /// A file reference was supplied but no non-empty file matched it.
    #[error("{label} not found: {reference} (searched: {})", display_paths(.searched))]
    ArtifactNotFound {
        reference: String,
        label: String,
        searched: Vec<PathBuf>,
    },
}

/// Kind of a [`ValidationError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    MissingCredential,
    MissingArtifact,
    ArtifactNotFound,
}

impl ValidationErrorKind {
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MissingCredential => ErrorCode::MissingCredential,
            Self::MissingArtifact => ErrorCode::MissingArtifact,
            Self::ArtifactNotFound => ErrorCode::ArtifactNotFound,
        }
    }
}

impl ValidationError {
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            Self::MissingCredential => ValidationErrorKind::MissingCredential,
            Self::MissingArtifact => ValidationErrorKind::MissingArtifact,
            Self::ArtifactNotFound { .. } => ValidationErrorKind::ArtifactNotFound,
        }
    }

    /// Catalog code for this error.
    pub fn code(&self) -> ErrorCode {
        self.kind().code()
    }

    /// Catalog entry with remediation steps.
    pub fn entry(&self) -> ErrorEntry {
        self.code().entry()
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "<none>".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_catalog_codes() {
        assert_eq!(
            ValidationError::MissingCredential.code().code_string(),
            "NSA-E001"
        );
        assert_eq!(
            ValidationError::MissingArtifact.code().code_string(),
            "NSA-E002"
        );
        let not_found = ValidationError::ArtifactNotFound {
            reference: "app.apk".into(),
            label: "binary".into(),
            searched: vec![],
        };
        assert_eq!(not_found.kind(), ValidationErrorKind::ArtifactNotFound);
        assert_eq!(not_found.code().code_string(), "NSA-E003");
    }

    #[test]
    fn not_found_message_lists_searched_paths() {
        let err = ValidationError::ArtifactNotFound {
            reference: "app.apk".into(),
            label: "binary".into(),
            searched: vec![PathBuf::from("/art/app.apk"), PathBuf::from("/ws/app.apk")],
        };
        assert_eq!(
            err.to_string(),
            "binary not found: app.apk (searched: /art/app.apk, /ws/app.apk)"
        );
    }

    #[test]
    fn not_found_message_without_candidates() {
        let err = ValidationError::ArtifactNotFound {
            reference: "x".into(),
            label: "binary".into(),
            searched: vec![],
        };
        assert!(err.to_string().ends_with("(searched: <none>)"));
    }
}
