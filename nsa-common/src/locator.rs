//! Artifact lookup across the artifacts and workspace directories.
//!
//! A build may declare its binary as an absolute path or as a name relative
//! to either the artifacts directory or the workspace. [`locate_file`] is
//! existence-only; [`locate_matching`] lets the caller reject candidates and
//! keep searching. Both record a decision trace for troubleshooting.

use std::fmt;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Result of probing one candidate location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Missing,
    NotAFile,
    /// A regular file the caller's predicate declined.
    Rejected,
    Found,
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "missing"),
            Self::NotAFile => write!(f, "not_a_file"),
            Self::Rejected => write!(f, "rejected"),
            Self::Found => write!(f, "found"),
        }
    }
}

/// Structured trace for lookup decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocateDecision {
    ReceivedInput { reference: PathBuf, label: String },
    AbsoluteInput(PathBuf),
    Probed {
        candidate: PathBuf,
        outcome: ProbeOutcome,
    },
    Resolved(PathBuf),
}

impl fmt::Display for LocateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReceivedInput { reference, label } => {
                write!(f, "received_input={} label={label}", reference.display())
            }
            Self::AbsoluteInput(path) => write!(f, "absolute_input={}", path.display()),
            Self::Probed { candidate, outcome } => {
                write!(f, "probed={} outcome={}", candidate.display(), outcome)
            }
            Self::Resolved(path) => write!(f, "resolved={}", path.display()),
        }
    }
}

/// A file that was found, with the trace that led to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedFile {
    path: PathBuf,
    decisions: Vec<LocateDecision>,
}

impl LocatedFile {
    /// Absolute path of the located file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }

    /// Structured decision trace for diagnostics.
    pub fn decision_trace(&self) -> &[LocateDecision] {
        &self.decisions
    }
}

/// No candidate location held an acceptable regular file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{label} not found: {}", .reference.display())]
pub struct LocateMiss {
    reference: PathBuf,
    label: String,
    decisions: Vec<LocateDecision>,
}

impl LocateMiss {
    pub fn reference(&self) -> &Path {
        &self.reference
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Every candidate path that was probed, in order.
    pub fn searched(&self) -> Vec<PathBuf> {
        self.decisions
            .iter()
            .filter_map(|d| match d {
                LocateDecision::Probed { candidate, .. } => Some(candidate.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn decision_trace(&self) -> &[LocateDecision] {
        &self.decisions
    }
}

/// Whether `path_or_name` names an existing regular file.
///
/// Absolute paths are checked directly and both directories are ignored.
/// Relative names are tried under `preferred_dir`, then `fallback_dir`.
/// `label` only appears in diagnostics.
pub fn has_file(
    preferred_dir: &Path,
    fallback_dir: &Path,
    path_or_name: &str,
    label: &str,
) -> bool {
    locate_file(preferred_dir, fallback_dir, Path::new(path_or_name), label).is_ok()
}

/// Resolve `reference` to an absolute path using the same rules as
/// [`has_file`].
pub fn locate_file(
    preferred_dir: &Path,
    fallback_dir: &Path,
    reference: &Path,
    label: &str,
) -> Result<LocatedFile, LocateMiss> {
    locate_matching(preferred_dir, fallback_dir, reference, label, |_| true)
}

/// Like [`locate_file`], but a regular file only matches when `accept`
/// returns true for its metadata. A declined candidate is recorded as
/// [`ProbeOutcome::Rejected`] and the search moves on to the next one.
pub fn locate_matching<F>(
    preferred_dir: &Path,
    fallback_dir: &Path,
    reference: &Path,
    label: &str,
    accept: F,
) -> Result<LocatedFile, LocateMiss>
where
    F: Fn(&Metadata) -> bool,
{
    let mut decisions = vec![LocateDecision::ReceivedInput {
        reference: reference.to_path_buf(),
        label: label.to_string(),
    }];

    let candidates = if reference.is_absolute() {
        decisions.push(LocateDecision::AbsoluteInput(reference.to_path_buf()));
        vec![reference.to_path_buf()]
    } else {
        vec![preferred_dir.join(reference), fallback_dir.join(reference)]
    };

    for candidate in candidates {
        let outcome = probe(&candidate, &accept);
        debug!(
            label,
            candidate = %candidate.display(),
            %outcome,
            "artifact_probe"
        );
        decisions.push(LocateDecision::Probed {
            candidate: candidate.clone(),
            outcome,
        });

        if outcome == ProbeOutcome::Found {
            let path = std::path::absolute(&candidate).unwrap_or(candidate);
            decisions.push(LocateDecision::Resolved(path.clone()));
            return Ok(LocatedFile { path, decisions });
        }
    }

    Err(LocateMiss {
        reference: reference.to_path_buf(),
        label: label.to_string(),
        decisions,
    })
}

fn probe(candidate: &Path, accept: impl Fn(&Metadata) -> bool) -> ProbeOutcome {
    match std::fs::metadata(candidate) {
        Ok(meta) if meta.is_file() && accept(&meta) => ProbeOutcome::Found,
        Ok(meta) if meta.is_file() => ProbeOutcome::Rejected,
        Ok(_) => ProbeOutcome::NotAFile,
        Err(_) => ProbeOutcome::Missing,
    }
}
