//! Validated build parameters for a security test step.
//!
//! [`ParamsAdapter::new`] reconciles the job's [`RawParameters`] with the
//! explicit values of one build invocation. Validation is fail-fast in this
//! order: API key, file reference, file lookup. Only then are the derived
//! wait and score settings computed and the pass-through fields copied.

use crate::errors::ValidationError;
use crate::locator::locate_matching;
use crate::proxy::ProxySettings;
use crate::source::{AdapterRequest, RawParameters, WaitOverload};
use crate::util::{NONE_PLACEHOLDER, display_optional, mask_optional_secret, mask_secret};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Endpoint used when the job does not configure one.
pub const DEFAULT_API_URL: &str = "https://lab-api.nowsecure.com";

/// Tool name reported when the caller does not supply one.
pub const DEFAULT_TOOL_NAME: &str = "nsa";

const ARTIFACT_LABEL: &str = "binary file";

/// Immutable, validated configuration for one build invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamsAdapter {
    api_key: String,
    api_url: String,
    artifacts_dir: PathBuf,
    workspace_dir: PathBuf,
    file: PathBuf,
    description: String,
    group: String,
    wait_minutes: i32,
    score_threshold: i32,
    username: Option<String>,
    password: Option<String>,
    show_status_messages: bool,
    stop_tests_for_status_message: Option<String>,
    proxy_settings: ProxySettings,
    proxy_enabled: bool,
    validate_dns_url_connection_enabled: bool,
    tool_name: String,
    debug: bool,
}

impl ParamsAdapter {
    /// Validate `source` together with `request`.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::MissingCredential`] when the resolved API key is
    ///   empty. Checked before any filesystem access.
    /// - [`ValidationError::MissingArtifact`] when no file reference was
    ///   supplied.
    /// - [`ValidationError::ArtifactNotFound`] when the reference does not
    ///   resolve to a non-empty regular file under the artifacts directory,
    ///   the workspace, or as an absolute path.
    pub fn new(source: &RawParameters, request: AdapterRequest) -> Result<Self, ValidationError> {
        let AdapterRequest {
            api_key,
            workspace_dir,
            artifacts_dir,
            file,
            wait_enabled,
            score_enabled,
            tool_name,
            username,
            password,
            show_status_messages,
            stop_tests_for_status_message,
            proxy_settings,
            wait_overload,
        } = request;

        let api_key = api_key.unwrap_or_else(|| source.api_key.clone());
        if api_key.is_empty() {
            warn!("build parameters rejected: empty API key");
            return Err(ValidationError::MissingCredential);
        }

        let reference = match file {
            Some(reference) if !reference.is_empty() => reference,
            _ => {
                warn!("build parameters rejected: no binary file specified");
                return Err(ValidationError::MissingArtifact);
            }
        };

        let workspace_dir = absolute_or_self(workspace_dir);
        let artifacts_dir = artifacts_dir
            .or_else(|| source.artifacts_dir.clone())
            .map_or_else(|| workspace_dir.clone(), absolute_or_self);

        let located = locate_matching(
            &artifacts_dir,
            &workspace_dir,
            reference.as_path(),
            ARTIFACT_LABEL,
            |meta| meta.len() > 0,
        )
        .map_err(|miss| {
            warn!(
                reference = %reference,
                searched = ?miss.searched(),
                "build parameters rejected: no non-empty binary file found"
            );
            ValidationError::ArtifactNotFound {
                reference: reference.to_string(),
                label: ARTIFACT_LABEL.to_string(),
                searched: miss.searched(),
            }
        })?;
        debug!(decisions = ?located.decision_trace(), "binary file located");
        let file = located.into_path();

        let api_url = if source.api_url.is_empty() {
            DEFAULT_API_URL.to_string()
        } else {
            source.api_url.clone()
        };

        let params = Self {
            api_key,
            api_url,
            artifacts_dir,
            workspace_dir,
            file,
            description: source.description.clone(),
            group: source.group.clone(),
            wait_minutes: if wait_enabled { source.wait_minutes } else { 0 },
            score_threshold: if score_enabled {
                source.score_threshold
            } else {
                0
            },
            username: username.or_else(|| source.username.clone()),
            password: password.or_else(|| source.password.clone()),
            show_status_messages: show_status_messages.unwrap_or(source.show_status_messages),
            stop_tests_for_status_message: stop_tests_for_status_message
                .or_else(|| source.stop_tests_for_status_message.clone()),
            proxy_settings: proxy_settings.unwrap_or_else(|| source.proxy_settings.clone()),
            proxy_enabled: source.proxy_enabled,
            validate_dns_url_connection_enabled: source.validate_dns_url_connection_enabled,
            tool_name: tool_name.unwrap_or_else(|| DEFAULT_TOOL_NAME.to_string()),
            debug: source.debug || wait_overload == WaitOverload::Verbose,
        };

        info!(
            tool = %params.tool_name,
            file = %params.file.display(),
            wait_minutes = params.wait_minutes,
            score_threshold = params.score_threshold,
            "build parameters validated"
        );
        if params.debug {
            info!(params = %params, "resolved build parameters");
        }

        Ok(params)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Directory relative file references were resolved against first.
    pub fn artifacts_dir(&self) -> &Path {
        &self.artifacts_dir
    }

    pub fn workspace_dir(&self) -> &Path {
        &self.workspace_dir
    }

    /// Absolute path of the binary under test.
    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    /// Minutes to wait for results; 0 when waiting is disabled.
    pub fn wait_minutes(&self) -> i32 {
        self.wait_minutes
    }

    /// [`Self::wait_minutes`] as a duration. Negative values yield zero.
    pub fn wait_timeout(&self) -> Duration {
        let minutes = u64::try_from(self.wait_minutes).unwrap_or(0);
        Duration::from_secs(minutes.saturating_mul(60))
    }

    /// Minimum acceptable score; 0 when scoring is disabled.
    pub fn score_threshold(&self) -> i32 {
        self.score_threshold
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn show_status_messages(&self) -> bool {
        self.show_status_messages
    }

    pub fn stop_tests_for_status_message(&self) -> Option<&str> {
        self.stop_tests_for_status_message.as_deref()
    }

    pub fn proxy_settings(&self) -> &ProxySettings {
        &self.proxy_settings
    }

    pub fn proxy_enabled(&self) -> bool {
        self.proxy_enabled
    }

    pub fn validate_dns_url_connection_enabled(&self) -> bool {
        self.validate_dns_url_connection_enabled
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Masked, serializable view of every resolved field.
    pub fn snapshot(&self) -> ParamsSnapshot {
        ParamsSnapshot {
            tool_name: self.tool_name.clone(),
            api_url: self.api_url.clone(),
            api_key: mask_secret(&self.api_key),
            artifacts_dir: self.artifacts_dir.display().to_string(),
            workspace_dir: self.workspace_dir.display().to_string(),
            file: self.file.display().to_string(),
            description: self.description.clone(),
            group: self.group.clone(),
            wait_minutes: self.wait_minutes,
            score_threshold: self.score_threshold,
            username: display_optional(self.username.as_deref()).to_string(),
            password: mask_optional_secret(self.password.as_deref()),
            show_status_messages: self.show_status_messages,
            stop_tests_for_status_message: display_optional(
                self.stop_tests_for_status_message.as_deref(),
            )
            .to_string(),
            proxy: self.proxy_settings.to_string(),
            proxy_enabled: self.proxy_enabled,
            validate_dns_url_connection_enabled: self.validate_dns_url_connection_enabled,
            debug: self.debug,
        }
    }
}

impl fmt::Display for ParamsAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.snapshot())
    }
}

/// Diagnostic rendering of a [`ParamsAdapter`] with secrets masked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamsSnapshot {
    pub tool_name: String,
    pub api_url: String,
    pub api_key: String,
    pub artifacts_dir: String,
    pub workspace_dir: String,
    pub file: String,
    pub description: String,
    pub group: String,
    pub wait_minutes: i32,
    pub score_threshold: i32,
    pub username: String,
    pub password: String,
    pub show_status_messages: bool,
    pub stop_tests_for_status_message: String,
    pub proxy: String,
    pub proxy_enabled: bool,
    pub validate_dns_url_connection_enabled: bool,
    pub debug: bool,
}

impl fmt::Display for ParamsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn text(s: &str) -> &str {
            if s.is_empty() { NONE_PLACEHOLDER } else { s }
        }

        write!(
            f,
            "ParamsAdapter{{tool={}, api_url={}, api_key={}, artifacts_dir={}, workspace_dir={}, \
             file={}, description={}, group={}, wait_minutes={}, score_threshold={}, \
             username={}, password={}, show_status_messages={}, \
             stop_tests_for_status_message={}, proxy={}, proxy_enabled={}, \
             validate_dns_url_connection_enabled={}, debug={}}}",
            self.tool_name,
            self.api_url,
            self.api_key,
            self.artifacts_dir,
            self.workspace_dir,
            self.file,
            text(&self.description),
            text(&self.group),
            self.wait_minutes,
            self.score_threshold,
            self.username,
            self.password,
            self.show_status_messages,
            self.stop_tests_for_status_message,
            self.proxy,
            self.proxy_enabled,
            self.validate_dns_url_connection_enabled,
            self.debug,
        )
    }
}

fn absolute_or_self(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}
