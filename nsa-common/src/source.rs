//! Raw build inputs and the explicit overrides supplied per invocation.

use crate::proxy::ProxySettings;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Unvalidated build-job inputs as provided by the job configuration.
///
/// Every field defaults so partial TOML/JSON documents deserialize. The
/// adapter only ever reads from this value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawParameters {
    /// Security test API token. Empty means unset.
    pub api_key: String,
    /// API base URL. Empty means use the default endpoint.
    pub api_url: String,
    pub artifacts_dir: Option<PathBuf>,
    /// Binary under test as configured on the job.
    pub binary_file: Option<PathBuf>,
    pub description: String,
    pub group: String,
    /// Minimum acceptable security score.
    pub score_threshold: i32,
    /// Minutes to wait for scan results.
    pub wait_minutes: i32,
    pub username: Option<String>,
    pub password: Option<String>,
    pub show_status_messages: bool,
    /// Status message that halts testing when reported by the scan.
    pub stop_tests_for_status_message: Option<String>,
    pub debug: bool,
    pub proxy_settings: ProxySettings,
    pub proxy_enabled: bool,
    pub validate_dns_url_connection_enabled: bool,
}

/// How the binary under test was referenced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileReference {
    /// A user-declared path, absolute or relative to the artifacts or
    /// workspace directory.
    Path(String),
    /// A file the caller has already resolved.
    Handle(PathBuf),
}

impl FileReference {
    /// The reference as a path for the locator.
    pub fn as_path(&self) -> &Path {
        match self {
            Self::Path(raw) => Path::new(raw),
            Self::Handle(path) => path,
        }
    }

    /// Whether the reference names nothing at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Path(raw) => raw.is_empty(),
            Self::Handle(path) => path.as_os_str().is_empty(),
        }
    }
}

impl fmt::Display for FileReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(raw) => write!(f, "{raw}"),
            Self::Handle(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Selects between the standard and verbose invocation shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitOverload {
    /// Debug output follows the source's debug flag.
    #[default]
    Standard,
    /// Debug output is forced on.
    Verbose,
}

/// Explicit values supplied by the build step alongside [`RawParameters`].
///
/// `Some` overrides win over the source's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterRequest {
    pub api_key: Option<String>,
    pub workspace_dir: PathBuf,
    pub artifacts_dir: Option<PathBuf>,
    pub file: Option<FileReference>,
    pub wait_enabled: bool,
    pub score_enabled: bool,
    pub tool_name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub show_status_messages: Option<bool>,
    pub stop_tests_for_status_message: Option<String>,
    pub proxy_settings: Option<ProxySettings>,
    pub wait_overload: WaitOverload,
}

impl AdapterRequest {
    /// Create a request rooted at `workspace_dir` with waiting and scoring
    /// enabled and no overrides.
    pub fn new(workspace_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_key: None,
            workspace_dir: workspace_dir.into(),
            artifacts_dir: None,
            file: None,
            wait_enabled: true,
            score_enabled: true,
            tool_name: None,
            username: None,
            password: None,
            show_status_messages: None,
            stop_tests_for_status_message: None,
            proxy_settings: None,
            wait_overload: WaitOverload::Standard,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_artifacts_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.artifacts_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Reference the binary by a path string.
    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file = Some(FileReference::Path(path.into()));
        self
    }

    /// Reference the binary by an already-resolved file.
    pub fn with_file_handle(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(FileReference::Handle(path.into()));
        self
    }

    pub fn with_wait(mut self, enabled: bool) -> Self {
        self.wait_enabled = enabled;
        self
    }

    pub fn with_score(mut self, enabled: bool) -> Self {
        self.score_enabled = enabled;
        self
    }

    pub fn with_tool_name(mut self, name: impl Into<String>) -> Self {
        self.tool_name = Some(name.into());
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_status_messages(mut self, show: bool, stop_message: Option<String>) -> Self {
        self.show_status_messages = Some(show);
        self.stop_tests_for_status_message = stop_message;
        self
    }

    pub fn with_proxy(mut self, proxy: ProxySettings) -> Self {
        self.proxy_settings = Some(proxy);
        self
    }

    pub fn with_wait_overload(mut self, overload: WaitOverload) -> Self {
        self.wait_overload = overload;
        self
    }
}
