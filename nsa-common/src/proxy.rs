//! Proxy settings forwarded to the scan client.

use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP proxy settings.
///
/// The adapter forwards this value unchanged; only the scan client
/// interprets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxySettings {
    /// Proxy hostname. Empty means no proxy is configured.
    #[serde(default)]
    pub host: String,
    /// Proxy port (0 when unset).
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl ProxySettings {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            username: None,
            password: None,
        }
    }

    /// Attach proxy credentials.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Whether a proxy host has been set.
    pub fn is_configured(&self) -> bool {
        !self.host.is_empty()
    }
}

impl fmt::Display for ProxySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_configured() {
            return write!(f, "<none>");
        }
        if let Some(user) = &self.username {
            let secret = if self.password.is_some() { ":***" } else { "" };
            write!(f, "{user}{secret}@")?;
        }
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unconfigured() {
        let proxy = ProxySettings::default();
        assert!(!proxy.is_configured());
        assert_eq!(proxy.to_string(), "<none>");
    }

    #[test]
    fn display_masks_password() {
        let proxy = ProxySettings::new("proxy.internal", 3128).with_credentials("ci", "hunter2");
        let rendered = proxy.to_string();
        assert_eq!(rendered, "ci:***@proxy.internal:3128");
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn deserializes_with_missing_fields() {
        let proxy: ProxySettings = serde_json::from_str(r#"{"host":"p","port":8080}"#).unwrap();
        assert_eq!(proxy, ProxySettings::new("p", 8080));
    }
}
