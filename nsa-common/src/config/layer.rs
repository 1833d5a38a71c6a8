//! Overlay of `NSA_*` environment variables onto file parameters.

use super::env::{EnvError, EnvParser};
use super::source::Sourced;
use crate::source::RawParameters;
use tracing::debug;

impl RawParameters {
    /// Overwrite fields whose `NSA_*` variable is set.
    ///
    /// Invalid values leave the field unchanged and are recorded on
    /// `parser`. Returns the names of the variables that were applied.
    pub fn apply_env(&mut self, parser: &mut EnvParser) -> Vec<String> {
        let mut applied = Vec::new();
        let a = &mut applied;
        let int = "signed 32-bit integer";

        if let Some(v) = take(parser.get_optional_string("API_KEY"), a) {
            self.api_key = v;
        }
        if let Some(v) = take(parser.get_optional_string("API_URL"), a) {
            self.api_url = v;
        }
        if let Some(v) = take(parser.get_optional_path("ARTIFACTS_DIR"), a) {
            self.artifacts_dir = Some(v);
        }
        if let Some(v) = take(parser.get_optional_path("BINARY_FILE"), a) {
            self.binary_file = Some(v);
        }
        if let Some(v) = take(parser.get_optional_string("DESCRIPTION"), a) {
            self.description = v;
        }
        if let Some(v) = take(parser.get_optional_string("GROUP"), a) {
            self.group = v;
        }
        let score = parser.get_optional_range("SCORE_THRESHOLD", int, i32::MIN, i32::MAX);
        if let Some(v) = take(score, a) {
            self.score_threshold = v;
        }
        let wait = parser.get_optional_range("WAIT_MINUTES", int, i32::MIN, i32::MAX);
        if let Some(v) = take(wait, a) {
            self.wait_minutes = v;
        }
        if let Some(v) = take(parser.get_optional_string("USERNAME"), a) {
            self.username = Some(v);
        }
        if let Some(v) = take(parser.get_optional_string("PASSWORD"), a) {
            self.password = Some(v);
        }
        if let Some(v) = take(parser.get_optional_bool("SHOW_STATUS_MESSAGES"), a) {
            self.show_status_messages = v;
        }
        if let Some(v) = take(parser.get_optional_string("STOP_TESTS_FOR_STATUS_MESSAGE"), a) {
            self.stop_tests_for_status_message = Some(v);
        }
        if let Some(v) = take(parser.get_optional_bool("DEBUG"), a) {
            self.debug = v;
        }

        // Proxy
        if let Some(v) = take(parser.get_optional_string("PROXY_HOST"), a) {
            self.proxy_settings.host = v;
        }
        let port =
            parser.get_optional_range("PROXY_PORT", "unsigned 16-bit integer", 1u16, u16::MAX);
        if let Some(v) = take(port, a) {
            self.proxy_settings.port = v;
        }
        if let Some(v) = take(parser.get_optional_string("PROXY_USERNAME"), a) {
            self.proxy_settings.username = Some(v);
        }
        if let Some(v) = take(parser.get_optional_string("PROXY_PASSWORD"), a) {
            self.proxy_settings.password = Some(v);
        }
        if let Some(v) = take(parser.get_optional_bool("PROXY_ENABLED"), a) {
            self.proxy_enabled = v;
        }
        if let Some(v) = take(parser.get_optional_bool("VALIDATE_DNS_URL_CONNECTION"), a) {
            self.validate_dns_url_connection_enabled = v;
        }

        debug!(vars = ?applied, "applied environment overrides");
        applied
    }

    /// Convenience wrapper: apply the process environment with a fresh
    /// parser and return any parse errors.
    pub fn apply_process_env(&mut self) -> Vec<EnvError> {
        let mut parser = EnvParser::new();
        self.apply_env(&mut parser);
        parser.take_errors()
    }
}

fn take<T>(sourced: Sourced<Option<T>>, applied: &mut Vec<String>) -> Option<T> {
    let value = sourced.value?;
    if let Some(var) = sourced.env_var {
        applied.push(var);
    }
    Some(value)
}
