//! `nsa validate`: assemble and validate build parameters.

use anyhow::{Context, Result};
use clap::Args;
use nsa_common::config::{EnvParser, load_or_default};
use nsa_common::errors::ErrorCode;
use nsa_common::{
    AdapterRequest, FileReference, ParamsAdapter, RawParameters, ValidationError, WaitOverload,
};
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Parameter file (defaults to <config dir>/nsa/params.toml when present)
    #[arg(short, long, env = "NSA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Build workspace directory (defaults to the current directory)
    #[arg(short, long, env = "NSA_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Directory searched first for relative binary paths
    #[arg(long)]
    pub artifacts_dir: Option<PathBuf>,

    /// Binary under test, absolute or relative to the artifacts dir or workspace
    #[arg(short, long)]
    pub binary: Option<String>,

    /// API key, overriding the parameter file and NSA_API_KEY
    #[arg(long)]
    pub api_key: Option<String>,

    /// Do not wait for scan results
    #[arg(long)]
    pub no_wait: bool,

    /// Do not enforce the score threshold
    #[arg(long)]
    pub no_score: bool,

    /// Tool name reported to the scan service
    #[arg(long)]
    pub tool_name: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    /// Show scan status messages in the build log (`--show-status-messages=false`
    /// turns off a configured value)
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub show_status_messages: Option<bool>,

    /// Status message that stops the tests when reported
    #[arg(long)]
    pub stop_message: Option<String>,

    /// Print the resolved configuration as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a validation run that did not hit an I/O or config error.
#[derive(Debug)]
pub enum ValidateOutcome {
    Valid(ParamsAdapter),
    Rejected(ValidationError),
}

pub fn run(args: &ValidateArgs, verbose: bool) -> Result<ValidateOutcome> {
    let loaded = load_or_default(args.config.as_deref()).map_err(|err| {
        let code = err.code();
        anyhow::Error::new(err).context(code.entry().format_brief())
    })?;
    let source = loaded.source;
    let mut raw = loaded.value;

    let mut parser = EnvParser::new();
    let applied = raw.apply_env(&mut parser);
    for err in parser.errors() {
        warn!(code = %ErrorCode::ConfigEnvError, "{err}");
    }
    debug!(%source, env_vars = ?applied, "parameters assembled");

    let workspace = match &args.workspace {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("failed to determine current directory")?,
    };

    let request = build_request(args, &raw, workspace, verbose);
    Ok(match ParamsAdapter::new(&raw, request) {
        Ok(params) => ValidateOutcome::Valid(params),
        Err(err) => ValidateOutcome::Rejected(err),
    })
}

/// Map flags onto adapter overrides. `--binary` wins over the configured
/// binary file.
fn build_request(
    args: &ValidateArgs,
    raw: &RawParameters,
    workspace: PathBuf,
    verbose: bool,
) -> AdapterRequest {
    let mut request = AdapterRequest::new(workspace)
        .with_wait(!args.no_wait)
        .with_score(!args.no_score)
        .with_wait_overload(if verbose {
            WaitOverload::Verbose
        } else {
            WaitOverload::Standard
        });

    request.api_key = args.api_key.clone();
    request.artifacts_dir = args.artifacts_dir.clone();
    request.file = match (&args.binary, &raw.binary_file) {
        (Some(path), _) => Some(FileReference::Path(path.clone())),
        (None, Some(handle)) => Some(FileReference::Handle(handle.clone())),
        (None, None) => None,
    };
    request.tool_name = args.tool_name.clone();
    request.username = args.username.clone();
    request.password = args.password.clone();
    request.show_status_messages = args.show_status_messages;
    request.stop_tests_for_status_message = args.stop_message.clone();
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ValidateArgs,
    }

    fn parse(argv: &[&str]) -> ValidateArgs {
        TestCli::try_parse_from(std::iter::once("nsa").chain(argv.iter().copied()))
            .expect("parse args")
            .args
    }

    #[test]
    fn flags_map_to_overrides() {
        let args = parse(&[
            "--binary",
            "app.apk",
            "--api-key",
            "k",
            "--no-wait",
            "--show-status-messages",
            "--stop-message",
            "halt",
        ]);
        let raw = RawParameters {
            binary_file: Some(PathBuf::from("/configured/app.ipa")),
            ..RawParameters::default()
        };

        let request = build_request(&args, &raw, PathBuf::from("/ws"), false);
        assert_eq!(request.file, Some(FileReference::Path("app.apk".into())));
        assert_eq!(request.api_key.as_deref(), Some("k"));
        assert!(!request.wait_enabled);
        assert!(request.score_enabled);
        assert_eq!(request.show_status_messages, Some(true));
        assert_eq!(request.stop_tests_for_status_message.as_deref(), Some("halt"));
        assert_eq!(request.wait_overload, WaitOverload::Standard);
    }

    #[test]
    fn configured_binary_used_as_handle() {
        let args = parse(&[]);
        let raw = RawParameters {
            binary_file: Some(PathBuf::from("/configured/app.ipa")),
            ..RawParameters::default()
        };

        let request = build_request(&args, &raw, PathBuf::from("/ws"), true);
        assert_eq!(
            request.file,
            Some(FileReference::Handle(PathBuf::from("/configured/app.ipa")))
        );
        assert_eq!(request.show_status_messages, None);
        assert_eq!(request.wait_overload, WaitOverload::Verbose);
    }

    #[test]
    fn status_messages_flag_can_turn_off_configured_value() {
        assert_eq!(parse(&[]).show_status_messages, None);
        assert_eq!(parse(&["--show-status-messages"]).show_status_messages, Some(true));
        let args = parse(&["--show-status-messages=false"]);
        assert_eq!(args.show_status_messages, Some(false));

        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("app.apk"), "apk bytes").expect("write apk");
        let config = dir.path().join("params.toml");
        fs::write(&config, "show_status_messages = true\n").expect("write params");

        let args = ValidateArgs {
            config: Some(config),
            workspace: Some(dir.path().to_path_buf()),
            binary: Some("app.apk".to_string()),
            api_key: Some("cli-token".to_string()),
            ..args
        };
        match run(&args, false).expect("run validate") {
            ValidateOutcome::Valid(params) => assert!(!params.show_status_messages()),
            ValidateOutcome::Rejected(err) => panic!("unexpected rejection: {err}"),
        }
    }

    #[test]
    fn run_validates_against_parameter_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("app.apk"), "apk bytes").expect("write apk");
        let config = dir.path().join("params.toml");
        fs::write(&config, "wait_minutes = 30\nscore_threshold = 70\n").expect("write params");

        let args = ValidateArgs {
            config: Some(config),
            workspace: Some(dir.path().to_path_buf()),
            binary: Some("app.apk".to_string()),
            api_key: Some("cli-token".to_string()),
            ..ValidateArgs::default()
        };

        match run(&args, false).expect("run validate") {
            ValidateOutcome::Valid(params) => {
                assert_eq!(params.api_key(), "cli-token");
                assert_eq!(params.file(), dir.path().join("app.apk"));
            }
            ValidateOutcome::Rejected(err) => panic!("unexpected rejection: {err}"),
        }
    }

    #[test]
    fn run_reports_missing_binary() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = dir.path().join("params.toml");
        fs::write(&config, "").expect("write params");

        let args = ValidateArgs {
            config: Some(config),
            workspace: Some(dir.path().to_path_buf()),
            artifacts_dir: Some(dir.path().to_path_buf()),
            binary: Some("missing.apk".to_string()),
            api_key: Some("cli-token".to_string()),
            ..ValidateArgs::default()
        };

        match run(&args, false).expect("run validate") {
            ValidateOutcome::Rejected(err) => {
                assert_eq!(err.code(), ErrorCode::ArtifactNotFound);
            }
            ValidateOutcome::Valid(_) => panic!("missing binary must be rejected"),
        }
    }

    #[test]
    fn run_fails_on_unreadable_config() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let args = ValidateArgs {
            config: Some(dir.path().join("absent.toml")),
            ..ValidateArgs::default()
        };

        let err = run(&args, false).expect_err("missing config file");
        assert!(err.to_string().contains("NSA-E010"));
    }
}
