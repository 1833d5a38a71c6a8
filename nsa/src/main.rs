//! NSA - build parameter validation
//!
//! Assembles the security test parameters of a build step from a TOML file,
//! `NSA_*` environment variables and flags, validates them, and prints the
//! resolved configuration for the scan step that follows.

#![forbid(unsafe_code)]

mod validate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use nsa_common::{LogConfig, init_logging};
use validate::{ValidateArgs, ValidateOutcome};

/// Exit code used when the parameters are rejected.
const EXIT_REJECTED: i32 = 2;

#[derive(Parser)]
#[command(name = "nsa")]
#[command(author, version, about = "NSA - validate security test build parameters")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate build parameters and print the resolved configuration
    Validate(ValidateArgs),

    /// Print the error catalog
    Errors,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env("warn");
    if cli.verbose {
        log_config = log_config.with_level("debug");
    }
    init_logging(&log_config)?;

    match cli.command {
        Commands::Validate(args) => match validate::run(&args, cli.verbose)? {
            ValidateOutcome::Valid(params) => {
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&params.snapshot())?);
                } else {
                    println!("{params}");
                }
                Ok(())
            }
            ValidateOutcome::Rejected(err) => {
                eprintln!("error: {err}\n");
                eprint!("{}", err.entry().format_full());
                std::process::exit(EXIT_REJECTED);
            }
        },
        Commands::Errors => {
            for code in nsa_common::errors::ErrorCode::all() {
                println!("{}", code.entry().format_full());
            }
            Ok(())
        }
    }
}
