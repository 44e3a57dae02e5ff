//! # kyc CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kyc_cli::check::{run_check, CheckArgs};
use kyc_cli::run::{run_run, RunArgs};

/// KYC verification toolchain.
///
/// Offline document format checks and scripted verification of a complete
/// KYC form against the live provider or the in-process mock.
#[derive(Parser, Debug)]
#[command(name = "kyc", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check one document number's format without calling the provider.
    Check(CheckArgs),

    /// Verify a whole form loaded from a YAML or JSON file.
    Run(RunArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("kyc CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Check(args) => run_check(&args),
        Commands::Run(args) => run_run(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kyc_core::DocumentKind;
    use std::path::PathBuf;

    #[test]
    fn cli_parse_check() {
        let cli = Cli::try_parse_from(["kyc", "check", "pan", "ABCDE1234F"]).unwrap();
        if let Commands::Check(args) = cli.command {
            assert_eq!(args.kind, DocumentKind::Pan);
            assert_eq!(args.value, "ABCDE1234F");
        } else {
            panic!("expected check");
        }
    }

    #[test]
    fn cli_parse_check_account_number() {
        let cli = Cli::try_parse_from(["kyc", "check", "account-number", "123456789"]).unwrap();
        if let Commands::Check(args) = cli.command {
            assert_eq!(args.kind, DocumentKind::AccountNumber);
        }
    }

    #[test]
    fn cli_rejects_unknown_document_kind() {
        assert!(Cli::try_parse_from(["kyc", "check", "passport", "X1"]).is_err());
    }

    #[test]
    fn cli_parse_run_defaults() {
        let cli = Cli::try_parse_from(["kyc", "run", "--input", "form.yaml"]).unwrap();
        if let Commands::Run(args) = cli.command {
            assert_eq!(args.input, PathBuf::from("form.yaml"));
            assert!(!args.mock);
            assert!(!args.report_records);
            assert!(args.client_id.is_none());
            assert!(args.flag_store.is_none());
        } else {
            panic!("expected run");
        }
    }

    #[test]
    fn cli_parse_run_all_flags() {
        let cli = Cli::try_parse_from([
            "kyc",
            "run",
            "--input",
            "form.json",
            "--mock",
            "--client-id",
            "c-1",
            "--flag-store",
            "flags.json",
            "--report-records",
        ])
        .unwrap();
        if let Commands::Run(args) = cli.command {
            assert!(args.mock);
            assert!(args.report_records);
            assert_eq!(args.client_id.as_deref(), Some("c-1"));
            assert_eq!(args.flag_store, Some(PathBuf::from("flags.json")));
        }
    }

    #[test]
    fn cli_run_requires_input() {
        assert!(Cli::try_parse_from(["kyc", "run", "--mock"]).is_err());
    }

    #[test]
    fn cli_verbose_is_global() {
        let cli = Cli::try_parse_from(["kyc", "check", "din", "01234567", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
