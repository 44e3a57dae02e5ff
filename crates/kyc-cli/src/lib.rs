//! # kyc-cli: CLI for the KYC Verification Stack
//!
//! Provides the `kyc` command-line interface.
//!
//! ## Subcommands
//!
//! - `kyc check`: offline format pre-check of a single document number.
//! - `kyc run`: scripted verification of a whole form loaded from YAML or
//!   JSON, against the live provider or the in-process mock.
//!
//! ```bash
//! kyc check pan ABCDE1234F
//! kyc run --input form.yaml --mock --flag-store ./kyc-flags.json
//! ```

pub mod check;
pub mod input;
pub mod run;
