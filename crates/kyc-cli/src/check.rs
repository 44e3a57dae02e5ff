//! `kyc check <kind> <value>`: run one format pre-check offline.

use anyhow::Result;
use clap::Args;

use kyc_core::DocumentKind;

/// Check subcommand arguments.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Document kind: aadhaar, pan, cin, din, gstin, account-number, ifsc.
    pub kind: DocumentKind,

    /// The value to check.
    pub value: String,
}

/// Execute the check subcommand. Exit code 0 when valid, 1 otherwise.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    match args.kind.validate(&args.value) {
        Ok(()) => {
            println!("{}: valid", args.kind);
            Ok(0)
        }
        Err(e) => {
            tracing::debug!("{e}");
            println!("{}: invalid ({})", args.kind, e.guidance());
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(kind: DocumentKind, value: &str) -> CheckArgs {
        CheckArgs {
            kind,
            value: value.to_string(),
        }
    }

    #[test]
    fn known_good_literals_pass() {
        assert_eq!(run_check(&args(DocumentKind::Aadhaar, "123456789012")).unwrap(), 0);
        assert_eq!(run_check(&args(DocumentKind::Pan, "ABCDE1234F")).unwrap(), 0);
        assert_eq!(run_check(&args(DocumentKind::Ifsc, "HDFC0001234")).unwrap(), 0);
    }

    #[test]
    fn known_bad_literals_fail() {
        assert_eq!(run_check(&args(DocumentKind::Aadhaar, "12345")).unwrap(), 1);
        assert_eq!(run_check(&args(DocumentKind::Pan, "ABCDE1234")).unwrap(), 1);
        assert_eq!(run_check(&args(DocumentKind::Ifsc, "1234HDFC001")).unwrap(), 1);
    }
}
