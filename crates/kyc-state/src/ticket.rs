//! Submission targets, guard results, and in-flight tickets.
//!
//! A submit is split in two so the session never holds state across the
//! remote call: [`begin_submit`](crate::VerificationSession::begin_submit)
//! runs the guard and the format check and, when a call is needed, hands
//! back a [`SubmitTicket`]. The ticket records the value it captured and the
//! edit epoch of every field it covers. When the outcome arrives,
//! [`complete`](crate::VerificationSession::complete) compares those stamps
//! with the session and discards the result if anything moved.

use kyc_client::VerificationRequest;
use kyc_core::{FieldKind, SessionId, ValidationError};
use serde::{Deserialize, Serialize};

use crate::notifier::CompletionEvent;

/// A user-triggerable verification action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubmitTarget {
    GenerateOtp,
    VerifyOtp,
    OwnerPan,
    BusinessPan,
    Cin,
    Din,
    Gstin,
    Bank,
}

impl SubmitTarget {
    /// Every target except the OTP pair, which must run in sequence.
    pub const INDEPENDENT: [SubmitTarget; 6] = [
        Self::OwnerPan,
        Self::BusinessPan,
        Self::Cin,
        Self::Din,
        Self::Gstin,
        Self::Bank,
    ];

    /// Fields whose status this target writes.
    pub fn fields(self) -> &'static [FieldKind] {
        match self {
            Self::GenerateOtp => &[FieldKind::Aadhaar],
            Self::VerifyOtp => &[FieldKind::Otp],
            Self::OwnerPan => &[FieldKind::OwnerPan],
            Self::BusinessPan => &[FieldKind::BusinessPan],
            Self::Cin => &[FieldKind::Cin],
            Self::Din => &[FieldKind::Din],
            Self::Gstin => &[FieldKind::Gstin],
            Self::Bank => &[FieldKind::AccountNumber, FieldKind::Ifsc],
        }
    }

    /// Fields whose edits invalidate an in-flight call for this target.
    ///
    /// OTP verification is also invalidated by an Aadhaar edit.
    pub(crate) fn guarded_fields(self) -> &'static [FieldKind] {
        match self {
            Self::VerifyOtp => &[FieldKind::Aadhaar, FieldKind::Otp],
            other => other.fields(),
        }
    }

    pub(crate) fn progress_message(self) -> &'static str {
        match self {
            Self::GenerateOtp => "Generating OTP...",
            Self::VerifyOtp => "Verifying OTP...",
            Self::OwnerPan | Self::BusinessPan => "Verifying PAN...",
            Self::Cin => "Verifying CIN...",
            Self::Din => "Verifying DIN...",
            Self::Gstin => "Verifying GSTIN...",
            Self::Bank => "Verifying account...",
        }
    }

    pub(crate) fn success_message(self) -> &'static str {
        match self {
            Self::GenerateOtp => "OTP sent successfully",
            Self::VerifyOtp => "Aadhaar verified successfully",
            Self::OwnerPan | Self::BusinessPan => "PAN verified successfully",
            Self::Cin => "CIN verified successfully",
            Self::Din => "DIN verified successfully",
            Self::Gstin => "GSTIN verified successfully",
            Self::Bank => "Account verified successfully",
        }
    }

    pub(crate) fn failure_message(self) -> &'static str {
        match self {
            Self::GenerateOtp => "An error occurred while generating OTP",
            Self::VerifyOtp => "An error occurred while verifying OTP",
            Self::OwnerPan | Self::BusinessPan => "An error occurred while verifying PAN",
            Self::Cin => "An error occurred while verifying CIN",
            Self::Din => "An error occurred while verifying DIN",
            Self::Gstin => "An error occurred while verifying GSTIN",
            Self::Bank => "An error occurred while verifying account",
        }
    }
}

impl std::fmt::Display for SubmitTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::GenerateOtp => "generate-otp",
            Self::VerifyOtp => "verify-otp",
            Self::OwnerPan => "owner-pan",
            Self::BusinessPan => "business-pan",
            Self::Cin => "cin",
            Self::Din => "din",
            Self::Gstin => "gstin",
            Self::Bank => "bank",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for SubmitTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generate-otp" => Ok(Self::GenerateOtp),
            "verify-otp" => Ok(Self::VerifyOtp),
            "owner-pan" => Ok(Self::OwnerPan),
            "business-pan" => Ok(Self::BusinessPan),
            "cin" => Ok(Self::Cin),
            "din" => Ok(Self::Din),
            "gstin" => Ok(Self::Gstin),
            "bank" => Ok(Self::Bank),
            other => Err(format!("unknown submit target: {other}")),
        }
    }
}

/// Why a submit was a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// The value to submit is empty.
    EmptyValue,
    /// A call for this field is already outstanding.
    InFlight,
    /// The field is already verified.
    AlreadyVerified,
    /// OTP verification before a successful OTP generation.
    OtpNotRequested,
    /// OTP verification without a captured transaction id.
    MissingTransaction,
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::EmptyValue => "empty value",
            Self::InFlight => "verification in flight",
            Self::AlreadyVerified => "already verified",
            Self::OtpNotRequested => "OTP not requested",
            Self::MissingTransaction => "missing OTP transaction id",
        };
        f.write_str(s)
    }
}

/// Result of [`begin_submit`](crate::VerificationSession::begin_submit).
#[derive(Debug)]
pub enum Submission {
    /// Guard refused; state unchanged.
    Ignored(IgnoreReason),
    /// Format check failed; the field(s) now carry the guidance message.
    Rejected(ValidationError),
    /// Field(s) are `Pending`; perform the call and hand the ticket back.
    Dispatched(SubmitTicket),
}

/// An in-flight submission.
///
/// Not `Clone`: a ticket is consumed by exactly one `complete`.
#[derive(Debug)]
pub struct SubmitTicket {
    pub(crate) session_id: SessionId,
    pub(crate) target: SubmitTarget,
    pub(crate) request: VerificationRequest,
    pub(crate) generation: u64,
    pub(crate) stamps: Vec<(FieldKind, u64)>,
}

impl SubmitTicket {
    pub fn target(&self) -> SubmitTarget {
        self.target
    }

    /// The remote call to perform.
    pub fn request(&self) -> &VerificationRequest {
        &self.request
    }
}

/// Result of [`complete`](crate::VerificationSession::complete).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The session moved on since dispatch; nothing was written.
    Stale,
    /// The outcome was applied. `completed` is set on the false→true edge
    /// of the fully-verified flag.
    Applied { completed: Option<CompletionEvent> },
}

impl Completion {
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }

    pub fn completion_event(&self) -> Option<&CompletionEvent> {
        match self {
            Self::Applied { completed } => completed.as_ref(),
            Self::Stale => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_display_parses_back() {
        for t in [
            SubmitTarget::GenerateOtp,
            SubmitTarget::VerifyOtp,
            SubmitTarget::OwnerPan,
            SubmitTarget::BusinessPan,
            SubmitTarget::Cin,
            SubmitTarget::Din,
            SubmitTarget::Gstin,
            SubmitTarget::Bank,
        ] {
            assert_eq!(t.to_string().parse::<SubmitTarget>().unwrap(), t);
        }
        assert!("passport".parse::<SubmitTarget>().is_err());
    }

    #[test]
    fn bank_covers_both_fields() {
        assert_eq!(
            SubmitTarget::Bank.fields(),
            &[FieldKind::AccountNumber, FieldKind::Ifsc]
        );
    }

    #[test]
    fn otp_verification_is_guarded_by_aadhaar_edits() {
        assert!(SubmitTarget::VerifyOtp
            .guarded_fields()
            .contains(&FieldKind::Aadhaar));
        assert_eq!(SubmitTarget::OwnerPan.guarded_fields().len(), 1);
    }
}
