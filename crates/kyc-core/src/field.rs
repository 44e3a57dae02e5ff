//! # Verification Fields
//!
//! The `{value, status, message}` record behind every verifiable datum.
//!
//! ## Status edges
//!
//! ```text
//!           edit (any state)
//!   ┌──────────────────────────────┐
//!   ▼                              │
//! Idle ──▶ Pending ──▶ Success ────┤
//!   │         │                    │
//!   │         └──────▶ Error ──────┘
//!   │                   │  ▲
//!   └── format failure ─┘  └── resubmit (Error ──▶ Pending)
//! ```
//!
//! `edit` is the only way back to `Idle`; it is not a transition check but a
//! reset of the record. Everything else goes through [`VerificationField`]'s
//! `mark_*` methods, which reject undefined edges with [`FieldError`].

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// Verification status of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldStatus {
    /// Not yet submitted, or edited since the last submission.
    #[default]
    Idle,
    /// A remote verification call is outstanding.
    Pending,
    /// Verified by the provider.
    Success,
    /// Rejected locally or by the provider, or the call failed.
    Error,
}

impl FieldStatus {
    /// Whether `self → to` is an edge of the field state machine.
    pub fn can_transition_to(self, to: FieldStatus) -> bool {
        matches!(
            (self, to),
            (Self::Idle, Self::Pending)
                | (Self::Error, Self::Pending)
                | (Self::Pending, Self::Success)
                | (Self::Pending, Self::Error)
                | (Self::Idle, Self::Error)
                | (Self::Error, Self::Error)
        )
    }

    /// Whether this status blocks a new submission.
    pub fn blocks_submission(self) -> bool {
        matches!(self, Self::Pending | Self::Success)
    }
}

impl std::fmt::Display for FieldStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "IDLE",
            Self::Pending => "PENDING",
            Self::Success => "SUCCESS",
            Self::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// One verifiable datum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationField {
    /// Raw user input.
    pub value: String,
    /// Current status.
    pub status: FieldStatus,
    /// Advisory message for display. Cleared on edit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl VerificationField {
    /// An idle field holding `value`.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            status: FieldStatus::Idle,
            message: None,
        }
    }

    /// Replace the value, reset status to `Idle`, and clear the message.
    pub fn edit(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.status = FieldStatus::Idle;
        self.message = None;
    }

    /// Whether a submit on this field should proceed past the guard.
    ///
    /// False for an empty value or while `Pending`/`Success`.
    pub fn accepts_submission(&self) -> bool {
        !self.value.is_empty() && !self.status.blocks_submission()
    }

    /// Move to `Pending`.
    pub fn mark_pending(&mut self, message: impl Into<String>) -> Result<(), FieldError> {
        self.transition(FieldStatus::Pending, Some(message.into()))
    }

    /// Move to `Success`.
    pub fn mark_success(&mut self, message: impl Into<String>) -> Result<(), FieldError> {
        self.transition(FieldStatus::Success, Some(message.into()))
    }

    /// Move to `Error`.
    pub fn mark_error(&mut self, message: impl Into<String>) -> Result<(), FieldError> {
        self.transition(FieldStatus::Error, Some(message.into()))
    }

    /// Whether the field is verified.
    pub fn is_verified(&self) -> bool {
        self.status == FieldStatus::Success
    }

    fn transition(&mut self, to: FieldStatus, message: Option<String>) -> Result<(), FieldError> {
        if !self.status.can_transition_to(to) {
            return Err(FieldError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        self.message = message;
        Ok(())
    }
}

/// The OTP sub-field of the Aadhaar category.
///
/// `field.value` holds the OTP code the user typed. `transaction_id` is the
/// opaque token returned by OTP generation; it is required to redeem the OTP.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpField {
    /// The OTP code and its verification status.
    #[serde(flatten)]
    pub field: VerificationField,
    /// Transaction id captured from a successful generate-OTP response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

impl OtpField {
    /// The OTP code entered so far.
    pub fn otp(&self) -> &str {
        &self.field.value
    }

    /// The captured transaction id, if it is non-empty.
    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref().filter(|t| !t.is_empty())
    }

    /// Return to the initial state: no code, no transaction, `Idle`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The verification categories of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Aadhaar number plus OTP.
    Aadhaar,
    /// Owner and business PAN.
    Pan,
    /// CIN and DIN.
    Company,
    /// GSTIN.
    Gstin,
    /// Account number and IFSC.
    Bank,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Aadhaar => "aadhaar",
            Self::Pan => "pan",
            Self::Company => "company",
            Self::Gstin => "gstin",
            Self::Bank => "bank",
        };
        f.write_str(s)
    }
}

/// Every user-editable field of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    /// Aadhaar number.
    Aadhaar,
    /// OTP code received for the Aadhaar number.
    Otp,
    /// PAN of the business owner.
    OwnerPan,
    /// PAN of the business.
    BusinessPan,
    /// Company identification number.
    Cin,
    /// Director identification number.
    Din,
    /// GST identification number.
    Gstin,
    /// Bank account number.
    AccountNumber,
    /// Bank branch IFSC.
    Ifsc,
}

impl FieldKind {
    /// Every field, in form order.
    pub const ALL: [FieldKind; 9] = [
        Self::Aadhaar,
        Self::Otp,
        Self::OwnerPan,
        Self::BusinessPan,
        Self::Cin,
        Self::Din,
        Self::Gstin,
        Self::AccountNumber,
        Self::Ifsc,
    ];

    /// The category this field belongs to.
    pub fn category(self) -> Category {
        match self {
            Self::Aadhaar | Self::Otp => Category::Aadhaar,
            Self::OwnerPan | Self::BusinessPan => Category::Pan,
            Self::Cin | Self::Din => Category::Company,
            Self::Gstin => Category::Gstin,
            Self::AccountNumber | Self::Ifsc => Category::Bank,
        }
    }

    /// Input length hint. Edits longer than this are truncated, never rejected.
    pub fn soft_max_len(self) -> usize {
        match self {
            Self::Aadhaar => 12,
            Self::Otp => 6,
            Self::OwnerPan | Self::BusinessPan => 10,
            Self::Cin => 21,
            Self::Din => 8,
            Self::Gstin => 15,
            Self::AccountNumber => 18,
            Self::Ifsc => 11,
        }
    }

    /// Truncate `input` to [`soft_max_len`](Self::soft_max_len) characters.
    pub fn truncate_soft(self, input: &str) -> String {
        input.chars().take(self.soft_max_len()).collect()
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Aadhaar => "aadhaar",
            Self::Otp => "otp",
            Self::OwnerPan => "owner-pan",
            Self::BusinessPan => "business-pan",
            Self::Cin => "cin",
            Self::Din => "din",
            Self::Gstin => "gstin",
            Self::AccountNumber => "account-number",
            Self::Ifsc => "ifsc",
        };
        f.write_str(s)
    }
}
