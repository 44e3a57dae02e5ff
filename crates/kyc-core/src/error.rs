//! # Error Hierarchy
//!
//! Structured error types for the KYC stack, built with `thiserror`.
//!
//! Format failures carry the rejected input and the expected shape so the
//! caller can log a precise diagnostic, while [`ValidationError::guidance`]
//! provides the short message shown next to the field.

use thiserror::Error;

use crate::field::FieldStatus;

/// Top-level error type for the KYC stack.
#[derive(Error, Debug)]
pub enum KycError {
    /// Local format pre-check failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Field status transition violation.
    #[error("field transition error: {0}")]
    Field(#[from] FieldError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised when a field is moved along an edge the state machine
/// does not define.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The attempted transition is not valid from the current status.
    #[error("invalid field transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: FieldStatus,
        /// The attempted target status.
        to: FieldStatus,
    },
}

/// Validation errors for document-number newtypes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Aadhaar number is not exactly 12 decimal digits.
    #[error("invalid Aadhaar number: \"{0}\" (expected 12 digits)")]
    InvalidAadhaar(String),

    /// PAN does not match 5 letters, 4 digits, 1 letter.
    #[error("invalid PAN: \"{0}\" (expected AAAAA9999A)")]
    InvalidPan(String),

    /// CIN does not match the 21-character MCA layout.
    #[error("invalid CIN: \"{0}\" (expected A99999AA9999AAA999999)")]
    InvalidCin(String),

    /// DIN is not exactly 8 decimal digits.
    #[error("invalid DIN: \"{0}\" (expected 8 digits)")]
    InvalidDin(String),

    /// GSTIN does not match the 15-character GST layout.
    #[error("invalid GSTIN: \"{0}\" (expected 99AAAAA9999A?Z?)")]
    InvalidGstin(String),

    /// Bank account number is not 9-18 decimal digits.
    #[error("invalid bank account number: \"{0}\" (expected 9-18 digits)")]
    InvalidAccountNumber(String),

    /// IFSC does not match 4 letters, `0`, 6 alphanumerics.
    #[error("invalid IFSC: \"{0}\" (expected AAAA0XXXXXX)")]
    InvalidIfsc(String),

    /// Client identifier is empty.
    #[error("invalid client ID: must be non-empty")]
    InvalidClientId,
}

impl ValidationError {
    /// The user-facing message placed on the field when the pre-check fails.
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::InvalidAadhaar(_) => "Please enter a valid 12-digit Aadhaar number",
            Self::InvalidPan(_) => "Please enter a valid PAN number",
            Self::InvalidCin(_) => "Please enter a valid CIN number",
            Self::InvalidDin(_) => "Please enter a valid 8-digit DIN number",
            Self::InvalidGstin(_) => "Please enter a valid GSTIN number",
            Self::InvalidAccountNumber(_) => "Please enter a valid account number",
            Self::InvalidIfsc(_) => "Please enter a valid IFSC code",
            Self::InvalidClientId => "Please provide a client identifier",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kyc_error_validation_display() {
        let err = KycError::Validation(ValidationError::InvalidPan("ABC".to_string()));
        let msg = format!("{err}");
        assert!(msg.contains("validation error"));
        assert!(msg.contains("ABC"));
    }

    #[test]
    fn kyc_error_field_display() {
        let err = KycError::Field(FieldError::InvalidTransition {
            from: FieldStatus::Success,
            to: FieldStatus::Pending,
        });
        let msg = format!("{err}");
        assert!(msg.contains("SUCCESS"));
        assert!(msg.contains("PENDING"));
    }

    #[test]
    fn validation_error_mentions_expected_shape() {
        let err = ValidationError::InvalidAadhaar("12345".to_string());
        assert!(format!("{err}").contains("12 digits"));
        let err = ValidationError::InvalidAccountNumber("12".to_string());
        assert!(format!("{err}").contains("9-18"));
    }

    #[test]
    fn guidance_is_format_specific() {
        assert_eq!(
            ValidationError::InvalidAadhaar(String::new()).guidance(),
            "Please enter a valid 12-digit Aadhaar number"
        );
        assert_eq!(
            ValidationError::InvalidIfsc(String::new()).guidance(),
            "Please enter a valid IFSC code"
        );
        assert_ne!(
            ValidationError::InvalidPan(String::new()).guidance(),
            ValidationError::InvalidGstin(String::new()).guidance()
        );
    }
}
