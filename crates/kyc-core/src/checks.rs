//! # Aggregate Check Map
//!
//! The per-requirement boolean map derived from a session. It is what the
//! downstream client-KYC record endpoint receives, and its conjunction is the
//! session's "fully verified" flag.

use serde::{Deserialize, Serialize};

/// Outcome of each of the seven required checks.
///
/// `bank` is true only when the account number and IFSC were verified
/// together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationChecks {
    /// Aadhaar verified through OTP.
    pub aadhaar: bool,
    /// Owner PAN verified.
    pub owner_pan: bool,
    /// Business PAN verified.
    pub business_pan: bool,
    /// CIN verified.
    pub cin: bool,
    /// DIN verified.
    pub din: bool,
    /// GSTIN verified.
    pub gstin: bool,
    /// Account number and IFSC verified jointly.
    pub bank: bool,
}

impl VerificationChecks {
    /// Number of required checks.
    pub const REQUIRED: usize = 7;

    /// Whether every required check passed.
    pub fn all_passed(&self) -> bool {
        self.passed_count() == Self::REQUIRED
    }

    /// How many checks passed.
    pub fn passed_count(&self) -> usize {
        [
            self.aadhaar,
            self.owner_pan,
            self.business_pan,
            self.cin,
            self.din,
            self.gstin,
            self.bank,
        ]
        .into_iter()
        .filter(|ok| *ok)
        .count()
    }
}
