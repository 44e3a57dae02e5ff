//! Normalized verification results.
//!
//! Every provider call, successful or not, is reduced to a
//! [`VerificationOutcome`]. The session layer only looks at `ok` (and, for
//! OTP generation, the transaction id); the payload is for display.

use serde::{Deserialize, Serialize};

/// The remote operations the provider exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    GenerateOtp,
    SubmitOtp,
    Pan,
    Cin,
    Din,
    Gstin,
    Bank,
}

impl Operation {
    /// Endpoint path relative to the provider base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::GenerateOtp => "/aadhaar-api/boson/generate-otp",
            Self::SubmitOtp => "/aadhaar-api/boson/submit-otp",
            Self::Pan => "/pan-api/fetch",
            Self::Cin => "/mca-api/fetch-company",
            Self::Din => "/mca-api/fetch-din",
            Self::Gstin => "/gstin-api/fetch-lite",
            Self::Bank => "/bank-api/verify",
        }
    }

    /// Provider code signalling success in `data.code`.
    pub fn success_code(self) -> &'static str {
        match self {
            Self::GenerateOtp => "1001",
            Self::SubmitOtp => "1002",
            Self::Pan | Self::Cin | Self::Din | Self::Gstin | Self::Bank => "1000",
        }
    }

    /// Endpoint label used in logs and error context.
    pub fn endpoint(self) -> String {
        format!("POST {}", self.path())
    }

    /// Message used when the provider rejects without saying why.
    pub fn rejection_fallback(self) -> &'static str {
        match self {
            Self::GenerateOtp => "Failed to generate OTP",
            Self::SubmitOtp => "Failed to verify Aadhaar",
            Self::Pan => "Failed to verify PAN",
            Self::Cin => "Failed to verify CIN",
            Self::Din => "Failed to verify DIN",
            Self::Gstin => "Failed to verify GSTIN",
            Self::Bank => "Failed to verify bank account",
        }
    }

    /// Message used when the call itself failed.
    pub fn transport_fallback(self) -> &'static str {
        match self {
            Self::GenerateOtp => "An error occurred while generating OTP",
            Self::SubmitOtp => "An error occurred while verifying OTP",
            Self::Pan => "An error occurred while verifying PAN",
            Self::Cin => "An error occurred while verifying CIN",
            Self::Din => "An error occurred while verifying DIN",
            Self::Gstin => "An error occurred while verifying GSTIN",
            Self::Bank => "An error occurred while verifying bank account",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::GenerateOtp => "generate-otp",
            Self::SubmitOtp => "submit-otp",
            Self::Pan => "pan",
            Self::Cin => "cin",
            Self::Din => "din",
            Self::Gstin => "gstin",
            Self::Bank => "bank",
        };
        f.write_str(s)
    }
}

/// Why a call did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The provider answered and signalled failure.
    RemoteRejection,
    /// The call threw, the network failed, or the response did not parse.
    Transport,
}

/// Category-specific data returned on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VerificationPayload {
    OtpIssued {
        transaction_id: String,
    },
    Aadhaar {
        name: Option<String>,
        gender: Option<String>,
        dob: Option<String>,
        address: Option<String>,
    },
    Pan {
        name: Option<String>,
        pan_status: Option<String>,
    },
    Company {
        company_name: Option<String>,
        status: Option<String>,
    },
    Director {
        director_name: Option<String>,
        status: Option<String>,
    },
    Gstin {
        trade_name: Option<String>,
        legal_name: Option<String>,
        status: Option<String>,
    },
    Bank {
        holder_name: Option<String>,
        bank_name: Option<String>,
    },
}

/// The normalized result of one provider call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<VerificationPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

impl VerificationOutcome {
    pub fn success(message: Option<String>, payload: Option<VerificationPayload>) -> Self {
        Self {
            ok: true,
            message,
            payload,
            failure: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
            payload: None,
            failure: Some(FailureKind::RemoteRejection),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
            payload: None,
            failure: Some(FailureKind::Transport),
        }
    }

    /// The OTP transaction id, when this is a successful generate-OTP result.
    pub fn transaction_id(&self) -> Option<&str> {
        match &self.payload {
            Some(VerificationPayload::OtpIssued { transaction_id }) if self.ok => {
                Some(transaction_id.as_str())
            }
            _ => None,
        }
    }
}
