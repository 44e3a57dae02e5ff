//! # Verification API Interface
//!
//! The `VerificationApi` trait abstracts over the verification backend.
//! Production deployments use [`ProviderClient`](crate::ProviderClient);
//! tests and offline runs use [`MockVerificationApi`](crate::MockVerificationApi).
//! The session layer only ever sees a `VerificationOutcome`, so it is
//! indifferent to which implementation is behind the `Arc`.
//!
//! Inputs are the validated document newtypes from `kyc-core`: a value that
//! reaches this trait has already passed its local format check.

use async_trait::async_trait;
use kyc_core::{AadhaarNumber, AccountNumber, Cin, Din, Gstin, Ifsc, Pan};

use crate::outcome::{Operation, VerificationOutcome};

/// Remote verification operations.
///
/// Implementations must be `Send + Sync` so they can be shared across
/// concurrent submissions behind an `Arc`. The trait is object-safe to
/// support runtime selection (mock vs. live).
///
/// No method returns an error: every failure is folded into a
/// `VerificationOutcome` with `ok == false`.
#[async_trait]
pub trait VerificationApi: Send + Sync {
    /// Ask the provider to send an OTP to the Aadhaar holder.
    async fn generate_aadhaar_otp(&self, aadhaar: &AadhaarNumber) -> VerificationOutcome;

    /// Submit the OTP the holder received.
    async fn submit_aadhaar_otp(
        &self,
        aadhaar: &AadhaarNumber,
        otp: &str,
        transaction_id: &str,
    ) -> VerificationOutcome;

    /// Verify a PAN.
    async fn verify_pan(&self, pan: &Pan) -> VerificationOutcome;

    /// Look up a company by CIN.
    async fn verify_cin(&self, cin: &Cin) -> VerificationOutcome;

    /// Look up a director by DIN.
    async fn verify_din(&self, din: &Din) -> VerificationOutcome;

    /// Look up a GST registration.
    async fn verify_gstin(&self, gstin: &Gstin) -> VerificationOutcome;

    /// Verify a bank account number against its IFSC.
    async fn verify_bank_account(&self, account: &AccountNumber, ifsc: &Ifsc)
        -> VerificationOutcome;

    /// Implementation name, for logs.
    fn api_name(&self) -> &str;
}

/// A single remote call, carrying the validated inputs it needs.
///
/// The session builds these when it dispatches a submission; the
/// orchestrator sends them without knowing which category they belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationRequest {
    GenerateOtp {
        aadhaar: AadhaarNumber,
    },
    SubmitOtp {
        aadhaar: AadhaarNumber,
        otp: String,
        transaction_id: String,
    },
    Pan(Pan),
    Cin(Cin),
    Din(Din),
    Gstin(Gstin),
    Bank {
        account: AccountNumber,
        ifsc: Ifsc,
    },
}

impl VerificationRequest {
    /// The remote operation this request maps to.
    pub fn operation(&self) -> Operation {
        match self {
            Self::GenerateOtp { .. } => Operation::GenerateOtp,
            Self::SubmitOtp { .. } => Operation::SubmitOtp,
            Self::Pan(_) => Operation::Pan,
            Self::Cin(_) => Operation::Cin,
            Self::Din(_) => Operation::Din,
            Self::Gstin(_) => Operation::Gstin,
            Self::Bank { .. } => Operation::Bank,
        }
    }

    /// Perform the call against `api`.
    pub async fn send<A>(&self, api: &A) -> VerificationOutcome
    where
        A: VerificationApi + ?Sized,
    {
        let outcome = match self {
            Self::GenerateOtp { aadhaar } => api.generate_aadhaar_otp(aadhaar).await,
            Self::SubmitOtp {
                aadhaar,
                otp,
                transaction_id,
            } => api.submit_aadhaar_otp(aadhaar, otp, transaction_id).await,
            Self::Pan(pan) => api.verify_pan(pan).await,
            Self::Cin(cin) => api.verify_cin(cin).await,
            Self::Din(din) => api.verify_din(din).await,
            Self::Gstin(gstin) => api.verify_gstin(gstin).await,
            Self::Bank { account, ifsc } => api.verify_bank_account(account, ifsc).await,
        };
        tracing::debug!(
            api = api.api_name(),
            operation = %self.operation(),
            ok = outcome.ok,
            "verification call completed"
        );
        outcome
    }
}
