//! Deterministic in-process verification backend.
//!
//! Used by tests and by `kyc run --mock`. Every well-formed input verifies
//! with a fixed demo payload; OTP generation issues a `mock-txn-…`
//! transaction id and only the codes `123456` and `000000` redeem it.
//! Builders let tests script rejections, transport failures, an expired
//! OTP, and artificial latency.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kyc_core::{AadhaarNumber, AccountNumber, Cin, Din, Gstin, Ifsc, Pan};

use crate::api::VerificationApi;
use crate::outcome::{Operation, VerificationOutcome, VerificationPayload};

/// OTP codes the mock accepts.
pub const MOCK_VALID_OTPS: [&str; 2] = ["123456", "000000"];

/// Mock verification backend.
#[derive(Debug, Default)]
pub struct MockVerificationApi {
    calls: AtomicUsize,
    latency: Option<Duration>,
    expired_otps: HashSet<String>,
    rejected: HashSet<(Operation, String)>,
    transport_failures: HashSet<Operation>,
}

impl MockVerificationApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Answer `otp` with an "OTP expired" rejection.
    pub fn with_expired_otp(mut self, otp: impl Into<String>) -> Self {
        self.expired_otps.insert(otp.into());
        self
    }

    /// Reject `value` for `operation` as the provider would.
    ///
    /// For bank verification the value is the account number.
    pub fn rejecting(mut self, operation: Operation, value: impl Into<String>) -> Self {
        self.rejected.insert((operation, value.into()));
        self
    }

    /// Fail every call to `operation` as a transport error.
    pub fn failing_transport(mut self, operation: Operation) -> Self {
        self.transport_failures.insert(operation);
        self
    }

    /// Number of calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Common prologue: count, sleep, then check scripted failures.
    async fn enter(&self, op: Operation, value: &str) -> Option<VerificationOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.transport_failures.contains(&op) {
            return Some(VerificationOutcome::transport(op.transport_fallback()));
        }
        if self.rejected.contains(&(op, value.to_string())) {
            return Some(VerificationOutcome::rejected(op.rejection_fallback()));
        }
        None
    }
}

#[async_trait]
impl VerificationApi for MockVerificationApi {
    async fn generate_aadhaar_otp(&self, aadhaar: &AadhaarNumber) -> VerificationOutcome {
        if let Some(out) = self.enter(Operation::GenerateOtp, aadhaar.as_str()).await {
            return out;
        }
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        VerificationOutcome::success(
            Some("OTP sent successfully".into()),
            Some(VerificationPayload::OtpIssued {
                transaction_id: format!("mock-txn-{}", &suffix[..6]),
            }),
        )
    }

    async fn submit_aadhaar_otp(
        &self,
        aadhaar: &AadhaarNumber,
        otp: &str,
        transaction_id: &str,
    ) -> VerificationOutcome {
        if let Some(out) = self.enter(Operation::SubmitOtp, aadhaar.as_str()).await {
            return out;
        }
        if transaction_id.is_empty() {
            return VerificationOutcome::rejected("Invalid transaction");
        }
        if self.expired_otps.contains(otp) {
            return VerificationOutcome::rejected("OTP expired");
        }
        if !MOCK_VALID_OTPS.contains(&otp) {
            return VerificationOutcome::rejected("Invalid OTP");
        }
        VerificationOutcome::success(
            Some("Aadhaar verified successfully".into()),
            Some(VerificationPayload::Aadhaar {
                name: Some("John Doe".into()),
                gender: Some("M".into()),
                dob: Some("1990-01-01".into()),
                address: Some("123 Main St, Bangalore, Karnataka".into()),
            }),
        )
    }

    async fn verify_pan(&self, pan: &Pan) -> VerificationOutcome {
        if let Some(out) = self.enter(Operation::Pan, pan.as_str()).await {
            return out;
        }
        VerificationOutcome::success(
            Some("PAN verified successfully".into()),
            Some(VerificationPayload::Pan {
                name: Some("John Doe".into()),
                pan_status: Some("Active".into()),
            }),
        )
    }

    async fn verify_cin(&self, cin: &Cin) -> VerificationOutcome {
        if let Some(out) = self.enter(Operation::Cin, cin.as_str()).await {
            return out;
        }
        VerificationOutcome::success(
            Some("CIN verified successfully".into()),
            Some(VerificationPayload::Company {
                company_name: Some("Acme Private Limited".into()),
                status: Some("Active".into()),
            }),
        )
    }

    async fn verify_din(&self, din: &Din) -> VerificationOutcome {
        if let Some(out) = self.enter(Operation::Din, din.as_str()).await {
            return out;
        }
        VerificationOutcome::success(
            Some("DIN verified successfully".into()),
            Some(VerificationPayload::Director {
                director_name: Some("John Doe".into()),
                status: Some("Active".into()),
            }),
        )
    }

    async fn verify_gstin(&self, gstin: &Gstin) -> VerificationOutcome {
        if let Some(out) = self.enter(Operation::Gstin, gstin.as_str()).await {
            return out;
        }
        VerificationOutcome::success(
            Some("GSTIN verified successfully".into()),
            Some(VerificationPayload::Gstin {
                trade_name: Some("Acme Traders".into()),
                legal_name: Some("Acme Private Limited".into()),
                status: Some("Active".into()),
            }),
        )
    }

    async fn verify_bank_account(
        &self,
        account: &AccountNumber,
        _ifsc: &Ifsc,
    ) -> VerificationOutcome {
        if let Some(out) = self.enter(Operation::Bank, account.as_str()).await {
            return out;
        }
        VerificationOutcome::success(
            Some("Account verified successfully".into()),
            Some(VerificationPayload::Bank {
                holder_name: Some("John Doe".into()),
                bank_name: Some("HDFC Bank".into()),
            }),
        )
    }

    fn api_name(&self) -> &str {
        "MockVerificationApi"
    }
}
