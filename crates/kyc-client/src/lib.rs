//! # kyc-client -- Typed async client for KYC verification
//!
//! Two remotes:
//! - **Verification provider**: one POST per document category (Aadhaar OTP
//!   generate/submit, PAN, CIN, DIN, GSTIN, bank account), API-key auth.
//! - **Client-KYC records**: a single PATCH reporting the aggregate check map
//!   once a session completes, bearer auth.
//!
//! ## Architecture
//!
//! [`VerificationApi`] is the seam the session layer depends on. Its methods
//! never fail: transport, decoding, and provider-side failures are all
//! reduced to a [`VerificationOutcome`] with `ok == false`, and the
//! underlying [`ClientError`] is logged. [`ProviderClient`] talks to the live
//! provider; [`MockVerificationApi`] answers deterministically in process.
//!
//! The client holds no per-session state. The OTP transaction id is returned
//! in the generate-OTP outcome and passed back explicitly on submit.

pub mod api;
pub mod config;
pub mod error;
pub mod mock;
pub mod outcome;
pub mod provider;
pub mod records;

pub use api::{VerificationApi, VerificationRequest};
pub use config::{ConfigError, ProviderConfig, RecordsConfig};
pub use error::ClientError;
pub use mock::MockVerificationApi;
pub use outcome::{FailureKind, Operation, VerificationOutcome, VerificationPayload};
pub use provider::ProviderClient;
pub use records::{ClientKycUpdate, RecordsClient};
