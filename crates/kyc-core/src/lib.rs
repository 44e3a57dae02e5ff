#![deny(missing_docs)]

//! # kyc-core: Foundational Types for the KYC Verification Stack
//!
//! This crate defines the types every other crate in the workspace builds on.
//! It has no internal crate dependencies; only `serde`, `serde_json`,
//! `thiserror`, `chrono`, and `uuid` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **One field record for every verifiable datum.** [`VerificationField`]
//!    carries the raw value, its [`FieldStatus`], and an advisory message.
//!    Status edges are checked at runtime and rejected with [`FieldError`].
//!
//! 2. **Newtype wrappers for document numbers.** [`AadhaarNumber`], [`Pan`],
//!    [`Cin`], [`Din`], [`Gstin`], [`Ifsc`], and [`AccountNumber`] validate
//!    their format at construction. A value that reaches the verification
//!    provider has already passed the local pre-check.
//!
//! 3. **[`VerificationChecks`] is the only aggregate view.** The boolean map
//!    reported to downstream record keeping is derived, never stored.
//!
//! 4. **[`KycError`] hierarchy.** Structured errors with `thiserror`. No
//!    `Box<dyn Error>`, no `.unwrap()` outside tests.

pub mod checks;
pub mod document;
pub mod error;
pub mod field;
pub mod identity;
pub mod temporal;

// Re-export primary types at crate root for ergonomic imports.
pub use checks::VerificationChecks;
pub use document::{AadhaarNumber, AccountNumber, Cin, Din, DocumentKind, Gstin, Ifsc, Pan};
pub use error::{FieldError, KycError, ValidationError};
pub use field::{Category, FieldKind, FieldStatus, OtpField, VerificationField};
pub use identity::{ClientId, SessionId};
pub use temporal::Timestamp;
