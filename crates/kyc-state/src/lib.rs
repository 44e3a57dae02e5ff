//! # kyc-state: KYC Verification Session
//!
//! Owns the aggregate state of one verification interaction and the rules
//! for changing it.
//!
//! ## Components
//!
//! - **Session** (`session.rs`): the five categories (Aadhaar + OTP, PAN,
//!   company, GSTIN, bank), reducer-style edit/submit/complete transitions,
//!   per-field epochs that discard stale responses, and the OTP expiry
//!   policy.
//!
//! - **Tickets** (`ticket.rs`): submit targets, guard results, and the
//!   in-flight ticket that carries a captured value to completion.
//!
//! - **Notifier** (`notifier.rs`): the fully-verified computation, the
//!   completion event emitted on its false→true edge, and fan-out to sinks.
//!
//! - **Sinks** (`sinks.rs`, `flag_store.rs`): log line, persisted completion
//!   flag (in memory or a JSON file), and the client-KYC record update.
//!
//! - **Orchestrator** (`orchestrator.rs`): runs submissions against a
//!   `VerificationApi`, one at a time or concurrently.
//!
//! ## Design
//!
//! A session is never shared. Concurrency comes from several remote calls
//! being outstanding at once, not from several writers: every write goes
//! through `&mut VerificationSession`, and the remote calls hold only their
//! ticket.

pub mod flag_store;
pub mod notifier;
pub mod orchestrator;
pub mod session;
pub mod sinks;
pub mod ticket;

// ─── Session re-exports ─────────────────────────────────────────────

pub use session::{
    AadhaarCategory, BankCategory, CompanyCategory, GstinCategory, OtpExpiryPolicy, PanCategory,
    SessionConfig, SessionSnapshot, VerificationSession,
};
pub use ticket::{Completion, IgnoreReason, Submission, SubmitTarget, SubmitTicket};

// ─── Notification re-exports ────────────────────────────────────────

pub use flag_store::{CompletionFlag, FileFlagStore, FlagStore, FlagStoreError, InMemoryFlagStore};
pub use notifier::{recompute, CompletionEvent, CompletionSink, Notifier, SinkError};
pub use sinks::{FlagSink, LogSink, RecordSink};

// ─── Orchestration re-exports ───────────────────────────────────────

pub use orchestrator::{ReportKind, SubmitReport, Verifier};
