//! # Verification Session
//!
//! The aggregate root of one KYC interaction: every field of every category,
//! the OTP gating state, and the derived fully-verified flag.
//!
//! ## Reducer model
//!
//! The session is a plain owned value. It changes only through
//! [`edit_field`](VerificationSession::edit_field),
//! [`begin_submit`](VerificationSession::begin_submit),
//! [`complete`](VerificationSession::complete), and
//! [`reset`](VerificationSession::reset). None of them suspend; the remote
//! call happens between `begin_submit` and `complete`, outside the session,
//! so any number of calls may be outstanding without locks.
//!
//! ## Stale responses
//!
//! Every field carries an edit epoch, bumped on each edit and dispatch, and
//! the session carries a generation, bumped on reset. A [`SubmitTicket`]
//! records both at dispatch time. `complete` drops the outcome when either
//! moved, so a late response never overwrites a newer value.

use kyc_client::{VerificationOutcome, VerificationRequest};
use kyc_core::{
    AadhaarNumber, AccountNumber, Cin, ClientId, Din, FieldError, FieldKind, FieldStatus, Gstin,
    Ifsc, OtpField, Pan, SessionId, Timestamp, ValidationError, VerificationChecks,
    VerificationField,
};
use serde::{Deserialize, Serialize};

use crate::notifier::{self, CompletionEvent};
use crate::ticket::{Completion, IgnoreReason, Submission, SubmitTarget, SubmitTicket};

// ─── Configuration ──────────────────────────────────────────────────

/// What a failed OTP verification whose message reports expiry does to the
/// Aadhaar category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpExpiryPolicy {
    /// Keep the OTP request open; the user may retry with the same
    /// transaction id.
    #[default]
    AllowRetry,
    /// Drop the transaction id and reopen the Aadhaar field so a fresh OTP
    /// must be generated.
    RequireRegeneration,
}

/// Per-session behaviour switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub otp_expiry: OtpExpiryPolicy,
}

// ─── Categories ─────────────────────────────────────────────────────

/// Aadhaar number plus OTP.
///
/// `otp_requested` is true only while `otp_requested_for` holds the Aadhaar
/// value of the last successful generate request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AadhaarCategory {
    pub aadhaar: VerificationField,
    pub otp_requested: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otp_requested_for: Option<String>,
    pub otp: OtpField,
}

impl AadhaarCategory {
    fn clear_otp_request(&mut self) {
        self.otp_requested = false;
        self.otp_requested_for = None;
        self.otp.reset();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanCategory {
    pub owner_pan: VerificationField,
    pub business_pan: VerificationField,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyCategory {
    pub cin: VerificationField,
    pub din: VerificationField,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GstinCategory {
    pub gstin: VerificationField,
}

/// Account number and IFSC, verified together by one call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankCategory {
    pub account_number: VerificationField,
    pub ifsc: VerificationField,
}

/// Serializable view of a session for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<ClientId>,
    pub aadhaar: AadhaarCategory,
    pub pan: PanCategory,
    pub company: CompanyCategory,
    pub gstin: GstinCategory,
    pub bank: BankCategory,
    pub fully_verified: bool,
    pub checks: VerificationChecks,
}

// ─── Session ────────────────────────────────────────────────────────

/// One KYC verification session.
#[derive(Debug, Clone)]
pub struct VerificationSession {
    id: SessionId,
    client_id: Option<ClientId>,
    config: SessionConfig,
    aadhaar: AadhaarCategory,
    pan: PanCategory,
    company: CompanyCategory,
    gstin: GstinCategory,
    bank: BankCategory,
    fully_verified: bool,
    generation: u64,
    epochs: [u64; FieldKind::ALL.len()],
}

impl Default for VerificationSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl VerificationSession {
    /// A fresh session with every field `Idle`.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            id: SessionId::new(),
            client_id: None,
            config,
            aadhaar: AadhaarCategory::default(),
            pan: PanCategory::default(),
            company: CompanyCategory::default(),
            gstin: GstinCategory::default(),
            bank: BankCategory::default(),
            fully_verified: false,
            generation: 0,
            epochs: [0; FieldKind::ALL.len()],
        }
    }

    /// Attach the client whose KYC this session establishes.
    pub fn with_client_id(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn client_id(&self) -> Option<&ClientId> {
        self.client_id.as_ref()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn aadhaar(&self) -> &AadhaarCategory {
        &self.aadhaar
    }

    pub fn pan(&self) -> &PanCategory {
        &self.pan
    }

    pub fn company(&self) -> &CompanyCategory {
        &self.company
    }

    pub fn gstin(&self) -> &GstinCategory {
        &self.gstin
    }

    pub fn bank(&self) -> &BankCategory {
        &self.bank
    }

    /// The derived fully-verified flag as of the last transition.
    pub fn is_fully_verified(&self) -> bool {
        self.fully_verified
    }

    /// The field record for `kind`.
    pub fn field(&self, kind: FieldKind) -> &VerificationField {
        match kind {
            FieldKind::Aadhaar => &self.aadhaar.aadhaar,
            FieldKind::Otp => &self.aadhaar.otp.field,
            FieldKind::OwnerPan => &self.pan.owner_pan,
            FieldKind::BusinessPan => &self.pan.business_pan,
            FieldKind::Cin => &self.company.cin,
            FieldKind::Din => &self.company.din,
            FieldKind::Gstin => &self.gstin.gstin,
            FieldKind::AccountNumber => &self.bank.account_number,
            FieldKind::Ifsc => &self.bank.ifsc,
        }
    }

    fn field_mut(&mut self, kind: FieldKind) -> &mut VerificationField {
        match kind {
            FieldKind::Aadhaar => &mut self.aadhaar.aadhaar,
            FieldKind::Otp => &mut self.aadhaar.otp.field,
            FieldKind::OwnerPan => &mut self.pan.owner_pan,
            FieldKind::BusinessPan => &mut self.pan.business_pan,
            FieldKind::Cin => &mut self.company.cin,
            FieldKind::Din => &mut self.company.din,
            FieldKind::Gstin => &mut self.gstin.gstin,
            FieldKind::AccountNumber => &mut self.bank.account_number,
            FieldKind::Ifsc => &mut self.bank.ifsc,
        }
    }

    fn epoch(&self, kind: FieldKind) -> u64 {
        self.epochs[kind as usize]
    }

    fn bump(&mut self, kind: FieldKind) {
        self.epochs[kind as usize] += 1;
    }

    /// The per-requirement check map.
    pub fn checks(&self) -> VerificationChecks {
        VerificationChecks {
            aadhaar: self.aadhaar.otp.field.is_verified(),
            owner_pan: self.pan.owner_pan.is_verified(),
            business_pan: self.pan.business_pan.is_verified(),
            cin: self.company.cin.is_verified(),
            din: self.company.din.is_verified(),
            gstin: self.gstin.gstin.is_verified(),
            bank: self.bank.account_number.is_verified() && self.bank.ifsc.is_verified(),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            client_id: self.client_id.clone(),
            aadhaar: self.aadhaar.clone(),
            pan: self.pan.clone(),
            company: self.company.clone(),
            gstin: self.gstin.clone(),
            bank: self.bank.clone(),
            fully_verified: self.fully_verified,
            checks: self.checks(),
        }
    }

    // ── Edit ────────────────────────────────────────────────────────

    /// Replace a field's value: status back to `Idle`, message cleared.
    ///
    /// Input longer than the field's length hint is truncated. Editing the
    /// Aadhaar number to anything other than the value the open OTP request
    /// was issued for drops the request and resets the OTP sub-field.
    /// Editing either bank field reopens its partner, since the pair is only
    /// verified jointly.
    pub fn edit_field(&mut self, kind: FieldKind, value: &str) -> &VerificationField {
        let value = kind.truncate_soft(value);
        self.bump(kind);

        match kind {
            FieldKind::Aadhaar => {
                let stale_request = self
                    .aadhaar
                    .otp_requested_for
                    .as_deref()
                    .is_some_and(|requested| requested != value);
                if stale_request {
                    tracing::debug!(session = %self.id, "aadhaar changed, dropping OTP request");
                    self.aadhaar.clear_otp_request();
                    self.bump(FieldKind::Otp);
                } else if self.aadhaar.otp.field.status == FieldStatus::Pending {
                    // The in-flight verify is now stale; its reply will be dropped.
                    self.reopen(FieldKind::Otp);
                }
            }
            FieldKind::AccountNumber | FieldKind::Ifsc => {
                let partner = if kind == FieldKind::Ifsc {
                    FieldKind::AccountNumber
                } else {
                    FieldKind::Ifsc
                };
                if self.field(partner).status != FieldStatus::Idle {
                    self.reopen(partner);
                }
            }
            _ => {}
        }

        self.field_mut(kind).edit(value);
        self.settle();
        self.field(kind)
    }

    /// Return a field to `Idle` without changing its value.
    fn reopen(&mut self, kind: FieldKind) {
        self.bump(kind);
        let field = self.field_mut(kind);
        let value = std::mem::take(&mut field.value);
        field.edit(value);
    }

    // ── Submit ──────────────────────────────────────────────────────

    /// Run the guard and the format check for `target`.
    ///
    /// On [`Submission::Dispatched`] the covered fields are `Pending` and the
    /// caller must perform [`SubmitTicket::request`] and pass the outcome to
    /// [`complete`](Self::complete).
    pub fn begin_submit(&mut self, target: SubmitTarget) -> Result<Submission, FieldError> {
        let request = match target {
            SubmitTarget::GenerateOtp => {
                if let Some(reason) = guard(&self.aadhaar.aadhaar) {
                    return Ok(Submission::Ignored(reason));
                }
                match AadhaarNumber::new(self.aadhaar.aadhaar.value.clone()) {
                    Ok(aadhaar) => VerificationRequest::GenerateOtp { aadhaar },
                    Err(e) => return self.reject(target, e),
                }
            }
            SubmitTarget::VerifyOtp => {
                if !self.aadhaar.otp_requested {
                    return Ok(Submission::Ignored(IgnoreReason::OtpNotRequested));
                }
                let Some(transaction_id) = self.aadhaar.otp.transaction_id().map(str::to_string)
                else {
                    return Ok(Submission::Ignored(IgnoreReason::MissingTransaction));
                };
                if let Some(reason) = guard(&self.aadhaar.otp.field) {
                    return Ok(Submission::Ignored(reason));
                }
                let requested_for = self
                    .aadhaar
                    .otp_requested_for
                    .clone()
                    .unwrap_or_else(|| self.aadhaar.aadhaar.value.clone());
                match AadhaarNumber::new(requested_for) {
                    Ok(aadhaar) => VerificationRequest::SubmitOtp {
                        aadhaar,
                        otp: self.aadhaar.otp.otp().to_string(),
                        transaction_id,
                    },
                    Err(e) => return self.reject(target, e),
                }
            }
            SubmitTarget::OwnerPan | SubmitTarget::BusinessPan => {
                let field = self.field(target.fields()[0]);
                if let Some(reason) = guard(field) {
                    return Ok(Submission::Ignored(reason));
                }
                match Pan::new(field.value.clone()) {
                    Ok(pan) => VerificationRequest::Pan(pan),
                    Err(e) => return self.reject(target, e),
                }
            }
            SubmitTarget::Cin => {
                if let Some(reason) = guard(&self.company.cin) {
                    return Ok(Submission::Ignored(reason));
                }
                match Cin::new(self.company.cin.value.clone()) {
                    Ok(cin) => VerificationRequest::Cin(cin),
                    Err(e) => return self.reject(target, e),
                }
            }
            SubmitTarget::Din => {
                if let Some(reason) = guard(&self.company.din) {
                    return Ok(Submission::Ignored(reason));
                }
                match Din::new(self.company.din.value.clone()) {
                    Ok(din) => VerificationRequest::Din(din),
                    Err(e) => return self.reject(target, e),
                }
            }
            SubmitTarget::Gstin => {
                if let Some(reason) = guard(&self.gstin.gstin) {
                    return Ok(Submission::Ignored(reason));
                }
                match Gstin::new(self.gstin.gstin.value.clone()) {
                    Ok(gstin) => VerificationRequest::Gstin(gstin),
                    Err(e) => return self.reject(target, e),
                }
            }
            SubmitTarget::Bank => {
                if let Some(reason) = guard_pair(&self.bank.account_number, &self.bank.ifsc) {
                    return Ok(Submission::Ignored(reason));
                }
                let parsed = AccountNumber::new(self.bank.account_number.value.clone())
                    .and_then(|account| {
                        Ifsc::new(self.bank.ifsc.value.clone()).map(|ifsc| (account, ifsc))
                    });
                match parsed {
                    Ok((account, ifsc)) => VerificationRequest::Bank { account, ifsc },
                    Err(e) => return self.reject(target, e),
                }
            }
        };

        for &kind in target.fields() {
            self.bump(kind);
            self.field_mut(kind).mark_pending(target.progress_message())?;
        }
        tracing::debug!(session = %self.id, %target, "verification dispatched");

        Ok(Submission::Dispatched(SubmitTicket {
            session_id: self.id,
            target,
            request,
            generation: self.generation,
            stamps: target
                .guarded_fields()
                .iter()
                .map(|&kind| (kind, self.epoch(kind)))
                .collect(),
        }))
    }

    /// Format failure: every covered field goes to `Error` with guidance.
    fn reject(
        &mut self,
        target: SubmitTarget,
        error: ValidationError,
    ) -> Result<Submission, FieldError> {
        for &kind in target.fields() {
            self.field_mut(kind).mark_error(error.guidance())?;
        }
        tracing::debug!(session = %self.id, %target, "format check failed: {error}");
        Ok(Submission::Rejected(error))
    }

    // ── Complete ────────────────────────────────────────────────────

    /// Apply the outcome of a dispatched call.
    ///
    /// Returns [`Completion::Stale`] without touching state if the session
    /// was reset or any covered field was edited since dispatch.
    pub fn complete(
        &mut self,
        ticket: SubmitTicket,
        outcome: VerificationOutcome,
    ) -> Result<Completion, FieldError> {
        let target = ticket.target;
        if !self.is_current(&ticket) {
            tracing::warn!(session = %self.id, %target, "discarding stale verification response");
            return Ok(Completion::Stale);
        }

        if outcome.ok {
            let message = outcome
                .message
                .clone()
                .unwrap_or_else(|| target.success_message().to_string());
            if target == SubmitTarget::GenerateOtp {
                match outcome.transaction_id() {
                    Some(transaction_id) => {
                        self.accept_otp_request(message, transaction_id.to_string())?
                    }
                    None => self.fail(target, "Failed to generate OTP".to_string())?,
                }
            } else {
                for &kind in target.fields() {
                    self.field_mut(kind).mark_success(message.clone())?;
                }
            }
        } else {
            let message = outcome
                .message
                .unwrap_or_else(|| target.failure_message().to_string());
            self.fail(target, message)?;
        }

        Ok(Completion::Applied {
            completed: self.settle(),
        })
    }

    fn is_current(&self, ticket: &SubmitTicket) -> bool {
        ticket.session_id == self.id
            && ticket.generation == self.generation
            && ticket
                .stamps
                .iter()
                .all(|&(kind, epoch)| self.epoch(kind) == epoch)
    }

    fn accept_otp_request(
        &mut self,
        message: String,
        transaction_id: String,
    ) -> Result<(), FieldError> {
        self.aadhaar.aadhaar.mark_success(message)?;
        self.aadhaar.otp_requested = true;
        self.aadhaar.otp_requested_for = Some(self.aadhaar.aadhaar.value.clone());
        self.aadhaar.otp.reset();
        self.aadhaar.otp.transaction_id = Some(transaction_id);
        self.bump(FieldKind::Otp);
        Ok(())
    }

    fn fail(&mut self, target: SubmitTarget, message: String) -> Result<(), FieldError> {
        for &kind in target.fields() {
            self.field_mut(kind).mark_error(message.clone())?;
        }

        match target {
            SubmitTarget::GenerateOtp => {
                self.aadhaar.clear_otp_request();
                self.bump(FieldKind::Otp);
            }
            SubmitTarget::VerifyOtp
                if self.config.otp_expiry == OtpExpiryPolicy::RequireRegeneration
                    && is_expiry(&message) =>
            {
                tracing::debug!(session = %self.id, "OTP expired, regeneration required");
                self.aadhaar.otp_requested = false;
                self.aadhaar.otp_requested_for = None;
                self.aadhaar.otp.transaction_id = None;
                self.reopen(FieldKind::Aadhaar);
            }
            _ => {}
        }
        Ok(())
    }

    // ── Aggregate ───────────────────────────────────────────────────

    /// Recompute the fully-verified flag; yield an event on the false→true
    /// edge only.
    fn settle(&mut self) -> Option<CompletionEvent> {
        let now = notifier::recompute(self);
        let was = std::mem::replace(&mut self.fully_verified, now);
        match (was, now) {
            (false, true) => {
                tracing::info!(session = %self.id, "all verification checks passed");
                Some(CompletionEvent {
                    session_id: self.id,
                    client_id: self.client_id.clone(),
                    checks: self.checks(),
                    completed_at: Timestamp::now(),
                })
            }
            (true, false) => {
                tracing::debug!(session = %self.id, "fully verified flag cleared");
                None
            }
            _ => None,
        }
    }

    /// Return every field to its initial state.
    ///
    /// Outstanding tickets become stale. The fully-verified flag drops to
    /// false, so a later completion fires again.
    pub fn reset(&mut self) {
        self.aadhaar = AadhaarCategory::default();
        self.pan = PanCategory::default();
        self.company = CompanyCategory::default();
        self.gstin = GstinCategory::default();
        self.bank = BankCategory::default();
        self.fully_verified = false;
        self.generation += 1;
        tracing::debug!(session = %self.id, generation = self.generation, "session reset");
    }
}

fn guard(field: &VerificationField) -> Option<IgnoreReason> {
    if field.value.is_empty() {
        return Some(IgnoreReason::EmptyValue);
    }
    match field.status {
        FieldStatus::Pending => Some(IgnoreReason::InFlight),
        FieldStatus::Success => Some(IgnoreReason::AlreadyVerified),
        FieldStatus::Idle | FieldStatus::Error => None,
    }
}

fn guard_pair(a: &VerificationField, b: &VerificationField) -> Option<IgnoreReason> {
    if a.value.is_empty() || b.value.is_empty() {
        return Some(IgnoreReason::EmptyValue);
    }
    if a.status == FieldStatus::Pending || b.status == FieldStatus::Pending {
        return Some(IgnoreReason::InFlight);
    }
    if a.is_verified() && b.is_verified() {
        return Some(IgnoreReason::AlreadyVerified);
    }
    None
}

fn is_expiry(message: &str) -> bool {
    message.to_lowercase().contains("expired")
}

// ─── Tests ───────────────────────────────────────────────────────────
