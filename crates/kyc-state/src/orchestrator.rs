//! # Submit Orchestrator
//!
//! Drives a [`VerificationSession`] against a [`VerificationApi`]: begin,
//! call, complete, notify. The remote call is the only suspension point.
//!
//! [`Verifier::submit_all`] dispatches several independent targets at once
//! and polls their calls concurrently on the current task with
//! `FuturesUnordered`. Each outcome is applied to the session as soon as it
//! arrives. The futures never touch the session, so there is nothing to
//! lock.

use std::sync::Arc;

use futures_util::stream::{FuturesUnordered, StreamExt};
use kyc_client::{VerificationApi, VerificationOutcome, VerificationPayload};
use kyc_core::{FieldError, ValidationError};
use serde::Serialize;

use crate::notifier::{CompletionEvent, Notifier};
use crate::session::VerificationSession;
use crate::ticket::{Completion, IgnoreReason, Submission, SubmitTarget, SubmitTicket};

/// What happened to one submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ReportKind {
    Ignored { reason: IgnoreReason },
    Rejected { message: String },
    Verified { message: Option<String> },
    Failed { message: Option<String> },
    Stale,
}

/// Per-target result of a submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitReport {
    pub target: SubmitTarget,
    #[serde(flatten)]
    pub result: ReportKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<VerificationPayload>,
    /// Set on the submit that completed the session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<CompletionEvent>,
}

impl SubmitReport {
    fn immediate(target: SubmitTarget, result: ReportKind) -> Self {
        Self {
            target,
            result,
            payload: None,
            completed: None,
        }
    }

    fn ignored(target: SubmitTarget, reason: IgnoreReason) -> Self {
        Self::immediate(target, ReportKind::Ignored { reason })
    }

    fn rejected(target: SubmitTarget, error: &ValidationError) -> Self {
        Self::immediate(
            target,
            ReportKind::Rejected {
                message: error.guidance().to_string(),
            },
        )
    }

    pub fn is_verified(&self) -> bool {
        matches!(self.result, ReportKind::Verified { .. })
    }
}

/// Runs submissions for a session and dispatches completions.
pub struct Verifier<A: VerificationApi + ?Sized = dyn VerificationApi> {
    api: Arc<A>,
    notifier: Notifier,
}

impl<A: VerificationApi + ?Sized> std::fmt::Debug for Verifier<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Verifier")
            .field("api", &self.api.api_name())
            .field("notifier", &self.notifier)
            .finish()
    }
}

impl<A: VerificationApi + ?Sized> Verifier<A> {
    pub fn new(api: Arc<A>, notifier: Notifier) -> Self {
        Self { api, notifier }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Submit one target and wait for its outcome.
    pub async fn submit(
        &self,
        session: &mut VerificationSession,
        target: SubmitTarget,
    ) -> Result<SubmitReport, FieldError> {
        let ticket = match session.begin_submit(target)? {
            Submission::Ignored(reason) => return Ok(SubmitReport::ignored(target, reason)),
            Submission::Rejected(e) => return Ok(SubmitReport::rejected(target, &e)),
            Submission::Dispatched(ticket) => ticket,
        };
        let outcome = ticket.request().send(&*self.api).await;
        self.finish(session, ticket, outcome).await
    }

    /// Submit several independent targets; calls run concurrently.
    ///
    /// Reports come back in completion order, preceded by those that never
    /// reached the network.
    pub async fn submit_all(
        &self,
        session: &mut VerificationSession,
        targets: &[SubmitTarget],
    ) -> Result<Vec<SubmitReport>, FieldError> {
        let mut reports = Vec::with_capacity(targets.len());
        let mut in_flight = FuturesUnordered::new();

        for &target in targets {
            match session.begin_submit(target)? {
                Submission::Ignored(reason) => reports.push(SubmitReport::ignored(target, reason)),
                Submission::Rejected(e) => reports.push(SubmitReport::rejected(target, &e)),
                Submission::Dispatched(ticket) => {
                    let api = &*self.api;
                    in_flight.push(async move {
                        let outcome = ticket.request().send(api).await;
                        (ticket, outcome)
                    });
                }
            }
        }

        tracing::debug!(
            session = %session.id(),
            dispatched = in_flight.len(),
            "running verification batch"
        );

        while let Some((ticket, outcome)) = in_flight.next().await {
            reports.push(self.finish(session, ticket, outcome).await?);
        }
        Ok(reports)
    }

    async fn finish(
        &self,
        session: &mut VerificationSession,
        ticket: SubmitTicket,
        outcome: VerificationOutcome,
    ) -> Result<SubmitReport, FieldError> {
        let target = ticket.target();
        let payload = outcome.payload.clone();
        let result = if outcome.ok {
            ReportKind::Verified {
                message: outcome.message.clone(),
            }
        } else {
            ReportKind::Failed {
                message: outcome.message.clone(),
            }
        };

        match session.complete(ticket, outcome)? {
            Completion::Stale => Ok(SubmitReport::immediate(target, ReportKind::Stale)),
            Completion::Applied { completed } => {
                if let Some(event) = &completed {
                    self.notifier.notify(event).await;
                }
                Ok(SubmitReport {
                    target,
                    result,
                    payload,
                    completed,
                })
            }
        }
    }
}
