//! # Aggregate Notifier
//!
//! [`recompute`] derives the fully-verified flag. The session compares it
//! with the previous value on every transition and yields a
//! [`CompletionEvent`] on the false→true edge only; the [`Notifier`] then
//! hands that event to each registered [`CompletionSink`].
//!
//! Sink failures are logged and swallowed. A completion that could not be
//! reported is still a completion.

use std::sync::Arc;

use async_trait::async_trait;
use kyc_core::{ClientId, SessionId, Timestamp, VerificationChecks};
use serde::{Deserialize, Serialize};

use crate::flag_store::FlagStoreError;
use crate::session::VerificationSession;

/// Whether every required check of `session` passed.
pub fn recompute(session: &VerificationSession) -> bool {
    session.checks().all_passed()
}

/// Emitted once per false→true transition of the fully-verified flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEvent {
    pub session_id: SessionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<ClientId>,
    pub checks: VerificationChecks,
    pub completed_at: Timestamp,
}

impl CompletionEvent {
    /// Key under which the completion is recorded: the client id when the
    /// session has one, the session id otherwise.
    pub fn record_key(&self) -> String {
        match &self.client_id {
            Some(client) => client.as_str().to_string(),
            None => self.session_id.to_string(),
        }
    }
}

/// Errors reported by completion sinks.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("flag store: {0}")]
    FlagStore(#[from] FlagStoreError),
    #[error("record endpoint: {0}")]
    Records(#[from] kyc_client::ClientError),
    #[error("sink task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A side effect run on completion.
#[async_trait]
pub trait CompletionSink: Send + Sync {
    async fn on_complete(&self, event: &CompletionEvent) -> Result<(), SinkError>;

    /// Sink name, for logs.
    fn sink_name(&self) -> &str;
}

/// Fans completion events out to sinks, in registration order.
#[derive(Clone, Default)]
pub struct Notifier {
    sinks: Vec<Arc<dyn CompletionSink>>,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.sinks.iter().map(|s| s.sink_name()).collect();
        f.debug_struct("Notifier").field("sinks", &names).finish()
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: Arc<dyn CompletionSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Deliver `event` to every sink. Returns how many succeeded.
    pub async fn notify(&self, event: &CompletionEvent) -> usize {
        let mut delivered = 0;
        for sink in &self.sinks {
            match sink.on_complete(event).await {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!(
                    sink = sink.sink_name(),
                    session = %event.session_id,
                    "completion sink failed: {e}"
                ),
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting(AtomicUsize);

    #[async_trait]
    impl CompletionSink for Counting {
        async fn on_complete(&self, _event: &CompletionEvent) -> Result<(), SinkError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn sink_name(&self) -> &str {
            "counting"
        }
    }

    struct Failing;

    #[async_trait]
    impl CompletionSink for Failing {
        async fn on_complete(&self, _event: &CompletionEvent) -> Result<(), SinkError> {
            Err(SinkError::FlagStore(FlagStoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            ))))
        }

        fn sink_name(&self) -> &str {
            "failing"
        }
    }

    fn event(client: Option<&str>) -> CompletionEvent {
        CompletionEvent {
            session_id: SessionId::new(),
            client_id: client.map(|c| ClientId::new(c).unwrap()),
            checks: VerificationChecks::default(),
            completed_at: Timestamp::now(),
        }
    }

    #[test]
    fn recompute_tracks_checks() {
        let s = VerificationSession::default();
        assert!(!recompute(&s));
    }

    #[tokio::test]
    async fn failing_sink_does_not_block_others() {
        let counting = Arc::new(Counting(AtomicUsize::new(0)));
        let notifier = Notifier::new()
            .with_sink(Arc::new(Failing))
            .with_sink(counting.clone());

        assert_eq!(notifier.notify(&event(None)).await, 1);
        assert_eq!(counting.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn record_key_prefers_client_id() {
        assert_eq!(event(Some("client-7")).record_key(), "client-7");
        let e = event(None);
        assert_eq!(e.record_key(), e.session_id.to_string());
    }

    #[test]
    fn debug_lists_sink_names() {
        let notifier = Notifier::new().with_sink(Arc::new(Failing));
        assert!(format!("{notifier:?}").contains("failing"));
    }
}
