//! Completion sinks: log line, persisted flag, external record update.

use std::sync::Arc;

use async_trait::async_trait;
use kyc_client::{ClientKycUpdate, RecordsClient};

use crate::flag_store::{CompletionFlag, FlagStore};
use crate::notifier::{CompletionEvent, CompletionSink, SinkError};

/// Emits one `info!` line per completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl CompletionSink for LogSink {
    async fn on_complete(&self, event: &CompletionEvent) -> Result<(), SinkError> {
        tracing::info!(
            session = %event.session_id,
            client = event.client_id.as_ref().map(|c| c.as_str()).unwrap_or("-"),
            completed_at = %event.completed_at,
            "KYC verification complete"
        );
        Ok(())
    }

    fn sink_name(&self) -> &str {
        "log"
    }
}

/// Writes a [`CompletionFlag`] under the event's record key.
///
/// [`FlagStore`] is synchronous and may touch the filesystem, so the write
/// runs on tokio's blocking pool.
#[derive(Clone)]
pub struct FlagSink {
    store: Arc<dyn FlagStore>,
}

impl FlagSink {
    pub fn new(store: Arc<dyn FlagStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CompletionSink for FlagSink {
    async fn on_complete(&self, event: &CompletionEvent) -> Result<(), SinkError> {
        let store = Arc::clone(&self.store);
        let key = event.record_key();
        let flag = CompletionFlag::from(event);
        tokio::task::spawn_blocking(move || store.put(&key, flag)).await??;
        Ok(())
    }

    fn sink_name(&self) -> &str {
        "flag-store"
    }
}

/// Reports the check map to the client-KYC record endpoint.
///
/// Sessions without a client id have nothing to report; the event is
/// skipped.
#[derive(Debug, Clone)]
pub struct RecordSink {
    client: RecordsClient,
}

impl RecordSink {
    pub fn new(client: RecordsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CompletionSink for RecordSink {
    async fn on_complete(&self, event: &CompletionEvent) -> Result<(), SinkError> {
        let Some(client_id) = &event.client_id else {
            tracing::debug!(session = %event.session_id, "no client id, skipping record update");
            return Ok(());
        };
        let update = ClientKycUpdate::new(event.checks, event.completed_at);
        self.client.patch_client_kyc(client_id, &update).await?;
        Ok(())
    }

    fn sink_name(&self) -> &str {
        "client-records"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flag_store::{FileFlagStore, InMemoryFlagStore};
    use kyc_core::{ClientId, SessionId, Timestamp, VerificationChecks};

    fn event(client: Option<&str>) -> CompletionEvent {
        CompletionEvent {
            session_id: SessionId::new(),
            client_id: client.map(|c| ClientId::new(c).unwrap()),
            checks: VerificationChecks {
                aadhaar: true,
                owner_pan: true,
                business_pan: true,
                cin: true,
                din: true,
                gstin: true,
                bank: true,
            },
            completed_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn flag_sink_writes_under_record_key() {
        let store = InMemoryFlagStore::new();
        let sink = FlagSink::new(Arc::new(store.clone()));
        let e = event(Some("client-9"));
        sink.on_complete(&e).await.unwrap();

        let flag = store.get("client-9").unwrap().unwrap();
        assert!(flag.kyc_verified);
        assert_eq!(flag.session_id, e.session_id);
    }

    #[tokio::test]
    async fn flag_sink_writes_file_store_off_the_async_thread() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileFlagStore::new(dir.path().join("flags.json")));
        let sink = FlagSink::new(store.clone());
        let e = event(None);
        sink.on_complete(&e).await.unwrap();

        let flag = store.get(&e.record_key()).unwrap().unwrap();
        assert!(flag.kyc_verified);
        assert_eq!(flag.completed_at, e.completed_at);
    }

    #[tokio::test]
    async fn flag_sink_reports_store_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the write fail.
        let path = dir.path().join("flags.json");
        std::fs::create_dir(&path).unwrap();
        let sink = FlagSink::new(Arc::new(FileFlagStore::new(path)));
        assert!(matches!(
            sink.on_complete(&event(None)).await,
            Err(SinkError::FlagStore(_))
        ));
    }

    #[tokio::test]
    async fn record_sink_skips_anonymous_sessions() {
        // Nothing listens here; a request would fail.
        let config = kyc_client::RecordsConfig::local_mock("http://127.0.0.1:1", "t").unwrap();
        let sink = RecordSink::new(RecordsClient::new(config).unwrap());
        sink.on_complete(&event(None)).await.unwrap();
    }

    #[tokio::test]
    async fn log_sink_never_fails() {
        LogSink.on_complete(&event(None)).await.unwrap();
    }
}
