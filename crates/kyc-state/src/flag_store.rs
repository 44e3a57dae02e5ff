//! Persisted completion flags.
//!
//! A flag is a cache of "this client finished KYC", written only when the
//! session reports a confirmed false→true edge. The session never reads it
//! back; its own field state is the source of truth.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use kyc_core::{SessionId, Timestamp, VerificationChecks};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::notifier::CompletionEvent;

/// One recorded completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionFlag {
    pub kyc_verified: bool,
    pub session_id: SessionId,
    pub checks: VerificationChecks,
    pub completed_at: Timestamp,
}

impl From<&CompletionEvent> for CompletionFlag {
    fn from(event: &CompletionEvent) -> Self {
        Self {
            kyc_verified: event.checks.all_passed(),
            session_id: event.session_id,
            checks: event.checks,
            completed_at: event.completed_at,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FlagStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt flag file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Storage for completion flags keyed by client (or session) id.
pub trait FlagStore: Send + Sync {
    fn put(&self, key: &str, flag: CompletionFlag) -> Result<(), FlagStoreError>;

    fn get(&self, key: &str) -> Result<Option<CompletionFlag>, FlagStoreError>;
}

/// Thread-safe in-memory flag store.
///
/// `parking_lot::RwLock` is never held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFlagStore {
    flags: Arc<RwLock<HashMap<String, CompletionFlag>>>,
}

impl InMemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.flags.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.read().is_empty()
    }
}

impl FlagStore for InMemoryFlagStore {
    fn put(&self, key: &str, flag: CompletionFlag) -> Result<(), FlagStoreError> {
        self.flags.write().insert(key.to_string(), flag);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<CompletionFlag>, FlagStoreError> {
        Ok(self.flags.read().get(key).cloned())
    }
}

/// Flag store backed by one JSON object on disk, `{ key: flag, ... }`.
///
/// Writes go to a sibling temp file and are renamed into place, so a crash
/// never leaves a half-written map.
#[derive(Debug)]
pub struct FileFlagStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileFlagStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, CompletionFlag>, FlagStoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|source| FlagStoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }
}

impl FlagStore for FileFlagStore {
    fn put(&self, key: &str, flag: CompletionFlag) -> Result<(), FlagStoreError> {
        let _guard = self.write_lock.lock();
        let mut flags = self.load()?;
        flags.insert(key.to_string(), flag);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(&flags)?)?;
        std::fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), key, "completion flag written");
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<CompletionFlag>, FlagStoreError> {
        Ok(self.load()?.remove(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag() -> CompletionFlag {
        CompletionFlag {
            kyc_verified: true,
            session_id: SessionId::new(),
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

    // ── InMemoryFlagStore ───────────────────────────────────────────

    #[test]
    fn in_memory_put_then_get() {
        let store = InMemoryFlagStore::new();
        assert!(store.is_empty());
        let f = flag();
        store.put("client-1", f.clone()).unwrap();
        assert_eq!(store.get("client-1").unwrap(), Some(f));
        assert_eq!(store.get("client-2").unwrap(), None);
        assert_eq!(store.len(), 1);
    }

    // ── FileFlagStore ───────────────────────────────────────────────

    #[test]
    fn file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileFlagStore::new(dir.path().join("flags.json"));
        assert_eq!(store.get("anyone").unwrap(), None);
    }

    #[test]
    fn file_store_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("flags.json");
        let store = FileFlagStore::new(&path);

        let a = flag();
        let b = flag();
        store.put("client-a", a.clone()).unwrap();
        store.put("client-b", b.clone()).unwrap();

        let reopened = FileFlagStore::new(&path);
        assert_eq!(reopened.get("client-a").unwrap(), Some(a));
        assert_eq!(reopened.get("client-b").unwrap(), Some(b));

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["client-a"]["kycVerified"], true);
        assert_eq!(raw["client-b"]["checks"]["businessPan"], true);
    }

    #[test]
    fn file_store_reports_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flags.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = FileFlagStore::new(&path);
        assert!(matches!(
            store.get("x"),
            Err(FlagStoreError::Corrupt { .. })
        ));
        assert!(store.put("x", flag()).is_err());
    }
}
