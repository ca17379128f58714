//! Status store abstraction and the in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};

use procstatus_core::{ProcessId, StatusDocument};

use super::clock::{Clock, SystemClock};

/// Default key namespace.
pub const DEFAULT_NAMESPACE: &str = "procstatus";

/// Store error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The underlying store could not be reached or rejected the command.
    #[error("status store unavailable: {0}")]
    Unavailable(String),
    #[error("failed to serialize status document: {0}")]
    Serialization(String),
    /// A stored value could not be parsed back into a document.
    #[error("corrupt status document: {0}")]
    Deserialization(String),
}

/// Build the store key for a process identity.
pub fn status_key(namespace: &str, id: &ProcessId) -> String {
    format!("{namespace}:status:{id}")
}

/// Key-value persistence boundary for status documents.
///
/// One key per process identity; values are JSON documents whose expiry is
/// refreshed on every write. There is no partial-update primitive: callers
/// read, merge in memory, and write the whole document back.
pub trait StatusStore: Send + Sync {
    /// Fetch and deserialize the current document. `Ok(None)` when the key
    /// is missing or expired.
    fn get(&self, id: &ProcessId) -> Result<Option<StatusDocument>, StoreError>;

    /// Serialize and write the document, refreshing the expiry window.
    fn set(
        &self,
        id: &ProcessId,
        document: &StatusDocument,
        ttl: Duration,
    ) -> Result<(), StoreError>;
}

impl<S> StatusStore for Arc<S>
where
    S: StatusStore + ?Sized,
{
    fn get(&self, id: &ProcessId) -> Result<Option<StatusDocument>, StoreError> {
        (**self).get(id)
    }

    fn set(
        &self,
        id: &ProcessId,
        document: &StatusDocument,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        (**self).set(id, document, ttl)
    }
}

#[derive(Debug, Clone)]
struct StoredEntry {
    payload: String,
    expires_at: DateTime<Utc>,
}

/// In-memory status store for tests/dev.
///
/// Holds raw JSON payloads with expiry deadlines, evaluated against a
/// pluggable [`Clock`] so expiry behavior is testable without real time.
#[derive(Debug)]
pub struct InMemoryStatusStore<C = SystemClock> {
    namespace: String,
    entries: Mutex<HashMap<String, StoredEntry>>,
    clock: C,
}

impl InMemoryStatusStore<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for InMemoryStatusStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> InMemoryStatusStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Plant a raw value under an identity's key, bypassing serialization.
    /// Lets tests stage corrupt or foreign data.
    pub fn put_raw(&self, id: &ProcessId, payload: impl Into<String>, ttl: Duration) {
        let expires_at = self.clock.now() + chrono::Duration::from_std(ttl).unwrap_or_default();
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            status_key(&self.namespace, id),
            StoredEntry {
                payload: payload.into(),
                expires_at,
            },
        );
    }
}

impl<C: Clock> StatusStore for InMemoryStatusStore<C> {
    fn get(&self, id: &ProcessId) -> Result<Option<StatusDocument>, StoreError> {
        let key = status_key(&self.namespace, id);
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap();

        if entries.get(&key).is_some_and(|e| e.expires_at <= now) {
            entries.remove(&key);
            return Ok(None);
        }

        match entries.get(&key) {
            Some(entry) => serde_json::from_str(&entry.payload)
                .map(Some)
                .map_err(|e| StoreError::Deserialization(e.to_string())),
            None => Ok(None),
        }
    }

    fn set(
        &self,
        id: &ProcessId,
        document: &StatusDocument,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let payload = serde_json::to_string(document)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let expires_at = self.clock.now() + chrono::Duration::from_std(ttl).unwrap_or_default();
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            status_key(&self.namespace, id),
            StoredEntry {
                payload,
                expires_at,
            },
        );
        Ok(())
    }
}
