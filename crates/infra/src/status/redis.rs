//! Redis-backed status store.
//!
//! Documents are written with `SET key value EX ttl`, so every write
//! refreshes the retention window; reads that miss (never written or
//! expired) come back as `None`. Each call is a single self-contained
//! request, so one client handle is safely shared across threads.

use std::time::Duration;

use procstatus_core::{ProcessId, StatusDocument};

use crate::config::StatusConfig;

use super::store::{DEFAULT_NAMESPACE, StatusStore, StoreError, status_key};

#[derive(Debug, Clone)]
pub struct RedisStatusStore {
    client: redis::Client,
    namespace: String,
}

impl RedisStatusStore {
    /// Connect parameters only; no connection is made until the first call.
    pub fn new(redis_url: impl AsRef<str>) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url.as_ref())
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            namespace: DEFAULT_NAMESPACE.to_string(),
        })
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Build a store from loaded configuration.
    pub fn from_config(config: &StatusConfig) -> Result<Self, StoreError> {
        Ok(Self::new(&config.redis_url)?.with_namespace(&config.namespace))
    }

    fn connection(&self) -> Result<redis::Connection, StoreError> {
        self.client
            .get_connection()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

impl StatusStore for RedisStatusStore {
    fn get(&self, id: &ProcessId) -> Result<Option<StatusDocument>, StoreError> {
        let mut conn = self.connection()?;

        let raw: Option<String> = redis::cmd("GET")
            .arg(status_key(&self.namespace, id))
            .query(&mut conn)
            .map_err(|e| StoreError::Unavailable(format!("GET failed: {e}")))?;

        match raw {
            Some(payload) => serde_json::from_str(&payload)
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

        let mut conn = self.connection()?;

        let _: () = redis::cmd("SET")
            .arg(status_key(&self.namespace, id))
            .arg(payload)
            .arg("EX")
            .arg(ttl.as_secs())
            .query(&mut conn)
            .map_err(|e| StoreError::Unavailable(format!("SET failed: {e}")))?;

        Ok(())
    }
}
