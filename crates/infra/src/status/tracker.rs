//! Lifecycle tracker: translates lifecycle events into document mutations.

use std::time::Duration;

use chrono::Utc;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use procstatus_core::{ProcessId, Status, StatusDocument, StatusPatch};

use super::store::{StatusStore, StoreError};

/// Retention window refreshed on every write.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 3600);

/// State machine over one process's status document.
///
/// Every operation reads the existing document (absent means an empty merge
/// base), shallow-merges the fields named by the event, and writes the whole
/// document back with a refreshed expiry. The read-modify-write is not
/// atomic: two writers racing on the same identity can interleave, and the
/// later `set` drops fields the earlier one merged in unless it re-merges
/// them itself. Callers are expected to run at most one attempt per identity
/// at a time.
#[derive(Debug, Clone)]
pub struct StatusTracker<S> {
    store: S,
    ttl: Duration,
}

impl<S: StatusStore> StatusTracker<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            ttl: DEFAULT_TTL,
        }
    }

    /// Override the retention window.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Record that a job was placed on the queue. De-facto creation point of
    /// the document: captures the enqueue payload and job class alongside
    /// the queued status and enqueue time.
    pub fn track_enqueue(
        &self,
        id: &ProcessId,
        vars: JsonValue,
        job_class: impl Into<String>,
    ) -> Result<StatusDocument, StoreError> {
        self.apply(
            id,
            StatusPatch::default()
                .with_status(Status::Queued)
                .with_created_at(Utc::now())
                .with_job_class(job_class)
                .with_vars(vars),
        )
    }

    /// Record that execution began.
    pub fn track_start(&self, id: &ProcessId) -> Result<StatusDocument, StoreError> {
        self.apply(
            id,
            StatusPatch::default()
                .with_status(Status::Working)
                .with_started_at(Utc::now()),
        )
    }

    /// Snapshot the current attempt into the retry history.
    ///
    /// Copies the enqueue/start timestamps recorded so far plus a fresh
    /// failed-at timestamp, and appends the record to `retries`. Must run
    /// before [`StatusTracker::track_failure`] for the same attempt, since
    /// the snapshot wants the pre-failure state.
    pub fn track_retry(&self, id: &ProcessId) -> Result<StatusDocument, StoreError> {
        let base = self.merge_base(id)?;

        let mut retries = base.retries.clone();
        retries.push(base.retry_snapshot(Utc::now()));

        let next = base.merge(StatusPatch::default().with_retries(retries));
        self.store.set(id, &next, self.ttl)?;
        debug!(process_id = %id, attempts = next.retries.len(), "retry recorded");
        Ok(next)
    }

    /// Record that the job failed.
    pub fn track_failure(&self, id: &ProcessId) -> Result<StatusDocument, StoreError> {
        self.apply(
            id,
            StatusPatch::default()
                .with_status(Status::Failed)
                .with_failed_at(Utc::now()),
        )
    }

    /// Record that the job finished successfully.
    pub fn track_completion(&self, id: &ProcessId) -> Result<StatusDocument, StoreError> {
        self.apply(
            id,
            StatusPatch::default()
                .with_status(Status::Completed)
                .with_stopped_at(Utc::now()),
        )
    }

    /// Current document for an identity, if any.
    ///
    /// A corrupt stored value reads back as absent (with a logged warning)
    /// so readers fail open; store unavailability always propagates.
    pub fn describe(&self, id: &ProcessId) -> Result<Option<StatusDocument>, StoreError> {
        match self.store.get(id) {
            Ok(document) => Ok(document),
            Err(StoreError::Deserialization(reason)) => {
                warn!(process_id = %id, %reason, "stored status document is corrupt, treating as absent");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn merge_base(&self, id: &ProcessId) -> Result<StatusDocument, StoreError> {
        Ok(self.describe(id)?.unwrap_or_default())
    }

    fn apply(&self, id: &ProcessId, patch: StatusPatch) -> Result<StatusDocument, StoreError> {
        let next = self.merge_base(id)?.merge(patch);
        self.store.set(id, &next, self.ttl)?;
        debug!(process_id = %id, status = ?next.status, "status document updated");
        Ok(next)
    }
}
