//! Binds lifecycle callbacks to tracker operations.

use serde_json::Value as JsonValue;
use tracing::debug;

use procstatus_events::{LifecycleHooks, PayloadError, identity_from};

use super::store::{StatusStore, StoreError};
use super::tracker::StatusTracker;

/// Error surfaced from a tracking callback.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TrackError {
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Lifecycle callbacks that record status transitions through a tracker.
///
/// Hand an instance to the execution framework as a plain dependency; it
/// invokes the callback matching each lifecycle point. Errors are reported,
/// never retried here: recording status is best-effort instrumentation and
/// must not abort the execution it observes, so callers conventionally
/// log-and-continue on failure.
#[derive(Debug, Clone)]
pub struct StatusHooks<S> {
    tracker: StatusTracker<S>,
}

impl<S: StatusStore> StatusHooks<S> {
    pub fn new(tracker: StatusTracker<S>) -> Self {
        Self { tracker }
    }

    /// The underlying tracker, for direct `describe` access.
    pub fn tracker(&self) -> &StatusTracker<S> {
        &self.tracker
    }
}

impl<S: StatusStore> LifecycleHooks for StatusHooks<S> {
    type Error = TrackError;

    fn on_enqueue(&self, payload: &JsonValue, job_class: &str) -> Result<(), TrackError> {
        let id = identity_from(payload)?;
        self.tracker.track_enqueue(&id, payload.clone(), job_class)?;
        Ok(())
    }

    fn on_start(&self, payload: &JsonValue) -> Result<(), TrackError> {
        let id = identity_from(payload)?;
        self.tracker.track_start(&id)?;
        Ok(())
    }

    fn on_retry(&self, payload: &JsonValue) -> Result<(), TrackError> {
        let id = identity_from(payload)?;
        self.tracker.track_retry(&id)?;
        Ok(())
    }

    fn on_failure(&self, error: &str, payload: &JsonValue) -> Result<(), TrackError> {
        let id = identity_from(payload)?;
        // The error text is logged, not persisted; the record keeps
        // timestamps only.
        debug!(process_id = %id, error, "recording failed attempt");
        self.tracker.track_failure(&id)?;
        Ok(())
    }

    fn on_completion(&self, payload: &JsonValue) -> Result<(), TrackError> {
        let id = identity_from(payload)?;
        self.tracker.track_completion(&id)?;
        Ok(())
    }
}
