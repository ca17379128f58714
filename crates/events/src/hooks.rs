//! Named lifecycle callbacks.
//!
//! An execution framework holds a [`LifecycleHooks`] implementation as a
//! plain dependency and invokes the callback matching each lifecycle point:
//! enqueue → start → (retry)* → failure | completion. The trait makes no
//! assumptions about what a callback does or where it writes; implementations
//! decide that.
//!
//! ## Ordering contract
//!
//! `on_retry` must be invoked **before** `on_failure` for the same attempt.
//! Retry bookkeeping snapshots the pre-failure state of the record, so the
//! failure callback running first would contaminate the snapshot.

use std::sync::Arc;

use serde_json::Value as JsonValue;

/// Callbacks invoked by the execution framework at lifecycle points.
///
/// Every callback receives the event payload; the payload carries the process
/// identity (see [`crate::payload::identity_from`]). Errors surface to the
/// invoking framework, which decides whether the underlying job proceeds.
/// By convention status recording is best-effort instrumentation and should
/// never abort the execution it observes.
pub trait LifecycleHooks: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    /// A job was placed on the queue. `job_class` is the descriptive name of
    /// the job being enqueued.
    fn on_enqueue(&self, payload: &JsonValue, job_class: &str) -> Result<(), Self::Error>;

    /// Execution of the job is about to begin.
    fn on_start(&self, payload: &JsonValue) -> Result<(), Self::Error>;

    /// The framework decided to re-attempt the job after a failure. Must run
    /// before `on_failure` for that same attempt.
    fn on_retry(&self, payload: &JsonValue) -> Result<(), Self::Error>;

    /// An attempt failed. `error` is the failure description reported by the
    /// framework.
    fn on_failure(&self, error: &str, payload: &JsonValue) -> Result<(), Self::Error>;

    /// The job finished successfully.
    fn on_completion(&self, payload: &JsonValue) -> Result<(), Self::Error>;
}

impl<H> LifecycleHooks for Arc<H>
where
    H: LifecycleHooks + ?Sized,
{
    type Error = H::Error;

    fn on_enqueue(&self, payload: &JsonValue, job_class: &str) -> Result<(), Self::Error> {
        (**self).on_enqueue(payload, job_class)
    }

    fn on_start(&self, payload: &JsonValue) -> Result<(), Self::Error> {
        (**self).on_start(payload)
    }

    fn on_retry(&self, payload: &JsonValue) -> Result<(), Self::Error> {
        (**self).on_retry(payload)
    }

    fn on_failure(&self, error: &str, payload: &JsonValue) -> Result<(), Self::Error> {
        (**self).on_failure(error, payload)
    }

    fn on_completion(&self, payload: &JsonValue) -> Result<(), Self::Error> {
        (**self).on_completion(payload)
    }
}
