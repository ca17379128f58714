//! Status document model and shallow-merge semantics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::status::Status;

/// Snapshot of one retry attempt.
///
/// Captures the timestamps recorded on the document at the moment of the
/// retry; fields never observed stay absent from the serialized record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// When the attempt being retried failed.
    pub failed_at: DateTime<Utc>,
}

/// Cumulative record of one process's lifecycle state.
///
/// The document is merge-updated: a write only adds or overwrites the fields
/// named by the incoming [`StatusPatch`], never deletes previously recorded
/// ones. Each timestamp appears only once its lifecycle event has fired, and
/// absent fields are omitted from the serialized JSON entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    /// Enqueue time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Execution start time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Failure time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<DateTime<Utc>>,
    /// Completion time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<DateTime<Utc>>,
    /// Descriptive job class, captured at enqueue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_class: Option<String>,
    /// Original enqueue payload, kept for later inspection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vars: Option<JsonValue>,
    /// Retry attempt history, append-only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub retries: Vec<RetryRecord>,
}

impl StatusDocument {
    /// Shallow-merge `patch` onto this document.
    ///
    /// Fields named by the patch win on collision; everything else carries
    /// over unchanged. Note `retries` is replaced wholesale when the patch
    /// names it; append semantics are the writer's responsibility (see
    /// [`StatusDocument::retry_snapshot`]).
    pub fn merge(mut self, patch: StatusPatch) -> Self {
        if let Some(status) = patch.status {
            self.status = Some(status);
        }
        if let Some(created_at) = patch.created_at {
            self.created_at = Some(created_at);
        }
        if let Some(started_at) = patch.started_at {
            self.started_at = Some(started_at);
        }
        if let Some(failed_at) = patch.failed_at {
            self.failed_at = Some(failed_at);
        }
        if let Some(stopped_at) = patch.stopped_at {
            self.stopped_at = Some(stopped_at);
        }
        if let Some(job_class) = patch.job_class {
            self.job_class = Some(job_class);
        }
        if let Some(vars) = patch.vars {
            self.vars = Some(vars);
        }
        if let Some(retries) = patch.retries {
            self.retries = retries;
        }
        self
    }

    /// Build a retry record from the state known right now: the enqueue and
    /// start timestamps recorded so far (copied only if present) plus the
    /// failure time of the attempt being retried.
    pub fn retry_snapshot(&self, failed_at: DateTime<Utc>) -> RetryRecord {
        RetryRecord {
            created_at: self.created_at,
            started_at: self.started_at,
            failed_at,
        }
    }
}

/// The fields named by one lifecycle event, to be merged onto the existing
/// document. `None` means "not mentioned": the document's value survives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusPatch {
    pub status: Option<Status>,
    pub created_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
    pub stopped_at: Option<DateTime<Utc>>,
    pub job_class: Option<String>,
    pub vars: Option<JsonValue>,
    pub retries: Option<Vec<RetryRecord>>,
}

impl StatusPatch {
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    pub fn with_started_at(mut self, at: DateTime<Utc>) -> Self {
        self.started_at = Some(at);
        self
    }

    pub fn with_failed_at(mut self, at: DateTime<Utc>) -> Self {
        self.failed_at = Some(at);
        self
    }

    pub fn with_stopped_at(mut self, at: DateTime<Utc>) -> Self {
        self.stopped_at = Some(at);
        self
    }

    pub fn with_job_class(mut self, job_class: impl Into<String>) -> Self {
        self.job_class = Some(job_class.into());
        self
    }

    pub fn with_vars(mut self, vars: JsonValue) -> Self {
        self.vars = Some(vars);
        self
    }

    pub fn with_retries(mut self, retries: Vec<RetryRecord>) -> Self {
        self.retries = Some(retries);
        self
    }
}
