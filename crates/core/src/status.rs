//! Lifecycle status of a tracked process.

use serde::{Deserialize, Serialize};

/// Where a process currently sits in its lifecycle.
///
/// Transitions follow call order, not a hard-enforced machine:
/// queued → working → completed | failed. A retry does not change the
/// status by itself; the failure that follows it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Enqueued, waiting to be picked up
    Queued,
    /// Currently executing
    Working,
    /// The last recorded attempt failed
    Failed,
    /// Finished successfully
    Completed,
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Failed | Status::Completed)
    }
}
