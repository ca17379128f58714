//! Process identity.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Opaque correlation key for one job execution instance.
///
/// Supplied by the execution framework on every lifecycle event; it must stay
/// stable across all events for the same job instance, since it is the only
/// key correlating them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(String);

impl ProcessId {
    /// Create a process id. The empty string is rejected: it cannot name a
    /// store key.
    pub fn new(id: impl Into<String>) -> DomainResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(DomainError::invalid_id("process id must not be empty"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProcessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ProcessId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
