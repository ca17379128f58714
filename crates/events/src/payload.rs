//! Lifecycle event payloads.
//!
//! Every event payload raised by the execution framework must carry the
//! process identity under the [`IDENTITY_FIELD`] key. Without it an event
//! cannot be correlated to a status record, so extraction fails fast and no
//! write is attempted.

use serde_json::Value as JsonValue;
use thiserror::Error;

use procstatus_core::ProcessId;

/// Payload field that carries the process identity.
pub const IDENTITY_FIELD: &str = "PROCESS_ID";

/// Error raised while reading an event payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PayloadError {
    /// The payload lacked the identity field, or its value was not a
    /// non-empty string.
    #[error("event payload is missing identity field {0:?}")]
    MissingIdentity(&'static str),
}

/// Extract the process identity from an event payload.
pub fn identity_from(payload: &JsonValue) -> Result<ProcessId, PayloadError> {
    payload
        .get(IDENTITY_FIELD)
        .and_then(JsonValue::as_str)
        .and_then(|raw| ProcessId::new(raw).ok())
        .ok_or(PayloadError::MissingIdentity(IDENTITY_FIELD))
}
