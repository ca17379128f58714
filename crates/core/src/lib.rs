//! `procstatus-core` — domain foundation for process status tracking.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the process identity, the status document with its shallow-merge semantics,
//! and the domain error model.

pub mod document;
pub mod error;
pub mod id;
pub mod status;

pub use document::{RetryRecord, StatusDocument, StatusPatch};
pub use error::{DomainError, DomainResult};
pub use id::ProcessId;
pub use status::Status;
