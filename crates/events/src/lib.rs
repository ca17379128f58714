//! `procstatus-events` — lifecycle event surface.
//!
//! Mechanics only: payload identity extraction and the callback interface an
//! execution framework invokes at each lifecycle point. No transport or
//! storage assumptions live here.

pub mod hooks;
pub mod payload;

pub use hooks::LifecycleHooks;
pub use payload::{IDENTITY_FIELD, PayloadError, identity_from};
