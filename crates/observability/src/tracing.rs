//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber for the process.
///
/// Filtering defaults to `info` and is overridable via `RUST_LOG`. Output is
/// line-oriented JSON so tracking events land in log pipelines as structured
/// records. Repeated calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
