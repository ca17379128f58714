//! Infrastructure layer: store clients, lifecycle tracker, config.

pub mod config;
pub mod status;

#[cfg(test)]
mod integration_tests;

pub use config::StatusConfig;
pub use status::{
    Clock, InMemoryStatusStore, ManualClock, StatusHooks, StatusStore, StatusTracker, StoreError,
    SystemClock, TrackError,
};
#[cfg(feature = "redis")]
pub use status::RedisStatusStore;
