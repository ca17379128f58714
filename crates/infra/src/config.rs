//! Configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

/// Status tracking configuration.
#[derive(Debug, Clone)]
pub struct StatusConfig {
    /// Redis connection URL.
    pub redis_url: String,
    /// Key namespace, prefixed to every status key.
    pub namespace: String,
    /// Retention window refreshed on every write.
    pub ttl: Duration,
}

impl StatusConfig {
    /// Load configuration from environment variables, with defaults for
    /// everything not set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let ttl_secs: u64 = get("PROCSTATUS_TTL_SECS")
            .unwrap_or_else(|| "86400".to_string())
            .parse()
            .context("PROCSTATUS_TTL_SECS must be a whole number of seconds")?;

        Ok(Self {
            redis_url: get("PROCSTATUS_REDIS_URL")
                .unwrap_or_else(|| "redis://localhost:6379".to_string()),
            namespace: get("PROCSTATUS_NAMESPACE").unwrap_or_else(|| "procstatus".to_string()),
            ttl: Duration::from_secs(ttl_secs),
        })
    }
}
