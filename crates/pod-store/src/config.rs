use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the Pod executor.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields, default)]
pub struct StoreConfig {
    /// Timeout configuration for the two operation classes
    pub timeouts: TimeoutConfig,

    /// TTL of the engine's per-resource document cache in seconds
    pub cache_ttl_secs: u64,

    /// Maximum concurrent operations.
    /// Limits how many executor operations can run simultaneously, to keep
    /// a large read flight from overwhelming the Pod server.
    pub max_concurrent_operations: usize,

    /// Behavior of the 409-conflict retry ladder
    pub conflict_retry: ConflictRetryPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            timeouts: TimeoutConfig::default(),
            cache_ttl_secs: 300,
            max_concurrent_operations: 8,
            conflict_retry: ConflictRetryPolicy::default(),
        }
    }
}

impl StoreConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// Timeout configuration for query and update traffic
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields, default)]
pub struct TimeoutConfig {
    /// Timeout for reads (HEAD/GET and engine selects) in milliseconds
    pub query_ms: u64,

    /// Timeout for writes (PUT/PATCH) in milliseconds
    pub update_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            query_ms: 30_000,
            update_ms: 60_000,
        }
    }
}

impl TimeoutConfig {
    /// Get query timeout as Duration
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_ms)
    }

    /// Get update timeout as Duration
    pub fn update_timeout(&self) -> Duration {
        Duration::from_millis(self.update_ms)
    }
}

/// What to do when the server answers a SPARQL PATCH with 409.
///
/// The two steps encode the recovery dialogue of a known server family;
/// both default to on and can be disabled per store without code edits.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields, default)]
pub struct ConflictRetryPolicy {
    /// Replay the PATCH once with an identical body
    pub replay_patch: bool,

    /// After a failed replay, retry once as PUT with the same body
    pub put_fallback: bool,
}

impl Default for ConflictRetryPolicy {
    fn default() -> Self {
        Self {
            replay_patch: true,
            put_fallback: true,
        }
    }
}
