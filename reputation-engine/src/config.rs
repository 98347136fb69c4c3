//! Tunables of the engine.
use std::time::Duration;

/// Runtime limits of the coordinator and the interaction recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Upper bound for one attempt of a unit of work, commit included.
    pub transaction_timeout: Duration,
    /// Extra attempts granted to a unit that failed with a transient error.
    pub max_transient_retries: usize,
    /// Backoff unit between attempts; the n-th retry waits up to `retry_base_delay * 2^n`.
    pub retry_base_delay: Duration,
    /// Upper bound for a single interaction log write.
    pub recorder_timeout: Duration,
    /// Pending interaction records buffered before new ones are dropped.
    pub recorder_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            transaction_timeout: Duration::from_secs(5),
            max_transient_retries: 1,
            retry_base_delay: Duration::from_millis(50),
            recorder_timeout: Duration::from_secs(2),
            recorder_capacity: 1024,
        }
    }
}
