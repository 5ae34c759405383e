//! Cross-node retry policy.
//!
//! # Responsibilities
//! - Decide whether a failed attempt may be repeated on another node
//! - Pause before re-selecting a node, longer after each failure
//!
//! # Design Decisions
//! - Opt-in; a single attempt per call is the default
//! - Only connectivity failures are retried, never protocol errors
//! - Non-idempotent calls (index without id) are never retried

use std::time::Duration;

use crate::config::RetryConfig;
use crate::error::ClientError;
use crate::resilience::backoff::reselect_delay;

/// How many attempts a call gets and how long to wait between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    /// One attempt, no retries.
    pub fn single_attempt() -> Self {
        Self {
            max_attempts: 1,
            base_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        if !config.enabled {
            return Self::single_attempt();
        }
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms,
        }
    }

    /// Whether attempt number `attempt` (1-based) that failed with `error`
    /// may be followed by another one.
    pub fn should_retry(&self, attempt: u32, error: &ClientError, idempotent: bool) -> bool {
        attempt < self.max_attempts && idempotent && error.is_connectivity()
    }

    /// Delay before the attempt following failed attempt `attempt`.
    pub fn delay(&self, attempt: u32) -> Duration {
        reselect_delay(
            attempt,
            Duration::from_millis(self.base_delay_ms),
            Duration::from_millis(self.max_delay_ms),
        )
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::single_attempt()
    }
}
