//! Pause between failover attempts.
//!
//! After a node refuses or times out, the client waits before asking the
//! host provider for the next node. Consecutive connectivity failures double
//! the wait so a cluster that is restarting is not hammered.

use rand::Rng;
use std::time::Duration;

/// Wait before re-selecting a node after `failures` consecutive connectivity
/// failures within one call.
///
/// No failures means no wait. The doubled delay is capped at `max`, and up to
/// a tenth of it is added as jitter so concurrent callers spread out.
pub fn reselect_delay(failures: u32, base: Duration, max: Duration) -> Duration {
    if failures == 0 {
        return Duration::ZERO;
    }

    let factor = 1u32.checked_shl(failures - 1).unwrap_or(u32::MAX);
    let delay = base.saturating_mul(factor).min(max);

    let spread = delay.as_millis() as u64 / 10;
    if spread == 0 {
        return delay;
    }
    delay + Duration::from_millis(rand::thread_rng().gen_range(0..spread))
}
