//! Indefinite retry with rate-limited diagnostics.
//!
//! While the game is loading or mid-shuffle the pointer chain dereferences
//! into unmapped memory for a while. The policy here is to keep retrying
//! until the chain becomes valid again, logging at most once per window so
//! sustained unavailability does not flood the log.

use std::time::{Duration, Instant};

use tracing::warn;

use crate::chain::resolve_chain;
use crate::config::timing;
use crate::memory::ReadMemory;
use crate::shutdown::ShutdownSignal;

/// Backoff and log throttling for the retry loops.
///
/// Injectable so tests can run with near-zero delays.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Sleep between attempts after a failure.
    pub backoff: Duration,
    /// Minimum interval between repeated error log lines.
    pub log_window: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            backoff: timing::ERROR_BACKOFF,
            log_window: timing::ERROR_LOG_WINDOW,
        }
    }
}

/// Tracks when an error class last produced a log line.
///
/// The first failure logs immediately; after that at most one line per
/// window. Each failure class (resolve vs. read) keeps its own instance so
/// one does not suppress the other's diagnostics.
#[derive(Debug)]
pub struct RateLimitedLog {
    window: Duration,
    last: Option<Instant>,
}

impl RateLimitedLog {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// True if a line may be logged now; records the emission time.
    pub fn ready(&mut self) -> bool {
        let now = Instant::now();
        match self.last {
            Some(last) if now.duration_since(last) < self.window => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// Resolve the pointer chain, retrying until it succeeds.
///
/// On success the address is returned immediately. Failures are logged
/// through `log` and retried after the policy backoff; the caller is
/// insulated from all resolution errors at the cost of unbounded latency.
/// Returns `None` only when shutdown is signaled during a backoff wait.
pub fn resolve_until_ready<R: ReadMemory>(
    reader: &R,
    entry_address: u64,
    offsets: &[u64],
    policy: &RetryPolicy,
    log: &mut RateLimitedLog,
    shutdown: &ShutdownSignal,
) -> Option<u64> {
    loop {
        match resolve_chain(reader, entry_address, offsets) {
            Ok(address) => return Some(address),
            Err(e) => {
                if log.ready() {
                    warn!("Pointer chain resolution failed: {}, retrying...", e);
                }
            }
        }

        if shutdown.wait(policy.backoff) {
            return None;
        }
    }
}
