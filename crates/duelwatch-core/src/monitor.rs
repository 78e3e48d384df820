//! Background sampling loop.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::timing;
use crate::error::Error;
use crate::memory::ReadMemory;
use crate::retry::{RateLimitedLog, RetryPolicy, resolve_until_ready};
use crate::samples::SampleSet;
use crate::shutdown::ShutdownSignal;

enum PollOutcome {
    Sampled,
    ReadFailed(Error),
}

/// Continuously samples the card slot behind the pointer chain.
///
/// Every cycle re-resolves the full chain before reading: intermediate
/// pointers move while the game runs, so a cached final address goes stale
/// between samples. The loop's only observable effects are inserts into
/// the shared sample set and log output; it never terminates on its own
/// and stops only when the shutdown signal is triggered.
pub struct CardMonitor<R: ReadMemory> {
    reader: R,
    entry_address: u64,
    offsets: Vec<u64>,
    seen: Arc<SampleSet>,
    policy: RetryPolicy,
    sample_interval: Duration,
}

impl<R: ReadMemory> CardMonitor<R> {
    pub fn new(reader: R, entry_address: u64, offsets: &[u64], seen: Arc<SampleSet>) -> Self {
        Self {
            reader,
            entry_address,
            offsets: offsets.to_vec(),
            seen,
            policy: RetryPolicy::default(),
            sample_interval: timing::SAMPLE_INTERVAL,
        }
    }

    /// Override the default intervals (tests use near-zero delays).
    pub fn with_timing(mut self, policy: RetryPolicy, sample_interval: Duration) -> Self {
        self.policy = policy;
        self.sample_interval = sample_interval;
        self
    }

    /// Run until `shutdown` is triggered.
    pub fn run(&self, shutdown: &ShutdownSignal) {
        info!(
            "Monitoring card IDs at {:#x} through {} pointer levels",
            self.entry_address,
            self.offsets.len()
        );

        // Independent rate limits: a resolve failure burst must not
        // suppress read failure diagnostics, and vice versa.
        let mut resolve_log = RateLimitedLog::new(self.policy.log_window);
        let mut read_log = RateLimitedLog::new(self.policy.log_window);

        while !shutdown.is_shutdown() {
            match self.poll_once(&mut resolve_log, shutdown) {
                Some(PollOutcome::Sampled) => {
                    if shutdown.wait(self.sample_interval) {
                        break;
                    }
                }
                Some(PollOutcome::ReadFailed(e)) => {
                    if read_log.ready() {
                        warn!("Failed to read card ID: {}", e);
                    }
                    if shutdown.wait(self.policy.backoff) {
                        break;
                    }
                }
                None => break, // shutdown during resolution
            }
        }

        debug!("Card monitor stopped");
    }

    /// One sampling cycle: re-resolve the chain, read the slot, record the
    /// ID. Returns `None` when shutdown interrupted the resolve retry loop.
    fn poll_once(
        &self,
        resolve_log: &mut RateLimitedLog,
        shutdown: &ShutdownSignal,
    ) -> Option<PollOutcome> {
        let address = resolve_until_ready(
            &self.reader,
            self.entry_address,
            &self.offsets,
            &self.policy,
            resolve_log,
            shutdown,
        )?;

        match self.reader.read_u32(address) {
            Ok(id) => {
                if self.seen.insert_if_absent(id) {
                    info!("New card ID observed: {}", id);
                }
                Some(PollOutcome::Sampled)
            }
            Err(e) => Some(PollOutcome::ReadFailed(e)),
        }
    }
}
