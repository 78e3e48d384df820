//! # duelwatch-core
//!
//! Core library for the duelwatch card monitor.
//!
//! This crate provides:
//! - Windows process discovery and memory reading
//! - Multi-level pointer chain resolution with indefinite retry
//! - The background sampling loop and the shared card ID set
//! - The combo rule table and matcher
//!
//! The binary in `duelwatch-cli` wires these together: a monitor thread
//! keeps sampling the card slot while the operator drains the set and
//! checks combos from a line-oriented prompt.

pub mod chain;
pub mod combo;
pub mod config;
pub mod error;
pub mod memory;
pub mod monitor;
pub mod retry;
pub mod samples;
pub mod shutdown;

pub use chain::resolve_chain;
pub use combo::{Combo, ComboTable};
pub use error::{Error, Result};
pub use memory::{MemoryReader, ProcessHandle, ReadMemory};
pub use monitor::CardMonitor;
pub use retry::{RateLimitedLog, RetryPolicy, resolve_until_ready};
pub use samples::SampleSet;
pub use shutdown::ShutdownSignal;
