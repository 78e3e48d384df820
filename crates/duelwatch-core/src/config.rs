//! Compiled-in target and timing constants.
//!
//! The tool watches one fixed pointer chain in one fixed process; none of
//! these values are runtime-configurable.

/// Target process, anchor module and pointer chain layout.
pub mod target {
    /// Process hosting the card game client.
    pub const PROCESS_NAME: &str = "masterduel.exe";

    /// Module whose load address anchors all offset arithmetic.
    pub const MODULE_NAME: &str = "GameAssembly.dll";

    /// Offset from the module base to the chain's entry pointer.
    pub const BASE_OFFSET: u64 = 0x02E1_3350;

    /// Byte offsets applied in order during chain resolution. Each step
    /// dereferences a 64-bit little-endian pointer; the final address
    /// holds the 4-byte card ID.
    pub const OFFSET_CHAIN: [u64; 7] = [0xB8, 0x0, 0x50, 0x40, 0xC8, 0x150, 0x21C];
}

/// Timing constants for polling, backoff and log rate limiting.
pub mod timing {
    use std::time::Duration;

    /// Steady-state interval between samples.
    pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(300);

    /// Delay before retrying after a failed resolve or read.
    pub const ERROR_BACKOFF: Duration = Duration::from_millis(500);

    /// Minimum interval between repeated error log lines.
    pub const ERROR_LOG_WINDOW: Duration = Duration::from_secs(5);
}
