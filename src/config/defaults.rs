//! Default value functions for configuration.

use std::path::PathBuf;

// =============================================================================
// Session Defaults
// =============================================================================

/// Pause after each outbound line, in milliseconds.
pub fn default_throttle_delay_ms() -> u64 {
    200
}

/// Longest the server may stay silent before the session is dropped.
pub fn default_ping_timeout_ms() -> u64 {
    300_000
}

// =============================================================================
// Persistence Defaults
// =============================================================================

pub fn default_stats_dir() -> PathBuf {
    PathBuf::from(".")
}
