//! Integration test common infrastructure.
//!
//! Provides a scripted IRC server the bot under test connects to, and a
//! config helper tuned for fast tests.

pub mod server;

#[allow(unused_imports)]
pub use server::{MockServer, ServerConn};

use slirc_bot::BotConfig;

/// Config for a bot talking to `address`: no throttle, no stats files.
#[allow(dead_code)]
pub fn test_config(address: &str, nick: &str) -> BotConfig {
    let mut config = BotConfig::new(address, nick);
    config.throttle_delay_ms = 0;
    config.stats_dir = Default::default();
    config
}
