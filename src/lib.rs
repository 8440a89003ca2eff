//! slirc-bot - Straylight IRC bot engine.
//!
//! One IRC session per [`Bot`]: a TCP or TLS connection, a throttled
//! outbound queue, ordered [`Trigger`]s that see every inbound message
//! before the [`Incoming`] queue does, channel tracking, SASL PLAIN, and
//! live handoff of the connection to a newly started process.

pub mod bot;
pub mod config;
pub mod error;
pub mod handlers;
pub mod network;
pub mod state;

pub use bot::{Bot, BotBuilder, Incoming};
pub use config::{BotConfig, Config};
pub use error::{BotError, HandoffError, StatsError};
pub use handlers::{Handler, OnceTrigger, Trigger};
pub use network::Running;
pub use slirc_proto::{Message, Prefix};
pub use state::{Channel, ChannelUser, SessionState, UserModes};
