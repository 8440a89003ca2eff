//! State management module.
//!
//! Session lifecycle state plus the channel tracker that follows
//! membership, user modes and per-sender message counts.

mod channel;
mod modes;
mod session;
mod stats;

pub use channel::{Channel, ChannelUser, Channels};
pub use modes::UserModes;
pub use session::SessionState;
pub use stats::{load_stats, save_stats, stats_path};
