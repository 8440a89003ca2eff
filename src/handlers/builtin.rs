//! Handlers installed on every bot, ahead of user triggers.

use slirc_proto::{command, names_equal, response};
use tracing::{debug, info};

use super::trigger::{OnceTrigger, Trigger};

/// Answer server PINGs. Consumes the PING.
pub fn ping_pong() -> Trigger {
    Trigger::new(
        |_, msg| msg.command == "PING",
        |bot, msg| {
            let token = if msg.content.is_empty() {
                msg.param(0).unwrap_or_default()
            } else {
                msg.content.as_str()
            };
            bot.send(command::pong(token));
            true
        },
    )
}

/// Learn our full prefix from the server's echo of our own JOIN.
pub fn capture_own_prefix() -> Trigger {
    Trigger::new(
        |bot, msg| msg.command == "JOIN" && names_equal(msg.name(), &bot.nick()),
        |bot, msg| {
            if let Some(prefix) = &msg.prefix {
                debug!(prefix = %prefix, "Learned own prefix");
                bot.set_prefix(prefix.clone());
            }
            false
        },
    )
}

/// Follow server-confirmed changes of our own nick.
pub fn track_own_nick() -> Trigger {
    Trigger::new(
        |bot, msg| msg.command == "NICK" && names_equal(msg.name(), &bot.nick()),
        |bot, msg| {
            let new_nick = msg.param(0).unwrap_or(msg.content.as_str());
            if !new_nick.is_empty() {
                info!(nick = %new_nick, "Nick changed");
                bot.set_current_nick(new_nick);
            }
            false
        },
    )
}

/// Join the configured channels once registration completes.
pub fn join_channels() -> OnceTrigger {
    Trigger::new(
        |_, msg| response::is_registration_complete(&msg.command),
        |bot, _| {
            let channels = bot.config().channels.clone();
            info!(count = channels.len(), "Registered, joining channels");
            for channel in &channels {
                bot.join(channel);
            }
            false
        },
    )
    .once()
}
