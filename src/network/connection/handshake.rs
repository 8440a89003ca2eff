//! Registration lines queued at the start of a fresh session.

use slirc_proto::command;
use tracing::debug;

use crate::bot::Bot;

/// Queue registration: SASL (`CAP REQ`, `NICK`, `USER`) when enabled,
/// otherwise `PASS` (if set), `USER`, `NICK`.
pub(super) fn register(bot: &Bot) {
    let config = bot.config();
    let nick = config.nick.as_str();
    let user = command::user(nick, "8", config.realname());

    if config.sasl {
        let password = config.password.as_deref().unwrap_or_default();
        debug!(account = %config.sasl_username(), "Registering with SASL");
        bot.sasl_authenticate(config.sasl_username(), password);
        bot.send(command::nick(nick));
        bot.send(user);
        return;
    }

    debug!("Registering");
    if let Some(password) = config.password.as_deref().filter(|p| !p.is_empty()) {
        bot.send(command::pass(password));
    }
    bot.send(user);
    bot.send(command::nick(nick));
}
