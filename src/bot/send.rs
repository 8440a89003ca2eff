//! Outbound helpers.
//!
//! Everything here only queues lines; the session's write loop sends them
//! in order, one per throttle interval.

use slirc_proto::command::{self, ACTION_OVERHEAD};
use slirc_proto::{line_budget, split_channel_key, split_text, Message};
use tracing::debug;

use super::Bot;

impl Bot {
    /// Queue a raw line (without CRLF).
    pub fn send(&self, line: impl Into<String>) {
        if self.inner.outgoing.send(line.into()).is_err() {
            debug!("Session closed, dropping outbound line");
        }
    }

    /// Send `text` as PRIVMSGs to `target`, split to fit the line limit.
    pub fn msg(&self, target: &str, text: &str) {
        for chunk in split_text(text, self.budget("PRIVMSG", target)) {
            self.send(command::privmsg(target, chunk));
        }
    }

    /// Send `text` as NOTICEs to `target`, split to fit the line limit.
    pub fn notice(&self, target: &str, text: &str) {
        for chunk in split_text(text, self.budget("NOTICE", target)) {
            self.send(command::notice(target, chunk));
        }
    }

    /// Send `text` as CTCP ACTIONs (`/me`) to `target`.
    pub fn action(&self, target: &str, text: &str) {
        let budget = self
            .budget("PRIVMSG", target)
            .saturating_sub(ACTION_OVERHEAD);
        for chunk in split_text(text, budget) {
            self.send(command::action(target, chunk));
        }
    }

    /// Answer `msg` in its channel, or privately to its sender.
    pub fn reply(&self, msg: &Message, text: &str) {
        self.msg(msg.response_target(), text);
    }

    pub fn topic(&self, channel: &str, topic: &str) {
        self.send(command::topic(channel, topic));
    }

    /// Set `mode` (e.g. `+o`) for `user` in `channel`.
    pub fn ch_mode(&self, user: &str, channel: &str, mode: &str) {
        self.send(command::mode(channel, mode, user));
    }

    pub fn kick(&self, channel: &str, user: &str, reason: &str) {
        self.send(command::kick(channel, user, reason));
    }

    /// Join `channel`, given as `name` or `name:key`, and start tracking it.
    pub fn join(&self, channel: &str) {
        let (name, key) = split_channel_key(channel);
        self.inner.channels.open(name);
        self.send(command::join(name, key));
    }

    /// Leave `channel` and stop tracking it.
    pub fn part(&self, channel: &str) {
        self.inner.channels.close(channel);
        self.send(command::part(channel, None));
    }

    /// Ask the server for a new nick. [`Bot::nick`] changes once the server
    /// confirms it.
    pub fn set_nick(&self, nick: &str) {
        self.send(command::nick(nick));
    }

    fn budget(&self, verb: &str, target: &str) -> usize {
        line_budget(&self.prefix().to_string(), verb, target)
    }
}
