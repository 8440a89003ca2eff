//! Channel tracker.
//!
//! Follows the channels the bot is in: who is there, which tracked modes
//! they hold, and how many messages each sender has posted. Counters are
//! persisted to the stats directory after every counted message.

use std::collections::HashMap;
use std::path::PathBuf;

use dashmap::DashMap;
use slirc_proto::{fold_name, names_equal, ChannelExt, Message};
use tracing::{debug, warn};

use super::modes::UserModes;
use super::stats::{load_stats, save_stats, stats_path};

/// Mode letters that consume an argument. `l` only does when being set.
const ARG_MODES: &str = "beIkoOvhaq";

/// A user seen in a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelUser {
    pub nick: String,
    pub user: String,
    pub host: String,
    pub modes: UserModes,
}

impl ChannelUser {
    fn from_message(msg: &Message) -> Self {
        Self {
            nick: msg.name().to_owned(),
            user: msg.user().to_owned(),
            host: msg.host().to_owned(),
            modes: UserModes::default(),
        }
    }
}

/// Snapshot of one joined channel.
#[derive(Debug, Clone, Default)]
pub struct Channel {
    /// Name as first seen.
    pub name: String,
    /// Messages posted per sender nick.
    pub counts: HashMap<String, u64>,
    /// Members keyed by case-folded nick.
    pub users: HashMap<String, ChannelUser>,
}

impl Channel {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Self::default()
        }
    }

    /// Look up a member by nick, ignoring case.
    pub fn user(&self, nick: &str) -> Option<&ChannelUser> {
        self.users.get(&fold_name(nick))
    }

    /// Messages counted for `nick`.
    pub fn count(&self, nick: &str) -> u64 {
        self.counts.get(nick).copied().unwrap_or(0)
    }

    fn add_user(&mut self, user: ChannelUser) {
        self.users.insert(fold_name(&user.nick), user);
    }

    fn remove_user(&mut self, nick: &str) -> Option<ChannelUser> {
        self.users.remove(&fold_name(nick))
    }

    fn rename_user(&mut self, old: &str, new: &str) {
        if let Some(mut user) = self.remove_user(old) {
            user.nick = new.to_owned();
            self.add_user(user);
        }
    }

    fn apply_modes(&mut self, changes: &str, args: &[String]) {
        let mut args = args.iter();
        let mut adding = true;
        for letter in changes.chars() {
            match letter {
                '+' => adding = true,
                '-' => adding = false,
                'l' if adding => {
                    args.next();
                }
                c if ARG_MODES.contains(c) => {
                    let Some(target) = args.next() else { break };
                    if let Some(user) = self.users.get_mut(&fold_name(target)) {
                        user.modes.apply(adding, c);
                    }
                }
                _ => {}
            }
        }
    }
}

/// All channels the bot is in, keyed by case-folded name.
#[derive(Debug, Default)]
pub struct Channels {
    channels: DashMap<String, Channel>,
    stats_dir: Option<PathBuf>,
}

impl Channels {
    /// A tracker persisting counters under `stats_dir`, if given.
    pub fn new(stats_dir: Option<PathBuf>) -> Self {
        Self {
            channels: DashMap::new(),
            stats_dir,
        }
    }

    /// Start tracking `name`, loading saved counters. No-op if already tracked.
    pub fn open(&self, name: &str) {
        let key = fold_name(name);
        if self.channels.contains_key(&key) {
            return;
        }

        let mut channel = Channel::new(name);
        if let Some(dir) = &self.stats_dir {
            match load_stats(&stats_path(dir, name)) {
                Ok(Some(counts)) => {
                    debug!(channel = %name, senders = counts.len(), "Loaded channel stats");
                    channel.counts = counts;
                }
                Ok(None) => {}
                Err(e) => warn!(channel = %name, error = %e, "Ignoring unreadable channel stats"),
            }
        }
        self.channels.entry(key).or_insert(channel);
    }

    /// Stop tracking `name`.
    pub fn close(&self, name: &str) -> Option<Channel> {
        self.channels.remove(&fold_name(name)).map(|(_, channel)| channel)
    }

    /// Snapshot of a tracked channel.
    pub fn get(&self, name: &str) -> Option<Channel> {
        self.channels
            .get(&fold_name(name))
            .map(|entry| entry.value().clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.channels.contains_key(&fold_name(name))
    }

    /// Names of all tracked channels, in no particular order.
    pub fn names(&self) -> Vec<String> {
        self.channels
            .iter()
            .map(|entry| entry.value().name.clone())
            .collect()
    }

    /// Update tracking from one inbound message. `own_nick` is our current nick.
    pub fn observe(&self, own_nick: &str, msg: &Message) {
        match msg.command.as_str() {
            "JOIN" => self.on_join(own_nick, msg),
            "PART" => {
                let channel = msg.param(0).unwrap_or(msg.to.as_str());
                self.on_leave(own_nick, channel, msg.name());
            }
            "KICK" => {
                if let (Some(channel), Some(victim)) = (msg.param(0), msg.param(1)) {
                    self.on_leave(own_nick, channel, victim);
                }
            }
            "QUIT" => {
                for mut channel in self.channels.iter_mut() {
                    channel.remove_user(msg.name());
                }
            }
            "NICK" => {
                let new_nick = msg.param(0).unwrap_or(msg.content.as_str());
                if new_nick.is_empty() {
                    return;
                }
                for mut channel in self.channels.iter_mut() {
                    channel.rename_user(msg.name(), new_nick);
                }
            }
            "MODE" => {
                if msg.to.is_channel_name() && msg.params.len() >= 2 {
                    if let Some(mut channel) = self.channels.get_mut(&fold_name(&msg.to)) {
                        channel.apply_modes(&msg.params[1], &msg.params[2..]);
                    }
                }
            }
            "PRIVMSG" => {
                if msg.to.is_channel_name() && !msg.from.is_empty() {
                    self.count_message(&msg.to, &msg.from);
                }
            }
            _ => {}
        }
    }

    fn on_join(&self, own_nick: &str, msg: &Message) {
        let channel = msg.to.as_str();
        if channel.is_empty() {
            return;
        }
        if names_equal(msg.name(), own_nick) {
            self.open(channel);
        }
        if let Some(mut entry) = self.channels.get_mut(&fold_name(channel)) {
            entry.add_user(ChannelUser::from_message(msg));
        }
    }

    fn on_leave(&self, own_nick: &str, channel: &str, nick: &str) {
        if names_equal(nick, own_nick) {
            if self.close(channel).is_some() {
                debug!(channel = %channel, "Left channel");
            }
        } else if let Some(mut entry) = self.channels.get_mut(&fold_name(channel)) {
            entry.remove_user(nick);
        }
    }

    fn count_message(&self, channel: &str, sender: &str) {
        // Saved under the name the counters were loaded from, whatever
        // casing the server relays.
        let (name, counts) = {
            let Some(mut entry) = self.channels.get_mut(&fold_name(channel)) else {
                return;
            };
            *entry.counts.entry(sender.to_owned()).or_insert(0) += 1;
            (entry.name.clone(), entry.counts.clone())
        };

        if let Some(dir) = &self.stats_dir {
            if let Err(e) = save_stats(&stats_path(dir, &name), &counts) {
                warn!(channel = %name, error = %e, "Failed to save channel stats");
            }
        }
    }
}
