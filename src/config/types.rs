//! Core configuration types.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use super::defaults::{default_ping_timeout_ms, default_stats_dir, default_throttle_delay_ms};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level file read by the `slircbot` binary.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Connection and identity settings.
    pub bot: BotConfig,
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Everything a [`crate::Bot`] needs to run one session.
///
/// Options are fixed once the bot is built; nothing here is consulted
/// through shared mutable state afterwards.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BotConfig {
    /// Server address as `host:port`.
    pub host: String,
    /// Initial nickname.
    pub nick: String,
    /// Real name sent in USER (default: the nick).
    #[serde(default)]
    pub realname: Option<String>,
    /// Server password, or the SASL password when `sasl` is set.
    #[serde(default)]
    pub password: Option<String>,
    /// Connect over TLS.
    #[serde(default)]
    pub ssl: bool,
    /// Authenticate with SASL PLAIN during registration.
    #[serde(default)]
    pub sasl: bool,
    /// SASL account name (default: the nick).
    #[serde(default)]
    pub sasl_username: Option<String>,
    /// Channels to join once registered, as `name` or `name:key`.
    #[serde(default)]
    pub channels: Vec<String>,
    /// Try to adopt the connection of a running instance before dialing.
    #[serde(default)]
    pub hijack: bool,
    #[serde(default = "default_throttle_delay_ms")]
    pub throttle_delay_ms: u64,
    #[serde(default = "default_ping_timeout_ms")]
    pub ping_timeout_ms: u64,
    /// Directory for `<channel>.stats` files. Empty disables persistence.
    #[serde(default = "default_stats_dir")]
    pub stats_dir: PathBuf,
}

impl BotConfig {
    /// A config with every optional field at its default.
    pub fn new(host: impl Into<String>, nick: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            nick: nick.into(),
            realname: None,
            password: None,
            ssl: false,
            sasl: false,
            sasl_username: None,
            channels: Vec::new(),
            hijack: false,
            throttle_delay_ms: default_throttle_delay_ms(),
            ping_timeout_ms: default_ping_timeout_ms(),
            stats_dir: default_stats_dir(),
        }
    }

    pub fn throttle_delay(&self) -> Duration {
        Duration::from_millis(self.throttle_delay_ms)
    }

    pub fn ping_timeout(&self) -> Duration {
        Duration::from_millis(self.ping_timeout_ms)
    }

    pub fn realname(&self) -> &str {
        self.realname.as_deref().unwrap_or(&self.nick)
    }

    pub fn sasl_username(&self) -> &str {
        self.sasl_username.as_deref().unwrap_or(&self.nick)
    }

    /// Host part of `host`, used as the TLS server name.
    pub fn hostname(&self) -> &str {
        match self.host.rsplit_once(':') {
            Some((host, _)) => host.trim_start_matches('[').trim_end_matches(']'),
            None => &self.host,
        }
    }

    /// Stats directory, or `None` when persistence is disabled.
    pub fn stats_dir(&self) -> Option<&Path> {
        if self.stats_dir.as_os_str().is_empty() {
            None
        } else {
            Some(&self.stats_dir)
        }
    }
}

/// Log output configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_file_gets_defaults() {
        let config: Config = toml::from_str(
            r#"
            [bot]
            host = "irc.libera.chat:6667"
            nick = "slircbot"
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.format, LogFormat::Pretty);
        let bot = config.bot;
        assert_eq!(bot, BotConfig::new("irc.libera.chat:6667", "slircbot"));
        assert_eq!(bot.throttle_delay(), Duration::from_millis(200));
        assert_eq!(bot.ping_timeout(), Duration::from_secs(300));
        assert_eq!(bot.realname(), "slircbot");
        assert_eq!(bot.sasl_username(), "slircbot");
        assert_eq!(bot.stats_dir(), Some(Path::new(".")));
    }

    #[test]
    fn full_file_parses() {
        let config: Config = toml::from_str(
            r##"
            [bot]
            host = "irc.example.net:6697"
            nick = "helper"
            realname = "Helper Bot"
            password = "hunter2"
            ssl = true
            sasl = true
            sasl_username = "helper-account"
            channels = ["#rust", "#secret:key"]
            hijack = true
            throttle_delay_ms = 0
            ping_timeout_ms = 60000
            stats_dir = ""

            [logging]
            format = "json"
            "##,
        )
        .unwrap();

        let bot = &config.bot;
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(bot.realname(), "Helper Bot");
        assert_eq!(bot.sasl_username(), "helper-account");
        assert_eq!(bot.channels, vec!["#rust", "#secret:key"]);
        assert_eq!(bot.throttle_delay(), Duration::ZERO);
        assert_eq!(bot.stats_dir(), None);
        assert_eq!(bot.hostname(), "irc.example.net");
    }

    #[test]
    fn hostname_strips_brackets() {
        assert_eq!(BotConfig::new("[::1]:6667", "n").hostname(), "::1");
        assert_eq!(BotConfig::new("localhost", "n").hostname(), "localhost");
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load("/nonexistent/slircbot.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
