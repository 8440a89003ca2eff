//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::BotConfig;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("bot.nick is required")]
    EmptyNick,
    #[error("bot.nick must not contain spaces, got '{0}'")]
    InvalidNick(String),
    #[error("bot.host must be host:port, got '{0}'")]
    InvalidHost(String),
    #[error("bot.ping_timeout_ms must be greater than zero")]
    ZeroPingTimeout,
    #[error("bot.sasl requires bot.password")]
    MissingSaslPassword,
    #[error("bot.channels entry '{0}' is not a channel name")]
    InvalidChannel(String),
}

/// Validate a bot configuration, returning all errors found.
pub fn validate(config: &BotConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.nick.is_empty() {
        errors.push(ValidationError::EmptyNick);
    } else if config.nick.contains(' ') {
        errors.push(ValidationError::InvalidNick(config.nick.clone()));
    }

    let port_ok = config
        .host
        .rsplit_once(':')
        .is_some_and(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok());
    if !port_ok {
        errors.push(ValidationError::InvalidHost(config.host.clone()));
    }

    // A zero throttle is allowed; a zero deadline would drop every session.
    if config.ping_timeout_ms == 0 {
        errors.push(ValidationError::ZeroPingTimeout);
    }

    if config.sasl && config.password.as_deref().is_none_or(str::is_empty) {
        errors.push(ValidationError::MissingSaslPassword);
    }

    for entry in &config.channels {
        let (name, _) = slirc_proto::split_channel_key(entry);
        if !slirc_proto::ChannelExt::is_channel_name(name) {
            errors.push(ValidationError::InvalidChannel(entry.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
