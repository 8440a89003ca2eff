//! Configuration loading and management.
//!
//! - [`types`]: the config structs (`Config`, `BotConfig`, `LoggingConfig`)
//! - [`defaults`]: serde default functions
//! - [`validation`]: startup checks returning every problem found

mod defaults;
mod types;
mod validation;

pub use types::{BotConfig, Config, ConfigError, LogFormat, LoggingConfig};
pub use validation::{validate, ValidationError};
