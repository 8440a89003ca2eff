//! Error types for slirc-bot.
//!
//! Each concern gets its own enum; [`BotError`] is what the public API
//! returns and wraps the others.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tokio::task::JoinError;

use crate::config::ValidationError;

// ============================================================================
// Bot Errors (public API)
// ============================================================================

/// Errors surfaced by [`crate::Bot`].
#[derive(Debug, Error)]
pub enum BotError {
    #[error("invalid configuration: {}", join_errors(.0))]
    Config(Vec<ValidationError>),

    #[error("failed to connect to {host}: {source}")]
    Connect {
        host: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid TLS server name: {0}")]
    TlsServerName(String),

    #[error("TLS handshake with {host} failed: {source}")]
    Tls {
        host: String,
        #[source]
        source: io::Error,
    },

    #[error("handoff failed: {0}")]
    Handoff(#[from] HandoffError),

    #[error("bot has already been started")]
    AlreadyStarted,

    #[error("session task failed: {0}")]
    Task(#[from] JoinError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// ============================================================================
// Handoff Errors (unix socket descriptor passing)
// ============================================================================

/// Errors from passing a live connection between processes.
#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("handoff socket {name}: {source}")]
    Socket {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("handoff i/o: {0}")]
    Io(#[from] io::Error),

    #[cfg(unix)]
    #[error("descriptor passing failed: {0}")]
    Sys(#[from] nix::errno::Errno),

    #[error("peer sent no descriptor")]
    NoDescriptor,

    #[error("only plain TCP sessions can be handed off")]
    NotTcp,

    #[error("connection handoff is not supported on this platform")]
    Unsupported,

    #[error("handoff worker failed: {0}")]
    Task(#[from] JoinError),
}

// ============================================================================
// Stats Errors (channel counter persistence)
// ============================================================================

/// Errors reading or writing a channel stats file.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("stats file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("stats file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_lists_every_problem() {
        let err = BotError::Config(vec![
            ValidationError::EmptyNick,
            ValidationError::ZeroPingTimeout,
        ]);
        let text = err.to_string();
        assert!(text.contains("nick"));
        assert!(text.contains("; "));
    }

    #[test]
    fn handoff_error_converts() {
        let err: BotError = HandoffError::NoDescriptor.into();
        assert!(matches!(err, BotError::Handoff(HandoffError::NoDescriptor)));
    }
}
