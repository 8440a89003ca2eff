//! Session engine.
//!
//! ```text
//!               ┌──────────── read_loop ────────────┐
//!  server ──▶   │ lines ─▶ parse ─▶ dispatch ─▶ track │ ─▶ incoming queue
//!               └───────────────────────────────────┘
//!               ┌──────────── write_loop ───────────┐
//!  server ◀──   │ send ◀─ throttle ◀─ outgoing queue │ ◀── Bot::send
//!               └───────────────────────────────────┘
//!                         supervise (teardown / handoff)
//! ```
//!
//! Both loops share one cancellation token. Whichever side stops first
//! cancels it; the supervisor then collects the two halves and either drops
//! them or hands the reassembled socket to a newer instance.

mod handshake;
mod lifecycle;
mod reader;
mod writer;

pub use lifecycle::Running;

use slirc_proto::{LineCodec, Message};
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{info, warn, Instrument};

use super::handoff::{self, HandoffAddr};
use super::transport::{native_tls_config, Transport};
use crate::bot::Bot;
use crate::error::BotError;
use crate::state::SessionState;

/// Queue ends a session takes over when it starts.
pub(crate) struct SessionQueues {
    pub outgoing: mpsc::UnboundedReceiver<String>,
    pub incoming: mpsc::Sender<Message>,
}

/// Connect (or adopt a connection), spawn the session tasks and queue
/// registration.
pub(crate) async fn start(bot: &Bot, queues: SessionQueues) -> Result<Running, BotError> {
    bot.set_state(SessionState::Connecting);
    let (transport, resumed) = match open(bot).await {
        Ok(opened) => opened,
        Err(e) => {
            bot.set_state(SessionState::Disconnected);
            return Err(e);
        }
    };

    let handoff_capable = handoff::SUPPORTED && !transport.is_tls();
    bot.set_state(if resumed {
        SessionState::Active
    } else {
        SessionState::Registering
    });

    let config = bot.config();
    let shutdown = bot.shutdown_token();
    let span = bot.span().clone();
    let (read_half, write_half) = tokio::io::split(transport);

    let reader = tokio::spawn(
        reader::read_loop(
            bot.clone(),
            FramedRead::new(read_half, LineCodec::new()),
            queues.incoming,
            shutdown.clone(),
        )
        .instrument(span.clone()),
    );
    let writer = tokio::spawn(
        writer::write_loop(
            FramedWrite::new(write_half, LineCodec::new()),
            queues.outgoing,
            config.throttle_delay(),
            shutdown.clone(),
        )
        .instrument(span.clone()),
    );

    if !resumed {
        handshake::register(bot);
    }

    let task = tokio::spawn(
        lifecycle::supervise(bot.clone(), reader, writer, shutdown, handoff_capable)
            .instrument(span),
    );
    Ok(Running::new(task))
}

/// Adopt a running instance's connection if asked to, else dial.
/// The flag is `true` for an adopted connection.
async fn open(bot: &Bot) -> Result<(Transport, bool), BotError> {
    let config = bot.config();

    if config.hijack && config.ssl {
        warn!("Handoff only works for plain TCP sessions, dialing");
    } else if config.hijack {
        let addr = HandoffAddr::new(&config.host, &config.nick);
        match handoff::adopt(&addr).await {
            Ok(Some(adopted)) => {
                if let Some(prefix) = adopted.prefix.filter(|p| !p.name.is_empty()) {
                    bot.set_current_nick(&prefix.name);
                    bot.set_prefix(prefix);
                }
                info!(socket = %addr, "Took over connection from previous instance");
                return Ok((Transport::Tcp(adopted.stream), true));
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Takeover failed, dialing"),
        }
    }

    let tls = config
        .ssl
        .then(|| bot.tls_config().unwrap_or_else(native_tls_config));
    let transport = Transport::connect(&config.host, config.hostname(), tls).await?;
    info!(host = %config.host, tls = config.ssl, "Connected");
    Ok((transport, false))
}
