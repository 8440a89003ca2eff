//! Inbound half of a session.

use futures_util::StreamExt;
use slirc_proto::{LineCodec, Message};
use tokio::io::ReadHalf;
use tokio::sync::mpsc;
use tokio_util::codec::FramedRead;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::bot::Bot;
use crate::network::Transport;

/// Read lines until the server goes away, the deadline passes, or the
/// session is shut down. Every parsed message goes through dispatch and the
/// channel tracker; those no handler consumed are queued on `incoming`.
///
/// Returns the read half so the socket can be reassembled for handoff.
pub(super) async fn read_loop(
    bot: Bot,
    mut lines: FramedRead<ReadHalf<Transport>, LineCodec>,
    incoming: mpsc::Sender<Message>,
    shutdown: CancellationToken,
) -> ReadHalf<Transport> {
    let deadline = bot.config().ping_timeout();
    let mut consumer_gone = false;

    loop {
        let next = tokio::select! {
            _ = shutdown.cancelled() => break,
            next = tokio::time::timeout(deadline, lines.next()) => next,
        };

        let line = match next {
            Err(_) => {
                warn!(timeout_ms = deadline.as_millis() as u64, "Server silent past ping timeout");
                break;
            }
            Ok(None) => {
                info!("Server closed the connection");
                break;
            }
            Ok(Some(Err(e))) => {
                warn!(error = %e, "Read error");
                break;
            }
            Ok(Some(Ok(line))) => line,
        };

        let Some(msg) = Message::parse(&line) else {
            debug!(line = %line, "Dropping malformed line");
            continue;
        };
        debug!(raw = %msg.raw, "Received");

        if bot.process(&msg) || consumer_gone {
            continue;
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            sent = incoming.send(msg) => {
                if sent.is_err() {
                    debug!("Incoming queue has no reader, delivering to triggers only");
                    consumer_gone = true;
                }
            }
        }
    }

    shutdown.cancel();
    lines.into_inner()
}
