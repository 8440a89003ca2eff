//! Outbound half of a session.

use std::time::Duration;

use futures_util::SinkExt;
use slirc_proto::LineCodec;
use tokio::io::WriteHalf;
use tokio::sync::mpsc;
use tokio_util::codec::FramedWrite;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::network::Transport;

/// Write queued lines one at a time, pausing `delay` after each.
///
/// A failed write shuts the whole session down. Returns the write half so
/// the socket can be reassembled for handoff.
pub(super) async fn write_loop(
    mut sink: FramedWrite<WriteHalf<Transport>, LineCodec>,
    mut outgoing: mpsc::UnboundedReceiver<String>,
    delay: Duration,
    shutdown: CancellationToken,
) -> WriteHalf<Transport> {
    loop {
        let line = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            line = outgoing.recv() => match line {
                Some(line) => line,
                None => break,
            },
        };

        debug!(line = %loggable(&line), "Sending");
        if let Err(e) = sink.send(line).await {
            error!(error = %e, "Write failed, closing session");
            shutdown.cancel();
            break;
        }

        if !delay.is_zero() {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    sink.into_inner()
}

/// The line with credentials masked.
fn loggable(line: &str) -> &str {
    if line.starts_with("PASS ") {
        return "PASS ***";
    }
    match line.strip_prefix("AUTHENTICATE ") {
        Some("PLAIN" | "+") | None => line,
        Some(_) => "AUTHENTICATE ***",
    }
}
