//! Session supervision: teardown and handoff.

use tokio::io::{ReadHalf, WriteHalf};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::bot::Bot;
use crate::error::{BotError, HandoffError};
use crate::network::handoff::{HandoffListener, PendingHandoff};
use crate::network::Transport;
use crate::state::SessionState;

/// Handle to a started session.
#[derive(Debug)]
pub struct Running {
    task: JoinHandle<Result<(), BotError>>,
}

impl Running {
    pub(super) fn new(task: JoinHandle<Result<(), BotError>>) -> Self {
        Self { task }
    }

    /// Wait for the session to end.
    ///
    /// Returns an error only when the session could not be kept alive or
    /// handed over for a reason other than the server going away, such as
    /// the handoff socket being unavailable.
    pub async fn wait(self) -> Result<(), BotError> {
        self.task.await?
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Watch a session until it ends, then tear it down. If a newer instance
/// asks for the connection while active, hand the socket over instead.
pub(super) async fn supervise(
    bot: Bot,
    reader: JoinHandle<ReadHalf<Transport>>,
    writer: JoinHandle<WriteHalf<Transport>>,
    shutdown: CancellationToken,
    handoff_capable: bool,
) -> Result<(), BotError> {
    let handoff = if handoff_capable {
        tokio::select! {
            _ = shutdown.cancelled() => None,
            taker = wait_for_taker(&bot) => Some(taker),
        }
    } else {
        shutdown.cancelled().await;
        None
    };

    shutdown.cancel();
    let read_half = reader.await?;
    let write_half = writer.await?;
    bot.set_state(SessionState::Disconnected);

    let pending = match handoff {
        None => {
            info!("Session closed");
            return Ok(());
        }
        Some(Err(e)) => {
            error!(error = %e, "Handoff socket unavailable, session stopped");
            return Err(e.into());
        }
        Some(Ok(pending)) => pending,
    };

    let stream = read_half
        .unsplit(write_half)
        .into_tcp()
        .ok_or(HandoffError::NotTcp)?;
    pending.complete(stream, &bot.prefix()).await?;
    info!("Connection handed off to new instance");
    Ok(())
}

/// Once the session is active, listen for a newer instance and accept it.
async fn wait_for_taker(bot: &Bot) -> Result<PendingHandoff, HandoffError> {
    let mut state = bot.watch_state();
    let active = state.wait_for(|s| s.is_active()).await.is_ok();
    if !active {
        return std::future::pending().await;
    }

    let listener = HandoffListener::bind(&bot.handoff_addr())?;
    listener.accept().await
}
