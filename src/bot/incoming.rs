//! The incoming message queue.

use slirc_proto::Message;
use tokio::sync::mpsc;

/// Messages no trigger consumed, in arrival order.
///
/// [`recv`](Incoming::recv) returns `None` once the session has ended, for
/// whatever reason; the logs say why. Dropping the queue is fine when only
/// triggers are used.
#[derive(Debug)]
pub struct Incoming {
    rx: mpsc::Receiver<Message>,
}

impl Incoming {
    pub(super) fn new(rx: mpsc::Receiver<Message>) -> Self {
        Self { rx }
    }

    pub async fn recv(&mut self) -> Option<Message> {
        self.rx.recv().await
    }

    /// Skip messages until one satisfies `pred`. `None` if the session ends first.
    pub async fn wait_for<F>(&mut self, mut pred: F) -> Option<Message>
    where
        F: FnMut(&Message) -> bool,
    {
        while let Some(msg) = self.rx.recv().await {
            if pred(&msg) {
                return Some(msg);
            }
        }
        None
    }

    pub fn into_inner(self) -> mpsc::Receiver<Message> {
        self.rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn wait_for_skips_until_match() {
        let (tx, rx) = mpsc::channel(8);
        let mut incoming = Incoming::new(rx);
        for line in ["NOTICE * :a", ":srv 001 bot :hi", "PRIVMSG #x :b"] {
            tx.send(Message::parse(line).unwrap()).await.unwrap();
        }

        let found = incoming.wait_for(|m| m.is_numeric()).await.unwrap();
        assert_eq!(found.command, "001");
        assert_eq!(incoming.recv().await.unwrap().command, "PRIVMSG");
    }

    #[tokio::test]
    async fn wait_for_ends_with_session() {
        let (tx, rx) = mpsc::channel(8);
        let mut incoming = Incoming::new(rx);
        tx.send(Message::parse("NOTICE * :a").unwrap()).await.unwrap();
        drop(tx);

        assert!(incoming.wait_for(|m| m.command == "JOIN").await.is_none());
    }
}
