//! Scripted IRC server.
//!
//! Listens on an ephemeral localhost port. Each accepted connection is a
//! [`ServerConn`] the test drives line by line.

use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpListener;
use tokio::time::timeout;

/// How long a test waits for the bot before failing.
pub const WAIT: Duration = Duration::from_secs(5);

/// A listening test server.
pub struct MockServer {
    listener: TcpListener,
}

impl MockServer {
    pub async fn bind() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        Ok(Self { listener })
    }

    /// `host:port` for the bot config.
    pub fn address(&self) -> String {
        self.listener
            .local_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_default()
    }

    /// Wait for the bot to connect.
    pub async fn accept(&self) -> anyhow::Result<ServerConn> {
        let (stream, _) = timeout(WAIT, self.listener.accept())
            .await
            .context("no connection")??;
        let (reader, writer) = stream.into_split();
        Ok(ServerConn {
            reader: BufReader::new(reader),
            writer,
        })
    }

    /// `true` if nobody connects within `dur`.
    #[allow(dead_code)]
    pub async fn no_connection_within(&self, dur: Duration) -> bool {
        timeout(dur, self.listener.accept()).await.is_err()
    }
}

/// Server side of one bot connection.
pub struct ServerConn {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

#[allow(dead_code)]
impl ServerConn {
    /// Send a raw line; CRLF is appended.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\r\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Next line from the bot, without CRLF.
    pub async fn recv_line(&mut self) -> anyhow::Result<String> {
        self.recv_timeout(WAIT).await
    }

    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<String> {
        let mut line = String::new();
        let n = timeout(dur, self.reader.read_line(&mut line))
            .await
            .context("timed out waiting for a line")??;
        if n == 0 {
            anyhow::bail!("connection closed");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Receive lines until one satisfies `pred`; returns all of them.
    pub async fn recv_until<F>(&mut self, mut pred: F) -> anyhow::Result<Vec<String>>
    where
        F: FnMut(&str) -> bool,
    {
        let mut lines = Vec::new();
        loop {
            let line = self.recv_line().await?;
            let done = pred(&line);
            lines.push(line);
            if done {
                return Ok(lines);
            }
        }
    }

    /// Read the plain registration lines and welcome `nick`.
    pub async fn register(&mut self, nick: &str) -> anyhow::Result<()> {
        self.recv_until(|line| line.starts_with("NICK "))
            .await
            .context("no NICK")?;
        self.send_raw(&format!(":irc.test 001 {nick} :Welcome to the test network"))
            .await
    }

    /// `true` once the bot closes its end, `false` if it is still open
    /// after [`WAIT`]. Lines sent meanwhile are skipped.
    pub async fn closed(&mut self) -> bool {
        let mut line = String::new();
        loop {
            line.clear();
            match timeout(WAIT, self.reader.read_line(&mut line)).await {
                Err(_) => return false,
                Ok(Ok(0)) | Ok(Err(_)) => return true,
                Ok(Ok(_)) => {}
            }
        }
    }
}
