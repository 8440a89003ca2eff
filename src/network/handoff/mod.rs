//! Live connection handoff between bot processes.
//!
//! A running bot listens on a local socket named after its server and nick.
//! A newly started instance with `hijack` enabled connects to it, receives
//! the open server socket as a passed descriptor, then reads the old
//! instance's prefix as the rest of the stream. The old instance stops as
//! soon as the descriptor is sent; the server never sees a reconnect.
//!
//! On Linux the socket lives in the abstract namespace. Other unix systems
//! use a socket file in the temp directory. Elsewhere handoff is not
//! available and [`SUPPORTED`] is `false`.

use std::fmt;

use slirc_proto::Prefix;
use tokio::net::TcpStream;

#[cfg(unix)]
mod unix;
#[cfg(unix)]
use unix as imp;

#[cfg(not(unix))]
mod unsupported;
#[cfg(not(unix))]
use unsupported as imp;

pub use imp::{HandoffListener, PendingHandoff};

use crate::error::HandoffError;

/// Whether this platform can pass connections between processes.
pub const SUPPORTED: bool = cfg!(unix);

/// Name of the handoff socket for one server and nick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffAddr {
    name: String,
}

impl HandoffAddr {
    pub fn new(host: &str, nick: &str) -> Self {
        Self {
            name: format!("{host}-{nick}/irc"),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for HandoffAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A server connection taken over from a previous instance.
pub struct Adopted {
    pub stream: TcpStream,
    /// The previous instance's prefix, if it sent one.
    pub prefix: Option<Prefix>,
}

/// Take over the connection of an instance listening on `addr`.
///
/// `Ok(None)` means nobody is listening; the caller should dial instead.
pub async fn adopt(addr: &HandoffAddr) -> Result<Option<Adopted>, HandoffError> {
    imp::adopt(addr).await
}
