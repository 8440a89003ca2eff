//! Network module.
//!
//! Contains the session engine, the TCP/TLS transport and the connection
//! handoff protocol.

pub(crate) mod connection;
pub mod handoff;
mod transport;

pub use connection::Running;
pub use transport::{native_tls_config, Transport};
