//! Byte stream to the server: plain TCP or TLS over TCP.

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;
use tracing::{debug, warn};

use crate::error::BotError;

/// An established connection to the server.
pub enum Transport {
    Tcp(TcpStream),
    Tls(Box<TlsStream<TcpStream>>),
}

impl Transport {
    /// Dial `addr` (`host:port`), wrapping it in TLS when `tls` is given.
    pub async fn connect(
        addr: &str,
        hostname: &str,
        tls: Option<Arc<ClientConfig>>,
    ) -> Result<Self, BotError> {
        let tcp = TcpStream::connect(addr)
            .await
            .map_err(|source| BotError::Connect {
                host: addr.to_owned(),
                source,
            })?;
        if let Err(e) = tcp.set_nodelay(true) {
            debug!(error = %e, "Failed to set TCP_NODELAY");
        }

        let Some(config) = tls else {
            return Ok(Transport::Tcp(tcp));
        };

        let server_name = ServerName::try_from(hostname.to_owned())
            .map_err(|_| BotError::TlsServerName(hostname.to_owned()))?;
        let stream = TlsConnector::from(config)
            .connect(server_name, tcp)
            .await
            .map_err(|source| BotError::Tls {
                host: addr.to_owned(),
                source,
            })?;
        Ok(Transport::Tls(Box::new(stream)))
    }

    pub fn is_tls(&self) -> bool {
        matches!(self, Transport::Tls(_))
    }

    /// The underlying socket, if this is plain TCP.
    pub fn into_tcp(self) -> Option<TcpStream> {
        match self {
            Transport::Tcp(stream) => Some(stream),
            Transport::Tls(_) => None,
        }
    }
}

/// TLS client configuration trusting the platform's root certificates.
pub fn native_tls_config() -> Arc<ClientConfig> {
    let mut roots = RootCertStore::empty();
    let certs = rustls_native_certs::load_native_certs();
    for cert in certs.certs {
        if let Err(e) = roots.add(cert) {
            warn!("Failed to add root cert: {}", e);
        }
    }
    for e in &certs.errors {
        warn!("Error loading native certs: {}", e);
    }

    let config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    Arc::new(config)
}

impl AsyncRead for Transport {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Transport::Tcp(stream) => Pin::new(stream).poll_read(cx, buf),
            Transport::Tls(stream) => Pin::new(stream.as_mut()).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for Transport {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Transport::Tcp(stream) => Pin::new(stream).poll_write(cx, buf),
            Transport::Tls(stream) => Pin::new(stream.as_mut()).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Transport::Tcp(stream) => Pin::new(stream).poll_flush(cx),
            Transport::Tls(stream) => Pin::new(stream.as_mut()).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Transport::Tcp(stream) => Pin::new(stream).poll_shutdown(cx),
            Transport::Tls(stream) => Pin::new(stream.as_mut()).poll_shutdown(cx),
        }
    }
}
