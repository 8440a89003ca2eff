//! Descriptor passing over unix domain sockets (SCM_RIGHTS).

use std::io::{self, IoSlice, IoSliceMut, Read, Write};
use std::net::{Shutdown, TcpStream as StdTcpStream};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};
use std::os::unix::net::{UnixListener as StdUnixListener, UnixStream as StdUnixStream};
use std::path::PathBuf;
use std::time::Duration;

use nix::sys::socket::{recvmsg, sendmsg, ControlMessage, ControlMessageOwned, MsgFlags};
use slirc_proto::Prefix;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpStream, UnixListener};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::{Adopted, HandoffAddr};
use crate::error::HandoffError;

/// How long either side waits on a stalled peer.
const PEER_TIMEOUT: Duration = Duration::from_secs(5);

/// First byte a taker sends after connecting.
const TAKEOVER_REQUEST: u8 = b'T';

/// Listens for a newer instance wanting our connection.
pub struct HandoffListener {
    listener: UnixListener,
    path: Option<PathBuf>,
}

impl HandoffListener {
    pub fn bind(addr: &HandoffAddr) -> Result<Self, HandoffError> {
        let socket_err = |source: io::Error| HandoffError::Socket {
            name: addr.to_string(),
            source,
        };
        let (listener, path) = bind_std(addr).map_err(socket_err)?;
        listener.set_nonblocking(true).map_err(socket_err)?;
        let listener = UnixListener::from_std(listener).map_err(socket_err)?;
        debug!(socket = %addr, "Listening for handoff");
        Ok(Self { listener, path })
    }

    /// Wait for a taker. Peers that connect without sending the request
    /// byte (such as a liveness check) are dropped and listening goes on.
    pub async fn accept(&self) -> Result<PendingHandoff, HandoffError> {
        loop {
            let (mut peer, _) = self.listener.accept().await?;
            match timeout(PEER_TIMEOUT, peer.read_u8()).await {
                Ok(Ok(TAKEOVER_REQUEST)) => {}
                _ => {
                    debug!("Ignoring handoff peer without a takeover request");
                    continue;
                }
            }

            let peer = peer.into_std()?;
            peer.set_nonblocking(false)?;
            peer.set_write_timeout(Some(PEER_TIMEOUT))?;
            info!("New instance requested the connection");
            return Ok(PendingHandoff { peer });
        }
    }
}

impl Drop for HandoffListener {
    fn drop(&mut self) {
        if let Some(path) = &self.path {
            let _ = std::fs::remove_file(path);
        }
    }
}

/// An accepted taker, waiting for the connection to be released.
pub struct PendingHandoff {
    peer: StdUnixStream,
}

impl PendingHandoff {
    /// Send `stream` and our prefix to the taker. Our copy of the socket is
    /// closed afterwards; the connection lives on in the other process.
    pub async fn complete(self, stream: TcpStream, prefix: &Prefix) -> Result<(), HandoffError> {
        let socket = stream.into_std()?;
        let prefix = prefix.to_string();
        let peer = self.peer;
        tokio::task::spawn_blocking(move || send_connection(&peer, &socket, &prefix)).await?
    }
}

fn send_connection(
    peer: &StdUnixStream,
    socket: &StdTcpStream,
    prefix: &str,
) -> Result<(), HandoffError> {
    let fds = [socket.as_raw_fd()];
    let cmsgs = [ControlMessage::ScmRights(&fds)];
    let marker = [0u8];
    let iov = [IoSlice::new(&marker)];
    sendmsg::<()>(peer.as_raw_fd(), &iov, &cmsgs, MsgFlags::empty(), None)?;

    let mut writer = peer;
    writer.write_all(prefix.as_bytes())?;
    peer.shutdown(Shutdown::Write)?;
    Ok(())
}

pub async fn adopt(addr: &HandoffAddr) -> Result<Option<Adopted>, HandoffError> {
    let addr = addr.clone();
    let received = tokio::task::spawn_blocking(move || receive_connection(&addr)).await??;
    let Some((socket, prefix)) = received else {
        return Ok(None);
    };

    socket.set_nonblocking(true)?;
    let stream = TcpStream::from_std(socket)?;
    Ok(Some(Adopted { stream, prefix }))
}

fn receive_connection(
    addr: &HandoffAddr,
) -> Result<Option<(StdTcpStream, Option<Prefix>)>, HandoffError> {
    let mut peer = match connect_std(addr) {
        Ok(peer) => peer,
        Err(e) => {
            info!(socket = %addr, error = %e, "No previous instance to take over from");
            return Ok(None);
        }
    };
    peer.set_read_timeout(Some(PEER_TIMEOUT))?;
    peer.set_write_timeout(Some(PEER_TIMEOUT))?;
    peer.write_all(&[TAKEOVER_REQUEST])?;

    let socket = StdTcpStream::from(receive_descriptor(&peer)?);

    let mut prefix = String::new();
    let prefix = match peer.read_to_string(&mut prefix) {
        Ok(_) if !prefix.is_empty() => Some(Prefix::parse(&prefix)),
        Ok(_) => None,
        Err(e) => {
            warn!(error = %e, "Adopted connection without a prefix");
            None
        }
    };
    Ok(Some((socket, prefix)))
}

fn receive_descriptor(peer: &StdUnixStream) -> Result<OwnedFd, HandoffError> {
    let mut marker = [0u8; 1];
    let mut iov = [IoSliceMut::new(&mut marker)];
    let mut space = nix::cmsg_space!(RawFd);
    let msg = recvmsg::<()>(peer.as_raw_fd(), &mut iov, Some(&mut space), MsgFlags::empty())?;

    for cmsg in msg.cmsgs()? {
        if let ControlMessageOwned::ScmRights(fds) = cmsg {
            if let Some(&fd) = fds.first() {
                return Ok(own_descriptor(fd));
            }
        }
    }
    Err(HandoffError::NoDescriptor)
}

#[allow(unsafe_code)]
fn own_descriptor(fd: RawFd) -> OwnedFd {
    // SAFETY: SCM_RIGHTS just installed `fd` in our descriptor table and no
    // other owner exists for it.
    unsafe { OwnedFd::from_raw_fd(fd) }
}

#[cfg(target_os = "linux")]
fn socket_addr(addr: &HandoffAddr) -> io::Result<std::os::unix::net::SocketAddr> {
    use std::os::linux::net::SocketAddrExt;
    std::os::unix::net::SocketAddr::from_abstract_name(addr.name().as_bytes())
}

#[cfg(target_os = "linux")]
fn bind_std(addr: &HandoffAddr) -> io::Result<(StdUnixListener, Option<PathBuf>)> {
    Ok((StdUnixListener::bind_addr(&socket_addr(addr)?)?, None))
}

#[cfg(target_os = "linux")]
fn connect_std(addr: &HandoffAddr) -> io::Result<StdUnixStream> {
    StdUnixStream::connect_addr(&socket_addr(addr)?)
}

#[cfg(not(target_os = "linux"))]
fn socket_path(addr: &HandoffAddr) -> PathBuf {
    let file: String = addr
        .name()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-') { c } else { '_' })
        .collect();
    std::env::temp_dir().join(format!("{file}.sock"))
}

#[cfg(not(target_os = "linux"))]
fn bind_std(addr: &HandoffAddr) -> io::Result<(StdUnixListener, Option<PathBuf>)> {
    let path = socket_path(addr);
    if path.exists() {
        if StdUnixStream::connect(&path).is_ok() {
            return Err(io::Error::new(
                io::ErrorKind::AddrInUse,
                "another instance is listening",
            ));
        }
        // Left behind by an instance that exited without cleaning up.
        std::fs::remove_file(&path)?;
    }
    Ok((StdUnixListener::bind(&path)?, Some(path)))
}

#[cfg(not(target_os = "linux"))]
fn connect_std(addr: &HandoffAddr) -> io::Result<StdUnixStream> {
    StdUnixStream::connect(socket_path(addr))
}
