//! Handoff stand-ins for platforms without descriptor passing.

use slirc_proto::Prefix;
use tokio::net::TcpStream;

use super::{Adopted, HandoffAddr};
use crate::error::HandoffError;

pub struct HandoffListener;

impl HandoffListener {
    pub fn bind(_addr: &HandoffAddr) -> Result<Self, HandoffError> {
        Err(HandoffError::Unsupported)
    }

    pub async fn accept(&self) -> Result<PendingHandoff, HandoffError> {
        Err(HandoffError::Unsupported)
    }
}

pub struct PendingHandoff;

impl PendingHandoff {
    pub async fn complete(self, _stream: TcpStream, _prefix: &Prefix) -> Result<(), HandoffError> {
        Err(HandoffError::Unsupported)
    }
}

pub async fn adopt(_addr: &HandoffAddr) -> Result<Option<Adopted>, HandoffError> {
    Ok(None)
}
