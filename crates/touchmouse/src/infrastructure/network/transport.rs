//! Outbound UDP transport to the remote pointer listener.
//!
//! [`UdpTransport::connect`] resolves `host:port`, binds an ephemeral local
//! socket of the matching address family and *connects* it to the listener.
//! Every [`DatagramSender::send`] then writes exactly one datagram.
//!
//! # What does "connecting" a UDP socket mean? (for beginners)
//!
//! UDP has no handshake, so `connect` does not exchange any packet with the
//! listener.  It only fixes the default destination inside the kernel.  Two
//! useful side effects follow:
//!
//! - `send` can be used instead of `send_to`, so the address is resolved once.
//! - If the listener host answers with an ICMP "port unreachable", a later
//!   `send` on the connected socket reports `ConnectionRefused`.  The relay
//!   logs that and moves on: there is no read path, no acknowledgment and no
//!   retransmission.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use async_trait::async_trait;
use thiserror::Error;
use tokio::net::{lookup_host, UdpSocket};
use tracing::info;

use crate::application::dispatch::DatagramSender;

/// Errors that can occur while setting up the transport.
///
/// All of them are fatal at startup: the relay has no offline mode.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Name resolution failed (unknown host, missing port, ...).
    #[error("failed to resolve remote address {addr}: {source}")]
    Resolve {
        addr: String,
        #[source]
        source: io::Error,
    },
    /// Resolution succeeded but produced no socket address.
    #[error("remote address {0} did not resolve to any socket address")]
    NoAddress(String),
    /// The local ephemeral socket could not be bound.
    #[error("failed to bind local UDP socket on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    /// The socket could not be associated with the remote address.
    #[error("failed to associate UDP socket with {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}

/// A UDP socket connected to the remote listener.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    remote_addr: SocketAddr,
    local_addr: SocketAddr,
}

impl UdpTransport {
    /// Resolves `remote` (`host:port`) and associates a fresh UDP socket
    /// with the first address it resolves to.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if resolution, binding or association
    /// fails.
    pub async fn connect(remote: &str) -> Result<Self, TransportError> {
        let remote_addr = lookup_host(remote)
            .await
            .map_err(|source| TransportError::Resolve {
                addr: remote.to_string(),
                source,
            })?
            .next()
            .ok_or_else(|| TransportError::NoAddress(remote.to_string()))?;

        let bind_addr = unspecified_for(&remote_addr);
        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|source| TransportError::Bind {
                addr: bind_addr,
                source,
            })?;
        socket
            .connect(remote_addr)
            .await
            .map_err(|source| TransportError::Connect {
                addr: remote_addr,
                source,
            })?;
        let local_addr = socket.local_addr().map_err(|source| TransportError::Bind {
            addr: bind_addr,
            source,
        })?;

        info!("established connection to {remote}");
        info!("remote UDP address: {remote_addr}");
        info!("local UDP client address: {local_addr}");

        Ok(Self {
            socket,
            remote_addr,
            local_addr,
        })
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

#[async_trait]
impl DatagramSender for UdpTransport {
    async fn send(&self, payload: &[u8]) -> io::Result<()> {
        let sent = self.socket.send(payload).await?;
        if sent != payload.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("short datagram: sent {sent} of {} bytes", payload.len()),
            ));
        }
        Ok(())
    }
}

/// Wildcard local address with an OS-assigned port, matching `remote`'s family.
fn unspecified_for(remote: &SocketAddr) -> SocketAddr {
    match remote {
        SocketAddr::V4(_) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
        SocketAddr::V6(_) => SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
