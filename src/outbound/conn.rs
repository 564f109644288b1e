//! Connections handed back by outbounds and groups.
//!
//! Both connection types carry a provenance chain: the names of every
//! adapter and group the connection was opened through, innermost first.

use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::UdpSocket;

/// Relaxed ordering is enough: ids only need to be unique.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an outbound connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Any byte stream an outbound can produce.
pub trait ProxyStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> ProxyStream for T {}

/// A stream connection opened through an outbound.
pub struct ProxyConn {
    id: ConnectionId,
    stream: Box<dyn ProxyStream>,
    chain: Vec<String>,
}

impl ProxyConn {
    /// Wrap a stream opened by the adapter called `adapter`.
    pub fn new(stream: impl ProxyStream + 'static, adapter: impl Into<String>) -> Self {
        Self {
            id: ConnectionId::new(),
            stream: Box::new(stream),
            chain: vec![adapter.into()],
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Record that this connection passed through `name`.
    pub fn append_to_chain(&mut self, name: impl Into<String>) {
        self.chain.push(name.into());
    }

    pub fn chain_names(&self) -> &[String] {
        &self.chain
    }
}

impl fmt::Debug for ProxyConn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConn")
            .field("id", &self.id)
            .field("chain", &self.chain)
            .finish_non_exhaustive()
    }
}

impl AsyncRead for ProxyConn {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.stream).poll_read(cx, buf)
    }
}

impl AsyncWrite for ProxyConn {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.stream).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.stream).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.stream).poll_shutdown(cx)
    }
}

/// A packet (datagram) handle opened through an outbound.
#[derive(Debug)]
pub struct ProxyPacketConn {
    id: ConnectionId,
    socket: UdpSocket,
    chain: Vec<String>,
}

impl ProxyPacketConn {
    pub fn new(socket: UdpSocket, adapter: impl Into<String>) -> Self {
        Self {
            id: ConnectionId::new(),
            socket,
            chain: vec![adapter.into()],
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn append_to_chain(&mut self, name: impl Into<String>) {
        self.chain.push(name.into());
    }

    pub fn chain_names(&self) -> &[String] {
        &self.chain
    }

    pub async fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize> {
        self.socket.send_to(buf, target).await
    }

    pub async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        self.socket.recv_from(buf).await
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}
