//! Direct outbound: connects straight to the destination.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::{lookup_host, TcpStream, UdpSocket};
use tokio::time::timeout;

use crate::outbound::conn::{ProxyConn, ProxyPacketConn};
use crate::outbound::types::{Destination, DialError, DialResult};
use crate::outbound::{Outbound, OutboundKind};

/// Outbound that dials the destination from this host.
#[derive(Debug, Clone)]
pub struct Direct {
    name: String,
    connect_timeout: Duration,
}

impl Direct {
    pub fn new(name: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            name: name.into(),
            connect_timeout,
        }
    }
}

#[async_trait]
impl Outbound for Direct {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> OutboundKind {
        OutboundKind::Direct
    }

    async fn dial_stream(&self, destination: &Destination) -> DialResult<ProxyConn> {
        let target = destination.to_string();
        let stream = timeout(self.connect_timeout, TcpStream::connect(target.as_str()))
            .await
            .map_err(|_| DialError::Timeout {
                target: target.clone(),
                after: self.connect_timeout,
            })??;
        stream.set_nodelay(true)?;

        tracing::trace!(outbound = %self.name, target = %target, "Direct stream established");
        Ok(ProxyConn::new(stream, self.name.clone()))
    }

    async fn dial_packet(
        &self,
        destination: &Destination,
    ) -> DialResult<(ProxyPacketConn, SocketAddr)> {
        let target = destination.to_string();
        let addr = lookup_host(target.as_str())
            .await?
            .next()
            .ok_or_else(|| DialError::Resolve(destination.to_string()))?;

        let bind: SocketAddr = if addr.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        let socket = UdpSocket::bind(bind).await?;
        Ok((ProxyPacketConn::new(socket, self.name.clone()), addr))
    }

    fn supports_packet(&self) -> bool {
        true
    }
}
