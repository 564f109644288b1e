//! HTTP CONNECT outbound.
//!
//! # Responsibilities
//! - Open a TCP connection to an upstream HTTP proxy
//! - Negotiate a tunnel with `CONNECT host:port` over an HTTP/1.1 client connection
//! - Hand back the upgraded tunnel once the proxy answers 200
//!
//! # Design Decisions
//! - The client connection is driven inline, never spawned, so a timed-out
//!   handshake leaves nothing running
//! - The whole handshake shares one connect deadline
//! - No packet transport

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::HOST;
use axum::http::{Method, Request, StatusCode};
use hyper::client::conn::http1;
use hyper::upgrade::Upgraded;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::outbound::conn::{ProxyConn, ProxyPacketConn};
use crate::outbound::types::{Destination, DialError, DialResult};
use crate::outbound::{Outbound, OutboundKind};

/// Outbound tunnelling through an HTTP proxy.
#[derive(Debug, Clone)]
pub struct HttpConnect {
    name: String,
    server: Destination,
    connect_timeout: Duration,
}

impl HttpConnect {
    pub fn new(name: impl Into<String>, server: Destination, connect_timeout: Duration) -> Self {
        Self {
            name: name.into(),
            server,
            connect_timeout,
        }
    }

    async fn handshake(&self, destination: &Destination) -> DialResult<TokioIo<Upgraded>> {
        let stream = TcpStream::connect(self.server.to_string()).await?;
        stream.set_nodelay(true)?;

        let authority = destination.to_string();
        let request = Request::builder()
            .method(Method::CONNECT)
            .uri(authority.as_str())
            .header(HOST, authority.as_str())
            .body(Body::empty())
            .map_err(|e| DialError::Handshake(format!("bad CONNECT target {}: {}", authority, e)))?;

        let (mut sender, connection) = http1::handshake(TokioIo::new(stream)).await?;
        let connection = connection.with_upgrades();
        tokio::pin!(connection);

        let response = sender.send_request(request);
        tokio::pin!(response);

        let mut released = false;
        let response = tokio::select! {
            response = &mut response => response?,
            closed = &mut connection => {
                closed?;
                released = true;
                // The connection resolves once it has handed the socket to the upgrade.
                response.await?
            }
        };

        if response.status() != StatusCode::OK {
            return Err(DialError::Handshake(format!(
                "proxy {} answered {} for {}",
                self.server,
                response.status(),
                destination
            )));
        }

        let upgraded = if released {
            hyper::upgrade::on(response).await?
        } else {
            let (upgraded, driven) = tokio::join!(hyper::upgrade::on(response), connection);
            driven?;
            upgraded?
        };
        Ok(TokioIo::new(upgraded))
    }
}

#[async_trait]
impl Outbound for HttpConnect {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> OutboundKind {
        OutboundKind::Http
    }

    async fn dial_stream(&self, destination: &Destination) -> DialResult<ProxyConn> {
        let tunnel = timeout(self.connect_timeout, self.handshake(destination))
            .await
            .map_err(|_| DialError::Timeout {
                target: destination.to_string(),
                after: self.connect_timeout,
            })??;

        tracing::trace!(
            outbound = %self.name,
            server = %self.server,
            target = %destination,
            "CONNECT tunnel established"
        );
        Ok(ProxyConn::new(tunnel, self.name.clone()))
    }

    async fn dial_packet(
        &self,
        _destination: &Destination,
    ) -> DialResult<(ProxyPacketConn, SocketAddr)> {
        Err(DialError::PacketUnsupported(self.name.clone()))
    }

    fn supports_packet(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Read one request head, answer with `reply`, then echo whatever follows.
    async fn start_proxy(reply: &'static [u8]) -> (SocketAddr, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut byte = [0u8; 1];
            while !head.ends_with(b"\r\n\r\n") {
                if socket.read(&mut byte).await.unwrap() == 0 {
                    return;
                }
                head.push(byte[0]);
            }
            let _ = tx.send(String::from_utf8_lossy(&head).to_string());
            socket.write_all(reply).await.unwrap();

            let (mut reader, mut writer) = socket.split();
            let _ = tokio::io::copy(&mut reader, &mut writer).await;
        });
        (addr, rx)
    }

    #[tokio::test]
    async fn test_tunnel_carries_payload() {
        let (addr, head) = start_proxy(b"HTTP/1.1 200 Connection established\r\n\r\n").await;
        let outbound = HttpConnect::new(
            "jp-01",
            Destination::new("127.0.0.1", addr.port()),
            Duration::from_secs(1),
        );

        let mut conn = outbound
            .dial_stream(&Destination::new("example.com", 443))
            .await
            .unwrap();
        assert_eq!(conn.chain_names(), ["jp-01"]);

        let head = head.await.unwrap().to_ascii_lowercase();
        assert!(head.starts_with("connect example.com:443 http/1.1\r\n"));
        assert!(head.contains("host: example.com:443\r\n"));

        conn.write_all(b"hello").await.unwrap();
        let mut buf = [0u8; 5];
        conn.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"hello");
    }

    #[tokio::test]
    async fn test_garbled_reply_rejected() {
        let (addr, _head) = start_proxy(b"HTTP/ 200 sure\r\n\r\n").await;
        let outbound = HttpConnect::new(
            "jp-01",
            Destination::new("127.0.0.1", addr.port()),
            Duration::from_secs(1),
        );
        let err = outbound
            .dial_stream(&Destination::new("example.com", 80))
            .await
            .unwrap_err();
        assert!(matches!(err, DialError::Http(_)));
    }

    #[tokio::test]
    async fn test_rejected_tunnel() {
        let (addr, _head) =
            start_proxy(b"HTTP/1.1 403 Forbidden\r\nContent-Length: 0\r\n\r\n").await;

        let outbound = HttpConnect::new(
            "jp-01",
            Destination::new("127.0.0.1", addr.port()),
            Duration::from_secs(1),
        );
        let err = outbound
            .dial_stream(&Destination::new("example.com", 80))
            .await
            .unwrap_err();
        assert!(matches!(err, DialError::Handshake(_)));
    }

    #[tokio::test]
    async fn test_no_packet_support() {
        let outbound = HttpConnect::new(
            "jp-01",
            Destination::new("127.0.0.1", 1),
            Duration::from_secs(1),
        );
        assert!(!outbound.supports_packet());
        let err = outbound
            .dial_packet(&Destination::new("1.1.1.1", 53))
            .await
            .unwrap_err();
        assert!(matches!(err, DialError::PacketUnsupported(_)));
    }
}
