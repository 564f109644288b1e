//! Outbound transport subsystem.
//!
//! # Data Flow
//! ```text
//! Group picks a candidate
//!     → proxy.rs (Candidate: alive/delay bookkeeping around a transport)
//!     → direct.rs | http.rs (Outbound: actually open the stream/packet socket)
//!     → conn.rs (ProxyConn / ProxyPacketConn with provenance chain)
//! ```
//!
//! # Design Decisions
//! - Transports know nothing about health; `Proxy` owns alive/delay state
//! - Candidates are shared (`Arc<dyn Candidate>`), several groups may hold the same one
//! - Caller cancellation is dropping the dial future

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::probe::TargetUrl;

pub mod conn;
pub mod direct;
pub mod http;
pub mod proxy;
pub mod types;

pub use conn::{ConnectionId, ProxyConn, ProxyPacketConn};
pub use direct::Direct;
pub use http::HttpConnect;
pub use proxy::Proxy;
pub use types::{Destination, DialError, DialResult};

/// Transport flavours that can be configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutboundKind {
    Direct,
    Http,
}

impl fmt::Display for OutboundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutboundKind::Direct => f.write_str("direct"),
            OutboundKind::Http => f.write_str("http"),
        }
    }
}

/// A bare network transport.
#[async_trait]
pub trait Outbound: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> OutboundKind;

    /// Open a stream to `destination` through this transport.
    async fn dial_stream(&self, destination: &Destination) -> DialResult<ProxyConn>;

    /// Open a packet socket for `destination`, returning the resolved remote address.
    async fn dial_packet(
        &self,
        destination: &Destination,
    ) -> DialResult<(ProxyPacketConn, SocketAddr)>;

    fn supports_packet(&self) -> bool;
}

/// A probeable, dialable endpoint a group can route through.
#[async_trait]
pub trait Candidate: Send + Sync {
    fn name(&self) -> &str;

    /// Result of the most recent probe.
    fn alive(&self) -> bool;

    /// Delay measured by the most recent successful probe.
    fn last_delay(&self) -> Duration;

    /// Measure latency to `target`, updating alive/delay as a side effect.
    async fn probe(&self, target: &TargetUrl) -> DialResult<Duration>;

    async fn open_stream(&self, destination: &Destination) -> DialResult<ProxyConn>;

    async fn open_packet(
        &self,
        destination: &Destination,
    ) -> DialResult<(ProxyPacketConn, SocketAddr)>;

    fn supports_packet(&self) -> bool;
}

impl fmt::Debug for dyn Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate")
            .field("name", &self.name())
            .field("alive", &self.alive())
            .field("last_delay", &self.last_delay())
            .finish()
    }
}
