//! Destination addressing and dial error definitions.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// A host and port that an outbound connection is opened to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination {
    /// Hostname or IP literal, without brackets.
    pub host: String,
    pub port: u16,
}

impl Destination {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for Destination {
    type Err = DestinationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| DestinationParseError(s.to_string()))?;
        let host = host.trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() {
            return Err(DestinationParseError(s.to_string()));
        }
        let port = port
            .parse::<u16>()
            .map_err(|_| DestinationParseError(s.to_string()))?;
        Ok(Self::new(host, port))
    }
}

/// Returned when a `host:port` string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid destination '{0}', expected host:port")]
pub struct DestinationParseError(pub String);

/// Errors raised while opening a connection through an outbound.
#[derive(Debug, Error)]
pub enum DialError {
    /// Socket-level failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The dial or exchange did not finish in time.
    #[error("Dial to {target} timed out after {after:?}")]
    Timeout { target: String, after: Duration },

    /// The upstream proxy refused or garbled the tunnel handshake.
    #[error("Proxy handshake failed: {0}")]
    Handshake(String),

    /// The peer did not speak valid HTTP/1.1.
    #[error("HTTP exchange failed: {0}")]
    Http(#[from] hyper::Error),

    /// The outbound has no packet transport.
    #[error("Outbound '{0}' does not support packet connections")]
    PacketUnsupported(String),

    /// Name resolution produced no usable address.
    #[error("Could not resolve {0}")]
    Resolve(String),
}

/// Result type for dial operations.
pub type DialResult<T> = Result<T, DialError>;
