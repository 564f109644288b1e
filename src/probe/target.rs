//! Probe target URL validation.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::outbound::Destination;
use crate::probe::types::UrlError;

/// A validated http(s) URL used to measure candidate latency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUrl {
    raw: String,
    secure: bool,
    destination: Destination,
    host_header: String,
    path_and_query: String,
}

impl TargetUrl {
    /// Parse and validate `raw` into the form the transports expect.
    pub fn parse(raw: &str) -> Result<Self, UrlError> {
        let url = Url::parse(raw).map_err(|e| UrlError::Parse {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        let secure = match url.scheme() {
            "http" => false,
            "https" => true,
            other => return Err(UrlError::UnsupportedScheme(other.to_string())),
        };

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| UrlError::MissingHost(raw.to_string()))?;
        // http and https always have a known default port
        let port = url.port_or_known_default().unwrap_or(if secure { 443 } else { 80 });

        let host_header = match url.port() {
            Some(explicit) => format!("{}:{}", host, explicit),
            None => host.to_string(),
        };
        let path_and_query = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        let bare_host = host.trim_start_matches('[').trim_end_matches(']');

        Ok(Self {
            raw: raw.to_string(),
            secure,
            destination: Destination::new(bare_host, port),
            host_header,
            path_and_query,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Value for the `Host` header.
    pub fn host_header(&self) -> &str {
        &self.host_header
    }

    pub fn path_and_query(&self) -> &str {
        &self.path_and_query
    }
}

impl FromStr for TargetUrl {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
