//! Probe modes and error definitions.

use thiserror::Error;

/// How much of a group one probe cycle measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMode {
    /// Stop as soon as a clear winner is known.
    FastestOnly,
    /// Measure every candidate before choosing.
    ProbeAll,
}

/// Errors from a group probe cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// Every candidate failed its URL test.
    #[error("No candidate reachable")]
    NoneReachable,

    /// The cycle's deadline expired before a winner was found.
    #[error("Probe cycle cancelled after {0} ms")]
    Cancelled(u64),

    /// The prober returned a candidate that is not in the group.
    #[error("Prober selected '{0}', which is not a member of the group")]
    UnknownCandidate(String),
}

/// Errors from validating a probe target URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Invalid URL '{url}': {reason}")]
    Parse { url: String, reason: String },

    #[error("Unsupported URL scheme '{0}', expected http or https")]
    UnsupportedScheme(String),

    #[error("URL '{0}' has no host")]
    MissingHost(String),
}
