//! URL-test failover proxy groups.
//!
//! A group is a logical upstream backed by a fixed roster of candidate
//! proxies. It periodically probes them and routes each new connection
//! through whichever candidate answered fastest.
//!
//! ```text
//!   caller ── open_stream(dest) ──▶ UrlTestGroup ──▶ current candidate ──▶ target
//!                                        │  ▲
//!                          probe cycle   │  │ winner
//!                                        ▼  │
//!                                   GroupProber ── url_test ──▶ every candidate
//! ```

// Core
pub mod group;
pub mod outbound;
pub mod probe;

// Surfaces
pub mod admin;
pub mod tunnel;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::Config;
pub use group::{GroupError, GroupStatus, UrlTestGroup};
pub use lifecycle::Shutdown;
pub use outbound::{Candidate, Destination, DialError, Proxy};
pub use probe::{ConcurrentProber, GroupProber, ProbeMode, TargetUrl};
