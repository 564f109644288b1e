//! Latency probing subsystem.
//!
//! # Data Flow
//! ```text
//! Probe cycle requested by a group
//!     → GroupProber::probe_group (concurrent.rs)
//!     → Candidate::probe for each member
//!         → url_test.rs (dial through the transport, time the HTTP exchange)
//!     → winner returned to the group, or ProbeError
//! ```
//!
//! # Design Decisions
//! - Candidates update their own alive/delay; the prober only picks
//! - The prober is a trait so groups can be driven by any measurement strategy
//! - Target URLs are validated once, up front, into `TargetUrl`

use std::sync::Arc;

use async_trait::async_trait;

use crate::outbound::Candidate;

pub mod concurrent;
pub mod target;
pub mod types;

pub use concurrent::ConcurrentProber;
pub use target::TargetUrl;
pub use types::{ProbeError, ProbeMode, UrlError};
pub use url_test::url_test;

/// Measures a set of candidates and picks the best one.
#[async_trait]
pub trait GroupProber: Send + Sync {
    async fn probe_group(
        &self,
        candidates: &[Arc<dyn Candidate>],
        target: &TargetUrl,
        mode: ProbeMode,
    ) -> Result<Arc<dyn Candidate>, ProbeError>;
}
