//! Proxy group subsystem.
//!
//! # Data Flow
//! ```text
//! Construction:
//!     validate URL / roster / interval
//!     → selection.rs (roster + current = first member)
//!     → scheduler.rs (spawn loop, first probe cycle fires immediately)
//!
//! Probe cycle (scheduler tick or probe_now):
//!     → take probe flag (busy → rejected, never queued)
//!     → GroupProber::probe_group
//!     → adopt winner as current, release flag
//!
//! open_stream:
//!     current.open_stream → ok: tag chain, return
//!                         → err: selection.local_fallback, retry (3 attempts)
//! ```
//!
//! # Design Decisions
//! - The selection is an atomic index into an immutable roster
//! - The probe flag is a test-and-set released by a drop guard
//! - Stop is a synchronous handshake with the scheduler loop

pub mod scheduler;
pub mod selection;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use scheduler::ProbeScheduler;
pub use selection::Selection;
pub use types::{GroupError, GroupResult, GroupStatus, URL_TEST_KIND};
pub use url_test::{UrlTestGroup, DIAL_ATTEMPTS};
