//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → build candidates → build groups (probing starts)
//!
//! Shutdown (shutdown.rs):
//!     Signal received → broadcast → admin/tunnels stop accepting → stop groups
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger graceful shutdown
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use signals::wait_for_shutdown_signal;
pub use startup::{build_candidates, build_groups, CandidateSet};
