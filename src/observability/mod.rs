//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Groups, probers, proxies, tunnels produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters and gauges)
//!
//! Consumers:
//!     → stdout log stream
//!     → Prometheus scrape endpoint
//! ```

pub mod logging;
pub mod metrics;
