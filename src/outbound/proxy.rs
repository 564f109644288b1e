//! Candidate wrapper around a transport.
//!
//! # Responsibilities
//! - Represent a single proxy a group can select
//! - Track alive flag and last measured delay
//! - Run URL tests through the wrapped transport
//!
//! Health fields are plain atomics: the only writer is the proxy's own
//! probe, readers tolerate seeing a value one probe old.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::observability::metrics;
use crate::outbound::conn::{ProxyConn, ProxyPacketConn};
use crate::outbound::types::{Destination, DialResult};
use crate::outbound::{Candidate, Outbound};
use crate::probe::{url_test, TargetUrl};

/// Delay reported before the first successful probe and after a failed one.
pub const UNMEASURED_DELAY_MS: u64 = u64::MAX;

/// A transport plus its health record.
pub struct Proxy {
    outbound: Box<dyn Outbound>,
    probe_timeout: Duration,
    alive: AtomicBool,
    last_delay_ms: AtomicU64,
}

impl Proxy {
    /// Wrap a transport. New proxies start alive with no measured delay.
    pub fn new(outbound: impl Outbound + 'static, probe_timeout: Duration) -> Self {
        Self {
            outbound: Box::new(outbound),
            probe_timeout,
            alive: AtomicBool::new(true),
            last_delay_ms: AtomicU64::new(UNMEASURED_DELAY_MS),
        }
    }

    fn record_success(&self, delay: Duration) {
        let ms = u64::try_from(delay.as_millis()).unwrap_or(UNMEASURED_DELAY_MS - 1);
        self.last_delay_ms.store(ms, Ordering::Relaxed);
        self.alive.store(true, Ordering::Relaxed);
        metrics::record_candidate_health(self.name(), true, Some(ms));
    }

    fn record_failure(&self) {
        self.last_delay_ms
            .store(UNMEASURED_DELAY_MS, Ordering::Relaxed);
        self.alive.store(false, Ordering::Relaxed);
        metrics::record_candidate_health(self.name(), false, None);
    }
}

#[async_trait]
impl Candidate for Proxy {
    fn name(&self) -> &str {
        self.outbound.name()
    }

    fn alive(&self) -> bool {
        self.alive.load(Ordering::Relaxed)
    }

    fn last_delay(&self) -> Duration {
        Duration::from_millis(self.last_delay_ms.load(Ordering::Relaxed))
    }

    async fn probe(&self, target: &TargetUrl) -> DialResult<Duration> {
        match url_test(self.outbound.as_ref(), target, self.probe_timeout).await {
            Ok(delay) => {
                tracing::debug!(
                    proxy = %self.name(),
                    kind = %self.outbound.kind(),
                    target = %target,
                    delay_ms = delay.as_millis() as u64,
                    "URL test succeeded"
                );
                self.record_success(delay);
                Ok(delay)
            }
            Err(e) => {
                tracing::debug!(
                    proxy = %self.name(),
                    kind = %self.outbound.kind(),
                    target = %target,
                    error = %e,
                    "URL test failed"
                );
                self.record_failure();
                Err(e)
            }
        }
    }

    async fn open_stream(&self, destination: &Destination) -> DialResult<ProxyConn> {
        self.outbound.dial_stream(destination).await
    }

    async fn open_packet(
        &self,
        destination: &Destination,
    ) -> DialResult<(ProxyPacketConn, SocketAddr)> {
        self.outbound.dial_packet(destination).await
    }

    fn supports_packet(&self) -> bool {
        self.outbound.supports_packet()
    }
}
