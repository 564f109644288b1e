//! In-memory candidates and probers for group tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::UdpSocket;

use crate::outbound::{
    Candidate, Destination, DialError, DialResult, ProxyConn, ProxyPacketConn,
};
use crate::probe::{GroupProber, ProbeError, ProbeMode, TargetUrl};

pub struct MockCandidate {
    name: &'static str,
    alive: AtomicBool,
    delay_ms: AtomicU64,
    failing_dials: AtomicUsize,
    pub stream_dials: AtomicUsize,
    pub packet_dials: AtomicUsize,
    packet: bool,
}

impl MockCandidate {
    fn build(name: &'static str, alive: bool, delay_ms: u64) -> Arc<Self> {
        Arc::new(Self {
            name,
            alive: AtomicBool::new(alive),
            delay_ms: AtomicU64::new(delay_ms),
            failing_dials: AtomicUsize::new(0),
            stream_dials: AtomicUsize::new(0),
            packet_dials: AtomicUsize::new(0),
            packet: true,
        })
    }

    pub fn alive(name: &'static str, delay_ms: u64) -> Arc<Self> {
        Self::build(name, true, delay_ms)
    }

    pub fn dead(name: &'static str) -> Arc<Self> {
        Self::build(name, false, u64::MAX)
    }

    pub fn without_packet(name: &'static str) -> Arc<Self> {
        let mut candidate = Self::build(name, true, 10);
        if let Some(inner) = Arc::get_mut(&mut candidate) {
            inner.packet = false;
        }
        candidate
    }

    pub fn set_health(&self, alive: bool, delay_ms: u64) {
        self.alive.store(alive, Ordering::SeqCst);
        self.delay_ms.store(delay_ms, Ordering::SeqCst);
    }

    /// Make the next `n` stream dials fail. `usize::MAX` fails forever.
    pub fn fail_dials(&self, n: usize) {
        self.failing_dials.store(n, Ordering::SeqCst);
    }

    pub fn dials(&self) -> usize {
        self.stream_dials.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Candidate for MockCandidate {
    fn name(&self) -> &str {
        self.name
    }

    fn alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    fn last_delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms.load(Ordering::SeqCst))
    }

    async fn probe(&self, _target: &TargetUrl) -> DialResult<Duration> {
        Ok(self.last_delay())
    }

    async fn open_stream(&self, destination: &Destination) -> DialResult<ProxyConn> {
        self.stream_dials.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failing_dials.load(Ordering::SeqCst);
        if remaining > 0 {
            if remaining != usize::MAX {
                self.failing_dials.store(remaining - 1, Ordering::SeqCst);
            }
            return Err(DialError::Handshake(format!(
                "{} refused {}",
                self.name, destination
            )));
        }
        let (client, _server) = tokio::io::duplex(64);
        Ok(ProxyConn::new(client, self.name))
    }

    async fn open_packet(
        &self,
        destination: &Destination,
    ) -> DialResult<(ProxyPacketConn, SocketAddr)> {
        self.packet_dials.fetch_add(1, Ordering::SeqCst);
        if !self.packet {
            return Err(DialError::PacketUnsupported(self.name.to_string()));
        }
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = format!("127.0.0.1:{}", destination.port)
            .parse()
            .map_err(|_| DialError::Resolve(destination.to_string()))?;
        Ok((ProxyPacketConn::new(socket, self.name), addr))
    }

    fn supports_packet(&self) -> bool {
        self.packet
    }
}

/// Prober returning a scripted outcome, optionally after a delay.
pub struct MockProber {
    outcome: Mutex<Result<usize, ProbeError>>,
    pause: Duration,
    pub calls: AtomicUsize,
    pub modes: Mutex<Vec<ProbeMode>>,
    pub targets: Mutex<Vec<String>>,
}

impl MockProber {
    /// Always picks the roster member at `index`.
    pub fn picking(index: usize) -> Arc<Self> {
        Self::with(Ok(index), Duration::ZERO)
    }

    pub fn failing(error: ProbeError) -> Arc<Self> {
        Self::with(Err(error), Duration::ZERO)
    }

    pub fn with(outcome: Result<usize, ProbeError>, pause: Duration) -> Arc<Self> {
        Arc::new(Self {
            outcome: Mutex::new(outcome),
            pause,
            calls: AtomicUsize::new(0),
            modes: Mutex::new(Vec::new()),
            targets: Mutex::new(Vec::new()),
        })
    }

    pub fn set_outcome(&self, outcome: Result<usize, ProbeError>) {
        *self.outcome.lock().unwrap() = outcome;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GroupProber for MockProber {
    async fn probe_group(
        &self,
        candidates: &[Arc<dyn Candidate>],
        target: &TargetUrl,
        mode: ProbeMode,
    ) -> Result<Arc<dyn Candidate>, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.modes.lock().unwrap().push(mode);
        self.targets.lock().unwrap().push(target.to_string());
        if !self.pause.is_zero() {
            tokio::time::sleep(self.pause).await;
        }
        let outcome = self.outcome.lock().unwrap().clone();
        outcome.map(|index| candidates[index].clone())
    }
}
