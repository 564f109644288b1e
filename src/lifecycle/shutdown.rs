//! Daemon-wide stop broadcast for tunnels and the admin server.

use tokio::sync::broadcast;

/// One-shot broadcast telling tunnels and the admin server to wind down.
///
/// Groups are not subscribers: `main` stops them after the broadcast so each
/// scheduler handshake completes.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Notify every current subscriber. Returns how many were reached.
    pub fn trigger(&self) -> usize {
        let reached = self.tx.send(()).unwrap_or(0);
        tracing::debug!(listeners = reached, "Shutdown broadcast sent");
        reached
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
