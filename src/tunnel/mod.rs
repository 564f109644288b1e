//! Local tunnels: forward accepted TCP connections through a group.
//!
//! # Data Flow
//! ```text
//! Client connects to tunnel.listen
//!     → listener.rs (accept, connection limit)
//!     → UrlTestGroup::open_stream(target) (retry + local fallback)
//!     → copy bytes both ways until either side closes
//! ```

pub mod listener;

use std::sync::Arc;

use tokio::io::copy_bidirectional;
use tokio::net::TcpStream;
use tokio::sync::broadcast;

use crate::group::UrlTestGroup;
use crate::outbound::Destination;

pub use listener::{Listener, ListenerError};

/// One listen address bound to a group and a fixed destination.
pub struct Tunnel {
    listener: Listener,
    group: Arc<UrlTestGroup>,
    target: Destination,
}

impl Tunnel {
    pub fn new(listener: Listener, group: Arc<UrlTestGroup>, target: Destination) -> Self {
        Self {
            listener,
            group,
            target,
        }
    }

    /// Accept and forward until shutdown is broadcast.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        let local = self
            .listener
            .local_addr()
            .map(|a| a.to_string())
            .unwrap_or_default();
        tracing::info!(
            listen = %local,
            group = %self.group.name(),
            target = %self.target,
            "Tunnel listening"
        );

        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((inbound, peer, permit)) => {
                        let group = self.group.clone();
                        let target = self.target.clone();
                        tokio::spawn(async move {
                            forward(inbound, &group, &target).await;
                            tracing::trace!(peer_addr = %peer, "Tunnel connection finished");
                            drop(permit);
                        });
                    }
                    Err(e) => {
                        tracing::warn!(listen = %local, error = %e, "Tunnel accept failed");
                        if matches!(e, ListenerError::Closed) {
                            break;
                        }
                    }
                },
                _ = shutdown.recv() => {
                    tracing::info!(
                        listen = %local,
                        "Tunnel received shutdown signal, exiting loop"
                    );
                    break;
                }
            }
        }
    }
}

async fn forward(mut inbound: TcpStream, group: &UrlTestGroup, target: &Destination) {
    let mut outbound = match group.open_stream(target).await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::warn!(
                group = %group.name(),
                target = %target,
                error = %e,
                "Tunnel dial failed"
            );
            return;
        }
    };

    let id = outbound.id();
    tracing::debug!(
        connection_id = %id,
        chain = ?outbound.chain_names(),
        target = %target,
        "Tunnel connected"
    );
    match copy_bidirectional(&mut inbound, &mut outbound).await {
        Ok((up, down)) => {
            tracing::debug!(connection_id = %id, bytes_up = up, bytes_down = down, "Tunnel closed")
        }
        Err(e) => tracing::debug!(connection_id = %id, error = %e, "Tunnel closed with error"),
    }
}
