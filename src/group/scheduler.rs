//! Background probe scheduler.
//!
//! # Lifecycle
//! ```text
//! Running ──stop()/drop──▶ Stopped
//! ```
//!
//! While running, the loop launches one probe cycle immediately and one per
//! interval tick. Cycles run as detached tasks; a tick landing while a cycle
//! is in flight is rejected by the probe flag and dropped. Stopping only ends
//! scheduling: a cycle already in flight finishes on its own.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::group::url_test::GroupCore;
use crate::probe::ProbeMode;

struct Running {
    stop_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Handle to a group's probe loop.
pub struct ProbeScheduler {
    running: Mutex<Option<Running>>,
}

impl ProbeScheduler {
    /// Spawn the probe loop. Must be called inside a Tokio runtime.
    pub(crate) fn start(core: Arc<GroupCore>, interval: Duration) -> Self {
        let (stop_tx, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(run_loop(core, interval, stop_rx));
        Self {
            running: Mutex::new(Some(Running { stop_tx, handle })),
        }
    }

    /// Signal the loop and wait until it has exited.
    ///
    /// Safe to call any number of times; later calls return immediately.
    pub async fn stop(&self) {
        let running = self
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(Running { stop_tx, handle }) = running else {
            return;
        };

        let _ = stop_tx.send(());
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "Probe scheduler task ended abnormally");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|r| !r.handle.is_finished())
    }
}

impl Drop for ProbeScheduler {
    fn drop(&mut self) {
        let running = self
            .running
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(running) = running {
            let _ = running.stop_tx.send(());
        }
    }
}

async fn run_loop(core: Arc<GroupCore>, interval: Duration, mut stop_rx: oneshot::Receiver<()>) {
    tracing::info!(
        group = %core.name(),
        interval_secs = interval.as_secs_f64(),
        target = %core.target(),
        "Probe scheduler starting"
    );

    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                launch_cycle(&core);
            }
            _ = &mut stop_rx => {
                tracing::info!(
                    group = %core.name(),
                    "Probe scheduler received stop signal, exiting loop"
                );
                break;
            }
        }
    }
}

fn launch_cycle(core: &Arc<GroupCore>) {
    let core = Arc::clone(core);
    tokio::spawn(async move {
        // Outcomes are logged and recorded by the cycle itself.
        let _ = core.run_probe_cycle(None, ProbeMode::FastestOnly).await;
    });
}
