//! Concurrent group prober.
//!
//! # Responsibilities
//! - Run every candidate's URL test at the same time
//! - Pick the winner according to the probe mode
//! - Bound the whole cycle with a deadline
//!
//! # Design Decisions
//! - FastestOnly returns on the first success: the first probe to finish
//!   is the lowest delay, remaining probes are dropped
//! - ProbeAll breaks delay ties by roster order

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{FuturesUnordered, StreamExt};
use tokio::time::timeout;

use crate::outbound::Candidate;
use crate::probe::target::TargetUrl;
use crate::probe::types::{ProbeError, ProbeMode};
use crate::probe::GroupProber;

/// Default prober: probes candidates concurrently.
#[derive(Debug, Clone)]
pub struct ConcurrentProber {
    deadline: Duration,
}

impl ConcurrentProber {
    pub fn new(deadline: Duration) -> Self {
        Self { deadline }
    }
}

#[async_trait]
impl GroupProber for ConcurrentProber {
    async fn probe_group(
        &self,
        candidates: &[Arc<dyn Candidate>],
        target: &TargetUrl,
        mode: ProbeMode,
    ) -> Result<Arc<dyn Candidate>, ProbeError> {
        match timeout(self.deadline, probe_concurrently(candidates, target, mode)).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Cancelled(self.deadline.as_millis() as u64)),
        }
    }
}

async fn probe_concurrently(
    candidates: &[Arc<dyn Candidate>],
    target: &TargetUrl,
    mode: ProbeMode,
) -> Result<Arc<dyn Candidate>, ProbeError> {
    let mut pending: FuturesUnordered<_> = candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| async move { (index, candidate.probe(target).await) })
        .collect();

    let mut best: Option<(usize, Duration)> = None;
    while let Some((index, result)) = pending.next().await {
        match result {
            Ok(delay) => {
                if mode == ProbeMode::FastestOnly {
                    return Ok(candidates[index].clone());
                }
                let better = match best {
                    None => true,
                    Some((best_index, best_delay)) => {
                        delay < best_delay || (delay == best_delay && index < best_index)
                    }
                };
                if better {
                    best = Some((index, delay));
                }
            }
            Err(e) => {
                tracing::debug!(
                    candidate = %candidates[index].name(),
                    error = %e,
                    "Candidate probe failed"
                );
            }
        }
    }

    best.map(|(index, _)| candidates[index].clone())
        .ok_or(ProbeError::NoneReachable)
}
