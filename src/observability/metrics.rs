//! Metrics collection and exposition.
//!
//! # Metrics
//! - `urltest_probe_cycles_total` (counter): probe cycles by group, outcome (ok|busy|failed)
//! - `urltest_selection_changes_total` (counter): current candidate switches by group
//! - `urltest_dials_total` (counter): stream dials by group, outcome (ok|fallback|failed)
//! - `urltest_candidate_alive` (gauge): 1=alive, 0=dead, by candidate
//! - `urltest_candidate_delay_ms` (gauge): last measured delay, by candidate
//!
//! Recording goes through the `metrics` facade and is a no-op until
//! [`init_metrics`] installs the Prometheus recorder.

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder with an HTTP scrape listener on `addr`.
///
/// Must be called inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

pub fn record_probe_cycle(group: &str, outcome: &'static str) {
    counter!("urltest_probe_cycles_total", "group" => group.to_string(), "outcome" => outcome)
        .increment(1);
}

pub fn record_selection_change(group: &str) {
    counter!("urltest_selection_changes_total", "group" => group.to_string()).increment(1);
}

pub fn record_dial(group: &str, outcome: &'static str) {
    counter!("urltest_dials_total", "group" => group.to_string(), "outcome" => outcome)
        .increment(1);
}

/// Record a candidate's health after a probe. `delay_ms` is `None` for failed probes.
pub fn record_candidate_health(candidate: &str, alive: bool, delay_ms: Option<u64>) {
    gauge!("urltest_candidate_alive", "candidate" => candidate.to_string())
        .set(if alive { 1.0 } else { 0.0 });
    if let Some(ms) = delay_ms {
        gauge!("urltest_candidate_delay_ms", "candidate" => candidate.to_string()).set(ms as f64);
    }
}
