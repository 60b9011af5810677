//! Metrics collection and exposition.
//!
//! # Metrics
//! - `waf_gate_decisions_total` (counter): outcomes by `outcome` label
//! - `waf_gate_evaluation_duration_seconds` (histogram): evaluate round trip

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Count one pipeline outcome (`blocked`, `allowed`, `timeout`, ...).
pub fn record_decision(outcome: &'static str) {
    metrics::counter!("waf_gate_decisions_total", "outcome" => outcome).increment(1);
}

/// Record how long the evaluate call took, successful or not.
pub fn record_evaluation(started: Instant) {
    metrics::histogram!("waf_gate_evaluation_duration_seconds")
        .record(started.elapsed().as_secs_f64());
}
