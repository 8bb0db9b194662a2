//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_dispatch_total` (counter): dispatch outcomes by `outcome` (hit, miss, error)
//! - `router_gate_total` (counter): gate decisions by `decision` (pass, login, deny)
//! - `router_table_builds_total` (counter): table loads by `source` (cache, discovery)
//! - `router_routes` (gauge): routes in the active table
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed (tests, CLI)
//! - Prometheus exporter only when enabled in config

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_dispatch(outcome: &'static str) {
    ::metrics::counter!("router_dispatch_total", "outcome" => outcome).increment(1);
}

pub fn record_gate(decision: &'static str) {
    ::metrics::counter!("router_gate_total", "decision" => decision).increment(1);
}

pub fn record_table_build(source: &'static str, routes: usize) {
    ::metrics::counter!("router_table_builds_total", "source" => source).increment(1);
    ::metrics::gauge!("router_routes").set(routes as f64);
}
