//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define resolution and rebuild metrics
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `content_resolutions_total` (counter): resolutions by outcome, stage
//! - `content_resolution_duration_seconds` (histogram): resolution latency
//! - `content_rebuilds_total` (counter): snapshot rebuilds by result
//! - `content_rebuild_duration_seconds` (histogram): rebuild latency
//! - `content_index_items` / `content_index_files` (gauge): snapshot size

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::resolve::Outcome;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_resolution(outcome: &Outcome, start: Instant) {
    let stage = outcome.stage().map(|s| s.as_str()).unwrap_or("none");
    counter!("content_resolutions_total", "outcome" => outcome.kind(), "stage" => stage).increment(1);
    histogram!("content_resolution_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_rebuild(success: bool, start: Instant) {
    let result = if success { "success" } else { "failure" };
    counter!("content_rebuilds_total", "result" => result).increment(1);
    histogram!("content_rebuild_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn set_index_size(items: usize, files: usize) {
    gauge!("content_index_items").set(items as f64);
    gauge!("content_index_files").set(files as f64);
}
