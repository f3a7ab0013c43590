//! Metrics collection and exposition.
//!
//! # Metrics
//! - `tag_watcher_page_hits_total` (counter): status page requests served
//! - `tag_watcher_probes_total` (counter): probes issued against the target
//! - `tag_watcher_probe_errors_total` (counter): failed probes, by `kind`
//! - `tag_watcher_tagged` (gauge): 1=tagged, 0=not tagged

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);

    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_page_hit() {
    counter!("tag_watcher_page_hits_total").increment(1);
}

pub fn record_probe() {
    counter!("tag_watcher_probes_total").increment(1);
}

pub fn record_probe_error(kind: &'static str) {
    counter!("tag_watcher_probe_errors_total", "kind" => kind).increment(1);
}

pub fn record_tagged(tagged: bool) {
    gauge!("tag_watcher_tagged").set(if tagged { 1.0 } else { 0.0 });
}
