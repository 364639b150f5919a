//! Prometheus metrics
//!
//! Metrics go through the `metrics` facade. Without an installed exporter
//! every recording is a no-op, so `ServerMetrics` is safe to use in tests.

use metrics::{counter, gauge, histogram, Counter, Gauge, Histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Start the Prometheus exporter on `0.0.0.0:{port}/metrics`.
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(%addr, "Metrics server listening");
    Ok(())
}

/// Per-server request metrics
///
/// * `server_requests_total`
/// * `server_requests_by_status`
/// * `server_request_duration_seconds`
/// * `server_active_connections`
#[derive(Clone)]
pub struct ServerMetrics {
    requests_total: Counter,
    request_duration: Histogram,
    active_connections: Gauge,
    server_name: String,
}

impl ServerMetrics {
    pub fn new(server_name: &str) -> Self {
        let name = server_name.to_string();

        Self {
            requests_total: counter!("server_requests_total", "server" => name.clone()),
            request_duration: histogram!("server_request_duration_seconds", "server" => name.clone()),
            active_connections: gauge!("server_active_connections", "server" => name.clone()),
            server_name: name,
        }
    }

    /// Record a completed request
    pub fn record_request(&self, duration: Duration, status_code: u16) {
        self.requests_total.increment(1);
        counter!(
            "server_requests_by_status",
            "server" => self.server_name.clone(),
            "status" => status_code.to_string()
        )
        .increment(1);
        self.request_duration.record(duration.as_secs_f64());
    }

    pub fn connection_opened(&self) {
        self.active_connections.increment(1.0);
    }

    pub fn connection_closed(&self) {
        self.active_connections.decrement(1.0);
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }
}

/// Records one request when dropped.
///
/// Counts as an open connection for its lifetime. The status defaults to
/// 500 so a request dropped mid-flight is not counted as a success.
pub struct RequestMetricsGuard<'a> {
    metrics: &'a ServerMetrics,
    start: Instant,
    status_code: u16,
}

impl<'a> RequestMetricsGuard<'a> {
    pub fn new(metrics: &'a ServerMetrics) -> Self {
        metrics.connection_opened();
        Self {
            metrics,
            start: Instant::now(),
            status_code: 500,
        }
    }

    pub fn set_status(&mut self, code: u16) {
        self.status_code = code;
    }
}

impl Drop for RequestMetricsGuard<'_> {
    fn drop(&mut self) {
        self.metrics.connection_closed();
        self.metrics
            .record_request(self.start.elapsed(), self.status_code);
    }
}
