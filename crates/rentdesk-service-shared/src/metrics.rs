//! Prometheus metrics for the HTTP service.
//!
//! HTTP request metrics are recorded by [`crate::middleware::MetricsLayer`]
//! and result sizes by the tools themselves. This module installs the
//! recorder, serves the scrape endpoint and records the lookup-level metrics:
//!
//! - `rentdesk_tool_calls_total`: counter by tool, outcome and transport
//! - `rentdesk_orders_returned`: histogram of orders per phone lookup
//! - `rentdesk_stores_returned`: histogram of stores per nearby lookup
//!
//! Without an installed recorder every `record_*` call is a no-op.

use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use rentdesk_mcp::tools::{ORDERS_RETURNED, STORES_RETURNED};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static RECORDER: OnceCell<PrometheusHandle> = OnceCell::new();

/// Result-size buckets; the store limit tops out at 50.
const RESULT_SIZE_BUCKETS: [f64; 8] = [0.0, 1.0, 2.0, 3.0, 5.0, 10.0, 20.0, 50.0];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Route serving the exposition text.
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `METRICS_ENABLED=false` disables metrics; `METRICS_PATH` must start
    /// with `/` to be used.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            enabled: lookup("METRICS_ENABLED")
                .map(|v| !v.trim().eq_ignore_ascii_case("false"))
                .unwrap_or(defaults.enabled),
            path: lookup("METRICS_PATH")
                .filter(|p| p.starts_with('/'))
                .unwrap_or(defaults.path),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum MetricsError {
    #[error("metrics are disabled")]
    Disabled,

    #[error("metrics recorder already initialized")]
    AlreadyInitialized,

    #[error("failed to install metrics recorder: {0}")]
    InstallFailed(String),
}

/// Install the Prometheus recorder. Call once at startup.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }
    if RECORDER.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let install_failed = |e: metrics_exporter_prometheus::BuildError| {
        MetricsError::InstallFailed(e.to_string())
    };
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Suffix("_returned".to_string()), &RESULT_SIZE_BUCKETS)
        .map_err(install_failed)?
        .install_recorder()
        .map_err(install_failed)?;

    describe_metrics();

    RECORDER
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)
}

fn describe_metrics() {
    metrics::describe_counter!(
        "http_requests_total",
        "HTTP requests by method, path and status class"
    );
    metrics::describe_histogram!(
        "http_request_duration_seconds",
        metrics::Unit::Seconds,
        "HTTP request latency"
    );
    metrics::describe_counter!(
        "rentdesk_tool_calls_total",
        "Tool invocations by tool, outcome and transport"
    );
    metrics::describe_histogram!(ORDERS_RETURNED, "Orders returned per phone lookup");
    metrics::describe_histogram!(STORES_RETURNED, "Stores returned per nearby lookup");
}

/// Handle GET on the metrics route.
pub async fn metrics_handler() -> String {
    RECORDER
        .get()
        .map(PrometheusHandle::render)
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

/// Record one tool invocation.
///
/// Increments `rentdesk_tool_calls_total` labelled by tool, outcome
/// ("ok" or "error") and the transport that carried the call.
pub fn record_tool_call(tool: &str, is_error: bool, transport: &str) {
    metrics::counter!(
        "rentdesk_tool_calls_total",
        "tool" => tool.to_string(),
        "outcome" => if is_error { "error" } else { "ok" },
        "transport" => transport.to_string()
    )
    .increment(1);
}

/// Record how many orders a phone lookup returned.
pub fn record_orders_returned(count: usize) {
    metrics::histogram!(ORDERS_RETURNED).record(count as f64);
}

/// Record how many stores a nearby lookup returned.
pub fn record_stores_returned(count: usize) {
    metrics::histogram!(STORES_RETURNED).record(count as f64);
}
