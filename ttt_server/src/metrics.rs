//! Prometheus metrics for monitoring game server health and activity.
//!
//! Metrics are recorded through the `metrics` facade and are only exported
//! when [`init_metrics`] installs the Prometheus scrape listener. Without
//! it every recording call is a no-op.
//!
//! # Metrics Categories
//!
//! - **HTTP Metrics**: Request counts and duration by path and status
//! - **Game Metrics**: Live games, creations, joins, moves, outcomes, resets

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request duration in milliseconds.
pub fn http_request_duration_ms(method: &str, path: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_ms);
}

// ============================================================================
// Game Metrics
// ============================================================================

/// Set current live games count.
pub fn active_games(count: usize) {
    metrics::gauge!("active_games").set(count as f64);
}

/// Increment games created counter.
pub fn games_created_total() {
    metrics::counter!("games_created_total").increment(1);
}

/// Increment games joined counter.
pub fn games_joined_total() {
    metrics::counter!("games_joined_total").increment(1);
}

/// Increment applied moves counter.
pub fn moves_total() {
    metrics::counter!("moves_total").increment(1);
}

/// Increment finished rounds counter, labelled `X`, `O` or `draw`.
pub fn games_finished_total(outcome: &str) {
    metrics::counter!("games_finished_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Increment reset negotiation counter by action.
pub fn resets_total(action: &str) {
    metrics::counter!("resets_total",
        "action" => action.to_string()
    )
    .increment(1);
}
