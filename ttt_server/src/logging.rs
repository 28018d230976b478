//! Structured logging configuration.
//!
//! Records emitted through the `log` facade by the game library are
//! forwarded into the same subscriber.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var and default to
/// `info` with hyper's chatter suppressed.
///
/// # Example
///
/// ```no_run
/// use ttt_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log API request/response
///
/// # Arguments
///
/// * `request_id` - Correlation id of the request
/// * `method` - HTTP method
/// * `path` - Request path
/// * `status_code` - Response status code
/// * `duration_ms` - Request duration in milliseconds
pub fn log_api_request(
    request_id: &str,
    method: &str,
    path: &str,
    status_code: u16,
    duration_ms: u64,
) {
    if status_code >= 500 {
        tracing::error!(
            request_id = request_id,
            http_method = method,
            http_path = path,
            http_status = status_code,
            duration_ms = duration_ms,
            "API request failed"
        );
    } else {
        tracing::info!(
            request_id = request_id,
            http_method = method,
            http_path = path,
            http_status = status_code,
            duration_ms = duration_ms,
            "API request completed"
        );
    }
}

/// Log a rejected game operation
///
/// # Arguments
///
/// * `request_id` - Correlation id of the request
/// * `operation` - Operation name
/// * `game_id` - Target game, when known
/// * `reason` - Client-facing error message
pub fn log_rejected_operation(
    request_id: &str,
    operation: &str,
    game_id: Option<&str>,
    reason: &str,
) {
    tracing::debug!(
        request_id = request_id,
        operation = operation,
        game_id = game_id,
        reason = reason,
        "Game operation rejected"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_api_request() {
        // Just ensure it doesn't panic
        log_api_request("req-1", "GET", "/api/getGameState", 200, 3);
        log_api_request("req-2", "POST", "/api/makeMove", 500, 12);
    }

    #[test]
    fn test_log_rejected_operation() {
        log_rejected_operation("req-1", "makeMove", Some("game_abc"), "Not your turn");
        log_rejected_operation("req-2", "createGame", None, "userId is required");
    }
}
