//! Metrics middleware for HTTP endpoints.
//!
//! Records request counts and latency per matched route, and refreshes the
//! live games gauge after each request.
//!
//! ```rust,no_run
//! use axum::{Router, middleware};
//! # use ttt_server::api::middleware::metrics_middleware;
//! # use ttt_server::api::AppState;
//! # let state: AppState = unimplemented!();
//!
//! let app: Router<AppState> = Router::new()
//!     .layer(middleware::from_fn_with_state(state, metrics_middleware));
//! # let _ = app;
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use super::{AppState, request_id::route_label};
use crate::metrics;

/// Record request metrics and the current number of live games.
pub async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = route_label(&request);
    let started = Instant::now();

    let response = next.run(request).await;

    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    metrics::http_requests_total(&method, &path, response.status().as_u16());
    metrics::http_request_duration_ms(&method, &path, elapsed_ms);
    metrics::active_games(state.store.game_count().await);

    response
}
