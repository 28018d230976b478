//! HTTP API for the tic-tac-toe server.
//!
//! Thin JSON transport over [`GameStore`]. Every operation is one request,
//! clients poll `getGameState` to observe the opponent's moves.
//!
//! # Modules
//!
//! - [`games`]: Session operations (create, join, move, state, reset)
//! - [`error`]: Error body and status code mapping
//! - [`request_id`]: Request correlation ids and access logging
//! - [`middleware`]: Request metrics
//!
//! # Endpoints Overview
//!
//! ## Games
//! - `POST /api/createGame` - Create a session and get an invite link
//! - `POST /api/joinGame` - Take the second seat
//! - `POST /api/makeMove` - Place the caller's symbol
//! - `GET /api/getGameState?gameId=..&userId=..` - Current snapshot
//! - `POST /api/resetGame` - Request, accept or reject a new round
//!
//! ## Service
//! - `GET /` - Service banner
//! - `GET /health` - Health status with live game count
//! - `GET /ping` - Liveness probe
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tictactoe::{GameStore, StoreConfig};
//! use ttt_server::api::{AppState, create_router};
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let state = AppState {
//!     store: Arc::new(GameStore::new(StoreConfig::default())),
//! };
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! Any origin is allowed. The web client and the Telegram web view are
//! served from different hosts than the API.

pub mod error;
pub mod games;
pub mod middleware;
pub mod request_id;

use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tictactoe::GameStore;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<GameStore>,
}

/// Create the complete API router with all endpoints and middleware.
///
/// ```text
/// GET  /                   - Service banner
/// GET  /health             - Health check
/// GET  /ping               - Liveness probe
/// POST /api/createGame     - Create game
/// POST /api/joinGame       - Join game
/// POST /api/makeMove       - Make move
/// GET  /api/getGameState   - Get game state
/// POST /api/resetGame      - Reset negotiation
/// ```
pub fn create_router(state: AppState) -> Router {
    let game_routes = Router::new()
        .route("/createGame", post(games::create_game))
        .route("/joinGame", post(games::join_game))
        .route("/makeMove", post(games::make_move))
        .route("/getGameState", get(games::get_game_state))
        .route("/resetGame", post(games::reset_game));

    let root_routes = Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/ping", get(ping));

    Router::new()
        .merge(root_routes)
        .nest("/api", game_routes)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id::request_id_middleware))
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    middleware::metrics_middleware,
                )),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> impl IntoResponse {
    Json(json!({
        "message": "Tic Tac Toe Multiplayer API",
        "status": "running",
    }))
}

/// Health check endpoint for monitoring and load balancers.
///
/// ```bash
/// curl http://localhost:8000/health
/// # {"status":"healthy","games_count":2,"timestamp":"2026-10-17T10:30:00+00:00"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "games_count": state.store.game_count().await,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn ping() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
