//! Game session API handlers.
//!
//! This module provides the HTTP endpoints for the game lifecycle:
//! - Creating a game and receiving an invite link
//! - Joining a game as the second player
//! - Making moves
//! - Reading the current state
//! - Negotiating a new round (request, accept, reject)
//!
//! Callers identify themselves with an opaque `userId`, sent as a JSON
//! string or number.
//!
//! # Examples
//!
//! Create a game:
//! ```bash
//! curl -X POST http://localhost:8000/api/createGame \
//!   -H "Content-Type: application/json" \
//!   -d '{"userId": "alice", "userName": "Alice"}'
//! ```
//!
//! Make a move:
//! ```bash
//! curl -X POST http://localhost:8000/api/makeMove \
//!   -H "Content-Type: application/json" \
//!   -d '{"gameId": "game_0123456789ab", "userId": "alice", "cellIndex": 4}'
//! ```

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use serde::{Deserialize, Deserializer, Serialize};
use tictactoe::{BOARD_SIZE, GameSnapshot};

use super::{AppState, error::ApiError, request_id::RequestId};
use crate::{logging, metrics};

/// Accepts an identifier sent either as a string or as a number.
///
/// Text ids are kept verbatim; blank ones are rejected later by `require`.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

fn opaque_id_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "opaque_id")] String);

    Ok(Option::<Wrapped>::deserialize(deserializer)?
        .map(|Wrapped(id)| id)
        .filter(|id| !id.is_empty()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    #[serde(deserialize_with = "opaque_id")]
    pub user_id: String,
    pub user_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinGameRequest {
    pub game_id: String,
    #[serde(deserialize_with = "opaque_id")]
    pub user_id: String,
    pub user_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeMoveRequest {
    pub game_id: String,
    #[serde(deserialize_with = "opaque_id")]
    pub user_id: String,
    pub cell_index: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetGameRequest {
    pub game_id: String,
    #[serde(deserialize_with = "opaque_id")]
    pub user_id: String,
    pub action: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateQuery {
    pub game_id: String,
    #[serde(default, deserialize_with = "opaque_id_opt")]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameResponse {
    pub success: bool,
    pub game_id: String,
    pub invite_link: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSessionResponse {
    pub success: bool,
    pub game_session: GameSnapshot,
}

impl From<GameSnapshot> for GameSessionResponse {
    fn from(game_session: GameSnapshot) -> Self {
        Self {
            success: true,
            game_session,
        }
    }
}

/// Reject blank required fields before they reach the engine.
fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{field} is required")));
    }
    Ok(())
}

/// Convert a wire cell index, rejecting values that cannot address the board.
fn cell_index(raw: i64) -> Result<usize, ApiError> {
    usize::try_from(raw).map_err(|_| {
        ApiError::BadRequest(format!(
            "cellIndex must be between 0 and {}, got {}",
            BOARD_SIZE - 1,
            raw
        ))
    })
}

/// Log a rejection under the request's correlation id and pass the error through.
fn rejected(
    request_id: &RequestId,
    operation: &str,
    game_id: Option<&str>,
    err: impl Into<ApiError>,
) -> ApiError {
    let err = err.into();
    logging::log_rejected_operation(request_id.as_str(), operation, game_id, &err.to_string());
    err
}

/// Create a new game.
///
/// The caller becomes player 1 and plays X. The game stays inactive until a
/// second player joins through the returned invite link.
///
/// # Request Body
///
/// ```json
/// {"userId": "alice", "userName": "Alice"}
/// ```
///
/// # Response
///
/// Returns `200 OK`:
/// ```json
/// {
///   "success": true,
///   "gameId": "game_0123456789ab",
///   "inviteLink": "https://example.app/?gameId=game_0123456789ab&player=2"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing or malformed `userId`
pub async fn create_game(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<CreateGameRequest>, JsonRejection>,
) -> Result<Json<CreateGameResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| rejected(&request_id, "createGame", None, e))?;
    require("userId", &request.user_id).map_err(|e| rejected(&request_id, "createGame", None, e))?;

    let created = state
        .store
        .create_game(&request.user_id, request.user_name.as_deref())
        .await;
    metrics::games_created_total();

    Ok(Json(CreateGameResponse {
        success: true,
        game_id: created.game_id,
        invite_link: created.invite_link,
    }))
}

/// Join a game as the second player.
///
/// The joiner plays O; X moves first once the game starts.
///
/// # Request Body
///
/// ```json
/// {"gameId": "game_0123456789ab", "userId": "bob", "userName": "Bob"}
/// ```
///
/// # Response
///
/// Returns `200 OK` with `{"success": true, "gameSession": {...}}`.
///
/// # Errors
///
/// - `400 Bad Request`: Game already full, or joining your own game
/// - `404 Not Found`: Unknown or expired game
pub async fn join_game(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<JoinGameRequest>, JsonRejection>,
) -> Result<Json<GameSessionResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| rejected(&request_id, "joinGame", None, e))?;
    let game_id = Some(request.game_id.as_str());
    require("gameId", &request.game_id).map_err(|e| rejected(&request_id, "joinGame", None, e))?;
    require("userId", &request.user_id).map_err(|e| rejected(&request_id, "joinGame", game_id, e))?;

    let snapshot = state
        .store
        .join_game(&request.game_id, &request.user_id, request.user_name.as_deref())
        .await
        .map_err(|e| rejected(&request_id, "joinGame", game_id, e))?;
    metrics::games_joined_total();

    Ok(Json(snapshot.into()))
}

/// Make a move.
///
/// # Request Body
///
/// ```json
/// {"gameId": "game_0123456789ab", "userId": "alice", "cellIndex": 4}
/// ```
///
/// Cells are numbered 0 to 8, row by row from the top left.
///
/// # Response
///
/// Returns `200 OK` with the updated game session. `winner` becomes `"X"`,
/// `"O"` or `"draw"` once the round is decided, and `gameActive` turns false.
///
/// # Errors
///
/// - `400 Bad Request`: Game not active, not your turn, occupied or invalid cell
/// - `403 Forbidden`: Caller is not a player in this game
/// - `404 Not Found`: Unknown or expired game
pub async fn make_move(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<MakeMoveRequest>, JsonRejection>,
) -> Result<Json<GameSessionResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| rejected(&request_id, "makeMove", None, e))?;
    let game_id = Some(request.game_id.as_str());
    require("gameId", &request.game_id).map_err(|e| rejected(&request_id, "makeMove", None, e))?;
    require("userId", &request.user_id).map_err(|e| rejected(&request_id, "makeMove", game_id, e))?;
    let cell = cell_index(request.cell_index)
        .map_err(|e| rejected(&request_id, "makeMove", game_id, e))?;

    let snapshot = state
        .store
        .make_move(&request.game_id, &request.user_id, cell)
        .await
        .map_err(|e| rejected(&request_id, "makeMove", game_id, e))?;

    metrics::moves_total();
    if let Some(outcome) = snapshot.winner {
        metrics::games_finished_total(&outcome.to_string());
    }

    Ok(Json(snapshot.into()))
}

/// Get the current state of a game.
///
/// # Query Parameters
///
/// - `gameId`: Game id (required)
/// - `userId`: When present, the caller must be one of the game's players
///
/// # Response
///
/// Returns `200 OK` with the full game session, including any pending
/// new-round request.
///
/// # Errors
///
/// - `403 Forbidden`: `userId` given but not a player in this game
/// - `404 Not Found`: Unknown or expired game
pub async fn get_game_state(
    State(state): State<AppState>,
    request_id: RequestId,
    query: Result<Query<GameStateQuery>, QueryRejection>,
) -> Result<Json<GameSessionResponse>, ApiError> {
    let Query(query) = query.map_err(|e| rejected(&request_id, "getGameState", None, e))?;
    require("gameId", &query.game_id).map_err(|e| rejected(&request_id, "getGameState", None, e))?;

    let snapshot = state
        .store
        .game_state(&query.game_id, query.user_id.as_deref())
        .await
        .map_err(|e| rejected(&request_id, "getGameState", Some(query.game_id.as_str()), e))?;

    Ok(Json(snapshot.into()))
}

/// Request, accept or reject a new round.
///
/// # Request Body
///
/// ```json
/// {"gameId": "game_0123456789ab", "userId": "bob", "action": "request"}
/// ```
///
/// `action` is one of `request`, `accept` or `reject`, in any letter case.
/// A request replaces any earlier one. Only the other player may accept or
/// reject it; accepting clears the board and starts a new round with X to
/// move.
///
/// # Errors
///
/// - `400 Bad Request`: Unknown action, nothing to answer, or answering your own request
/// - `403 Forbidden`: Caller is not a player in this game
/// - `404 Not Found`: Unknown or expired game
pub async fn reset_game(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<ResetGameRequest>, JsonRejection>,
) -> Result<Json<GameSessionResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| rejected(&request_id, "resetGame", None, e))?;
    let game_id = Some(request.game_id.as_str());
    require("gameId", &request.game_id).map_err(|e| rejected(&request_id, "resetGame", None, e))?;
    require("userId", &request.user_id)
        .map_err(|e| rejected(&request_id, "resetGame", game_id, e))?;

    let snapshot = state
        .store
        .reset_game(&request.game_id, &request.user_id, &request.action)
        .await
        .map_err(|e| rejected(&request_id, "resetGame", game_id, e))?;
    metrics::resets_total(&request.action.to_ascii_lowercase());

    Ok(Json(snapshot.into()))
}
