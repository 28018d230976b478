//! Serializable view of a session.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::entities::{Board, LastMove, Outcome, PendingReset, Player, Symbol};

/// Full session state as returned by every operation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub game_id: String,
    pub player1: Player,
    pub player2: Option<Player>,
    pub board: Board,
    pub current_player: Symbol,
    pub game_active: bool,
    pub winner: Option<Outcome>,
    pub last_move: Option<LastMove>,
    pub pending_reset: Option<PendingReset>,
    pub created_at: DateTime<Utc>,
}
