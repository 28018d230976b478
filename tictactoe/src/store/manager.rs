//! Session store for creating, looking up and expiring game sessions.

use chrono::{DateTime, Utc};
use log::info;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::{
    GameId,
    config::StoreConfig,
    sweep::{Expiring, sweep},
};
use crate::game::{GameError, GameResult, GameSession, GameSnapshot, entities::ResetAction};

/// Length of the random hex suffix in a game id.
const GAME_ID_HEX_LEN: usize = 12;

/// Result of creating a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedGame {
    pub game_id: GameId,
    pub invite_link: String,
}

/// A stored session. `created_at` is copied out of the session so the sweep
/// never has to take a session lock.
#[derive(Clone)]
struct SessionSlot {
    created_at: DateTime<Utc>,
    session: Arc<Mutex<GameSession>>,
}

impl Expiring for SessionSlot {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Store owning every live game session.
///
/// The map lock is held only long enough to sweep and look up a slot. Each
/// operation then holds its session's own lock for the whole
/// validate-then-mutate step, so moves on one game serialize while separate
/// games proceed independently.
pub struct GameStore {
    /// Store configuration
    config: StoreConfig,

    /// Live sessions by id
    sessions: RwLock<HashMap<GameId, SessionSlot>>,
}

impl GameStore {
    /// Create an empty store
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create a game with the caller seated as X
    ///
    /// # Arguments
    ///
    /// * `creator_id` - Opaque caller identifier
    /// * `creator_name` - Optional display name
    ///
    /// # Returns
    ///
    /// * `CreatedGame` - The new game id and its invite link
    pub async fn create_game(&self, creator_id: &str, creator_name: Option<&str>) -> CreatedGame {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        self.sweep_locked(&mut sessions, now);

        let game_id = loop {
            let candidate = new_game_id();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };

        let session = GameSession::new(game_id.clone(), creator_id, creator_name, now);
        sessions.insert(
            game_id.clone(),
            SessionSlot {
                created_at: now,
                session: Arc::new(Mutex::new(session)),
            },
        );
        drop(sessions);

        CreatedGame {
            invite_link: self.config.invite_link(&game_id),
            game_id,
        }
    }

    /// Join a game as the second player (O)
    ///
    /// # Returns
    ///
    /// * `GameResult<GameSnapshot>` - Snapshot of the started game, or
    ///   `NotFound` / `InvalidState` (full, own game)
    pub async fn join_game(
        &self,
        game_id: &str,
        joiner_id: &str,
        joiner_name: Option<&str>,
    ) -> GameResult<GameSnapshot> {
        let slot = self.slot(game_id, Utc::now()).await?;
        let mut session = slot.lock().await;
        session.join(joiner_id, joiner_name)?;
        Ok(session.snapshot())
    }

    /// Play a move
    ///
    /// # Returns
    ///
    /// * `GameResult<GameSnapshot>` - Updated snapshot, or `NotFound` /
    ///   `Forbidden` / `InvalidState` (inactive, turn, cell)
    pub async fn make_move(
        &self,
        game_id: &str,
        mover_id: &str,
        cell_index: usize,
    ) -> GameResult<GameSnapshot> {
        let now = Utc::now();
        let slot = self.slot(game_id, now).await?;
        let mut session = slot.lock().await;
        session.apply_move(mover_id, cell_index, now)?;
        Ok(session.snapshot())
    }

    /// Read a game's state
    ///
    /// When `caller_id` is given, only the game's players may read it.
    pub async fn game_state(
        &self,
        game_id: &str,
        caller_id: Option<&str>,
    ) -> GameResult<GameSnapshot> {
        let slot = self.slot(game_id, Utc::now()).await?;
        let session = slot.lock().await;
        if let Some(caller_id) = caller_id {
            session.symbol_of(caller_id)?;
        }
        Ok(session.snapshot())
    }

    /// Request, accept or reject a new round
    ///
    /// `action` is matched case-insensitively. Membership is checked before
    /// the action is parsed, so outsiders get `Forbidden` whatever they send.
    pub async fn reset_game(
        &self,
        game_id: &str,
        caller_id: &str,
        action: &str,
    ) -> GameResult<GameSnapshot> {
        let now = Utc::now();
        let slot = self.slot(game_id, now).await?;
        let mut session = slot.lock().await;
        session.symbol_of(caller_id)?;
        let action: ResetAction = action.parse()?;
        session.negotiate_reset(caller_id, action, now)?;
        Ok(session.snapshot())
    }

    /// Number of sessions currently held, including any not yet swept.
    pub async fn game_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop every session older than the retention window at `now`.
    ///
    /// # Returns
    ///
    /// * `usize` - Number of sessions removed
    pub async fn sweep_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        self.sweep_locked(&mut sessions, now)
    }

    /// Sweep, then hand out the session lock for `game_id`.
    async fn slot(&self, game_id: &str, now: DateTime<Utc>) -> GameResult<Arc<Mutex<GameSession>>> {
        let mut sessions = self.sessions.write().await;
        self.sweep_locked(&mut sessions, now);
        sessions
            .get(game_id)
            .map(|slot| slot.session.clone())
            .ok_or(GameError::NotFound)
    }

    fn sweep_locked(&self, sessions: &mut HashMap<GameId, SessionSlot>, now: DateTime<Utc>) -> usize {
        let before = sessions.len();
        *sessions = sweep(std::mem::take(sessions), now, self.config.retention);
        let removed = before - sessions.len();

        if removed > 0 {
            info!("Expired {} game(s), {} remaining", removed, sessions.len());
        }
        removed
    }
}

/// `game_` followed by twelve random hex digits.
fn new_game_id() -> GameId {
    let hex = Uuid::new_v4().simple().to_string();
    format!("game_{}", &hex[..GAME_ID_HEX_LEN])
}
