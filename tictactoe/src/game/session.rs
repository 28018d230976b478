//! Per-game state machine.
//!
//! Every operation validates first and mutates only once all checks pass,
//! so a failed call never leaves a partially applied change behind.

use chrono::{DateTime, Utc};
use log::{debug, info};

use super::{
    entities::{Board, LastMove, Outcome, PendingReset, Player, ResetAction, ResetStatus, Symbol},
    errors::{GameError, GameResult, InvalidStateKind},
    snapshot::GameSnapshot,
};

/// One two-player game.
///
/// Invariants:
/// - `active` implies a second player and no decided outcome
/// - a decided outcome implies `!active`
/// - an occupied cell is only emptied by an accepted reset
#[derive(Clone, Debug)]
pub struct GameSession {
    id: String,
    created_at: DateTime<Utc>,
    player1: Player,
    player2: Option<Player>,
    board: Board,
    current_player: Symbol,
    active: bool,
    winner: Option<Outcome>,
    last_move: Option<LastMove>,
    pending_reset: Option<PendingReset>,
}

impl GameSession {
    /// Creates a session owned by its creator, who always plays X.
    ///
    /// The session stays inactive until a second player joins.
    pub fn new(
        id: String,
        creator_id: &str,
        creator_name: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        let player1 = Player::new(creator_id, creator_name, Symbol::X);
        info!(
            "Game {} created by {} ({})",
            id, player1.user_id, player1.display_name
        );

        Self {
            id,
            created_at: now,
            player1,
            player2: None,
            board: Board::new(),
            current_player: Symbol::X,
            active: false,
            winner: None,
            last_move: None,
            pending_reset: None,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn player1(&self) -> &Player {
        &self.player1
    }

    pub fn player2(&self) -> Option<&Player> {
        self.player2.as_ref()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Symbol {
        self.current_player
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn winner(&self) -> Option<Outcome> {
        self.winner
    }

    pub fn last_move(&self) -> Option<&LastMove> {
        self.last_move.as_ref()
    }

    pub fn pending_reset(&self) -> Option<&PendingReset> {
        self.pending_reset.as_ref()
    }

    /// Symbol played by `user_id`, or [`GameError::Forbidden`] for outsiders.
    pub fn symbol_of(&self, user_id: &str) -> GameResult<Symbol> {
        if self.player1.user_id == user_id {
            return Ok(self.player1.symbol);
        }
        match &self.player2 {
            Some(player) if player.user_id == user_id => Ok(player.symbol),
            _ => Err(GameError::Forbidden),
        }
    }

    /// Seats the second player (O) and starts the game.
    pub fn join(&mut self, joiner_id: &str, joiner_name: Option<&str>) -> GameResult<()> {
        if self.player2.is_some() {
            return Err(InvalidStateKind::GameFull.into());
        }
        if self.player1.user_id == joiner_id {
            return Err(InvalidStateKind::OwnGame.into());
        }

        let player2 = Player::new(joiner_id, joiner_name, Symbol::O);
        info!(
            "Game {}: {} ({}) joined as O",
            self.id, player2.user_id, player2.display_name
        );

        self.player2 = Some(player2);
        self.active = true;
        self.current_player = Symbol::X;
        Ok(())
    }

    /// Places the mover's symbol at `cell_index` and settles the round if the
    /// move completes a line or fills the board.
    pub fn apply_move(
        &mut self,
        mover_id: &str,
        cell_index: usize,
        now: DateTime<Utc>,
    ) -> GameResult<()> {
        if !self.active {
            return Err(InvalidStateKind::GameNotActive.into());
        }

        let symbol = self.symbol_of(mover_id)?;
        if self.current_player != symbol {
            return Err(InvalidStateKind::NotYourTurn.into());
        }

        self.board.place(cell_index, symbol)?;
        self.current_player = symbol.opponent();
        self.last_move = Some(LastMove {
            cell_index,
            player: symbol,
            timestamp: now,
        });
        debug!("Game {}: {} played cell {}", self.id, symbol, cell_index);

        if let Some(outcome) = self.board.outcome() {
            self.winner = Some(outcome);
            self.active = false;
            info!("Game {} finished: {}", self.id, outcome);
        }

        Ok(())
    }

    /// Advances the new-round negotiation.
    ///
    /// `Request` always replaces whatever request came before it. `Accept`
    /// and `Reject` only answer a live request made by the other player.
    pub fn negotiate_reset(
        &mut self,
        caller_id: &str,
        action: ResetAction,
        now: DateTime<Utc>,
    ) -> GameResult<()> {
        self.symbol_of(caller_id)?;

        match action {
            ResetAction::Request => {
                self.pending_reset = Some(PendingReset {
                    requested_by: caller_id.to_string(),
                    status: ResetStatus::Requested,
                    at: now,
                    rejected_by: None,
                });
                debug!("Game {}: {} requested a new round", self.id, caller_id);
            }
            ResetAction::Accept => {
                self.answerable_request(caller_id, action)?;
                self.start_new_round();
                info!("Game {}: new round accepted by {}", self.id, caller_id);
            }
            ResetAction::Reject => {
                let pending = self.answerable_request(caller_id, action)?;
                let (requested_by, at) = (pending.requested_by.clone(), pending.at);
                self.pending_reset = Some(PendingReset {
                    requested_by,
                    status: ResetStatus::Rejected,
                    at,
                    rejected_by: Some(caller_id.to_string()),
                });
                debug!("Game {}: new round rejected by {}", self.id, caller_id);
            }
        }

        Ok(())
    }

    /// The pending request `caller_id` may accept or reject.
    fn answerable_request(
        &self,
        caller_id: &str,
        action: ResetAction,
    ) -> GameResult<&PendingReset> {
        let pending = self
            .pending_reset
            .as_ref()
            .filter(|pending| pending.status == ResetStatus::Requested)
            .ok_or(InvalidStateKind::NoPendingReset(action))?;

        if pending.requested_by == caller_id {
            return Err(InvalidStateKind::OwnResetRequest(action).into());
        }
        Ok(pending)
    }

    fn start_new_round(&mut self) {
        self.board.clear();
        self.current_player = Symbol::X;
        self.active = true;
        self.winner = None;
        self.last_move = None;
        self.pending_reset = None;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            game_id: self.id.clone(),
            player1: self.player1.clone(),
            player2: self.player2.clone(),
            board: self.board.clone(),
            current_player: self.current_player,
            game_active: self.active,
            winner: self.winner,
            last_move: self.last_move.clone(),
            pending_reset: self.pending_reset.clone(),
            created_at: self.created_at,
        }
    }
}
