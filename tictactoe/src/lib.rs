//! # Tic-Tac-Toe
//!
//! A two-player tic-tac-toe engine for remote play over a stateless
//! request/response API. Session state lives in memory on the server.
//!
//! ## Core Modules
//!
//! - [`game`]: Board entities, the per-game state machine and its error types
//! - [`store`]: The session store that owns every live game and expires idle ones
//!
//! ## Example
//!
//! ```
//! use tictactoe::{GameStore, StoreConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), tictactoe::GameError> {
//! let store = GameStore::new(StoreConfig::default());
//!
//! let created = store.create_game("alice", Some("Alice")).await;
//! store.join_game(&created.game_id, "bob", None).await?;
//!
//! let snapshot = store.make_move(&created.game_id, "alice", 4).await?;
//! assert!(snapshot.game_active);
//! # Ok(())
//! # }
//! ```

/// Board entities, game sessions and errors.
pub mod game;
pub use game::{
    ErrorKind, GameError, GameResult, GameSession, GameSnapshot, InvalidStateKind,
    entities::{
        self, BOARD_SIZE, Board, Cell, LastMove, Outcome, PendingReset, Player, ResetAction,
        ResetStatus, Symbol,
    },
};

/// Session storage and expiry.
pub mod store;
pub use store::{CreatedGame, GameId, GameStore, StoreConfig, sweep};
