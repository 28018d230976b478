//! Game module: the board, the players and the state machine that arbitrates
//! turns, detects wins and negotiates new rounds.
//!
//! A [`GameSession`] is a plain value with no interior locking. Callers that
//! share sessions across tasks (see [`crate::store::GameStore`]) are
//! responsible for serializing access to each session.

pub mod entities;
pub mod errors;
pub mod session;
pub mod snapshot;

pub use errors::{ErrorKind, GameError, GameResult, InvalidStateKind};
pub use session::GameSession;
pub use snapshot::GameSnapshot;
