//! Board entities shared by the state machine and its snapshots.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::{fmt, str::FromStr};

use super::errors::{GameError, InvalidStateKind};

/// Number of cells on the board.
pub const BOARD_SIZE: usize = 9;

/// Number of leading characters of a user id used in a default display name.
pub const DEFAULT_NAME_ID_CHARS: usize = 8;

/// Rows, columns and diagonals over the row-major cell indices.
const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A player's mark.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    /// The symbol that moves after this one.
    pub fn opponent(self) -> Self {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::X => write!(f, "X"),
            Symbol::O => write!(f, "O"),
        }
    }
}

/// A single board cell. Serializes as `""`, `"X"` or `"O"`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Cell {
    #[default]
    Empty,
    Taken(Symbol),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            Cell::Empty => None,
            Cell::Taken(symbol) => Some(*symbol),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Cell::Empty => serializer.serialize_str(""),
            Cell::Taken(symbol) => symbol.serialize(serializer),
        }
    }
}

/// The 3x3 grid, stored row-major.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Board([Cell; BOARD_SIZE]);

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell at `index`, or `None` when the index is off the board.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.0.get(index).copied()
    }

    pub fn cells(&self) -> &[Cell; BOARD_SIZE] {
        &self.0
    }

    /// Writes `symbol` into an empty cell.
    ///
    /// Occupied cells are never overwritten; the board only empties through
    /// [`Board::clear`].
    pub(crate) fn place(&mut self, index: usize, symbol: Symbol) -> Result<(), InvalidStateKind> {
        match self.0.get_mut(index) {
            None => Err(InvalidStateKind::CellOutOfRange(index)),
            Some(cell) if !cell.is_empty() => Err(InvalidStateKind::CellOccupied),
            Some(cell) => {
                *cell = Cell::Taken(symbol);
                Ok(())
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.0 = [Cell::Empty; BOARD_SIZE];
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().all(|cell| !cell.is_empty())
    }

    /// The symbol holding a complete row, column or diagonal, if any.
    pub fn winner(&self) -> Option<Symbol> {
        WINNING_LINES.iter().find_map(|[a, b, c]| {
            let first = self.0[*a].symbol()?;
            (self.0[*b] == self.0[*a] && self.0[*c] == self.0[*a]).then_some(first)
        })
    }

    /// The decided outcome of the board, if the round is over.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.winner() {
            Some(symbol) => Some(Outcome::Won(symbol)),
            None if self.is_full() => Some(Outcome::Draw),
            None => None,
        }
    }
}

impl From<[Cell; BOARD_SIZE]> for Board {
    fn from(cells: [Cell; BOARD_SIZE]) -> Self {
        Self(cells)
    }
}

/// How a round ended. Serializes as `"X"`, `"O"` or `"draw"`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    Won(Symbol),
    Draw,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Won(symbol) => write!(f, "{symbol}"),
            Outcome::Draw => write!(f, "draw"),
        }
    }
}

impl Serialize for Outcome {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// A participant in a game.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub user_id: String,
    #[serde(rename = "userName")]
    pub display_name: String,
    pub symbol: Symbol,
}

impl Player {
    /// Creates a player, falling back to [`default_display_name`] when no
    /// usable name is supplied.
    pub fn new(user_id: &str, display_name: Option<&str>, symbol: Symbol) -> Self {
        let display_name = display_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_display_name(user_id));

        Self {
            user_id: user_id.to_string(),
            display_name,
            symbol,
        }
    }
}

/// `Player_` followed by the first few characters of the user id.
pub fn default_display_name(user_id: &str) -> String {
    let prefix: String = user_id.chars().take(DEFAULT_NAME_ID_CHARS).collect();
    format!("Player_{prefix}")
}

/// The most recently applied move.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMove {
    pub cell_index: usize,
    pub player: Symbol,
    pub timestamp: DateTime<Utc>,
}

/// State of a new-round request.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetStatus {
    Requested,
    Rejected,
}

/// An outstanding or rejected request to start a new round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingReset {
    #[serde(rename = "by")]
    pub requested_by: String,
    pub status: ResetStatus,
    pub at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_by: Option<String>,
}

/// The three moves of the new-round negotiation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResetAction {
    Request,
    Accept,
    Reject,
}

impl fmt::Display for ResetAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResetAction::Request => write!(f, "request"),
            ResetAction::Accept => write!(f, "accept"),
            ResetAction::Reject => write!(f, "reject"),
        }
    }
}

impl FromStr for ResetAction {
    type Err = GameError;

    /// Parses an action name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "request" => Ok(ResetAction::Request),
            "accept" => Ok(ResetAction::Accept),
            "reject" => Ok(ResetAction::Reject),
            _ => Err(InvalidStateKind::UnknownResetAction(s.to_string()).into()),
        }
    }
}
