//! First-class move type and the rule-violation taxonomy.
//!
//! Moves carry the color making them, so the same validation path serves
//! both locally entered moves and moves delivered by a peer: a message for
//! the wrong color fails `WrongTurn` like any other illegal move.

use crate::board::{Color, Point};
use serde::{Deserialize, Serialize};

/// A stone placement: a color claiming a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The color making the move.
    pub color: Color,
    /// The target intersection.
    pub point: Point,
}

impl Move {
    /// Creates a new move.
    pub fn new(color: Color, point: Point) -> Self {
        Self { color, point }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} -> {}", self.color, self.point)
    }
}

/// Why a move or action was rejected.
///
/// Every rejection is recoverable: the game state is left exactly as it was
/// before the attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The target point lies outside the board.
    #[display("Point {} is out of bounds", _0)]
    OutOfBounds(Point),

    /// The target cell already holds a stone.
    #[display("Cell {} is occupied", _0)]
    CellOccupied(Point),

    /// It is not this color's turn to move.
    #[display("It's not {:?}'s turn", _0)]
    WrongTurn(Color),

    /// The move would leave the mover's own chain without liberties.
    #[display("Suicide move")]
    SuicideMove,

    /// The move would recreate the position from one ply earlier.
    #[display("Ko rule violation")]
    KoViolation,

    /// The game has already ended.
    #[display("Game is already over")]
    GameOver,

    /// No legal move exists for the side to move.
    #[display("No legal move available")]
    NoLegalMove,
}

impl std::error::Error for MoveError {}
