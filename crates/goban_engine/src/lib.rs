//! Go and Gomoku rule engine.
//!
//! This crate is the authoritative game logic: board and chain/liberty
//! queries, move legality (captures, suicide, simple ko), turn and outcome
//! management, and a heuristic move selector. It performs no I/O; the
//! session layer owns concurrency and networking.
//!
//! # Example
//!
//! ```
//! use goban_engine::{Color, GameConfig, GameState, Move, Point, Variant};
//!
//! let mut game = GameState::new(GameConfig::new(19, Variant::Go));
//! game.play(Move::new(Color::Black, Point::new(3, 3)))?;
//! assert_eq!(game.current_turn(), Color::White);
//! # Ok::<(), goban_engine::MoveError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod ai;
mod board;
mod game;

pub use action::{Move, MoveError};
pub use ai::pick_move;
pub use board::{Board, Cell, Color, Point};
pub use game::{GameConfig, GameState, GameStatus, PlayOutcome, Variant};
