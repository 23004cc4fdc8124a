//! Rule engine: move legality, capture resolution, ko enforcement, and
//! outcome tracking for Go and Gomoku.
//!
//! All mutating operations are atomic from the caller's perspective. A Go
//! move is staged on a cloned board and only committed once captures,
//! suicide, and ko have all been resolved, so a rejected move leaves the
//! state untouched.

use crate::action::{Move, MoveError};
use crate::board::{Board, Cell, Color, Point};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// Which rule set the game is played under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    /// Go: captures, suicide prohibition, and the simple ko rule apply.
    Go,
    /// Gomoku: five in a row wins; no captures.
    Gomoku,
}

impl Variant {
    /// Conventional board side length for the variant (19 for Go, 15 for
    /// Gomoku). Games may be started at other sizes.
    pub fn default_size(self) -> usize {
        match self {
            Variant::Go => 19,
            Variant::Gomoku => 15,
        }
    }
}

/// Immutable per-game configuration. Replaced wholesale on restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Side length of the square board.
    pub board_size: usize,
    /// Rule set in effect.
    pub variant: Variant,
}

impl GameConfig {
    /// Creates a configuration.
    pub fn new(board_size: usize, variant: Variant) -> Self {
        Self {
            board_size,
            variant,
        }
    }
}

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended with a winner.
    Won(Color),
    /// Game ended in a draw.
    Draw,
}

/// What a successful move did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayOutcome {
    /// Number of opponent stones captured by the move (always 0 in Gomoku).
    pub captured: usize,
}

/// Complete game state: the unit exposed to callers.
///
/// Terminal states (`Won` or `Draw`) are absorbing: every further move or
/// action fails with [`MoveError::GameOver`] until a restart replaces the
/// state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    current_turn: Color,
    last_move: Option<Point>,
    pending_draw_offer: bool,
    // Ko window: the position as it stood before the opponent's last move.
    // Only one ply matters for the simple ko rule.
    previous_position: Option<Board>,
    status: GameStatus,
}

impl GameState {
    /// Creates a fresh game for the given configuration. Black moves first.
    #[instrument]
    pub fn new(config: GameConfig) -> Self {
        info!(size = config.board_size, variant = ?config.variant, "Starting new game");
        Self {
            config,
            board: Board::new(config.board_size),
            current_turn: Color::Black,
            last_move: None,
            pending_draw_offer: false,
            previous_position: None,
            status: GameStatus::InProgress,
        }
    }

    /// Replaces this state with a fresh game, discarding all history.
    pub fn restart(&mut self, size: usize, variant: Variant) {
        *self = GameState::new(GameConfig::new(size, variant));
    }

    /// Returns the configuration.
    pub fn config(&self) -> GameConfig {
        self.config
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the color to move.
    pub fn current_turn(&self) -> Color {
        self.current_turn
    }

    /// Returns the most recent accepted move, if any.
    pub fn last_move(&self) -> Option<Point> {
        self.last_move
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns the winner, if the game ended with one.
    pub fn winner(&self) -> Option<Color> {
        match self.status {
            GameStatus::Won(color) => Some(color),
            _ => None,
        }
    }

    /// Whether the game ended in a draw.
    pub fn is_draw(&self) -> bool {
        self.status == GameStatus::Draw
    }

    /// Whether the game has ended.
    pub fn is_terminal(&self) -> bool {
        self.status != GameStatus::InProgress
    }

    /// Whether a draw offer is awaiting a response.
    pub fn pending_draw_offer(&self) -> bool {
        self.pending_draw_offer
    }

    fn ensure_in_progress(&self) -> Result<(), MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }
        Ok(())
    }

    /// Validates and applies a move.
    ///
    /// For Go this resolves captures, then the suicide prohibition, then the
    /// simple ko rule; for Gomoku it scans for five in a row and for a full
    /// board. On success the turn passes to the opponent and any pending
    /// draw offer is cancelled.
    ///
    /// # Errors
    ///
    /// Any [`MoveError`] leaves the state byte-for-byte unchanged.
    #[instrument(skip(self), fields(turn = ?self.current_turn))]
    pub fn play(&mut self, mv: Move) -> Result<PlayOutcome, MoveError> {
        self.ensure_in_progress()?;
        if mv.color != self.current_turn {
            return Err(MoveError::WrongTurn(mv.color));
        }
        if self.board.get(mv.point)? != Cell::Empty {
            return Err(MoveError::CellOccupied(mv.point));
        }

        let outcome = match self.config.variant {
            Variant::Gomoku => self.play_gomoku(mv),
            Variant::Go => self.play_go(mv)?,
        };

        self.last_move = Some(mv.point);
        self.pending_draw_offer = false;
        if !self.is_terminal() {
            self.current_turn = mv.color.opponent();
        }
        debug!(%mv, captured = outcome.captured, status = ?self.status, "Move applied");
        Ok(outcome)
    }

    /// Gomoku placement: no captures, no ko. Placement cannot fail once the
    /// target is known to be empty and in bounds.
    fn play_gomoku(&mut self, mv: Move) -> PlayOutcome {
        self.board
            .set(mv.point, Cell::Stone(mv.color))
            .expect("target already bounds-checked");

        if self.five_in_a_row(mv.point, mv.color) {
            self.status = GameStatus::Won(mv.color);
            info!(winner = ?mv.color, "Five in a row");
        } else if self.board.is_full() {
            self.status = GameStatus::Draw;
            info!("Board full with no winner, game drawn");
        }
        PlayOutcome { captured: 0 }
    }

    /// Go placement: staged on a cloned board, committed only after the
    /// capture, suicide, and ko checks all pass.
    fn play_go(&mut self, mv: Move) -> Result<PlayOutcome, MoveError> {
        let mut next = self.board.clone();
        next.set(mv.point, Cell::Stone(mv.color))
            .expect("target already bounds-checked");

        // Capture pass: every adjacent opponent chain left without
        // liberties is removed before suicide is evaluated.
        let opponent = mv.color.opponent();
        let mut captured: HashSet<Point> = HashSet::new();
        for neighbor in self.board.neighbors(mv.point) {
            if next.get(neighbor)? != Cell::Stone(opponent) || captured.contains(&neighbor) {
                continue;
            }
            let group = next.group_of(neighbor);
            if next.liberties_of(&group) == 0 {
                captured.extend(group.iter().copied());
            }
        }
        let captured: Vec<Point> = captured.into_iter().collect();
        next.remove_group(&captured);

        // Suicide check, on the post-capture position.
        let own_group = next.group_of(mv.point);
        if next.liberties_of(&own_group) == 0 {
            return Err(MoveError::SuicideMove);
        }

        // Simple ko: the move may not recreate the position that stood
        // before the opponent's last move.
        if self.previous_position.as_ref() == Some(&next) {
            return Err(MoveError::KoViolation);
        }

        self.previous_position = Some(std::mem::replace(&mut self.board, next));
        if !captured.is_empty() {
            info!(count = captured.len(), by = ?mv.color, "Stones captured");
        }
        Ok(PlayOutcome {
            captured: captured.len(),
        })
    }

    /// Scans the four axis directions through `point` for five or more
    /// consecutive stones of `color`.
    fn five_in_a_row(&self, point: Point, color: Color) -> bool {
        const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

        for (dx, dy) in DIRECTIONS {
            let mut count = 1;
            count += self.run_length(point, color, dx, dy);
            count += self.run_length(point, color, -dx, -dy);
            if count >= 5 {
                return true;
            }
        }
        false
    }

    /// Number of consecutive `color` stones from `point` (exclusive) along
    /// the given direction.
    fn run_length(&self, point: Point, color: Color, dx: isize, dy: isize) -> usize {
        let mut count = 0;
        let mut x = point.x as isize + dx;
        let mut y = point.y as isize + dy;
        while x >= 0 && y >= 0 {
            let p = Point::new(x as usize, y as usize);
            match self.board.get(p) {
                Ok(Cell::Stone(c)) if c == color => count += 1,
                _ => break,
            }
            x += dx;
            y += dy;
        }
        count
    }

    /// Resigns the game for `by`; the opposing color wins.
    #[instrument(skip(self))]
    pub fn resign(&mut self, by: Color) -> Result<(), MoveError> {
        self.ensure_in_progress()?;
        self.status = GameStatus::Won(by.opponent());
        self.pending_draw_offer = false;
        info!(resigned = ?by, winner = ?by.opponent(), "Resignation");
        Ok(())
    }

    /// Records a draw offer from `by`, awaiting the opponent's response.
    #[instrument(skip(self))]
    pub fn offer_draw(&mut self, by: Color) -> Result<(), MoveError> {
        self.ensure_in_progress()?;
        self.pending_draw_offer = true;
        debug!(offered_by = ?by, "Draw offered");
        Ok(())
    }

    /// Accepts a pending draw offer, ending the game in a draw. With no
    /// offer pending this is a no-op and the game stays live.
    #[instrument(skip(self))]
    pub fn accept_draw(&mut self) -> Result<(), MoveError> {
        self.ensure_in_progress()?;
        if self.pending_draw_offer {
            self.pending_draw_offer = false;
            self.status = GameStatus::Draw;
            info!("Draw agreed");
        }
        Ok(())
    }

    /// Declines a pending draw offer; the game continues.
    #[instrument(skip(self))]
    pub fn reject_draw(&mut self) -> Result<(), MoveError> {
        self.ensure_in_progress()?;
        self.pending_draw_offer = false;
        debug!("Draw offer rejected");
        Ok(())
    }
}
