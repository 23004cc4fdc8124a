//! The session controller: the single serialized entry point for all game
//! state transitions.
//!
//! Local UI calls and inbound peer messages both funnel through the same
//! mutex-guarded state, so no two mutations ever race; whichever request
//! acquires the lock first is evaluated against the committed state and
//! the other simply sees the result (and may legitimately fail with
//! `WrongTurn` or `CellOccupied`). Outbound mirroring happens after the
//! lock is released.

use crate::message::WireMessage;
use goban_engine::{
    Cell, Color, GameConfig, GameState, Move, MoveError, Point, Variant,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument, warn};

/// Snapshot of the game handed to the presentation layer after a mutation
/// commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameUpdate {
    /// Board cells as rows.
    pub board: Vec<Vec<Cell>>,
    /// Side length of the board.
    pub size: usize,
    /// Rule set in effect.
    pub variant: Variant,
    /// Color to move.
    pub current_turn: Color,
    /// Most recent accepted move.
    pub last_move: Option<(usize, usize)>,
    /// Winner, if the game ended with one.
    pub winner: Option<Color>,
    /// Whether the game ended in a draw.
    pub is_draw: bool,
    /// Whether a draw offer awaits a response.
    pub pending_draw_offer: bool,
}

impl GameUpdate {
    fn from_state(state: &GameState) -> Self {
        Self {
            board: state.board().rows(),
            size: state.config().board_size,
            variant: state.config().variant,
            current_turn: state.current_turn(),
            last_move: state.last_move().map(|p| (p.x, p.y)),
            winner: state.winner(),
            is_draw: state.is_draw(),
            pending_draw_offer: state.pending_draw_offer(),
        }
    }
}

/// A locally initiated game action other than a stone placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Resign the game.
    Resign,
    /// Offer the opponent a draw.
    OfferDraw,
    /// Accept the opponent's pending draw offer.
    AcceptDraw,
    /// Decline the opponent's pending draw offer.
    RejectDraw,
    /// Start a fresh game with the given configuration.
    Restart {
        /// Side length of the new board.
        size: usize,
        /// Rule set of the new game.
        variant: Variant,
    },
}

struct Inner {
    game: GameState,
    local_color: Color,
    outbound: Option<UnboundedSender<WireMessage>>,
}

/// The single live game owned by this process.
///
/// Cloning is cheap and shares the underlying state; the network task and
/// the presentation layer each hold a clone.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Mutex<Inner>>,
}

impl Session {
    /// Creates a session with a fresh game. `local_color` is the color the
    /// local player controls (hosts conventionally take Black).
    pub fn new(config: GameConfig, local_color: Color) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                game: GameState::new(config),
                local_color,
                outbound: None,
            })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("session state poisoned")
    }

    /// The color controlled locally.
    pub fn local_color(&self) -> Color {
        self.lock().local_color
    }

    /// Reassigns the locally controlled color (used when joining as the
    /// client side of a link).
    pub fn set_local_color(&self, color: Color) {
        self.lock().local_color = color;
    }

    /// Whether a peer link is currently attached.
    pub fn is_networked(&self) -> bool {
        self.lock().outbound.is_some()
    }

    /// Attaches the outbound half of a peer link. Replaces any prior link.
    pub fn attach_peer(&self, sender: UnboundedSender<WireMessage>) {
        let mut inner = self.lock();
        if inner.outbound.is_some() {
            warn!("Replacing existing peer link");
        }
        inner.outbound = Some(sender);
    }

    /// Detaches the peer link; the session continues in local-only mode.
    pub fn detach_peer(&self) {
        self.lock().outbound = None;
        info!("Peer link detached, continuing locally");
    }

    /// Detaches the peer link only if `sender` is still the attached one,
    /// so a dying link task cannot tear down its replacement.
    pub fn detach_peer_matching(&self, sender: &UnboundedSender<WireMessage>) {
        let mut inner = self.lock();
        if inner
            .outbound
            .as_ref()
            .is_some_and(|current| current.same_channel(sender))
        {
            inner.outbound = None;
            info!("Peer link detached, continuing locally");
        }
    }

    /// Returns the current state without mutating anything.
    pub fn snapshot(&self) -> GameUpdate {
        GameUpdate::from_state(&self.lock().game)
    }

    fn mirror(&self, sender: Option<UnboundedSender<WireMessage>>, message: WireMessage) {
        if let Some(sender) = sender {
            if sender.send(message).is_err() {
                debug!("Peer link gone, dropping outbound message");
            }
        }
    }

    /// Plays a move for the locally controlled color and mirrors it to the
    /// peer on success.
    #[instrument(skip(self))]
    pub fn play_local(&self, x: usize, y: usize) -> Result<GameUpdate, MoveError> {
        let (update, sender) = {
            let mut inner = self.lock();
            let mv = Move::new(inner.local_color, Point::new(x, y));
            inner.game.play(mv)?;
            (GameUpdate::from_state(&inner.game), inner.outbound.clone())
        };
        self.mirror(sender, WireMessage::Move { x, y });
        Ok(update)
    }

    /// Plays a move for the remote color. The move is not trusted: the
    /// normal turn and legality checks reject a message for the wrong
    /// color, an occupied cell, or a finished game, leaving local state
    /// intact.
    #[instrument(skip(self))]
    pub fn play_remote(&self, x: usize, y: usize) -> Result<GameUpdate, MoveError> {
        let mut inner = self.lock();
        let mv = Move::new(inner.local_color.opponent(), Point::new(x, y));
        inner.game.play(mv)?;
        Ok(GameUpdate::from_state(&inner.game))
    }

    /// Asks the move selector for a move for the side to move and applies
    /// it, mirroring like a local move.
    ///
    /// A mirrored `Move` frame means "a move by the sender's color", so
    /// while a peer is attached the AI may only act for the locally
    /// controlled color; on the peer's turn this fails with `WrongTurn`
    /// instead of committing a move the other side would reject.
    #[instrument(skip(self))]
    pub fn play_ai(&self) -> Result<GameUpdate, MoveError> {
        let (update, sender, mv) = {
            let mut inner = self.lock();
            if inner.outbound.is_some() && inner.game.current_turn() != inner.local_color {
                return Err(MoveError::WrongTurn(inner.local_color));
            }
            let mv = goban_engine::pick_move(&inner.game)?;
            inner.game.play(mv)?;
            (GameUpdate::from_state(&inner.game), inner.outbound.clone(), mv)
        };
        self.mirror(
            sender,
            WireMessage::Move {
                x: mv.point.x,
                y: mv.point.y,
            },
        );
        Ok(update)
    }

    /// Applies a locally initiated action and mirrors it to the peer.
    #[instrument(skip(self))]
    pub fn apply_action(&self, action: GameAction) -> Result<GameUpdate, MoveError> {
        let (update, sender, message) = {
            let mut inner = self.lock();
            let local = inner.local_color;
            let message = match action {
                GameAction::Resign => {
                    inner.game.resign(local)?;
                    WireMessage::Resign
                }
                GameAction::OfferDraw => {
                    inner.game.offer_draw(local)?;
                    WireMessage::OfferDraw
                }
                GameAction::AcceptDraw => {
                    inner.game.accept_draw()?;
                    WireMessage::AcceptDraw
                }
                GameAction::RejectDraw => {
                    inner.game.reject_draw()?;
                    WireMessage::RejectDraw
                }
                GameAction::Restart { size, variant } => {
                    inner.game.restart(size, variant);
                    WireMessage::Restart { size, variant }
                }
            };
            (GameUpdate::from_state(&inner.game), inner.outbound.clone(), message)
        };
        self.mirror(sender, message);
        Ok(update)
    }

    /// Dispatches a message received from the peer. Never mirrored back.
    ///
    /// Rejected messages (wrong turn, occupied cell, terminal game) are
    /// ordinary rule violations: the caller reports them and the link
    /// stays up.
    #[instrument(skip(self))]
    pub fn apply_remote(&self, message: WireMessage) -> Result<GameUpdate, MoveError> {
        match message {
            WireMessage::Move { x, y } => self.play_remote(x, y),
            WireMessage::Resign => {
                let mut inner = self.lock();
                let remote = inner.local_color.opponent();
                inner.game.resign(remote)?;
                Ok(GameUpdate::from_state(&inner.game))
            }
            WireMessage::OfferDraw => {
                let mut inner = self.lock();
                let remote = inner.local_color.opponent();
                inner.game.offer_draw(remote)?;
                Ok(GameUpdate::from_state(&inner.game))
            }
            WireMessage::AcceptDraw => {
                let mut inner = self.lock();
                inner.game.accept_draw()?;
                Ok(GameUpdate::from_state(&inner.game))
            }
            WireMessage::RejectDraw => {
                let mut inner = self.lock();
                inner.game.reject_draw()?;
                Ok(GameUpdate::from_state(&inner.game))
            }
            WireMessage::Restart { size, variant } => {
                let mut inner = self.lock();
                inner.game.restart(size, variant);
                info!(size, ?variant, "Game restarted by peer");
                Ok(GameUpdate::from_state(&inner.game))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(GameConfig::new(9, Variant::Go), Color::Black)
    }

    #[test]
    fn local_and_remote_moves_alternate() {
        let session = session();
        session.play_local(3, 3).unwrap();
        let update = session.play_remote(5, 5).unwrap();
        assert_eq!(update.current_turn, Color::Black);
        assert_eq!(update.last_move, Some((5, 5)));
    }

    #[test]
    fn remote_move_out_of_turn_is_rejected() {
        let session = session();
        // Black (local) to move; a remote move claims White's turn.
        let before = session.snapshot();
        let result = session.play_remote(5, 5);
        assert_eq!(result, Err(MoveError::WrongTurn(Color::White)));
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn snapshot_reflects_committed_state_only() {
        let session = session();
        let fresh = session.snapshot();
        assert_eq!(fresh.current_turn, Color::Black);
        assert!(fresh.board.iter().flatten().all(|c| *c == Cell::Empty));

        let _ = session.play_local(100, 100);
        assert_eq!(session.snapshot(), fresh);
    }

    #[test]
    fn restart_action_replaces_the_game() {
        let session = session();
        session.play_local(0, 0).unwrap();
        let update = session
            .apply_action(GameAction::Restart {
                size: 15,
                variant: Variant::Gomoku,
            })
            .unwrap();
        assert_eq!(update.size, 15);
        assert_eq!(update.variant, Variant::Gomoku);
        assert_eq!(update.current_turn, Color::Black);
    }
}
