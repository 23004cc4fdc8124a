//! Wire protocol for the peer link.
//!
//! One closed enum, one variant per game event. Messages are encoded as
//! newline-delimited JSON: the trailing newline is the frame boundary, so
//! the receiver can split the ordered byte stream back into discrete
//! events regardless of how the transport coalesces writes.

use goban_engine::Variant;
use serde::{Deserialize, Serialize};

/// A complete, self-contained game event exchanged between peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireMessage {
    /// The peer placed a stone.
    Move {
        /// Column of the placement.
        x: usize,
        /// Row of the placement.
        y: usize,
    },
    /// The peer resigned.
    Resign,
    /// The peer offers a draw.
    OfferDraw,
    /// The peer accepts a pending draw offer.
    AcceptDraw,
    /// The peer declines a pending draw offer.
    RejectDraw,
    /// The peer started a new game with the given configuration.
    Restart {
        /// Side length of the new board.
        size: usize,
        /// Rule set of the new game.
        variant: Variant,
    },
}

impl WireMessage {
    /// Encodes the message as one newline-terminated JSON frame.
    pub fn encode(&self) -> String {
        let mut frame = serde_json::to_string(self).expect("wire message serializes");
        frame.push('\n');
        frame
    }

    /// Decodes one frame (without or with its trailing newline).
    pub fn decode(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_newline_terminated() {
        let frame = WireMessage::Move { x: 3, y: 15 }.encode();
        assert!(frame.ends_with('\n'));
        assert!(!frame.trim_end().contains('\n'));
        assert_eq!(WireMessage::decode(&frame).unwrap(), WireMessage::Move { x: 3, y: 15 });
    }

    #[test]
    fn restart_carries_the_configuration() {
        let frame = WireMessage::Restart {
            size: 15,
            variant: Variant::Gomoku,
        }
        .encode();
        let decoded = WireMessage::decode(&frame).unwrap();
        assert_eq!(
            decoded,
            WireMessage::Restart {
                size: 15,
                variant: Variant::Gomoku
            }
        );
    }

    #[test]
    fn malformed_frames_are_errors() {
        assert!(WireMessage::decode("not json").is_err());
        assert!(WireMessage::decode("{\"Move\":{\"x\":1}}").is_err());
    }
}
