//! Session control and peer-to-peer synchronization for the Go/Gomoku
//! engine.
//!
//! # Architecture
//!
//! - **Session**: owns the single authoritative [`goban_engine::GameState`]
//!   behind one mutex and exposes the whole command surface (moves, AI,
//!   resignation, draw negotiation, restart).
//! - **Wire protocol**: a closed [`WireMessage`] enum, one variant per game
//!   event, framed as newline-delimited JSON.
//! - **Network layer**: host/client TCP tasks that translate frames into
//!   session calls and never touch game rules themselves.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod message;
mod net;
mod session;

pub use message::WireMessage;
pub use net::{connect, host, NetError, SessionEvent};
pub use session::{GameAction, GameUpdate, Session};
