//! Peer-to-peer link: host/client roles, framing, and the connection
//! lifecycle.
//!
//! The network layer holds no game-rule knowledge. It translates between
//! newline-delimited frames on the TCP stream and [`Session`] calls, and
//! reports lifecycle changes through a [`SessionEvent`] channel. Losing the
//! peer never corrupts game state: the session just continues local-only.

use crate::message::WireMessage;
use crate::session::{GameUpdate, Session};
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

/// Failures in the network layer. Reported to the presentation layer as
/// status text; never fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum NetError {
    /// Could not establish the link.
    #[display("Connection failed: {}", _0)]
    ConnectionFailed(String),

    /// The peer link was lost.
    #[display("Peer disconnected")]
    PeerDisconnected,
}

impl std::error::Error for NetError {}

/// Notifications pushed to the presentation layer by the session and
/// network tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A mutation committed; here is the resulting state.
    StateChanged(GameUpdate),
    /// A peer link was established.
    PeerConnected(SocketAddr),
    /// The peer link went away; play continues locally.
    PeerDisconnected,
    /// Human-readable status text.
    Status(String),
}

/// Starts hosting on `port` and returns the bound address.
///
/// Exactly one peer is accepted per hosting session; once the link is up
/// the listener is dropped, so a second connection attempt finds nothing
/// listening rather than silently multiplexing into the same game.
#[instrument(skip(session, events))]
pub async fn host(
    port: u16,
    session: Session,
    events: mpsc::UnboundedSender<SessionEvent>,
) -> Result<SocketAddr, NetError> {
    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .map_err(|e| NetError::ConnectionFailed(e.to_string()))?;
    let addr = listener
        .local_addr()
        .map_err(|e| NetError::ConnectionFailed(e.to_string()))?;
    info!(%addr, "Hosting, waiting for one peer");

    tokio::spawn(async move {
        match listener.accept().await {
            Ok((stream, peer)) => {
                info!(%peer, "Peer connected");
                drop(listener);
                run_peer(stream, peer, session, events).await;
            }
            Err(e) => {
                warn!(error = %e, "Accept failed");
                let _ = events.send(SessionEvent::Status(format!("Accept failed: {e}")));
            }
        }
    });

    Ok(addr)
}

/// Connects to a hosting peer at `addr` (`host:port`).
#[instrument(skip(session, events))]
pub async fn connect(
    addr: &str,
    session: Session,
    events: mpsc::UnboundedSender<SessionEvent>,
) -> Result<SocketAddr, NetError> {
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|e| NetError::ConnectionFailed(e.to_string()))?;
    let peer = stream
        .peer_addr()
        .map_err(|e| NetError::ConnectionFailed(e.to_string()))?;
    info!(%peer, "Connected to host");

    tokio::spawn(async move {
        run_peer(stream, peer, session, events).await;
    });

    Ok(peer)
}

/// Drives one peer link until it closes: inbound frames are dispatched
/// through the session controller, outbound messages are drained from the
/// session's mirror queue. Neither path ever holds the game-state lock
/// across an await.
///
/// `PeerConnected` is emitted only after the outbound sender is attached,
/// so anything reacting to it (such as the host announcing its
/// configuration) is guaranteed to reach the wire.
async fn run_peer(
    stream: TcpStream,
    peer: SocketAddr,
    session: Session,
    events: mpsc::UnboundedSender<SessionEvent>,
) {
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel();
    session.attach_peer(outbound_tx.clone());
    let _ = events.send(SessionEvent::PeerConnected(peer));

    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => handle_frame(&line, &session, &events),
                Ok(None) => {
                    info!("Peer closed the connection");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "Read error on peer link");
                    break;
                }
            },
            message = outbound_rx.recv() => match message {
                Some(message) => {
                    if !write_frame(&mut writer, message).await {
                        break;
                    }
                }
                // Sender replaced or dropped; this link is done.
                None => break,
            },
        }
    }

    session.detach_peer_matching(&outbound_tx);
    let _ = events.send(SessionEvent::PeerDisconnected);
}

/// Decodes and applies one inbound frame. Malformed frames and rule
/// rejections are logged and skipped; the link itself stays up.
fn handle_frame(line: &str, session: &Session, events: &mpsc::UnboundedSender<SessionEvent>) {
    if line.trim().is_empty() {
        return;
    }
    match WireMessage::decode(line) {
        Ok(message) => match session.apply_remote(message) {
            Ok(update) => {
                let _ = events.send(SessionEvent::StateChanged(update));
            }
            Err(e) => {
                warn!(?message, error = %e, "Rejected peer message");
                let _ = events.send(SessionEvent::Status(format!("Peer message rejected: {e}")));
            }
        },
        Err(e) => {
            warn!(error = %e, raw = line, "Malformed peer frame");
        }
    }
}

async fn write_frame(writer: &mut OwnedWriteHalf, message: WireMessage) -> bool {
    match writer.write_all(message.encode().as_bytes()).await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Write error on peer link");
            false
        }
    }
}
