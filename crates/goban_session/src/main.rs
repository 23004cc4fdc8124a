//! Goban - Go and Gomoku over a direct peer link.
//!
//! Thin line-oriented shell over the session controller: it renders
//! snapshots and forwards commands, nothing more.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use goban_engine::{Cell, Color, GameConfig, Variant};
use goban_session::{GameAction, GameUpdate, Session, SessionEvent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Local { variant, size, ai } => {
            let variant: Variant = variant.into();
            let size = size.unwrap_or_else(|| variant.default_size());
            let session = Session::new(GameConfig::new(size, variant), Color::Black);
            let (events_tx, events_rx) = mpsc::unbounded_channel();
            println!("Local game: {variant:?} on {size}x{size}");
            run_shell(session, events_tx, events_rx, ai, None).await
        }
        Command::Host {
            port,
            variant,
            size,
        } => {
            let variant: Variant = variant.into();
            let size = size.unwrap_or_else(|| variant.default_size());
            let session = Session::new(GameConfig::new(size, variant), Color::Black);
            let (events_tx, events_rx) = mpsc::unbounded_channel();
            let addr = goban_session::host(port, session.clone(), events_tx.clone()).await?;
            println!("Hosting {variant:?} on {size}x{size}, listening on {addr} (you are Black)");
            run_shell(session, events_tx, events_rx, false, Some((size, variant))).await
        }
        Command::Connect { addr } => {
            // The host announces the real configuration with a Restart
            // message once the link is up.
            let session = Session::new(GameConfig::new(19, Variant::Go), Color::White);
            let (events_tx, events_rx) = mpsc::unbounded_channel();
            let peer = goban_session::connect(&addr, session.clone(), events_tx.clone()).await?;
            println!("Connected to {peer} (you are White)");
            run_shell(session, events_tx, events_rx, false, None).await
        }
    }
}

/// Drives the interactive loop: stdin commands on one side, session and
/// network events on the other.
async fn run_shell(
    session: Session,
    // Held so the event channel outlives network tasks that come and go.
    _events_tx: mpsc::UnboundedSender<SessionEvent>,
    mut events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    ai_opponent: bool,
    announce: Option<(usize, Variant)>,
) -> Result<()> {
    println!("{}", render(&session.snapshot()));
    print_help();

    let mut input = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = events_rx.recv() => {
                if let Some(event) = event {
                    handle_event(&session, event, announce);
                }
            }
            line = input.next_line() => {
                let Some(line) = line? else { break };
                if !handle_command(&session, line.trim(), ai_opponent) {
                    break;
                }
            }
        }
    }

    info!("Shell exiting");
    Ok(())
}

fn handle_event(session: &Session, event: SessionEvent, announce: Option<(usize, Variant)>) {
    match event {
        SessionEvent::StateChanged(update) => println!("{}", render(&update)),
        SessionEvent::PeerConnected(addr) => {
            println!("Peer connected from {addr}");
            // The host restates the configuration so both boards agree.
            if let Some((size, variant)) = announce {
                match session.apply_action(GameAction::Restart { size, variant }) {
                    Ok(update) => println!("{}", render(&update)),
                    Err(e) => println!("Could not restart: {e}"),
                }
            }
        }
        SessionEvent::PeerDisconnected => println!("Peer disconnected, continuing locally"),
        SessionEvent::Status(text) => println!("{text}"),
    }
}

/// Executes one shell command. Returns false when the shell should exit.
fn handle_command(session: &Session, line: &str, ai_opponent: bool) -> bool {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        [] => {}
        ["quit"] | ["exit"] => return false,
        ["help"] => print_help(),
        ["show"] => println!("{}", render(&session.snapshot())),
        ["play", x, y] => match (x.parse(), y.parse()) {
            (Ok(x), Ok(y)) => {
                report(session.play_local(x, y));
                if ai_opponent {
                    ai_reply(session);
                }
            }
            _ => println!("Usage: play <x> <y>"),
        },
        ["ai"] => report(session.play_ai()),
        ["resign"] => report(session.apply_action(GameAction::Resign)),
        ["draw"] => report(session.apply_action(GameAction::OfferDraw)),
        ["accept"] => report(session.apply_action(GameAction::AcceptDraw)),
        ["reject"] => report(session.apply_action(GameAction::RejectDraw)),
        ["restart"] => {
            let current = session.snapshot();
            report(session.apply_action(GameAction::Restart {
                size: current.size,
                variant: current.variant,
            }));
        }
        ["restart", size, variant] => match (size.parse(), parse_variant(variant)) {
            (Ok(size), Some(variant)) => {
                report(session.apply_action(GameAction::Restart { size, variant }));
            }
            _ => println!("Usage: restart <size> <go|gomoku>"),
        },
        _ => println!("Unknown command, try 'help'"),
    }
    true
}

/// Answers a local move with an AI move for the other side.
fn ai_reply(session: &Session) {
    let update = session.snapshot();
    if update.winner.is_none() && !update.is_draw {
        report(session.play_ai());
    }
}

fn parse_variant(s: &str) -> Option<Variant> {
    match s {
        "go" => Some(Variant::Go),
        "gomoku" => Some(Variant::Gomoku),
        _ => None,
    }
}

fn report<E: std::fmt::Display>(result: Result<GameUpdate, E>) {
    match result {
        Ok(update) => println!("{}", render(&update)),
        Err(e) => println!("{e}"),
    }
}

/// Renders a snapshot as a text grid plus a status line.
fn render(update: &GameUpdate) -> String {
    let mut out = String::new();
    for (y, row) in update.board.iter().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            let symbol = match cell {
                Cell::Empty => '.',
                Cell::Stone(Color::Black) => 'X',
                Cell::Stone(Color::White) => 'O',
            };
            if update.last_move == Some((x, y)) {
                out.push('[');
                out.push(symbol);
                out.push(']');
            } else {
                out.push(' ');
                out.push(symbol);
                out.push(' ');
            }
        }
        out.push('\n');
    }
    let status = match (update.winner, update.is_draw) {
        (Some(color), _) => format!("{color:?} wins"),
        (None, true) => "Draw".to_string(),
        (None, false) if update.pending_draw_offer => {
            format!("{:?} to move (draw offer pending)", update.current_turn)
        }
        (None, false) => format!("{:?} to move", update.current_turn),
    };
    out.push_str(&status);
    out
}

fn print_help() {
    println!(
        "Commands: play <x> <y> | ai | resign | draw | accept | reject | \
         restart [size go|gomoku] | show | quit"
    );
}
