//! Command-line interface for the goban shell.

use clap::{Parser, Subcommand, ValueEnum};
use goban_engine::Variant;

/// Goban - Go and Gomoku over a direct peer link
#[derive(Parser, Debug)]
#[command(name = "goban")]
#[command(about = "Two-player Go/Gomoku engine with peer-to-peer play", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Rule set selection on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VariantArg {
    /// 19x19 by default; captures, suicide, and ko rules.
    Go,
    /// 15x15 by default; five in a row wins.
    Gomoku,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Go => Variant::Go,
            VariantArg::Gomoku => Variant::Gomoku,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play locally (hot-seat, or against the built-in AI)
    Local {
        /// Rule set to play
        #[arg(long, value_enum, default_value = "go")]
        variant: VariantArg,

        /// Board size (defaults to 19 for go, 15 for gomoku)
        #[arg(long)]
        size: Option<usize>,

        /// Let the AI play the white stones
        #[arg(long)]
        ai: bool,
    },

    /// Host a game and wait for one peer (you play Black)
    Host {
        /// Port to listen on
        #[arg(short, long, default_value = "7777")]
        port: u16,

        /// Rule set to play
        #[arg(long, value_enum, default_value = "go")]
        variant: VariantArg,

        /// Board size (defaults to 19 for go, 15 for gomoku)
        #[arg(long)]
        size: Option<usize>,
    },

    /// Connect to a hosting peer (you play White)
    Connect {
        /// Host address as host:port
        addr: String,
    },
}
