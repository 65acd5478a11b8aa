//! CLI command definitions for the `firstgame` binary.
//!
//! Uses clap derive macros for argument parsing. Read-only inspection
//! commands work directly against the local database; `serve` starts the
//! REST API.

pub mod character;
pub mod status;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Character, equipment and progression backend for firstgame.
#[derive(Parser)]
#[command(name = "firstgame", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to `server.port` from config.toml).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to `server.host` from config.toml).
        #[arg(long)]
        host: Option<String>,
    },

    /// List characters.
    #[command(alias = "ls")]
    List {
        /// Only characters at this level.
        #[arg(long)]
        level: Option<i64>,

        /// Maximum number of characters to show.
        #[arg(long)]
        limit: Option<i64>,

        /// Number of characters to skip.
        #[arg(long)]
        offset: Option<i64>,
    },

    /// Show a character with its loadout.
    Show {
        /// Character id or email.
        character: String,
    },

    /// Character and equipment totals.
    Status,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
