//! Command-line interface for routine_match.

use clap::{Parser, Subcommand};

/// Routine Match - drag-and-drop routine ordering game
#[derive(Parser, Debug)]
#[command(name = "routine_match")]
#[command(about = "Drag-and-drop routine ordering game", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play the game in the terminal
    Play {
        /// Path to a TOML config with tasks, boundary, and timings
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,
    },

    /// Print the task table
    Tasks {
        /// Path to a TOML config with tasks, boundary, and timings
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}
