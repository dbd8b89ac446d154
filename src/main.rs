//! Routine Match - Unified CLI
//!
//! Drag-and-drop routine ordering game with a terminal frontend.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use routine_match::{GameConfig, TaskRegistry};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Play { config } => run_play(config).await,
        Command::Tasks { config, json } => run_tasks(config, json),
    }
}

/// Run the terminal game.
async fn run_play(config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config)?;
    routine_match::tui::run_tui(config).await
}

/// Print the task table.
fn run_tasks(config: Option<PathBuf>, json: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = load_config(config)?;
    let registry: TaskRegistry = config.registry()?;

    if json {
        println!("{}", serde_json::to_string_pretty(registry.tasks())?);
    } else {
        let boundary = *config.stage_boundary();
        for (ix, task) in registry.tasks().iter().enumerate() {
            let stage = if ix < boundary { 1 } else { 2 };
            println!("stage {}  {:<24} {}", stage, task.label, task.asset);
        }
    }

    Ok(())
}

/// Loads the config file, falling back to the built-in daily routine.
fn load_config(path: Option<PathBuf>) -> Result<GameConfig> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "Loading game config");
            Ok(GameConfig::from_file(path)?)
        }
        None => Ok(GameConfig::default()),
    }
}
