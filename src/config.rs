//! Game configuration: task table, stage boundary, and feedback timings.

use crate::game::tasks::{Task, TaskRegistry};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Number of tasks in the first stage by default.
pub const DEFAULT_STAGE_BOUNDARY: usize = 8;

/// Pause before advancing to stage two, milliseconds.
const DEFAULT_ADVANCE_DELAY_MS: u64 = 700;

/// Pause before showing the success state, milliseconds.
const DEFAULT_FINISH_DELAY_MS: u64 = 900;

/// Configuration consumed by the game core.
///
/// The task list and stage boundary are treated as immutable input; the
/// delays sequence feedback playback before a stage transition.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Ordered task table.
    #[serde(default = "crate::game::tasks::daily_routine_tasks")]
    tasks: Vec<Task>,

    /// How many tasks belong to the first stage.
    #[serde(default = "default_boundary")]
    stage_boundary: usize,

    /// Delay before the stage-one to stage-two transition.
    #[serde(default = "default_advance_delay")]
    advance_delay_ms: u64,

    /// Delay before the stage-two to success transition.
    #[serde(default = "default_finish_delay")]
    finish_delay_ms: u64,
}

fn default_boundary() -> usize {
    DEFAULT_STAGE_BOUNDARY
}

fn default_advance_delay() -> u64 {
    DEFAULT_ADVANCE_DELAY_MS
}

fn default_finish_delay() -> u64 {
    DEFAULT_FINISH_DELAY_MS
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tasks: crate::game::tasks::daily_routine_tasks(),
            stage_boundary: default_boundary(),
            advance_delay_ms: default_advance_delay(),
            finish_delay_ms: default_finish_delay(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file and validates it.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        info!(
            task_count = config.tasks.len(),
            boundary = config.stage_boundary,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Builds the validated task registry from this configuration.
    pub fn registry(&self) -> Result<TaskRegistry, ConfigError> {
        TaskRegistry::new(self.tasks.clone())
            .map_err(|e| ConfigError::new(format!("Invalid task list: {}", e)))
    }

    /// Validates the task list and stage boundary.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        let registry = self.registry()?;
        registry
            .partition(self.stage_boundary)
            .map_err(|e| ConfigError::new(format!("Invalid stage boundary: {}", e)))?;
        Ok(())
    }

    /// Delay before advancing out of a completed stage one.
    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }

    /// Delay before entering the success state.
    pub fn finish_delay(&self) -> Duration {
        Duration::from_millis(self.finish_delay_ms)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where the error was raised.
    pub line: u32,
    /// Source file where the error was raised.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(*config.stage_boundary(), 8);
        assert_eq!(config.advance_delay(), Duration::from_millis(700));
        assert_eq!(config.finish_delay(), Duration::from_millis(900));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: GameConfig = toml::from_str("stage_boundary = 4").expect("Parses");
        assert_eq!(*config.stage_boundary(), 4);
        assert_eq!(config.tasks().len(), 14);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_boundary_rejected() {
        let config: GameConfig = toml::from_str("stage_boundary = 14").expect("Parses");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_tasks_parsed() {
        let toml = r#"
            stage_boundary = 1

            [[tasks]]
            id = 1
            label = "1. Get up"
            asset = "assets/images/img1_get_up.jpg"

            [[tasks]]
            id = 2
            label = "2. Brush the teeth"
            asset = "assets/images/img2_brush_teeth.jpg"
        "#;
        let config: GameConfig = toml::from_str(toml).expect("Parses");
        assert!(config.validate().is_ok());
        assert_eq!(config.tasks().len(), 2);
    }
}
