//! Command implementations for the sf CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod completions;
pub mod config;
pub mod eval;
pub mod input;
pub mod show;
pub mod stats;
pub mod translate;

use std::env;
use std::path::PathBuf;

use crate::cli::Cli;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Filter decoding or translation error.
    #[error("filter error: {0}")]
    Filter(#[from] stat_filter::FilterError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid command input.
    #[error("invalid input: {0}")]
    Input(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
    /// Stat definitions file given on the command line.
    pub stats_file: Option<PathBuf>,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    ///
    /// Colors are also disabled when `NO_COLOR` is set.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && env::var_os("NO_COLOR").is_none(),
            quiet: cli.quiet,
            verbose: cli.verbose,
            stats_file: cli.stats.clone(),
        }
    }

    /// Applies settings from the config file that the command line did not override.
    pub fn apply_config(&mut self, config: &config::Config) {
        if config.output.color == Some(false) {
            self.use_colors = false;
        }
    }
}
