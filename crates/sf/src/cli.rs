//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the sf CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// sf - Evaluate, translate and inspect stat filters
#[derive(Parser, Debug)]
#[command(name = "sf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Force JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Stat definitions file (overrides the stats in the config file)
    #[arg(long, global = true, env = "SF_STATS", value_name = "FILE")]
    pub stats: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a filter against JSON records
    #[command(alias = "e")]
    Eval {
        /// Filter as compact JSON, @file, or - for stdin
        #[arg(short, long)]
        filter: String,

        /// Records file (JSON array or one object per line), or - for stdin
        #[arg(short, long, default_value = "-")]
        records: String,

        /// Print only the number of matching records
        #[arg(short, long)]
        count: bool,

        /// Fail on stat identifiers that are not defined
        #[arg(long)]
        strict: bool,
    },

    /// Translate a filter into the remote API's filter shape
    #[command(alias = "t")]
    Translate {
        /// Filter as compact JSON, @file, or - for stdin
        #[arg(short, long)]
        filter: String,

        /// Fail on unknown stats and unconfigured comparisons
        #[arg(long)]
        strict: bool,

        /// Send ≤ as GT, matching earlier clients
        #[arg(long)]
        legacy_lte: bool,
    },

    /// Show a filter in readable form
    #[command(alias = "s")]
    Show {
        /// Filter as compact JSON, @file, or - for stdin
        #[arg(short, long)]
        filter: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Show config file path
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}
