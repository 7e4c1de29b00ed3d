//! Command dispatch module for routing CLI commands to their handlers.
//!
//! Commands are split by whether they need the config file loaded. Config
//! and completions commands must work even when the config file is broken.

use crate::cli::{Cli, Commands, ConfigCommands, Shell};
use crate::commands::config::Config;
use crate::commands::{self, CommandContext, CommandError, Result};

/// Trait for commands that run without loading the config file.
pub trait StandaloneCommand {
    /// Execute the command.
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Trait for commands that work on filters and need the loaded config.
pub trait FilterCommand {
    /// Execute the command with the loaded config.
    fn execute(&self, ctx: &CommandContext, config: &Config) -> Result<()>;
}

/// Commands that don't need the config file.
pub enum StandaloneDispatch<'a> {
    Config(&'a Option<ConfigCommands>),
    Completions(&'a Shell),
    Help,
}

impl<'a> StandaloneDispatch<'a> {
    /// Try to create a standalone dispatch from the CLI command.
    /// Returns None if the command needs the config file.
    pub fn try_from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Config { command }) => Some(Self::Config(command)),
            Some(Commands::Completions { shell }) => Some(Self::Completions(shell)),
            None => Some(Self::Help),
            _ => None,
        }
    }
}

impl StandaloneCommand for StandaloneDispatch<'_> {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::Help => {
                if !ctx.quiet {
                    println!("sf - stat filter CLI");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
        Some(ConfigCommands::Init { force }) => commands::config::execute_init(ctx, *force),
    }
}

/// Commands that work on a filter.
pub enum FilterDispatch<'a> {
    Eval {
        filter: &'a str,
        records: &'a str,
        count: bool,
        strict: bool,
    },
    Translate {
        filter: &'a str,
        strict: bool,
        legacy_lte: bool,
    },
    Show {
        filter: &'a str,
    },
}

impl<'a> FilterDispatch<'a> {
    /// Create a filter dispatch from the CLI command.
    /// Returns None for commands handled by [`StandaloneDispatch`].
    pub fn from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Eval {
                filter,
                records,
                count,
                strict,
            }) => Some(Self::Eval {
                filter,
                records,
                count: *count,
                strict: *strict,
            }),
            Some(Commands::Translate {
                filter,
                strict,
                legacy_lte,
            }) => Some(Self::Translate {
                filter,
                strict: *strict,
                legacy_lte: *legacy_lte,
            }),
            Some(Commands::Show { filter }) => Some(Self::Show { filter }),
            _ => None,
        }
    }
}

impl FilterCommand for FilterDispatch<'_> {
    fn execute(&self, ctx: &CommandContext, config: &Config) -> Result<()> {
        match self {
            Self::Eval {
                filter,
                records,
                count,
                strict,
            } => {
                let opts = commands::eval::EvalOptions {
                    filter: filter.to_string(),
                    records: records.to_string(),
                    count: *count,
                    strict: *strict,
                };
                commands::eval::execute(ctx, &opts, config)
            }
            Self::Translate {
                filter,
                strict,
                legacy_lte,
            } => {
                let opts = commands::translate::TranslateOptions {
                    filter: filter.to_string(),
                    strict: *strict,
                    legacy_lte: *legacy_lte,
                };
                commands::translate::execute(ctx, &opts, config)
            }
            Self::Show { filter } => {
                let opts = commands::show::ShowOptions {
                    filter: filter.to_string(),
                };
                commands::show::execute(ctx, &opts, config)
            }
        }
    }
}
