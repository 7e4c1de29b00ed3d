use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod dispatch;
mod output;

use cli::Cli;
use commands::config::load_config;
use commands::{CommandContext, CommandError};
use dispatch::{FilterCommand, FilterDispatch, StandaloneCommand, StandaloneDispatch};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                match serde_json::to_string_pretty(&error_json) {
                    Ok(text) => eprintln!("{text}"),
                    Err(_) => eprintln!("Error: {e}"),
                }
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

fn run(cli: &Cli) -> commands::Result<()> {
    let mut ctx = CommandContext::from_cli(cli);

    // Config and completions must not depend on a readable config file
    if let Some(dispatch) = StandaloneDispatch::try_from_cli(cli) {
        return dispatch.execute(&ctx);
    }

    let config = load_config()?;
    ctx.apply_config(&config);

    match FilterDispatch::from_cli(cli) {
        Some(dispatch) => dispatch.execute(&ctx, &config),
        None => Ok(()),
    }
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Filter(_) => "FILTER_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Input(_) => "INPUT_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    ExitCode::from(exit_status(e))
}

fn exit_status(e: &CommandError) -> u8 {
    match e {
        CommandError::Filter(_) => 1,
        CommandError::Json(_) => 1,
        CommandError::Input(_) => 2,
        CommandError::Io(_) => 3,
        CommandError::Config(_) => 5,
    }
}
