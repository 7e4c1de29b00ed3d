//! Show command implementation.
//!
//! Displays a filter as an indented tree with its node count, whether every
//! comparison is configured, and the stats it references.

use stat_filter::filter::FilterIdAllocator;

use super::config::Config;
use super::input::{decode_filter, read_filter_source};
use super::stats::resolve_stats;
use super::{CommandContext, Result};
use crate::output::{format_filter_json, format_filter_table};

/// Options for the show command.
#[derive(Debug)]
pub struct ShowOptions {
    /// Filter source (inline JSON, @file, or -).
    pub filter: String,
}

/// Executes the show command.
///
/// # Errors
///
/// Returns an error if the filter cannot be read or decoded.
pub fn execute(ctx: &CommandContext, opts: &ShowOptions, config: &Config) -> Result<()> {
    let stats = resolve_stats(ctx, config)?;
    let ids = FilterIdAllocator::new();
    let filter = decode_filter(ctx, &read_filter_source(&opts.filter)?, &stats, &ids, false)?;

    if ctx.json_output {
        println!("{}", format_filter_json(&filter)?);
    } else if !ctx.quiet {
        print!("{}", format_filter_table(&filter, ctx.use_colors));
    }

    Ok(())
}
