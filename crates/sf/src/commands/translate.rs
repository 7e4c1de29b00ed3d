//! Translate command implementation.
//!
//! Prints a filter in the remote query API's JSON shape.

use stat_filter::filter::{FilterIdAllocator, LteMapping, RemoteTranslator};

use super::config::Config;
use super::input::{decode_filter, read_filter_source};
use super::stats::resolve_stats;
use super::{CommandContext, Result};
use crate::output::format_api_filter_json;

/// Options for the translate command.
#[derive(Debug)]
pub struct TranslateOptions {
    /// Filter source (inline JSON, @file, or -).
    pub filter: String,
    /// Reject unknown stats and unconfigured comparisons.
    pub strict: bool,
    /// Send `≤` as `GT` regardless of config.
    pub legacy_lte: bool,
}

/// Chooses the `≤` mapping: the command-line flag wins over config.
fn lte_mapping(opts: &TranslateOptions, config: &Config) -> LteMapping {
    if opts.legacy_lte {
        LteMapping::LegacyGt
    } else {
        config.translate.lte_mapping()
    }
}

/// Executes the translate command.
///
/// # Errors
///
/// Returns an error if the filter cannot be decoded, or in strict mode if a
/// comparison is not fully configured.
pub fn execute(ctx: &CommandContext, opts: &TranslateOptions, config: &Config) -> Result<()> {
    let stats = resolve_stats(ctx, config)?;
    let ids = FilterIdAllocator::new();
    let filter = decode_filter(
        ctx,
        &read_filter_source(&opts.filter)?,
        &stats,
        &ids,
        opts.strict,
    )?;

    let translator = RemoteTranslator::new().with_lte_mapping(lte_mapping(opts, config));
    if ctx.verbose && translator.lte_mapping() == LteMapping::LegacyGt {
        eprintln!("Translating ≤ as GT");
    }

    let api_filter = if opts.strict {
        translator.translate_strict(&filter)?
    } else {
        if !filter.is_configured() && !ctx.quiet {
            eprintln!("Warning: unset comparisons are sent as 0 = 0");
        }
        translator.translate(&filter)
    };

    println!("{}", format_api_filter_json(&api_filter)?);

    Ok(())
}
