//! Eval command implementation.
//!
//! Evaluates a filter against JSON records and prints the ones that match.

use serde_json::Value;
use stat_filter::filter::{FilterEvaluator, FilterIdAllocator};

use super::config::Config;
use super::input::{decode_filter, parse_records, read_filter_source, read_records_source, STDIN};
use super::stats::resolve_stats;
use super::{CommandContext, CommandError, Result};
use crate::output::{
    format_count, format_count_json, format_records_json, format_records_table, MatchedRecord,
};

/// Options for the eval command.
#[derive(Debug)]
pub struct EvalOptions {
    /// Filter source (inline JSON, @file, or -).
    pub filter: String,
    /// Records source (file or -).
    pub records: String,
    /// Print only the number of matches.
    pub count: bool,
    /// Reject unknown stat identifiers.
    pub strict: bool,
}

/// Executes the eval command.
///
/// # Errors
///
/// Returns an error if the filter or records cannot be read or decoded.
pub fn execute(ctx: &CommandContext, opts: &EvalOptions, config: &Config) -> Result<()> {
    if opts.filter == STDIN && opts.records == STDIN {
        return Err(CommandError::Input(
            "filter and records cannot both be read from stdin".to_string(),
        ));
    }

    let stats = resolve_stats(ctx, config)?;
    let ids = FilterIdAllocator::new();
    let filter = decode_filter(
        ctx,
        &read_filter_source(&opts.filter)?,
        &stats,
        &ids,
        opts.strict,
    )?;

    let records = parse_records(&read_records_source(&opts.records)?)?;
    if ctx.verbose {
        eprintln!("Evaluating {} against {} records", filter, records.len());
    }

    let matches = matching_records(&FilterEvaluator::new(&filter), &records);

    if opts.count {
        if ctx.json_output {
            println!("{}", format_count_json(matches.len(), records.len())?);
        } else if !ctx.quiet {
            print!("{}", format_count(matches.len(), records.len()));
        }
        return Ok(());
    }

    if ctx.json_output {
        println!("{}", format_records_json(&matches)?);
    } else if !ctx.quiet {
        let columns = filter.referenced_stats();
        print!("{}", format_records_table(&matches, &columns, ctx.use_colors));
    }

    Ok(())
}

/// Returns the records the evaluator accepts, with their input positions.
fn matching_records<'a>(
    evaluator: &FilterEvaluator<'_, Value>,
    records: &'a [Value],
) -> Vec<MatchedRecord<'a>> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| evaluator.matches(record))
        .map(|(index, record)| MatchedRecord { index, record })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stat_filter::filter::{CompareOp, Filter, Operand};
    use stat_filter::stat::{JsonStat, StatRef};
    use std::sync::Arc;

    #[test]
    fn test_matching_records_keeps_positions() {
        let ids = FilterIdAllocator::new();
        let auto: StatRef<Value> = Arc::new(JsonStat::new("auto", "AutoPoints", "/auto"));
        let filter = Filter::compare(&ids, Operand::Stat(auto), CompareOp::Gte, Operand::Number(10.0));
        let records = vec![json!({"auto": 12}), json!({"auto": 3}), json!({"auto": 10})];

        let evaluator = FilterEvaluator::new(&filter);
        let matches = matching_records(&evaluator, &records);
        let positions: Vec<usize> = matches.iter().map(|m| m.index).collect();
        assert_eq!(positions, vec![0, 2]);
    }

    #[test]
    fn test_both_sources_on_stdin_rejected() {
        let ctx = CommandContext {
            json_output: false,
            use_colors: false,
            quiet: true,
            verbose: false,
            stats_file: None,
        };
        let opts = EvalOptions {
            filter: STDIN.to_string(),
            records: STDIN.to_string(),
            count: false,
            strict: false,
        };

        let err = execute(&ctx, &opts, &Config::default()).unwrap_err();
        assert!(matches!(err, CommandError::Input(_)));
    }
}
