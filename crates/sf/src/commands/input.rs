//! Reading filters and records from command-line sources.
//!
//! A source is inline text, `@path` for a file, or `-` for stdin.

use std::fs;
use std::io::{self, Read};

use serde_json::Value;
use stat_filter::filter::{compact, Filter, FilterError, FilterIdAllocator};
use stat_filter::stat::StatSet;

use super::{CommandContext, CommandError, Result};

/// Source argument meaning stdin.
pub const STDIN: &str = "-";

/// Reads a filter argument: inline JSON, `@file`, or `-`.
pub fn read_filter_source(source: &str) -> Result<String> {
    if source == STDIN {
        return read_stdin();
    }

    match source.strip_prefix('@') {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            CommandError::Input(format!("Failed to read filter file {}: {}", path, e))
        }),
        None => Ok(source.to_string()),
    }
}

/// Reads a records argument: a file path, or `-`.
pub fn read_records_source(source: &str) -> Result<String> {
    if source == STDIN {
        return read_stdin();
    }

    fs::read_to_string(source)
        .map_err(|e| CommandError::Input(format!("Failed to read records file {}: {}", source, e)))
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    io::stdin().read_to_string(&mut text)?;
    Ok(text)
}

/// Parses records: a JSON array, a single JSON value, or one JSON value per line.
pub fn parse_records(text: &str) -> Result<Vec<Value>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(records)) => Ok(records),
        Ok(record) => Ok(vec![record]),
        Err(_) => parse_json_lines(text),
    }
}

fn parse_json_lines(text: &str) -> Result<Vec<Value>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line)
                .map_err(|e| CommandError::Input(format!("records line {}: {}", index + 1, e)))
        })
        .collect()
}

/// Decodes a filter from compact JSON text.
///
/// Comparisons naming unknown stats are dropped with a warning, or rejected
/// when `strict` is set. An object that decodes to nothing means "no filter"
/// and matches every record; under `strict` it is an error. A root that is
/// not an object is always an error.
pub fn decode_filter(
    ctx: &CommandContext,
    text: &str,
    stats: &StatSet<Value>,
    ids: &FilterIdAllocator,
    strict: bool,
) -> Result<Filter<Value>> {
    let json: Value = serde_json::from_str(text).map_err(FilterError::from)?;

    if strict {
        compact::check_identifiers(&json, stats)?;
    } else if !ctx.quiet {
        for identifier in compact::unresolved_identifiers(&json, stats) {
            let err = FilterError::unknown_stat(identifier.as_str(), stats.suggest(&identifier));
            eprintln!("Warning: {err} (comparison ignored)");
        }
    }

    let filter = match Filter::from_json(&json, stats, ids) {
        Some(filter) => filter,
        None if strict || !json.is_object() => return Err(FilterError::UndecodableRoot.into()),
        None => {
            if !ctx.quiet {
                eprintln!("Warning: {} (matching every record)", FilterError::UndecodableRoot);
            }
            Filter::empty(ids)
        }
    };

    if ctx.verbose {
        eprintln!(
            "Decoded filter with {} nodes ({})",
            filter.node_count(),
            if filter.is_configured() {
                "configured"
            } else {
                "has unset operands"
            }
        );
    }

    Ok(filter)
}
