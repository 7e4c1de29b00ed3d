//! Record output formatting for the eval command.

use serde::Serialize;
use serde_json::Value;
use stat_filter::StatRef;

use super::helpers::{format_header, format_stat_value, truncate_str};

/// Narrowest stat column.
const MIN_COLUMN_WIDTH: usize = 8;

/// Widest stat column.
const MAX_COLUMN_WIDTH: usize = 16;

/// Width of the record column when no stats are referenced.
const RECORD_COLUMN_WIDTH: usize = 72;

/// A matching record together with its position in the input.
pub struct MatchedRecord<'a> {
    pub index: usize,
    pub record: &'a Value,
}

/// JSON output structure for the eval count.
#[derive(Serialize)]
pub struct CountOutput {
    pub matched: usize,
    pub total: usize,
}

/// Formats matching records as a JSON array.
pub fn format_records_json(matches: &[MatchedRecord]) -> Result<String, serde_json::Error> {
    let records: Vec<&Value> = matches.iter().map(|m| m.record).collect();
    serde_json::to_string_pretty(&records)
}

/// Formats the match count as JSON.
pub fn format_count_json(matched: usize, total: usize) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&CountOutput { matched, total })
}

/// Formats the match count as text.
pub fn format_count(matched: usize, total: usize) -> String {
    format!("{matched} of {total} records match\n")
}

/// Formats matching records as a table with one column per stat.
///
/// Without stats the compact JSON of each record is shown instead.
pub fn format_records_table(
    matches: &[MatchedRecord],
    columns: &[StatRef<Value>],
    use_colors: bool,
) -> String {
    if matches.is_empty() {
        return "No matching records.\n".to_string();
    }

    let widths: Vec<usize> = columns
        .iter()
        .map(|stat| {
            stat.identifier_name()
                .chars()
                .count()
                .clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
        })
        .collect();

    let mut header = format!("{:<6}", "#");
    if columns.is_empty() {
        header.push_str("Record");
    }
    for (stat, width) in columns.iter().zip(&widths) {
        header.push_str(&format!(
            " {:<width$}",
            truncate_str(stat.identifier_name(), *width),
            width = *width
        ));
    }

    let mut output = format_header(header.trim_end(), use_colors);

    for m in matches {
        let mut line = format!("{:<6}", m.index);
        if columns.is_empty() {
            line.push_str(&truncate_str(&m.record.to_string(), RECORD_COLUMN_WIDTH));
        }
        for (stat, width) in columns.iter().zip(&widths) {
            line.push(' ');
            line.push_str(&format_stat_value(&stat.read(m.record), *width, use_colors));
        }
        output.push_str(line.trim_end());
        output.push('\n');
    }

    output
}
