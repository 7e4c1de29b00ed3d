//! Filter output formatting for the show and translate commands.

use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;
use stat_filter::filter::{ApiFilter, Filter};

use super::helpers::format_flag;

/// JSON output structure for the show command.
#[derive(Serialize)]
pub struct FilterSummaryOutput {
    pub display: String,
    pub nodes: usize,
    pub configured: bool,
    pub stats: Vec<String>,
    pub compact: Value,
}

impl FilterSummaryOutput {
    fn new(filter: &Filter<Value>) -> Self {
        Self {
            display: filter.to_string(),
            nodes: filter.node_count(),
            configured: filter.is_configured(),
            stats: referenced_identifiers(filter),
            compact: filter.to_json(),
        }
    }
}

fn referenced_identifiers(filter: &Filter<Value>) -> Vec<String> {
    filter
        .referenced_stats()
        .iter()
        .map(|s| s.identifier_name().to_string())
        .collect()
}

/// Formats a filter summary as JSON.
pub fn format_filter_json(filter: &Filter<Value>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&FilterSummaryOutput::new(filter))
}

/// Formats a filter summary as text: an indented tree followed by details.
pub fn format_filter_table(filter: &Filter<Value>, use_colors: bool) -> String {
    let mut output = String::new();
    write_tree(&mut output, filter, 0, use_colors);

    let stats = referenced_identifiers(filter);
    output.push('\n');
    output.push_str(&format!("Nodes:      {}\n", filter.node_count()));
    output.push_str(&format!(
        "Configured: {}\n",
        format_flag(filter.is_configured(), use_colors)
    ));
    output.push_str(&format!(
        "Stats:      {}\n",
        if stats.is_empty() {
            "(none)".to_string()
        } else {
            stats.join(", ")
        }
    ));

    output
}

fn write_tree(output: &mut String, filter: &Filter<Value>, depth: usize, use_colors: bool) {
    let indent = "  ".repeat(depth);

    match filter {
        Filter::All { conditions, .. } | Filter::Any { conditions, .. } => {
            let keyword = if matches!(filter, Filter::All { .. }) {
                "ALL"
            } else {
                "ANY"
            };
            let keyword = if use_colors {
                keyword.cyan().bold().to_string()
            } else {
                keyword.to_string()
            };

            if conditions.is_empty() {
                output.push_str(&format!("{indent}{keyword} (matches everything)\n"));
            } else {
                output.push_str(&format!("{indent}{keyword}\n"));
                for condition in conditions {
                    write_tree(output, condition, depth + 1, use_colors);
                }
            }
        }
        Filter::Compare { .. } => {
            let line = filter.to_string();
            if use_colors && !filter.is_configured() {
                output.push_str(&format!("{indent}{}\n", line.yellow()));
            } else {
                output.push_str(&format!("{indent}{line}\n"));
            }
        }
    }
}

/// Formats a remote filter as JSON.
pub fn format_api_filter_json(filter: &ApiFilter) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(filter)
}
