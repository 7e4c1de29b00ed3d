//! Common helper functions for output formatting.

use owo_colors::OwoColorize;
use stat_filter::StatValue;

/// Truncates a string to a maximum number of characters.
///
/// The result never exceeds `max_len` characters, ellipsis included.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len < 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{kept}...")
    }
}

/// Formats a table header line.
pub fn format_header(header: &str, use_colors: bool) -> String {
    if use_colors {
        format!("{}\n", header.dimmed())
    } else {
        format!("{header}\n")
    }
}

/// Formats a stat value padded to `width` characters.
///
/// Missing values (`NaN`) are shown dimmed.
pub fn format_stat_value(value: &StatValue, width: usize, use_colors: bool) -> String {
    let text = format!("{:<width$}", truncate_str(&value.to_string(), width));

    let missing = matches!(value, StatValue::Number(n) if n.is_nan());
    if use_colors && missing {
        text.dimmed().to_string()
    } else {
        text
    }
}

/// Formats a yes/no flag.
pub fn format_flag(value: bool, use_colors: bool) -> String {
    let label = if value { "yes" } else { "no" };

    if !use_colors {
        label.to_string()
    } else if value {
        label.green().to_string()
    } else {
        label.yellow().to_string()
    }
}
