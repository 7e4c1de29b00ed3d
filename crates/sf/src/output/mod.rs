//! Output formatting utilities for the sf CLI.
//!
//! This module provides functions for formatting data as tables or JSON.
//! It is organized into submodules by command:
//!
//! - [`records`] - Matching records for eval (table, JSON, count)
//! - [`filters`] - Filter summaries for show and remote filters for translate
//! - [`helpers`] - Common formatting utilities (truncation, stat values, flags)

mod filters;
pub mod helpers;
mod records;

// Records
pub use records::{
    format_count, format_count_json, format_records_json, format_records_table, MatchedRecord,
};

// Filters
pub use filters::{format_api_filter_json, format_filter_json, format_filter_table};
