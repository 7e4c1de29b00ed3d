//! Stat definitions.
//!
//! Stats come from `[[stats]]` tables in the config file, or from a separate
//! stats file given with `--stats` that replaces them. Each definition becomes
//! a [`JsonStat`] reading one value out of a JSON record.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use stat_filter::stat::{JsonStat, StatRef, StatSet};

use super::config::Config;
use super::{CommandContext, CommandError, Result};

/// Group used for stats that do not name one.
pub const DEFAULT_GROUP: &str = "Stats";

/// A single stat definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatConfig {
    /// Identifier used in compact filter JSON.
    pub id: String,

    /// Field name in the remote API. Defaults to `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_field: Option<String>,

    /// JSON pointer into a record. Defaults to `/<id>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Display group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl StatConfig {
    /// Returns the remote field name.
    pub fn api_field(&self) -> &str {
        self.api_field.as_deref().unwrap_or(&self.id)
    }

    /// Returns the JSON pointer this stat reads.
    pub fn pointer(&self) -> String {
        match &self.path {
            Some(path) if path.starts_with('/') => path.clone(),
            Some(path) => format!("/{path}"),
            None => format!("/{}", self.id),
        }
    }

    /// Returns the display group.
    pub fn group(&self) -> &str {
        self.group.as_deref().unwrap_or(DEFAULT_GROUP)
    }
}

/// Structure of a `--stats` file.
#[derive(Debug, Default, Deserialize)]
struct StatsFile {
    #[serde(default)]
    stats: Vec<StatConfig>,
}

/// Builds a stat set from definitions, grouped in first-seen group order.
///
/// # Errors
///
/// Returns a config error for an empty or duplicate identifier.
pub fn build_stat_set(definitions: &[StatConfig]) -> Result<StatSet<Value>> {
    let mut seen = HashSet::new();
    let mut set = StatSet::new();

    for def in definitions {
        if def.id.trim().is_empty() {
            return Err(CommandError::Config("Stat id must not be empty".to_string()));
        }
        if !seen.insert(def.id.as_str()) {
            return Err(CommandError::Config(format!("Duplicate stat id '{}'", def.id)));
        }

        let stat: StatRef<Value> = Arc::new(JsonStat::new(
            def.id.as_str(),
            def.api_field(),
            def.pointer(),
        ));
        set.insert(def.group(), stat);
    }

    Ok(set)
}

/// Reads stat definitions from a stats file.
pub fn load_stats_file(path: &Path) -> Result<Vec<StatConfig>> {
    let content = fs::read_to_string(path).map_err(|e| {
        CommandError::Config(format!("Failed to read stats file {}: {}", path.display(), e))
    })?;

    let file: StatsFile = toml::from_str(&content).map_err(|e| {
        CommandError::Config(format!("Failed to parse stats file {}: {}", path.display(), e))
    })?;

    Ok(file.stats)
}

/// Resolves the stat set for a command: the `--stats` file if given,
/// otherwise the stats in the config file.
pub fn resolve_stats(ctx: &CommandContext, config: &Config) -> Result<StatSet<Value>> {
    let set = match &ctx.stats_file {
        Some(path) => {
            if ctx.verbose {
                eprintln!("Loading stats from {}", path.display());
            }
            build_stat_set(&load_stats_file(path)?)?
        }
        None => build_stat_set(&config.stats)?,
    };

    if ctx.verbose {
        eprintln!("Loaded {} stats in {} groups", set.len(), set.groups().len());
    }

    Ok(set)
}
