//! Config command implementation.
//!
//! View and initialize configuration settings.
//! Config file is located at ~/.config/sf/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use stat_filter::filter::LteMapping;

use super::stats::StatConfig;
use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "SF_CONFIG";

/// Default config file contents.
const DEFAULT_CONFIG: &str = r#"# sf - stat filter CLI configuration

# Config schema version (do not modify)
version = 1

# Output preferences
[output]
# color = true              # Enable colors (respects NO_COLOR env)

# Remote filter translation
[translate]
# legacy_lte_as_gt = false  # Send ≤ as GT, matching earlier clients

# Stat definitions. Each stat reads a value from a JSON record.
#   id        - identifier used in compact filter JSON
#   api_field - field name in the remote API (defaults to id)
#   path      - JSON pointer into the record (defaults to /<id>)
#   group     - display group (defaults to "Stats")
#
# [[stats]]
# id = "auto"
# api_field = "AutoPoints"
# path = "/scores/auto"
# group = "Scoring"
"#;

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Remote translation settings.
    #[serde(default)]
    pub translate: TranslateConfig,

    /// Stat definitions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stats: Vec<StatConfig>,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            output: OutputConfig::default(),
            translate: TranslateConfig::default(),
            stats: Vec::new(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Remote translation configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Send `≤` as `GT`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_lte_as_gt: Option<bool>,
}

impl TranslateConfig {
    /// Returns the `≤` mapping these settings select.
    pub fn lte_mapping(&self) -> LteMapping {
        if self.legacy_lte_as_gt == Some(true) {
            LteMapping::LegacyGt
        } else {
            LteMapping::Lte
        }
    }
}

/// Gets the config directory path.
/// Uses XDG-style paths: ~/.config/sf/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("sf"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("sf"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the config file path.
pub fn get_config_path() -> Result<PathBuf> {
    // Check for override env var first
    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return Ok(PathBuf::from(path));
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Loads the configuration from disk.
///
/// A missing file yields the default configuration.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    parse_config(&content)
}

/// Parses config file contents.
fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    migrate_config(config)
}

/// Migrates config to current version if needed.
fn migrate_config(mut config: Config) -> Result<Config> {
    if config.version > CONFIG_VERSION {
        return Err(CommandError::Config(format!(
            "Config version {} is newer than supported version {}",
            config.version, CONFIG_VERSION
        )));
    }

    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        if path.exists() {
            println!("[output]");
            if let Some(color) = config.output.color {
                println!("  color: {}", color);
            }

            println!("\n[translate]");
            if let Some(legacy) = config.translate.legacy_lte_as_gt {
                println!("  legacy_lte_as_gt: {}", legacy);
            }

            println!("\nStats: {}", config.stats.len());
            for stat in &config.stats {
                println!(
                    "  {:<16} {:<20} {}",
                    stat.id,
                    stat.api_field(),
                    stat.pointer()
                );
            }
        } else {
            println!("(No config file exists. Run 'sf config init' to create one.)");
        }
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Executes the config init command.
///
/// Writes the default config file. An existing file is kept unless `force` is set.
pub fn execute_init(ctx: &CommandContext, force: bool) -> Result<()> {
    let path = get_config_path()?;
    let existed = path.exists();

    if existed && !force {
        return Err(CommandError::Config(format!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }

    // Ensure directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CommandError::Config(format!("Failed to create config directory: {}", e)))?;
    }

    fs::write(&path, DEFAULT_CONFIG)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    if ctx.verbose {
        eprintln!("Wrote default config to {}", path.display());
    }

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "path": path.display().to_string(),
            "overwritten": existed,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Created config at: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.output.color.is_none());
        assert!(config.translate.legacy_lte_as_gt.is_none());
        assert!(config.stats.is_empty());
    }

    #[test]
    fn test_default_config_file_parses() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.stats.is_empty());
        assert_eq!(config.translate.lte_mapping(), LteMapping::Lte);
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
version = 1

[output]
color = false

[translate]
legacy_lte_as_gt = true

[[stats]]
id = "auto"
api_field = "AutoPoints"
path = "/scores/auto"
group = "Scoring"

[[stats]]
id = "rank"
"#;
        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.output.color, Some(false));
        assert_eq!(config.translate.lte_mapping(), LteMapping::LegacyGt);
        assert_eq!(config.stats.len(), 2);
        assert_eq!(config.stats[0].api_field(), "AutoPoints");
        assert_eq!(config.stats[1].api_field(), "rank");
        assert_eq!(config.stats[1].pointer(), "/rank");
    }

    #[test]
    fn test_config_deserialization_empty() {
        let config = parse_config("").unwrap();
        // Missing version defaults to current version
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.stats.is_empty());
    }

    #[test]
    fn test_config_rejects_newer_version() {
        let err = parse_config("version = 99").unwrap_err();
        assert!(matches!(err, CommandError::Config(_)));
    }

    #[test]
    fn test_config_rejects_invalid_toml() {
        assert!(matches!(
            parse_config("[output\ncolor = true"),
            Err(CommandError::Config(_))
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config {
            output: OutputConfig { color: Some(true) },
            translate: TranslateConfig {
                legacy_lte_as_gt: Some(false),
            },
            ..Config::default()
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("version = 1"));
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("color = true"));
        assert!(toml_str.contains("legacy_lte_as_gt = false"));
        assert!(!toml_str.contains("stats"));
    }

    #[test]
    #[serial]
    fn test_config_path_env_override() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("custom.toml");

        let previous = env::var(CONFIG_ENV_VAR).ok();
        env::set_var(CONFIG_ENV_VAR, &config_path);
        let result = get_config_path();
        match previous {
            Some(val) => env::set_var(CONFIG_ENV_VAR, val),
            None => env::remove_var(CONFIG_ENV_VAR),
        }

        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    #[serial]
    fn test_load_config_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("missing.toml");

        let previous = env::var(CONFIG_ENV_VAR).ok();
        env::set_var(CONFIG_ENV_VAR, &config_path);
        let result = load_config();
        match previous {
            Some(val) => env::set_var(CONFIG_ENV_VAR, val),
            None => env::remove_var(CONFIG_ENV_VAR),
        }

        let config = result.unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.stats.is_empty());
    }
}
