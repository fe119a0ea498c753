use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::domain::{BranchCategory, StrategyOverride, StrategyTable};
use crate::error::{AutoTagError, Result};

/// File name searched in the current directory
pub const CONFIG_FILE_NAME: &str = "autotag.toml";

/// Represents the complete configuration for autotag.
///
/// Every section is optional; an empty file yields the built-in rules.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub tagging: TaggingConfig,

    #[serde(default)]
    pub branches: BranchRulesConfig,

    /// Per-category overrides keyed by category name (e.g. `alpha`)
    #[serde(default)]
    pub strategies: BTreeMap<String, StrategyOverride>,
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Settings for creating and pushing tags
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TaggingConfig {
    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        TaggingConfig {
            remote: default_remote(),
        }
    }
}

/// Extra branch naming rules merged into the built-in ones
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct BranchRulesConfig {
    #[serde(default)]
    pub exact: BTreeMap<String, BranchCategory>,

    #[serde(default)]
    pub prefixes: BTreeMap<String, BranchCategory>,
}

impl Config {
    /// Build the strategy table: built-in rules plus the configured ones.
    ///
    /// # Returns
    /// * `Ok(StrategyTable)` - Merged table
    /// * `Err(Config)` - If a strategy key is not a category, or a name is empty
    pub fn strategy_table(&self) -> Result<StrategyTable> {
        let mut table = StrategyTable::builtin();

        for (name, category) in &self.branches.exact {
            if name.is_empty() {
                return Err(AutoTagError::config("empty exact branch name"));
            }
            table = table.with_exact(name.clone(), *category);
        }

        for (prefix, category) in &self.branches.prefixes {
            if prefix.is_empty() {
                return Err(AutoTagError::config(
                    "empty branch prefix would match every branch",
                ));
            }
            table = table.with_prefix(prefix.clone(), *category);
        }

        // Table keys arrive as plain strings
        for (category, over) in &self.strategies {
            table = table.with_override(category.parse::<BranchCategory>()?, over.clone());
        }

        Ok(table)
    }
}

/// Parse configuration from TOML text
pub fn parse_config(text: &str) -> Result<Config> {
    toml::from_str(text).map_err(|e| AutoTagError::config(e.to_string()))
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `autotag.toml` in current directory
/// 3. `~/.config/.autotag.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let local = Path::new(".").join(CONFIG_FILE_NAME);

    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)
            .map_err(|e| AutoTagError::config(format!("cannot read {}: {}", path, e)))?
    } else if local.exists() {
        fs::read_to_string(&local)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config = parse_config(&config_str)?;
    // Fail at load time rather than halfway through a run
    config.strategy_table()?;
    Ok(config)
}
