use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IdeomapError, Result};
use crate::geometry::ClassificationMode;

const CONFIG_FILE: &str = "config.toml";
const BASE_DIR_NAME: &str = ".ideomap";

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# ideomap configuration file
# Location: ~/.ideomap/config.toml

[definitions]
# Category definition file (JSON keyed by category name).
# Relative paths are resolved against this directory.
# Default: the builtin definition set
# Example: path = "ideology_categories.json"

[classify]
# How a point is resolved when category boxes overlap
#   "first-match": first declared category containing the point
#   "nearest":     closest center among containing categories (or all)
mode = "first-match"
"#;

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub definitions: DefinitionsConfig,

    #[serde(default)]
    pub classify: ClassifyConfig,
}

/// Where category definitions come from
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DefinitionsConfig {
    /// Definition file; builtin set when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Classification settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ClassifyConfig {
    #[serde(default)]
    pub mode: ClassificationMode,
}

impl Config {
    /// `~/.ideomap`
    pub fn default_base_dir() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|h| h.join(BASE_DIR_NAME))
            .ok_or(IdeomapError::HomeNotFound)
    }

    /// Load config from base directory
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content).map_err(|e| IdeomapError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Save config to base directory
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE)
    }

    /// Initialize config with default template (rich comments)
    pub fn init(base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Definition file to load, with relative paths resolved against `base_dir`
    pub fn definitions_path(&self, base_dir: &Path) -> Option<PathBuf> {
        self.definitions.path.as_ref().map(|p| {
            if p.is_relative() {
                base_dir.join(p)
            } else {
                p.clone()
            }
        })
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "definitions.path" => Some(
                self.definitions
                    .path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
            "classify.mode" => Some(self.classify.mode.to_string()),
            _ => None,
        }
    }

    /// Set a config value by dot-notation key
    ///
    /// An empty `definitions.path` restores the builtin set.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "definitions.path" => {
                let value = value.trim();
                self.definitions.path = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
                Ok(())
            }
            "classify.mode" => {
                self.classify.mode = value.parse()?;
                Ok(())
            }
            _ => Err(IdeomapError::ConfigKeyNotFound {
                key: key.to_string(),
            }),
        }
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        ["definitions.path", "classify.mode"]
            .iter()
            .filter_map(|key| self.get(key).map(|value| (key.to_string(), value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_parses() {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_get_set() {
        let mut config = Config::default();

        config.set("classify.mode", "nearest").unwrap();
        assert_eq!(config.classify.mode, ClassificationMode::Nearest);
        assert_eq!(config.get("classify.mode").unwrap(), "nearest");

        config.set("definitions.path", "defs.json").unwrap();
        assert_eq!(config.get("definitions.path").unwrap(), "defs.json");

        config.set("definitions.path", "").unwrap();
        assert!(config.definitions.path.is_none());
    }

    #[test]
    fn test_config_set_rejects_bad_input() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("classify.mode", "random"),
            Err(IdeomapError::InvalidMode { .. })
        ));
        assert!(matches!(
            config.set("unknown.key", "x"),
            Err(IdeomapError::ConfigKeyNotFound { .. })
        ));
    }

    #[test]
    fn test_save_load_and_init() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());

        let path = Config::init(dir.path()).unwrap();
        assert!(path.exists());
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());

        let mut config = Config::default();
        config.set("classify.mode", "nearest").unwrap();
        config.set("definitions.path", "custom.json").unwrap();
        config.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(
            loaded.definitions_path(dir.path()).unwrap(),
            dir.path().join("custom.json")
        );
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(Config::path(dir.path()), "[classify]\nmode = 3\n").unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(IdeomapError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_list() {
        let list = Config::default().list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1], ("classify.mode".to_string(), "first-match".to_string()));
    }
}
