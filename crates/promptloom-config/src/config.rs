use std::collections::BTreeMap;
use std::path::PathBuf;

use promptloom_core::FormatterConfig;
use serde::{Deserialize, Serialize};

/// Top-level configuration document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub version: String,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub formatter: FormatterConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            storage: StorageConfig::default(),
            search: SearchConfig::default(),
            formatter: FormatterConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Read a value by dotted key, e.g. `search.base_url`.
    pub fn get_value(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();
        match parts.as_slice() {
            ["version"] => Some(self.version.clone()),
            ["storage", "data_dir"] => Some(self.storage.data_dir.clone()),
            ["storage", "history_key"] => Some(self.storage.history_key.clone()),
            ["storage", "templates_key"] => Some(self.storage.templates_key.clone()),
            ["search", "base_url"] => Some(self.search.base_url.clone()),
            ["search", "timeout_secs"] => Some(self.search.timeout_secs.to_string()),
            ["search", "source_name"] => Some(self.search.source_name.clone()),
            ["formatter", "command_prefix"] => Some(self.formatter.command_prefix.clone()),
            ["formatter", "quality_clause"] => Some(self.formatter.quality_clause.clone()),
            ["formatter", "default_aspect_ratio"] => {
                Some(self.formatter.default_aspect_ratio.clone())
            }
            ["formatter", "default_version"] => Some(self.formatter.default_version.clone()),
            ["logging", "level"] => Some(self.logging.level.to_string()),
            ["logging", "json_format"] => Some(self.logging.json_format.to_string()),
            ["logging", "module_levels", module] => self.logging.module_levels.get(*module).cloned(),
            _ => None,
        }
    }

    /// Set a value by dotted key. Unknown keys and unparsable values are rejected.
    pub fn set_value(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        let parts: Vec<&str> = key.split('.').collect();
        match parts.as_slice() {
            ["storage", "data_dir"] => {
                self.storage.data_dir = value.to_string();
            }
            ["storage", "history_key"] => {
                self.storage.history_key = value.to_string();
            }
            ["storage", "templates_key"] => {
                self.storage.templates_key = value.to_string();
            }
            ["search", "base_url"] => {
                self.search.base_url = value.to_string();
            }
            ["search", "timeout_secs"] => {
                self.search.timeout_secs = value.parse().map_err(|_| {
                    ConfigError::Validation(format!("Invalid number: {}", value))
                })?;
            }
            ["search", "source_name"] => {
                self.search.source_name = value.to_string();
            }
            ["formatter", "command_prefix"] => {
                self.formatter.command_prefix = value.to_string();
            }
            ["formatter", "quality_clause"] => {
                self.formatter.quality_clause = value.to_string();
            }
            ["formatter", "default_aspect_ratio"] => {
                self.formatter.default_aspect_ratio = value.to_string();
            }
            ["formatter", "default_version"] => {
                self.formatter.default_version = value.to_string();
            }
            ["logging", "level"] => {
                self.logging.level = value.parse()?;
            }
            ["logging", "json_format"] => {
                self.logging.json_format = value.parse().map_err(|_| {
                    ConfigError::Validation(format!("Invalid boolean: {}", value))
                })?;
            }
            ["logging", "module_levels", module] => {
                let level: LogLevel = value.parse()?;
                self.logging
                    .module_levels
                    .insert(module.to_string(), level.to_string());
            }
            _ => return Err(ConfigError::KeyNotFound(key.to_string())),
        }
        Ok(())
    }

    /// Every readable key with its current value, in display order.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut keys: Vec<String> = [
            "version",
            "storage.data_dir",
            "storage.history_key",
            "storage.templates_key",
            "search.base_url",
            "search.timeout_secs",
            "search.source_name",
            "formatter.command_prefix",
            "formatter.quality_clause",
            "formatter.default_aspect_ratio",
            "formatter.default_version",
            "logging.level",
            "logging.json_format",
        ]
        .iter()
        .map(|k| k.to_string())
        .collect();
        keys.extend(
            self.logging
                .module_levels
                .keys()
                .map(|module| format!("logging.module_levels.{}", module)),
        );

        keys.into_iter()
            .filter_map(|key| self.get_value(&key).map(|value| (key, value)))
            .collect()
    }
}

/// Where saved prompts and templates live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory of the document files; `~/` is expanded
    pub data_dir: String,
    pub history_key: String,
    pub templates_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.promptloom/data".to_string(),
            history_key: "prompt-history".to_string(),
            templates_key: "prompt-templates".to_string(),
        }
    }
}

impl StorageConfig {
    pub fn resolved_data_dir(&self) -> Option<PathBuf> {
        crate::expand_tilde(&self.data_dir)
    }
}

/// External prompt search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Name recorded on prompts saved from search results
    pub source_name: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://lexica.art/api/v1".to_string(),
            timeout_secs: 15,
            source_name: "Lexica.art".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::Validation(format!("Invalid log level: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Emit JSON lines instead of human readable output
    pub json_format: bool,
    /// Per-module overrides, e.g. `promptloom_search = "debug"`
    pub module_levels: BTreeMap<String, String>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.storage.history_key, "prompt-history");
        assert_eq!(config.search.timeout_secs, 15);
        assert_eq!(config.formatter.default_aspect_ratio, "1:1");
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_get_and_set_value() {
        let mut config = Config::default();
        config.set_value("search.timeout_secs", "30").unwrap();
        assert_eq!(config.get_value("search.timeout_secs").as_deref(), Some("30"));

        config.set_value("logging.level", "DEBUG").unwrap();
        assert_eq!(config.get_value("logging.level").as_deref(), Some("debug"));

        config
            .set_value("logging.module_levels.promptloom_search", "trace")
            .unwrap();
        assert_eq!(
            config
                .get_value("logging.module_levels.promptloom_search")
                .as_deref(),
            Some("trace")
        );
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let mut config = Config::default();
        assert!(matches!(
            config.set_value("search.timeout_secs", "soon"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            config.set_value("logging.level", "loud"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            config.set_value("server.port", "80"),
            Err(ConfigError::KeyNotFound(_))
        ));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"version": "0.0.1", "search": {"timeout_secs": 3}}"#).unwrap();
        assert_eq!(config.search.timeout_secs, 3);
        assert_eq!(config.search.source_name, "Lexica.art");
        assert_eq!(config.formatter, FormatterConfig::default());
    }

    #[test]
    fn test_entries_cover_module_levels() {
        let mut config = Config::default();
        config
            .set_value("logging.module_levels.promptloom_store", "warn")
            .unwrap();
        let entries = config.entries();
        assert!(entries
            .iter()
            .any(|(k, v)| k == "logging.module_levels.promptloom_store" && v == "warn"));
        assert!(entries.iter().any(|(k, _)| k == "search.base_url"));
    }
}
