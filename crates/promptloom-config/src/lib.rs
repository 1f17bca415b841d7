pub mod config;
pub mod manager;

pub use config::{
    Config, ConfigError, ConfigResult, LogLevel, LoggingConfig, SearchConfig, StorageConfig,
};
pub use manager::ConfigManager;
pub use promptloom_core::FormatterConfig;

use std::path::PathBuf;

/// `~/.promptloom`
pub fn promptloom_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".promptloom"))
}

pub fn default_config_path() -> Option<PathBuf> {
    promptloom_dir().map(|dir| dir.join("config.json"))
}

/// Expand a leading `~/` to the home directory.
pub fn expand_tilde(path: &str) -> Option<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
        None => Some(PathBuf::from(path)),
    }
}
