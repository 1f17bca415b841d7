use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::config::{Config, ConfigError, ConfigResult};

/// Owns the configuration document and its location on disk.
#[derive(Clone)]
pub struct ConfigManager {
    path: PathBuf,
    config: Arc<RwLock<Config>>,
}

impl ConfigManager {
    /// Load the configuration at `path`, writing defaults there when it does not exist.
    pub async fn load(path: &Path) -> ConfigResult<Self> {
        let config = if path.exists() {
            info!("Loading config from {:?}", path);
            let content = tokio::fs::read_to_string(path).await?;
            let config: Config = serde_json::from_str(&content)?;
            Self::validate(&config)?;
            config
        } else {
            info!("Config file not found, creating default config at {:?}", path);
            let default_config = Config::default();
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let content = serde_json::to_string_pretty(&default_config)?;
            tokio::fs::write(path, &content).await?;
            default_config
        };

        Ok(Self {
            path: path.to_path_buf(),
            config: Arc::new(RwLock::new(config)),
        })
    }

    /// In-memory manager, nothing is read from `path` until [`reload`](Self::reload).
    pub fn new(config: Config, path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(config)),
        }
    }

    pub fn get(&self) -> Arc<RwLock<Config>> {
        Arc::clone(&self.config)
    }

    /// Copy of the current configuration.
    pub async fn snapshot(&self) -> Config {
        self.config.read().await.clone()
    }

    pub async fn save(&self) -> ConfigResult<()> {
        let config = self.config.read().await;
        let content = serde_json::to_string_pretty(&*config)?;
        drop(config);

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, content).await?;
        info!("Config saved to {:?}", self.path);
        Ok(())
    }

    pub async fn reload(&self) -> ConfigResult<()> {
        if !self.path.exists() {
            return Err(ConfigError::InvalidPath(format!(
                "Config file not found: {:?}",
                self.path
            )));
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        let new_config: Config = serde_json::from_str(&content)?;
        Self::validate(&new_config)?;

        let mut config = self.config.write().await;
        *config = new_config;
        drop(config);

        info!("Config reloaded from {:?}", self.path);
        Ok(())
    }

    /// Apply `f`, validate, and persist. A rejected change leaves memory and disk untouched.
    pub async fn update<F>(&self, f: F) -> ConfigResult<()>
    where
        F: FnOnce(&mut Config) -> ConfigResult<()>,
    {
        let mut config = self.config.write().await;
        let mut draft = config.clone();
        f(&mut draft)?;
        Self::validate(&draft)?;
        *config = draft;
        drop(config);
        self.save().await
    }

    /// Dotted-key write followed by a save.
    pub async fn set_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        self.update(|config| config.set_value(key, value)).await
    }

    pub async fn get_value(&self, key: &str) -> Option<String> {
        self.config.read().await.get_value(key)
    }

    pub fn validate(config: &Config) -> ConfigResult<()> {
        if config.search.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "search.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if config.search.base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "search.base_url cannot be empty".to_string(),
            ));
        }

        for (name, key) in [
            ("storage.history_key", &config.storage.history_key),
            ("storage.templates_key", &config.storage.templates_key),
        ] {
            let valid = !key.is_empty()
                && key
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            if !valid {
                return Err(ConfigError::Validation(format!(
                    "{} may only contain letters, digits, '-' and '_': {:?}",
                    name, key
                )));
            }
        }

        if config.storage.history_key == config.storage.templates_key {
            return Err(ConfigError::Validation(
                "storage.history_key and storage.templates_key must differ".to_string(),
            ));
        }

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_creates_default_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.json");

        let manager = ConfigManager::load(&config_path).await.unwrap();
        assert!(config_path.exists());
        assert_eq!(manager.snapshot().await, Config::default());
    }

    #[tokio::test]
    async fn test_set_value_persists() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let manager = ConfigManager::load(&config_path).await.unwrap();
        manager.set_value("search.timeout_secs", "42").await.unwrap();

        let reopened = ConfigManager::load(&config_path).await.unwrap();
        assert_eq!(
            reopened.get_value("search.timeout_secs").await.as_deref(),
            Some("42")
        );
    }

    #[tokio::test]
    async fn test_invalid_update_is_not_applied() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let manager = ConfigManager::load(&config_path).await.unwrap();

        let err = manager.set_value("search.timeout_secs", "0").await.unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(manager
            .set_value("storage.history_key", "../escape")
            .await
            .is_err());
        assert_eq!(manager.snapshot().await, Config::default());

        let on_disk = tokio::fs::read_to_string(&config_path).await.unwrap();
        let on_disk: Config = serde_json::from_str(&on_disk).unwrap();
        assert_eq!(on_disk, Config::default());
    }

    #[tokio::test]
    async fn test_reload_picks_up_external_edits() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let manager = ConfigManager::load(&config_path).await.unwrap();

        let mut edited = Config::default();
        edited.search.source_name = "Mirror".to_string();
        tokio::fs::write(&config_path, serde_json::to_string(&edited).unwrap())
            .await
            .unwrap();

        manager.reload().await.unwrap();
        assert_eq!(
            manager.get_value("search.source_name").await.as_deref(),
            Some("Mirror")
        );
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(ConfigManager::validate(&config).is_ok());

        config.storage.templates_key = config.storage.history_key.clone();
        assert!(ConfigManager::validate(&config).is_err());
    }
}
