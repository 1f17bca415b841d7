use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use promptloom_config::{Config, ConfigManager};
use promptloom_core::PromptFormatter;
use promptloom_search::LexicaClient;
use promptloom_store::{DocumentBackend, FileBackend, PromptStore, TemplateStore};

pub fn resolve_config_path(raw: &str) -> PathBuf {
    promptloom_config::expand_tilde(raw).unwrap_or_else(|| PathBuf::from(raw))
}

/// Everything a command needs, wired from the configuration.
pub struct AppContext {
    pub config: Config,
    pub formatter: PromptFormatter,
    pub prompts: PromptStore,
    pub templates: TemplateStore,
}

impl AppContext {
    pub async fn load(config_path: &Path) -> anyhow::Result<Self> {
        let manager = ConfigManager::load(config_path)
            .await
            .with_context(|| format!("loading config {:?}", config_path))?;
        let config = manager.snapshot().await;

        let data_dir = config
            .storage
            .resolved_data_dir()
            .context("could not resolve storage.data_dir")?;
        let backend: Arc<dyn DocumentBackend> = Arc::new(FileBackend::new(data_dir));

        Ok(Self {
            formatter: PromptFormatter::new(config.formatter.clone()),
            prompts: PromptStore::with_key(backend.clone(), config.storage.history_key.clone()),
            templates: TemplateStore::with_key(backend, config.storage.templates_key.clone()),
            config,
        })
    }

    pub fn search_client(&self) -> anyhow::Result<LexicaClient> {
        let search = &self.config.search;
        let client = LexicaClient::with_base_url(
            search.base_url.clone(),
            Duration::from_secs(search.timeout_secs),
        )?
        .with_source_name(search.source_name.clone());
        Ok(client)
    }
}
