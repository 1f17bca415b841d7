//! Saved generation-setting templates.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::backend::DocumentBackend;
use crate::document::{Change, DocumentCell, LoadStatus};
use crate::error::StoreResult;
use crate::types::{generate_id, NewTemplate, Template};

pub const DEFAULT_TEMPLATES_KEY: &str = "prompt-templates";

/// Template list persisted independently of the prompt history.
pub struct TemplateStore {
    document: DocumentCell<Vec<Template>>,
}

impl TemplateStore {
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self::with_key(backend, DEFAULT_TEMPLATES_KEY)
    }

    pub fn with_key(backend: Arc<dyn DocumentBackend>, key: impl Into<String>) -> Self {
        Self {
            document: DocumentCell::new(backend, key),
        }
    }

    pub async fn load_status(&self) -> LoadStatus {
        self.document.status().await
    }

    /// Templates, most recently saved first.
    pub async fn list_templates(&self) -> StoreResult<Vec<Template>> {
        self.document.read(|templates| templates.clone()).await
    }

    pub async fn get_template(&self, id: &str) -> StoreResult<Option<Template>> {
        self.document
            .read(|templates| templates.iter().find(|t| t.id == id).cloned())
            .await
    }

    /// Find a template by exact id or, failing that, by case-insensitive name.
    pub async fn find_template(&self, id_or_name: &str) -> StoreResult<Option<Template>> {
        self.document
            .read(|templates| {
                templates
                    .iter()
                    .find(|t| t.id == id_or_name)
                    .or_else(|| {
                        templates
                            .iter()
                            .find(|t| t.name.eq_ignore_ascii_case(id_or_name))
                    })
                    .cloned()
            })
            .await
    }

    pub async fn save_template(&self, new: NewTemplate) -> StoreResult<Template> {
        let template = Template {
            id: generate_id(),
            name: new.name,
            style: new.style,
            mood: new.mood,
            aspect_ratio: new.aspect_ratio,
            version: new.version,
            advanced_params: new.advanced_params,
            created_at: Utc::now(),
        };

        let saved = template.clone();
        self.document
            .update(move |templates| {
                templates.insert(0, template);
                Change::Write(())
            })
            .await?;

        info!("Saved template {} ({})", saved.id, saved.name);
        Ok(saved)
    }

    pub async fn delete_template(&self, id: &str) -> StoreResult<bool> {
        let removed = self
            .document
            .update(|templates| {
                let before = templates.len();
                templates.retain(|t| t.id != id);
                if templates.len() == before {
                    Change::Skip(false)
                } else {
                    Change::Write(true)
                }
            })
            .await?;

        if removed {
            info!("Deleted template {}", id);
        }
        Ok(removed)
    }

    pub async fn count(&self) -> StoreResult<usize> {
        self.document.read(|templates| templates.len()).await
    }
}
