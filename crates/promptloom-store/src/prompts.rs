//! Prompt history and groups, persisted together as one document.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};

use crate::backend::DocumentBackend;
use crate::document::{Change, DocumentCell, LoadStatus};
use crate::error::{StoreError, StoreResult};
use crate::types::{
    generate_id, Group, GroupPatch, ImportSummary, NewPrompt, PromptFilter, PromptHistory,
    PromptPatch, PromptSource, SavedPrompt, Statistics, DEFAULT_GROUP_COLOR,
};

pub const DEFAULT_HISTORY_KEY: &str = "prompt-history";

/// Saved prompts and groups.
///
/// The whole `{ prompts, groups }` document is read on first use and rewritten on every
/// mutation. Prompts are kept most recent first.
pub struct PromptStore {
    document: DocumentCell<PromptHistory>,
}

impl PromptStore {
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self::with_key(backend, DEFAULT_HISTORY_KEY)
    }

    pub fn with_key(backend: Arc<dyn DocumentBackend>, key: impl Into<String>) -> Self {
        Self {
            document: DocumentCell::new(backend, key),
        }
    }

    /// How the cached history was obtained. `NotLoaded` until the first operation.
    pub async fn load_status(&self) -> LoadStatus {
        self.document.status().await
    }

    pub async fn reload(&self) -> StoreResult<LoadStatus> {
        let status = self.document.reload().await?;
        debug!("Reloaded {} ({:?})", self.document.key(), status);
        Ok(status)
    }

    // ------------------------------------------------------------------
    // Prompts
    // ------------------------------------------------------------------

    pub async fn list_prompts(&self) -> StoreResult<Vec<SavedPrompt>> {
        self.document.read(|history| history.prompts.clone()).await
    }

    pub async fn get_prompt(&self, id: &str) -> StoreResult<Option<SavedPrompt>> {
        self.document
            .read(|history| history.prompts.iter().find(|p| p.id == id).cloned())
            .await
    }

    pub async fn favorite_prompts(&self) -> StoreResult<Vec<SavedPrompt>> {
        self.document
            .read(|history| {
                history
                    .prompts
                    .iter()
                    .filter(|p| p.is_favorite)
                    .cloned()
                    .collect()
            })
            .await
    }

    /// Prompts whose group is `group_id`; `None` selects ungrouped prompts.
    pub async fn prompts_in_group(&self, group_id: Option<&str>) -> StoreResult<Vec<SavedPrompt>> {
        self.document
            .read(|history| {
                history
                    .prompts
                    .iter()
                    .filter(|p| p.group_id.as_deref() == group_id)
                    .cloned()
                    .collect()
            })
            .await
    }

    /// Store a new prompt at the head of the history.
    pub async fn save_prompt(&self, new: NewPrompt) -> StoreResult<SavedPrompt> {
        let now = Utc::now();
        let prompt = SavedPrompt {
            id: generate_id(),
            prompt_text: new.prompt_text,
            title: new.title,
            created_at: now,
            updated_at: now,
            is_favorite: new.is_favorite,
            group_id: new.group_id,
            tags: new.tags,
            source: new.source,
            external_source_name: new.external_source_name,
            image_url: new.image_url,
        };

        let saved = prompt.clone();
        self.document
            .update(move |history| {
                history.prompts.insert(0, prompt);
                Change::Write(())
            })
            .await?;

        info!("Saved prompt {} ({})", saved.id, saved.source);
        Ok(saved)
    }

    /// Merge `patch` into the prompt `id`. `None` when no such prompt exists.
    pub async fn update_prompt(
        &self,
        id: &str,
        patch: PromptPatch,
    ) -> StoreResult<Option<SavedPrompt>> {
        let updated = self
            .document
            .update(|history| match history.prompts.iter_mut().find(|p| p.id == id) {
                Some(prompt) => {
                    patch.apply(prompt);
                    Change::Write(Some(prompt.clone()))
                }
                None => Change::Skip(None),
            })
            .await?;

        if updated.is_some() {
            debug!("Updated prompt {}", id);
        }
        Ok(updated)
    }

    /// Remove the prompt `id`. `false` when no such prompt exists.
    pub async fn delete_prompt(&self, id: &str) -> StoreResult<bool> {
        let removed = self
            .document
            .update(|history| {
                let before = history.prompts.len();
                history.prompts.retain(|p| p.id != id);
                if history.prompts.len() == before {
                    Change::Skip(false)
                } else {
                    Change::Write(true)
                }
            })
            .await?;

        if removed {
            info!("Deleted prompt {}", id);
        }
        Ok(removed)
    }

    /// Flip the favorite flag, returning the new value.
    pub async fn toggle_favorite(&self, id: &str) -> StoreResult<Option<bool>> {
        self.document
            .update(|history| match history.prompts.iter_mut().find(|p| p.id == id) {
                Some(prompt) => {
                    prompt.is_favorite = !prompt.is_favorite;
                    prompt.touch();
                    Change::Write(Some(prompt.is_favorite))
                }
                None => Change::Skip(None),
            })
            .await
    }

    /// Reassign a prompt's group; `None` makes it ungrouped. The group is not validated.
    pub async fn move_prompt_to_group(
        &self,
        id: &str,
        group_id: Option<String>,
    ) -> StoreResult<bool> {
        self.update_prompt(id, PromptPatch::new().group(group_id))
            .await
            .map(|updated| updated.is_some())
    }

    // ------------------------------------------------------------------
    // Groups
    // ------------------------------------------------------------------

    pub async fn list_groups(&self) -> StoreResult<Vec<Group>> {
        self.document.read(|history| history.groups.clone()).await
    }

    pub async fn get_group(&self, id: &str) -> StoreResult<Option<Group>> {
        self.document
            .read(|history| history.groups.iter().find(|g| g.id == id).cloned())
            .await
    }

    /// Append a group. A blank name becomes `Untitled`, a missing colour the default one.
    pub async fn create_group(
        &self,
        name: &str,
        color_token: Option<&str>,
    ) -> StoreResult<Group> {
        let name = name.trim();
        let group = Group {
            id: generate_id(),
            name: if name.is_empty() {
                "Untitled".to_string()
            } else {
                name.to_string()
            },
            color_token: color_token
                .filter(|c| !c.trim().is_empty())
                .unwrap_or(DEFAULT_GROUP_COLOR)
                .to_string(),
            created_at: Utc::now(),
        };

        let created = group.clone();
        self.document
            .update(move |history| {
                history.groups.push(group);
                Change::Write(())
            })
            .await?;

        info!("Created group {} ({})", created.id, created.name);
        Ok(created)
    }

    pub async fn update_group(&self, id: &str, patch: GroupPatch) -> StoreResult<Option<Group>> {
        self.document
            .update(|history| match history.groups.iter_mut().find(|g| g.id == id) {
                Some(group) => {
                    if let Some(name) = patch.name {
                        group.name = name;
                    }
                    if let Some(color_token) = patch.color_token {
                        group.color_token = color_token;
                    }
                    Change::Write(Some(group.clone()))
                }
                None => Change::Skip(None),
            })
            .await
    }

    /// Remove a group and ungroup its members. Prompts are never deleted with their group.
    pub async fn delete_group(&self, id: &str) -> StoreResult<bool> {
        let released = self
            .document
            .update(|history| {
                let before = history.groups.len();
                history.groups.retain(|g| g.id != id);
                if history.groups.len() == before {
                    return Change::Skip(None);
                }

                let mut released = 0;
                for prompt in history
                    .prompts
                    .iter_mut()
                    .filter(|p| p.group_id.as_deref() == Some(id))
                {
                    prompt.group_id = None;
                    prompt.touch();
                    released += 1;
                }
                Change::Write(Some(released))
            })
            .await?;

        match released {
            Some(count) => {
                info!("Deleted group {}, ungrouped {} prompts", id, count);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ------------------------------------------------------------------
    // Query and transfer
    // ------------------------------------------------------------------

    pub async fn filter_prompts(&self, filter: &PromptFilter) -> StoreResult<Vec<SavedPrompt>> {
        self.document
            .read(|history| filter.apply(&history.prompts))
            .await
    }

    /// Pretty-printed snapshot of prompts and groups.
    pub async fn export_history(&self) -> StoreResult<String> {
        let snapshot = self.document.read(|history| history.clone()).await?;
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Replace prompts and groups with the snapshot in `payload`.
    ///
    /// Both a `prompts` and a `groups` list are required. On any rejection the stored state
    /// is left as it was.
    pub async fn import_history(&self, payload: &str) -> StoreResult<ImportSummary> {
        let value: Value = serde_json::from_str(payload)
            .map_err(|e| StoreError::invalid_import(format!("not valid JSON: {}", e)))?;

        for field in ["prompts", "groups"] {
            match value.get(field) {
                Some(Value::Array(_)) => {}
                Some(_) => {
                    return Err(StoreError::invalid_import(format!(
                        "`{}` must be a list",
                        field
                    )))
                }
                None => {
                    return Err(StoreError::invalid_import(format!(
                        "missing `{}`",
                        field
                    )))
                }
            }
        }

        let history: PromptHistory = serde_json::from_value(value)
            .map_err(|e| StoreError::invalid_import(e.to_string()))?;

        let mut seen = std::collections::HashSet::new();
        if let Some(duplicate) = history.prompts.iter().find(|p| !seen.insert(p.id.as_str())) {
            return Err(StoreError::invalid_import(format!(
                "duplicate prompt id {}",
                duplicate.id
            )));
        }

        let summary = ImportSummary {
            prompts: history.prompts.len(),
            groups: history.groups.len(),
        };
        self.document.replace(history).await?;

        info!(
            "Imported {} prompts and {} groups",
            summary.prompts, summary.groups
        );
        Ok(summary)
    }

    /// Counts over prompts and groups. The template count is left at zero; see
    /// [`Statistics::with_template_count`].
    pub async fn statistics(&self) -> StoreResult<Statistics> {
        self.document
            .read(|history| {
                let count_source = |matches: fn(PromptSource) -> bool| {
                    history.prompts.iter().filter(|p| matches(p.source)).count()
                };
                Statistics {
                    total_prompts: history.prompts.len(),
                    favorite_count: history.prompts.iter().filter(|p| p.is_favorite).count(),
                    group_count: history.groups.len(),
                    generated_count: count_source(|s| s == PromptSource::Generated),
                    imported_count: count_source(|s| s != PromptSource::Generated),
                    template_count: 0,
                }
            })
            .await
    }
}
