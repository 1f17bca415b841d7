//! Search adapter seam and the record shape every adapter returns.

use async_trait::async_trait;
use promptloom_core::{format_external_prompt, FormatterConfig};
use promptloom_store::{NewPrompt, PromptSource, TITLE_PREVIEW_CHARS};
use serde::{Deserialize, Serialize};

use crate::error::SearchResult;

/// A prompt harvested from an external image gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalImage {
    pub id: String,
    /// Full-size image locator
    pub src: String,
    /// Preview image locator
    #[serde(default)]
    pub src_small: String,
    pub prompt: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guidance: Option<f64>,
    #[serde(default)]
    pub grid: bool,
    #[serde(default)]
    pub nsfw: bool,
}

impl ExternalImage {
    /// Preview locator, falling back to the full-size image.
    pub fn preview_url(&self) -> &str {
        if self.src_small.is_empty() {
            &self.src
        } else {
            &self.src_small
        }
    }

    /// The harvested text as a pasteable command.
    pub fn formatted_prompt(
        &self,
        formatter: &FormatterConfig,
        aspect_ratio: Option<&str>,
        version: Option<&str>,
    ) -> String {
        format_external_prompt(formatter, &self.prompt, aspect_ratio, version)
    }

    /// Map this result into a history record with `source = external`.
    pub fn to_new_prompt(
        &self,
        formatter: &FormatterConfig,
        aspect_ratio: Option<&str>,
        version: Option<&str>,
        source_name: &str,
    ) -> NewPrompt {
        let title: String = self.prompt.chars().take(TITLE_PREVIEW_CHARS).collect();
        NewPrompt::new(self.formatted_prompt(formatter, aspect_ratio, version))
            .with_title(title)
            .with_source(PromptSource::External)
            .with_external_source(source_name)
            .with_image_url(self.preview_url())
    }
}

/// A third-party prompt search service.
#[async_trait]
pub trait SearchAdapter: Send + Sync {
    /// Display name recorded on prompts saved from this source.
    fn source_name(&self) -> &str;

    /// Candidate prompts for `query`, in the service's order.
    ///
    /// A blank query yields an empty list without contacting the service.
    async fn search(&self, query: &str) -> SearchResult<Vec<ExternalImage>>;
}
