//! Client for the public Lexica prompt search API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::adapter::{ExternalImage, SearchAdapter};
use crate::error::{SearchError, SearchResult};

pub const LEXICA_API_BASE: &str = "https://lexica.art/api/v1";
pub const LEXICA_SOURCE_NAME: &str = "Lexica.art";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    images: Option<Vec<ExternalImage>>,
}

/// HTTP search adapter. No retries; a failed request is reported to the caller as is.
#[derive(Debug, Clone)]
pub struct LexicaClient {
    http_client: Client,
    base_url: String,
    source_name: String,
}

impl LexicaClient {
    pub fn new() -> SearchResult<Self> {
        Self::with_base_url(LEXICA_API_BASE, DEFAULT_TIMEOUT)
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> SearchResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Config(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            source_name: LEXICA_SOURCE_NAME.to_string(),
        })
    }

    pub fn with_source_name(mut self, source_name: impl Into<String>) -> Self {
        self.source_name = source_name.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self, query: &str) -> SearchResult<Vec<ExternalImage>> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[("q", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| SearchError::Decode(e.to_string()))?;
        Ok(parsed.images.unwrap_or_default())
    }
}

#[async_trait]
impl SearchAdapter for LexicaClient {
    fn source_name(&self) -> &str {
        &self.source_name
    }

    async fn search(&self, query: &str) -> SearchResult<Vec<ExternalImage>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        match self.fetch(query).await {
            Ok(images) => {
                debug!("{} returned {} results for {:?}", self.source_name, images.len(), query);
                Ok(images)
            }
            Err(err) => {
                warn!("{} search for {:?} failed: {}", self.source_name, query, err);
                Err(err)
            }
        }
    }
}
