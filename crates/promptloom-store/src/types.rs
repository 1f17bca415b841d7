//! Persisted records and the query/patch types that operate on them.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use feruca::Collator;
use promptloom_core::{AdvancedParams, PromptRequest, DEFAULT_COMMAND_PREFIX};
use serde::{Deserialize, Serialize};

/// Colour tokens offered for new groups.
pub const GROUP_COLORS: &[&str] = &[
    "#ef4444", "#f97316", "#f59e0b", "#84cc16", "#22c55e", "#14b8a6", "#06b6d4", "#3b82f6",
    "#6366f1", "#a855f7", "#ec4899", "#f43f5e",
];

pub const DEFAULT_GROUP_COLOR: &str = "#ef4444";

/// Maximum number of characters of prompt text used for a derived title.
pub const TITLE_PREVIEW_CHARS: usize = 50;

/// Fresh record id: millisecond timestamp plus a random suffix.
///
/// Collisions are not checked.
pub fn generate_id() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", Utc::now().timestamp_millis(), &suffix[..7])
}

/// Title for a prompt saved without one: a preview of the text without the command prefix.
pub fn derive_title(prompt_text: &str) -> String {
    let preview: String = prompt_text.chars().take(TITLE_PREVIEW_CHARS).collect();
    format!("{}...", preview.replacen(DEFAULT_COMMAND_PREFIX, "", 1))
}

/// Where a saved prompt came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptSource {
    #[default]
    Generated,
    Imported,
    External,
}

impl std::fmt::Display for PromptSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromptSource::Generated => write!(f, "generated"),
            PromptSource::Imported => write!(f, "imported"),
            PromptSource::External => write!(f, "external"),
        }
    }
}

/// A prompt kept in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPrompt {
    pub id: String,
    #[serde(rename = "prompt")]
    pub prompt_text: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_favorite: bool,
    /// Soft reference to a [`Group`]; `None` means ungrouped
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub source: PromptSource,
    #[serde(default, rename = "externalSource", skip_serializing_if = "Option::is_none")]
    pub external_source_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl SavedPrompt {
    /// Refresh `updated_at`, never moving it before `created_at`.
    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.created_at);
    }
}

/// A user-defined label for organizing prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(rename = "color")]
    pub color_token: String,
    pub created_at: DateTime<Utc>,
}

/// Snapshot of generation settings, excluding the idea text.
///
/// Templates are never edited in place; applying one replaces the composer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub mood: String,
    pub aspect_ratio: String,
    pub version: String,
    #[serde(default, rename = "advanced")]
    pub advanced_params: AdvancedParams,
    pub created_at: DateTime<Utc>,
}

impl Template {
    /// Composer input for `idea` with every setting taken from this template.
    pub fn to_request(&self, idea: impl Into<String>) -> PromptRequest {
        let mut request = PromptRequest::new(idea)
            .with_aspect_ratio(self.aspect_ratio.clone())
            .with_version(self.version.clone())
            .with_advanced(self.advanced_params.clone());
        request.style = Some(self.style.clone()).filter(|s| !s.is_empty());
        request.mood = Some(self.mood.clone()).filter(|m| !m.is_empty());
        request
    }
}

/// Persisted layout of the history document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptHistory {
    pub prompts: Vec<SavedPrompt>,
    pub groups: Vec<Group>,
}

/// Input for [`PromptStore::save_prompt`](crate::PromptStore::save_prompt).
#[derive(Debug, Clone, PartialEq)]
pub struct NewPrompt {
    pub prompt_text: String,
    pub title: String,
    pub is_favorite: bool,
    pub group_id: Option<String>,
    pub tags: Vec<String>,
    pub source: PromptSource,
    pub external_source_name: Option<String>,
    pub image_url: Option<String>,
}

impl NewPrompt {
    /// A generated prompt titled from its own text.
    pub fn new(prompt_text: impl Into<String>) -> Self {
        let prompt_text = prompt_text.into();
        Self {
            title: derive_title(&prompt_text),
            prompt_text,
            is_favorite: false,
            group_id: None,
            tags: Vec::new(),
            source: PromptSource::Generated,
            external_source_name: None,
            image_url: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_source(mut self, source: PromptSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = normalize_tags(tags);
        self
    }

    pub fn with_external_source(mut self, name: impl Into<String>) -> Self {
        self.external_source_name = Some(name.into());
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn favorite(mut self) -> Self {
        self.is_favorite = true;
        self
    }
}

/// Merge patch for a saved prompt. `None` fields keep their current value.
///
/// Nullable fields use a nested option: `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptPatch {
    pub prompt_text: Option<String>,
    pub title: Option<String>,
    pub is_favorite: Option<bool>,
    pub group_id: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub source: Option<PromptSource>,
    pub external_source_name: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
}

impl PromptPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompt_text(mut self, text: impl Into<String>) -> Self {
        self.prompt_text = Some(text.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = Some(is_favorite);
        self
    }

    pub fn group(mut self, group_id: Option<String>) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(normalize_tags(tags));
        self
    }

    pub(crate) fn apply(self, prompt: &mut SavedPrompt) {
        if let Some(text) = self.prompt_text {
            prompt.prompt_text = text;
        }
        if let Some(title) = self.title {
            prompt.title = title;
        }
        if let Some(is_favorite) = self.is_favorite {
            prompt.is_favorite = is_favorite;
        }
        if let Some(group_id) = self.group_id {
            prompt.group_id = group_id;
        }
        if let Some(tags) = self.tags {
            prompt.tags = tags;
        }
        if let Some(source) = self.source {
            prompt.source = source;
        }
        if let Some(name) = self.external_source_name {
            prompt.external_source_name = name;
        }
        if let Some(url) = self.image_url {
            prompt.image_url = url;
        }
        prompt.touch();
    }
}

/// Merge patch for a group. Id and creation time are immutable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupPatch {
    pub name: Option<String>,
    pub color_token: Option<String>,
}

/// Input for [`TemplateStore::save_template`](crate::TemplateStore::save_template).
#[derive(Debug, Clone, PartialEq)]
pub struct NewTemplate {
    pub name: String,
    pub style: String,
    pub mood: String,
    pub aspect_ratio: String,
    pub version: String,
    pub advanced_params: AdvancedParams,
}

impl NewTemplate {
    /// Snapshot the settings of `request`; the idea is not part of a template.
    pub fn from_request(name: impl Into<String>, request: &PromptRequest) -> Self {
        Self {
            name: name.into(),
            style: request.style.clone().unwrap_or_default(),
            mood: request.mood.clone().unwrap_or_default(),
            aspect_ratio: request.aspect_ratio.clone(),
            version: request.version.clone(),
            advanced_params: request.advanced.clone(),
        }
    }
}

/// Sort order for [`PromptFilter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// `created_at` descending
    #[default]
    Newest,
    /// `created_at` ascending
    Oldest,
    /// Title, case-insensitive
    Alphabetical,
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "newest" => Ok(SortBy::Newest),
            "oldest" => Ok(SortBy::Oldest),
            "alphabetical" | "alpha" | "title" => Ok(SortBy::Alphabetical),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

/// History query. The default matches everything, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptFilter {
    /// Case-insensitive substring over title, prompt text and tags; empty matches all
    pub search_query: String,
    /// Exact group match; `None` disables the group filter
    pub group_id: Option<String>,
    pub favorites_only: bool,
    pub sort_by: SortBy,
}

impl PromptFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn favorites_only(mut self) -> Self {
        self.favorites_only = true;
        self
    }

    pub fn sorted_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    pub fn matches(&self, prompt: &SavedPrompt) -> bool {
        if !self.search_query.is_empty() {
            let query = self.search_query.to_lowercase();
            let hit = prompt.prompt_text.to_lowercase().contains(&query)
                || prompt.title.to_lowercase().contains(&query)
                || prompt.tags.iter().any(|t| t.to_lowercase().contains(&query));
            if !hit {
                return false;
            }
        }
        if let Some(ref group_id) = self.group_id {
            if prompt.group_id.as_ref() != Some(group_id) {
                return false;
            }
        }
        !self.favorites_only || prompt.is_favorite
    }

    /// Matching prompts in the requested order. The input is not modified.
    pub fn apply(&self, prompts: &[SavedPrompt]) -> Vec<SavedPrompt> {
        let mut result: Vec<SavedPrompt> =
            prompts.iter().filter(|p| self.matches(p)).cloned().collect();

        match self.sort_by {
            SortBy::Newest => result.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortBy::Oldest => result.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            SortBy::Alphabetical => {
                let mut collator = Collator::default();
                result.sort_by(|a, b| collate_titles(&mut collator, &a.title, &b.title));
            }
        }
        result
    }
}

/// Collation used for alphabetical order.
///
/// Unicode collation with the root locale, so accented letters sort next to their base
/// letter. On a case-only difference lowercase sorts before uppercase.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    collate_titles(&mut Collator::default(), a, b)
}

fn collate_titles(collator: &mut Collator, a: &str, b: &str) -> Ordering {
    collator.collate(a, b).then_with(|| b.cmp(a))
}

/// Aggregate counts over the stored collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_prompts: usize,
    pub favorite_count: usize,
    pub group_count: usize,
    pub generated_count: usize,
    /// Imported and external prompts
    pub imported_count: usize,
    pub template_count: usize,
}

impl Statistics {
    pub fn with_template_count(mut self, count: usize) -> Self {
        self.template_count = count;
        self
    }
}

/// Counts reported by a successful import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub prompts: usize,
    pub groups: usize,
}

/// Trimmed, non-empty, de-duplicated tags in first-seen order.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut result: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.into().trim().to_string();
        if !tag.is_empty() && !result.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
            result.push(tag);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn prompt(id: &str, title: &str, minutes_ago: i64) -> SavedPrompt {
        let created_at = Utc::now() - Duration::minutes(minutes_ago);
        SavedPrompt {
            id: id.to_string(),
            prompt_text: format!("/imagine prompt: {}", title),
            title: title.to_string(),
            created_at,
            updated_at: created_at,
            is_favorite: false,
            group_id: None,
            tags: Vec::new(),
            source: PromptSource::Generated,
            external_source_name: None,
            image_url: None,
        }
    }

    #[test]
    fn test_generate_id_shape() {
        let id = generate_id();
        let (millis, suffix) = id.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), 7);
        assert_ne!(generate_id(), generate_id());
    }

    #[test]
    fn test_derive_title() {
        assert_eq!(derive_title("/imagine prompt: a red fox"), "a red fox...");
        let long = "x".repeat(80);
        assert_eq!(derive_title(&long).chars().count(), TITLE_PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_saved_prompt_wire_format() {
        let mut saved = prompt("1", "fox", 0);
        saved.external_source_name = Some("Lexica.art".to_string());
        let value = serde_json::to_value(&saved).unwrap();
        assert_eq!(value["prompt"], "/imagine prompt: fox");
        assert_eq!(value["externalSource"], "Lexica.art");
        assert_eq!(value["source"], "generated");
        assert!(value["groupId"].is_null());
        assert!(value.get("imageUrl").is_none());
        assert!(value["createdAt"].is_string());
    }

    #[test]
    fn test_reads_browser_style_dates() {
        let json = r#"{
            "id": "1700000000000-abc1234",
            "prompt": "/imagine prompt: moon",
            "title": "moon",
            "createdAt": "2024-03-01T10:00:00.000Z",
            "updatedAt": "2024-03-02T10:00:00.000Z",
            "isFavorite": true,
            "groupId": null,
            "tags": ["night"],
            "source": "imported"
        }"#;
        let saved: SavedPrompt = serde_json::from_str(json).unwrap();
        assert!(saved.is_favorite);
        assert_eq!(saved.source, PromptSource::Imported);
        assert!(saved.updated_at > saved.created_at);
    }

    #[test]
    fn test_filter_favorites_subset() {
        let mut prompts = vec![prompt("a", "one", 3), prompt("b", "two", 2), prompt("c", "three", 1)];
        prompts[0].is_favorite = true;
        prompts[2].is_favorite = true;

        let result = PromptFilter::new().favorites_only().apply(&prompts);
        let ids: Vec<_> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
        assert!(result.iter().all(|p| p.is_favorite));
    }

    #[test]
    fn test_filter_query_hits_tags_and_title() {
        let mut prompts = vec![prompt("a", "Castle", 2), prompt("b", "Forest", 1)];
        prompts[1].tags = vec!["Moody".to_string()];

        let by_title = PromptFilter::new().with_query("cast").apply(&prompts);
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].id, "a");

        let by_tag = PromptFilter::new().with_query("moody").apply(&prompts);
        assert_eq!(by_tag.len(), 1);
        assert_eq!(by_tag[0].id, "b");
    }

    #[test]
    fn test_sort_orders() {
        let prompts = vec![prompt("a", "banana", 1), prompt("b", "Apple", 3), prompt("c", "cherry", 2)];

        let oldest = PromptFilter::new().sorted_by(SortBy::Oldest).apply(&prompts);
        assert_eq!(oldest.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), vec!["b", "c", "a"]);

        let newest = PromptFilter::new().apply(&prompts);
        assert_eq!(newest.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), vec!["a", "c", "b"]);

        let alpha = PromptFilter::new().sorted_by(SortBy::Alphabetical).apply(&prompts);
        let titles: Vec<_> = alpha.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Apple", "banana", "cherry"]);
        assert!(alpha
            .windows(2)
            .all(|w| compare_titles(&w[0].title, &w[1].title) != Ordering::Greater));
    }

    #[test]
    fn test_compare_titles_case_tie_break() {
        assert_eq!(compare_titles("apple", "Apple"), Ordering::Less);
        assert_eq!(compare_titles("Zebra", "apple"), Ordering::Greater);
        assert_eq!(compare_titles("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_alphabetical_sort_places_accents_with_base_letter() {
        let prompts = vec![
            prompt("a", "fig", 1),
            prompt("b", "Éclair", 2),
            prompt("c", "apple", 3),
            prompt("d", "zebra", 4),
            prompt("e", "über", 5),
        ];

        let alpha = PromptFilter::new().sorted_by(SortBy::Alphabetical).apply(&prompts);
        let titles: Vec<_> = alpha.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["apple", "Éclair", "fig", "über", "zebra"]);
        assert_eq!(compare_titles("éclair", "Éclair"), Ordering::Less);
    }

    #[test]
    fn test_patch_clears_group_and_refreshes_updated_at() {
        let mut saved = prompt("a", "one", 10);
        saved.group_id = Some("g1".to_string());
        let before = saved.updated_at;

        PromptPatch::new().group(None).title("renamed").apply(&mut saved);
        assert_eq!(saved.group_id, None);
        assert_eq!(saved.title, "renamed");
        assert!(saved.updated_at > before);
        assert!(saved.updated_at >= saved.created_at);
    }

    #[test]
    fn test_template_request_roundtrip() {
        let request = PromptRequest::new("ignored")
            .with_style("Anime")
            .with_aspect_ratio("9:16")
            .with_version("niji 6");
        let new = NewTemplate::from_request("anime portrait", &request);
        assert_eq!(new.mood, "");

        let template = Template {
            id: "t".to_string(),
            name: new.name,
            style: new.style,
            mood: new.mood,
            aspect_ratio: new.aspect_ratio,
            version: new.version,
            advanced_params: new.advanced_params,
            created_at: Utc::now(),
        };
        let applied = template.to_request("a samurai cat");
        assert_eq!(applied.idea, "a samurai cat");
        assert_eq!(applied.style.as_deref(), Some("Anime"));
        assert_eq!(applied.mood, None);
        assert_eq!(applied.aspect_ratio, "9:16");
    }

    #[test]
    fn test_normalize_tags() {
        let tags = normalize_tags(vec![" night ", "Night", "", "fog"]);
        assert_eq!(tags, vec!["night", "fog"]);
    }

    #[test]
    fn test_sort_by_from_str() {
        assert_eq!("oldest".parse::<SortBy>(), Ok(SortBy::Oldest));
        assert_eq!("Alphabetical".parse::<SortBy>(), Ok(SortBy::Alphabetical));
        assert!("random".parse::<SortBy>().is_err());
    }
}
