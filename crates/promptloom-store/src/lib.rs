//! Persistence for saved prompts, groups and templates.
//!
//! Two documents are kept: the prompt history (`{ prompts, groups }`) and the template
//! list. Each is loaded lazily through a [`DocumentBackend`] and rewritten in full on every
//! mutation; the two are never updated atomically together.

mod backend;
mod document;
mod error;
mod prompts;
mod templates;
mod types;

pub use backend::{DocumentBackend, FileBackend, MemoryBackend};
pub use document::{load_document, LoadOutcome, LoadStatus};
pub use error::{StoreError, StoreResult};
pub use prompts::{PromptStore, DEFAULT_HISTORY_KEY};
pub use templates::{TemplateStore, DEFAULT_TEMPLATES_KEY};
pub use types::{
    compare_titles, derive_title, generate_id, normalize_tags, Group, GroupPatch,
    ImportSummary, NewPrompt, NewTemplate, PromptFilter, PromptHistory, PromptPatch,
    PromptSource, SavedPrompt, SortBy, Statistics, Template, DEFAULT_GROUP_COLOR,
    GROUP_COLORS, TITLE_PREVIEW_CHARS,
};
