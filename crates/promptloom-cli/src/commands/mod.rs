pub mod compose;
pub mod config;
pub mod groups;
pub mod prompts;
pub mod search;
pub mod templates;
