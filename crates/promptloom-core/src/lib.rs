//! # promptloom core
//!
//! Pure string processing for image-generation prompts:
//!
//! - [`PromptFormatter`] turns a structured [`PromptRequest`] into a command string.
//! - [`parse_parameters`] pulls `--name value` flags and the `--no` list out of raw text.
//! - [`SegmentClassifier`] sorts comma separated segments into subject / style / mood /
//!   quality buckets.
//! - [`analyze_prompt`] chains the two into a [`ParsedPromptAnalysis`].
//!
//! Nothing in this crate performs I/O and nothing in it can fail.

pub mod analysis;
pub mod catalog;
pub mod classifier;
pub mod formatter;
pub mod params;
pub mod types;

pub use analysis::{analyze_prompt, analyze_with, extract_keywords};
pub use classifier::{
    ClassifiedSegments, Classification, SegmentClassifier, DEFAULT_SUBJECT_MIN_LEN,
};
pub use formatter::{
    format_external_prompt, FormatterConfig, PromptFormatter, DEFAULT_ASPECT_RATIO,
    DEFAULT_COMMAND_PREFIX, DEFAULT_QUALITY_CLAUSE, DEFAULT_VERSION,
};
pub use params::{parse_parameters, ParameterExtraction, TRUE_SENTINEL};
pub use types::{AdvancedParams, ParsedPromptAnalysis, PromptRequest};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
