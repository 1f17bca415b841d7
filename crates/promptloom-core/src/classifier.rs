//! Keyword based classification of prompt segments.

use serde::{Deserialize, Serialize};

/// Unclassified segments longer than this (in characters) may become the subject.
pub const DEFAULT_SUBJECT_MIN_LEN: usize = 10;

pub const STYLE_KEYWORDS: &[&str] = &[
    "photorealistic",
    "oil painting",
    "watercolor",
    "digital art",
    "3d render",
    "anime",
    "comic book",
    "sketch",
    "abstract",
    "minimalist",
    "cyberpunk",
    "steampunk",
    "fantasy",
    "sci-fi",
    "vintage",
    "impressionist",
    "surreal",
    "baroque",
    "art nouveau",
    "pop art",
    "pixel art",
    "low poly",
    "vaporwave",
    "gothic",
    "retro",
];

pub const MOOD_KEYWORDS: &[&str] = &[
    "dramatic",
    "peaceful",
    "energetic",
    "mysterious",
    "joyful",
    "dark",
    "bright",
    "melancholic",
    "epic",
    "serene",
    "moody",
    "cinematic",
    "ethereal",
    "dreamy",
    "intense",
];

pub const QUALITY_KEYWORDS: &[&str] = &[
    "highly detailed",
    "professional quality",
    "8k resolution",
    "4k",
    "ultra detailed",
    "masterpiece",
    "best quality",
    "sharp focus",
    "intricate details",
    "octane render",
    "unreal engine",
];

/// Bucket a single segment falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Style,
    Mood,
    Modifier,
    Unclassified,
}

/// Segments a prompt body and sorts each segment into one bucket.
///
/// Matching is case-insensitive substring containment and follows a fixed priority:
/// style, then mood, then quality modifier. A segment that matches none of the lists is
/// a subject candidate; only the first eligible candidate is kept.
#[derive(Debug, Clone)]
pub struct SegmentClassifier {
    style_keywords: Vec<String>,
    mood_keywords: Vec<String>,
    quality_keywords: Vec<String>,
    subject_min_len: usize,
}

/// Buckets produced by [`SegmentClassifier::classify_text`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedSegments {
    pub subject: String,
    pub styles: Vec<String>,
    pub moods: Vec<String>,
    pub modifiers: Vec<String>,
}

impl SegmentClassifier {
    pub fn new() -> Self {
        Self {
            style_keywords: to_owned(STYLE_KEYWORDS),
            mood_keywords: to_owned(MOOD_KEYWORDS),
            quality_keywords: to_owned(QUALITY_KEYWORDS),
            subject_min_len: DEFAULT_SUBJECT_MIN_LEN,
        }
    }

    pub fn with_subject_min_len(mut self, len: usize) -> Self {
        self.subject_min_len = len;
        self
    }

    /// Add an extra style keyword. Keywords are stored lowercased.
    pub fn with_style_keyword(mut self, keyword: impl AsRef<str>) -> Self {
        self.style_keywords.push(keyword.as_ref().to_lowercase());
        self
    }

    pub fn with_mood_keyword(mut self, keyword: impl AsRef<str>) -> Self {
        self.mood_keywords.push(keyword.as_ref().to_lowercase());
        self
    }

    /// Classify one segment against the keyword lists.
    pub fn classify(&self, segment: &str) -> Classification {
        let lowered = segment.to_lowercase();
        let contains_any = |keywords: &[String]| keywords.iter().any(|k| lowered.contains(k));

        if contains_any(&self.style_keywords) {
            Classification::Style
        } else if contains_any(&self.mood_keywords) {
            Classification::Mood
        } else if contains_any(&self.quality_keywords) {
            Classification::Modifier
        } else {
            Classification::Unclassified
        }
    }

    /// Split `text` on commas and bucket every non-empty trimmed segment.
    ///
    /// Order inside each bucket follows the order of the segments. Unclassified segments
    /// after the subject has been chosen are dropped.
    pub fn classify_text(&self, text: &str) -> ClassifiedSegments {
        let mut result = ClassifiedSegments::default();
        let mut subject_found = false;

        let segments = text.split(',').map(str::trim).filter(|s| !s.is_empty());
        for (index, segment) in segments.enumerate() {
            match self.classify(segment) {
                Classification::Style => result.styles.push(segment.to_string()),
                Classification::Mood => result.moods.push(segment.to_string()),
                Classification::Modifier => result.modifiers.push(segment.to_string()),
                Classification::Unclassified => {
                    let eligible =
                        index == 0 || segment.chars().count() > self.subject_min_len;
                    if !subject_found && eligible {
                        result.subject = segment.to_string();
                        subject_found = true;
                    }
                }
            }
        }

        result
    }
}

impl Default for SegmentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn to_owned(keywords: &[&str]) -> Vec<String> {
    keywords.iter().map(|k| k.to_string()).collect()
}
