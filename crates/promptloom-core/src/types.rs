use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::formatter::{DEFAULT_ASPECT_RATIO, DEFAULT_VERSION};

/// Optional generation knobs appended as flags after the prompt body.
///
/// Every numeric knob is nullable: `None` means the flag is omitted from the output.
/// Values are not range checked here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedParams {
    #[serde(default)]
    pub stylize: Option<u32>,
    #[serde(default)]
    pub chaos: Option<u32>,
    #[serde(default)]
    pub weird: Option<u32>,
    #[serde(default)]
    pub quality: Option<f64>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub stop: Option<u32>,
    #[serde(default)]
    pub tile: bool,
    #[serde(default, rename = "negativePrompt")]
    pub negative_prompt_text: String,
    #[serde(default, rename = "sref")]
    pub style_reference_code: String,
    #[serde(default, rename = "srefWeight")]
    pub style_reference_weight: Option<u32>,
}

impl AdvancedParams {
    /// True when no knob would produce a flag.
    pub fn is_empty(&self) -> bool {
        self.stylize.is_none()
            && self.chaos.is_none()
            && self.weird.is_none()
            && self.quality.is_none()
            && self.seed.is_none()
            && self.stop.is_none()
            && !self.tile
            && self.negative_prompt_text.trim().is_empty()
            && self.style_reference_code.trim().is_empty()
    }

    /// Overlay every knob that is set in `other` onto `self`.
    pub fn merge(&mut self, other: &AdvancedParams) {
        if other.stylize.is_some() {
            self.stylize = other.stylize;
        }
        if other.chaos.is_some() {
            self.chaos = other.chaos;
        }
        if other.weird.is_some() {
            self.weird = other.weird;
        }
        if other.quality.is_some() {
            self.quality = other.quality;
        }
        if other.seed.is_some() {
            self.seed = other.seed;
        }
        if other.stop.is_some() {
            self.stop = other.stop;
        }
        if other.tile {
            self.tile = true;
        }
        if !other.negative_prompt_text.is_empty() {
            self.negative_prompt_text = other.negative_prompt_text.clone();
        }
        if !other.style_reference_code.is_empty() {
            self.style_reference_code = other.style_reference_code.clone();
        }
        if other.style_reference_weight.is_some() {
            self.style_reference_weight = other.style_reference_weight;
        }
    }
}

/// Structured input for [`PromptFormatter`](crate::PromptFormatter).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromptRequest {
    pub idea: String,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    pub aspect_ratio: String,
    pub version: String,
    #[serde(default)]
    pub advanced: AdvancedParams,
}

impl PromptRequest {
    pub fn new(idea: impl Into<String>) -> Self {
        Self {
            idea: idea.into(),
            style: None,
            mood: None,
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
            version: DEFAULT_VERSION.to_string(),
            advanced: AdvancedParams::default(),
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_mood(mut self, mood: impl Into<String>) -> Self {
        self.mood = Some(mood.into());
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.aspect_ratio = aspect_ratio.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_advanced(mut self, advanced: AdvancedParams) -> Self {
        self.advanced = advanced;
        self
    }
}

/// Result of analyzing a raw prompt. Derived and transient, never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParsedPromptAnalysis {
    pub subject: String,
    pub styles: Vec<String>,
    pub moods: Vec<String>,
    pub parameters: BTreeMap<String, String>,
    pub modifiers: Vec<String>,
    pub negatives: Vec<String>,
}

impl ParsedPromptAnalysis {
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.subject.is_empty()
            && self.styles.is_empty()
            && self.moods.is_empty()
            && self.parameters.is_empty()
            && self.modifiers.is_empty()
            && self.negatives.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advanced_params_wire_names() {
        let params = AdvancedParams {
            negative_prompt_text: "text".to_string(),
            style_reference_code: "1234".to_string(),
            style_reference_weight: Some(200),
            ..Default::default()
        };
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["negativePrompt"], "text");
        assert_eq!(value["sref"], "1234");
        assert_eq!(value["srefWeight"], 200);
        assert!(value["stylize"].is_null());
    }

    #[test]
    fn test_advanced_params_is_empty() {
        assert!(AdvancedParams::default().is_empty());
        let params = AdvancedParams {
            tile: true,
            ..Default::default()
        };
        assert!(!params.is_empty());
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut base = AdvancedParams {
            stylize: Some(100),
            chaos: Some(5),
            ..Default::default()
        };
        base.merge(&AdvancedParams {
            chaos: Some(50),
            seed: Some(7),
            ..Default::default()
        });
        assert_eq!(base.stylize, Some(100));
        assert_eq!(base.chaos, Some(50));
        assert_eq!(base.seed, Some(7));
    }

    #[test]
    fn test_request_defaults() {
        let request = PromptRequest::new("a lighthouse");
        assert_eq!(request.aspect_ratio, "1:1");
        assert_eq!(request.version, "6");
        assert!(request.style.is_none());
    }
}
