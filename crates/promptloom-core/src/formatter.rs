//! Composition of a structured request into one prompt command string.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::types::{AdvancedParams, PromptRequest};

pub const DEFAULT_COMMAND_PREFIX: &str = "/imagine prompt: ";
pub const DEFAULT_QUALITY_CLAUSE: &str = ", highly detailed, professional quality, 8k resolution";
pub const DEFAULT_ASPECT_RATIO: &str = "1:1";
pub const DEFAULT_VERSION: &str = "6";

/// Fixed pieces of text the formatter wraps around a request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FormatterConfig {
    pub command_prefix: String,
    pub quality_clause: String,
    /// Aspect ratio that is left implicit (no `--ar` flag).
    pub default_aspect_ratio: String,
    /// Version preselected for new requests.
    pub default_version: String,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            command_prefix: DEFAULT_COMMAND_PREFIX.to_string(),
            quality_clause: DEFAULT_QUALITY_CLAUSE.to_string(),
            default_aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
            default_version: DEFAULT_VERSION.to_string(),
        }
    }
}

/// Deterministic, side-effect free prompt formatter.
#[derive(Debug, Clone, Default)]
pub struct PromptFormatter {
    config: FormatterConfig,
}

impl PromptFormatter {
    pub fn new(config: FormatterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    /// A request prefilled with the configured default aspect ratio and version.
    pub fn request(&self, idea: impl Into<String>) -> PromptRequest {
        PromptRequest::new(idea)
            .with_aspect_ratio(self.config.default_aspect_ratio.clone())
            .with_version(self.config.default_version.clone())
    }

    /// Build the command string.
    ///
    /// Layout: prefix, idea, optional `, <style> style`, optional `, <mood> mood`, the quality
    /// clause, then flags in canonical order: `--ar`, `--v`/`--niji`, `--s`, `--c`, `--weird`,
    /// `--q`, `--seed`, `--stop`, `--tile`, `--sref` (`--sw` only with a code), `--no`.
    pub fn format(&self, request: &PromptRequest) -> String {
        let mut prompt = String::with_capacity(128);
        prompt.push_str(&self.config.command_prefix);
        prompt.push_str(&request.idea);

        if let Some(style) = non_empty(request.style.as_deref()) {
            push_clause(&mut prompt, style, "style");
        }
        if let Some(mood) = non_empty(request.mood.as_deref()) {
            push_clause(&mut prompt, mood, "mood");
        }
        prompt.push_str(&self.config.quality_clause);

        self.push_aspect_ratio(&mut prompt, &request.aspect_ratio);
        push_version(&mut prompt, &request.version);
        push_advanced(&mut prompt, &request.advanced);
        prompt
    }

    fn push_aspect_ratio(&self, prompt: &mut String, aspect_ratio: &str) {
        let aspect_ratio = aspect_ratio.trim();
        if !aspect_ratio.is_empty() && aspect_ratio != self.config.default_aspect_ratio {
            push_flag(prompt, "ar", aspect_ratio);
        }
    }
}

/// Wrap externally harvested prompt text so it can be pasted as a command.
pub fn format_external_prompt(
    config: &FormatterConfig,
    text: &str,
    aspect_ratio: Option<&str>,
    version: Option<&str>,
) -> String {
    let mut prompt = format!("{}{}", config.command_prefix, text.trim());
    if let Some(aspect_ratio) = non_empty(aspect_ratio) {
        if aspect_ratio != config.default_aspect_ratio {
            push_flag(&mut prompt, "ar", aspect_ratio);
        }
    }
    if let Some(version) = version {
        push_version(&mut prompt, version);
    }
    prompt
}

fn push_version(prompt: &mut String, version: &str) {
    let version = version.trim();
    if version.is_empty() {
        return;
    }
    // "niji 6" selects the anime model and is its own flag
    match version.strip_prefix("niji") {
        Some(rest) => {
            let rest = rest.trim();
            if rest.is_empty() {
                prompt.push_str(" --niji");
            } else {
                push_flag(prompt, "niji", rest);
            }
        }
        None => {
            push_flag(prompt, "v", version);
        }
    }
}

fn push_advanced(prompt: &mut String, advanced: &AdvancedParams) {
    if let Some(stylize) = advanced.stylize {
        push_flag(prompt, "s", stylize);
    }
    if let Some(chaos) = advanced.chaos {
        push_flag(prompt, "c", chaos);
    }
    if let Some(weird) = advanced.weird {
        push_flag(prompt, "weird", weird);
    }
    if let Some(quality) = advanced.quality {
        push_flag(prompt, "q", quality);
    }
    if let Some(seed) = advanced.seed {
        push_flag(prompt, "seed", seed);
    }
    if let Some(stop) = advanced.stop {
        push_flag(prompt, "stop", stop);
    }
    if advanced.tile {
        prompt.push_str(" --tile");
    }
    if let Some(code) = non_empty(Some(advanced.style_reference_code.as_str())) {
        push_flag(prompt, "sref", code);
        if let Some(weight) = advanced.style_reference_weight {
            push_flag(prompt, "sw", weight);
        }
    }
    if let Some(negative) = non_empty(Some(advanced.negative_prompt_text.as_str())) {
        push_flag(prompt, "no", negative);
    }
}

fn push_clause(prompt: &mut String, value: &str, kind: &str) {
    prompt.push_str(", ");
    prompt.push_str(&value.to_lowercase());
    prompt.push(' ');
    prompt.push_str(kind);
}

fn push_flag(prompt: &mut String, name: &str, value: impl Display) {
    prompt.push_str(" --");
    prompt.push_str(name);
    prompt.push(' ');
    prompt.push_str(&value.to_string());
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUALITY: &str = ", highly detailed, professional quality, 8k resolution";

    #[test]
    fn test_fox_in_snow() {
        let request = PromptRequest::new("a red fox in snow")
            .with_style("Sketch")
            .with_aspect_ratio("16:9")
            .with_version("6");
        let output = PromptFormatter::default().format(&request);
        assert_eq!(
            output,
            format!("/imagine prompt: a red fox in snow, sketch style{} --ar 16:9 --v 6", QUALITY)
        );
    }

    #[test]
    fn test_square_ratio_is_implicit() {
        let request = PromptRequest::new("tea cup").with_mood("Serene");
        let output = PromptFormatter::default().format(&request);
        assert_eq!(output, format!("/imagine prompt: tea cup, serene mood{} --v 6", QUALITY));
    }

    #[test]
    fn test_all_flags_in_canonical_order() {
        let advanced = AdvancedParams {
            stylize: Some(250),
            chaos: Some(20),
            weird: Some(500),
            quality: Some(0.5),
            seed: Some(42),
            stop: Some(90),
            tile: true,
            negative_prompt_text: "text, watermark".to_string(),
            style_reference_code: "1234567".to_string(),
            style_reference_weight: Some(300),
        };
        let request = PromptRequest::new("x")
            .with_aspect_ratio("3:2")
            .with_version("7")
            .with_advanced(advanced);
        let output = PromptFormatter::default().format(&request);
        assert!(output.ends_with(
            " --ar 3:2 --v 7 --s 250 --c 20 --weird 500 --q 0.5 --seed 42 --stop 90 --tile \
             --sref 1234567 --sw 300 --no text, watermark"
        ));
    }

    #[test]
    fn test_style_weight_requires_code() {
        let advanced = AdvancedParams {
            style_reference_weight: Some(300),
            ..Default::default()
        };
        let output = PromptFormatter::default().format(&PromptRequest::new("x").with_advanced(advanced));
        assert!(!output.contains("--sw"));
        assert!(!output.contains("--sref"));
    }

    #[test]
    fn test_whole_number_quality() {
        let advanced = AdvancedParams {
            quality: Some(1.0),
            ..Default::default()
        };
        let output = PromptFormatter::default().format(&PromptRequest::new("x").with_advanced(advanced));
        assert!(output.ends_with("--v 6 --q 1"));
    }

    #[test]
    fn test_niji_version() {
        let request = PromptRequest::new("x").with_version("niji 6");
        let output = PromptFormatter::default().format(&request);
        assert!(output.ends_with(" --niji 6"));
        assert!(!output.contains("--v"));
    }

    #[test]
    fn test_empty_style_and_version_are_skipped() {
        let request = PromptRequest::new("x").with_style("  ").with_version("");
        let output = PromptFormatter::default().format(&request);
        assert_eq!(output, format!("/imagine prompt: x{}", QUALITY));
    }

    #[test]
    fn test_formatting_is_repeatable() {
        let formatter = PromptFormatter::default();
        let request = PromptRequest::new("a glass whale").with_style("Vaporwave");
        assert_eq!(formatter.format(&request), formatter.format(&request));
    }

    #[test]
    fn test_custom_config() {
        let formatter = PromptFormatter::new(FormatterConfig {
            command_prefix: String::new(),
            quality_clause: ", 4k".to_string(),
            default_aspect_ratio: "16:9".to_string(),
            default_version: "7".to_string(),
        });
        let request = formatter.request("dunes");
        assert_eq!(formatter.format(&request), "dunes, 4k --v 7");
    }

    #[test]
    fn test_format_external_prompt() {
        let config = FormatterConfig::default();
        let output = format_external_prompt(&config, " neon koi ", Some("2:3"), Some("6.1"));
        assert_eq!(output, "/imagine prompt: neon koi --ar 2:3 --v 6.1");

        let square = format_external_prompt(&config, "koi", Some("1:1"), None);
        assert_eq!(square, "/imagine prompt: koi");
    }
}
