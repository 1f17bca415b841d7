//! Raw prompt analysis: parameter extraction followed by segment classification.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::classifier::SegmentClassifier;
use crate::params::{parse_parameters, TRUE_SENTINEL};
use crate::types::{AdvancedParams, ParsedPromptAnalysis, PromptRequest};

static COMMAND_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)/imagine\s+prompt:\s*").expect("prefix pattern is valid"));

/// Boilerplate removed before keyword extraction.
static KEYWORD_NOISE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)highly detailed",
        r"(?i)professional quality",
        r"(?i)8k resolution",
        r"(?i)4k resolution",
        r"(?i)ultra detailed",
        r"(?i)masterpiece",
        r"(?i)best quality",
        r"(?i)--ar \d+:\d+",
        r"(?i)--v \d+(\.\d+)?",
        r"(?i)--niji \d+",
        r"(?i)--style \w+",
        r"(?i)--q \d+",
        r"(?i)--s \d+",
        r"(?i)--c \d+",
        r"(?i)/imagine prompt:",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("keyword noise pattern is valid"))
    .collect()
});

/// Analyze `raw` with the default keyword lists and subject threshold.
pub fn analyze_prompt(raw: &str) -> ParsedPromptAnalysis {
    analyze_with(raw, &SegmentClassifier::default())
}

/// Analyze `raw` with a custom classifier.
pub fn analyze_with(raw: &str, classifier: &SegmentClassifier) -> ParsedPromptAnalysis {
    let extraction = parse_parameters(raw);
    let body = COMMAND_PREFIX.replacen(&extraction.residual, 1, "");
    let segments = classifier.classify_text(body.trim());

    ParsedPromptAnalysis {
        subject: segments.subject,
        styles: segments.styles,
        moods: segments.moods,
        parameters: extraction.parameters,
        modifiers: segments.modifiers,
        negatives: extraction.negatives,
    }
}

/// Searchable keywords of a prompt: boilerplate and common flags removed, split on `,`
/// and `;`, segments of 3 to 49 characters kept.
pub fn extract_keywords(prompt: &str) -> Vec<String> {
    let mut cleaned = prompt.to_string();
    for pattern in KEYWORD_NOISE.iter() {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }

    cleaned
        .split([',', ';'])
        .map(str::trim)
        .filter(|k| {
            let len = k.chars().count();
            len > 2 && len < 50
        })
        .map(str::to_string)
        .collect()
}

impl ParsedPromptAnalysis {
    pub fn aspect_ratio(&self) -> Option<&str> {
        self.parameter("ar")
    }

    /// Version in the form accepted by the formatter (`6.1`, `niji 6`, `niji`).
    pub fn version(&self) -> Option<String> {
        if let Some(niji) = self.parameter("niji") {
            return Some(if niji == TRUE_SENTINEL {
                "niji".to_string()
            } else {
                format!("niji {}", niji)
            });
        }
        self.parameter("v").map(str::to_string)
    }

    /// Convert recognized flags back into advanced knobs. Unparsable numbers are skipped.
    pub fn to_advanced_params(&self) -> AdvancedParams {
        AdvancedParams {
            stylize: self.parsed("s"),
            chaos: self.parsed("c"),
            weird: self.parsed("weird"),
            quality: self.parsed("q"),
            seed: self.parsed("seed"),
            stop: self.parsed("stop"),
            tile: self.parameter("tile") == Some(TRUE_SENTINEL),
            negative_prompt_text: self.negatives.join(", "),
            style_reference_code: self.parameter("sref").unwrap_or_default().to_string(),
            style_reference_weight: self.parsed("sw"),
        }
    }

    /// Feed the analysis back into composer input: aspect ratio and version when present,
    /// advanced knobs merged over the existing ones, the subject as the new idea.
    pub fn apply_to(&self, request: &mut PromptRequest) {
        if let Some(aspect_ratio) = self.aspect_ratio() {
            request.aspect_ratio = aspect_ratio.to_string();
        }
        if let Some(version) = self.version() {
            request.version = version;
        }
        request.advanced.merge(&self.to_advanced_params());
        if !self.subject.is_empty() {
            request.idea = self.subject.clone();
        }
    }

    fn parsed<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.parameter(key).and_then(|value| value.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::PromptFormatter;

    #[test]
    fn test_castle_scenario() {
        let analysis =
            analyze_prompt("/imagine prompt: a castle, fantasy, epic, --ar 3:2 --no text, watermark");
        assert_eq!(analysis.negatives, vec!["text", "watermark"]);
        assert_eq!(analysis.parameters.len(), 1);
        assert_eq!(analysis.parameter("ar"), Some("3:2"));
        assert_eq!(analysis.subject, "a castle");
        assert_eq!(analysis.styles, vec!["fantasy"]);
        assert_eq!(analysis.moods, vec!["epic"]);
    }

    #[test]
    fn test_formatted_output_analysis() {
        let request = PromptRequest::new("a red fox in snow")
            .with_style("Sketch")
            .with_aspect_ratio("16:9");
        let output = PromptFormatter::default().format(&request);
        let analysis = analyze_prompt(&output);

        assert_eq!(analysis.subject, "a red fox in snow");
        assert_eq!(analysis.styles, vec!["sketch style"]);
        assert_eq!(
            analysis.modifiers,
            vec!["highly detailed", "professional quality", "8k resolution"]
        );
        assert_eq!(analysis.aspect_ratio(), Some("16:9"));
        assert_eq!(analysis.version().as_deref(), Some("6"));
    }

    #[test]
    fn test_to_advanced_params() {
        let analysis = analyze_prompt(
            "robot --s 300 --c 15 --q 0.5 --seed 99 --tile --sref 42 --sw 80 --stop abc --no rust",
        );
        let params = analysis.to_advanced_params();
        assert_eq!(params.stylize, Some(300));
        assert_eq!(params.chaos, Some(15));
        assert_eq!(params.quality, Some(0.5));
        assert_eq!(params.seed, Some(99));
        assert_eq!(params.stop, None);
        assert!(params.tile);
        assert_eq!(params.style_reference_code, "42");
        assert_eq!(params.style_reference_weight, Some(80));
        assert_eq!(params.negative_prompt_text, "rust");
    }

    #[test]
    fn test_apply_to_request() {
        let analysis = analyze_prompt("a koi pond at night, serene --ar 2:3 --niji 6 --c 10");
        let mut request = PromptRequest::new("old idea").with_advanced(AdvancedParams {
            stylize: Some(500),
            ..Default::default()
        });
        analysis.apply_to(&mut request);

        assert_eq!(request.idea, "a koi pond at night");
        assert_eq!(request.aspect_ratio, "2:3");
        assert_eq!(request.version, "niji 6");
        assert_eq!(request.advanced.stylize, Some(500));
        assert_eq!(request.advanced.chaos, Some(10));
    }

    #[test]
    fn test_empty_input() {
        let analysis = analyze_prompt("   ");
        assert!(analysis.is_empty());
    }

    #[test]
    fn test_extract_keywords() {
        let keywords = extract_keywords(
            "/imagine prompt: a misty forest, highly detailed, oil painting; ok --ar 16:9 --v 6",
        );
        assert_eq!(keywords, vec!["a misty forest", "oil painting"]);
    }
}
