//! Extraction of `--name value` flags from raw prompt text.
//!
//! The negative list (`--no a, b`) is pulled out first because its value runs up to the next
//! `--` token and may contain commas and spaces that would otherwise look like segment or
//! flag boundaries. Every other recognized flag is then matched against the remaining text.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Stored value for flags that carry no value, such as `--tile`.
pub const TRUE_SENTINEL: &str = "true";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParamKind {
    /// `--name value`, value is a run of non-whitespace, non-dash characters.
    Value,
    /// `--name` with no value.
    Flag,
    /// `--name` optionally followed by a numeric version.
    OptionalNumber,
}

#[derive(Debug)]
struct ParamSpec {
    /// Key stored in the parameter map.
    key: &'static str,
    /// Spellings accepted after `--`, longest first.
    aliases: &'static [&'static str],
    kind: ParamKind,
}

const PARAM_SPECS: &[ParamSpec] = &[
    ParamSpec { key: "ar", aliases: &["aspect", "ar"], kind: ParamKind::Value },
    ParamSpec { key: "v", aliases: &["version", "v"], kind: ParamKind::Value },
    ParamSpec { key: "s", aliases: &["stylize", "s"], kind: ParamKind::Value },
    ParamSpec { key: "c", aliases: &["chaos", "c"], kind: ParamKind::Value },
    ParamSpec { key: "q", aliases: &["quality", "q"], kind: ParamKind::Value },
    ParamSpec { key: "weird", aliases: &["weird", "w"], kind: ParamKind::Value },
    ParamSpec { key: "seed", aliases: &["seed"], kind: ParamKind::Value },
    ParamSpec { key: "stop", aliases: &["stop"], kind: ParamKind::Value },
    ParamSpec { key: "sref", aliases: &["sref"], kind: ParamKind::Value },
    ParamSpec { key: "sw", aliases: &["sw"], kind: ParamKind::Value },
    ParamSpec { key: "cref", aliases: &["cref"], kind: ParamKind::Value },
    ParamSpec { key: "cw", aliases: &["cw"], kind: ParamKind::Value },
    ParamSpec { key: "iw", aliases: &["iw"], kind: ParamKind::Value },
    ParamSpec { key: "style", aliases: &["style"], kind: ParamKind::Value },
    ParamSpec { key: "tile", aliases: &["tile"], kind: ParamKind::Flag },
    ParamSpec { key: "niji", aliases: &["niji"], kind: ParamKind::OptionalNumber },
];

static NEGATIVE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    // value stops before the next `--`; a lone trailing `-` still belongs to it
    Regex::new(r"(?i)--no\b(?:\s+((?:[^-]|-[^-])*(?:-\z)?))?")
        .expect("negative prompt pattern is valid")
});

static PARAM_PATTERNS: Lazy<Vec<(&'static ParamSpec, Regex)>> = Lazy::new(|| {
    PARAM_SPECS
        .iter()
        .map(|spec| {
            let names = spec.aliases.join("|");
            let pattern = match spec.kind {
                ParamKind::Value => format!(r"(?i)--(?:{})\s+([^\s-]+)", names),
                ParamKind::Flag => format!(r"(?i)--(?:{})\b", names),
                ParamKind::OptionalNumber => {
                    format!(r"(?i)--(?:{})\b(?:\s+(\d+(?:\.\d+)?))?", names)
                }
            };
            let regex = Regex::new(&pattern).expect("parameter pattern is valid");
            (spec, regex)
        })
        .collect()
});

/// Output of [`parse_parameters`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterExtraction {
    /// Recognized flags keyed by their short name (`ar`, `v`, `s`, `seed`, ...).
    pub parameters: BTreeMap<String, String>,
    /// Items of the last `--no` list, trimmed, empty items dropped.
    pub negatives: Vec<String>,
    /// Input text with every recognized token removed and whitespace collapsed.
    pub residual: String,
}

/// Extract recognized flags and the negative list from `input`.
///
/// When a flag occurs more than once the last occurrence wins. Absent flags are simply
/// absent from the map.
pub fn parse_parameters(input: &str) -> ParameterExtraction {
    let mut extraction = ParameterExtraction::default();

    if let Some(captures) = NEGATIVE_PATTERN.captures_iter(input).last() {
        let value = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
        extraction.negatives = split_list(value);
    }
    let mut text = NEGATIVE_PATTERN.replace_all(input, " ").into_owned();

    for (spec, regex) in PARAM_PATTERNS.iter() {
        let value = match regex.captures_iter(&text).last() {
            None => continue,
            Some(_) if spec.kind == ParamKind::Flag => TRUE_SENTINEL.to_string(),
            Some(captures) => captures
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| TRUE_SENTINEL.to_string()),
        };
        extraction.parameters.insert(spec.key.to_string(), value);
        text = regex.replace_all(&text, " ").into_owned();
    }

    extraction.residual = collapse_whitespace(&text);
    tracing::trace!(
        parameters = extraction.parameters.len(),
        negatives = extraction.negatives.len(),
        "extracted prompt parameters"
    );
    extraction
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
