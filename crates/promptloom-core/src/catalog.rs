//! Choices offered to users when composing a request.

/// A selectable value with its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub label: &'static str,
    pub value: &'static str,
}

/// Inclusive slider range for a numeric knob. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnobRange {
    pub name: &'static str,
    pub min: u32,
    pub max: u32,
    pub step: u32,
    pub default: u32,
}

pub const ART_STYLES: &[&str] = &[
    "Photorealistic",
    "Oil Painting",
    "Watercolor",
    "Digital Art",
    "3D Render",
    "Anime",
    "Comic Book",
    "Sketch",
    "Abstract",
    "Minimalist",
    "Cyberpunk",
    "Steampunk",
    "Fantasy",
    "Sci-Fi",
    "Vintage",
];

pub const MOODS: &[&str] = &[
    "Dramatic",
    "Peaceful",
    "Energetic",
    "Mysterious",
    "Joyful",
    "Dark",
    "Bright",
    "Melancholic",
    "Epic",
    "Serene",
];

pub const ASPECT_RATIOS: &[Choice] = &[
    Choice { label: "Square (1:1)", value: "1:1" },
    Choice { label: "Portrait (2:3)", value: "2:3" },
    Choice { label: "Portrait (9:16)", value: "9:16" },
    Choice { label: "Landscape (3:2)", value: "3:2" },
    Choice { label: "Landscape (16:9)", value: "16:9" },
    Choice { label: "Ultrawide (21:9)", value: "21:9" },
];

pub const VERSIONS: &[Choice] = &[
    Choice { label: "V7 (Latest)", value: "7" },
    Choice { label: "V6.1", value: "6.1" },
    Choice { label: "V6", value: "6" },
    Choice { label: "V5.2", value: "5.2" },
    Choice { label: "Niji 6", value: "niji 6" },
];

pub const KNOB_RANGES: &[KnobRange] = &[
    KnobRange { name: "stylize", min: 0, max: 1000, step: 10, default: 100 },
    KnobRange { name: "chaos", min: 0, max: 100, step: 5, default: 0 },
    KnobRange { name: "weird", min: 0, max: 3000, step: 100, default: 0 },
    KnobRange { name: "sref_weight", min: 0, max: 1000, step: 10, default: 100 },
];

/// Look up a style by case-insensitive name, returning its canonical spelling.
pub fn find_style(name: &str) -> Option<&'static str> {
    ART_STYLES.iter().copied().find(|s| s.eq_ignore_ascii_case(name.trim()))
}

pub fn find_mood(name: &str) -> Option<&'static str> {
    MOODS.iter().copied().find(|m| m.eq_ignore_ascii_case(name.trim()))
}

pub fn knob_range(name: &str) -> Option<&'static KnobRange> {
    KNOB_RANGES.iter().find(|k| k.name == name)
}
