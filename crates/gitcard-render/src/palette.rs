//! Static language colors (GitHub linguist values for the common languages).

pub const FALLBACK_LANGUAGE_COLOR: &str = "#ccc";

const LANGUAGE_COLORS: &[(&str, &str)] = &[
    ("JavaScript", "#f1e05a"),
    ("TypeScript", "#2b7489"),
    ("Python", "#3572A5"),
    ("C#", "#178600"),
    ("HTML", "#e34c26"),
    ("CSS", "#563d7c"),
    ("Shell", "#89e051"),
];

/// Bar color for a language; unknown languages get a neutral gray.
pub fn language_color(language: &str) -> &'static str {
    LANGUAGE_COLORS
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_LANGUAGE_COLOR)
}
