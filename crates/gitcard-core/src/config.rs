use crate::{Error, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_AVATAR_BACKGROUND_OPACITY: f64 = 0.05;

/// Fill colors for every text role on the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextColors {
    pub name: String,
    pub title: String,
    pub stats: String,
    pub section_title: String,
    pub language_text: String,
    pub repo_name: String,
    pub repo_description: String,
    pub repo_stats: String,
}

impl Default for TextColors {
    fn default() -> Self {
        Self {
            name: "#4B8B9B".to_string(),
            title: "#AB83CD".to_string(),
            stats: "#B0C4DE".to_string(),
            section_title: "#6A5ACD".to_string(),
            language_text: "#B0C4DE".to_string(),
            repo_name: "#b8bb26".to_string(),
            repo_description: "#ebdbb2".to_string(),
            repo_stats: "#d3869b".to_string(),
        }
    }
}

/// Display options for one card. Resolved once and treated as read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardConfig {
    pub colors: TextColors,
    pub show_mascot: bool,
    pub show_avatar_background: bool,
    pub avatar_background_opacity: f64,
    pub background_image_url: Option<String>,
    /// Overrides the profile's own `html_url` for the GitHub icon.
    pub github_link: Option<String>,
    pub website_link: Option<String>,
    pub email_link: Option<String>,
    /// When false, `bio` is shown instead of the profile bio.
    pub use_github_bio: bool,
    pub bio: Option<String>,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            colors: TextColors::default(),
            show_mascot: true,
            show_avatar_background: true,
            avatar_background_opacity: DEFAULT_AVATAR_BACKGROUND_OPACITY,
            background_image_url: None,
            github_link: None,
            website_link: None,
            email_link: None,
            use_github_bio: false,
            bio: None,
        }
    }
}

impl CardConfig {
    /// Reads the card options from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves options through an arbitrary key lookup; missing keys keep their defaults.
    ///
    /// Toggles follow the historical deployment semantics: the mascot and the avatar background
    /// are on unless set to the literal `false`, and the GitHub bio is used only when
    /// `USE_GITHUB_BIO` is the literal `true`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let defaults = TextColors::default();

        let color = |key: &'static str, role: &'static str, default: String| -> Result<String> {
            match non_empty(key) {
                Some(value) => validate_color(role, value),
                None => Ok(default),
            }
        };

        let colors = TextColors {
            name: color("NAME_FILL_COLOR", "name", defaults.name)?,
            title: color("TITLE_FILL_COLOR", "title", defaults.title)?,
            stats: color("STATS_FILL_COLOR", "stats", defaults.stats)?,
            section_title: color(
                "SECTION_TITLE_FILL_COLOR",
                "section title",
                defaults.section_title,
            )?,
            language_text: color("LANGUAGE_TEXT_COLOR", "language text", defaults.language_text)?,
            repo_name: color("REPO_NAME_COLOR", "repository name", defaults.repo_name)?,
            repo_description: color(
                "REPO_DESC_COLOR",
                "repository description",
                defaults.repo_description,
            )?,
            repo_stats: color("REPO_STATS_COLOR", "repository stats", defaults.repo_stats)?,
        };

        Ok(Self {
            colors,
            show_mascot: lookup("SHOW_NESSIE_IMAGE").as_deref() != Some("false"),
            show_avatar_background: lookup("SHOW_AVATAR_BACKGROUND").as_deref() != Some("false"),
            avatar_background_opacity: parse_opacity(lookup("AVATAR_BACKGROUND_OPACITY").as_deref()),
            background_image_url: non_empty("BACKGROUND_IMAGE_URL"),
            github_link: non_empty("GITHUB_LINK"),
            website_link: non_empty("WEBSITE_LINK"),
            email_link: non_empty("EMAIL_LINK"),
            use_github_bio: lookup("USE_GITHUB_BIO").as_deref() == Some("true"),
            bio: non_empty("BIO"),
        })
    }
}

/// Zero, negative or unparsable values fall back to the default; the rest is clamped to 1.
fn parse_opacity(raw: Option<&str>) -> f64 {
    match raw.map(str::trim).and_then(|v| v.parse::<f64>().ok()) {
        Some(v) if v.is_finite() && v > 0.0 => v.min(1.0),
        _ => DEFAULT_AVATAR_BACKGROUND_OPACITY,
    }
}

/// Colors end up inside a `<style>` block, so anything that could close a declaration is
/// rejected.
fn validate_color(role: &'static str, value: String) -> Result<String> {
    let trimmed = value.trim();
    let ok = !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | ' '));
    if ok {
        Ok(trimmed.to_string())
    } else {
        Err(Error::InvalidColor { role, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolve(pairs: &[(&str, &str)]) -> Result<CardConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CardConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_lookup_yields_defaults() {
        let config = resolve(&[]).expect("config");
        assert_eq!(config, CardConfig::default());
        assert!(config.show_mascot);
        assert!(config.show_avatar_background);
        assert!(!config.use_github_bio);
    }

    #[test]
    fn toggles_use_literal_values() {
        let config = resolve(&[
            ("SHOW_NESSIE_IMAGE", "false"),
            ("SHOW_AVATAR_BACKGROUND", "no"),
            ("USE_GITHUB_BIO", "TRUE"),
        ])
        .expect("config");
        assert!(!config.show_mascot);
        assert!(config.show_avatar_background);
        assert!(!config.use_github_bio);

        let config = resolve(&[("USE_GITHUB_BIO", "true")]).expect("config");
        assert!(config.use_github_bio);
    }

    #[test]
    fn opacity_falls_back_and_clamps() {
        let opacity = |raw: &str| {
            resolve(&[("AVATAR_BACKGROUND_OPACITY", raw)])
                .expect("config")
                .avatar_background_opacity
        };
        assert_eq!(opacity("0.2"), 0.2);
        assert_eq!(opacity("0"), DEFAULT_AVATAR_BACKGROUND_OPACITY);
        assert_eq!(opacity("abc"), DEFAULT_AVATAR_BACKGROUND_OPACITY);
        assert_eq!(opacity("-1"), DEFAULT_AVATAR_BACKGROUND_OPACITY);
        assert_eq!(opacity("7"), 1.0);
    }

    #[test]
    fn empty_links_are_unset() {
        let config = resolve(&[("WEBSITE_LINK", ""), ("EMAIL_LINK", "mailto:me@example.com")])
            .expect("config");
        assert_eq!(config.website_link, None);
        assert_eq!(config.email_link.as_deref(), Some("mailto:me@example.com"));
    }

    #[test]
    fn color_overrides_are_validated() {
        let config = resolve(&[("NAME_FILL_COLOR", "rgb(1, 2, 3)")]).expect("config");
        assert_eq!(config.colors.name, "rgb(1, 2, 3)");

        let err = resolve(&[("STATS_FILL_COLOR", "red;} svg { display:none")]).unwrap_err();
        assert!(matches!(err, Error::InvalidColor { role: "stats", .. }));
    }
}
