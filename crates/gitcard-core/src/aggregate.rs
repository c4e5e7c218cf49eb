//! Pure derivations from fetched upstream data.
//!
//! Percentages are computed in integer basis points (hundredths of a percent) and rounded with
//! the largest-remainder method: every share is floored, then the leftover hundredths go to the
//! shares with the largest remainders. Each value lands on the nearest hundredth and the
//! displayed shares never sum to more than 100.

use crate::models::{ActivityEvent, LanguageBytes, Profile, Repository};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

pub const TOP_LANGUAGES: usize = 5;
pub const TOP_REPOSITORIES: usize = 4;
pub const ACTIVITY_WINDOW_DAYS: i64 = 365;
pub const DESCRIPTION_MAX_CHARS: usize = 60;

const ELLIPSIS: &str = "...";
const BASIS_POINTS_PER_WHOLE: u128 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedLanguage {
    pub name: String,
    /// Share of the aggregate byte total in hundredths of a percent (`5000` is 50.00%).
    pub basis_points: u32,
}

impl RankedLanguage {
    pub fn percentage(&self) -> f64 {
        f64::from(self.basis_points) / 100.0
    }

    /// Two-decimal rendering, e.g. `"50.00"`.
    pub fn percentage_label(&self) -> String {
        format!("{}.{:02}", self.basis_points / 100, self.basis_points % 100)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedRepository {
    pub name: String,
    /// Already truncated; empty when the repository has no description.
    pub description: String,
    pub stars: u64,
    pub forks: u64,
    pub html_url: String,
}

/// Everything the layout composer needs, derived from one fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardStats {
    pub languages: Vec<RankedLanguage>,
    pub top_repositories: Vec<RankedRepository>,
    pub contributions_last_year: usize,
    pub followers: u64,
    pub following: u64,
    pub public_repos: u64,
    pub public_gists: u64,
}

impl CardStats {
    pub fn derive(
        profile: &Profile,
        repositories: &[Repository],
        events: &[ActivityEvent],
        languages: &LanguageBytes,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            languages: rank_languages(languages),
            top_repositories: top_repositories(repositories),
            contributions_last_year: count_recent_activity(events, now),
            followers: profile.followers,
            following: profile.following,
            public_repos: profile.public_repos,
            public_gists: profile.public_gists,
        }
    }
}

/// Folds per-repository language maps into one aggregate, adding bytes per key.
///
/// Keys keep the order in which they are first seen while walking `maps` in order, which makes
/// the result independent of the order the underlying fetches completed in.
pub fn merge_language_maps<'a, I>(maps: I) -> LanguageBytes
where
    I: IntoIterator<Item = &'a LanguageBytes>,
{
    maps.into_iter().fold(LanguageBytes::new(), |mut acc, map| {
        for (lang, bytes) in map {
            let slot = acc.entry(lang.clone()).or_insert(0);
            *slot = slot.saturating_add(*bytes);
        }
        acc
    })
}

/// Top languages by byte share, highest first. Empty when no bytes were recorded.
pub fn rank_languages(totals: &LanguageBytes) -> Vec<RankedLanguage> {
    let total: u128 = totals.values().map(|&b| u128::from(b)).sum();
    if total == 0 {
        tracing::debug!(languages = totals.len(), "no language bytes; skipping ranking");
        return Vec::new();
    }

    let mut shares: Vec<(&String, u64, u128, u128)> = totals
        .iter()
        .map(|(name, &bytes)| {
            let scaled = u128::from(bytes) * BASIS_POINTS_PER_WHOLE;
            (name, bytes, scaled / total, scaled % total)
        })
        .collect();

    let floored: u128 = shares.iter().map(|&(_, _, bp, _)| bp).sum();
    let leftover = usize::try_from(BASIS_POINTS_PER_WHOLE.saturating_sub(floored)).unwrap_or(0);
    let mut by_remainder: Vec<usize> = (0..shares.len()).collect();
    // Stable: equal remainders favour the first-encountered language.
    by_remainder.sort_by(|&a, &b| shares[b].3.cmp(&shares[a].3));
    for &i in by_remainder.iter().take(leftover) {
        shares[i].2 += 1;
    }

    // `sort_by` is stable: equal byte counts keep first-encountered order.
    shares.sort_by(|a, b| b.1.cmp(&a.1));
    shares
        .into_iter()
        .take(TOP_LANGUAGES)
        .map(|(name, _, bp, _)| RankedLanguage {
            name: name.clone(),
            basis_points: u32::try_from(bp).unwrap_or(u32::MAX),
        })
        .collect()
}

/// Most-starred non-fork repositories, highest first.
pub fn top_repositories(repositories: &[Repository]) -> Vec<RankedRepository> {
    let mut own: Vec<&Repository> = repositories.iter().filter(|r| !r.fork).collect();
    own.sort_by(|a, b| b.stars.cmp(&a.stars));
    own.into_iter()
        .take(TOP_REPOSITORIES)
        .map(|r| RankedRepository {
            name: r.name.clone(),
            description: truncate_description(r.description.as_deref()),
            stars: r.stars,
            forks: r.forks,
            html_url: r.html_url.clone(),
        })
        .collect()
}

/// Number of events at or after `now - 365 days`.
pub fn count_recent_activity(events: &[ActivityEvent], now: DateTime<Utc>) -> usize {
    let cutoff = now - Duration::days(ACTIVITY_WINDOW_DAYS);
    events.iter().filter(|e| e.created_at >= cutoff).count()
}

/// Cuts descriptions longer than 60 characters to 57 characters plus `...`.
pub fn truncate_description(description: Option<&str>) -> String {
    let Some(text) = description else {
        return String::new();
    };
    if text.chars().count() <= DESCRIPTION_MAX_CHARS {
        return text.to_string();
    }
    let keep = DESCRIPTION_MAX_CHARS - ELLIPSIS.len();
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bytes(pairs: &[(&str, u64)]) -> LanguageBytes {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn repo(name: &str, stars: u64, fork: bool) -> Repository {
        Repository {
            name: name.to_string(),
            stars,
            fork,
            ..Default::default()
        }
    }

    #[test]
    fn merge_adds_bytes_per_language() {
        let maps = [
            bytes(&[("JavaScript", 800)]),
            bytes(&[("JavaScript", 200), ("TypeScript", 1000)]),
            LanguageBytes::new(),
        ];
        let merged = merge_language_maps(&maps);
        assert_eq!(merged, bytes(&[("JavaScript", 1000), ("TypeScript", 1000)]));
    }

    #[test]
    fn merge_is_order_independent_in_totals() {
        let a = bytes(&[("Rust", 3), ("C", 1)]);
        let b = bytes(&[("C", 4), ("Go", 2)]);
        let ab = merge_language_maps([&a, &b]);
        let ba = merge_language_maps([&b, &a]);
        for (lang, total) in &ab {
            assert_eq!(ba.get(lang), Some(total));
        }
        assert_eq!(ab.len(), ba.len());
    }

    #[test]
    fn equal_shares_keep_encounter_order() {
        let ranked = rank_languages(&bytes(&[("JavaScript", 1000), ("TypeScript", 1000)]));
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].name, "JavaScript");
        assert_eq!(ranked[1].name, "TypeScript");
        assert_eq!(ranked[0].percentage_label(), "50.00");
        assert_eq!(ranked[1].percentage_label(), "50.00");
    }

    #[test]
    fn ranking_keeps_top_five_descending() {
        let ranked = rank_languages(&bytes(&[
            ("A", 1),
            ("B", 6),
            ("C", 3),
            ("D", 5),
            ("E", 2),
            ("F", 4),
        ]));
        let names: Vec<&str> = ranked.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["B", "D", "F", "C", "E"]);
    }

    #[test]
    fn displayed_shares_stay_within_bounds() {
        let cases = [
            bytes(&[("A", 1), ("B", 1), ("C", 1)]),
            bytes(&[("A", 2), ("B", 2), ("C", 2), ("D", 1), ("E", 1), ("F", 1)]),
            bytes(&[("A", u64::MAX), ("B", u64::MAX)]),
            bytes(&[("A", 1), ("B", 999_999)]),
        ];
        for totals in &cases {
            let ranked = rank_languages(totals);
            let sum: u32 = ranked.iter().map(|l| l.basis_points).sum();
            assert!(sum <= 10_000, "sum {sum} exceeds 100% for {totals:?}");
            for l in &ranked {
                assert!((0.0..=100.0).contains(&l.percentage()));
            }
        }
    }

    #[test]
    fn shares_round_to_nearest_hundredth() {
        let ranked = rank_languages(&bytes(&[("A", 2), ("B", 1)]));
        let labels: Vec<String> = ranked.iter().map(|l| l.percentage_label()).collect();
        assert_eq!(labels, ["66.67", "33.33"]);

        let ranked = rank_languages(&bytes(&[("A", 99_999), ("B", 1)]));
        let labels: Vec<String> = ranked.iter().map(|l| l.percentage_label()).collect();
        assert_eq!(labels, ["100.00", "0.00"]);
    }

    #[test]
    fn leftover_hundredths_go_to_largest_remainders() {
        // 1/7 = 14.2857.., 2/7 = 28.5714.., 4/7 = 57.1428..
        let ranked = rank_languages(&bytes(&[("A", 1), ("B", 2), ("C", 4)]));
        let labels: Vec<(&str, String)> = ranked
            .iter()
            .map(|l| (l.name.as_str(), l.percentage_label()))
            .collect();
        assert_eq!(
            labels,
            [
                ("C", "57.14".to_string()),
                ("B", "28.57".to_string()),
                ("A", "14.29".to_string()),
            ]
        );
        let sum: u32 = ranked.iter().map(|l| l.basis_points).sum();
        assert_eq!(sum, 10_000);
    }

    #[test]
    fn zero_total_yields_no_languages() {
        assert!(rank_languages(&LanguageBytes::new()).is_empty());
        assert!(rank_languages(&bytes(&[("Rust", 0), ("C", 0)])).is_empty());
    }

    #[test]
    fn percentage_label_pads_fraction() {
        let l = RankedLanguage {
            name: "Rust".to_string(),
            basis_points: 705,
        };
        assert_eq!(l.percentage_label(), "7.05");
        assert_eq!(l.percentage(), 7.05);
    }

    #[test]
    fn forks_never_reach_top_repositories() {
        let repos = [
            repo("fork-of-famous", 10_000, true),
            repo("a", 5, false),
            repo("b", 50, false),
            repo("c", 1, false),
            repo("d", 20, false),
            repo("e", 0, false),
        ];
        let top = top_repositories(&repos);
        let names: Vec<&str> = top.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["b", "d", "a", "c"]);
    }

    #[test]
    fn activity_window_is_inclusive_at_one_year() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let at = |days: i64| ActivityEvent {
            created_at: now - Duration::days(days),
        };
        let events = [at(0), at(364), at(365), at(366)];
        assert_eq!(count_recent_activity(&events, now), 3);
        assert_eq!(count_recent_activity(&[at(366)], now), 0);
        assert_eq!(count_recent_activity(&[at(364)], now), 1);
    }

    #[test]
    fn truncation_boundaries() {
        let sixty = "x".repeat(60);
        assert_eq!(truncate_description(Some(&sixty)), sixty);

        let sixty_one = "y".repeat(61);
        let cut = truncate_description(Some(&sixty_one));
        assert_eq!(cut.chars().count(), 60);
        assert!(cut.ends_with("..."));
        assert_eq!(&cut[..57], &sixty_one[..57]);

        assert_eq!(truncate_description(None), "");
        assert_eq!(truncate_description(Some("")), "");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "é".repeat(61);
        let cut = truncate_description(Some(&text));
        assert_eq!(cut.chars().count(), 60);
        assert!(cut.starts_with("ééé"));
    }
}
