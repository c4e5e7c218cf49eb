use crate::languages::fetch_language_maps;
use crate::upstream::Upstream;
use crate::Result;
use chrono::{DateTime, Utc};
use gitcard_core::{
    ActivityEvent, CardConfig, CardStats, LanguageBytes, Profile, Repository, merge_language_maps,
};
use gitcard_render::{CardInput, CardLayout, EmbeddedImage, layout_card, render_card_svg};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Everything fetched for one card, before any derivation.
///
/// Snapshots serialize to JSON so that a card can be re-rendered offline from a recorded fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSnapshot {
    pub profile: Profile,
    pub repositories: Vec<Repository>,
    pub events: Vec<ActivityEvent>,
    /// Per-repository language bytes, keyed by repository name in repository-list order.
    pub languages: IndexMap<String, LanguageBytes>,
    pub avatar: EmbeddedImage,
}

impl CardSnapshot {
    pub fn aggregate_languages(&self) -> LanguageBytes {
        merge_language_maps(self.languages.values())
    }

    pub fn stats(&self, now: DateTime<Utc>) -> CardStats {
        CardStats::derive(
            &self.profile,
            &self.repositories,
            &self.events,
            &self.aggregate_languages(),
            now,
        )
    }

    pub fn layout(
        &self,
        config: &CardConfig,
        mascot: Option<&EmbeddedImage>,
        now: DateTime<Utc>,
    ) -> Result<CardLayout> {
        let stats = self.stats(now);
        let input = CardInput {
            profile: &self.profile,
            stats: &stats,
            avatar: &self.avatar,
            mascot,
        };
        Ok(layout_card(&input, config)?)
    }

    pub fn render_svg(
        &self,
        config: &CardConfig,
        mascot: Option<&EmbeddedImage>,
        now: DateTime<Utc>,
    ) -> Result<String> {
        let layout = self.layout(config, mascot, now)?;
        Ok(render_card_svg(&layout))
    }
}

/// Runs the fetch phase for `login`.
///
/// Profile, repositories and events are requested concurrently and the first failure aborts the
/// whole fetch. The avatar depends on the profile and is fetched next; its failure is fatal as
/// well. Language lookups run last and tolerate per-repository failures.
pub async fn fetch_snapshot(upstream: &dyn Upstream, login: &str) -> Result<CardSnapshot> {
    let started = Instant::now();
    let (profile, repositories, events) = futures::try_join!(
        upstream.profile(login),
        upstream.repositories(login),
        upstream.events(login)
    )?;
    tracing::debug!(
        login,
        repositories = repositories.len(),
        events = events.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "fetched profile data"
    );

    let avatar = upstream.avatar(&profile.avatar_url).await?;
    let languages = fetch_language_maps(upstream, &repositories).await;
    tracing::debug!(
        login,
        avatar_bytes = avatar.bytes.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "fetched avatar and languages"
    );

    Ok(CardSnapshot {
        profile,
        repositories,
        events,
        languages,
        avatar,
    })
}
