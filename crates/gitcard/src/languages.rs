use crate::upstream::Upstream;
use futures::future::join_all;
use gitcard_core::{LanguageBytes, Repository};
use indexmap::IndexMap;

/// Fetches the language breakdown of every repository concurrently.
///
/// The result is keyed by repository name in repository-list order, whatever order the requests
/// complete in. A failed request is logged and recorded as an empty map, so one broken
/// repository never fails the card. Repositories without a `languages_url` are not requested.
pub async fn fetch_language_maps(
    upstream: &dyn Upstream,
    repositories: &[Repository],
) -> IndexMap<String, LanguageBytes> {
    let requests = repositories.iter().map(|repo| async move {
        if repo.languages_url.trim().is_empty() {
            return LanguageBytes::new();
        }
        match upstream.languages(repo).await {
            Ok(map) => map,
            Err(err) => {
                tracing::warn!(repository = %repo.name, error = %err, "language fetch failed; counting no bytes");
                LanguageBytes::new()
            }
        }
    });
    let maps = join_all(requests).await;

    repositories
        .iter()
        .map(|repo| repo.name.clone())
        .zip(maps)
        .collect()
}
