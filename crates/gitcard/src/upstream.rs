use crate::Result;
use async_trait::async_trait;
use gitcard_core::{ActivityEvent, LanguageBytes, Profile, Repository};
use gitcard_render::EmbeddedImage;

/// Read access to the profile API.
///
/// Every call is a single attempt; implementations must not retry. Errors from
/// [`Upstream::languages`] are tolerated by the caller, every other error aborts the card.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn profile(&self, login: &str) -> Result<Profile>;

    async fn repositories(&self, login: &str) -> Result<Vec<Repository>>;

    async fn events(&self, login: &str) -> Result<Vec<ActivityEvent>>;

    async fn avatar(&self, avatar_url: &str) -> Result<EmbeddedImage>;

    async fn languages(&self, repository: &Repository) -> Result<LanguageBytes>;
}
