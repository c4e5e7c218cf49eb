#![forbid(unsafe_code)]

//! Fetches a GitHub profile and renders it as a self-contained SVG card.
//!
//! The pipeline has three stages: [`fetch_snapshot`] gathers upstream data through an
//! [`Upstream`], [`CardSnapshot::stats`] derives the displayed figures, and
//! [`CardSnapshot::render_svg`] lays out and encodes the document. [`render_card`] runs all of
//! them for one request.

pub mod error;
pub mod github;
pub mod languages;
#[cfg(feature = "raster")]
pub mod raster;
pub mod snapshot;
pub mod upstream;

pub use error::{CardError, Result};
pub use github::{DEFAULT_API_BASE, GithubClient};
pub use gitcard_core::{CardConfig, CardStats};
pub use gitcard_render::EmbeddedImage;
pub use languages::fetch_language_maps;
pub use snapshot::{CardSnapshot, fetch_snapshot};
pub use upstream::Upstream;

use chrono::Utc;

/// Fetches `login` and renders the finished SVG document.
pub async fn render_card(
    upstream: &dyn Upstream,
    login: &str,
    config: &CardConfig,
    mascot: Option<&EmbeddedImage>,
) -> Result<String> {
    let snapshot = fetch_snapshot(upstream, login).await?;
    snapshot.render_svg(config, mascot, Utc::now())
}
