#![forbid(unsafe_code)]

//! Turns aggregated profile statistics into positioned primitives and serializes them as a
//! self-contained SVG document.

pub mod glyphs;
pub mod layout;
pub mod model;
pub mod palette;
pub mod svg;

pub use layout::{CANVAS_HEIGHT, CANVAS_WIDTH, CardInput, layout_card};
pub use model::{CardLayout, EmbeddedImage, Primitive};
pub use svg::render_card_svg;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("opacity must be a finite value in [0, 1], got {value}")]
    InvalidOpacity { value: f64 },
    #[error("embedded image has an invalid MIME type: {mime:?}")]
    InvalidMimeType { mime: String },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Lays out and encodes a card in one call.
pub fn render_svg(input: &CardInput<'_>, config: &gitcard_core::CardConfig) -> Result<String> {
    let layout = layout_card(input, config)?;
    Ok(render_card_svg(&layout))
}
