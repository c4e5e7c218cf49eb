use crate::glyphs::Glyph;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A binary image embedded into the document as a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedImage {
    pub mime: String,
    #[serde(with = "base64_bytes")]
    pub bytes: Arc<[u8]>,
}

impl EmbeddedImage {
    /// Builds an image from a `Content-Type` value; parameters such as `; charset=...` are
    /// dropped and an empty type falls back to `image/png`.
    pub fn new(content_type: Option<&str>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let mime = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|m| m.trim().to_ascii_lowercase())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "image/png".to_string());
        Self {
            mime,
            bytes: bytes.into(),
        }
    }

    pub fn png(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::new(Some("image/png"), bytes)
    }

    /// `type/subtype` made only of token characters.
    pub fn has_valid_mime(&self) -> bool {
        let Some((ty, sub)) = self.mime.split_once('/') else {
            return false;
        };
        let token = |s: &str| {
            !s.is_empty()
                && s.chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-'))
        };
        token(ty) && token(sub)
    }
}

mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::sync::Arc;

    pub fn serialize<S: Serializer>(bytes: &Arc<[u8]>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Arc<[u8]>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map(Arc::from)
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientStop {
    /// Percent along the gradient vector.
    pub offset: f64,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearGradient {
    pub id: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stops: Vec<GradientStop>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextClass {
    Name,
    Title,
    Stats,
    SectionTitle,
}

impl TextClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Title => "title",
            Self::Stats => "stats",
            Self::SectionTitle => "section-title",
        }
    }
}

/// One rule of the document stylesheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassStyle {
    pub class: TextClass,
    pub font: String,
    pub fill: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Paint {
    Color(String),
    Gradient(String),
    Transparent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
    pub fill: Paint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextStyle {
    Class { class: TextClass },
    Inline { font_size: f64, fill: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextPrimitive {
    pub x: f64,
    pub y: f64,
    /// Raw text; escaped when the document is written.
    pub text: String,
    pub style: TextStyle,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ImageSource {
    Embedded(EmbeddedImage),
    External(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagePrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub source: ImageSource,
    pub opacity: Option<f64>,
    /// Scale to cover the box (`xMidYMid slice`) instead of the default fit.
    pub cover: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconPrimitive {
    pub glyph: Glyph,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub stroke: String,
    pub link: Option<String>,
    /// Extra clickable margin around the glyph; only meaningful with a link.
    pub hit_padding: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    Rect(RectPrimitive),
    Text(TextPrimitive),
    Image(ImagePrimitive),
    Icon(IconPrimitive),
}

/// The composed card. `primitives` is in paint order: later entries are drawn on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardLayout {
    pub width: f64,
    pub height: f64,
    pub gradients: Vec<LinearGradient>,
    pub styles: Vec<ClassStyle>,
    pub primitives: Vec<Primitive>,
}

impl CardLayout {
    pub fn icons(&self) -> impl Iterator<Item = &IconPrimitive> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Icon(icon) => Some(icon),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextPrimitive> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Text(text) => Some(text),
            _ => None,
        })
    }
}
