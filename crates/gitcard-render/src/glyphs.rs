//! Stroke icons (Feather icon set, 24x24 view box).

use serde::{Deserialize, Serialize};

pub const GLYPH_VIEW_BOX: f64 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Glyph {
    Github,
    Website,
    Email,
    ArrowDown,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GlyphShape {
    Path(&'static str),
    Circle { cx: f64, cy: f64, r: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    Polyline(&'static str),
}

const GITHUB: &[GlyphShape] = &[GlyphShape::Path(
    "M9 19c-5 1.5-5-2.5-7-3m14 6v-3.87a3.37 3.37 0 0 0-.94-2.61c3.14-.35 6.44-1.54 6.44-7A5.44 5.44 0 0 0 20 4.77A5.07 5.07 0 0 0 19.91 1S18.73.65 16 2.48a13.38 13.38 0 0 0-7 0C6.27.65 5.09 1 5.09 1A5.07 5.07 0 0 0 5 4.77a5.44 5.44 0 0 0-1.5 3.78c0 5.42 3.3 6.61 6.44 7A3.37 3.37 0 0 0 9 18.13V22",
)];

const WEBSITE: &[GlyphShape] = &[
    GlyphShape::Circle {
        cx: 12.0,
        cy: 12.0,
        r: 10.0,
    },
    GlyphShape::Line {
        x1: 2.0,
        y1: 12.0,
        x2: 22.0,
        y2: 12.0,
    },
    GlyphShape::Path(
        "M12 2a15.3 15.3 0 0 1 4 10 15.3 15.3 0 0 1-4 10 15.3 15.3 0 0 1-4-10 15.3 15.3 0 0 1 4-10z",
    ),
];

const EMAIL: &[GlyphShape] = &[
    GlyphShape::Path(
        "M4 4h16c1.1 0 2 .9 2 2v12c0 1.1-.9 2-2 2H4c-1.1 0-2-.9-2-2V6c0-1.1.9-2 2-2z",
    ),
    GlyphShape::Polyline("22,6 12,13 2,6"),
];

const ARROW_DOWN: &[GlyphShape] = &[
    GlyphShape::Line {
        x1: 12.0,
        y1: 5.0,
        x2: 12.0,
        y2: 19.0,
    },
    GlyphShape::Polyline("19 12 12 19 5 12"),
];

impl Glyph {
    pub fn shapes(self) -> &'static [GlyphShape] {
        match self {
            Self::Github => GITHUB,
            Self::Website => WEBSITE,
            Self::Email => EMAIL,
            Self::ArrowDown => ARROW_DOWN,
        }
    }
}
