use crate::glyphs::{GLYPH_VIEW_BOX, Glyph};
use crate::model::{
    CardLayout, ClassStyle, EmbeddedImage, GradientStop, IconPrimitive, ImagePrimitive,
    ImageSource, LinearGradient, Paint, Primitive, RectPrimitive, TextClass, TextPrimitive,
    TextStyle,
};
use crate::palette::language_color;
use crate::{Error, Result};
use gitcard_core::{CardConfig, CardStats, Profile};

pub const CANVAS_WIDTH: f64 = 900.0;
pub const CANVAS_HEIGHT: f64 = 600.0;

const BACKGROUND_GRADIENT_ID: &str = "bgGradient";
const BACKGROUND_IMAGE_OPACITY: f64 = 0.3;

const LEFT_COLUMN_X: f64 = 60.0;
const RIGHT_COLUMN_X: f64 = 400.0;

const NAME_Y: f64 = 80.0;
const BIO_Y: f64 = 110.0;
const STATS_Y: f64 = 200.0;
const SECTION_TITLE_Y: f64 = 230.0;

const ICON_ORIGIN_X: f64 = LEFT_COLUMN_X;
const ICON_Y: f64 = 140.0;
const ICON_SPACING: f64 = 40.0;
const ICON_PADDING: f64 = 10.0;
const ICON_STROKE: &str = "#ffffff";

const LANGUAGE_BAR_TOP: f64 = 265.0;
const LANGUAGE_ROW_PITCH: f64 = 45.0;
const LANGUAGE_LABEL_LIFT: f64 = 5.0;
const LANGUAGE_BAR_HEIGHT: f64 = 20.0;
const LANGUAGE_BAR_RADIUS: f64 = 5.0;
/// Bar length per percentage point.
const LANGUAGE_BAR_SCALE: f64 = 2.0;
const LANGUAGE_FONT_SIZE: f64 = 14.0;

const REPO_NAME_Y: f64 = 250.0;
const REPO_ROW_PITCH: f64 = 60.0;
const REPO_LINE_GAP: f64 = 20.0;
const REPO_NAME_FONT_SIZE: f64 = 16.0;
const REPO_DESC_FONT_SIZE: f64 = 14.0;
const REPO_STATS_FONT_SIZE: f64 = 12.0;

const MASCOT_X: f64 = 850.0;
const MASCOT_Y: f64 = 550.0;
const MASCOT_SIZE: f64 = 60.0;

const ARROW_Y: f64 = 550.0;
const ARROW_STROKE: &str = "#ebdbb2";

const FONT_STACK: &str = "'Segoe UI', Ubuntu, Sans-Serif";

/// Everything the composer reads besides the configuration.
#[derive(Debug, Clone, Copy)]
pub struct CardInput<'a> {
    pub profile: &'a Profile,
    pub stats: &'a CardStats,
    pub avatar: &'a EmbeddedImage,
    /// Loaded once at startup; `None` when no mascot asset is available.
    pub mascot: Option<&'a EmbeddedImage>,
}

pub fn layout_card(input: &CardInput<'_>, config: &CardConfig) -> Result<CardLayout> {
    let opacity = config.avatar_background_opacity;
    if !(opacity.is_finite() && (0.0..=1.0).contains(&opacity)) {
        return Err(Error::InvalidOpacity { value: opacity });
    }
    for image in std::iter::once(input.avatar).chain(input.mascot) {
        if !image.has_valid_mime() {
            return Err(Error::InvalidMimeType {
                mime: image.mime.clone(),
            });
        }
    }

    let mut out: Vec<Primitive> = Vec::new();

    out.push(Primitive::Rect(RectPrimitive {
        x: 0.0,
        y: 0.0,
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
        corner_radius: 0.0,
        fill: Paint::Gradient(BACKGROUND_GRADIENT_ID.to_string()),
    }));

    if let Some(url) = config
        .background_image_url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
    {
        out.push(full_canvas_image(
            ImageSource::External(url.trim().to_string()),
            BACKGROUND_IMAGE_OPACITY,
        ));
    }

    if config.show_avatar_background {
        out.push(full_canvas_image(
            ImageSource::Embedded(input.avatar.clone()),
            opacity,
        ));
    }

    out.push(class_text(
        LEFT_COLUMN_X,
        NAME_Y,
        input.profile.display_name(),
        TextClass::Name,
    ));
    out.push(class_text(
        LEFT_COLUMN_X,
        BIO_Y,
        &resolve_bio(input.profile, config),
        TextClass::Title,
    ));

    out.extend(social_icons(input.profile, config));

    let stats = input.stats;
    out.push(class_text(
        LEFT_COLUMN_X,
        STATS_Y,
        &format!(
            "Followers: {} | Following: {} | Repos: {} | Gists: {} | Contributions (Last Year): {}",
            stats.followers,
            stats.following,
            stats.public_repos,
            stats.public_gists,
            stats.contributions_last_year
        ),
        TextClass::Stats,
    ));

    out.push(class_text(
        LEFT_COLUMN_X,
        SECTION_TITLE_Y,
        "Most Used Languages:",
        TextClass::SectionTitle,
    ));
    for (i, lang) in stats.languages.iter().enumerate() {
        let bar_y = LANGUAGE_BAR_TOP + LANGUAGE_ROW_PITCH * i as f64;
        out.push(Primitive::Rect(RectPrimitive {
            x: LEFT_COLUMN_X,
            y: bar_y,
            width: lang.percentage() * LANGUAGE_BAR_SCALE,
            height: LANGUAGE_BAR_HEIGHT,
            corner_radius: LANGUAGE_BAR_RADIUS,
            fill: Paint::Color(language_color(&lang.name).to_string()),
        }));
        out.push(inline_text(
            LEFT_COLUMN_X,
            bar_y - LANGUAGE_LABEL_LIFT,
            format!("{} ({}%)", lang.name, lang.percentage_label()),
            LANGUAGE_FONT_SIZE,
            &config.colors.language_text,
            None,
        ));
    }

    out.push(class_text(
        RIGHT_COLUMN_X,
        SECTION_TITLE_Y,
        "Top Repositories:",
        TextClass::SectionTitle,
    ));
    for (i, repo) in stats.top_repositories.iter().enumerate() {
        let name_y = REPO_NAME_Y + REPO_ROW_PITCH * i as f64;
        let link = Some(repo.html_url.clone()).filter(|u| !u.trim().is_empty());
        out.push(inline_text(
            RIGHT_COLUMN_X,
            name_y,
            repo.name.clone(),
            REPO_NAME_FONT_SIZE,
            &config.colors.repo_name,
            link,
        ));
        out.push(inline_text(
            RIGHT_COLUMN_X,
            name_y + REPO_LINE_GAP,
            repo.description.clone(),
            REPO_DESC_FONT_SIZE,
            &config.colors.repo_description,
            None,
        ));
        out.push(inline_text(
            RIGHT_COLUMN_X,
            name_y + 2.0 * REPO_LINE_GAP,
            format!("★ {} | Forks: {}", repo.stars, repo.forks),
            REPO_STATS_FONT_SIZE,
            &config.colors.repo_stats,
            None,
        ));
    }

    if config.show_mascot {
        if let Some(mascot) = input.mascot {
            out.push(Primitive::Image(ImagePrimitive {
                x: MASCOT_X,
                y: MASCOT_Y,
                width: MASCOT_SIZE,
                height: MASCOT_SIZE,
                source: ImageSource::Embedded(mascot.clone()),
                opacity: None,
                cover: false,
            }));
        }
    }

    out.push(Primitive::Icon(IconPrimitive {
        glyph: Glyph::ArrowDown,
        x: (CANVAS_WIDTH - GLYPH_VIEW_BOX) / 2.0,
        y: ARROW_Y,
        size: GLYPH_VIEW_BOX,
        stroke: ARROW_STROKE.to_string(),
        link: None,
        hit_padding: 0.0,
    }));

    Ok(CardLayout {
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
        gradients: vec![background_gradient()],
        styles: class_styles(config),
        primitives: out,
    })
}

fn resolve_bio(profile: &Profile, config: &CardConfig) -> String {
    let bio = if config.use_github_bio {
        profile.bio.as_deref()
    } else {
        config.bio.as_deref()
    };
    bio.unwrap_or_default().to_string()
}

/// Icons for the non-empty links, packed left to right from the icon origin.
fn social_icons(profile: &Profile, config: &CardConfig) -> Vec<Primitive> {
    let github = config
        .github_link
        .as_deref()
        .unwrap_or(profile.html_url.as_str());
    let candidates = [
        (Glyph::Github, github),
        (Glyph::Website, config.website_link.as_deref().unwrap_or_default()),
        (Glyph::Email, config.email_link.as_deref().unwrap_or_default()),
    ];

    candidates
        .into_iter()
        .map(|(glyph, href)| (glyph, href.trim()))
        .filter(|(_, href)| !href.is_empty())
        .enumerate()
        .map(|(i, (glyph, href))| {
            Primitive::Icon(IconPrimitive {
                glyph,
                x: ICON_ORIGIN_X + ICON_SPACING * i as f64,
                y: ICON_Y,
                size: GLYPH_VIEW_BOX,
                stroke: ICON_STROKE.to_string(),
                link: Some(href.to_string()),
                hit_padding: ICON_PADDING,
            })
        })
        .collect()
}

fn full_canvas_image(source: ImageSource, opacity: f64) -> Primitive {
    Primitive::Image(ImagePrimitive {
        x: 0.0,
        y: 0.0,
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
        source,
        opacity: Some(opacity),
        cover: true,
    })
}

fn class_text(x: f64, y: f64, text: &str, class: TextClass) -> Primitive {
    Primitive::Text(TextPrimitive {
        x,
        y,
        text: text.to_string(),
        style: TextStyle::Class { class },
        link: None,
    })
}

fn inline_text(
    x: f64,
    y: f64,
    text: String,
    font_size: f64,
    fill: &str,
    link: Option<String>,
) -> Primitive {
    Primitive::Text(TextPrimitive {
        x,
        y,
        text,
        style: TextStyle::Inline {
            font_size,
            fill: fill.to_string(),
        },
        link,
    })
}

fn background_gradient() -> LinearGradient {
    LinearGradient {
        id: BACKGROUND_GRADIENT_ID.to_string(),
        x1: 0.0,
        y1: 0.0,
        x2: 100.0,
        y2: 100.0,
        stops: vec![
            GradientStop {
                offset: 0.0,
                color: "#1d2021".to_string(),
            },
            GradientStop {
                offset: 100.0,
                color: "#32302f".to_string(),
            },
        ],
    }
}

fn class_styles(config: &CardConfig) -> Vec<ClassStyle> {
    let colors = &config.colors;
    let style = |class, font: &str, fill: &str| ClassStyle {
        class,
        font: format!("{font} {FONT_STACK}"),
        fill: fill.to_string(),
    };
    vec![
        style(TextClass::Name, "bold 30px", &colors.name),
        style(TextClass::Title, "20px", &colors.title),
        style(TextClass::Stats, "16px", &colors.stats),
        style(TextClass::SectionTitle, "bold 18px", &colors.section_title),
    ]
}
