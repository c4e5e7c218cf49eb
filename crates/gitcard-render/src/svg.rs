use crate::glyphs::{GLYPH_VIEW_BOX, GlyphShape};
use crate::model::{
    CardLayout, EmbeddedImage, IconPrimitive, ImagePrimitive, ImageSource, LinearGradient, Paint,
    Primitive, RectPrimitive, TextPrimitive, TextStyle,
};
use base64::Engine as _;
use std::fmt::Write as _;

mod util;

use util::{escape_attr, escape_xml_into, fmt};

const BASE_CSS: &str = "text { font-family: 'Segoe UI', Ubuntu, Sans-Serif; } a { text-decoration: none; } svg { overflow: visible; }";

/// Serializes a composed card into a standalone SVG document.
///
/// Elements are written in primitive order, so later primitives paint over earlier ones. Embedded
/// images become `data:` URIs; only explicitly external images reference other resources.
pub fn render_card_svg(layout: &CardLayout) -> String {
    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">"#,
        w = fmt(layout.width),
        h = fmt(layout.height)
    );

    out.push_str("<defs>");
    for gradient in &layout.gradients {
        write_gradient(&mut out, gradient);
    }
    out.push_str("</defs>");

    out.push_str("<style>");
    for rule in &layout.styles {
        let _ = write!(
            &mut out,
            ".{class} {{ font: {font}; fill: {fill}; }} ",
            class = rule.class.as_str(),
            font = rule.font,
            fill = rule.fill
        );
    }
    out.push_str(BASE_CSS);
    out.push_str("</style>");

    for primitive in &layout.primitives {
        match primitive {
            Primitive::Rect(rect) => write_rect(&mut out, rect),
            Primitive::Text(text) => write_text(&mut out, text),
            Primitive::Image(image) => write_image(&mut out, image),
            Primitive::Icon(icon) => write_icon(&mut out, icon),
        }
    }

    out.push_str("</svg>");
    out
}

fn write_gradient(out: &mut String, gradient: &LinearGradient) {
    let _ = write!(
        out,
        r#"<linearGradient id="{id}" x1="{x1}%" y1="{y1}%" x2="{x2}%" y2="{y2}%">"#,
        id = escape_attr(&gradient.id),
        x1 = fmt(gradient.x1),
        y1 = fmt(gradient.y1),
        x2 = fmt(gradient.x2),
        y2 = fmt(gradient.y2)
    );
    for stop in &gradient.stops {
        let _ = write!(
            out,
            r#"<stop offset="{offset}%" stop-color="{color}" stop-opacity="1"/>"#,
            offset = fmt(stop.offset),
            color = escape_attr(&stop.color)
        );
    }
    out.push_str("</linearGradient>");
}

fn paint_attr(paint: &Paint) -> String {
    match paint {
        Paint::Color(color) => escape_attr(color),
        Paint::Gradient(id) => format!("url(#{})", escape_attr(id)),
        Paint::Transparent => "transparent".to_string(),
    }
}

fn write_rect(out: &mut String, rect: &RectPrimitive) {
    let _ = write!(
        out,
        r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="{fill}""#,
        x = fmt(rect.x),
        y = fmt(rect.y),
        w = fmt(rect.width),
        h = fmt(rect.height),
        fill = paint_attr(&rect.fill)
    );
    if rect.corner_radius > 0.0 {
        let r = fmt(rect.corner_radius);
        let _ = write!(out, r#" rx="{r}" ry="{r}""#);
    }
    out.push_str("/>");
}

fn open_link(out: &mut String, href: &str) {
    let _ = write!(
        out,
        r#"<a xlink:href="{href}" target="_blank">"#,
        href = escape_attr(href)
    );
}

fn write_text(out: &mut String, text: &TextPrimitive) {
    if let Some(href) = text.link.as_deref() {
        open_link(out, href);
    }
    let _ = write!(out, r#"<text x="{}" y="{}""#, fmt(text.x), fmt(text.y));
    match &text.style {
        TextStyle::Class { class } => {
            let _ = write!(out, r#" class="{}""#, class.as_str());
        }
        TextStyle::Inline { font_size, fill } => {
            let _ = write!(
                out,
                r#" font-size="{size}" fill="{fill}" font-family="Segoe UI, Ubuntu, Sans-Serif""#,
                size = fmt(*font_size),
                fill = escape_attr(fill)
            );
        }
    }
    if text.text.is_empty() {
        out.push_str("/>");
    } else {
        out.push('>');
        escape_xml_into(out, &text.text);
        out.push_str("</text>");
    }
    if text.link.is_some() {
        out.push_str("</a>");
    }
}

fn data_uri(image: &EmbeddedImage) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(&image.bytes);
    format!("data:{};base64,{}", image.mime, encoded)
}

fn write_image(out: &mut String, image: &ImagePrimitive) {
    let href = match &image.source {
        ImageSource::Embedded(embedded) => data_uri(embedded),
        ImageSource::External(url) => escape_attr(url),
    };
    let _ = write!(
        out,
        r#"<image x="{x}" y="{y}" width="{w}" height="{h}" href="{href}""#,
        x = fmt(image.x),
        y = fmt(image.y),
        w = fmt(image.width),
        h = fmt(image.height)
    );
    if let Some(opacity) = image.opacity {
        let _ = write!(out, r#" opacity="{}""#, fmt(opacity));
    }
    if image.cover {
        out.push_str(r#" preserveAspectRatio="xMidYMid slice""#);
    }
    out.push_str("/>");
}

fn write_icon(out: &mut String, icon: &IconPrimitive) {
    if let Some(href) = icon.link.as_deref() {
        open_link(out, href);
        let pad = icon.hit_padding;
        let _ = write!(
            out,
            r#"<rect x="{x}" y="{y}" width="{s}" height="{s}" fill="transparent"/>"#,
            x = fmt(icon.x - pad),
            y = fmt(icon.y - pad),
            s = fmt(icon.size + pad * 2.0)
        );
    }

    let _ = write!(
        out,
        r#"<svg x="{x}" y="{y}" width="{s}" height="{s}" viewBox="0 0 {vb} {vb}" fill="none" stroke="{stroke}" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">"#,
        x = fmt(icon.x),
        y = fmt(icon.y),
        s = fmt(icon.size),
        vb = fmt(GLYPH_VIEW_BOX),
        stroke = escape_attr(&icon.stroke)
    );
    for shape in icon.glyph.shapes() {
        match *shape {
            GlyphShape::Path(d) => {
                let _ = write!(out, r#"<path d="{d}"/>"#);
            }
            GlyphShape::Circle { cx, cy, r } => {
                let _ = write!(
                    out,
                    r#"<circle cx="{}" cy="{}" r="{}"/>"#,
                    fmt(cx),
                    fmt(cy),
                    fmt(r)
                );
            }
            GlyphShape::Line { x1, y1, x2, y2 } => {
                let _ = write!(
                    out,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
                    fmt(x1),
                    fmt(y1),
                    fmt(x2),
                    fmt(y2)
                );
            }
            GlyphShape::Polyline(points) => {
                let _ = write!(out, r#"<polyline points="{points}"/>"#);
            }
        }
    }
    out.push_str("</svg>");

    if icon.link.is_some() {
        out.push_str("</a>");
    }
}
