use gitcard_core::{CardConfig, CardStats, Profile, RankedLanguage, RankedRepository};
use gitcard_render::{CardInput, EmbeddedImage, layout_card, render_card_svg, render_svg};

fn profile() -> Profile {
    Profile {
        login: "octocat".to_string(),
        name: Some("The \"Octo\" & <Cat>".to_string()),
        bio: Some("it's a bio".to_string()),
        avatar_url: "https://avatars.example.com/u/1".to_string(),
        html_url: "https://github.com/octocat".to_string(),
        followers: 10,
        following: 2,
        public_repos: 4,
        public_gists: 0,
    }
}

fn stats(languages: Vec<RankedLanguage>) -> CardStats {
    CardStats {
        languages,
        top_repositories: vec![RankedRepository {
            name: "spoon-knife".to_string(),
            description: "Fork & <play>".to_string(),
            stars: 12,
            forks: 3,
            html_url: "https://github.com/octocat/spoon-knife".to_string(),
        }],
        contributions_last_year: 42,
        followers: 10,
        following: 2,
        public_repos: 4,
        public_gists: 0,
    }
}

fn lang(name: &str, basis_points: u32) -> RankedLanguage {
    RankedLanguage {
        name: name.to_string(),
        basis_points,
    }
}

fn render(stats: &CardStats, config: &CardConfig, mascot: Option<&EmbeddedImage>) -> String {
    let profile = profile();
    let avatar = EmbeddedImage::new(Some("image/jpeg"), b"jpeg".to_vec());
    render_svg(
        &CardInput {
            profile: &profile,
            stats,
            avatar: &avatar,
            mascot,
        },
        config,
    )
    .expect("render")
}

#[test]
fn document_parses_and_keeps_paint_order() {
    let stats = stats(vec![lang("Rust", 7000), lang("Go", 3000)]);
    let mascot = EmbeddedImage::png(b"png".to_vec());
    let config = CardConfig {
        background_image_url: Some("https://example.com/bg.png".to_string()),
        ..CardConfig::default()
    };
    let svg = render(&stats, &config, Some(&mascot));
    let doc = roxmltree::Document::parse(&svg).expect("well-formed");
    let root = doc.root_element();
    assert_eq!(root.attribute("viewBox"), Some("0 0 900 600"));

    let top_level: Vec<&str> = root
        .children()
        .filter(|n| n.is_element())
        .map(|n| n.tag_name().name())
        .collect();
    assert_eq!(&top_level[..6], ["defs", "style", "rect", "image", "image", "text"]);
    assert_eq!(top_level.last(), Some(&"svg"));

    let images: Vec<_> = root
        .children()
        .filter(|n| n.has_tag_name("image"))
        .collect();
    assert_eq!(images.len(), 3);
    assert_eq!(images[0].attribute("href"), Some("https://example.com/bg.png"));
    assert_eq!(images[0].attribute("opacity"), Some("0.3"));
    assert_eq!(
        images[1].attribute("href"),
        Some("data:image/jpeg;base64,anBlZw==")
    );
    assert_eq!(images[2].attribute("x"), Some("850"));
    assert_eq!(images[2].attribute("y"), Some("550"));
}

#[test]
fn user_text_is_escaped_everywhere() {
    let svg = render(&stats(Vec::new()), &CardConfig::default(), None);
    assert!(svg.contains("The &quot;Octo&quot; &amp; &lt;Cat&gt;"));
    assert!(svg.contains("Fork &amp; &lt;play&gt;"));

    let doc = roxmltree::Document::parse(&svg).expect("well-formed");
    let texts: Vec<&str> = doc
        .descendants()
        .filter(|n| n.has_tag_name("text"))
        .filter_map(|n| n.text())
        .collect();
    assert!(texts.contains(&"The \"Octo\" & <Cat>"));
    assert!(texts.contains(&"★ 12 | Forks: 3"));
}

#[test]
fn no_languages_still_renders_section_title() {
    let svg = render(&stats(Vec::new()), &CardConfig::default(), None);
    let doc = roxmltree::Document::parse(&svg).expect("well-formed");
    let texts: Vec<&str> = doc
        .descendants()
        .filter(|n| n.has_tag_name("text"))
        .filter_map(|n| n.text())
        .collect();
    assert!(texts.contains(&"Most Used Languages:"));
    assert!(!texts.iter().any(|t| t.ends_with("%)")));
    // Only the background rect; bars would add rounded rects.
    assert_eq!(
        doc.root_element()
            .children()
            .filter(|n| n.has_tag_name("rect"))
            .count(),
        1
    );
}

#[test]
fn layout_serializes_to_json() {
    let profile = profile();
    let avatar = EmbeddedImage::png(b"a".to_vec());
    let stats = stats(vec![lang("Rust", 10_000)]);
    let layout = layout_card(
        &CardInput {
            profile: &profile,
            stats: &stats,
            avatar: &avatar,
            mascot: None,
        },
        &CardConfig::default(),
    )
    .expect("layout");
    let json = serde_json::to_value(&layout).expect("json");
    assert_eq!(json["width"], 900.0);
    assert_eq!(json["primitives"][0]["type"], "rect");

    let svg = render_card_svg(&layout);
    assert!(svg.contains("Rust (100.00%)"));
    assert!(svg.contains(r#"width="200""#));
}
