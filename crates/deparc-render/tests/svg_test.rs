use deparc_core::{Sentence, Token, ValidationOptions};
use deparc_render::theme::Theme;
use deparc_render::{
    DependencyLayout, FocusTarget, LayoutOptions, SvgRenderOptions, layout_sentence, render_svg,
    sanitize_svg_id,
};

fn layout_of(tokens: Vec<Token>, options: ValidationOptions) -> DependencyLayout {
    let sentence = Sentence::from_tokens(tokens, options).expect("valid sentence");
    layout_sentence(&sentence, &LayoutOptions::default()).expect("layout ok")
}

fn wo_chi_mian() -> DependencyLayout {
    layout_of(
        vec![
            Token::new(1, "我", "PRON", 2, "nsubj"),
            Token::new(2, "吃", "VERB", 0, "root"),
            Token::new(3, "面", "NOUN", 2, "obj"),
        ],
        ValidationOptions::strict(),
    )
}

fn has_class(node: &roxmltree::Node, class: &str) -> bool {
    node.attribute("class")
        .is_some_and(|c| c.split_whitespace().any(|c| c == class))
}

#[test]
fn svg_is_well_formed_and_carries_focus_keys() {
    let layout = wo_chi_mian();
    let svg = render_svg(&layout, &Theme::web(), &SvgRenderOptions::default());
    let doc = roxmltree::Document::parse(&svg).expect("well-formed svg");

    let root = doc.root_element();
    assert_eq!(root.tag_name().name(), "svg");
    assert_eq!(root.attribute("id"), Some("deparc"));
    assert_eq!(root.attribute("viewBox"), Some("0 0 800 360"));

    let arcs: Vec<_> = doc
        .descendants()
        .filter(|n| has_class(&n, "dep-arc"))
        .collect();
    assert_eq!(arcs.len(), 2);
    assert_eq!(arcs[0].attribute("data-focus"), Some("a2-1"));
    assert_eq!(arcs[0].attribute("data-head"), Some("2"));
    assert_eq!(arcs[0].attribute("data-dep"), Some("1"));
    assert_eq!(
        arcs[0].attribute("d"),
        Some("M400,300 C400,237 70,237 70,300")
    );
    assert_eq!(arcs[0].attribute("marker-end"), Some("url(#deparc-arrow)"));

    let roots: Vec<_> = doc
        .descendants()
        .filter(|n| has_class(&n, "root-arc"))
        .collect();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].attribute("data-focus"), Some("a0-2"));

    let words: Vec<&str> = doc
        .descendants()
        .filter(|n| has_class(&n, "word-text"))
        .filter_map(|n| n.text())
        .collect();
    assert_eq!(words, vec!["我", "吃", "面"]);

    let labels: Vec<&str> = doc
        .descendants()
        .filter(|n| has_class(&n, "dep-label"))
        .filter_map(|n| n.text())
        .collect();
    assert_eq!(labels, vec!["ROOT", "nsubj", "obj"]);

    assert!(
        doc.descendants()
            .all(|n| !has_class(&n, "highlighted") && !has_class(&n, "hover-mode"))
    );
}

#[test]
fn focused_svg_dims_everything_but_the_neighbourhood() {
    let layout = wo_chi_mian();
    let options = SvgRenderOptions {
        focus: Some(FocusTarget::token(1)),
        ..SvgRenderOptions::default()
    };
    let svg = render_svg(&layout, &Theme::web(), &options);
    let doc = roxmltree::Document::parse(&svg).expect("well-formed svg");

    let diagram = doc
        .descendants()
        .find(|n| has_class(&n, "diagram"))
        .expect("diagram group");
    assert!(has_class(&diagram, "hover-mode"));

    let mut highlighted: Vec<&str> = doc
        .descendants()
        .filter(|n| has_class(&n, "highlighted"))
        .filter_map(|n| n.attribute("data-focus"))
        .collect();
    highlighted.sort_unstable();
    highlighted.dedup();
    assert_eq!(highlighted, vec!["a2-1", "t1", "t2"]);
}

#[test]
fn focus_on_an_unknown_target_leaves_the_diagram_opaque() {
    let layout = wo_chi_mian();
    for target in [FocusTarget::token(99), FocusTarget::edge(1, 3), FocusTarget::root(1)] {
        let options = SvgRenderOptions {
            focus: Some(target),
            ..SvgRenderOptions::default()
        };
        let svg = render_svg(&layout, &Theme::web(), &options);
        let doc = roxmltree::Document::parse(&svg).expect("well-formed svg");

        let diagram = doc
            .descendants()
            .find(|n| has_class(&n, "diagram"))
            .expect("diagram group");
        assert!(!has_class(&diagram, "hover-mode"), "{target:?}");
        assert_eq!(
            doc.descendants()
                .filter(|n| has_class(&n, "highlighted"))
                .count(),
            0
        );
        assert_eq!(
            svg,
            render_svg(&layout, &Theme::web(), &SvgRenderOptions::default())
        );
    }
}

#[test]
fn text_and_ids_are_escaped() {
    let layout = layout_of(
        vec![
            Token::new(1, "<b>", "X&Y", 2, "a\"b"),
            Token::new(2, "ok", "X", 0, "root"),
        ],
        ValidationOptions::strict(),
    );
    let options = SvgRenderOptions {
        diagram_id: Some("my diagram <1>".to_string()),
        ..SvgRenderOptions::default()
    };
    let svg = render_svg(&layout, &Theme::web(), &options);
    let doc = roxmltree::Document::parse(&svg).expect("well-formed svg");

    assert_eq!(doc.root_element().attribute("id"), Some("my-diagram-1"));
    assert!(svg.contains("&lt;b&gt;"));
    assert!(svg.contains("X&amp;Y"));
    let texts: Vec<&str> = doc.descendants().filter_map(|n| n.text()).collect();
    assert!(texts.contains(&"<b>"));
    assert!(texts.contains(&"a\"b"));
}

#[test]
fn flagged_tokens_are_marked() {
    let layout = layout_of(
        vec![
            Token::new(1, "我", "PRON", 2, "nsubj"),
            Token::new(2, "吃", "VERB", 0, "root"),
            Token::new(3, "面", "NOUN", 99, "obj"),
        ],
        ValidationOptions::lenient(),
    );
    let svg = render_svg(&layout, &Theme::web(), &SvgRenderOptions::default());
    let doc = roxmltree::Document::parse(&svg).expect("well-formed svg");

    let flagged: Vec<_> = doc
        .descendants()
        .filter(|n| has_class(&n, "flagged"))
        .collect();
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].attribute("data-focus"), Some("t3"));
    let title = flagged[0]
        .children()
        .find(|n| n.tag_name().name() == "title")
        .and_then(|n| n.text());
    assert_eq!(title, Some("head 99: head out of range"));
}

#[test]
fn stats_caption_extends_the_view_box() {
    let layout = wo_chi_mian();
    let options = SvgRenderOptions {
        include_stats_caption: true,
        ..SvgRenderOptions::default()
    };
    let svg = render_svg(&layout, &Theme::web(), &options);
    let doc = roxmltree::Document::parse(&svg).expect("well-formed svg");

    assert_eq!(doc.root_element().attribute("viewBox"), Some("0 -24 800 384"));
    let caption = doc
        .descendants()
        .find(|n| has_class(&n, "stats-caption"))
        .and_then(|n| n.text());
    assert_eq!(caption, Some("TDD 2 · n 2 · MDD 1.00"));
}

#[test]
fn diagram_ids_are_sanitized() {
    assert_eq!(sanitize_svg_id("deparc"), "deparc");
    assert_eq!(sanitize_svg_id("  "), "d-untitled");
    assert_eq!(sanitize_svg_id("1st parse"), "d-1st-parse");
    assert_eq!(sanitize_svg_id("a//b"), "a-b");
}
