mod css;
mod util;

use crate::focus::{FocusTarget, Highlight, highlight};
use crate::model::DependencyLayout;
use crate::theme::Theme;
use std::fmt::Write as _;
use util::{escape_attr, escape_xml, fmt, fmt_path};

pub const DEFAULT_DIAGRAM_ID: &str = "deparc";

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Root `<svg id>`. Prefixes every internal id and scopes the stylesheet; sanitized with
    /// [`sanitize_svg_id`] before use.
    pub diagram_id: Option<String>,
    /// When set, the SVG is emitted in the focused state for this target (static hover).
    pub focus: Option<FocusTarget>,
    /// Adds a `TDD / n / MDD` caption above the diagram.
    pub include_stats_caption: bool,
    /// Adds extra space around the canvas.
    pub viewbox_padding: f64,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            diagram_id: None,
            focus: None,
            include_stats_caption: false,
            viewbox_padding: 0.0,
        }
    }
}

/// Converts an arbitrary string into a conservative SVG `id` token suitable for embedding
/// several diagrams in the same page.
///
/// Unsupported characters become `-`, runs of `-` collapse, and ids that do not start with an
/// ASCII letter get a `d-` prefix.
pub fn sanitize_svg_id(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "d-untitled".to_string();
    }

    let mut out = String::with_capacity(raw.len() + 4);
    for ch in raw.chars() {
        let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_';
        out.push(if ok { ch } else { '-' });
    }

    let starts_ok = out.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
    if !starts_ok {
        out.insert_str(0, "d-");
    }

    while out.contains("--") {
        out = out.replace("--", "-");
    }
    let out = out.trim_matches('-');
    if out.is_empty() || out == "d" {
        return "d-untitled".to_string();
    }
    out.to_string()
}

/// `TDD 2 · n 2 · MDD 1.00`, from the drawn arcs.
pub fn stats_caption(layout: &DependencyLayout) -> String {
    let n = layout.arcs.len();
    let tdd: u64 = layout.arcs.iter().map(|a| u64::from(a.distance)).sum();
    let mdd = if n == 0 { 0.0 } else { tdd as f64 / n as f64 };
    format!("TDD {tdd} · n {n} · MDD {mdd:.2}")
}

fn class_list(base: &str, highlighted: bool) -> String {
    if highlighted {
        format!("{base} highlighted")
    } else {
        base.to_string()
    }
}

pub fn render_svg(layout: &DependencyLayout, theme: &Theme, options: &SvgRenderOptions) -> String {
    let diagram_id = sanitize_svg_id(options.diagram_id.as_deref().unwrap_or(DEFAULT_DIAGRAM_ID));
    let id = escape_attr(&diagram_id);

    // A target absent from the layout leaves the diagram unfocused.
    let focused: Option<Highlight> = options
        .focus
        .map(|target| highlight(layout, target))
        .filter(|h| !h.is_empty());
    let is_hl = |target: FocusTarget| focused.as_ref().is_some_and(|h| h.contains(target));

    let pad = if options.viewbox_padding.is_finite() {
        options.viewbox_padding.max(0.0)
    } else {
        0.0
    };
    let caption_height = if options.include_stats_caption {
        theme.fonts.label.font_size * 2.0
    } else {
        0.0
    };
    let vb_x = -pad;
    let vb_y = -pad - caption_height;
    let vb_w = (layout.width + 2.0 * pad).max(1.0);
    let vb_h = (layout.height + 2.0 * pad + caption_height).max(1.0);

    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg id="{id}" width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg" viewBox="{x} {y} {w} {h}" role="graphics-document document" aria-roledescription="dependency">"#,
        x = fmt(vb_x),
        y = fmt(vb_y),
        w = fmt(vb_w),
        h = fmt(vb_h),
    );
    let _ = write!(
        &mut out,
        "<style>{}</style>",
        css::diagram_css(&diagram_id, theme)
    );
    let _ = write!(
        &mut out,
        r#"<defs><marker id="{id}-arrow" markerWidth="10" markerHeight="10" refX="8" refY="3" orient="auto"><path d="M0,0 L0,6 L9,3 z" class="arrowMarkerPath"/></marker></defs>"#
    );
    let _ = write!(
        &mut out,
        r#"<rect class="background" x="{x}" y="{y}" width="{w}" height="{h}"/>"#,
        x = fmt(vb_x),
        y = fmt(vb_y),
        w = fmt(vb_w),
        h = fmt(vb_h),
    );

    let root_class = if focused.is_some() {
        "diagram hover-mode"
    } else {
        "diagram"
    };
    let _ = write!(&mut out, r#"<g class="{root_class}">"#);

    out.push_str(r#"<g class="arcs">"#);
    for arc in &layout.arcs {
        let target = FocusTarget::edge(arc.head, arc.dep);
        let _ = write!(
            &mut out,
            r#"<path id="{id}-arc-{h}-{d}" class="{class}" d="M{sx},{sy} C{c1x},{c1y} {c2x},{c2y} {ex},{ey}" marker-end="url(#{id}-arrow)" data-focus="{key}" data-head="{h}" data-dep="{d}"/>"#,
            h = arc.head,
            d = arc.dep,
            class = class_list("dep-arc", is_hl(target)),
            sx = fmt_path(arc.start.x),
            sy = fmt_path(arc.start.y),
            c1x = fmt_path(arc.control1.x),
            c1y = fmt_path(arc.control1.y),
            c2x = fmt_path(arc.control2.x),
            c2y = fmt_path(arc.control2.y),
            ex = fmt_path(arc.end.x),
            ey = fmt_path(arc.end.y),
            key = target.key(),
        );
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="roots">"#);
    for root in &layout.roots {
        let target = FocusTarget::root(root.id);
        let hl = is_hl(target);
        let _ = write!(
            &mut out,
            r#"<path id="{id}-root-{d}" class="{class}" d="M{x},{y0} V{y1}" data-focus="{key}" data-head="0" data-dep="{d}"/>"#,
            d = root.id,
            class = class_list("root-arc", hl),
            x = fmt_path(root.x),
            y0 = fmt_path(root.bottom_y),
            y1 = fmt_path(root.top_y),
            key = target.key(),
        );
        let _ = write!(
            &mut out,
            r#"<text class="{class}" x="{x}" y="{y}" data-focus="{key}">{text}</text>"#,
            class = class_list("dep-label root-label", hl),
            x = fmt(root.label.x),
            y = fmt(root.label.y),
            key = target.key(),
            text = escape_xml(&root.label.text),
        );
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="labels">"#);
    for arc in &layout.arcs {
        let target = FocusTarget::edge(arc.head, arc.dep);
        let _ = write!(
            &mut out,
            r#"<text id="{id}-label-{h}-{d}" class="{class}" x="{x}" y="{y}" data-focus="{key}">{text}</text>"#,
            h = arc.head,
            d = arc.dep,
            class = class_list("dep-label", is_hl(target)),
            x = fmt(arc.label.x),
            y = fmt(arc.label.y),
            key = target.key(),
            text = escape_xml(&arc.label.text),
        );
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="words">"#);
    for token in &layout.tokens {
        let target = FocusTarget::token(token.id);
        let mut class = class_list("word-block", is_hl(target));
        if token.flagged {
            class.push_str(" flagged");
        }
        let _ = write!(
            &mut out,
            r#"<g id="{id}-w-{t}" class="{class}" data-focus="{key}">"#,
            t = token.id,
            key = target.key(),
        );
        if let Some(f) = layout.flagged.iter().find(|f| f.id == token.id) {
            let _ = write!(
                &mut out,
                "<title>{}</title>",
                escape_xml(&format!("head {}: {}", f.head, f.reason))
            );
        }
        let _ = write!(
            &mut out,
            r#"<rect class="word-hit" x="{x}" y="{y}" width="{w}" height="{h}"/>"#,
            x = fmt(token.x),
            y = fmt(token.y),
            w = fmt(token.width),
            h = fmt(token.height),
        );
        let _ = write!(
            &mut out,
            r#"<text class="word-text" x="{x}" y="{y}">{text}</text>"#,
            x = fmt(token.word.x),
            y = fmt(token.word.y),
            text = escape_xml(&token.word.text),
        );
        let pill = &token.pos_pill;
        let _ = write!(
            &mut out,
            r#"<rect class="word-pos-pill" x="{x}" y="{y}" width="{w}" height="{h}" rx="{r}"/>"#,
            x = fmt(pill.min_x),
            y = fmt(pill.min_y),
            w = fmt(pill.max_x - pill.min_x),
            h = fmt(pill.max_y - pill.min_y),
            r = fmt(theme.block.pos_radius.min((pill.max_y - pill.min_y) / 2.0)),
        );
        let _ = write!(
            &mut out,
            r#"<text class="word-pos" x="{x}" y="{y}">{text}</text>"#,
            x = fmt(token.pos.x),
            y = fmt(token.pos.y),
            text = escape_xml(&token.pos.text),
        );
        out.push_str("</g>");
    }
    out.push_str("</g>");

    if options.include_stats_caption {
        let _ = write!(
            &mut out,
            r#"<text class="stats-caption" x="{x}" y="{y}" text-anchor="middle" dominant-baseline="central">{text}</text>"#,
            x = fmt(layout.width / 2.0),
            y = fmt(-caption_height / 2.0),
            text = escape_xml(&stats_caption(layout)),
        );
    }

    out.push_str("</g></svg>\n");
    out
}
