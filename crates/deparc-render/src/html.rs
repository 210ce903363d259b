//! Self-contained HTML page: the diagram, KPI cards, the statistics table and the hover script.

use crate::focus::{FocusGraph, FocusTarget, highlight};
use crate::model::DependencyLayout;
use crate::svg::{DEFAULT_DIAGRAM_ID, SvgRenderOptions, render_svg, sanitize_svg_id};
use crate::theme::Theme;
use deparc_core::DependencyStats;
use htmlize::{escape_attribute, escape_text};
use std::collections::BTreeMap;
use std::fmt::Write as _;

const FOCUS_SCRIPT: &str = include_str!("../assets/focus.js");

const PAGE_CSS: &str = r#"body{margin:0;padding:30px;background:#f3f4f6;font-family:Inter,-apple-system,BlinkMacSystemFont,sans-serif;color:#374151;}
.deparc-page{display:flex;flex-direction:column;gap:24px;max-width:1200px;margin:0 auto;}
.card{background:#fff;border-radius:16px;border:1px solid #e5e7eb;box-shadow:0 4px 6px -1px rgba(0,0,0,0.05),0 2px 4px -1px rgba(0,0,0,0.03);padding:24px;overflow-x:auto;}
.card h1{font-size:1.2rem;margin:0 0 12px 0;color:#111827;}
.dashboard-grid{display:grid;grid-template-columns:repeat(3,1fr);gap:20px;margin-bottom:24px;}
.kpi-card{background:#f9fafb;border:1px solid #e5e7eb;border-radius:12px;padding:16px;text-align:center;}
.kpi-val{font-size:28px;font-weight:700;color:#111827;display:block;margin-bottom:4px;}
.kpi-val.accent{color:#2563eb;}
.kpi-label{font-size:12px;color:#6b7280;text-transform:uppercase;font-weight:600;letter-spacing:0.05em;}
table{width:100%;border-collapse:collapse;font-size:14px;}
thead{background:#f9fafb;border-bottom:2px solid #e5e7eb;}
th{text-align:left;padding:12px 16px;font-weight:600;color:#4b5563;text-transform:uppercase;font-size:12px;}
td{padding:12px 16px;border-bottom:1px solid #f3f4f6;}
td.word{font-weight:600;}
.pos-tag{background:#eff6ff;color:#1e40af;padding:2px 6px;border-radius:4px;font-size:11px;font-weight:600;}
tr.highlighted td{background:#eff6ff;}
tr.flagged td{color:#dc2626;}
.diagnostics{margin:16px 0 0 0;padding-left:20px;color:#dc2626;font-size:13px;}
"#;

#[derive(Debug, Clone)]
pub struct HtmlRenderOptions {
    pub title: Option<String>,
    pub svg: SvgRenderOptions,
    /// Embed the hover script. Without it the page is static (optionally pre-focused through
    /// `svg.focus`).
    pub include_script: bool,
}

impl Default for HtmlRenderOptions {
    fn default() -> Self {
        Self {
            title: None,
            svg: SvgRenderOptions::default(),
            include_script: true,
        }
    }
}

/// Every focusable key mapped to the keys it highlights.
pub fn focus_map<G: FocusGraph + ?Sized>(graph: &G, targets: &[FocusTarget]) -> BTreeMap<String, Vec<String>> {
    targets
        .iter()
        .map(|&t| (t.key(), highlight(graph, t).keys()))
        .collect()
}

fn layout_targets(layout: &DependencyLayout) -> Vec<FocusTarget> {
    let mut targets: Vec<FocusTarget> = layout
        .tokens
        .iter()
        .map(|t| FocusTarget::token(t.id))
        .collect();
    targets.extend(layout.arcs.iter().map(|a| FocusTarget::edge(a.head, a.dep)));
    targets.extend(layout.roots.iter().map(|r| FocusTarget::root(r.id)));
    targets
}

pub fn render_html(
    layout: &DependencyLayout,
    stats: &DependencyStats,
    theme: &Theme,
    options: &HtmlRenderOptions,
) -> String {
    let diagram_id = sanitize_svg_id(
        options
            .svg
            .diagram_id
            .as_deref()
            .unwrap_or(DEFAULT_DIAGRAM_ID),
    );
    let mut svg_options = options.svg.clone();
    svg_options.diagram_id = Some(diagram_id.clone());
    let svg = render_svg(layout, theme, &svg_options);
    let title = options.title.as_deref().unwrap_or("Dependency parse");

    let mut out = String::new();
    let _ = write!(
        &mut out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>\n{PAGE_CSS}</style>\n</head>\n<body>\n",
        title = escape_text(title),
    );
    out.push_str("<div class=\"deparc-page\">\n");
    let _ = write!(
        &mut out,
        "<div class=\"card viz\">\n<h1>{}</h1>\n{svg}</div>\n",
        escape_text(title)
    );

    out.push_str("<div class=\"card\">\n<div class=\"dashboard-grid\">\n");
    let _ = writeln!(
        &mut out,
        "<div class=\"kpi-card\"><span class=\"kpi-val\">{}</span><span class=\"kpi-label\">Total Distance (TDD)</span></div>",
        stats.tdd
    );
    let _ = writeln!(
        &mut out,
        "<div class=\"kpi-card\"><span class=\"kpi-val\">{}</span><span class=\"kpi-label\">Relations (n)</span></div>",
        stats.n
    );
    let _ = writeln!(
        &mut out,
        "<div class=\"kpi-card\"><span class=\"kpi-val accent\">{}</span><span class=\"kpi-label\">Mean Distance (MDD)</span></div>",
        stats.mdd_label()
    );
    out.push_str("</div>\n<div class=\"table-wrapper\">\n<table>\n");
    out.push_str("<thead><tr><th>Word</th><th>POS Tag</th><th>Relation</th><th>Head</th><th>Distance</th><th>Out-Degree</th></tr></thead>\n<tbody>\n");
    for row in &stats.rows {
        let flagged = layout.flagged.iter().any(|f| f.id == row.id);
        let _ = writeln!(
            &mut out,
            "<tr data-focus=\"{key}\"{class}><td class=\"word\">{word}</td><td><span class=\"pos-tag\">{pos}</span></td><td>{rel}</td><td>{head}</td><td>{distance}</td><td>{degree}</td></tr>",
            key = escape_attribute(FocusTarget::token(row.id).key()),
            class = if flagged { " class=\"flagged\"" } else { "" },
            word = escape_text(&row.word),
            pos = escape_text(&row.pos),
            rel = escape_text(&row.rel),
            head = escape_text(&row.head_word),
            distance = row.distance_label(),
            degree = row.out_degree,
        );
    }
    out.push_str("</tbody>\n</table>\n</div>\n");
    if !layout.flagged.is_empty() {
        out.push_str("<ul class=\"diagnostics\">\n");
        for f in &layout.flagged {
            let _ = writeln!(
                &mut out,
                "<li>token {}: head {} skipped ({})</li>",
                f.id,
                f.head,
                escape_text(f.reason.to_string())
            );
        }
        out.push_str("</ul>\n");
    }
    out.push_str("</div>\n</div>\n");

    if options.include_script {
        let map = focus_map(layout, &layout_targets(layout));
        let json = serde_json::to_string(&map)
            .unwrap_or_else(|_| "{}".to_string())
            .replace("</", "<\\/");
        let _ = write!(
            &mut out,
            "<script>\n{FOCUS_SCRIPT}deparcFocus({id}, {json});\n</script>\n",
            id = serde_json::Value::String(diagram_id),
        );
    }

    out.push_str("</body>\n</html>\n");
    out
}
