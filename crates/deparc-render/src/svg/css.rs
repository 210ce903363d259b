use super::util::{css_value, escape_xml, fmt};
use crate::text::TextStyle;
use crate::theme::Theme;
use std::fmt::Write as _;

fn font_decls(style: &TextStyle) -> String {
    let mut out = format!(
        "font-family:{};font-size:{}px;",
        css_value(style.font_family.as_deref().unwrap_or("sans-serif")),
        fmt(style.font_size)
    );
    if let Some(weight) = style.font_weight.as_deref() {
        let _ = write!(&mut out, "font-weight:{};", css_value(weight));
    }
    out
}

/// Scoped stylesheet for one diagram. Every rule is prefixed with `#<diagram_id>` so several
/// diagrams can share a page.
pub(crate) fn diagram_css(diagram_id: &str, theme: &Theme) -> String {
    let id = escape_xml(diagram_id);
    let c = &theme.colors;
    let arc = &theme.arc;
    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"#{id} .background{{fill:{bg};}}#{id} .dep-arc{{fill:none;stroke:{arc_color};stroke-width:{sw}px;}}#{id} .root-arc{{fill:none;stroke:{root};stroke-width:{sw}px;stroke-dasharray:4,4;}}#{id} .arrowMarkerPath{{fill:{arc_color};stroke:none;}}"#,
        bg = css_value(&c.background),
        arc_color = css_value(&c.arc),
        root = css_value(&c.root_arc),
        sw = fmt(arc.stroke_width),
    );
    let _ = write!(
        &mut out,
        r#"#{id} .dep-label{{{font}fill:{label};text-anchor:middle;dominant-baseline:central;paint-order:stroke;stroke:{halo};stroke-width:5px;stroke-linecap:round;stroke-linejoin:round;}}#{id} .root-label{{fill:{root};}}"#,
        font = font_decls(&theme.fonts.label),
        label = css_value(&c.label),
        halo = css_value(&c.halo),
        root = css_value(&c.root_arc),
    );
    let _ = write!(
        &mut out,
        r#"#{id} .word-text{{{word_font}fill:{word};text-anchor:middle;dominant-baseline:central;}}#{id} .word-pos{{{pos_font}fill:{pos_text};text-anchor:middle;dominant-baseline:central;text-transform:uppercase;letter-spacing:0.5px;}}#{id} .word-pos-pill{{fill:{pos_fill};stroke:{pos_stroke};stroke-width:1px;}}#{id} .word-hit{{fill:transparent;stroke:none;}}#{id} .word-block.flagged .word-text{{fill:{flagged};}}#{id} .stats-caption{{{label_font}fill:{pos_text};}}"#,
        word_font = font_decls(&theme.fonts.word),
        pos_font = font_decls(&theme.fonts.pos),
        label_font = font_decls(&theme.fonts.label),
        word = css_value(&c.word),
        pos_text = css_value(&c.pos_text),
        pos_fill = css_value(&c.pos_fill),
        pos_stroke = css_value(&c.pos_stroke),
        flagged = css_value(&c.flagged),
    );
    let _ = write!(
        &mut out,
        r#"#{id} .hover-mode .word-block,#{id} .hover-mode .dep-arc,#{id} .hover-mode .root-arc,#{id} .hover-mode .dep-label{{opacity:{dim};}}#{id} .hover-mode .highlighted{{opacity:1;}}#{id} .hover-mode .dep-arc.highlighted,#{id} .hover-mode .root-arc.highlighted{{stroke:{hl};stroke-width:{hsw}px;}}#{id} .hover-mode .dep-label.highlighted{{fill:{hl};font-weight:700;}}#{id} .hover-mode .word-block.highlighted .word-text{{fill:{hl};}}"#,
        dim = fmt(c.dim_opacity),
        hl = css_value(&c.highlight),
        hsw = fmt(arc.highlight_stroke_width),
    );
    out
}
