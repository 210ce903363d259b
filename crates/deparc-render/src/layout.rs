//! Arc diagram layout.
//!
//! Two passes: every token block is measured first, then blocks are spread along the baseline
//! (flex `space-between` inside the side padding) and arcs are derived from the block centers.

use crate::model::{
    ArcLayout, Bounds, DependencyLayout, LayoutLabel, LayoutPoint, RootMarker, TokenBox,
};
use crate::text::{TextMeasurer, TextMetrics, TextStyle};
use crate::{Error, LayoutOptions, Result};
use deparc_core::Sentence;
use deparc_core::stats::ROOT_LABEL;

/// Share of the control-point lift reached by the apex of a symmetric cubic Bézier.
const BEZIER_APEX: f64 = 0.75;

struct Measured {
    word: TextMetrics,
    pos: TextMetrics,
    pill_width: f64,
    pill_height: f64,
    width: f64,
    height: f64,
}

/// Measures `text`, rejecting non-finite metrics. `what` names the text in the error.
fn measure(
    measurer: &dyn TextMeasurer,
    text: &str,
    style: &TextStyle,
    what: impl FnOnce() -> String,
) -> Result<TextMetrics> {
    let metrics = measurer.measure(text, style);
    if !metrics.is_finite() {
        return Err(Error::LayoutMeasurement {
            message: format!("text measurer returned invalid metrics for {}", what()),
        });
    }
    Ok(metrics)
}

pub fn layout_sentence(sentence: &Sentence, options: &LayoutOptions) -> Result<DependencyLayout> {
    let theme = &options.theme;
    theme.check()?;
    let measurer = options.text_measurer.as_ref();
    let block = &theme.block;
    let canvas = &theme.canvas;

    let mut measured = Vec::with_capacity(sentence.len());
    for token in sentence.iter() {
        let word = measure(measurer, &token.text, &theme.fonts.word, || {
            format!("the word of token {}", token.id)
        })?;
        let pos = measure(measurer, &token.pos, &theme.fonts.pos, || {
            format!("the POS tag of token {}", token.id)
        })?;
        let pill_width = pos.width + 2.0 * block.pos_padding_x;
        let pill_height = pos.height + 2.0 * block.pos_padding_y;
        measured.push(Measured {
            word,
            pos,
            pill_width,
            pill_height,
            width: word.width.max(pill_width).max(block.min_width),
            height: word.height + block.word_pos_gap + pill_height,
        });
    }

    let count = measured.len();
    let blocks_width: f64 = measured.iter().map(|m| m.width).sum();
    let row_height = measured
        .iter()
        .map(|m| m.height)
        .fold(canvas.words_row_height, f64::max);
    let needed_width =
        blocks_width + count.saturating_sub(1) as f64 * canvas.min_gap + 2.0 * canvas.side_padding;
    let width = canvas.width.max(needed_width);

    // Horizontal placement (`justify-content: space-between`): a single block sits at the start.
    let gap = if count > 1 {
        (width - 2.0 * canvas.side_padding - blocks_width) / (count - 1) as f64
    } else {
        0.0
    };
    let mut lefts = Vec::with_capacity(count);
    let mut x = canvas.side_padding;
    for m in &measured {
        lefts.push(x);
        x += m.width + gap;
    }
    let centers: Vec<f64> = lefts
        .iter()
        .zip(&measured)
        .map(|(left, m)| left + m.width / 2.0)
        .collect();

    // Vertical extent needed above the baseline, so the canvas can grow instead of clipping.
    let mut arc_inputs = Vec::new();
    let mut above: f64 = 0.0;
    for edge in sentence.edges() {
        let (Some(h), Some(d)) = (sentence.position(edge.head), sentence.position(edge.dep)) else {
            continue;
        };
        let span = h.abs_diff(d);
        let height = theme.arc.base + span as f64 * theme.arc.slope;
        let label = measure(measurer, &edge.rel, &theme.fonts.label, || {
            format!("label `{}`", edge.rel)
        })?;
        above = above
            .max(BEZIER_APEX * height * theme.arc.control_factor)
            .max(height * theme.arc.label_lift + label.height / 2.0);
        arc_inputs.push((edge, h, d, span, height, label));
    }
    let root_label = measure(measurer, ROOT_LABEL, &theme.fonts.label, || {
        format!("label `{ROOT_LABEL}`")
    })?;
    if sentence.roots().next().is_some() {
        above = above.max(theme.arc.root_stem + theme.arc.root_label_gap + root_label.height);
    }

    let mut height = canvas.height.max(row_height);
    let mut baseline_y = height - row_height;
    let needed_above = above + canvas.top_margin;
    if baseline_y < needed_above {
        height += needed_above - baseline_y;
        baseline_y = needed_above;
    }

    let mut tokens = Vec::with_capacity(count);
    for ((token, m), left) in sentence.iter().zip(&measured).zip(&lefts) {
        let cx = left + m.width / 2.0;
        let top = height - m.height;
        let pill_top = top + m.word.height + block.word_pos_gap;
        tokens.push(TokenBox {
            id: token.id,
            x: *left,
            y: top,
            width: m.width,
            height: m.height,
            word: LayoutLabel {
                text: token.text.clone(),
                x: cx,
                y: top + m.word.height / 2.0,
                width: m.word.width,
                height: m.word.height,
            },
            pos: LayoutLabel {
                text: token.pos.clone(),
                x: cx,
                y: pill_top + m.pill_height / 2.0,
                width: m.pos.width,
                height: m.pos.height,
            },
            pos_pill: Bounds {
                min_x: cx - m.pill_width / 2.0,
                min_y: pill_top,
                max_x: cx + m.pill_width / 2.0,
                max_y: pill_top + m.pill_height,
            },
            flagged: sentence.flagged().any(|f| f.id == token.id),
        });
    }

    let mut arcs = Vec::with_capacity(arc_inputs.len());
    for (edge, h, d, span, arc_height, label) in arc_inputs {
        let (sx, ex) = (centers[h], centers[d]);
        let control_y = baseline_y - arc_height * theme.arc.control_factor;
        arcs.push(ArcLayout {
            head: edge.head,
            dep: edge.dep,
            distance: edge.distance,
            span,
            height: arc_height,
            start: LayoutPoint::new(sx, baseline_y),
            control1: LayoutPoint::new(sx, control_y),
            control2: LayoutPoint::new(ex, control_y),
            end: LayoutPoint::new(ex, baseline_y),
            peak_y: baseline_y - BEZIER_APEX * arc_height * theme.arc.control_factor,
            label: LayoutLabel {
                text: edge.rel.clone(),
                x: (sx + ex) / 2.0,
                y: baseline_y - arc_height * theme.arc.label_lift,
                width: label.width,
                height: label.height,
            },
            rel: edge.rel,
        });
    }

    let mut roots = Vec::new();
    for token in sentence.roots() {
        let Some(p) = sentence.position(token.id) else {
            continue;
        };
        let x = centers[p];
        let top_y = baseline_y - theme.arc.root_stem;
        roots.push(RootMarker {
            id: token.id,
            x,
            bottom_y: baseline_y,
            top_y,
            label: LayoutLabel {
                text: ROOT_LABEL.to_string(),
                x,
                y: top_y - theme.arc.root_label_gap - root_label.height / 2.0,
                width: root_label.width,
                height: root_label.height,
            },
        });
    }

    let layout = DependencyLayout {
        width,
        height,
        baseline_y,
        tokens,
        arcs,
        roots,
        flagged: sentence.flagged().copied().collect(),
    };
    tracing::debug!(
        tokens = layout.tokens.len(),
        arcs = layout.arcs.len(),
        roots = layout.roots.len(),
        width = layout.width,
        height = layout.height,
        "dependency layout computed"
    );
    Ok(layout)
}
