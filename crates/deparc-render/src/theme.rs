//! Visual parameters shared by layout, SVG and HTML output.
//!
//! A [`Theme`] is a plain serde struct. Presets cover the two historical hosts (a web page and a
//! desktop window); hosts adjust them with a JSON overlay that is deep-merged onto the preset.

use crate::text::TextStyle;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Theme {
    pub name: String,
    pub canvas: CanvasTheme,
    pub arc: ArcTheme,
    pub block: BlockTheme,
    pub fonts: FontTheme,
    pub colors: ColorTheme,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasTheme {
    /// Minimum canvas width; the canvas grows when the token blocks do not fit.
    pub width: f64,
    pub height: f64,
    /// Symmetric left/right padding of the word row.
    pub side_padding: f64,
    /// Height of the word row at the bottom of the canvas. Arcs start at its top edge.
    pub words_row_height: f64,
    /// Smallest horizontal gap kept between neighbouring blocks.
    pub min_gap: f64,
    /// Space kept above the tallest arc or label.
    pub top_margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArcTheme {
    /// Height of an arc between adjacent tokens, minus one `slope`.
    pub base: f64,
    /// Extra height per token of distance.
    pub slope: f64,
    /// Control points sit at `baseline - height * control_factor`.
    pub control_factor: f64,
    /// Relation labels sit at `baseline - height * label_lift`.
    pub label_lift: f64,
    pub root_stem: f64,
    pub root_label_gap: f64,
    pub stroke_width: f64,
    pub highlight_stroke_width: f64,
    /// Pointer distance within which an arc or root stem counts as hovered.
    pub hit_tolerance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlockTheme {
    pub min_width: f64,
    /// Vertical gap between the word and its POS pill.
    pub word_pos_gap: f64,
    pub pos_padding_x: f64,
    pub pos_padding_y: f64,
    pub pos_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontTheme {
    pub word: TextStyle,
    pub pos: TextStyle,
    pub label: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorTheme {
    pub background: String,
    pub word: String,
    pub pos_text: String,
    pub pos_fill: String,
    pub pos_stroke: String,
    pub arc: String,
    pub root_arc: String,
    pub label: String,
    pub halo: String,
    pub highlight: String,
    pub flagged: String,
    /// Opacity of everything outside the focused neighbourhood.
    pub dim_opacity: f64,
}

const WORD_FONT: &str = r#""Noto Serif SC", "Songti SC", serif"#;
const UI_FONT: &str = r#"Inter, -apple-system, BlinkMacSystemFont, sans-serif"#;

impl Default for Theme {
    fn default() -> Self {
        Self::web()
    }
}

impl Default for CanvasTheme {
    fn default() -> Self {
        Theme::web().canvas
    }
}

impl Default for ArcTheme {
    fn default() -> Self {
        Theme::web().arc
    }
}

impl Default for BlockTheme {
    fn default() -> Self {
        Theme::web().block
    }
}

impl Default for FontTheme {
    fn default() -> Self {
        Theme::web().fonts
    }
}

impl Default for ColorTheme {
    fn default() -> Self {
        Theme::web().colors
    }
}

impl Theme {
    pub const PRESETS: [&'static str; 2] = ["web", "desktop"];

    /// Browser page preset.
    pub fn web() -> Self {
        Self {
            name: "web".to_string(),
            canvas: CanvasTheme {
                width: 800.0,
                height: 360.0,
                side_padding: 50.0,
                words_row_height: 60.0,
                min_gap: 16.0,
                top_margin: 8.0,
            },
            arc: ArcTheme {
                base: 30.0,
                slope: 12.0,
                control_factor: 1.5,
                label_lift: 1.15,
                root_stem: 70.0,
                root_label_gap: 10.0,
                stroke_width: 1.5,
                highlight_stroke_width: 2.5,
                hit_tolerance: 6.0,
            },
            block: BlockTheme {
                min_width: 40.0,
                word_pos_gap: 6.0,
                pos_padding_x: 8.0,
                pos_padding_y: 2.0,
                pos_radius: 12.0,
            },
            fonts: FontTheme {
                word: TextStyle {
                    font_family: Some(WORD_FONT.to_string()),
                    font_size: 22.0,
                    font_weight: Some("500".to_string()),
                },
                pos: TextStyle {
                    font_family: Some(UI_FONT.to_string()),
                    font_size: 11.0,
                    font_weight: Some("600".to_string()),
                },
                label: TextStyle {
                    font_family: Some(UI_FONT.to_string()),
                    font_size: 12.0,
                    font_weight: Some("500".to_string()),
                },
            },
            colors: ColorTheme {
                background: "#ffffff".to_string(),
                word: "#111827".to_string(),
                pos_text: "#6b7280".to_string(),
                pos_fill: "#f3f4f6".to_string(),
                pos_stroke: "#e5e7eb".to_string(),
                arc: "#6b7280".to_string(),
                root_arc: "#9ca3af".to_string(),
                label: "#374151".to_string(),
                halo: "#ffffff".to_string(),
                highlight: "#2563eb".to_string(),
                flagged: "#dc2626".to_string(),
                dim_opacity: 0.1,
            },
        }
    }

    /// Native window preset: larger type, taller arcs, softer strokes.
    pub fn desktop() -> Self {
        let mut theme = Self::web();
        theme.name = "desktop".to_string();
        theme.canvas.side_padding = 60.0;
        theme.canvas.words_row_height = 70.0;
        theme.arc.base = 40.0;
        theme.arc.slope = 14.0;
        theme.arc.control_factor = 1.3;
        theme.arc.label_lift = 1.1;
        theme.block.min_width = 50.0;
        theme.block.word_pos_gap = 8.0;
        theme.block.pos_padding_x = 10.0;
        theme.block.pos_padding_y = 3.0;
        theme.block.pos_radius = 14.0;
        theme.fonts.word.font_size = 24.0;
        theme.fonts.word.font_weight = Some("700".to_string());
        theme.fonts.pos.font_size = 12.0;
        theme.fonts.label.font_size = 13.0;
        theme.colors.pos_text = "#4b5563".to_string();
        theme.colors.arc = "#9ca3af".to_string();
        theme.colors.root_arc = "#d1d5db".to_string();
        theme.colors.label = "#4b5563".to_string();
        theme.colors.dim_opacity = 0.2;
        theme
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "web" | "default" => Some(Self::web()),
            "desktop" => Some(Self::desktop()),
            _ => None,
        }
    }

    /// Deep-merges a JSON overlay (e.g. `{"arc": {"slope": 20}}`) onto this theme.
    pub fn with_overrides(&self, overrides: &Value) -> Result<Self> {
        if !overrides.is_object() {
            return Err(Error::InvalidTheme {
                message: "theme overrides must be a JSON object".to_string(),
            });
        }
        let mut value = serde_json::to_value(self)?;
        deep_merge_value(&mut value, overrides);
        let theme: Theme = serde_json::from_value(value).map_err(|e| Error::InvalidTheme {
            message: e.to_string(),
        })?;
        tracing::debug!(theme = %theme.name, "theme overrides applied");
        Ok(theme)
    }

    pub(crate) fn check(&self) -> Result<()> {
        let canvas = &self.canvas;
        for (what, v) in [
            ("canvas width", canvas.width),
            ("canvas height", canvas.height),
            ("word font size", self.fonts.word.font_size),
            ("POS font size", self.fonts.pos.font_size),
            ("label font size", self.fonts.label.font_size),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(Error::LayoutMeasurement {
                    message: format!("{what} must be a positive number, got {v}"),
                });
            }
        }
        for (what, v) in [
            ("side padding", canvas.side_padding),
            ("words row height", canvas.words_row_height),
            ("minimum gap", canvas.min_gap),
            ("top margin", canvas.top_margin),
            ("arc base", self.arc.base),
            ("arc slope", self.arc.slope),
            ("control factor", self.arc.control_factor),
            ("label lift", self.arc.label_lift),
            ("root stem", self.arc.root_stem),
            ("root label gap", self.arc.root_label_gap),
            ("arc stroke width", self.arc.stroke_width),
            ("highlight stroke width", self.arc.highlight_stroke_width),
            ("hit tolerance", self.arc.hit_tolerance),
            ("block min width", self.block.min_width),
            ("word/POS gap", self.block.word_pos_gap),
            ("POS horizontal padding", self.block.pos_padding_x),
            ("POS vertical padding", self.block.pos_padding_y),
            ("POS pill radius", self.block.pos_radius),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::LayoutMeasurement {
                    message: format!("{what} must be a non-negative number, got {v}"),
                });
            }
        }
        let dim = self.colors.dim_opacity;
        if !(0.0..=1.0).contains(&dim) {
            return Err(Error::LayoutMeasurement {
                message: format!("dim opacity must be between 0 and 1, got {dim}"),
            });
        }
        Ok(())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::preset(s).ok_or_else(|| Error::InvalidTheme {
            message: format!(
                "unknown theme preset `{s}` (expected one of: {})",
                Self::PRESETS.join(", ")
            ),
        })
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}
