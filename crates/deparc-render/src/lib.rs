#![forbid(unsafe_code)]

//! Headless layout and rendering for dependency arc diagrams.
//!
//! The pipeline is `Sentence -> DependencyLayout -> SVG/HTML`. Layout is pure geometry computed
//! with an injected [`TextMeasurer`]; renderers only read the layout and a [`Theme`].

pub mod focus;
pub mod geom;
pub mod html;
pub mod layout;
pub mod model;
pub mod svg;
pub mod table;
pub mod text;
pub mod theme;

use crate::text::{DeterministicTextMeasurer, TextMeasurer};
use crate::theme::Theme;
use std::sync::Arc;

pub use focus::{FocusController, FocusGraph, FocusState, FocusTarget, Highlight, highlight, hit_test};
pub use html::{HtmlRenderOptions, render_html};
pub use layout::layout_sentence;
pub use model::DependencyLayout;
pub use svg::{SvgRenderOptions, render_svg, sanitize_svg_id};
pub use table::stats_text_table;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("layout measurement failed: {message}")]
    LayoutMeasurement { message: String },
    #[error("invalid theme: {message}")]
    InvalidTheme { message: String },
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone)]
pub struct LayoutOptions {
    pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
    pub theme: Theme,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            text_measurer: Arc::new(DeterministicTextMeasurer::default()),
            theme: Theme::default(),
        }
    }
}

impl std::fmt::Debug for LayoutOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutOptions")
            .field("theme", &self.theme.name)
            .finish_non_exhaustive()
    }
}

impl LayoutOptions {
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_text_measurer(mut self, measurer: Arc<dyn TextMeasurer + Send + Sync>) -> Self {
        self.text_measurer = measurer;
        self
    }
}
