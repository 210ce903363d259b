#![forbid(unsafe_code)]

//! `deparc` renders dependency parses as arc diagrams, headlessly.
//!
//! The core model (tokens, validation, statistics, parser adapters and the async analysis
//! session) is always available. Rendering is opt-in.
//!
//! # Features
//!
//! - `render`: layout, hover focus and SVG/HTML output (`deparc::render`)
//! - `raster`: PNG output via pure-Rust SVG rasterization

pub use deparc_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use deparc_render::focus::{
        FocusController, FocusGraph, FocusState, FocusTarget, Highlight, highlight, hit_test,
    };
    pub use deparc_render::geom::{Point, point};
    pub use deparc_render::html::{HtmlRenderOptions, render_html};
    pub use deparc_render::model::DependencyLayout;
    pub use deparc_render::svg::{SvgRenderOptions, render_svg, sanitize_svg_id};
    pub use deparc_render::table::stats_text_table;
    pub use deparc_render::text::{DeterministicTextMeasurer, TextMeasurer};
    pub use deparc_render::theme::Theme;
    pub use deparc_render::{LayoutOptions, layout_sentence};

    use deparc_core::{DependencyStats, Sentence, Token, ValidationOptions};

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Parse(#[from] deparc_core::Error),
        #[error(transparent)]
        Render(#[from] deparc_render::Error),
    }

    impl HeadlessError {
        /// Input rejected by validation (as opposed to a rendering or configuration failure).
        pub fn is_malformed_input(&self) -> bool {
            matches!(self, HeadlessError::Parse(e) if e.is_structural())
        }
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Everything derived from one token list.
    #[derive(Debug, Clone)]
    pub struct Rendered {
        pub sentence: Sentence,
        pub stats: DependencyStats,
        pub layout: DependencyLayout,
        /// The diagram in the `Normal` focus state.
        pub svg: String,
    }

    /// Synchronous validate + layout + SVG helper (executor-free).
    pub fn render_svg_sync(
        tokens: Vec<Token>,
        validation: ValidationOptions,
        layout_options: &LayoutOptions,
        svg_options: &SvgRenderOptions,
    ) -> Result<String> {
        let sentence = Sentence::from_tokens(tokens, validation)?;
        let layout = layout_sentence(&sentence, layout_options)?;
        Ok(render_svg(&layout, &layout_options.theme, svg_options))
    }

    /// Bundles options with the most recent render and its hover state.
    ///
    /// Each successful render fully replaces the previous one and resets focus to `Normal`; a
    /// failed render leaves the previous result untouched.
    #[derive(Debug, Clone, Default)]
    pub struct HeadlessRenderer {
        pub layout: LayoutOptions,
        pub svg: SvgRenderOptions,
        pub validation: ValidationOptions,
        current: Option<Rendered>,
        focus: FocusController,
    }

    impl HeadlessRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_theme(mut self, theme: Theme) -> Self {
            self.layout.theme = theme;
            self
        }

        pub fn with_validation(mut self, validation: ValidationOptions) -> Self {
            self.validation = validation;
            self
        }

        pub fn with_diagram_id(mut self, diagram_id: &str) -> Self {
            self.svg.diagram_id = Some(sanitize_svg_id(diagram_id));
            self
        }

        pub fn render(&mut self, tokens: Vec<Token>) -> Result<&Rendered> {
            let sentence = Sentence::from_tokens(tokens, self.validation)?;
            self.render_sentence(sentence)
        }

        /// Renders a JSON array of canonical token records.
        pub fn render_json(&mut self, json: &str) -> Result<&Rendered> {
            let sentence = deparc_core::sentence_from_json(json, self.validation)?;
            self.render_sentence(sentence)
        }

        pub fn render_sentence(&mut self, sentence: Sentence) -> Result<&Rendered> {
            let stats = DependencyStats::compute(&sentence);
            let layout = layout_sentence(&sentence, &self.layout)?;
            let svg_options = SvgRenderOptions {
                focus: None,
                ..self.svg.clone()
            };
            let svg = render_svg(&layout, &self.layout.theme, &svg_options);
            self.focus.reset();
            Ok(&*self.current.insert(Rendered {
                sentence,
                stats,
                layout,
                svg,
            }))
        }

        pub fn current(&self) -> Option<&Rendered> {
            self.current.as_ref()
        }

        pub fn focus_state(&self) -> FocusState {
            self.focus.state()
        }

        /// Current highlight; empty in the `Normal` state or before the first render.
        pub fn highlight(&self) -> Highlight {
            match &self.current {
                Some(r) => self.focus.highlight(&r.layout),
                None => Highlight::default(),
            }
        }

        pub fn pointer_enter(&mut self, target: FocusTarget) -> Highlight {
            if let Some(rendered) = &self.current {
                self.focus.pointer_enter_on(&rendered.layout, target);
            }
            self.highlight()
        }

        pub fn pointer_leave(&mut self, target: FocusTarget) -> Highlight {
            self.focus.pointer_leave(target);
            self.highlight()
        }

        /// Hit-tests `p` against the current layout and enters or leaves accordingly.
        pub fn pointer_move(&mut self, p: Point) -> Highlight {
            let Some(rendered) = &self.current else {
                return Highlight::default();
            };
            let tolerance = self.layout.theme.arc.hit_tolerance;
            match hit_test(&rendered.layout, p, tolerance) {
                Some(target) => self.pointer_enter(target),
                None => {
                    if let Some(focused) = self.focus.focused() {
                        self.focus.pointer_leave(focused);
                    }
                    self.highlight()
                }
            }
        }

        /// The current diagram rendered in the current focus state.
        pub fn focused_svg(&self) -> Option<String> {
            let rendered = self.current.as_ref()?;
            let options = SvgRenderOptions {
                focus: self.focus.focused(),
                ..self.svg.clone()
            };
            Some(render_svg(&rendered.layout, &self.layout.theme, &options))
        }

        pub fn render_html(&self, title: Option<&str>) -> Option<String> {
            let rendered = self.current.as_ref()?;
            let options = HtmlRenderOptions {
                title: title.map(str::to_string),
                svg: SvgRenderOptions {
                    focus: None,
                    ..self.svg.clone()
                },
                include_script: true,
            };
            Some(render_html(
                &rendered.layout,
                &rendered.stats,
                &self.layout.theme,
                &options,
            ))
        }

        #[cfg(feature = "raster")]
        pub fn render_png(&self, options: &raster::RasterOptions) -> raster::Result<Option<Vec<u8>>> {
            match self.focused_svg() {
                Some(svg) => Ok(Some(raster::svg_to_png(&svg, options)?)),
                None => Ok(None),
            }
        }
    }
}
