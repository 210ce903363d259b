use crate::geom::{Point, Rect, point, rect};
use deparc_core::{FlaggedEdge, TokenId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }

    pub fn to_rect(&self) -> Rect {
        rect(
            self.min_x,
            self.min_y,
            self.max_x - self.min_x,
            self.max_y - self.min_y,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

impl LayoutPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_point(self) -> Point {
        point(self.x, self.y)
    }
}

/// A single-line text box, positioned by its center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutLabel {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutLabel {
    pub fn rect(&self) -> Rect {
        rect(
            self.x - self.width / 2.0,
            self.y - self.height / 2.0,
            self.width,
            self.height,
        )
    }
}

/// One word block: the word above its POS pill, bottom-aligned in the word row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenBox {
    pub id: TokenId,
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub word: LayoutLabel,
    pub pos: LayoutLabel,
    /// Pill behind the POS label (wider and taller than the label by the theme padding).
    pub pos_pill: Bounds,
    /// The head of this token was rejected during validation.
    pub flagged: bool,
}

impl TokenBox {
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn rect(&self) -> Rect {
        rect(self.x, self.y, self.width, self.height)
    }
}

/// A governed edge drawn as `M start C control1 control2 end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcLayout {
    pub head: TokenId,
    pub dep: TokenId,
    pub rel: String,
    /// `|head - dep|` in token ids (the dependency distance).
    pub distance: u32,
    /// `|head - dep|` in sentence positions; drives the arc height.
    pub span: usize,
    pub height: f64,
    pub start: LayoutPoint,
    pub control1: LayoutPoint,
    pub control2: LayoutPoint,
    pub end: LayoutPoint,
    /// Topmost y of the curve.
    pub peak_y: f64,
    pub label: LayoutLabel,
}

impl ArcLayout {
    pub fn curve(&self) -> [Point; 4] {
        [
            self.start.to_point(),
            self.control1.to_point(),
            self.control2.to_point(),
            self.end.to_point(),
        ]
    }
}

/// Dashed stem plus `ROOT` label above a root token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootMarker {
    pub id: TokenId,
    pub x: f64,
    pub bottom_y: f64,
    pub top_y: f64,
    pub label: LayoutLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyLayout {
    pub width: f64,
    pub height: f64,
    /// Arcs start and end on this line (the top edge of the word row).
    pub baseline_y: f64,
    pub tokens: Vec<TokenBox>,
    pub arcs: Vec<ArcLayout>,
    pub roots: Vec<RootMarker>,
    pub flagged: Vec<FlaggedEdge>,
}

impl DependencyLayout {
    pub fn token(&self, id: TokenId) -> Option<&TokenBox> {
        self.tokens.iter().find(|t| t.id == id)
    }

    pub fn arc(&self, head: TokenId, dep: TokenId) -> Option<&ArcLayout> {
        self.arcs.iter().find(|a| a.head == head && a.dep == dep)
    }

    pub fn root(&self, id: TokenId) -> Option<&RootMarker> {
        self.roots.iter().find(|r| r.id == id)
    }

    /// Extent of everything drawn.
    pub fn content_bounds(&self) -> Option<Bounds> {
        let mut pts: Vec<(f64, f64)> = Vec::new();
        for t in &self.tokens {
            pts.push((t.x, t.y));
            pts.push((t.x + t.width, t.y + t.height));
        }
        for a in &self.arcs {
            let r = a.label.rect();
            pts.push((a.start.x, a.peak_y));
            pts.push((a.end.x, a.start.y));
            pts.push((r.min_x(), r.min_y()));
            pts.push((r.max_x(), r.max_y()));
        }
        for m in &self.roots {
            let r = m.label.rect();
            pts.push((r.min_x(), r.min_y()));
            pts.push((r.max_x(), m.bottom_y));
        }
        Bounds::from_points(pts)
    }
}
