//! Hover focus: a single-target state machine, the highlight sets it implies, and hit-testing.
//!
//! Highlights are always recomputed from scratch for the current target; there is no incremental
//! bookkeeping to undo on leave.

use crate::geom::{Point, distance_to_cubic, distance_to_segment, point, rect_contains};
use crate::model::DependencyLayout;
use deparc_core::{ROOT_HEAD, Sentence, TokenId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Straight pieces used to approximate an arc when hit-testing.
const ARC_HIT_SEGMENTS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FocusTarget {
    Token { id: TokenId },
    /// A governed edge, or the root stroke of `dep` when `head == 0`.
    Edge { head: TokenId, dep: TokenId },
}

impl FocusTarget {
    pub fn token(id: TokenId) -> Self {
        Self::Token { id }
    }

    pub fn edge(head: TokenId, dep: TokenId) -> Self {
        Self::Edge { head, dep }
    }

    pub fn root(id: TokenId) -> Self {
        Self::Edge {
            head: ROOT_HEAD,
            dep: id,
        }
    }

    /// Key used for `data-focus` attributes: `t<id>` or `a<head>-<dep>`.
    pub fn key(&self) -> String {
        match self {
            FocusTarget::Token { id } => format!("t{id}"),
            FocusTarget::Edge { head, dep } => format!("a{head}-{dep}"),
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        if let Some(id) = key.strip_prefix('t') {
            return id.parse().ok().map(Self::token);
        }
        let (head, dep) = key.strip_prefix('a')?.split_once('-')?;
        Some(Self::edge(head.parse().ok()?, dep.parse().ok()?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "target", rename_all = "snake_case")]
pub enum FocusState {
    #[default]
    Normal,
    Focused(FocusTarget),
}

/// Elements that stay fully opaque while a target is focused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub tokens: BTreeSet<TokenId>,
    /// Governed edges as `(head, dep)`.
    pub arcs: BTreeSet<(TokenId, TokenId)>,
    /// Tokens whose root stroke is highlighted.
    pub roots: BTreeSet<TokenId>,
}

impl Highlight {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.arcs.is_empty() && self.roots.is_empty()
    }

    /// `data-focus` keys of every highlighted element.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .tokens
            .iter()
            .map(|&id| FocusTarget::token(id).key())
            .collect();
        keys.extend(self.arcs.iter().map(|&(h, d)| FocusTarget::edge(h, d).key()));
        keys.extend(self.roots.iter().map(|&id| FocusTarget::root(id).key()));
        keys
    }

    pub fn contains(&self, target: FocusTarget) -> bool {
        match target {
            FocusTarget::Token { id } => self.tokens.contains(&id),
            FocusTarget::Edge { head, dep } if head == ROOT_HEAD => self.roots.contains(&dep),
            FocusTarget::Edge { head, dep } => self.arcs.contains(&(head, dep)),
        }
    }
}

/// The dependency structure a highlight is computed over.
pub trait FocusGraph {
    fn has_token(&self, id: TokenId) -> bool;
    fn is_root(&self, id: TokenId) -> bool;
    /// Drawn (governed) edges as `(head, dep)`.
    fn governed_edges(&self) -> Vec<(TokenId, TokenId)>;
}

impl FocusGraph for Sentence {
    fn has_token(&self, id: TokenId) -> bool {
        self.get(id).is_some()
    }

    fn is_root(&self, id: TokenId) -> bool {
        self.get(id).is_some_and(|t| t.is_root())
    }

    fn governed_edges(&self) -> Vec<(TokenId, TokenId)> {
        self.edges().map(|e| (e.head, e.dep)).collect()
    }
}

impl FocusGraph for DependencyLayout {
    fn has_token(&self, id: TokenId) -> bool {
        self.token(id).is_some()
    }

    fn is_root(&self, id: TokenId) -> bool {
        self.root(id).is_some()
    }

    fn governed_edges(&self) -> Vec<(TokenId, TokenId)> {
        self.arcs.iter().map(|a| (a.head, a.dep)).collect()
    }
}

/// Highlight implied by focusing `target`. Unknown targets highlight nothing.
///
/// - token `t`: `t`, every edge where `t` is head or dependent, the other endpoint of each, and
///   `t`'s root stroke when it is a root;
/// - edge `(h, d)`: the edge, `h` and `d`;
/// - root stroke of `d`: the stroke and `d`.
pub fn highlight<G: FocusGraph + ?Sized>(graph: &G, target: FocusTarget) -> Highlight {
    let mut out = Highlight::default();
    match target {
        FocusTarget::Token { id } => {
            if !graph.has_token(id) {
                return out;
            }
            out.tokens.insert(id);
            for (h, d) in graph.governed_edges() {
                if h == id || d == id {
                    out.arcs.insert((h, d));
                    out.tokens.insert(h);
                    out.tokens.insert(d);
                }
            }
            if graph.is_root(id) {
                out.roots.insert(id);
            }
        }
        FocusTarget::Edge { head, dep } if head == ROOT_HEAD => {
            if graph.is_root(dep) {
                out.roots.insert(dep);
                out.tokens.insert(dep);
            }
        }
        FocusTarget::Edge { head, dep } => {
            if graph.governed_edges().contains(&(head, dep)) {
                out.arcs.insert((head, dep));
                out.tokens.insert(head);
                out.tokens.insert(dep);
            }
        }
    }
    out
}

/// Pointer-driven focus state: `Normal` until a target is entered, back to `Normal` when that
/// target is left.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusController {
    state: FocusState,
}

impl FocusController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FocusState {
        self.state
    }

    pub fn focused(&self) -> Option<FocusTarget> {
        match self.state {
            FocusState::Normal => None,
            FocusState::Focused(t) => Some(t),
        }
    }

    /// Focuses `target`, replacing any previous focus. Returns whether the state changed.
    pub fn pointer_enter(&mut self, target: FocusTarget) -> bool {
        let next = FocusState::Focused(target);
        let changed = self.state != next;
        self.state = next;
        changed
    }

    /// Like [`Self::pointer_enter`], but only for targets present in `graph`. Entering an unknown
    /// target leaves the state untouched.
    pub fn pointer_enter_on<G: FocusGraph + ?Sized>(
        &mut self,
        graph: &G,
        target: FocusTarget,
    ) -> bool {
        if highlight(graph, target).is_empty() {
            return false;
        }
        self.pointer_enter(target)
    }

    /// Returns to `Normal` if `target` is the focused one; a leave for any other target is stale
    /// and ignored. Returns whether the state changed.
    pub fn pointer_leave(&mut self, target: FocusTarget) -> bool {
        if self.state == FocusState::Focused(target) {
            self.state = FocusState::Normal;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.state = FocusState::Normal;
    }

    pub fn highlight<G: FocusGraph + ?Sized>(&self, graph: &G) -> Highlight {
        match self.state {
            FocusState::Normal => Highlight::default(),
            FocusState::Focused(target) => highlight(graph, target),
        }
    }
}

/// Maps a pointer position to the element under it.
///
/// Precedence: relation labels, token blocks, arcs, root strokes (including their `ROOT` label).
/// Arcs and stems match within `tolerance` of the stroke.
pub fn hit_test(layout: &DependencyLayout, p: Point, tolerance: f64) -> Option<FocusTarget> {
    if !p.x.is_finite() || !p.y.is_finite() {
        return None;
    }
    let tolerance = if tolerance.is_finite() {
        tolerance.max(0.0)
    } else {
        0.0
    };

    if let Some(a) = layout
        .arcs
        .iter()
        .find(|a| rect_contains(&a.label.rect(), p))
    {
        return Some(FocusTarget::edge(a.head, a.dep));
    }
    if let Some(t) = layout.tokens.iter().find(|t| rect_contains(&t.rect(), p)) {
        return Some(FocusTarget::token(t.id));
    }

    let nearest_arc = layout
        .arcs
        .iter()
        .map(|a| (a, distance_to_cubic(p, a.curve(), ARC_HIT_SEGMENTS)))
        .filter(|(_, d)| *d <= tolerance)
        .min_by(|x, y| x.1.total_cmp(&y.1));
    if let Some((a, _)) = nearest_arc {
        return Some(FocusTarget::edge(a.head, a.dep));
    }

    layout
        .roots
        .iter()
        .find(|r| {
            rect_contains(&r.label.rect(), p)
                || distance_to_segment(p, point(r.x, r.top_y), point(r.x, r.bottom_y)) <= tolerance
        })
        .map(|r| FocusTarget::root(r.id))
}
