use crate::error::MalformedReason;
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 1-based token position as produced by the parser. `0` is reserved for "no head" (root).
pub type TokenId = u32;

pub const ROOT_HEAD: TokenId = 0;

/// One word of an analyzed sentence, in the canonical shape every parser adapter produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub text: String,
    pub pos: String,
    pub head: TokenId,
    pub rel: String,
    /// Derived; recomputed by [`Sentence::from_tokens`] whatever the caller supplied.
    #[serde(default)]
    pub out_degree: u32,
}

impl Token {
    pub fn new(
        id: TokenId,
        text: impl Into<String>,
        pos: impl Into<String>,
        head: TokenId,
        rel: impl Into<String>,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            pos: pos.into(),
            head,
            rel: rel.into(),
            out_degree: 0,
        }
    }

    pub fn is_root(&self) -> bool {
        self.head == ROOT_HEAD
    }
}

/// Resolved governor of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum HeadRef {
    Root,
    Token(TokenId),
    /// The token names a head that failed validation; the edge is not drawn.
    Missing(TokenId),
}

/// A governed dependency edge (`head -> dep`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub head: TokenId,
    pub dep: TokenId,
    pub rel: String,
    /// `|head - dep|` in token ids.
    pub distance: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlaggedEdge {
    pub id: TokenId,
    pub head: TokenId,
    pub reason: MalformedReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    FlaggedEdge(FlaggedEdge),
    NonContiguousIds {
        position: usize,
        expected: TokenId,
        found: TokenId,
    },
    Cycle {
        id: TokenId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Structural problems are returned as errors.
    #[default]
    Strict,
    /// Offending edges are skipped and recorded as diagnostics.
    Lenient,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    pub mode: ValidationMode,
}

impl ValidationOptions {
    /// Reject malformed token lists.
    pub fn strict() -> Self {
        Self {
            mode: ValidationMode::Strict,
        }
    }

    /// Accept malformed token lists, flagging what could not be drawn.
    pub fn lenient() -> Self {
        Self {
            mode: ValidationMode::Lenient,
        }
    }

    pub fn is_strict(&self) -> bool {
        self.mode == ValidationMode::Strict
    }
}

/// A validated, immutable sentence. Tokens are addressed through an explicit id map, never by
/// `head - 1` positional indexing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sentence {
    tokens: IndexMap<TokenId, Token>,
    diagnostics: Vec<Diagnostic>,
}

impl Default for Sentence {
    fn default() -> Self {
        Self::empty()
    }
}

impl Sentence {
    pub fn empty() -> Self {
        Self {
            tokens: IndexMap::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn from_tokens(tokens: Vec<Token>, options: ValidationOptions) -> Result<Self> {
        let strict = options.is_strict();
        let mut diagnostics = Vec::new();
        let mut map: IndexMap<TokenId, Token> = IndexMap::with_capacity(tokens.len());

        for (position, mut token) in tokens.into_iter().enumerate() {
            if token.id == ROOT_HEAD {
                return Err(Error::InvalidTokenId { id: token.id });
            }
            if map.contains_key(&token.id) {
                return Err(Error::DuplicateTokenId { id: token.id });
            }
            let expected = (position + 1) as TokenId;
            if token.id != expected {
                if strict {
                    return Err(Error::NonContiguousIds {
                        position,
                        expected,
                        found: token.id,
                    });
                }
                diagnostics.push(Diagnostic::NonContiguousIds {
                    position,
                    expected,
                    found: token.id,
                });
            }
            token.out_degree = 0;
            map.insert(token.id, token);
        }

        let mut flagged: Vec<FlaggedEdge> = Vec::new();
        for token in map.values() {
            let reason = if token.head == ROOT_HEAD {
                continue;
            } else if token.head == token.id {
                MalformedReason::SelfLoop
            } else if !map.contains_key(&token.head) {
                MalformedReason::HeadOutOfRange
            } else {
                continue;
            };
            if strict {
                return Err(Error::MalformedInput {
                    id: token.id,
                    head: token.head,
                    reason,
                });
            }
            tracing::warn!(
                id = token.id,
                head = token.head,
                %reason,
                "skipping malformed dependency edge"
            );
            flagged.push(FlaggedEdge {
                id: token.id,
                head: token.head,
                reason,
            });
        }

        let mut sentence = Self {
            tokens: map,
            diagnostics,
        };
        sentence
            .diagnostics
            .extend(flagged.iter().copied().map(Diagnostic::FlaggedEdge));

        for id in sentence.find_cycles() {
            if strict {
                return Err(Error::Cycle { id });
            }
            tracing::warn!(id, "dependency heads form a cycle");
            sentence.diagnostics.push(Diagnostic::Cycle { id });
        }

        let governed: Vec<TokenId> = sentence.edges().map(|e| e.head).collect();
        for head in governed {
            if let Some(t) = sentence.tokens.get_mut(&head) {
                t.out_degree += 1;
            }
        }

        tracing::debug!(
            tokens = sentence.len(),
            diagnostics = sentence.diagnostics.len(),
            "sentence validated"
        );
        Ok(sentence)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(&id)
    }

    /// 0-based position of `id` in sentence order.
    pub fn position(&self, id: TokenId) -> Option<usize> {
        self.tokens.get_index_of(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> + '_ {
        self.tokens.values()
    }

    pub fn tokens(&self) -> Vec<Token> {
        self.tokens.values().cloned().collect()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn flagged(&self) -> impl Iterator<Item = &FlaggedEdge> + '_ {
        self.diagnostics.iter().filter_map(|d| match d {
            Diagnostic::FlaggedEdge(f) => Some(f),
            _ => None,
        })
    }

    fn is_flagged(&self, id: TokenId) -> bool {
        self.flagged().any(|f| f.id == id)
    }

    pub fn head_of(&self, id: TokenId) -> Option<HeadRef> {
        let token = self.tokens.get(&id)?;
        Some(if token.head == ROOT_HEAD {
            HeadRef::Root
        } else if self.is_flagged(id) {
            HeadRef::Missing(token.head)
        } else {
            HeadRef::Token(token.head)
        })
    }

    /// Governed edges in sentence order of the dependent. Flagged edges are excluded.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.tokens.values().filter_map(move |t| {
            if t.head == ROOT_HEAD || self.is_flagged(t.id) {
                return None;
            }
            Some(Edge {
                head: t.head,
                dep: t.id,
                rel: t.rel.clone(),
                distance: t.head.abs_diff(t.id),
            })
        })
    }

    pub fn roots(&self) -> impl Iterator<Item = &Token> + '_ {
        self.tokens.values().filter(|t| t.is_root())
    }

    fn find_cycles(&self) -> Vec<TokenId> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            OnPath,
            Done,
        }

        let mut marks: HashMap<TokenId, Mark> = HashMap::with_capacity(self.len());
        let mut cycles = Vec::new();

        for start in self.tokens.keys().copied() {
            let mut path = Vec::new();
            let mut cur = start;
            loop {
                match marks.get(&cur) {
                    Some(Mark::Done) => break,
                    Some(Mark::OnPath) => {
                        cycles.push(cur);
                        break;
                    }
                    None => {}
                }
                marks.insert(cur, Mark::OnPath);
                path.push(cur);
                match self.head_of(cur) {
                    Some(HeadRef::Token(head)) => cur = head,
                    _ => break,
                }
            }
            for id in path {
                marks.insert(id, Mark::Done);
            }
        }

        cycles
    }
}
