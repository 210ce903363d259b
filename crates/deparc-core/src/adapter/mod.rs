//! Parser adapters: normalize backend payloads into canonical [`Token`] records.
//!
//! Each backend's native output is accepted in exactly the shapes documented on its adapter and
//! fully normalized before it reaches validation or rendering.

mod canonical;
mod conllu;
mod hanlp;
mod spacy;
mod stanza;

pub use canonical::CanonicalAdapter;
pub use conllu::ConlluAdapter;
pub use hanlp::HanLpAdapter;
pub use spacy::SpacyAdapter;
pub use stanza::StanzaAdapter;

use crate::model::Token;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Canonical token records (`[{id, text, pos, head, rel}]`).
    #[default]
    Canonical,
    HanLp,
    Spacy,
    Stanza,
    Conllu,
}

impl Backend {
    pub const ALL: [Backend; 5] = [
        Backend::Canonical,
        Backend::HanLp,
        Backend::Spacy,
        Backend::Stanza,
        Backend::Conllu,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Canonical => "canonical",
            Backend::HanLp => "hanlp",
            Backend::Spacy => "spacy",
            Backend::Stanza => "stanza",
            Backend::Conllu => "conllu",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Backend::Canonical => "canonical",
            Backend::HanLp => "HanLP",
            Backend::Spacy => "spaCy",
            Backend::Stanza => "Stanza",
            Backend::Conllu => "CoNLL-U",
        };
        f.write_str(name)
    }
}

impl FromStr for Backend {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "canonical" | "tokens" | "json" => Ok(Self::Canonical),
            "hanlp" => Ok(Self::HanLp),
            "spacy" => Ok(Self::Spacy),
            "stanza" => Ok(Self::Stanza),
            "conllu" | "conll-u" | "conll" => Ok(Self::Conllu),
            _ => Err(()),
        }
    }
}

/// Normalizes one backend's raw payload into canonical tokens.
pub trait ParserAdapter: Send + Sync {
    fn backend(&self) -> Backend;

    fn normalize(&self, payload: &str) -> Result<Vec<Token>>;
}

/// Explicit backend → adapter table, built once by the host and passed where needed.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<Backend, Arc<dyn ParserAdapter>>,
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<_> = self.adapters.keys().map(|b| b.as_str()).collect();
        keys.sort_unstable();
        f.debug_struct("AdapterRegistry")
            .field("backends", &keys)
            .finish()
    }
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin_adapters() -> Self {
        let mut reg = Self::new();
        reg.insert(Arc::new(CanonicalAdapter));
        reg.insert(Arc::new(HanLpAdapter));
        reg.insert(Arc::new(SpacyAdapter));
        reg.insert(Arc::new(StanzaAdapter));
        reg.insert(Arc::new(ConlluAdapter));
        reg
    }

    pub fn insert(&mut self, adapter: Arc<dyn ParserAdapter>) {
        self.adapters.insert(adapter.backend(), adapter);
    }

    pub fn get(&self, backend: Backend) -> Option<Arc<dyn ParserAdapter>> {
        self.adapters.get(&backend).cloned()
    }

    pub fn normalize(&self, backend: Backend, payload: &str) -> Result<Vec<Token>> {
        let Some(adapter) = self.adapters.get(&backend) else {
            return Err(Error::adapter(backend, "no adapter registered"));
        };
        let tokens = adapter.normalize(payload)?;
        tracing::debug!(%backend, tokens = tokens.len(), "payload normalized");
        Ok(tokens)
    }
}

pub(crate) fn parse_json(backend: Backend, payload: &str) -> Result<serde_json::Value> {
    serde_json::from_str(payload)
        .map_err(|e| Error::adapter(backend, format!("invalid JSON: {e}")))
}
