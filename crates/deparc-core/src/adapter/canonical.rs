use super::{Backend, ParserAdapter};
use crate::Result;
use crate::model::Token;

/// Canonical token records, e.g. a previous `normalize` output or a hand-written fixture.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalAdapter;

impl ParserAdapter for CanonicalAdapter {
    fn backend(&self) -> Backend {
        Backend::Canonical
    }

    fn normalize(&self, payload: &str) -> Result<Vec<Token>> {
        Ok(serde_json::from_str(payload)?)
    }
}
