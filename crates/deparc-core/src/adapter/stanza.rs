use super::{Backend, ParserAdapter, parse_json};
use crate::model::{Token, TokenId};
use crate::{Error, Result};
use serde_json::Value;

/// Stanza `Doc.to_dict()` output: a list of sentences, each a list of word dicts.
///
/// Only the first sentence is used. Multi-word token entries (whose `id` is a range such as
/// `[1, 2]`) are skipped; their syntactic words follow them as regular entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct StanzaAdapter;

impl ParserAdapter for StanzaAdapter {
    fn backend(&self) -> Backend {
        Backend::Stanza
    }

    fn normalize(&self, payload: &str) -> Result<Vec<Token>> {
        let doc = parse_json(Backend::Stanza, payload)?;
        let Some(sentences) = doc.as_array() else {
            return Err(Error::adapter(
                Backend::Stanza,
                "expected a list of sentences",
            ));
        };
        let Some(first) = sentences.first() else {
            return Ok(Vec::new());
        };
        if sentences.len() > 1 {
            tracing::debug!(
                sentences = sentences.len(),
                "Stanza payload has several sentences; using the first"
            );
        }
        let Some(words) = first.as_array() else {
            return Err(Error::adapter(
                Backend::Stanza,
                "sentence is not a list of words",
            ));
        };

        let mut out = Vec::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            let id = match word.get("id") {
                Some(Value::Array(_)) => continue,
                Some(v) => id_field(v).ok_or_else(|| bad_field(i, "id"))?,
                None => return Err(bad_field(i, "id")),
            };
            let text = word
                .get("text")
                .and_then(Value::as_str)
                .ok_or_else(|| bad_field(i, "text"))?;
            let head = word
                .get("head")
                .and_then(id_field)
                .ok_or_else(|| bad_field(i, "head"))?;
            let pos = word
                .get("upos")
                .or_else(|| word.get("xpos"))
                .and_then(Value::as_str)
                .unwrap_or("X");
            let rel = word.get("deprel").and_then(Value::as_str).unwrap_or("dep");
            out.push(Token::new(id, text, pos, head, rel));
        }
        Ok(out)
    }
}

fn id_field(v: &Value) -> Option<TokenId> {
    v.as_u64().and_then(|n| TokenId::try_from(n).ok())
}

fn bad_field(index: usize, field: &str) -> Error {
    Error::adapter(
        Backend::Stanza,
        format!("word {index} has a missing or invalid `{field}`"),
    )
}
