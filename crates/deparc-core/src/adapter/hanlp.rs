use super::{Backend, ParserAdapter, parse_json};
use crate::model::{Token, TokenId};
use crate::{Error, Result};
use serde_json::Value;

const TOKEN_KEYS: &[&str] = &["tok/fine", "tok/coarse", "tok"];
const POS_KEYS: &[&str] = &["pos/ctb", "pos/pku", "pos/863", "pos"];
const UNKNOWN_POS: &str = "X";

/// HanLP RESTful `parse(text, tasks='dep')` response.
///
/// Accepted shapes:
/// - tokens under `tok/fine`, `tok/coarse` or `tok`,
/// - POS tags under `pos/ctb`, `pos/pku`, `pos/863` or `pos` (missing tags become `X`),
/// - `dep` as `[head, rel]` pairs,
///
/// each either flat (one sentence) or as a per-sentence list, in which case the first sentence is
/// used.
#[derive(Debug, Clone, Copy, Default)]
pub struct HanLpAdapter;

impl ParserAdapter for HanLpAdapter {
    fn backend(&self) -> Backend {
        Backend::HanLp
    }

    fn normalize(&self, payload: &str) -> Result<Vec<Token>> {
        let doc = parse_json(Backend::HanLp, payload)?;
        let Some(doc) = doc.as_object() else {
            return Err(Error::adapter(Backend::HanLp, "expected a JSON object"));
        };

        let Some(tokens) = TOKEN_KEYS.iter().find_map(|k| doc.get(*k)) else {
            return Err(Error::adapter(Backend::HanLp, "missing `tok` field"));
        };
        let tokens = first_sentence(tokens, |v| v.is_string());
        let pos = POS_KEYS
            .iter()
            .find_map(|k| doc.get(*k))
            .map(|v| first_sentence(v, |v| v.is_string()))
            .unwrap_or_default();
        let Some(dep) = doc.get("dep") else {
            return Err(Error::adapter(Backend::HanLp, "missing `dep` field"));
        };
        let dep = first_sentence(dep, |v| v.get(0).is_some_and(Value::is_number));

        if dep.len() != tokens.len() {
            return Err(Error::adapter(
                Backend::HanLp,
                format!(
                    "`dep` has {} entries but `tok` has {}",
                    dep.len(),
                    tokens.len()
                ),
            ));
        }

        let mut out = Vec::with_capacity(tokens.len());
        for (i, (tok, arc)) in tokens.iter().zip(dep.iter()).enumerate() {
            let Some(text) = tok.as_str() else {
                return Err(Error::adapter(
                    Backend::HanLp,
                    format!("token {i} is not a string"),
                ));
            };
            let pos = pos
                .get(i)
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN_POS)
                .to_string();
            let (head, rel) = dep_pair(arc)
                .ok_or_else(|| Error::adapter(Backend::HanLp, format!("bad `dep` entry {i}")))?;
            out.push(Token::new((i + 1) as TokenId, text, pos, head, rel));
        }
        Ok(out)
    }
}

/// Returns the first sentence of a per-sentence list, or the list itself when it is flat.
///
/// `is_leaf` recognizes an element of the flat form, so nested lists of pairs (`dep`) are told
/// apart from a flat list of pairs.
fn first_sentence(v: &Value, is_leaf: impl Fn(&Value) -> bool) -> Vec<Value> {
    let Some(items) = v.as_array() else {
        return Vec::new();
    };
    match items.first() {
        Some(first) if !is_leaf(first) && first.is_array() => {
            if items.len() > 1 {
                tracing::debug!(
                    sentences = items.len(),
                    "HanLP payload has several sentences; using the first"
                );
            }
            first.as_array().cloned().unwrap_or_default()
        }
        _ => items.clone(),
    }
}

fn dep_pair(v: &Value) -> Option<(TokenId, String)> {
    let pair = v.as_array()?;
    let head = pair.first()?.as_u64()?;
    let rel = pair.get(1)?.as_str()?;
    Some((TokenId::try_from(head).ok()?, rel.to_string()))
}
