use super::{Backend, ParserAdapter};
use crate::model::{ROOT_HEAD, Token, TokenId};
use crate::{Error, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SpacyDoc {
    text: String,
    tokens: Vec<SpacyToken>,
}

#[derive(Debug, Deserialize)]
struct SpacyToken {
    id: usize,
    start: usize,
    end: usize,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    pos: String,
    #[serde(default)]
    dep: String,
    head: usize,
}

/// spaCy `Doc.to_json()` output.
///
/// Token ids and heads are 0-based document indices; a token that is its own head is a root.
/// Surface text is sliced from the document text by character offsets unless a token carries
/// its own `text`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacyAdapter;

impl ParserAdapter for SpacyAdapter {
    fn backend(&self) -> Backend {
        Backend::Spacy
    }

    fn normalize(&self, payload: &str) -> Result<Vec<Token>> {
        let doc: SpacyDoc = serde_json::from_str(payload)
            .map_err(|e| Error::adapter(Backend::Spacy, format!("invalid Doc JSON: {e}")))?;
        let chars: Vec<char> = doc.text.chars().collect();

        let mut out = Vec::with_capacity(doc.tokens.len());
        for tok in &doc.tokens {
            let text = match &tok.text {
                Some(t) => t.clone(),
                None => {
                    if tok.start > tok.end || tok.end > chars.len() {
                        return Err(Error::adapter(
                            Backend::Spacy,
                            format!(
                                "token {} offsets {}..{} outside text",
                                tok.id, tok.start, tok.end
                            ),
                        ));
                    }
                    chars[tok.start..tok.end].iter().collect()
                }
            };
            let id = to_token_id(tok.id)?;
            let head = if tok.head == tok.id {
                ROOT_HEAD
            } else {
                to_token_id(tok.head)?
            };
            out.push(Token::new(id, text, tok.pos.clone(), head, tok.dep.clone()));
        }
        Ok(out)
    }
}

fn to_token_id(index: usize) -> Result<TokenId> {
    TokenId::try_from(index + 1)
        .map_err(|_| Error::adapter(Backend::Spacy, format!("token index {index} too large")))
}
