use super::{Backend, ParserAdapter};
use crate::model::{Token, TokenId};
use crate::{Error, Result};

const FIELDS: usize = 10;
const EMPTY: &str = "_";

/// CoNLL-U text. The first sentence is used; comment lines, multi-word ranges (`1-2`) and empty
/// nodes (`1.1`) are skipped. UPOS is used when present, XPOS otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConlluAdapter;

impl ParserAdapter for ConlluAdapter {
    fn backend(&self) -> Backend {
        Backend::Conllu
    }

    fn normalize(&self, payload: &str) -> Result<Vec<Token>> {
        let mut out = Vec::new();
        for (idx, raw) in payload.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() {
                if out.is_empty() {
                    continue;
                }
                break;
            }
            if line.starts_with('#') {
                continue;
            }

            let cols: Vec<&str> = line.split('\t').collect();
            if cols.len() != FIELDS {
                return Err(Error::Conllu {
                    line: line_no,
                    message: format!("expected {FIELDS} tab-separated fields, found {}", cols.len()),
                });
            }
            let id = cols[0];
            if id.contains('-') || id.contains('.') {
                continue;
            }
            let id: TokenId = id.parse().map_err(|_| Error::Conllu {
                line: line_no,
                message: format!("invalid ID `{id}`"),
            })?;
            let head = cols[6];
            if head == EMPTY {
                return Err(Error::Conllu {
                    line: line_no,
                    message: format!("token {id} has no HEAD"),
                });
            }
            let head: TokenId = head.parse().map_err(|_| Error::Conllu {
                line: line_no,
                message: format!("invalid HEAD `{head}`"),
            })?;
            let pos = if cols[3] != EMPTY { cols[3] } else { cols[4] };
            out.push(Token::new(id, cols[1], pos, head, cols[7]));
        }
        Ok(out)
    }
}
