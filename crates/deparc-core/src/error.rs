use crate::adapter::Backend;
use crate::model::TokenId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed input: token {id} has head {head} ({reason})")]
    MalformedInput {
        id: TokenId,
        head: TokenId,
        reason: MalformedReason,
    },

    #[error("Duplicate token id: {id}")]
    DuplicateTokenId { id: TokenId },

    #[error("Invalid token id: {id} (token ids start at 1)")]
    InvalidTokenId { id: TokenId },

    #[error("Token ids are not dense: expected {expected} at position {position}, found {found}")]
    NonContiguousIds {
        position: usize,
        expected: TokenId,
        found: TokenId,
    },

    #[error("Head relation contains a cycle through token {id}")]
    Cycle { id: TokenId },

    #[error("{backend} payload error: {message}")]
    Adapter { backend: Backend, message: String },

    #[error("CoNLL-U error at line {line}: {message}")]
    Conllu { line: usize, message: String },

    #[error("token JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn adapter(backend: Backend, message: impl Into<String>) -> Self {
        Self::Adapter {
            backend,
            message: message.into(),
        }
    }

    /// True for errors caused by the shape of the token list itself (as opposed to payload
    /// decoding errors).
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Error::MalformedInput { .. }
                | Error::DuplicateTokenId { .. }
                | Error::InvalidTokenId { .. }
                | Error::NonContiguousIds { .. }
                | Error::Cycle { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedReason {
    /// `head` does not name any token in the sentence.
    HeadOutOfRange,
    /// `head == id`.
    SelfLoop,
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedReason::HeadOutOfRange => f.write_str("head out of range"),
            MalformedReason::SelfLoop => f.write_str("token is its own head"),
        }
    }
}
