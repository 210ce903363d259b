#![forbid(unsafe_code)]

//! Dependency-parse token model, validation and statistics (headless).
//!
//! Design goals:
//! - one canonical token record for every parser backend (HanLP, spaCy, Stanza, CoNLL-U)
//! - explicit `id -> token` addressing, never positional `head - 1` lookups
//! - runtime-agnostic async analysis (no specific executor required)

pub mod adapter;
pub mod error;
pub mod model;
pub mod session;
pub mod stats;

pub use adapter::{AdapterRegistry, Backend, ParserAdapter};
pub use error::{Error, MalformedReason, Result};
pub use model::{
    Diagnostic, Edge, FlaggedEdge, HeadRef, ROOT_HEAD, Sentence, Token, TokenId, ValidationMode,
    ValidationOptions,
};
pub use session::{AnalysisOutcome, AnalysisSession, ParserBackend, PayloadBackend, RequestTicket};
pub use stats::DependencyStats;

/// Parses canonical token JSON (`[{id, text, pos, head, rel}]`) and validates it.
pub fn sentence_from_json(json: &str, options: ValidationOptions) -> Result<Sentence> {
    let tokens: Vec<Token> = serde_json::from_str(json)?;
    Sentence::from_tokens(tokens, options)
}

#[cfg(test)]
mod tests;
