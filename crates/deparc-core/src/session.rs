//! Asynchronous analysis requests with stale-result suppression.
//!
//! The parse itself is delegated to an injected [`ParserBackend`]. An [`AnalysisSession`] hands out
//! one [`RequestTicket`] per request; a result is only accepted while its ticket is the newest one,
//! so a slow, superseded request can never overwrite a newer render.

use crate::adapter::{Backend, ParserAdapter};
use crate::model::{Sentence, Token, ValidationOptions};
use crate::{Error, Result};
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A parser capability (cloud API, local pipeline, ...) producing canonical tokens for a text.
pub trait ParserBackend: Send + Sync {
    fn backend(&self) -> Backend;

    fn analyze<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<Token>>>;
}

/// A [`ParserBackend`] built from a host-supplied payload fetcher and the adapter for its format.
///
/// The fetcher owns transport concerns (HTTP client, credentials, subprocess); the adapter turns
/// whatever it returns into tokens.
pub struct PayloadBackend<F> {
    adapter: Arc<dyn ParserAdapter>,
    fetch: F,
}

impl<F> std::fmt::Debug for PayloadBackend<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadBackend")
            .field("backend", &self.adapter.backend())
            .finish_non_exhaustive()
    }
}

impl<F, Fut> PayloadBackend<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String>> + Send + 'static,
{
    pub fn new(adapter: Arc<dyn ParserAdapter>, fetch: F) -> Self {
        Self { adapter, fetch }
    }
}

impl<F, Fut> ParserBackend for PayloadBackend<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String>> + Send + 'static,
{
    fn backend(&self) -> Backend {
        self.adapter.backend()
    }

    fn analyze<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<Token>>> {
        Box::pin(async move {
            let payload = (self.fetch)(text.to_string()).await?;
            self.adapter.normalize(&payload)
        })
    }
}

/// Identifies one analysis request issued by [`AnalysisSession::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket {
    generation: u64,
}

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
pub enum AnalysisOutcome {
    /// The newest request finished and its tokens validated.
    Ready(Sentence),
    /// The newest request failed (backend, adapter or validation error). Never retried.
    Failed(Error),
    /// A newer request was issued (or the session cancelled) before this one finished; its result
    /// was dropped.
    Stale { request: u64 },
}

impl AnalysisOutcome {
    pub fn is_stale(&self) -> bool {
        matches!(self, AnalysisOutcome::Stale { .. })
    }

    pub fn into_result(self) -> Option<Result<Sentence>> {
        match self {
            AnalysisOutcome::Ready(s) => Some(Ok(s)),
            AnalysisOutcome::Failed(e) => Some(Err(e)),
            AnalysisOutcome::Stale { .. } => None,
        }
    }
}

/// Generation counter shared by every request of one host view.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    generation: AtomicU64,
    validation: ValidationOptions,
}

impl AnalysisSession {
    pub fn new(validation: ValidationOptions) -> Self {
        Self {
            generation: AtomicU64::new(0),
            validation,
        }
    }

    pub fn validation(&self) -> ValidationOptions {
        self.validation
    }

    /// Starts a request, superseding every request issued before it.
    pub fn begin(&self) -> RequestTicket {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(generation, "analysis request issued");
        RequestTicket { generation }
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.current_generation() == ticket.generation
    }

    /// Invalidates every in-flight request; their results will settle as [`AnalysisOutcome::Stale`].
    pub fn cancel(&self) {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(generation, "in-flight analysis requests cancelled");
    }

    /// Accepts or discards the result of the request identified by `ticket`.
    pub fn settle(&self, ticket: RequestTicket, result: Result<Vec<Token>>) -> AnalysisOutcome {
        if !self.is_current(ticket) {
            tracing::warn!(
                request = ticket.generation,
                current = self.current_generation(),
                "discarding stale analysis result"
            );
            return AnalysisOutcome::Stale {
                request: ticket.generation,
            };
        }
        match result.and_then(|tokens| Sentence::from_tokens(tokens, self.validation)) {
            Ok(sentence) => AnalysisOutcome::Ready(sentence),
            Err(err) => AnalysisOutcome::Failed(err),
        }
    }

    /// Runs one request end to end: issue a ticket, await the backend, settle the result.
    pub async fn analyze(&self, backend: &dyn ParserBackend, text: &str) -> AnalysisOutcome {
        let ticket = self.begin();
        let result = backend.analyze(text).await;
        self.settle(ticket, result)
    }
}
