//! Fallback chain as a small state machine: `Trying(i)` → `Succeeded` | `Exhausted`.
//!
//! [`transition`] is pure; [`FallbackChain::run`] drives it, making at most one call per
//! candidate, strictly in series. A candidate is never retried.

use super::{CompletionBackend, CompletionRequest, ProviderCandidate, ProviderKind};
use crate::error::{AuroraError, AuroraResult, ProviderError};
use serde::Serialize;
use std::time::Duration;

/// Reply text plus the candidate that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyResult {
    pub text: String,
    pub provider: ProviderKind,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChainState {
    Trying(usize),
    Succeeded { index: usize, text: String },
    Exhausted,
}

impl ChainState {
    pub fn start(len: usize) -> Self {
        if len == 0 {
            ChainState::Exhausted
        } else {
            ChainState::Trying(0)
        }
    }
}

/// What happened to candidate `i`.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    /// Credential absent; no call was made.
    Skipped,
    Failed(ProviderError),
    Replied(String),
}

/// Next state after candidate `index` (of `len`) produced `outcome`.
pub fn transition(index: usize, len: usize, outcome: AttemptOutcome) -> ChainState {
    match outcome {
        AttemptOutcome::Replied(text) if !text.trim().is_empty() => {
            ChainState::Succeeded { index, text }
        }
        _ if index + 1 < len => ChainState::Trying(index + 1),
        _ => ChainState::Exhausted,
    }
}

pub struct FallbackChain<'a> {
    candidates: &'a [ProviderCandidate],
    call_timeout: Duration,
}

impl<'a> FallbackChain<'a> {
    pub fn new(candidates: &'a [ProviderCandidate], call_timeout: Duration) -> Self {
        Self {
            candidates,
            call_timeout,
        }
    }

    pub async fn run<B: CompletionBackend + ?Sized>(
        &self,
        backend: &B,
        request: &CompletionRequest,
    ) -> AuroraResult<ReplyResult> {
        let len = self.candidates.len();
        let mut attempted = 0usize;
        let mut state = ChainState::start(len);
        loop {
            match state {
                ChainState::Trying(i) => {
                    let candidate = &self.candidates[i];
                    let outcome = if candidate.has_credential() {
                        attempted += 1;
                        self.attempt(backend, candidate, request).await
                    } else {
                        tracing::debug!(
                            "[chain] skipping {} ({} not set)",
                            candidate.label(),
                            candidate.provider.credential_env()
                        );
                        AttemptOutcome::Skipped
                    };
                    if let AttemptOutcome::Failed(ref e) = outcome {
                        tracing::warn!("[chain] {} failed: {}", candidate.label(), e);
                    }
                    state = transition(i, len, outcome);
                }
                ChainState::Succeeded { index, text } => {
                    let c = &self.candidates[index];
                    tracing::info!("[chain] reply from {}", c.label());
                    return Ok(ReplyResult {
                        text,
                        provider: c.provider,
                        model: c.model.clone(),
                    });
                }
                ChainState::Exhausted => {
                    tracing::error!(
                        "[chain] all providers exhausted ({} of {} candidates called)",
                        attempted,
                        len
                    );
                    return Err(AuroraError::AllProvidersExhausted { attempted });
                }
            }
        }
    }

    async fn attempt<B: CompletionBackend + ?Sized>(
        &self,
        backend: &B,
        candidate: &ProviderCandidate,
        request: &CompletionRequest,
    ) -> AttemptOutcome {
        match tokio::time::timeout(self.call_timeout, backend.complete(candidate, request)).await {
            Ok(Ok(text)) if !text.trim().is_empty() => AttemptOutcome::Replied(text),
            Ok(Ok(_)) => AttemptOutcome::Failed(ProviderError::EmptyReply {
                provider: candidate.label(),
            }),
            Ok(Err(e)) => AttemptOutcome::Failed(e),
            Err(_) => AttemptOutcome::Failed(ProviderError::Timeout {
                provider: candidate.label(),
                secs: self.call_timeout.as_secs(),
            }),
        }
    }
}
