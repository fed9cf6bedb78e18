//! LLM providers: candidate roster, the completion seam, and the fallback chain.
//!
//! Trial order is the roster order: the free-tier Gemini candidate first (only when
//! `GEMINI_API_KEY` is set), then each OpenRouter fallback model in list order.

mod chain;
mod http;

pub use chain::{transition, AttemptOutcome, ChainState, FallbackChain, ReplyResult};
pub use http::HttpBackend;

use crate::config::{AuroraConfig, GenerationParams};
use crate::error::{AuroraError, AuroraResult, ProviderError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    OpenRouter,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenRouter => "openrouter",
        }
    }

    /// Environment variable holding this provider's credential.
    pub fn credential_env(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::OpenRouter => "OPENROUTER_API_KEY",
        }
    }
}

/// One (provider, model) pairing attempted during reply generation.
#[derive(Clone)]
pub struct ProviderCandidate {
    pub provider: ProviderKind,
    pub model: String,
    pub endpoint: String,
    api_key: Option<String>,
    /// When true the service cannot run at all without this provider's credential.
    pub mandatory: bool,
}

impl ProviderCandidate {
    pub fn new(
        provider: ProviderKind,
        model: impl Into<String>,
        endpoint: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            endpoint: endpoint.into(),
            api_key: api_key
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            mandatory: false,
        }
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    #[inline]
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// `provider/model` label used in logs and replies.
    pub fn label(&self) -> String {
        format!("{}:{}", self.provider.as_str(), self.model)
    }
}

impl std::fmt::Debug for ProviderCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCandidate")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("mandatory", &self.mandatory)
            .finish()
    }
}

/// Role-tagged prompt plus generation knobs for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub params: GenerationParams,
}

/// Network seam for the chain. Implementations make exactly one call per invocation.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(
        &self,
        candidate: &ProviderCandidate,
        request: &CompletionRequest,
    ) -> Result<String, ProviderError>;
}

/// Ordered candidate list built from configuration.
#[derive(Debug, Clone)]
pub struct ProviderRoster {
    candidates: Vec<ProviderCandidate>,
}

impl ProviderRoster {
    pub fn new(candidates: Vec<ProviderCandidate>) -> Self {
        Self { candidates }
    }

    pub fn from_config(cfg: &AuroraConfig) -> Self {
        let mut candidates = Vec::with_capacity(cfg.fallback_models.len() + 1);
        candidates.push(ProviderCandidate::new(
            ProviderKind::Gemini,
            cfg.gemini_model.clone(),
            format!(
                "{}/models/{}:generateContent",
                cfg.gemini_api_base.trim_end_matches('/'),
                cfg.gemini_model
            ),
            cfg.gemini_api_key.clone(),
        ));
        for model in &cfg.fallback_models {
            candidates.push(
                ProviderCandidate::new(
                    ProviderKind::OpenRouter,
                    model.clone(),
                    cfg.openrouter_url.clone(),
                    cfg.openrouter_api_key.clone(),
                )
                .mandatory(),
            );
        }
        Self { candidates }
    }

    pub fn candidates(&self) -> &[ProviderCandidate] {
        &self.candidates
    }

    /// Fails with a configuration error when a mandatory provider has no credential.
    pub fn ensure_credentials(&self) -> AuroraResult<()> {
        if let Some(c) = self
            .candidates
            .iter()
            .find(|c| c.mandatory && !c.has_credential())
        {
            return Err(AuroraError::Configuration(format!(
                "{} is not set; {} is required to generate replies",
                c.provider.credential_env(),
                c.provider.as_str()
            )));
        }
        if self.candidates.is_empty() {
            return Err(AuroraError::Configuration(
                "no provider candidates configured".to_string(),
            ));
        }
        Ok(())
    }
}
