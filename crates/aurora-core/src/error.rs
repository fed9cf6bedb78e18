//! Error types for the Aurora reply pipeline

use thiserror::Error;

/// Result type alias for core operations
pub type AuroraResult<T> = Result<T, AuroraError>;

/// Errors surfaced to callers of the core. Every variant is scoped to a single request.
#[derive(Error, Debug)]
pub enum AuroraError {
    /// A required credential is absent before any provider call was attempted.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Missing or empty required input; no provider call was attempted.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Every provider candidate failed or was skipped.
    #[error("All providers exhausted after {attempted} attempt(s)")]
    AllProvidersExhausted { attempted: usize },

    #[error("TTS error: {0}")]
    Tts(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of one provider candidate. Absorbed by the fallback chain, never propagated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("{provider} request failed: {message}")]
    Transport { provider: String, message: String },

    #[error("{provider} did not answer within {secs}s")]
    Timeout { provider: String, secs: u64 },

    #[error("{provider} returned an empty reply")]
    EmptyReply { provider: String },

    #[error("{provider} credential is not configured")]
    MissingCredential { provider: String },
}

impl AuroraError {
    /// Message safe to show an end user. Provider and HTTP detail is suppressed.
    pub fn user_message(&self) -> String {
        match self {
            AuroraError::AllProvidersExhausted { .. } => {
                "system busy, please retry shortly".to_string()
            }
            AuroraError::Validation(msg) => msg.clone(),
            AuroraError::Configuration(msg) => msg.clone(),
            _ => "internal error".to_string(),
        }
    }
}
