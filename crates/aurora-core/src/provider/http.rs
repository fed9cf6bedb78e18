//! reqwest-backed [`CompletionBackend`]: OpenRouter (OpenAI-compatible chat) and Gemini
//! `generateContent`.

use super::{CompletionBackend, CompletionRequest, ProviderCandidate, ProviderKind};
use crate::config::AuroraConfig;
use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REFERER: &str = "https://aurora.local";
const TITLE: &str = "Aurora-Persona-Chat";
const MAX_ERROR_BODY: usize = 300;

// OpenAI-compatible request/response for OpenRouter
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

// Gemini generateContent
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    system_instruction: GeminiContent<'a>,
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// First candidate's text parts joined; empty when the reply was blocked or has no parts.
fn gemini_text(data: GeminiResponse) -> String {
    data.candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// First choice's message content; empty when missing or null.
fn openrouter_text(data: ChatResponse) -> String {
    data.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Slack added on top of the chain's per-call timeout for the client backstop.
const CLIENT_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

/// Shared HTTP client for every candidate. The chain enforces the per-call timeout;
/// the client timeout is only a backstop and must stay above it.
pub struct HttpBackend {
    client: reqwest::Client,
    timeout: Duration,
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}

impl HttpBackend {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, timeout }
    }

    /// Client backstop set just above the configured per-call timeout.
    pub fn for_config(cfg: &AuroraConfig) -> Self {
        Self::new(cfg.provider_timeout + CLIENT_TIMEOUT_SLACK)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn openrouter(
        &self,
        candidate: &ProviderCandidate,
        key: &str,
        request: &CompletionRequest,
    ) -> Result<String, ProviderError> {
        let body = ChatRequest {
            model: &candidate.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.params.temperature,
            max_tokens: request.params.max_tokens,
        };
        let res = self
            .client
            .post(&candidate.endpoint)
            .header("Authorization", format!("Bearer {}", key))
            .header("HTTP-Referer", REFERER)
            .header("X-Title", TITLE)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport(candidate, e))?;
        let res = check_status(candidate, res).await?;
        let data: ChatResponse = res.json().await.map_err(|e| transport(candidate, e))?;
        Ok(openrouter_text(data))
    }

    async fn gemini(
        &self,
        candidate: &ProviderCandidate,
        key: &str,
        request: &CompletionRequest,
    ) -> Result<String, ProviderError> {
        let body = GeminiRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: &request.system,
                }],
            },
            contents: vec![GeminiContent {
                role: Some("user"),
                parts: vec![GeminiPart {
                    text: &request.user,
                }],
            }],
            generation_config: GeminiGenerationConfig {
                max_output_tokens: request.params.max_tokens,
                temperature: request.params.temperature,
            },
        };
        let res = self
            .client
            .post(&candidate.endpoint)
            .header("x-goog-api-key", key)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport(candidate, e))?;
        let res = check_status(candidate, res).await?;
        let data: GeminiResponse = res.json().await.map_err(|e| transport(candidate, e))?;
        Ok(gemini_text(data))
    }
}

#[async_trait]
impl CompletionBackend for HttpBackend {
    async fn complete(
        &self,
        candidate: &ProviderCandidate,
        request: &CompletionRequest,
    ) -> Result<String, ProviderError> {
        let key = candidate
            .api_key()
            .ok_or_else(|| ProviderError::MissingCredential {
                provider: candidate.label(),
            })?;
        let text = match candidate.provider {
            ProviderKind::OpenRouter => self.openrouter(candidate, key, request).await?,
            ProviderKind::Gemini => self.gemini(candidate, key, request).await?,
        };
        if text.is_empty() {
            return Err(ProviderError::EmptyReply {
                provider: candidate.label(),
            });
        }
        Ok(text)
    }
}

fn transport(candidate: &ProviderCandidate, e: reqwest::Error) -> ProviderError {
    ProviderError::Transport {
        provider: candidate.label(),
        message: e.to_string(),
    }
}

async fn check_status(
    candidate: &ProviderCandidate,
    res: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let mut body = res.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        body.truncate(cut);
    }
    Err(ProviderError::Status {
        provider: candidate.label(),
        status: status.as_u16(),
        body,
    })
}
