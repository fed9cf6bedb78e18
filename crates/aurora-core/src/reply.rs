//! Reply pipeline: classify → select prompt → fallback chain → humanize.

use crate::config::{AuroraConfig, GenerationParams};
use crate::error::{AuroraError, AuroraResult};
use crate::humanize::humanize;
use crate::language::{self, Language};
use crate::persona::{select_prompt, Platform, PersonaContext, Tone};
use crate::provider::{
    CompletionBackend, CompletionRequest, FallbackChain, HttpBackend, ProviderRoster, ReplyResult,
};
use std::sync::Arc;
use std::time::Duration;

/// One inbound message. Immutable once received.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub sender_name: Option<String>,
    pub from_voice: bool,
    pub force_language: Option<Language>,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_sender(mut self, name: impl Into<String>) -> Self {
        self.sender_name = Some(name.into());
        self
    }

    pub fn from_voice(mut self, from_voice: bool) -> Self {
        self.from_voice = from_voice;
        self
    }

    pub fn with_language(mut self, language: Option<Language>) -> Self {
        self.force_language = language;
        self
    }

    /// Voice note whose transcript is empty or has no letters.
    pub fn is_unintelligible(&self) -> bool {
        self.from_voice && !self.text.chars().any(char::is_alphabetic)
    }

    /// Forced override, else the classifier.
    pub fn language(&self) -> Language {
        self.force_language
            .unwrap_or_else(|| language::classify(&self.text))
    }
}

/// Reply-assistant request (`POST /api/generate-reply`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplyRequest {
    pub message: String,
    pub sender_name: Option<String>,
    pub context: PersonaContext,
}

/// Builds the user turn: `(<name> <dice|says>): <text>`, or a fixed notice for an
/// unintelligible voice note.
pub fn build_user_content(utterance: &Utterance, language: Language) -> String {
    let spanish = language == Language::Es;
    if utterance.is_unintelligible() {
        return if spanish {
            "(El usuario envió un audio pero no se pudo transcribir bien.)".to_string()
        } else {
            "(The user sent a voice note but it could not be transcribed.)".to_string()
        };
    }
    let name = utterance
        .sender_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(if spanish { "Usuario" } else { "User" });
    format!(
        "({} {}): {}",
        name,
        if spanish { "dice" } else { "says" },
        utterance.text.trim()
    )
}

pub struct ReplyService {
    roster: ProviderRoster,
    call_timeout: Duration,
    assistant: GenerationParams,
    chat: GenerationParams,
    backend: Arc<dyn CompletionBackend>,
}

impl ReplyService {
    pub fn new(config: &AuroraConfig, backend: Arc<dyn CompletionBackend>) -> Self {
        Self::with_roster(ProviderRoster::from_config(config), config, backend)
    }

    pub fn with_roster(
        roster: ProviderRoster,
        config: &AuroraConfig,
        backend: Arc<dyn CompletionBackend>,
    ) -> Self {
        Self {
            roster,
            call_timeout: config.provider_timeout,
            assistant: config.assistant,
            chat: config.chat,
            backend,
        }
    }

    /// Live service over HTTP providers.
    pub fn from_config(config: &AuroraConfig) -> Self {
        Self::new(config, Arc::new(HttpBackend::for_config(config)))
    }

    pub fn roster(&self) -> &ProviderRoster {
        &self.roster
    }

    async fn complete(
        &self,
        system: String,
        user: String,
        params: GenerationParams,
    ) -> AuroraResult<ReplyResult> {
        self.roster.ensure_credentials()?;
        let request = CompletionRequest {
            system,
            user,
            params,
        };
        FallbackChain::new(self.roster.candidates(), self.call_timeout)
            .run(self.backend.as_ref(), &request)
            .await
    }

    /// Reply-assistant path: platform-aware prompt, humanized in the requested language.
    pub async fn generate_reply(&self, request: &ReplyRequest) -> AuroraResult<ReplyResult> {
        if request.message.trim().is_empty() {
            return Err(AuroraError::Validation("message is required".to_string()));
        }
        let ctx = request.context;
        let utterance = Utterance {
            text: request.message.clone(),
            sender_name: request.sender_name.clone(),
            from_voice: false,
            force_language: Some(ctx.language),
        };
        let user = build_user_content(&utterance, ctx.language);
        let mut result = self
            .complete(ctx.assistant_prompt(), user, self.assistant)
            .await?;
        result.text = humanize(&result.text, ctx.language);
        tracing::info!(
            "[reply] {} {}/{} via {}",
            ctx.platform.as_str(),
            ctx.language.as_str(),
            ctx.tone.as_str(),
            result.model
        );
        Ok(result)
    }

    /// Persona-chat path. Any unrecoverable failure is logged and yields `None`.
    pub async fn ask_persona_chat(&self, utterance: &Utterance) -> Option<String> {
        let language = utterance.language();
        if utterance.text.trim().is_empty() && !utterance.from_voice {
            tracing::debug!("[persona-chat] empty message ignored");
            return None;
        }
        let system = select_prompt(Platform::default(), language, Tone::default()).to_string();
        let user = build_user_content(utterance, language);
        match self.complete(system, user, self.chat).await {
            Ok(result) => Some(humanize(&result.text, language)),
            Err(e @ AuroraError::Configuration(_)) => {
                tracing::warn!("[persona-chat] {}", e);
                None
            }
            Err(e) => {
                tracing::error!("[persona-chat] {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_content_uses_localized_default_name() {
        let u = Utterance::new("hola bebé");
        assert_eq!(build_user_content(&u, Language::Es), "(Usuario dice): hola bebé");
        let u = Utterance::new("hey there").with_sender("  ");
        assert_eq!(build_user_content(&u, Language::En), "(User says): hey there");
        let u = Utterance::new("hey there").with_sender("Mike");
        assert_eq!(build_user_content(&u, Language::En), "(Mike says): hey there");
    }

    #[test]
    fn unintelligible_voice_note_is_replaced() {
        let u = Utterance::new(" ... ").from_voice(true);
        assert!(u.is_unintelligible());
        assert!(build_user_content(&u, Language::Es).contains("audio"));
        assert!(build_user_content(&u, Language::En).contains("voice note"));
        // Same text typed, not spoken, is passed through.
        assert!(!Utterance::new(" ... ").is_unintelligible());
    }

    #[test]
    fn forced_language_overrides_classifier() {
        let u = Utterance::new("hey babe how are you");
        assert_eq!(u.language(), Language::En);
        let u = u.with_language(Some(Language::Es));
        assert_eq!(u.language(), Language::Es);
    }
}
