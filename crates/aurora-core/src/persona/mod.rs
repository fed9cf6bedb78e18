//! Persona prompt selection: (platform, language, tone) → system prompt.
//!
//! The chat prompt is keyed by language and tone only. The reply-assistant variant adds
//! one platform line; nothing else depends on the platform.

mod prompts;

pub use prompts::{PersonaPrompt, PERSONA_PROMPTS};

use crate::language::Language;
use serde::{Deserialize, Serialize};

/// Chat surface the reply is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Instagram,
    Whatsapp,
    Telegram,
    Fanvue,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Whatsapp => "whatsapp",
            Platform::Telegram => "telegram",
            Platform::Fanvue => "fanvue",
        }
    }

    /// Name interpolated into the reply-assistant prompt.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::Whatsapp => "WhatsApp",
            Platform::Telegram => "Telegram",
            Platform::Fanvue => "Fanvue",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "instagram" | "ig" => Some(Platform::Instagram),
            "whatsapp" | "wa" => Some(Platform::Whatsapp),
            "telegram" | "tg" => Some(Platform::Telegram),
            "fanvue" => Some(Platform::Fanvue),
            _ => None,
        }
    }
}

/// Persona tone. Unknown input resolves to `Coqueta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Sweet.
    Dulce,
    /// Flirty.
    #[default]
    Coqueta,
    /// Seductive, sales-leaning.
    Vendedora,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Dulce => "dulce",
            Tone::Coqueta => "coqueta",
            Tone::Vendedora => "vendedora",
        }
    }

    pub fn from_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "dulce" | "sweet" => Tone::Dulce,
            "vendedora" | "seller" | "sales" | "seductive" => Tone::Vendedora,
            _ => Tone::Coqueta,
        }
    }
}

/// Resolved persona configuration for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonaContext {
    pub platform: Platform,
    pub language: Language,
    pub tone: Tone,
}

impl PersonaContext {
    /// Builds a context from loose caller input; absent or unknown values take defaults.
    pub fn from_parts(platform: Option<&str>, language: Option<&str>, tone: Option<&str>) -> Self {
        Self {
            platform: platform.and_then(Platform::parse).unwrap_or_default(),
            language: Language::from_code_or_default(language),
            tone: tone.map(Tone::from_name).unwrap_or_default(),
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        select_prompt(self.platform, self.language, self.tone)
    }

    pub fn assistant_prompt(&self) -> String {
        assistant_prompt(self.platform, self.language, self.tone)
    }
}

/// Returns the persona system prompt. `_platform` does not influence the text.
pub fn select_prompt(_platform: Platform, language: Language, tone: Tone) -> &'static str {
    prompts::lookup(language, tone)
        .or_else(|| prompts::lookup(language, Tone::Coqueta))
        .or_else(|| prompts::lookup(Language::Es, Tone::Coqueta))
        .unwrap_or(DEFAULT_PROMPT)
}

/// Reply-assistant variant: the persona prompt plus a platform line and output rules.
pub fn assistant_prompt(platform: Platform, language: Language, tone: Tone) -> String {
    let base = select_prompt(platform, language, tone);
    let platform_line = match language {
        Language::Es => format!(
            "PLATAFORMA: {}. Genera UNA sola respuesta corta y natural (texto puro, sin comillas).",
            platform.display_name()
        ),
        _ => format!(
            "PLATFORM: {}. Reply in {}. Write ONE short, natural reply (plain text, no quotes).",
            platform.display_name(),
            language_name(language)
        ),
    };
    format!("{}\n\n{}", base, platform_line)
}

fn language_name(language: Language) -> &'static str {
    match language {
        Language::Es => "Spanish",
        Language::En => "English",
        Language::Pt => "Portuguese",
        Language::Fr => "French",
        Language::Ar => "Arabic",
    }
}

const DEFAULT_PROMPT: &str = "Eres Aurora, una chica paisa de Medellín: cercana, cariñosa y pícara. \
Responde en 1-2 frases cortas en minúsculas. Nunca menciones links ni perfiles.";
