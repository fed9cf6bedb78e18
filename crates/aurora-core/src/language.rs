//! Heuristic Spanish/English detection for inbound chat text.
//!
//! The classifier only ever answers `Es` or `En`; the wider [`Language`] enum exists
//! because callers may force Portuguese, French or Arabic explicitly.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static SPANISH_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[ñáéíóúü¿¡]").expect("spanish chars regex"));

static SPANISH_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(hola|gracias|amor|para|porque|qué|quien|como|donde|pero|más|muy|tengo|estoy|eres)\b",
    )
    .expect("spanish words regex")
});

static ENGLISH_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(you|the|are|babe|hun|love|how|what|want|got|hey|hi|hello|yeah|right|really|think|bot|could|listen|coming|shy|bite)\b",
    )
    .expect("english words regex")
});

/// Persona languages. `Es` is the Colombian (Medellín) persona and the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
    Pt,
    Fr,
    Ar,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
            Language::Pt => "pt",
            Language::Fr => "fr",
            Language::Ar => "ar",
        }
    }

    /// Parses a language code. Region tags (`es-co`, `en_US`, `pt-BR`) resolve by prefix.
    pub fn from_code(s: &str) -> Option<Self> {
        let code = s.trim().to_lowercase();
        let prefix = code.split(['-', '_']).next().unwrap_or("");
        match prefix {
            "es" | "spanish" | "español" | "espanol" => Some(Language::Es),
            "en" | "english" => Some(Language::En),
            "pt" | "portuguese" => Some(Language::Pt),
            "fr" | "french" => Some(Language::Fr),
            "ar" | "arabic" => Some(Language::Ar),
            _ => None,
        }
    }

    /// Same as [`Language::from_code`], falling back to Spanish.
    pub fn from_code_or_default(s: Option<&str>) -> Self {
        s.and_then(Self::from_code).unwrap_or_default()
    }

    #[inline]
    pub fn is_english(&self) -> bool {
        matches!(self, Language::En)
    }
}

/// Classifies free text as Spanish or English.
pub fn classify(text: &str) -> Language {
    if is_english(text) {
        Language::En
    } else {
        Language::Es
    }
}

/// True when the text reads as English. Short input and anything carrying Spanish
/// characters or Spanish function words is never English.
pub fn is_english(text: &str) -> bool {
    let t = text.trim();
    if t.chars().count() < 3 {
        return false;
    }
    let spanish_word = SPANISH_WORDS.is_match(t);
    if SPANISH_CHARS.is_match(t) || spanish_word {
        return false;
    }
    ENGLISH_WORDS.is_match(t) || !spanish_word
}
