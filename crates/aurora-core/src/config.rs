//! Aurora configuration loaded from `.env` / the process environment, with an optional
//! `aurora.toml` overrides file for values that are awkward in env vars (model lists).
//!
//! | Env | Default | Description |
//! |-----|---------|-------------|
//! | OPENROUTER_API_KEY | (none) | Required. Credential for the fallback tier. |
//! | GEMINI_API_KEY | (none) | Optional. Enables the free-tier primary candidate. |
//! | AURORA_GEMINI_MODEL | gemini-2.0-flash | Primary-tier model. |
//! | AURORA_FALLBACK_MODELS | see `DEFAULT_FALLBACK_MODELS` | Comma list, trial order. |
//! | AURORA_PROVIDER_TIMEOUT_SECS | 15 | Per-call timeout. |
//! | AURORA_ASSISTANT_MAX_TOKENS / _TEMPERATURE | 200 / 0.85 | Reply-assistant path. |
//! | AURORA_CHAT_MAX_TOKENS / _TEMPERATURE | 150 / provider default | Persona-chat path. |
//! | AURORA_BIND_ADDR | 127.0.0.1:4000 | Gateway listen address. |
//! | AURORA_PENDING_FILE | ./data/instagram_pending_reengagement.json | Recency feed file. |
//! | AURORA_PENDING_POLL_SECS | 30 | Recency feed poll interval. |
//! | AURORA_AUTO_MODE | false | Initial auto-reply switch. |
//! | AURORA_TTS_COMMAND / AURORA_TTS_SCRIPT / AURORA_TTS_VOICE | python3 / scripts/tts.py / qwen | External TTS. |

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const OPENROUTER_CHAT_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_FALLBACK_MODELS: &[&str] = &[
    "xiaomi/mimo-v2-flash",
    "google/gemini-2.0-flash-exp:free",
    "meta-llama/llama-3.3-70b-instruct:free",
    "mistralai/mistral-7b-instruct:free",
];
const DEFAULT_CONFIG_FILE: &str = "aurora.toml";

/// Token cap and temperature for one calling site. `None` temperature = provider default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl GenerationParams {
    pub const fn reply_assistant() -> Self {
        Self {
            max_tokens: 200,
            temperature: Some(0.85),
        }
    }

    pub const fn persona_chat() -> Self {
        Self {
            max_tokens: 150,
            temperature: None,
        }
    }
}

/// Values that may be overridden from `aurora.toml`. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileOverrides {
    #[serde(default)]
    pub gemini_model: Option<String>,
    #[serde(default)]
    pub fallback_models: Option<Vec<String>>,
    #[serde(default)]
    pub provider_timeout_secs: Option<u64>,
    #[serde(default)]
    pub assistant: Option<GenerationParams>,
    #[serde(default)]
    pub chat: Option<GenerationParams>,
    #[serde(default)]
    pub bind_addr: Option<String>,
    #[serde(default)]
    pub pending_file: Option<PathBuf>,
}

impl FileOverrides {
    /// Missing file yields empty overrides; a present but invalid file is an error.
    pub fn load_from_path(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let parsed: FileOverrides = toml::from_str(&content)?;
        Ok(parsed)
    }
}

/// Runtime configuration for the core and the gateway.
#[derive(Debug, Clone)]
pub struct AuroraConfig {
    pub openrouter_api_key: Option<String>,
    pub openrouter_url: String,
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: String,
    pub gemini_model: String,
    pub fallback_models: Vec<String>,
    pub provider_timeout: Duration,
    pub assistant: GenerationParams,
    pub chat: GenerationParams,
    pub bind_addr: String,
    pub pending_file: PathBuf,
    pub pending_poll_interval: Duration,
    pub tts_command: String,
    pub tts_script: PathBuf,
    pub tts_voice: String,
    pub auto_mode: bool,
}

impl Default for AuroraConfig {
    fn default() -> Self {
        Self {
            openrouter_api_key: None,
            openrouter_url: OPENROUTER_CHAT_URL.to_string(),
            gemini_api_key: None,
            gemini_api_base: GEMINI_API_BASE.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            fallback_models: DEFAULT_FALLBACK_MODELS.iter().map(|s| s.to_string()).collect(),
            provider_timeout: Duration::from_secs(15),
            assistant: GenerationParams::reply_assistant(),
            chat: GenerationParams::persona_chat(),
            bind_addr: "127.0.0.1:4000".to_string(),
            pending_file: PathBuf::from("./data/instagram_pending_reengagement.json"),
            pending_poll_interval: Duration::from_secs(30),
            tts_command: default_python().to_string(),
            tts_script: PathBuf::from("scripts/tts.py"),
            tts_voice: "qwen".to_string(),
            auto_mode: false,
        }
    }
}

impl AuroraConfig {
    /// Environment first, then `AURORA_CONFIG_PATH` (default `aurora.toml`) overrides.
    /// An unreadable overrides file is logged and ignored.
    pub fn load() -> Self {
        let mut cfg = Self::from_env();
        let path = env_opt_string("AURORA_CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        match FileOverrides::load_from_path(&path) {
            Ok(overrides) => cfg.apply(overrides),
            Err(e) => tracing::warn!("[config] ignoring {}: {}", path.display(), e),
        }
        cfg
    }

    /// Load from environment. Unset or invalid values fall back to defaults.
    pub fn from_env() -> Self {
        let d = Self::default();
        let fallback_models = env_opt_string("AURORA_FALLBACK_MODELS")
            .map(|s| parse_model_list(&s))
            .filter(|v| !v.is_empty())
            .unwrap_or(d.fallback_models);
        Self {
            openrouter_api_key: env_opt_string("OPENROUTER_API_KEY"),
            openrouter_url: env_opt_string("AURORA_OPENROUTER_URL").unwrap_or(d.openrouter_url),
            gemini_api_key: env_opt_string("GEMINI_API_KEY"),
            gemini_api_base: env_opt_string("AURORA_GEMINI_URL").unwrap_or(d.gemini_api_base),
            gemini_model: env_opt_string("AURORA_GEMINI_MODEL").unwrap_or(d.gemini_model),
            fallback_models,
            provider_timeout: Duration::from_secs(
                env_parse("AURORA_PROVIDER_TIMEOUT_SECS", 15u64).max(1),
            ),
            assistant: GenerationParams {
                max_tokens: env_parse("AURORA_ASSISTANT_MAX_TOKENS", d.assistant.max_tokens),
                temperature: env_temperature(
                    "AURORA_ASSISTANT_TEMPERATURE",
                    d.assistant.temperature,
                ),
            },
            chat: GenerationParams {
                max_tokens: env_parse("AURORA_CHAT_MAX_TOKENS", d.chat.max_tokens),
                temperature: env_temperature("AURORA_CHAT_TEMPERATURE", d.chat.temperature),
            },
            bind_addr: env_opt_string("AURORA_BIND_ADDR").unwrap_or(d.bind_addr),
            pending_file: env_opt_string("AURORA_PENDING_FILE")
                .map(PathBuf::from)
                .unwrap_or(d.pending_file),
            pending_poll_interval: Duration::from_secs(
                env_parse("AURORA_PENDING_POLL_SECS", 30u64).max(1),
            ),
            tts_command: env_opt_string("AURORA_TTS_COMMAND").unwrap_or(d.tts_command),
            tts_script: env_opt_string("AURORA_TTS_SCRIPT")
                .map(PathBuf::from)
                .unwrap_or(d.tts_script),
            tts_voice: env_opt_string("AURORA_TTS_VOICE").unwrap_or(d.tts_voice),
            auto_mode: env_bool("AURORA_AUTO_MODE", d.auto_mode),
        }
    }

    /// Applies file overrides on top of the current values.
    pub fn apply(&mut self, o: FileOverrides) {
        if let Some(m) = o.gemini_model.filter(|s| !s.trim().is_empty()) {
            self.gemini_model = m;
        }
        if let Some(models) = o.fallback_models.filter(|v| !v.is_empty()) {
            self.fallback_models = models;
        }
        if let Some(secs) = o.provider_timeout_secs {
            self.provider_timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(p) = o.assistant {
            self.assistant = p;
        }
        if let Some(p) = o.chat {
            self.chat = p;
        }
        if let Some(addr) = o.bind_addr {
            self.bind_addr = addr;
        }
        if let Some(path) = o.pending_file {
            self.pending_file = path;
        }
    }
}

fn default_python() -> &'static str {
    if cfg!(windows) {
        "py"
    } else {
        "python3"
    }
}

/// Splits a comma/newline separated model list, dropping blanks and duplicates (order kept).
pub fn parse_model_list(s: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for m in s.split([',', '\n']).map(str::trim).filter(|m| !m.is_empty()) {
        if !out.iter().any(|x| x == m) {
            out.push(m.to_string());
        }
    }
    out
}

pub fn env_bool(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(v) => v.trim().eq_ignore_ascii_case("true") || (v.trim().is_empty() && default),
        Err(_) => default,
    }
}

pub fn env_opt_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env_opt_string(name)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_temperature(name: &str, default: Option<f32>) -> Option<f32> {
    match env_opt_string(name) {
        Some(v) if v.eq_ignore_ascii_case("default") => None,
        Some(v) => v
            .parse::<f32>()
            .ok()
            .map(|t| t.clamp(0.0, 2.0))
            .or(default),
        None => default,
    }
}
