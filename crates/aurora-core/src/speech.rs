//! Text-to-speech helpers. Synthesis runs in an external script; this module cleans the
//! text, spawns the process, and parses its `JSON_OUTPUT:` line.

use crate::config::AuroraConfig;
use crate::error::{AuroraError, AuroraResult};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const OUTPUT_PREFIX: &str = "JSON_OUTPUT:";
const SYNTH_TIMEOUT: Duration = Duration::from_secs(120);

static EMOJI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"[\x{1F600}-\x{1F64F}\x{1F300}-\x{1F5FF}\x{1F680}-\x{1F6FF}\x{1F1E6}-\x{1F1FF}\x{2600}-\x{26FF}\x{2700}-\x{27BF}]",
    )
    .unwrap_or_else(|e| panic!("invalid emoji pattern: {}", e))
});

static SPACES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").unwrap_or_else(|e| panic!("invalid whitespace pattern: {}", e))
});

/// Strips emoji and collapses whitespace.
pub fn clean_for_speech(text: &str) -> String {
    let stripped = EMOJI.replace_all(text, "");
    SPACES.replace_all(&stripped, " ").trim().to_string()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    pub voice: Option<String>,
    pub style: Option<String>,
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Returns base64-encoded audio.
    async fn synthesize(&self, request: &SpeechRequest) -> AuroraResult<String>;
}

#[derive(Debug, Default, Deserialize)]
struct TtsOutput {
    #[serde(default)]
    audio_base64: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Finds the `JSON_OUTPUT:` line in the script's stdout and extracts the audio.
pub fn parse_tts_output(stdout: &str) -> AuroraResult<String> {
    let line = stdout
        .lines()
        .find_map(|l| l.trim_start().strip_prefix(OUTPUT_PREFIX))
        .ok_or_else(|| AuroraError::Tts("TTS script produced no JSON_OUTPUT line".to_string()))?;
    let out: TtsOutput = serde_json::from_str(line.trim())?;
    if let Some(err) = out.error.filter(|e| !e.is_empty()) {
        return Err(AuroraError::Tts(err));
    }
    out.audio_base64
        .filter(|a| !a.is_empty())
        .ok_or_else(|| AuroraError::Tts("TTS engine returned no audio".to_string()))
}

/// Spawns `<command> <script> --text <clean> --voice <voice> [--style <style>]`.
#[derive(Debug, Clone)]
pub struct ExternalTts {
    command: String,
    script: PathBuf,
    default_voice: String,
}

impl ExternalTts {
    pub fn new(
        command: impl Into<String>,
        script: impl Into<PathBuf>,
        default_voice: impl Into<String>,
    ) -> Self {
        Self {
            command: command.into(),
            script: script.into(),
            default_voice: default_voice.into(),
        }
    }

    pub fn from_config(cfg: &AuroraConfig) -> Self {
        Self::new(cfg.tts_command.clone(), cfg.tts_script.clone(), cfg.tts_voice.clone())
    }

    fn args(&self, text: &str, request: &SpeechRequest) -> Vec<String> {
        let voice = request
            .voice
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(&self.default_voice);
        let mut args = vec![
            self.script.to_string_lossy().into_owned(),
            "--text".to_string(),
            text.to_string(),
            "--voice".to_string(),
            voice.to_string(),
        ];
        if let Some(style) = request.style.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            args.push("--style".to_string());
            args.push(style.to_string());
        }
        args
    }
}

#[async_trait]
impl SpeechSynthesizer for ExternalTts {
    async fn synthesize(&self, request: &SpeechRequest) -> AuroraResult<String> {
        if request.text.trim().is_empty() {
            return Err(AuroraError::Validation("text is required".to_string()));
        }
        let clean = clean_for_speech(&request.text);
        if clean.is_empty() {
            return Err(AuroraError::Validation(
                "text contains only emoji or is empty".to_string(),
            ));
        }
        let child = tokio::process::Command::new(&self.command)
            .args(self.args(&clean, request))
            .kill_on_drop(true)
            .output();
        let output = tokio::time::timeout(SYNTH_TIMEOUT, child)
            .await
            .map_err(|_| {
                AuroraError::Tts(format!("TTS timed out after {}s", SYNTH_TIMEOUT.as_secs()))
            })??;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let parsed = parse_tts_output(&stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!("[tts] exit {:?}: {}", output.status.code(), stderr.trim());
            return Err(match parsed {
                Err(AuroraError::Tts(msg))
                    if !stderr.trim().is_empty() && msg.contains("JSON_OUTPUT") =>
                {
                    AuroraError::Tts(stderr.trim().to_string())
                }
                Err(e) => e,
                Ok(_) => AuroraError::Tts(format!("TTS exited with {}", output.status)),
            });
        }
        let audio = parsed?;
        tracing::info!("[tts] synthesized {} chars ({} bytes base64)", clean.len(), audio.len());
        Ok(audio)
    }
}
