//! Aurora core library.
//! Persona chat pipeline: language classifier, persona prompts, provider fallback chain,
//! humanizer, funnel tracker and speech helpers.

pub mod auto_mode;
pub mod config;
pub mod error;
pub mod funnel;
pub mod humanize;
pub mod language;
pub mod persona;
pub mod provider;
pub mod reply;
pub mod speech;

pub use auto_mode::AutoMode;
pub use config::{AuroraConfig, GenerationParams};
pub use error::{AuroraError, AuroraResult, ProviderError};
pub use funnel::{
    asks_for_paid_content, FunnelBoards, FunnelEntry, FunnelFeed, FunnelPhase, FunnelSnapshot,
    FunnelTracker,
};
pub use humanize::{humanize, humanize_with};
pub use language::{classify, Language};
pub use persona::{assistant_prompt, select_prompt, PersonaContext, Platform, Tone};
pub use provider::{
    CompletionBackend, CompletionRequest, HttpBackend, ProviderCandidate, ProviderKind,
    ProviderRoster, ReplyResult,
};
pub use reply::{ReplyRequest, ReplyService, Utterance};
pub use speech::{clean_for_speech, ExternalTts, SpeechRequest, SpeechSynthesizer};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
