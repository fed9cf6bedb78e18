//! Reply pipeline against a scripted backend (no network).

use async_trait::async_trait;
use aurora_core::{
    AuroraConfig, AuroraError, CompletionBackend, CompletionRequest, Language, PersonaContext,
    ProviderCandidate, ProviderError, ProviderKind, ProviderRoster, ReplyRequest, ReplyService,
    Utterance,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the fake returns for a given model.
#[derive(Clone)]
enum Script {
    Reply(&'static str),
    Fail,
    Hang,
}

#[derive(Default)]
struct ScriptedBackend {
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<String>>,
    last_request: Mutex<Option<CompletionRequest>>,
}

impl ScriptedBackend {
    fn with(mut self, model: &str, script: Script) -> Self {
        self.scripts.insert(model.to_string(), script);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(
        &self,
        candidate: &ProviderCandidate,
        request: &CompletionRequest,
    ) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(candidate.model.clone());
        *self.last_request.lock().unwrap() = Some(request.clone());
        match self.scripts.get(&candidate.model).cloned() {
            Some(Script::Reply(t)) => Ok(t.to_string()),
            Some(Script::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok("too late".to_string())
            }
            Some(Script::Fail) | None => Err(ProviderError::Status {
                provider: candidate.label(),
                status: 429,
                body: "rate limited".to_string(),
            }),
        }
    }
}

fn config() -> AuroraConfig {
    AuroraConfig {
        openrouter_api_key: Some("or-test".into()),
        gemini_api_key: None,
        fallback_models: vec!["m/one".into(), "m/two".into(), "m/three".into()],
        provider_timeout: Duration::from_millis(200),
        ..AuroraConfig::default()
    }
}

fn service(cfg: &AuroraConfig, backend: Arc<ScriptedBackend>) -> ReplyService {
    ReplyService::new(cfg, backend)
}

fn request(message: &str, language: &str) -> ReplyRequest {
    ReplyRequest {
        message: message.to_string(),
        sender_name: None,
        context: PersonaContext::from_parts(Some("instagram"), Some(language), Some("coqueta")),
    }
}

#[tokio::test]
async fn candidate_without_credential_is_skipped_not_called() {
    let backend = Arc::new(
        ScriptedBackend::default()
            .with("gemini-2.0-flash", Script::Reply("never"))
            .with("m/one", Script::Reply("Hola, qué tal")),
    );
    let svc = service(&config(), backend.clone());
    let result = svc.generate_reply(&request("hola", "es")).await.unwrap();
    assert_eq!(result.model, "m/one");
    assert_eq!(result.provider, ProviderKind::OpenRouter);
    assert_eq!(result.text, "hola, q tal");
    assert_eq!(backend.calls(), vec!["m/one"]);
}

#[tokio::test]
async fn primary_tier_wins_when_credential_present() {
    let mut cfg = config();
    cfg.gemini_api_key = Some("g-test".into());
    let backend = Arc::new(
        ScriptedBackend::default().with("gemini-2.0-flash", Script::Reply("hey you")),
    );
    let svc = service(&cfg, backend.clone());
    let result = svc.generate_reply(&request("hi there", "en")).await.unwrap();
    assert_eq!(result.provider, ProviderKind::Gemini);
    assert_eq!(result.text, "hey u");
    assert_eq!(backend.calls(), vec!["gemini-2.0-flash"]);
}

#[tokio::test]
async fn failures_advance_in_order_without_retry() {
    let backend = Arc::new(
        ScriptedBackend::default()
            .with("m/one", Script::Fail)
            .with("m/two", Script::Hang)
            .with("m/three", Script::Reply("ok babe")),
    );
    let svc = service(&config(), backend.clone());
    let result = svc.generate_reply(&request("hey", "en")).await.unwrap();
    assert_eq!(result.model, "m/three");
    assert_eq!(backend.calls(), vec!["m/one", "m/two", "m/three"]);
}

#[tokio::test]
async fn all_failing_exhausts_once() {
    let backend = Arc::new(ScriptedBackend::default());
    let svc = service(&config(), backend.clone());
    let err = svc.generate_reply(&request("hola", "es")).await.unwrap_err();
    assert!(matches!(err, AuroraError::AllProvidersExhausted { attempted: 3 }));
    assert_eq!(backend.calls().len(), 3);
    assert_eq!(err.user_message(), "system busy, please retry shortly");
}

#[tokio::test]
async fn missing_required_credential_fails_before_any_call() {
    let mut cfg = config();
    cfg.openrouter_api_key = None;
    cfg.gemini_api_key = Some("g-test".into());
    let backend =
        Arc::new(ScriptedBackend::default().with("gemini-2.0-flash", Script::Reply("hola")));
    let svc = service(&cfg, backend.clone());
    let err = svc.generate_reply(&request("hola", "es")).await.unwrap_err();
    assert!(matches!(err, AuroraError::Configuration(_)));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn blank_message_is_a_validation_error() {
    let backend = Arc::new(ScriptedBackend::default());
    let svc = service(&config(), backend.clone());
    let err = svc.generate_reply(&request("   ", "es")).await.unwrap_err();
    assert!(matches!(err, AuroraError::Validation(_)));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn assistant_path_sends_platform_prompt_and_params() {
    let backend = Arc::new(ScriptedBackend::default().with("m/one", Script::Reply("hola")));
    let svc = service(&config(), backend.clone());
    let mut req = request("me encantas", "es");
    req.sender_name = Some("Carlos".into());
    svc.generate_reply(&req).await.unwrap();
    let sent = backend.last_request().unwrap();
    assert!(sent.system.contains("PLATAFORMA: Instagram"));
    assert_eq!(sent.user, "(Carlos dice): me encantas");
    assert_eq!(sent.params.max_tokens, 200);
    assert_eq!(sent.params.temperature, Some(0.85));
}

#[tokio::test]
async fn persona_chat_classifies_and_humanizes() {
    let backend = Arc::new(
        ScriptedBackend::default().with("m/one", Script::Reply("Thank you, you are sweet")),
    );
    let svc = service(&config(), backend.clone());
    let reply = svc
        .ask_persona_chat(&Utterance::new("hey babe how are you").with_sender("Mike"))
        .await;
    assert_eq!(reply.as_deref(), Some("thank u, u r sweet"));
    let sent = backend.last_request().unwrap();
    assert_eq!(sent.user, "(Mike says): hey babe how are you");
    assert_eq!(sent.params.max_tokens, 150);
    assert_eq!(sent.params.temperature, None);
}

#[tokio::test]
async fn persona_chat_unintelligible_voice_note_uses_notice() {
    let backend = Arc::new(ScriptedBackend::default().with("m/one", Script::Reply("ay mor")));
    let svc = service(&config(), backend.clone());
    let utterance = Utterance::new("").from_voice(true).with_language(Some(Language::Es));
    assert!(svc.ask_persona_chat(&utterance).await.is_some());
    assert!(backend.last_request().unwrap().user.contains("audio"));
}

#[tokio::test]
async fn persona_chat_returns_none_on_failure() {
    let backend = Arc::new(ScriptedBackend::default());
    let svc = service(&config(), backend.clone());
    assert_eq!(svc.ask_persona_chat(&Utterance::new("hola amor")).await, None);

    let mut cfg = config();
    cfg.openrouter_api_key = None;
    let svc = service(&cfg, Arc::new(ScriptedBackend::default()));
    assert_eq!(svc.ask_persona_chat(&Utterance::new("hola amor")).await, None);
}

#[tokio::test]
async fn custom_roster_is_used_in_order() {
    let roster = ProviderRoster::new(vec![
        ProviderCandidate::new(ProviderKind::OpenRouter, "x/a", "http://unused", Some("k".into())),
        ProviderCandidate::new(ProviderKind::OpenRouter, "x/b", "http://unused", Some("k".into())),
    ]);
    let backend = Arc::new(ScriptedBackend::default().with("x/b", Script::Reply("hi")));
    let svc = ReplyService::with_roster(roster, &config(), backend.clone());
    let result = svc.generate_reply(&request("hello", "en")).await.unwrap();
    assert_eq!(result.model, "x/b");
    assert_eq!(backend.calls(), vec!["x/a", "x/b"]);
}
