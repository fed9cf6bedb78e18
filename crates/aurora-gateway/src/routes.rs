//! HTTP surface: reply assistant, persona chat, funnel feed (JSON + SSE), auto-mode switch,
//! TTS, health.

use async_stream::stream;
use aurora_core::{
    asks_for_paid_content, AuroraError, AutoMode, FunnelBoards, FunnelFeed, FunnelSnapshot,
    FunnelTracker, Language, PersonaContext, ReplyRequest, ReplyService, SpeechRequest,
    SpeechSynthesizer, Utterance,
};
use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use futures_util::Stream;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

const SSE_KEEPALIVE: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct AppState {
    pub replies: Arc<ReplyService>,
    pub funnel: Arc<FunnelTracker>,
    pub tts: Arc<dyn SpeechSynthesizer>,
    pub auto_mode: Arc<AutoMode>,
}

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/generate-reply", post(generate_reply))
        .route("/api/persona-chat", post(persona_chat))
        .route("/api/generate-audio", post(generate_audio))
        .route("/api/funnel", get(funnel_boards))
        .route("/api/funnel/observe", post(funnel_observe))
        .route("/api/funnel/stream", get(funnel_stream))
        .route("/api/auto-mode", get(auto_mode_get).post(auto_mode_set))
        .with_state(state)
        .layer(cors)
}

/// Status code and body for a core error. Provider detail never reaches the client.
fn error_response(e: &AuroraError) -> (StatusCode, Json<Value>) {
    let (status, message) = match e {
        AuroraError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
        AuroraError::AllProvidersExhausted { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, "busy, retry shortly".to_string())
        }
        AuroraError::Configuration(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.clone()),
        AuroraError::Tts(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.clone()),
        other => (StatusCode::INTERNAL_SERVER_ERROR, other.user_message()),
    };
    (status, Json(json!({ "ok": false, "error": message })))
}

fn bad_request(message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "ok": false, "error": message })),
    )
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Deserialize)]
struct GenerateReplyBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    platform: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    tone: Option<String>,
    #[serde(default)]
    user_name: Option<String>,
}

/// POST /api/generate-reply
async fn generate_reply(
    State(state): State<AppState>,
    Json(body): Json<GenerateReplyBody>,
) -> ApiResult {
    let request = ReplyRequest {
        message: body.message,
        sender_name: body.user_name,
        context: PersonaContext::from_parts(
            body.platform.as_deref(),
            body.language.as_deref(),
            body.tone.as_deref(),
        ),
    };
    match state.replies.generate_reply(&request).await {
        Ok(result) => Ok(Json(json!({
            "ok": true,
            "reply": result.text,
            "provider": result.provider,
            "model": result.model,
        }))),
        Err(e) => {
            tracing::warn!("[generate-reply] {}", e);
            Err(error_response(&e))
        }
    }
}

#[derive(Deserialize)]
struct PersonaChatBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    user_name: Option<String>,
    #[serde(default)]
    is_from_audio: bool,
    #[serde(default)]
    force_language: Option<String>,
    #[serde(default)]
    contact_id: Option<String>,
}

/// POST /api/persona-chat. `reply` is null when no provider could answer.
/// A blank typed message does not touch the conversation board.
async fn persona_chat(
    State(state): State<AppState>,
    Json(body): Json<PersonaChatBody>,
) -> Json<Value> {
    let counts = body.is_from_audio || !body.message.trim().is_empty();
    let contact = body
        .contact_id
        .as_deref()
        .map(str::trim)
        .filter(|c| counts && !c.is_empty());
    if let Some(contact) = contact {
        state.funnel.observe_message(
            contact,
            body.user_name.as_deref(),
            &body.message,
            asks_for_paid_content(&body.message),
        );
    }
    let utterance = Utterance {
        text: body.message,
        sender_name: body.user_name,
        from_voice: body.is_from_audio,
        force_language: body.force_language.as_deref().and_then(Language::from_code),
    };
    let reply = state.replies.ask_persona_chat(&utterance).await;
    Json(json!({ "ok": true, "reply": reply }))
}

#[derive(Deserialize)]
struct ObserveBody {
    #[serde(default)]
    contact_id: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    preview: String,
    #[serde(default)]
    hours_ago: f64,
}

/// POST /api/funnel/observe: recency feed input; returns that board.
async fn funnel_observe(
    State(state): State<AppState>,
    Json(body): Json<ObserveBody>,
) -> Result<Json<FunnelSnapshot>, (StatusCode, Json<Value>)> {
    let contact = body.contact_id.trim();
    if contact.is_empty() {
        return Err(bad_request("contact_id is required"));
    }
    let snapshot = state.funnel.observe(
        contact,
        body.display_name.as_deref(),
        &body.preview,
        body.hours_ago,
    );
    Ok(Json(snapshot))
}

/// GET /api/funnel: both boards.
async fn funnel_boards(State(state): State<AppState>) -> Json<FunnelBoards> {
    Json(state.funnel.boards())
}

fn snapshot_event(feed: FunnelFeed, entries: &impl serde::Serialize) -> Event {
    Event::default()
        .event(feed.event_name())
        .json_data(entries)
        .unwrap_or_else(|_| Event::default().event(feed.event_name()).data("[]"))
}

const AUTO_MODE_EVENT: &str = "autoMode";

fn auto_mode_event(enabled: bool) -> Event {
    Event::default()
        .event(AUTO_MODE_EVENT)
        .data(if enabled { "true" } else { "false" })
}

/// Outcome of one wait on the stream's broadcast channels.
fn next_event<T>(
    update: Result<T, broadcast::error::RecvError>,
    to_event: impl FnOnce(T) -> Event,
) -> Option<Option<Event>> {
    match update {
        Ok(value) => Some(Some(to_event(value))),
        Err(broadcast::error::RecvError::Lagged(n)) => {
            tracing::debug!("[funnel-stream] subscriber lagged by {}", n);
            Some(None)
        }
        Err(broadcast::error::RecvError::Closed) => None,
    }
}

/// GET /api/funnel/stream: current boards and auto-mode first, then every update.
async fn funnel_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static> {
    let mut funnel_rx = state.funnel.subscribe();
    let mut mode_rx = state.auto_mode.subscribe();
    let boards = state.funnel.boards();
    let auto_mode = state.auto_mode.get();
    let stream = stream! {
        yield Ok(snapshot_event(FunnelFeed::Recency, &boards.funnel));
        yield Ok(snapshot_event(FunnelFeed::Conversation, &boards.conversation_funnel));
        yield Ok(auto_mode_event(auto_mode));
        loop {
            let next = tokio::select! {
                update = funnel_rx.recv() => {
                    next_event(update, |s: FunnelSnapshot| snapshot_event(s.feed, &s.entries))
                }
                update = mode_rx.recv() => next_event(update, auto_mode_event),
            };
            match next {
                Some(Some(event)) => yield Ok(event),
                Some(None) => {}
                None => break,
            }
        }
    };
    Sse::new(stream).keep_alive(KeepAlive::new().interval(SSE_KEEPALIVE).text("keepalive"))
}

/// GET /api/auto-mode
async fn auto_mode_get(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "autoMode": state.auto_mode.get() }))
}

/// POST /api/auto-mode with `{"autoMode": bool}`; anything else is a 400.
async fn auto_mode_set(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult {
    match body.get("autoMode").and_then(Value::as_bool) {
        Some(enabled) => Ok(Json(json!({ "autoMode": state.auto_mode.set(enabled) }))),
        None => Err(bad_request("autoMode must be true or false")),
    }
}

#[derive(Deserialize)]
struct AudioBody {
    #[serde(default)]
    text: String,
    #[serde(default)]
    voice: Option<String>,
    #[serde(default)]
    style: Option<String>,
}

/// POST /api/generate-audio
async fn generate_audio(State(state): State<AppState>, Json(body): Json<AudioBody>) -> ApiResult {
    let request = SpeechRequest {
        text: body.text,
        voice: body.voice,
        style: body.style,
    };
    match state.tts.synthesize(&request).await {
        Ok(audio) => Ok(Json(json!({ "ok": true, "audio_base64": audio }))),
        Err(e) => {
            tracing::warn!("[generate-audio] {}", e);
            Err(error_response(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use aurora_core::{
        AuroraConfig, AuroraResult, CompletionBackend, CompletionRequest, ProviderCandidate,
        ProviderError,
    };
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    struct FixedBackend(Option<&'static str>);

    #[async_trait]
    impl CompletionBackend for FixedBackend {
        async fn complete(
            &self,
            candidate: &ProviderCandidate,
            _request: &CompletionRequest,
        ) -> Result<String, ProviderError> {
            self.0.map(String::from).ok_or(ProviderError::Transport {
                provider: candidate.label(),
                message: "connection refused".into(),
            })
        }
    }

    struct FakeTts;

    #[async_trait]
    impl SpeechSynthesizer for FakeTts {
        async fn synthesize(&self, request: &SpeechRequest) -> AuroraResult<String> {
            if aurora_core::clean_for_speech(&request.text).is_empty() {
                return Err(AuroraError::Validation("text contains only emoji or is empty".into()));
            }
            Ok("QUJD".into())
        }
    }

    fn app_with(
        reply: Option<&'static str>,
        openrouter_key: Option<&str>,
    ) -> (Router, Arc<FunnelTracker>) {
        let cfg = AuroraConfig {
            openrouter_api_key: openrouter_key.map(String::from),
            fallback_models: vec!["m/one".into(), "m/two".into()],
            ..AuroraConfig::default()
        };
        let funnel = Arc::new(FunnelTracker::new());
        let state = AppState {
            replies: Arc::new(ReplyService::new(&cfg, Arc::new(FixedBackend(reply)))),
            funnel: funnel.clone(),
            tts: Arc::new(FakeTts),
            auto_mode: Arc::new(AutoMode::default()),
        };
        (build_app(state), funnel)
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let res = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (app, _) = app_with(None, Some("k"));
        let res = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn generate_reply_ok() {
        let (app, _) = app_with(Some("Gracias amor"), Some("k"));
        let (status, body) = post_json(
            app,
            "/api/generate-reply",
            json!({ "message": "hola", "platform": "telegram", "language": "es", "tone": "dulce" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        let reply = body["reply"].as_str().unwrap();
        assert!(reply == "grax mor" || reply == "grax bebé", "unexpected reply {reply}");
    }

    #[tokio::test]
    async fn generate_reply_empty_message_is_400() {
        let (app, _) = app_with(Some("x"), Some("k"));
        let (status, body) =
            post_json(app, "/api/generate-reply", json!({ "message": "  " })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);
    }

    #[tokio::test]
    async fn generate_reply_exhausted_is_503() {
        let (app, _) = app_with(None, Some("k"));
        let (status, body) =
            post_json(app, "/api/generate-reply", json!({ "message": "hola" })).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "busy, retry shortly");
    }

    #[tokio::test]
    async fn generate_reply_without_key_is_500() {
        let (app, _) = app_with(Some("x"), None);
        let (status, body) =
            post_json(app, "/api/generate-reply", json!({ "message": "hola" })).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("OPENROUTER_API_KEY"));
    }

    #[tokio::test]
    async fn persona_chat_feeds_conversation_board() {
        let (app, funnel) = app_with(Some("hey you"), Some("k"));
        let (status, body) = post_json(
            app,
            "/api/persona-chat",
            json!({
                "message": "send me the link babe",
                "user_name": "Mike",
                "contact_id": "tg:42",
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], "hey u");
        let boards = funnel.boards();
        assert_eq!(boards.conversation_funnel.len(), 1);
        assert_eq!(boards.conversation_funnel[0].phase.number(), 3);
        assert!(boards.funnel.is_empty());
    }

    #[tokio::test]
    async fn persona_chat_failure_returns_null_reply() {
        let (app, _) = app_with(None, Some("k"));
        let (status, body) =
            post_json(app, "/api/persona-chat", json!({ "message": "hola" })).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["reply"].is_null());
    }

    #[tokio::test]
    async fn blank_typed_message_leaves_conversation_board_alone() {
        let (app, funnel) = app_with(None, Some("k"));
        for message in ["", "   ", "\n\t"] {
            let (status, _) = post_json(
                app.clone(),
                "/api/persona-chat",
                json!({ "message": message, "contact_id": "ig:7" }),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }
        assert!(funnel.boards().conversation_funnel.is_empty());

        // An empty voice-note transcript still counts as activity.
        post_json(
            app,
            "/api/persona-chat",
            json!({ "message": " ", "is_from_audio": true, "contact_id": "ig:7" }),
        )
        .await;
        assert_eq!(funnel.boards().conversation_funnel.len(), 1);
    }

    #[tokio::test]
    async fn auto_mode_toggles_and_reads_back() {
        let (app, _) = app_with(None, Some("k"));
        let res = app
            .clone()
            .oneshot(Request::builder().uri("/api/auto-mode").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "autoMode": false }));

        let (status, body) =
            post_json(app.clone(), "/api/auto-mode", json!({ "autoMode": true })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "autoMode": true }));

        let res = app
            .oneshot(Request::builder().uri("/api/auto-mode").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["autoMode"], true);
    }

    #[tokio::test]
    async fn auto_mode_rejects_non_boolean() {
        let (app, _) = app_with(None, Some("k"));
        for bad in [json!({ "autoMode": "yes" }), json!({ "autoMode": 1 }), json!({})] {
            let (status, body) = post_json(app.clone(), "/api/auto-mode", bad).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["ok"], false);
        }
        let (_, body) = post_json(app, "/api/auto-mode", json!({ "autoMode": "yes" })).await;
        assert!(body["error"].as_str().unwrap().contains("autoMode"));
    }

    /// Reads SSE frames until `needle` shows up, failing after two seconds.
    async fn read_until<S>(frames: &mut S, seen: &mut String, needle: &str)
    where
        S: futures_util::Stream<Item = Result<axum::body::Bytes, axum::Error>> + Unpin,
    {
        use futures_util::StreamExt;
        let deadline = Duration::from_secs(2);
        tokio::time::timeout(deadline, async {
            while !seen.contains(needle) {
                let chunk = frames.next().await.expect("stream ended").unwrap();
                seen.push_str(&String::from_utf8_lossy(&chunk));
            }
        })
        .await
        .unwrap_or_else(|_| panic!("no {:?} in stream; got {:?}", needle, seen));
    }

    #[tokio::test]
    async fn stream_announces_auto_mode_first_and_on_change() {
        let (app, _) = app_with(None, Some("k"));
        let res = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/funnel/stream")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let mut frames = res.into_body().into_data_stream();
        let mut seen = String::new();
        read_until(&mut frames, &mut seen, "event: autoMode\ndata: false").await;
        assert!(seen.contains("event: funnel\n"));
        assert!(seen.contains("event: conversation_funnel\n"));

        let (status, _) = post_json(app.clone(), "/api/auto-mode", json!({ "autoMode": true })).await;
        assert_eq!(status, StatusCode::OK);
        seen.clear();
        read_until(&mut frames, &mut seen, "event: autoMode\ndata: true").await;
    }

    #[tokio::test]
    async fn funnel_observe_returns_recency_board() {
        let (app, _) = app_with(None, Some("k"));
        let (status, body) = post_json(
            app,
            "/api/funnel/observe",
            json!({ "contact_id": "luna", "preview": "hola?", "hours_ago": 26 }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["feed"], "recency");
        assert_eq!(body["entries"][0]["phase"], 3);
    }

    #[tokio::test]
    async fn funnel_observe_requires_contact() {
        let (app, _) = app_with(None, Some("k"));
        let (status, _) = post_json(app, "/api/funnel/observe", json!({ "hours_ago": 2 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn generate_audio_ok_and_emoji_only_rejected() {
        let (app, _) = app_with(None, Some("k"));
        let (status, body) =
            post_json(app.clone(), "/api/generate-audio", json!({ "text": "hola mor 😘" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["audio_base64"], "QUJD");
        let (status, _) = post_json(app, "/api/generate-audio", json!({ "text": "😘" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
