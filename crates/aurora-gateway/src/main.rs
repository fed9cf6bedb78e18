//! Aurora Gateway: persona reply assistant, persona chat, funnel feed and TTS over HTTP.
//! Listens on `AURORA_BIND_ADDR` (default 127.0.0.1:4000).

mod routes;

use aurora_core::config::env_bool;
use aurora_core::{AuroraConfig, AutoMode, ExternalTts, FunnelTracker, ReplyService};
use routes::{build_app, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[aurora-gateway] .env not loaded: {} (using system environment)", e);
    }

    let log_dir = std::env::var("AURORA_LOG_DIR").unwrap_or_else(|_| "./logs".into());
    let (file_layer, _log_guard) = if env_bool("AURORA_LOG_TO_FILE", true) {
        let appender = tracing_appender::rolling::daily(&log_dir, "aurora-gateway.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false),
            ),
            Some(guard),
        )
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    let config = AuroraConfig::load();
    if config.openrouter_api_key.is_none() {
        tracing::warn!(
            "[aurora-gateway] OPENROUTER_API_KEY is not set; reply generation will fail until it is"
        );
    }
    if config.gemini_api_key.is_none() {
        tracing::info!("[aurora-gateway] GEMINI_API_KEY not set; free-tier primary is skipped");
    }

    let funnel = Arc::new(FunnelTracker::new());
    let state = AppState {
        replies: Arc::new(ReplyService::from_config(&config)),
        funnel: funnel.clone(),
        tts: Arc::new(ExternalTts::from_config(&config)),
        auto_mode: Arc::new(AutoMode::new(config.auto_mode)),
    };

    spawn_pending_poll(funnel, config.pending_file.clone(), config.pending_poll_interval);

    let app = build_app(state);
    let listener = match tokio::net::TcpListener::bind(&config.bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("[aurora-gateway] cannot bind {}: {}", config.bind_addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        "[aurora-gateway] v{} listening on http://{}",
        aurora_core::version(),
        config.bind_addr
    );
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("[aurora-gateway] server error: {}", e);
    }
}

/// Re-reads the pending re-engagement list on an interval and feeds the recency board.
/// A malformed file is logged and skipped until the next tick.
fn spawn_pending_poll(funnel: Arc<FunnelTracker>, path: PathBuf, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            match funnel.load_pending_file(&path) {
                Ok(0) => {}
                Ok(n) => tracing::debug!(
                    "[funnel] loaded {} pending contact(s) from {}",
                    n,
                    path.display()
                ),
                Err(e) => tracing::warn!("[funnel] ignoring {}: {}", path.display(), e),
            }
        }
    });
}
