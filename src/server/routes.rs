//! HTTP surface: three WebSocket entry points plus liveness and info routes.

use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;

use crate::config::AppConfig;
use crate::pipeline::PipelineVariant;
use crate::scoring::ScoringClient;
use crate::stt::InferenceDispatcher;

use super::socket::bridge_session;

pub const TRANSCRIPT_PATH: &str = "/ws/transcript";
pub const DEBATE_PATH: &str = "/ws/debate";
pub const LEGACY_PATH: &str = "/ws";
pub const HEALTH_PATH: &str = "/health";

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Shared state handed to every handler.  Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: InferenceDispatcher,
    pub scoring: ScoringClient,
    pub config: Arc<AppConfig>,
    shutdown: Arc<watch::Sender<bool>>,
}

impl AppState {
    pub fn new(dispatcher: InferenceDispatcher, scoring: ScoringClient, config: AppConfig) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            dispatcher,
            scoring,
            config: Arc::new(config),
            shutdown: Arc::new(shutdown),
        }
    }

    /// Ask every open session to stop reading and close.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    pub(crate) fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(TRANSCRIPT_PATH, get(transcript_ws))
        .route(DEBATE_PATH, get(debate_ws))
        .route(LEGACY_PATH, get(legacy_ws))
        .route(HEALTH_PATH, get(health))
        .route("/", get(root))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

async fn transcript_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| bridge_session(socket, state, PipelineVariant::TranscriptOnly))
}

async fn debate_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let variant = PipelineVariant::Debate(state.scoring.clone());
    ws.on_upgrade(move |socket| bridge_session(socket, state, variant))
}

async fn legacy_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| bridge_session(socket, state, PipelineVariant::Legacy))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy", "service": "live-transcription-api" }))
}

async fn root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "message": "Live Transcription & Debate Scoring API",
        "endpoints": {
            "transcript_only": TRANSCRIPT_PATH,
            "debate_scoring": DEBATE_PATH,
            "legacy": format!("{LEGACY_PATH} (deprecated)"),
        },
        "health_check": HEALTH_PATH,
        "scoring_enabled": state.config.scoring.is_configured(),
    }))
}
