use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::engine::PulseEngine;
use crate::error::{ErrorCode, SpeechError};
use crate::snapshot::Snapshot;

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<PulseEngine>,
}

impl AppState {
    pub fn new(engine: Arc<PulseEngine>) -> Self {
        Self { engine }
    }
}

/// HTTP error variants mapped to JSON responses.
#[derive(Debug)]
pub enum HttpServerError {
    /// A speech cycle already owns the snapshot (maps to 409)
    AlreadyAnalyzing(String),
    Internal(String),
}

impl IntoResponse for HttpServerError {
    fn into_response(self) -> Response {
        match self {
            Self::AlreadyAnalyzing(message) => (
                StatusCode::CONFLICT,
                Json(TriggerAck {
                    accepted: false,
                    message,
                }),
            )
                .into_response(),
            Self::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": message })),
            )
                .into_response(),
        }
    }
}

/// Health endpoint response payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_ms: u64,
    pub analyzing_speech: bool,
}

/// Trigger acknowledgement payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct TriggerAck {
    pub accepted: bool,
    pub message: String,
}

/// Build the Axum router with all handlers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/data", get(data))
        .route("/analyze-speech", post(analyze_speech))
        .with_state(state)
}

/// Run the HTTP server loop.
pub async fn run_http_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("binding dashboard HTTP listener")?;
    let router = build_router(state);
    axum::serve(listener, router)
        .await
        .context("serving dashboard HTTP router")?;
    Ok(())
}

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, HttpServerError> {
    let analyzing_speech = state
        .engine
        .state()
        .is_analyzing()
        .map_err(|err| HttpServerError::Internal(err.message()))?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        uptime_ms: state.engine.uptime_ms(),
        analyzing_speech,
    }))
}

/// Point-in-time snapshot copy; never blocks on analysis.
pub async fn data(State(state): State<AppState>) -> Result<Json<Snapshot>, HttpServerError> {
    state
        .engine
        .snapshot()
        .map(Json)
        .map_err(|err| HttpServerError::Internal(err.message()))
}

/// Trigger the on-demand speech cycle.
///
/// Responds as soon as the test-and-set resolves; the analysis itself
/// continues asynchronously.
pub async fn analyze_speech(
    State(state): State<AppState>,
) -> Result<Json<TriggerAck>, HttpServerError> {
    match state.engine.trigger_speech_analysis() {
        Ok(()) => Ok(Json(TriggerAck {
            accepted: true,
            message: "Speech analysis started. Recording will begin shortly.".to_string(),
        })),
        Err(err @ SpeechError::AlreadyAnalyzing) => {
            Err(HttpServerError::AlreadyAnalyzing(err.message()))
        }
        Err(err) => Err(HttpServerError::Internal(err.message())),
    }
}
