//! HTTP + WebSocket API for Wellguard
//!
//! Endpoints:
//! - GET /health - Health check
//! - POST /score - Score text
//! - POST /preview - Live preview of in-progress text
//! - POST /entries - Submit a saved mood entry for crisis screening
//! - GET /alerts - List alerts (?status=&subject_id=)
//! - GET /alerts/{id} - Get one alert
//! - POST /alerts/{id}/status - Move an alert through the counselor workflow
//! - WS /ws/preview - Live preview per text frame

use axum::{
    extract::{Path, Query, State, WebSocketUpgrade, ws::{Message, WebSocket}},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::core::monitor::{CrisisMonitor, SubmissionOutcome};
use crate::types::{AlertFilter, AlertId, AlertStatus, CrisisAlert, ReasonCode, ScoreOutput};
use crate::WellguardError;

/// App state
#[derive(Clone)]
pub struct AppState {
    pub monitor: Arc<CrisisMonitor>,
}

impl AppState {
    pub fn new(monitor: CrisisMonitor) -> Self {
        Self {
            monitor: Arc::new(monitor),
        }
    }
}

/// Text to score
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// Mood entry submission
#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    pub subject_id: String,
    pub text: String,
}

/// Status change request
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: AlertStatus,
}

/// Preview response
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub ready: bool,
    pub reason: ReasonCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ScoreOutput>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub pending_alerts: usize,
}

/// Error body with a status code
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<WellguardError> for ApiError {
    fn from(err: WellguardError) -> Self {
        let status = match &err {
            WellguardError::NotFound(_) => StatusCode::NOT_FOUND,
            WellguardError::InvalidTransition { .. } => StatusCode::CONFLICT,
            WellguardError::InvalidAlertId(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %err, "request failed");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/score", post(score))
        .route("/preview", post(preview))
        .route("/entries", post(submit_entry))
        .route("/alerts", get(list_alerts))
        .route("/alerts/:id", get(get_alert))
        .route("/alerts/:id/status", post(update_status))
        .route("/ws/preview", get(websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        pending_alerts: state.monitor.pending_alerts().await,
    })
}

/// Score text without side effects
async fn score(State(state): State<AppState>, Json(req): Json<TextRequest>) -> Json<ScoreOutput> {
    let result = state.monitor.scorer().score(&req.text);
    let alert_recommended = state.monitor.sink().should_alert(&result);
    Json(ScoreOutput::new(result, alert_recommended))
}

/// Live preview
async fn preview(State(state): State<AppState>, Json(req): Json<TextRequest>) -> Json<PreviewResponse> {
    Json(build_preview(&state.monitor, &req.text))
}

fn build_preview(monitor: &CrisisMonitor, text: &str) -> PreviewResponse {
    match monitor.preview(text) {
        Some(result) => {
            let crisis_flow = monitor.sink().crisis_flow(&result);
            PreviewResponse {
                ready: true,
                reason: ReasonCode::R402_PREVIEW_SCORED,
                result: Some(ScoreOutput::new(result, crisis_flow)),
            }
        }
        None => PreviewResponse {
            ready: false,
            reason: ReasonCode::R401_PREVIEW_TOO_SHORT,
            result: None,
        },
    }
}

/// Screen a saved mood entry
async fn submit_entry(
    State(state): State<AppState>,
    Json(req): Json<EntryRequest>,
) -> Result<Json<SubmissionOutcome>, ApiError> {
    if req.subject_id.trim().is_empty() {
        return Err(ApiError::bad_request("subject_id must not be empty"));
    }
    Ok(Json(state.monitor.submit_entry(&req.subject_id, &req.text).await))
}

/// List alerts
async fn list_alerts(
    State(state): State<AppState>,
    Query(filter): Query<AlertFilter>,
) -> Result<Json<Vec<CrisisAlert>>, ApiError> {
    Ok(Json(state.monitor.store().list_alerts(&filter)?))
}

/// Get one alert
async fn get_alert(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CrisisAlert>, ApiError> {
    let id: AlertId = id.parse()?;
    Ok(Json(state.monitor.store().get_alert(id)?))
}

/// Counselor status change
async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<CrisisAlert>, ApiError> {
    let id: AlertId = id.parse()?;
    let alert = state.monitor.store().update_status(id, req.status)?;
    tracing::info!(alert_id = %id, status = %alert.status, "alert status changed");
    Ok(Json(alert))
}

/// WebSocket handler for live preview
async fn websocket_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state.monitor))
}

/// Every text frame is the whole current input
async fn handle_websocket(socket: WebSocket, monitor: Arc<CrisisMonitor>) {
    let (mut sender, mut receiver) = socket.split();
    while let Some(Ok(msg)) = receiver.next().await {
        let text = match msg {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };
        let json = serde_json::to_string(&build_preview(&monitor, &text)).unwrap_or_default();
        if sender.send(Message::Text(json)).await.is_err() {
            break;
        }
    }
}

/// Run the API server with a background outbox flush. On Ctrl-C or
/// SIGTERM the server stops accepting requests and drains the outbox.
pub async fn run_server(settings: &Settings) -> crate::Result<()> {
    let state = AppState::new(settings.build_monitor()?);

    let monitor = Arc::clone(&state.monitor);
    let interval = settings.flush_interval();
    let flusher = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let delivered = monitor.flush_outbox().await;
            if delivered > 0 {
                tracing::info!(delivered, "outbox flushed");
            }
        }
    });

    let monitor = Arc::clone(&state.monitor);
    let router = create_router(state).layer(TraceLayer::new_for_http());
    let listener = tokio::net::TcpListener::bind(&settings.server.addr).await?;
    tracing::info!("Wellguard API running on {}", settings.server.addr);
    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    flusher.abort();
    let undelivered = monitor.shutdown().await;
    tracing::info!(undelivered = undelivered.len(), "Wellguard API stopped");
    served?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received, draining outbox");
}
