//! HTTP API server: Slack Events API intake and interactive button payloads.
//!
//! Spawned as a background task by the gateway.

use crate::{actions, commands::Orchestrator};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use sonobot_channels::slack::{parse_event, SlackChannel, SlackEvent};
use sonobot_core::config::ApiConfig;
use std::sync::Arc;
use std::time::Instant;
use tokio::{sync::Mutex, task::JoinSet};
use tracing::{debug, error, info, warn};

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    orchestrator: Arc<Orchestrator>,
    slack: Option<Arc<SlackChannel>>,
    action_tag: String,
    /// Channels whose button presses are accepted. Empty = all.
    allowed_channels: Vec<String>,
    /// Button commands still running.
    actions: Arc<Mutex<JoinSet<()>>>,
    uptime: Instant,
}

impl ApiState {
    pub fn new(
        orchestrator: Arc<Orchestrator>,
        slack: Option<Arc<SlackChannel>>,
        action_tag: &str,
    ) -> Self {
        Self {
            orchestrator,
            slack,
            action_tag: action_tag.to_string(),
            allowed_channels: Vec::new(),
            actions: Arc::new(Mutex::new(JoinSet::new())),
            uptime: Instant::now(),
        }
    }

    /// Only accept button presses from these channels (empty = all).
    pub fn with_allowed_channels(mut self, channels: Vec<String>) -> Self {
        self.allowed_channels = channels;
        self
    }

    fn allows(&self, channel: &str) -> bool {
        self.allowed_channels.is_empty() || self.allowed_channels.iter().any(|c| c == channel)
    }

    /// Wait for every button command started so far to finish.
    pub async fn drain(&self) {
        let mut actions = self.actions.lock().await;
        if !actions.is_empty() {
            info!("waiting for {} running button command(s)", actions.len());
        }
        while let Some(done) = actions.join_next().await {
            if let Err(e) = done {
                error!("button command task failed: {e}");
            }
        }
    }
}

type ApiError = (StatusCode, Json<Value>);

fn bad_request(message: String) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

/// `GET /api/health`
async fn health(State(state): State<ApiState>) -> Json<Value> {
    let slack = if state.slack.is_some() {
        "enabled"
    } else {
        "disabled"
    };
    Json(json!({
        "status": "ok",
        "uptime_secs": state.uptime.elapsed().as_secs(),
        "slack": slack,
    }))
}

/// `POST /slack/events` -- Events API callbacks.
///
/// Always acknowledges a well-formed event with 200 so Slack does not retry;
/// delivery problems are logged.
async fn slack_events(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let slack = state.slack.as_ref().ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "error": "slack channel not configured" })),
    ))?;

    let event = parse_event(&body).map_err(|e| {
        warn!("rejecting slack event: {e}");
        bad_request(format!("invalid event: {e}"))
    })?;

    match event {
        SlackEvent::UrlVerification(challenge) => {
            info!("slack url verification");
            Ok(Json(json!({ "challenge": challenge })))
        }
        SlackEvent::Message(message) => {
            if let Err(e) = slack.deliver(message).await {
                error!("slack event not delivered: {e}");
            }
            Ok(Json(json!({ "status": "ok" })))
        }
        SlackEvent::Ignored => Ok(Json(json!({ "status": "ignored" }))),
    }
}

/// `POST /slack/actions` -- interactive button payloads.
///
/// The command runs in the background; the route answers right away.
async fn slack_actions(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let payload = actions::parse_payload(&body).map_err(|e| {
        warn!("rejecting action payload: {e}");
        bad_request(format!("invalid payload: {e}"))
    })?;

    let request = actions::resolve(&payload, &state.action_tag).map_err(|e| {
        warn!("rejecting action payload: {e}");
        bad_request(e.to_string())
    })?;

    let Some(request) = request else {
        debug!("action payload for another module, ignoring");
        return Ok(Json(json!({ "status": "ignored" })));
    };

    if !state.allows(&request.target.channel) {
        warn!(
            "ignoring button action from channel {} (not allowed)",
            request.target.channel
        );
        return Ok(Json(json!({ "status": "ignored" })));
    }

    info!(
        "button action '{}' from {}",
        request.command.verb,
        request.target.user.as_deref().unwrap_or("unknown")
    );
    let orchestrator = state.orchestrator.clone();
    let mut actions = state.actions.lock().await;
    while let Some(done) = actions.try_join_next() {
        if let Err(e) = done {
            error!("button command task failed: {e}");
        }
    }
    actions.spawn(async move {
        orchestrator.execute(request.command, request.target).await;
    });

    Ok(Json(json!({ "status": "accepted" })))
}

/// Build the axum router with shared state.
fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/slack/events", post(slack_events))
        .route("/slack/actions", post(slack_actions))
        .layer(axum::extract::DefaultBodyLimit::max(1024 * 1024)) // 1 MB max request body
        .with_state(state)
}

/// Start the API server. Called from `Gateway::run()`.
pub async fn serve(config: ApiConfig, state: ApiState) {
    let app = build_router(state);
    let addr = format!("{}:{}", config.host, config.port);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("API server failed to bind to {addr}: {e}");
            return;
        }
    };

    info!("API server listening on {addr}");

    if let Err(e) = axum::serve(listener, app).await {
        error!("API server error: {e}");
    }
}
