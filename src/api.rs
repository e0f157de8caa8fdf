//! HTTP webhook server for the WhatsApp Cloud API.
//!
//! Three endpoints: a health probe, the Meta subscription-verification
//! handshake, and the inbound message webhook. The webhook always
//! answers 200 with a status body — Meta retries on errors, and a retry
//! storm is worse than a dropped status update.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::gateway::Gateway;
use aura_channels::whatsapp::webhook::extract_message;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    gateway: Arc<Gateway>,
    verify_token: String,
}

impl ApiState {
    pub fn new(gateway: Arc<Gateway>, verify_token: String) -> Self {
        Self {
            gateway,
            verify_token,
        }
    }
}

/// Build the router. Separate from [`serve`] so tests can drive it
/// without binding a socket.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhook", get(verify).post(webhook))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: ApiState, host: &str, port: u16) -> anyhow::Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("webhook server listening on {addr}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// `GET /health`
async fn health() -> Json<Value> {
    Json(json!({"status": "all systems operational"}))
}

/// `GET /webhook` — Meta's subscription-verification handshake. Echo the
/// challenge back as plain text when the token matches.
async fn verify(
    State(state): State<ApiState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mode = params.get("hub.mode").map(String::as_str);
    let token = params.get("hub.verify_token").map(String::as_str);

    if mode == Some("subscribe") && token == Some(state.verify_token.as_str()) {
        let challenge = params.get("hub.challenge").cloned().unwrap_or_default();
        info!("webhook verification succeeded");
        return challenge.into_response();
    }

    warn!("webhook verification failed (mode {mode:?})");
    (
        StatusCode::FORBIDDEN,
        Json(json!({"error": "verification failed"})),
    )
        .into_response()
}

/// `POST /webhook` — inbound message notifications.
async fn webhook(State(state): State<ApiState>, Json(payload): Json<Value>) -> Json<Value> {
    let status = match extract_message(&payload) {
        Some(message) => state.gateway.handle_inbound(&message).await,
        None => "ignored (no message data)",
    };
    Json(json!({"status": status}))
}
