use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::AnalysisHandler;
use crate::models::{AnalysisOutcome, PickedImage};

/// Picked images arrive base64-encoded inside JSON
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub struct AppState {
    pub handler: Arc<AnalysisHandler>,
    pub signing_secret: Option<String>,
}

pub fn create_router(handler: Arc<AnalysisHandler>, signing_secret: Option<String>) -> Router {
    let state = Arc::new(AppState {
        handler,
        signing_secret,
    });

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/analyze", post(analyze_handler))
        .route("/state", get(state_handler))
        .route("/cancel", post(cancel_handler))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}

/// Verify request signature using HMAC-SHA256
fn verify_signature(payload: &str, signature: &str, secret: &str) -> bool {
    type HmacSha256 = Hmac<Sha256>;

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };

    // Accept both "sha256=<hex>" and bare hex
    let provided_signature = signature.strip_prefix("sha256=").unwrap_or(signature);
    let provided_bytes = match hex::decode(provided_signature) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    mac.update(payload.as_bytes());
    mac.verify_slice(&provided_bytes).is_ok()
}

async fn analyze_handler(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    body: String,
) -> Response {
    log::info!("🔔 Analyze request received ({} bytes)", body.len());

    if let Some(secret) = &state.signing_secret {
        let signature = headers
            .get("x-signature")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        if !verify_signature(&body, signature, secret) {
            log::error!("❌ Analyze request signature verification failed");
            return StatusCode::UNAUTHORIZED.into_response();
        }
        log::debug!("✅ Analyze request signature verified");
    }

    let picked: PickedImage = match serde_json::from_str(&body) {
        Ok(picked) => picked,
        Err(e) => {
            log::error!("❌ Failed to parse picked image: {}", e);
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    // Runs detached so a client disconnect cannot abandon the analysis mid-flight
    let handler = state.handler.clone();
    let outcome = match tokio::spawn(async move { handler.handle_pick(picked).await }).await {
        Ok(outcome) => outcome,
        Err(e) => {
            log::error!("❌ Analysis task failed: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match outcome {
        None => StatusCode::NO_CONTENT.into_response(),
        Some(AnalysisOutcome::Displayed(nutrition)) => (StatusCode::OK, Json(nutrition)).into_response(),
        Some(AnalysisOutcome::Failed(notification)) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": notification })),
        )
            .into_response(),
        Some(AnalysisOutcome::Superseded) => (
            StatusCode::CONFLICT,
            Json(json!({ "error": "superseded by a newer analysis" })),
        )
            .into_response(),
    }
}

async fn state_handler(State(state): State<Arc<AppState>>) -> Response {
    Json(state.handler.snapshot()).into_response()
}

async fn cancel_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    state.handler.cancel();
    StatusCode::NO_CONTENT
}

async fn root_handler() -> &'static str {
    "Food Nutrition Scanner - POST a picked image to /analyze"
}

async fn health_check() -> &'static str {
    "OK"
}
