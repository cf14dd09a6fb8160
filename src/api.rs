//! Webhook API for the landmark bot
//!
//! Exposes the dialogue over HTTP so any chat transport can forward
//! messages and photos and render the replies it gets back.

use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::{Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::dialogue::Dialogue;
use crate::error::BotError;
use crate::models::{InboundMessage, UserId};

/// Largest photo accepted by the webhook
const MAX_PHOTO_BYTES: usize = 20 * 1024 * 1024;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct TextMessageRequest {
    pub text: String,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub dialogue: Arc<Dialogue>,
    /// SHA-256 of the configured bot token; `None` disables the check
    token_hash: Option<Vec<u8>>,
}

impl ApiState {
    pub fn new(dialogue: Arc<Dialogue>, bot_token: Option<&str>) -> Self {
        let token_hash = bot_token.map(|t| Sha256::digest(t.as_bytes()).to_vec());
        if token_hash.is_none() {
            warn!("BOT_TOKEN not set; webhook accepts unauthenticated requests");
        }

        Self {
            dialogue,
            token_hash,
        }
    }
}

/// =============================
/// Authentication
/// =============================

async fn require_bot_token(
    State(state): State<ApiState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(expected) = &state.token_hash else {
        return next.run(req).await;
    };

    let provided = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or("");

    if Sha256::digest(provided.as_bytes()).as_slice() != expected.as_slice() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("invalid or missing bot token".into())),
        )
            .into_response();
    }

    next.run(req).await
}

/// =============================
/// Health Endpoint
/// =============================

async fn health(State(state): State<ApiState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "sessions": state.dialogue.sessions().len().await,
        "landmarks": state.dialogue.catalog().entries().len(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Message Endpoints
/// =============================

async fn post_message(
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
    Json(req): Json<TextMessageRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    let user = UserId::from_external(&user_id);
    info!(user_id = %user, "Received text message");

    let reply = state
        .dialogue
        .handle(user, InboundMessage::Text(req.text))
        .await;

    (StatusCode::OK, Json(ApiResponse::success(reply)))
}

async fn post_photo(
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
    multipart: Multipart,
) -> (StatusCode, Json<ApiResponse>) {
    let user = UserId::from_external(&user_id);

    let photo = match read_image_field(multipart).await {
        Ok(photo) => photo,
        Err(e) => {
            warn!(user_id = %user, error = %e, "Rejected photo upload");
            return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e.to_string())));
        }
    };

    info!(user_id = %user, photo_bytes = photo.len(), "Received photo");

    let reply = state
        .dialogue
        .handle(user, InboundMessage::Photo(photo))
        .await;

    (StatusCode::OK, Json(ApiResponse::success(reply)))
}

async fn read_image_field(mut multipart: Multipart) -> crate::Result<Vec<u8>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| BotError::InvalidRequest(format!("malformed multipart body: {}", e)))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| BotError::InvalidRequest(format!("could not read image: {}", e)))?;

        if bytes.is_empty() {
            return Err(BotError::InvalidRequest("image field is empty".into()));
        }
        return Ok(bytes.to_vec());
    }

    Err(BotError::InvalidRequest("missing multipart field 'image'".into()))
}

async fn get_session(
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
) -> (StatusCode, Json<ApiResponse>) {
    let user = UserId::from_external(&user_id);
    let session = state
        .dialogue
        .sessions()
        .snapshot(user)
        .await
        .unwrap_or_default();

    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({
            "user_id": user,
            "session": session,
        }))),
    )
}

/// =============================
/// Router
/// =============================

pub fn create_router(state: ApiState) -> Router {
    let protected = Router::new()
        .route("/api/users/:user_id/messages", post(post_message))
        .route("/api/users/:user_id/photos", post(post_photo))
        .route("/api/users/:user_id/session", get(get_session))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bot_token))
        .layer(axum::extract::DefaultBodyLimit::max(MAX_PHOTO_BYTES));

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(state: ApiState, port: u16) -> crate::Result<()> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("Webhook listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
