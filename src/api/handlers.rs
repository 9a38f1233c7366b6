//! HTTP request handlers

use super::{AppState, RendererContext};
use crate::handoff;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Renderer endpoint: the deep link the bot hands out
        .route("/create/:token", get(create_page))
        // Generic conversation-channel adapter
        .route("/api/messages", post(receive_message))
        .route("/healthz", get(healthz))
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Renderer endpoint
// ============================================================

async fn create_page(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Response {
    match handoff::decode(&token) {
        Ok(params) => {
            // CreateParams serialization cannot fail; fall back to an empty
            // blob rather than a 500 if it somehow does.
            let data = serde_json::to_string(&params).unwrap_or_default();
            Html(render_create_page(&state.renderer, &data)).into_response()
        }
        Err(err) => {
            tracing::warn!(error = %err, "rejecting malformed handoff token");
            (
                StatusCode::BAD_REQUEST,
                Html(
                    "<h1>Invalid auction link</h1>\
                     <p>This link is malformed or truncated. \
                     Ask the bot for a fresh one.</p>"
                        .to_string(),
                ),
            )
                .into_response()
        }
    }
}

/// Fill the three substitution points in the bundled page template.
fn render_create_page(renderer: &RendererContext, data: &str) -> String {
    renderer
        .template
        .replace("<<data>>", data)
        .replace("<<aggregator_abi>>", &renderer.abis.aggregator)
        .replace("<<erc721_abi>>", &renderer.abis.erc721)
}

// ============================================================
// Conversation-channel adapter
// ============================================================

/// One incoming channel event.
#[derive(Debug, Deserialize)]
struct MessageRequest {
    session_key: String,
    text: String,
}

/// The reply the channel should show, with an opaque keyboard hint.
#[derive(Debug, Serialize)]
struct MessageResponse {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    keyboard: Option<Vec<Vec<String>>>,
}

async fn receive_message(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> Json<MessageResponse> {
    let reply = state
        .bot
        .handle_message(&request.session_key, &request.text)
        .await;
    Json(MessageResponse {
        text: reply.text,
        keyboard: reply.keyboard,
    })
}

// ============================================================
// Liveness / version
// ============================================================

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn get_version() -> &'static str {
    concat!("gavel ", env!("CARGO_PKG_VERSION"))
}
