//! Chat relay endpoints
//!
//! `POST /api/chat` proxies one exchange to the upstream completion API
//! with a locale-selected system prompt and the session's context
//! window. `POST /api/chat/clear` drops a session's held context.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::locale::Locale;
use crate::server::context::ContextEntry;
use crate::server::upstream::ChatMessage;

/// Session key used when the widget does not supply one
const DEFAULT_SESSION: &str = "default";

/// Chat request body
#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub message: String,
    #[serde(default)]
    pub language: Locale,
    #[serde(default)]
    pub session: Option<String>,
}

/// Chat response body
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Clear request body
#[derive(Debug, Deserialize)]
pub struct ClearBody {
    #[serde(default)]
    pub session: Option<String>,
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Build the chat router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/chat/clear", post(clear))
        .with_state(state)
}

/// Relay one chat exchange to the upstream completion API
async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatBody>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    if body.message.trim().is_empty() {
        return Err(bad_request("message must not be empty"));
    }

    let session = body.session.as_deref().unwrap_or(DEFAULT_SESSION);
    let locale = body.language;

    // System prompt by locale, then the session's context window, then
    // the new user message
    let mut messages = vec![ChatMessage::system(locale.system_prompt())];
    {
        let contexts = state.contexts.lock().await;
        for entry in contexts.entries(session) {
            messages.push(ChatMessage::new(entry.role, entry.content));
        }
    }
    messages.push(ChatMessage::new("user", body.message.clone()));

    tracing::info!(session, locale = %locale, "chat request");

    let reply = state.upstream.complete(&messages).await.map_err(|e| {
        tracing::error!(error = %e, session, "upstream completion failed");
        (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: "upstream completion failed".to_string(),
            }),
        )
    })?;

    // Remember the exchange inside the sliding window
    {
        let mut contexts = state.contexts.lock().await;
        contexts.push(session, ContextEntry::user(body.message, locale));
        contexts.push(session, ContextEntry::assistant(reply.clone(), locale));
    }

    Ok(Json(ChatResponse { reply }))
}

/// Drop a session's held context
async fn clear(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ClearBody>,
) -> StatusCode {
    let session = body.session.as_deref().unwrap_or(DEFAULT_SESSION);
    state.contexts.lock().await.clear(session);
    tracing::info!(session, "context cleared");
    StatusCode::NO_CONTENT
}

fn bad_request(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}
