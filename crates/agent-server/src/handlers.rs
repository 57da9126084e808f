//! HTTP Handlers

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use defi_butler::butler::GENERIC_APOLOGY;
use defi_butler::{ChatMessage, GREETING, SUGGESTIONS};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub session_ready: bool,
    pub provider: String,
    pub provider_connected: bool,
}

#[derive(Serialize)]
pub struct SuggestionsResponse {
    pub greeting: &'static str,
    pub suggestions: &'static [&'static str],
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider = state.session.provider();
    let provider_connected = provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        session_ready: state.session.is_ready(),
        provider: provider.name().to_string(),
        provider_connected,
    })
}

/// Greeting and starter prompts for a fresh chat
pub async fn suggestions() -> Json<SuggestionsResponse> {
    Json(SuggestionsResponse {
        greeting: GREETING,
        suggestions: SUGGESTIONS,
    })
}

fn apology() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ChatMessage::assistant(GENERIC_APOLOGY)),
    )
        .into_response()
}

/// Main chat endpoint. The session is brought up before the body is looked at.
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let butler = match state.session.get().await {
        Ok(butler) => butler,
        Err(e) => {
            tracing::error!(error = %e, "Butler unavailable");
            return apology();
        }
    };

    let message = match payload {
        Ok(Json(request)) => request.message.filter(|m| !m.is_empty()),
        Err(rejection) => {
            tracing::error!(error = %rejection, "Unreadable chat request");
            return apology();
        }
    };

    let Some(message) = message else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Message is required".into(),
            }),
        )
            .into_response();
    };

    tracing::info!(chars = message.len(), "Chat message received");
    Json(butler.process_message(&message).await).into_response()
}
