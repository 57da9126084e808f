//! # agent-server
//!
//! Axum HTTP surface for the Ailfred butler.
//!
//! | Method | Path               | Purpose                         |
//! |--------|--------------------|---------------------------------|
//! | GET    | `/health`          | Liveness, session and provider  |
//! | GET    | `/api/suggestions` | Greeting and starter prompts    |
//! | POST   | `/api/chat`        | `{message}` → `ChatMessage`     |

pub mod config;
pub mod handlers;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use config::{ProviderKind, ServerConfig};
pub use state::AppState;

/// Full application router with CORS and request tracing
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/suggestions", get(handlers::suggestions))
        .route("/api/chat", post(handlers::chat_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
