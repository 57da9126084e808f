//! Ailfred HTTP Server
//!
//! Serves the DeFi butler over a small JSON API. The wallet is the demo
//! connector; signing and submission belong to an external wallet SDK.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::LlmProvider;
use agent_runtime::{OllamaProvider, ScriptedProvider};
use agent_server::{AppState, ProviderKind, ServerConfig, router};
use defi_butler::wallet::{DemoWalletConnector, FileWalletStore};
use defi_butler::{ButlerInit, ButlerSession};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env()?;

    let provider: Arc<dyn LlmProvider> = match config.provider {
        ProviderKind::Ollama => Arc::new(OllamaProvider::from_env()),
        ProviderKind::Scripted => Arc::new(ScriptedProvider::butler()),
    };

    match provider.health_check().await {
        Ok(true) => tracing::info!(provider = provider.name(), "✓ LLM provider reachable"),
        Ok(false) | Err(_) => {
            tracing::warn!(provider = provider.name(), "⚠ LLM provider not available - chat will apologize");
            tracing::warn!("  Start Ollama (ollama serve) or set AGENT_PROVIDER=scripted");
        }
    }

    let store = FileWalletStore::new(config.butler.wallet_data_file.clone());
    tracing::info!(
        network = %config.butler.network_id,
        wallet_file = %store.path().display(),
        thread = %config.butler.thread_id,
        "Butler configured"
    );

    let session = ButlerSession::new(
        config.butler,
        ButlerInit {
            provider,
            connector: Arc::new(DemoWalletConnector),
            store: Arc::new(store),
        },
    );
    let app = router(AppState::new(session));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🎩 Ailfred server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health          - Health check");
    tracing::info!("  GET  /api/suggestions - Greeting and suggestions");
    tracing::info!("  POST /api/chat        - Send message");

    axum::serve(listener, app).await?;

    Ok(())
}
