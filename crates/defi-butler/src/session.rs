//! Butler Session
//!
//! Lazy, once-per-process initialization of the [`Butler`]. Concurrent first
//! requests wait on the same initialization; a failed attempt leaves the
//! session uninitialized so the next request tries again.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use agent_core::{AgentBuilder, GenerationOptions, LlmProvider, ThreadId, ThreadMemory};
use tokio::sync::OnceCell;

use crate::BUTLER_PROMPT;
use crate::butler::Butler;
use crate::error::{ButlerError, Result};
use crate::model::ChatMessage;
use crate::network::BASE_SEPOLIA_ID;
use crate::svckit::aave::DEFAULT_SETTLE_DELAY;
use crate::wallet::{WalletConnector, WalletExportStore};

pub const DEFAULT_THREAD_ID: &str = "Ailfred DeFi Butler";
pub const DEFAULT_WALLET_DATA_FILE: &str = "wallet_data.txt";

/// Butler settings
#[derive(Clone, Debug)]
pub struct ButlerConfig {
    pub network_id: String,
    pub thread_id: String,
    pub wallet_data_file: PathBuf,
    pub generation: GenerationOptions,
    /// Wait between a confirmed supply and re-reading positions
    pub settle_delay: Duration,
}

impl Default for ButlerConfig {
    fn default() -> Self {
        Self {
            network_id: BASE_SEPOLIA_ID.into(),
            thread_id: DEFAULT_THREAD_ID.into(),
            wallet_data_file: PathBuf::from(DEFAULT_WALLET_DATA_FILE),
            generation: GenerationOptions::default(),
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

impl ButlerConfig {
    /// Read `NETWORK_ID`, `AGENT_THREAD_ID`, `WALLET_DATA_FILE`, `AGENT_MODEL`,
    /// `AGENT_TEMPERATURE` and `SETTLE_DELAY_MS`, keeping defaults for anything unset
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let temperature = match var("AGENT_TEMPERATURE") {
            Some(raw) => raw
                .parse::<f32>()
                .map_err(|e| ButlerError::Config(format!("AGENT_TEMPERATURE={raw}: {e}")))?,
            None => defaults.generation.temperature,
        };
        let settle_delay = match var("SETTLE_DELAY_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| ButlerError::Config(format!("SETTLE_DELAY_MS={raw}: {e}")))?,
            None => defaults.settle_delay,
        };

        Ok(Self {
            network_id: var("NETWORK_ID").unwrap_or(defaults.network_id),
            thread_id: var("AGENT_THREAD_ID").unwrap_or(defaults.thread_id),
            wallet_data_file: var("WALLET_DATA_FILE")
                .map_or(defaults.wallet_data_file, PathBuf::from),
            generation: GenerationOptions {
                model: var("AGENT_MODEL").unwrap_or(defaults.generation.model),
                temperature,
                ..defaults.generation
            },
            settle_delay,
        })
    }
}

/// External collaborators needed to bring a butler up
#[derive(Clone)]
pub struct ButlerInit {
    pub provider: Arc<dyn LlmProvider>,
    pub connector: Arc<dyn WalletConnector>,
    pub store: Arc<dyn WalletExportStore>,
}

impl Butler {
    /// Connect the wallet, build the agent and persist the wallet export
    pub async fn initialize(config: &ButlerConfig, init: &ButlerInit) -> Result<Self> {
        let export = match init.store.load().await {
            Ok(export) => export,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read saved wallet, creating a new one");
                None
            }
        };
        let restored = export.is_some();

        let wallet = init
            .connector
            .connect(export, &config.network_id)
            .await
            .map_err(|e| ButlerError::Initialization(e.to_string()))?;

        let agent = AgentBuilder::new()
            .provider(init.provider.clone())
            .memory(Arc::new(ThreadMemory::new()))
            .system_prompt(BUTLER_PROMPT)
            .generation(config.generation.clone())
            .build()
            .map_err(|e| ButlerError::Initialization(e.to_string()))?;

        match wallet.export().await {
            Ok(blob) => {
                if let Err(e) = init.store.save(&blob).await {
                    tracing::warn!(error = %e, "Could not save wallet export");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Wallet export unavailable"),
        }

        tracing::info!(
            address = %wallet.address(),
            network = wallet.network_id(),
            restored,
            provider = init.provider.name(),
            "Butler initialized"
        );

        Ok(Self::new(
            Arc::new(agent),
            ThreadId::from_string(config.thread_id.clone()),
            wallet,
            config.settle_delay,
        ))
    }
}

/// Process-wide butler handle, initialized on first use
pub struct ButlerSession {
    config: ButlerConfig,
    init: ButlerInit,
    cell: OnceCell<Arc<Butler>>,
}

impl ButlerSession {
    pub fn new(config: ButlerConfig, init: ButlerInit) -> Self {
        Self {
            config,
            init,
            cell: OnceCell::new(),
        }
    }

    pub const fn config(&self) -> &ButlerConfig {
        &self.config
    }

    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.init.provider
    }

    pub fn is_ready(&self) -> bool {
        self.cell.initialized()
    }

    /// The ready butler, initializing it if this is the first call
    pub async fn get(&self) -> Result<Arc<Butler>> {
        self.cell
            .get_or_try_init(|| async {
                Butler::initialize(&self.config, &self.init)
                    .await
                    .map(Arc::new)
                    .inspect_err(|e| tracing::error!(error = %e, "Failed to initialize butler"))
            })
            .await
            .cloned()
    }

    /// Initialize if needed, then answer the message
    pub async fn process_message(&self, content: &str) -> Result<ChatMessage> {
        let butler = self.get().await?;
        Ok(butler.process_message(content).await)
    }
}
