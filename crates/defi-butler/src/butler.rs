//! Butler
//!
//! Turns one user message into one assistant [`ChatMessage`]. The agent always
//! answers first; the router then decides whether that answer is used as-is or
//! replaced by live wallet data.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use agent_core::{ConversationalAgent, ThreadId};
use rust_decimal::Decimal;

use crate::model::{ChatMessage, RiskProfile};
use crate::network::Network;
use crate::profiler;
use crate::router::{self, Intent};
use crate::strategy::attach_strategies;
use crate::svckit::{AaveLending, BalanceReader, assemble_portfolio};
use crate::wallet::WalletProvider;

pub const GENERIC_APOLOGY: &str =
    "I do apologize, sire, but I encountered an error while processing your request. Please try again.";
pub const BALANCE_APOLOGY: &str =
    "I do apologize, sire, but I encountered an error while fetching your balances.";
pub const AAVE_APOLOGY: &str = "I do apologize, sire, but I encountered an error while processing your AAVE request. The lending pool might be temporarily unavailable. Please try again in a moment.";
pub const EMPTY_REPLY_FALLBACK: &str =
    "I do apologize, sire, but I couldn't process that request properly.";

pub const STRATEGY_PITCH: &str = "Very good, sire. Before I make specific recommendations, may I inquire about your risk tolerance? Are you looking for low, medium, or high-risk investments?

Currently, I specialize in AAVE lending on Base, which offers an excellent yield of approximately 10% APY - significantly higher than traditional bank savings rates. This represents a relatively low-risk strategy while maintaining attractive returns.

Would you like me to help you get started with AAVE lending? I can assist you in supplying ETH to the lending pool to start earning yield immediately.";

/// A ready butler: one agent, one thread, one wallet
pub struct Butler {
    agent: Arc<dyn ConversationalAgent>,
    thread: ThreadId,
    wallet: Arc<dyn WalletProvider>,
    network: Network,
    balances: BalanceReader,
    aave: AaveLending,
    risk_profile: OnceLock<RiskProfile>,
}

impl Butler {
    pub fn new(
        agent: Arc<dyn ConversationalAgent>,
        thread: ThreadId,
        wallet: Arc<dyn WalletProvider>,
        settle_delay: Duration,
    ) -> Self {
        let network = Network::from_id(wallet.network_id());
        Self {
            agent,
            thread,
            balances: BalanceReader::new(wallet.clone(), network),
            aave: AaveLending::new(wallet.clone(), network).with_settle_delay(settle_delay),
            wallet,
            network,
            risk_profile: OnceLock::new(),
        }
    }

    pub fn wallet(&self) -> &Arc<dyn WalletProvider> {
        &self.wallet
    }

    pub const fn network(&self) -> Network {
        self.network
    }

    pub const fn thread(&self) -> &ThreadId {
        &self.thread
    }

    /// The profile taken from the first non-holdings message, if one has arrived
    pub fn risk_profile(&self) -> Option<&RiskProfile> {
        self.risk_profile.get()
    }

    /// Profile the message unless a profile already exists; never recomputed
    fn observe_profile(&self, content: &str) {
        if self.risk_profile.get().is_some() || profiler::is_holdings_query(content) {
            return;
        }
        let profile = self.risk_profile.get_or_init(|| profiler::analyze(content));
        tracing::info!(tolerance = ?profile.tolerance, amount = %profile.amount, "Risk profile recorded");
    }

    /// Answer one user message. Never fails; failures become apologies.
    pub async fn process_message(&self, content: &str) -> ChatMessage {
        self.observe_profile(content);

        let reply = match self.agent.reply(&self.thread, content).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(error = %e, "Agent turn failed");
                return ChatMessage::assistant(GENERIC_APOLOGY).without_strategies();
            }
        };

        match router::classify(content) {
            Intent::Balance => self.balance_reply(&reply).await,
            Intent::Aave {
                amount: Some(amount),
            } if amount > Decimal::ZERO => {
                ChatMessage::assistant(self.aave.supply_eth(amount).await).without_strategies()
            }
            Intent::Aave { .. } => self.aave_positions_reply().await,
            Intent::StrategyRecommendation => {
                ChatMessage::assistant(STRATEGY_PITCH).without_strategies()
            }
            Intent::General => {
                let strategies = attach_strategies(&reply);
                let content = if reply.is_empty() {
                    EMPTY_REPLY_FALLBACK.to_string()
                } else {
                    reply
                };
                ChatMessage::assistant(content).with_strategies(strategies)
            }
        }
    }

    async fn balance_reply(&self, reply: &str) -> ChatMessage {
        let balances = match self.balances.read().await {
            Ok(balances) => balances,
            Err(e) => {
                tracing::error!(error = %e, "Error fetching balances");
                return ChatMessage::assistant(BALANCE_APOLOGY).without_strategies();
            }
        };

        let profile = self
            .risk_profile()
            .cloned()
            .unwrap_or_else(RiskProfile::unassessed);
        let portfolio = assemble_portfolio(&balances, &self.aave, profile).await;

        ChatMessage::assistant(balances.report())
            .with_strategies(attach_strategies(reply))
            .with_portfolio(Some(portfolio))
    }

    async fn aave_positions_reply(&self) -> ChatMessage {
        let content = match self.aave.position_report().await {
            Ok(report) => format!("Very good, sire. {report}"),
            Err(e) => {
                tracing::error!(error = %e, "Error handling AAVE request");
                AAVE_APOLOGY.to_string()
            }
        };
        ChatMessage::assistant(content).without_strategies()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RiskTolerance, StrategyTag};
    use crate::wallet::{MockWallet, abi};
    use agent_core::{AgentError, Result as AgentResult};
    use alloy_primitives::U256;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Agent double with a fixed reply that records what it was asked
    struct FixedAgent {
        reply: Option<String>,
        inputs: Mutex<Vec<String>>,
    }

    impl FixedAgent {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply.to_string()),
                inputs: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                inputs: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ConversationalAgent for FixedAgent {
        async fn reply(&self, _thread: &ThreadId, input: &str) -> AgentResult<String> {
            self.inputs.lock().unwrap().push(input.to_string());
            self.reply
                .clone()
                .ok_or_else(|| AgentError::Provider("model offline".into()))
        }
    }

    fn butler_with(agent: Arc<FixedAgent>, wallet: Arc<MockWallet>) -> Butler {
        Butler::new(
            agent,
            ThreadId::from_string("test"),
            wallet,
            Duration::ZERO,
        )
    }

    fn demo_wallet() -> Arc<MockWallet> {
        Arc::new(MockWallet::demo(Network::BaseSepolia))
    }

    #[tokio::test]
    async fn test_balance_report_replaces_agent_text() {
        let butler = butler_with(FixedAgent::new("It is low risk, sire."), demo_wallet());

        let msg = butler.process_message("What is my wallet balance?").await;

        assert!(msg.content.contains("ETH: 1.000000 ETH"));
        assert!(msg.content.contains("USDC: 8.000000 USDC"));
        assert!(msg.content.contains("WETH: 0.500000 WETH"));
        assert!(!msg.content.contains("low risk"));
        assert_eq!(msg.strategies.as_ref().map(Vec::len), Some(1));

        let portfolio = msg.portfolio.unwrap();
        assert_eq!(portfolio.positions.len(), 3);
        assert!(portfolio.risk_profile.needs_assessment);
    }

    #[tokio::test]
    async fn test_balance_read_failure_apologizes() {
        let wallet = Arc::new(MockWallet::builder().balance_error("rpc down").build());
        let butler = butler_with(FixedAgent::new("ok"), wallet);

        let msg = butler.process_message("balance").await;

        assert_eq!(msg.content, BALANCE_APOLOGY);
        assert_eq!(msg.strategies, Some(Vec::new()));
        assert!(msg.portfolio.is_none());
    }

    #[tokio::test]
    async fn test_aave_position_query() {
        let butler = butler_with(FixedAgent::new("ignored"), demo_wallet());

        let msg = butler.process_message("What are my AAVE positions?").await;

        assert_eq!(msg.content, "Very good, sire. No AAVE positions found.");
        assert_eq!(msg.strategies, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_aave_read_failure_apologizes() {
        let wallet = Arc::new(
            MockWallet::builder()
                .read_error(
                    Network::BaseSepolia.aave().pool_data_provider,
                    abi::GET_USER_RESERVES_DATA,
                    "pool paused",
                )
                .build(),
        );
        let butler = butler_with(FixedAgent::new("ignored"), wallet);

        let msg = butler.process_message("show aave").await;

        assert_eq!(msg.content, AAVE_APOLOGY);
    }

    #[tokio::test]
    async fn test_supply_intent_sends_transaction() {
        let wallet = Arc::new(
            MockWallet::builder()
                .balance(U256::from(1_000_000_000_000_000_000u128))
                .user_reserves(Network::BaseSepolia, Vec::new())
                .build(),
        );
        let butler = butler_with(FixedAgent::new("ignored"), wallet.clone());

        let msg = butler.process_message("Lend 0.2 ETH on AAVE").await;

        assert!(msg.content.starts_with("Very good, sire. I have successfully supplied 0.2000 ETH"));
        assert_eq!(wallet.sent_transactions().len(), 1);
        assert_eq!(
            wallet.sent_transactions()[0].value,
            Some(U256::from(200_000_000_000_000_000u128))
        );
    }

    #[tokio::test]
    async fn test_demo_wallet_supply_is_refused() {
        let wallet = demo_wallet();
        let butler = butler_with(FixedAgent::new("ignored"), wallet.clone());

        let msg = butler.process_message("supply 0.5 eth to aave").await;

        assert_eq!(msg.content, crate::svckit::aave::SUPPLY_FAILED);
        assert_eq!(msg.strategies, Some(vec![]));
        assert_eq!(wallet.sent_transactions().len(), 1);
    }

    #[tokio::test]
    async fn test_zero_amount_lists_positions() {
        let wallet = demo_wallet();
        let butler = butler_with(FixedAgent::new("ignored"), wallet.clone());

        let msg = butler.process_message("supply 0 eth to aave").await;

        assert_eq!(msg.content, "Very good, sire. No AAVE positions found.");
        assert!(wallet.sent_transactions().is_empty());
    }

    #[tokio::test]
    async fn test_strategy_pitch() {
        let butler = butler_with(FixedAgent::new("high risk!"), demo_wallet());

        let msg = butler
            .process_message("What investment strategies do you recommend?")
            .await;

        assert_eq!(msg.content, STRATEGY_PITCH);
        assert_eq!(msg.strategies, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_general_reply_passes_through_with_strategies() {
        let butler = butler_with(
            FixedAgent::new("Very good, sire. A medium risk approach suits you."),
            demo_wallet(),
        );

        let msg = butler.process_message("How should I grow my savings?").await;

        assert_eq!(msg.content, "Very good, sire. A medium risk approach suits you.");
        let strategies = msg.strategies.unwrap();
        assert_eq!(strategies[0].id, "aave_eth_lending");
    }

    #[tokio::test]
    async fn test_empty_reply_falls_back() {
        let butler = butler_with(FixedAgent::new(""), demo_wallet());

        let msg = butler.process_message("hello").await;

        assert_eq!(msg.content, EMPTY_REPLY_FALLBACK);
        assert_eq!(msg.strategies, None);
    }

    #[tokio::test]
    async fn test_agent_failure_apologizes() {
        let butler = butler_with(FixedAgent::failing(), demo_wallet());

        let msg = butler.process_message("What is my wallet balance?").await;

        assert_eq!(msg.content, GENERIC_APOLOGY);
    }

    #[tokio::test]
    async fn test_profile_is_set_once_from_first_non_holdings_message() {
        let agent = FixedAgent::new("ok");
        let butler = butler_with(agent.clone(), demo_wallet());

        butler.process_message("show my balance").await;
        assert!(butler.risk_profile().is_none());

        butler.process_message("invest 1000 in a stablecoin, safe please").await;
        butler.process_message("actually I am aggressive").await;

        let profile = butler.risk_profile().unwrap();
        assert_eq!(profile.tolerance, RiskTolerance::Low);
        assert!(profile.preferred_strategies.contains(&StrategyTag::StablecoinLending));
        assert_eq!(agent.inputs.lock().unwrap().len(), 3);
    }
}
