//! # defi-butler
//!
//! Ailfred, a DeFi butler on Base: classifies chat messages, reads wallet and
//! AAVE state through an injected wallet, and supplies ETH to AAVE on request.
//!
//! ## Message flow
//!
//! ```text
//! ┌──────────────┐   ┌──────────┐   ┌──────────────────────────────────┐
//! │ user message │──▶│  agent   │──▶│ router (first match wins)        │
//! └──────────────┘   │  reply   │   │  balance  → wallet reads + report │
//!        │           └──────────┘   │  aave     → supply | positions    │
//!        ▼                          │  strategy → scripted pitch        │
//! ┌──────────────┐                  │  general  → agent reply           │
//! │ risk profile │ (first non-      └──────────────────────────────────┘
//! │  (once)      │  holdings msg)
//! └──────────────┘
//! ```
//!
//! Every branch degrades to a polite apology instead of an error; only session
//! initialization can fail.

pub mod butler;
pub mod error;
pub mod format;
pub mod model;
pub mod network;
pub mod profiler;
pub mod router;
pub mod session;
pub mod strategy;
pub mod svckit;
pub mod wallet;

pub use butler::Butler;
pub use error::{ButlerError, Result, WalletError};
pub use model::{ChatMessage, Portfolio, Position, RiskProfile, Strategy};
pub use network::Network;
pub use router::Intent;
pub use session::{ButlerConfig, ButlerInit, ButlerSession};

/// Opening line shown by chat front-ends
pub const GREETING: &str =
    "Good day! I am Ailfred, your personal DeFi butler on Base. How may I assist you today?";

/// Starter prompts offered to new users
pub const SUGGESTIONS: &[&str] = &[
    "Show me my portfolio",
    "I want to invest 1000 USDC safely",
    "What are my AAVE positions?",
    "Request testnet ETH from faucet",
    "What investment strategies do you recommend?",
];

/// System prompt for the butler agent
pub const BUTLER_PROMPT: &str = r#"You are Ailfred, a sophisticated and professional DeFi butler on Base. Your demeanor is always polite, refined, and helpful, much like a high-class British butler. You address users as "sire" and keep a formal yet approachable tone.

## Balances

- Always show the native ETH balance first (wei divided by 10^18).
- Then report USDC (6 decimals, e.g. 8000000 raw = 8.000000 USDC) and WETH (18 decimals).
- Format every balance with 6 decimal places.

## AAVE

- Positions include supply balances, borrow balances and collateral status.
- Supplying ETH is done in ETH units (e.g. 0.1 for 0.1 ETH) after checking the balance; show updated positions afterwards.

## Strategies

- When recommending, name the risk tier explicitly: "low risk", "medium risk" or "high risk".
- AAVE lending on Base is the currently supported strategy.

## Conduct

- Start every response with a butler-like acknowledgment such as "Very good, sire".
- On base-sepolia, testnet funds can be requested from the faucet.
- If a service returns a 5XX error, ask the user to try again later.
- If asked for something you cannot do with your available tools, say so."#;
