//! Domain Models
//!
//! Chat turns, risk profiles, positions and strategies as returned to the chat UI.
//! Uses `rust_decimal` for every amount; values cross the wire as JSON numbers.

use std::collections::BTreeSet;

use agent_core::Role;
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// One chat turn as returned by the chat endpoint
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,

    pub content: String,

    /// Milliseconds since the Unix epoch
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategies: Option<Vec<Strategy>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<Portfolio>,
}

impl ChatMessage {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            strategies: None,
            portfolio: None,
        }
    }

    #[must_use]
    pub fn with_strategies(mut self, strategies: Option<Vec<Strategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Explicitly attach an empty strategy list
    #[must_use]
    pub fn without_strategies(mut self) -> Self {
        self.strategies = Some(Vec::new());
        self
    }

    #[must_use]
    pub fn with_portfolio(mut self, portfolio: Option<Portfolio>) -> Self {
        self.portfolio = portfolio;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Low,
    Medium,
    High,
    /// Not stated yet; the butler should ask
    Ask,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentHorizon {
    Short,
    Medium,
    Long,
}

/// Strategy preference tags inferred from free text
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyTag {
    StablecoinLending,
    StablecoinLp,
    EthLending,
    EthLp,
    Lending,
    LiquidityProviding,
}

/// Coarse risk profile derived from a user's message
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfile {
    pub tolerance: RiskTolerance,

    pub horizon: InvestmentHorizon,

    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    pub preferred_strategies: BTreeSet<StrategyTag>,

    pub needs_assessment: bool,
}

impl RiskProfile {
    /// Profile used when nothing has been assessed yet
    pub fn unassessed() -> Self {
        Self {
            tolerance: RiskTolerance::Ask,
            horizon: InvestmentHorizon::Medium,
            amount: Decimal::ZERO,
            preferred_strategies: BTreeSet::new(),
            needs_assessment: true,
        }
    }

    /// Profile for wallet/balance questions, which skip assessment
    pub fn holdings_query() -> Self {
        Self {
            needs_assessment: false,
            ..Self::unassessed()
        }
    }
}

impl Default for RiskProfile {
    fn default() -> Self {
        Self::unassessed()
    }
}

/// A holding or protocol position read from chain
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub protocol: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub asset: String,

    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    /// Protocol-specific detail bag
    #[serde(default)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl Position {
    pub fn new(
        protocol: impl Into<String>,
        kind: impl Into<String>,
        asset: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            protocol: protocol.into(),
            kind: kind.into(),
            asset: asset.into(),
            amount,
            details: serde_json::Map::new(),
        }
    }

    /// Base-chain wallet holding, rounded to 6 decimals
    pub fn holding(asset: impl Into<String>, amount: Decimal) -> Self {
        Self::new(
            "Base",
            "holding",
            asset,
            amount.round_dp_with_strategy(6, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    #[must_use]
    pub fn with_detail(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

/// Snapshot of the wallet assembled on demand
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub risk_profile: RiskProfile,

    pub positions: Vec<Position>,

    /// Naive sum of position amounts across assets (no price conversion)
    #[serde(with = "rust_decimal::serde::float")]
    pub total_value: Decimal,
}

impl Portfolio {
    pub fn new(risk_profile: RiskProfile, positions: Vec<Position>) -> Self {
        let total_value = positions
            .iter()
            .map(|p| p.amount)
            .sum::<Decimal>()
            .round_dp_with_strategy(6, RoundingStrategy::MidpointAwayFromZero);
        Self {
            risk_profile,
            positions,
            total_value,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyRequirements {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub minimum_amount: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Static catalog entry describing an investment strategy
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    pub id: String,
    pub name: String,
    pub description: String,
    pub risk_level: RiskLevel,
    pub protocol: String,
    /// Text range such as "3-5%"
    pub expected_apy: String,
    pub is_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<StrategyRequirements>,
}
