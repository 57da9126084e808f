//! Risk Profiler
//!
//! Keyword heuristics that turn a free-text message into a [`RiskProfile`].
//! Plain substring matching on the lower-cased text; first match wins.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::model::{InvestmentHorizon, RiskProfile, RiskTolerance, StrategyTag};

static AMOUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\$?\s*([0-9]+(?:,[0-9]{3})*(?:\.[0-9]{2})?)\s*(k|m|b|thousand|million|billion)?")
        .expect("amount pattern is a valid regex")
});

const HOLDINGS_KEYWORDS: &[&str] = &["balance", "wallet", "holdings"];

const TOLERANCE_RULES: &[(&[&str], RiskTolerance)] = &[
    (&["conservative", "safe", "low risk"], RiskTolerance::Low),
    (&["moderate", "balanced"], RiskTolerance::Medium),
    (&["aggressive", "risky", "high risk"], RiskTolerance::High),
];

const HORIZON_RULES: &[(&[&str], InvestmentHorizon)] = &[
    (&["quick", "short term", "fast"], InvestmentHorizon::Short),
    (&["long term", "hodl", "stable"], InvestmentHorizon::Long),
];

/// Tags are additive; every matching rule contributes
const STRATEGY_RULES: &[(&[&str], &[StrategyTag])] = &[
    (
        &["stablecoin", "stable"],
        &[StrategyTag::StablecoinLending, StrategyTag::StablecoinLp],
    ),
    (&["eth", "ethereum"], &[StrategyTag::EthLending, StrategyTag::EthLp]),
    (&["lend", "aave"], &[StrategyTag::Lending]),
    (
        &["lp", "liquidity", "uniswap"],
        &[StrategyTag::LiquidityProviding],
    ),
];

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Whether the message asks about wallet contents rather than investing
pub fn is_holdings_query(input: &str) -> bool {
    contains_any(&input.to_lowercase(), HOLDINGS_KEYWORDS)
}

/// Derive a risk profile from a single message
pub fn analyze(input: &str) -> RiskProfile {
    let text = input.to_lowercase();

    if contains_any(&text, HOLDINGS_KEYWORDS) {
        return RiskProfile::holdings_query();
    }

    let tolerance = TOLERANCE_RULES
        .iter()
        .find(|(keywords, _)| contains_any(&text, keywords))
        .map_or(RiskTolerance::Ask, |(_, tolerance)| *tolerance);

    let horizon = HORIZON_RULES
        .iter()
        .find(|(keywords, _)| contains_any(&text, keywords))
        .map_or(InvestmentHorizon::Medium, |(_, horizon)| *horizon);

    let preferred_strategies = STRATEGY_RULES
        .iter()
        .filter(|(keywords, _)| contains_any(&text, keywords))
        .flat_map(|(_, tags)| tags.iter().copied())
        .collect();

    RiskProfile {
        tolerance,
        horizon,
        amount: extract_amount(input).unwrap_or(Decimal::ZERO),
        preferred_strategies,
        needs_assessment: tolerance == RiskTolerance::Ask,
    }
}

/// First monetary amount in the text, with k/m/b style multipliers applied
pub fn extract_amount(input: &str) -> Option<Decimal> {
    let caps = AMOUNT_PATTERN.captures(input)?;
    let digits = caps.get(1)?.as_str().replace(',', "");
    let amount = Decimal::from_str(&digits).ok()?;

    let multiplier = match caps.get(2).map(|m| m.as_str().to_lowercase()).as_deref() {
        Some("k" | "thousand") => Decimal::from(1_000),
        Some("m" | "million") => Decimal::from(1_000_000),
        Some("b" | "billion") => Decimal::from(1_000_000_000),
        _ => Decimal::ONE,
    };

    amount.checked_mul(multiplier).map(|d| d.normalize())
}
