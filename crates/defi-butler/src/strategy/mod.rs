//! Investment Strategies
//!
//! The static catalog and the lookup that attaches it to an agent reply.

pub mod catalog;

pub use catalog::{StrategyCategory, all as all_categories, category};

use crate::model::{RiskLevel, Strategy};

const RISK_MENTIONS: &[(&str, RiskLevel)] = &[
    ("low risk", RiskLevel::Low),
    ("medium risk", RiskLevel::Medium),
    ("high risk", RiskLevel::High),
];

/// Strategies for the first risk tier the agent's reply mentions, if any.
///
/// Keyed off the agent's output, not the user's input.
pub fn attach_strategies(reply: &str) -> Option<Vec<Strategy>> {
    let text = reply.to_lowercase();
    RISK_MENTIONS
        .iter()
        .find(|(phrase, _)| text.contains(phrase))
        .map(|(_, level)| category(*level).strategies)
}
