//! Strategy Catalog
//!
//! Static reference data grouped by risk level. Not derived from live state.

use crate::model::{RiskLevel, Strategy};

/// A titled group of strategies for one risk level
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrategyCategory {
    pub risk_level: RiskLevel,
    pub title: &'static str,
    pub description: &'static str,
    pub strategies: Vec<Strategy>,
}

fn entry(
    id: &str,
    name: &str,
    description: &str,
    risk_level: RiskLevel,
    protocol: &str,
    expected_apy: &str,
    is_available: bool,
) -> Strategy {
    Strategy {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        risk_level,
        protocol: protocol.into(),
        expected_apy: expected_apy.into(),
        is_available,
        requirements: None,
    }
}

/// Category for a risk level
pub fn category(level: RiskLevel) -> StrategyCategory {
    match level {
        RiskLevel::Low => StrategyCategory {
            risk_level: level,
            title: "Conservative Strategies",
            description: "Safe and stable returns with minimal risk",
            strategies: vec![entry(
                "aave_lending",
                "AAVE Lending",
                "Supply stablecoins to AAVE for consistent yield",
                level,
                "AAVE",
                "3-5%",
                true,
            )],
        },
        RiskLevel::Medium => StrategyCategory {
            risk_level: level,
            title: "Balanced Strategies",
            description: "Moderate risk with potential for higher returns",
            strategies: vec![entry(
                "aave_eth_lending",
                "AAVE ETH Lending",
                "Supply ETH as collateral with conservative borrowing",
                level,
                "AAVE",
                "5-8%",
                true,
            )],
        },
        RiskLevel::High => StrategyCategory {
            risk_level: level,
            title: "Aggressive Strategies",
            description: "Higher risk strategies for maximum yield potential",
            strategies: vec![entry(
                "meme_lp",
                "Meme Coin Liquidity Provision",
                "Provide liquidity for meme tokens (Not yet supported)",
                level,
                "Various",
                "20-100%+",
                false,
            )],
        },
    }
}

/// Every category, lowest risk first
pub fn all() -> Vec<StrategyCategory> {
    [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High]
        .into_iter()
        .map(category)
        .collect()
}
