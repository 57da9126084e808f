//! Intent Router
//!
//! Ordered predicate table over the lower-cased message. Order matters: a
//! balance question that also mentions AAVE is still a balance question.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

static ETH_AMOUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+\.?[0-9]*)\s*eth").expect("eth amount pattern is a valid regex")
});

/// What the user is asking for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Direct wallet reads, bypassing the agent's own answer
    Balance,
    /// Supply `amount` ETH when present and positive, otherwise list positions
    Aave { amount: Option<Decimal> },
    /// Fixed scripted pitch
    StrategyRecommendation,
    /// Pass the agent's reply through
    General,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Route {
    Balance,
    Aave,
    StrategyRecommendation,
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

fn is_balance(text: &str) -> bool {
    contains_any(text, &["balance", "wallet state", "wallet balance"])
        && !contains_any(text, &["faucet", "supply"])
}

fn is_aave(text: &str) -> bool {
    text.contains("aave") || (text.contains("lend") && text.contains("eth"))
}

fn is_strategy_recommendation(text: &str) -> bool {
    text.contains("investment")
        && contains_any(text, &["strategy", "strategies"])
        && contains_any(text, &["recommend", "suggest"])
}

/// First match wins
const ROUTES: &[(Route, fn(&str) -> bool)] = &[
    (Route::Balance, is_balance),
    (Route::Aave, is_aave),
    (Route::StrategyRecommendation, is_strategy_recommendation),
];

/// Classify a raw user message
pub fn classify(message: &str) -> Intent {
    let text = message.to_lowercase();

    let route = ROUTES
        .iter()
        .find(|(_, matches)| matches(&text))
        .map(|(route, _)| *route);

    let intent = match route {
        Some(Route::Balance) => Intent::Balance,
        Some(Route::Aave) => Intent::Aave {
            amount: extract_eth_amount(message),
        },
        Some(Route::StrategyRecommendation) => Intent::StrategyRecommendation,
        None => Intent::General,
    };

    tracing::debug!(?intent, "Classified message");
    intent
}

/// Number directly followed by "eth", e.g. "supply 0.5 ETH"
pub fn extract_eth_amount(message: &str) -> Option<Decimal> {
    let caps = ETH_AMOUNT_PATTERN.captures(message)?;
    let digits = caps.get(1)?.as_str().trim_end_matches('.');
    Decimal::from_str(digits).ok().map(|d| d.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balance_wins_over_other_keywords() {
        assert_eq!(classify("What is my wallet balance?"), Intent::Balance);
        assert_eq!(
            classify("What is my wallet balance? Also recommend an investment strategy for aave"),
            Intent::Balance
        );
        assert_eq!(classify("Show my WALLET STATE"), Intent::Balance);
    }

    #[test]
    fn test_faucet_and_supply_exclude_balance() {
        assert_eq!(
            classify("request faucet funds to top up my balance"),
            Intent::General
        );
        assert_eq!(
            classify("supply 0.1 eth to aave from my balance"),
            Intent::Aave {
                amount: Some(dec!(0.1))
            }
        );
    }

    #[test]
    fn test_aave_position_query() {
        assert_eq!(
            classify("What are my AAVE positions?"),
            Intent::Aave { amount: None }
        );
    }

    #[test]
    fn test_lend_eth_without_aave() {
        assert_eq!(
            classify("I'd like to lend 2 ETH"),
            Intent::Aave {
                amount: Some(dec!(2))
            }
        );
    }

    #[test]
    fn test_strategy_recommendation() {
        assert_eq!(
            classify("What investment strategies do you recommend?"),
            Intent::StrategyRecommendation
        );
        assert_eq!(classify("Any investment strategy?"), Intent::General);
    }

    #[test]
    fn test_eth_amount_extraction() {
        assert_eq!(extract_eth_amount("supply 0.25eth please"), Some(dec!(0.25)));
        assert_eq!(extract_eth_amount("supply 3. ETH"), Some(dec!(3)));
        assert_eq!(extract_eth_amount("supply some eth"), None);
        assert_eq!(extract_eth_amount("step \u{663} eth, then 0.5 eth"), Some(dec!(0.5)));
    }
}
