//! Wallet Balances
//!
//! Native ETH plus the USDC and WETH token balances, read in that order. The
//! same snapshot feeds both the text report and the portfolio.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use rust_decimal::Decimal;

use super::aave::AaveLending;
use crate::error::Result;
use crate::format::{fixed, to_units};
use crate::model::{Portfolio, Position, RiskProfile};
use crate::network::Network;
use crate::wallet::{AbiValue, ContractCall, WalletProvider, abi};

const ETH_DECIMALS: u8 = 18;
const USDC_DECIMALS: u8 = 6;
const WETH_DECIMALS: u8 = 18;

/// Balances in whole units
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WalletBalances {
    pub eth: Decimal,
    pub usdc: Decimal,
    pub weth: Decimal,
}

impl WalletBalances {
    /// Three-line balance report, each figure to 6 places
    pub fn report(&self) -> String {
        format!(
            "Very good, sire. Here are your current balances:\n\
             - ETH: {} ETH\n\
             - USDC: {} USDC\n\
             - WETH: {} WETH",
            fixed(self.eth, 6),
            fixed(self.usdc, 6),
            fixed(self.weth, 6)
        )
    }

    /// Wallet holdings as portfolio positions
    pub fn holdings(&self) -> Vec<Position> {
        vec![
            Position::holding("ETH", self.eth),
            Position::holding("USDC", self.usdc),
            Position::holding("WETH", self.weth),
        ]
    }
}

pub struct BalanceReader {
    wallet: Arc<dyn WalletProvider>,
    network: Network,
}

impl BalanceReader {
    pub fn new(wallet: Arc<dyn WalletProvider>, network: Network) -> Self {
        Self { wallet, network }
    }

    /// Read all three balances; the first failure aborts the snapshot
    pub async fn read(&self) -> Result<WalletBalances> {
        let eth = self.wallet.balance().await?;
        let tokens = self.network.tokens();
        let usdc = self.token_balance(tokens.usdc).await?;
        let weth = self.token_balance(tokens.weth).await?;

        tracing::debug!(%eth, %usdc, %weth, "Read wallet balances");

        Ok(WalletBalances {
            eth: to_units(eth, ETH_DECIMALS)?,
            usdc: to_units(usdc, USDC_DECIMALS)?,
            weth: to_units(weth, WETH_DECIMALS)?,
        })
    }

    async fn token_balance(&self, token: Address) -> Result<U256> {
        let call = ContractCall::new(
            token,
            abi::BALANCE_OF,
            vec![AbiValue::Address(self.wallet.address())],
        );
        self.wallet.read_contract(&call).await?.as_uint()
    }
}

/// Holdings plus AAVE positions. A failed AAVE read leaves holdings only.
pub async fn assemble_portfolio(
    balances: &WalletBalances,
    aave: &AaveLending,
    risk_profile: RiskProfile,
) -> Portfolio {
    let mut positions = balances.holdings();

    match aave.portfolio_positions().await {
        Ok(lending) => positions.extend(lending),
        Err(e) => tracing::warn!(error = %e, "AAVE positions unavailable for portfolio"),
    }

    Portfolio::new(risk_profile, positions)
}
