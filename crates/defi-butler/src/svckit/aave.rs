//! AAVE Lending
//!
//! Position listing through the UI pool data provider and ETH supply through
//! the WETH gateway. Every on-chain step goes through the injected wallet.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, U256};
use rust_decimal::Decimal;

use crate::error::{ButlerError, Result};
use crate::format::{fixed, from_units, to_units};
use crate::model::Position;
use crate::network::Network;
use crate::wallet::{AbiValue, ContractCall, TxRequest, WalletProvider, abi};

/// Grace period before re-reading positions after a supply
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(2000);

const ETH_DECIMALS: u8 = 18;

pub const MALFORMED_RESERVES: &str = "No AAVE positions found. The data format was not as expected.";
pub const NO_POSITIONS: &str = "No AAVE positions found.";
pub const NO_ACTIVE_POSITIONS: &str = "No active AAVE positions found. Your current status:\n\
- No supply balances\n\
- No borrow balances\n\
- No collateral enabled\n\
- No APY information available";
pub const SUPPLY_CANCELLED: &str = "I understand, sire. The transaction was cancelled.";
pub const SUPPLY_FAILED: &str = "I do apologize, sire, but I encountered an error while supplying ETH to AAVE. Please ensure you have enough ETH for gas fees and try again.";

/// One row of `getUserReservesData`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UserReserve {
    pub asset: Address,
    pub scaled_supply: U256,
    pub collateral_enabled: bool,
    pub scaled_debt: U256,
}

impl UserReserve {
    pub fn is_active(&self) -> bool {
        !self.scaled_supply.is_zero() || !self.scaled_debt.is_zero()
    }

    fn from_abi(value: &AbiValue) -> Result<Self> {
        match value.as_tuple()? {
            [asset, supply, collateral, debt] => Ok(Self {
                asset: asset.as_address()?,
                scaled_supply: supply.as_uint()?,
                collateral_enabled: collateral.as_bool()?,
                scaled_debt: debt.as_uint()?,
            }),
            other => Err(ButlerError::UnexpectedValue {
                expected: "4-field reserve tuple",
                found: format!("{}-field tuple", other.len()),
            }),
        }
    }
}

/// Decoded reserve data, or the fact that it could not be decoded
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReserveData {
    Reserves(Vec<UserReserve>),
    Malformed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetMetadata {
    pub symbol: String,
    pub decimals: u8,
}

/// An active reserve with its amounts in whole units
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReservePosition {
    pub reserve: UserReserve,
    pub symbol: String,
    pub supply: Decimal,
    pub debt: Decimal,
}

impl ReservePosition {
    fn render(&self, out: &mut String) {
        out.push_str(&format!("Asset: {}\n", self.symbol));
        if self.supply > Decimal::ZERO {
            out.push_str(&format!("Supply Balance: {}\n", fixed(self.supply, 4)));
        }
        if self.debt > Decimal::ZERO {
            out.push_str(&format!("Borrow Balance: {}\n", fixed(self.debt, 4)));
        }
        out.push_str(&format!(
            "Collateral Enabled: {}\nToken Address: {}\n\n",
            self.reserve.collateral_enabled, self.reserve.asset
        ));
    }

    /// Portfolio entries: one `supply` and/or one `borrow` position
    pub fn to_positions(&self) -> Vec<Position> {
        [("supply", self.supply), ("borrow", self.debt)]
            .into_iter()
            .filter(|(_, amount)| *amount > Decimal::ZERO)
            .map(|(kind, amount)| {
                Position::new(
                    "AAVE",
                    kind,
                    &self.symbol,
                    amount.round_dp_with_strategy(
                        6,
                        rust_decimal::RoundingStrategy::MidpointAwayFromZero,
                    ),
                )
                .with_detail("collateralEnabled", self.reserve.collateral_enabled)
                .with_detail("tokenAddress", self.reserve.asset.to_string())
            })
            .collect()
    }
}

/// AAVE operations for one wallet on one network
pub struct AaveLending {
    wallet: Arc<dyn WalletProvider>,
    network: Network,
    settle_delay: Duration,
}

impl AaveLending {
    pub fn new(wallet: Arc<dyn WalletProvider>, network: Network) -> Self {
        Self {
            wallet,
            network,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    #[must_use]
    pub const fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Read the user's reserves. Read failures are errors, shape problems are `Malformed`.
    pub async fn read_user_reserves(&self) -> Result<ReserveData> {
        let aave = self.network.aave();
        let call = ContractCall::new(
            aave.pool_data_provider,
            abi::GET_USER_RESERVES_DATA,
            vec![
                AbiValue::Address(aave.pool_addresses_provider),
                AbiValue::Address(self.wallet.address()),
            ],
        );
        let value = self.wallet.read_contract(&call).await?;

        let decoded = value
            .as_tuple()
            .and_then(|fields| {
                fields.first().ok_or_else(|| ButlerError::UnexpectedValue {
                    expected: "reserve list",
                    found: "empty tuple".into(),
                })
            })
            .and_then(AbiValue::as_array)
            .and_then(|rows| {
                rows.iter()
                    .map(UserReserve::from_abi)
                    .collect::<Result<Vec<_>>>()
            });

        match decoded {
            Ok(reserves) => Ok(ReserveData::Reserves(reserves)),
            Err(e) => {
                tracing::warn!(error = %e, "Unexpected getUserReservesData result");
                Ok(ReserveData::Malformed)
            }
        }
    }

    /// Symbol and decimals of an ERC-20
    pub async fn resolve_asset(&self, asset: Address) -> Result<AssetMetadata> {
        let symbol = self
            .wallet
            .read_contract(&ContractCall::new(asset, abi::SYMBOL, vec![]))
            .await?;
        let decimals = self
            .wallet
            .read_contract(&ContractCall::new(asset, abi::DECIMALS, vec![]))
            .await?;

        Ok(AssetMetadata {
            symbol: symbol.as_str()?.to_string(),
            decimals: decimals.as_u8()?,
        })
    }

    async fn resolve_position(&self, reserve: UserReserve) -> Result<ReservePosition> {
        let meta = self.resolve_asset(reserve.asset).await?;
        Ok(ReservePosition {
            reserve,
            supply: to_units(reserve.scaled_supply, meta.decimals)?,
            debt: to_units(reserve.scaled_debt, meta.decimals)?,
            symbol: meta.symbol,
        })
    }

    /// Active reserves with resolved metadata; assets that fail to resolve are skipped
    pub async fn active_positions(&self, reserves: &[UserReserve]) -> Vec<ReservePosition> {
        let mut positions = Vec::new();
        for reserve in reserves.iter().filter(|r| r.is_active()) {
            match self.resolve_position(*reserve).await {
                Ok(position) => positions.push(position),
                Err(e) => {
                    tracing::warn!(asset = %reserve.asset, error = %e, "Skipping AAVE asset");
                }
            }
        }
        positions
    }

    /// Human-readable listing of the user's AAVE positions
    pub async fn position_report(&self) -> Result<String> {
        let reserves = match self.read_user_reserves().await? {
            ReserveData::Malformed => return Ok(MALFORMED_RESERVES.to_string()),
            ReserveData::Reserves(reserves) if reserves.is_empty() => {
                return Ok(NO_POSITIONS.to_string());
            }
            ReserveData::Reserves(reserves) => reserves,
        };

        // Judged on raw balances; an active asset that fails to resolve still counts
        if !reserves.iter().any(UserReserve::is_active) {
            return Ok(NO_ACTIVE_POSITIONS.to_string());
        }

        let mut report = String::from("AAVE positions found:\n\n");
        for position in self.active_positions(&reserves).await {
            position.render(&mut report);
        }
        Ok(report)
    }

    /// Portfolio positions for the AAVE side of the wallet
    pub async fn portfolio_positions(&self) -> Result<Vec<Position>> {
        let reserves = match self.read_user_reserves().await? {
            ReserveData::Reserves(reserves) => reserves,
            ReserveData::Malformed => Vec::new(),
        };
        Ok(self
            .active_positions(&reserves)
            .await
            .iter()
            .flat_map(ReservePosition::to_positions)
            .collect())
    }

    /// Supply `amount` ETH through the WETH gateway and report the outcome to the user
    pub async fn supply_eth(&self, amount: Decimal) -> String {
        match self.try_supply_eth(amount).await {
            Ok(message) => message,
            Err(e) if e.is_user_rejection() => {
                tracing::info!("Supply cancelled by user");
                SUPPLY_CANCELLED.to_string()
            }
            Err(e) => {
                tracing::error!(error = %e, %amount, "Error supplying to AAVE");
                SUPPLY_FAILED.to_string()
            }
        }
    }

    async fn try_supply_eth(&self, amount: Decimal) -> Result<String> {
        let available = to_units(self.wallet.balance().await?, ETH_DECIMALS)?;
        if available < amount {
            return Ok(format!(
                "I apologize, sire, but you have insufficient ETH balance ({} ETH available) to supply {} ETH to AAVE.",
                fixed(available, 4),
                amount.normalize()
            ));
        }

        let aave = self.network.aave();
        let tx = TxRequest {
            to: aave.weth_gateway,
            value: Some(from_units(amount, ETH_DECIMALS)?),
            data: Some(abi::deposit_eth_calldata(aave.pool, self.wallet.address())),
        };

        let tx_hash = self.wallet.send_transaction(&tx).await?;
        tracing::info!(%tx_hash, %amount, "Supply transaction sent");

        match self.wallet.wait_for_receipt(&tx_hash).await? {
            None => return Err(ButlerError::MissingReceipt { tx_hash }),
            Some(receipt) if !receipt.succeeded() => {
                return Err(ButlerError::TransactionReverted { tx_hash });
            }
            Some(_) => {}
        }

        tokio::time::sleep(self.settle_delay).await;

        let positions = match self.position_report().await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(error = %e, "Could not refresh AAVE positions");
                format!("Error fetching AAVE data: {e}")
            }
        };

        Ok(format!(
            "Very good, sire. I have successfully supplied {} ETH to AAVE.\n\nYour updated positions:\n{positions}",
            fixed(amount, 4)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::{MockWallet, TxReceipt};
    use alloy_primitives::address;

    const ONE_ETH: u128 = 1_000_000_000_000_000_000;

    fn lending(wallet: &Arc<MockWallet>) -> AaveLending {
        let provider: Arc<dyn WalletProvider> = wallet.clone();
        AaveLending::new(provider, Network::BaseSepolia).with_settle_delay(Duration::ZERO)
    }

    fn weth() -> Address {
        Network::BaseSepolia.tokens().weth
    }

    fn with_weth_supply(supply: U256) -> MockWallet {
        MockWallet::builder()
            .balance(U256::from(ONE_ETH))
            .token(weth(), "WETH", 18, U256::ZERO)
            .user_reserves(
                Network::BaseSepolia,
                vec![(weth(), supply, true, U256::ZERO)],
            )
            .build()
    }

    #[tokio::test]
    async fn test_empty_reserve_list() {
        let wallet = Arc::new(MockWallet::demo(Network::BaseSepolia));
        let report = lending(&wallet).position_report().await.unwrap();
        assert_eq!(report, "No AAVE positions found.");
    }

    #[tokio::test]
    async fn test_all_zero_reserves() {
        let wallet = Arc::new(with_weth_supply(U256::ZERO));
        let report = lending(&wallet).position_report().await.unwrap();
        assert_eq!(report, NO_ACTIVE_POSITIONS);
        assert!(report.starts_with("No active AAVE positions found."));
    }

    #[tokio::test]
    async fn test_malformed_reserve_data() {
        let wallet = Arc::new(
            MockWallet::builder()
                .read(
                    Network::BaseSepolia.aave().pool_data_provider,
                    abi::GET_USER_RESERVES_DATA,
                    AbiValue::from(7u64),
                )
                .build(),
        );
        let report = lending(&wallet).position_report().await.unwrap();
        assert_eq!(report, MALFORMED_RESERVES);
    }

    #[tokio::test]
    async fn test_position_block_format() {
        let wallet = Arc::new(with_weth_supply(U256::from(ONE_ETH / 10)));
        let report = lending(&wallet).position_report().await.unwrap();

        assert_eq!(
            report,
            "AAVE positions found:\n\n\
             Asset: WETH\n\
             Supply Balance: 0.1000\n\
             Collateral Enabled: true\n\
             Token Address: 0x4200000000000000000000000000000000000006\n\n"
        );
    }

    #[tokio::test]
    async fn test_unresolvable_asset_is_skipped() {
        let unknown = address!("00000000000000000000000000000000000000cc");
        let wallet = Arc::new(
            MockWallet::builder()
                .token(weth(), "WETH", 18, U256::ZERO)
                .user_reserves(
                    Network::BaseSepolia,
                    vec![
                        (unknown, U256::from(5u64), false, U256::ZERO),
                        (weth(), U256::ZERO, false, U256::from(ONE_ETH * 2)),
                    ],
                )
                .build(),
        );

        let report = lending(&wallet).position_report().await.unwrap();

        assert!(report.starts_with("AAVE positions found:"));
        assert!(report.contains("Asset: WETH\nBorrow Balance: 2.0000\n"));
        assert!(!report.contains("Supply Balance"));
        assert!(!report.contains("0x00000000000000000000000000000000000000cc"));
    }

    #[tokio::test]
    async fn test_portfolio_positions_split_supply_and_borrow() {
        let wallet = Arc::new(
            MockWallet::builder()
                .token(weth(), "WETH", 18, U256::ZERO)
                .user_reserves(
                    Network::BaseSepolia,
                    vec![(weth(), U256::from(ONE_ETH), true, U256::from(ONE_ETH / 4))],
                )
                .build(),
        );

        let positions = lending(&wallet).portfolio_positions().await.unwrap();

        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].kind, "supply");
        assert_eq!(positions[0].amount, rust_decimal_macros::dec!(1));
        assert_eq!(positions[1].kind, "borrow");
        assert_eq!(positions[1].details["collateralEnabled"], true);
    }

    #[tokio::test]
    async fn test_shortfall_sends_nothing() {
        let wallet = Arc::new(with_weth_supply(U256::ZERO));

        let message = lending(&wallet)
            .supply_eth(rust_decimal_macros::dec!(2))
            .await;

        assert_eq!(
            message,
            "I apologize, sire, but you have insufficient ETH balance (1.0000 ETH available) to supply 2 ETH to AAVE."
        );
        assert!(wallet.sent_transactions().is_empty());
    }

    #[tokio::test]
    async fn test_successful_supply() {
        let wallet = Arc::new(with_weth_supply(U256::from(ONE_ETH / 10)));

        let message = lending(&wallet)
            .supply_eth(rust_decimal_macros::dec!(0.1))
            .await;

        assert!(message.starts_with(
            "Very good, sire. I have successfully supplied 0.1000 ETH to AAVE.\n\nYour updated positions:\nAAVE positions found:"
        ));
        assert!(message.contains("Supply Balance: 0.1000"));

        let sent = wallet.sent_transactions();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, Network::BaseSepolia.aave().weth_gateway);
        assert_eq!(sent[0].value, Some(U256::from(ONE_ETH / 10)));
        assert!(sent[0].data_hex().unwrap().starts_with("0x474cf53d"));
    }

    #[tokio::test]
    async fn test_reverted_and_missing_receipts_fail() {
        for receipt in [Some(TxReceipt { status: 0 }), None] {
            let wallet = Arc::new(
                MockWallet::builder()
                    .balance(U256::from(ONE_ETH))
                    .receipt(receipt)
                    .build(),
            );
            let message = lending(&wallet)
                .supply_eth(rust_decimal_macros::dec!(0.5))
                .await;
            assert_eq!(message, SUPPLY_FAILED);
        }
    }

    #[tokio::test]
    async fn test_user_rejection_cancels() {
        let wallet = Arc::new(
            MockWallet::builder()
                .balance(U256::from(ONE_ETH))
                .send_error("user rejected transaction")
                .build(),
        );
        let message = lending(&wallet)
            .supply_eth(rust_decimal_macros::dec!(0.5))
            .await;
        assert_eq!(message, SUPPLY_CANCELLED);
    }

    #[tokio::test]
    async fn test_refetch_error_is_inlined() {
        let wallet = Arc::new(
            MockWallet::builder()
                .balance(U256::from(ONE_ETH))
                .read_error(
                    Network::BaseSepolia.aave().pool_data_provider,
                    abi::GET_USER_RESERVES_DATA,
                    "execution reverted",
                )
                .build(),
        );
        let message = lending(&wallet)
            .supply_eth(rust_decimal_macros::dec!(0.5))
            .await;
        assert!(message.contains("Your updated positions:\nError fetching AAVE data: "));
        assert!(message.contains("execution reverted"));
    }
}
