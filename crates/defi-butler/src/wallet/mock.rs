//! Mock Wallet
//!
//! Scripted wallet for tests and demos. Balances and contract reads are fixed
//! up front; every read and transaction is logged so tests can assert on them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use alloy_primitives::{Address, U256, address};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{AbiValue, ContractCall, TxReceipt, TxRequest, WalletConnector, WalletProvider, abi};
use crate::error::WalletError;
use crate::network::Network;

const DEMO_ADDRESS: Address = address!("00000000000000000000000000000000a11f7ed0");

/// Send failure reported by the demo wallet, which holds no signing key
pub const DEMO_CANNOT_SIGN: &str = "demo wallet cannot sign";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Persisted form of a mock wallet
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MockExport {
    address: Address,
    network_id: String,
}

pub struct MockWallet {
    address: Address,
    network_id: String,
    balance: Result<U256, String>,
    reads: HashMap<(Address, &'static str), Result<AbiValue, String>>,
    send_result: Result<String, String>,
    receipt: Option<TxReceipt>,
    read_log: Mutex<Vec<ContractCall>>,
    sent: Mutex<Vec<TxRequest>>,
}

impl MockWallet {
    pub fn builder() -> MockWalletBuilder {
        MockWalletBuilder::default()
    }

    /// Read-only wallet seeded with 1 ETH, 8 USDC, 0.5 WETH and no AAVE positions.
    /// Every send is refused with [`DEMO_CANNOT_SIGN`].
    pub fn demo(network: Network) -> Self {
        Self::builder()
            .network(network)
            .balance(U256::from(1_000_000_000_000_000_000u128))
            .token(network.tokens().usdc, "USDC", 6, U256::from(8_000_000u64))
            .token(
                network.tokens().weth,
                "WETH",
                18,
                U256::from(500_000_000_000_000_000u128),
            )
            .user_reserves(network, Vec::new())
            .send_error(DEMO_CANNOT_SIGN)
            .build()
    }

    /// Contract reads issued so far
    pub fn reads(&self) -> Vec<ContractCall> {
        lock(&self.read_log).clone()
    }

    /// Transactions submitted so far
    pub fn sent_transactions(&self) -> Vec<TxRequest> {
        lock(&self.sent).clone()
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    fn address(&self) -> Address {
        self.address
    }

    fn network_id(&self) -> &str {
        &self.network_id
    }

    async fn balance(&self) -> Result<U256, WalletError> {
        self.balance.clone().map_err(WalletError::Balance)
    }

    async fn read_contract(&self, call: &ContractCall) -> Result<AbiValue, WalletError> {
        lock(&self.read_log).push(call.clone());

        let reason = |reason: String| WalletError::Read {
            function: call.function.to_string(),
            reason,
        };
        match self.reads.get(&(call.address, call.function)) {
            Some(result) => result.clone().map_err(reason),
            None => Err(reason(format!("no contract at {}", call.address))),
        }
    }

    async fn send_transaction(&self, tx: &TxRequest) -> Result<String, WalletError> {
        lock(&self.sent).push(tx.clone());
        self.send_result.clone().map_err(WalletError::Transaction)
    }

    async fn wait_for_receipt(&self, _tx_hash: &str) -> Result<Option<TxReceipt>, WalletError> {
        Ok(self.receipt)
    }

    async fn export(&self) -> Result<String, WalletError> {
        serde_json::to_string(&MockExport {
            address: self.address,
            network_id: self.network_id.clone(),
        })
        .map_err(|e| WalletError::Export(e.to_string()))
    }
}

/// Builder for [`MockWallet`]
pub struct MockWalletBuilder {
    address: Address,
    network_id: String,
    balance: Result<U256, String>,
    reads: HashMap<(Address, &'static str), Result<AbiValue, String>>,
    send_result: Result<String, String>,
    receipt: Option<TxReceipt>,
}

impl Default for MockWalletBuilder {
    fn default() -> Self {
        Self {
            address: DEMO_ADDRESS,
            network_id: Network::BaseSepolia.id().to_string(),
            balance: Ok(U256::ZERO),
            reads: HashMap::new(),
            send_result: Ok(format!("0x{}", "ab".repeat(32))),
            receipt: Some(TxReceipt { status: 1 }),
        }
    }
}

impl MockWalletBuilder {
    pub const fn address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    pub fn network(mut self, network: Network) -> Self {
        self.network_id = network.id().to_string();
        self
    }

    pub fn balance(mut self, wei: U256) -> Self {
        self.balance = Ok(wei);
        self
    }

    pub fn balance_error(mut self, reason: &str) -> Self {
        self.balance = Err(reason.to_string());
        self
    }

    /// Script the result of `function` on `contract`
    pub fn read(mut self, contract: Address, signature: &'static str, value: AbiValue) -> Self {
        self.reads
            .insert((contract, abi::function_name(signature)), Ok(value));
        self
    }

    pub fn read_error(mut self, contract: Address, signature: &'static str, reason: &str) -> Self {
        self.reads.insert(
            (contract, abi::function_name(signature)),
            Err(reason.to_string()),
        );
        self
    }

    /// ERC-20 metadata plus the wallet's balance of it
    pub fn token(self, contract: Address, symbol: &str, decimals: u64, balance: U256) -> Self {
        self.read(contract, abi::SYMBOL, AbiValue::from(symbol))
            .read(contract, abi::DECIMALS, AbiValue::from(decimals))
            .read(contract, abi::BALANCE_OF, AbiValue::Uint(balance))
    }

    /// `getUserReservesData` result from `(asset, scaled supply, collateral, scaled debt)` rows
    pub fn user_reserves(self, network: Network, rows: Vec<(Address, U256, bool, U256)>) -> Self {
        let reserves = rows
            .into_iter()
            .map(|(asset, supply, collateral, debt)| {
                AbiValue::Tuple(vec![
                    AbiValue::Address(asset),
                    AbiValue::Uint(supply),
                    AbiValue::Bool(collateral),
                    AbiValue::Uint(debt),
                ])
            })
            .collect();

        self.read(
            network.aave().pool_data_provider,
            abi::GET_USER_RESERVES_DATA,
            AbiValue::Tuple(vec![AbiValue::Array(reserves), AbiValue::from(0u64)]),
        )
    }

    pub fn send_error(mut self, reason: &str) -> Self {
        self.send_result = Err(reason.to_string());
        self
    }

    pub const fn receipt(mut self, receipt: Option<TxReceipt>) -> Self {
        self.receipt = receipt;
        self
    }

    pub fn build(self) -> MockWallet {
        MockWallet {
            address: self.address,
            network_id: self.network_id,
            balance: self.balance,
            reads: self.reads,
            send_result: self.send_result,
            receipt: self.receipt,
            read_log: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
        }
    }
}

/// Connector that hands out demo-seeded [`MockWallet`]s, keeping the address across exports
#[derive(Clone, Copy, Debug, Default)]
pub struct DemoWalletConnector;

#[async_trait]
impl WalletConnector for DemoWalletConnector {
    async fn connect(
        &self,
        export: Option<String>,
        network_id: &str,
    ) -> Result<Arc<dyn WalletProvider>, WalletError> {
        let mut wallet = MockWallet::demo(Network::from_id(network_id));

        if let Some(blob) = export {
            let restored: MockExport = serde_json::from_str(&blob)
                .map_err(|e| WalletError::Connect(format!("unreadable wallet export: {e}")))?;
            tracing::info!(address = %restored.address, "Restoring wallet from export");
            wallet.address = restored.address;
        }

        Ok(Arc::new(wallet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_are_logged() {
        let network = Network::BaseSepolia;
        let wallet = MockWallet::demo(network);

        let call = ContractCall::new(
            network.tokens().usdc,
            abi::BALANCE_OF,
            vec![AbiValue::Address(wallet.address())],
        );
        let value = wallet.read_contract(&call).await.unwrap();

        assert_eq!(value, AbiValue::Uint(U256::from(8_000_000u64)));
        assert_eq!(wallet.reads().len(), 1);
        assert!(wallet.sent_transactions().is_empty());
    }

    #[tokio::test]
    async fn test_demo_wallet_refuses_to_send() {
        let wallet = MockWallet::demo(Network::BaseSepolia);
        let tx = TxRequest {
            to: Network::BaseSepolia.aave().weth_gateway,
            value: Some(U256::from(1u64)),
            ..TxRequest::default()
        };

        let err = wallet.send_transaction(&tx).await.unwrap_err();

        assert!(matches!(err, WalletError::Transaction(ref reason) if reason == DEMO_CANNOT_SIGN));
        assert_eq!(wallet.sent_transactions().len(), 1);
    }

    #[test]
    fn test_builder_balance_overrides_error() {
        let wallet = MockWallet::builder()
            .balance_error("rpc down")
            .balance(U256::from(7u64))
            .build();
        assert_eq!(wallet.balance, Ok(U256::from(7u64)));
    }

    #[tokio::test]
    async fn test_unknown_contract_fails_read() {
        let wallet = MockWallet::builder().build();
        let call = ContractCall::new(Address::ZERO, abi::SYMBOL, vec![]);

        let err = wallet.read_contract(&call).await.unwrap_err();
        assert!(err.to_string().contains("symbol"));
    }

    #[tokio::test]
    async fn test_connector_restores_exported_address() {
        let custom = address!("00000000000000000000000000000000000000bb");
        let original = MockWallet::builder().address(custom).build();
        let blob = original.export().await.unwrap();

        let restored = DemoWalletConnector
            .connect(Some(blob), "base-sepolia")
            .await
            .unwrap();

        assert_eq!(restored.address(), custom);
        assert_eq!(
            restored.balance().await.unwrap(),
            U256::from(1_000_000_000_000_000_000u128)
        );
    }

    #[tokio::test]
    async fn test_connector_rejects_garbage_export() {
        let result = DemoWalletConnector
            .connect(Some("not json".into()), "base-sepolia")
            .await;
        assert!(matches!(result, Err(WalletError::Connect(_))));
    }
}
