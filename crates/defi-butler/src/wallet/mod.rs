//! Wallet Capability
//!
//! The butler never signs or submits anything itself. Everything on-chain goes
//! through a [`WalletProvider`] supplied from outside (an SDK-backed wallet in
//! production, [`MockWallet`] in tests and demos).

pub mod abi;
mod mock;
mod store;

pub use mock::{DEMO_CANNOT_SIGN, DemoWalletConnector, MockWallet, MockWalletBuilder};
pub use store::{FileWalletStore, MemoryWalletStore, WalletExportStore, BROWSER_STORAGE_KEY};

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ButlerError, Result, WalletError};

/// Decoded contract return value
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum AbiValue {
    Uint(U256),
    Bool(bool),
    Address(Address),
    String(String),
    Tuple(Vec<AbiValue>),
    Array(Vec<AbiValue>),
}

impl AbiValue {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Uint(_) => "uint",
            Self::Bool(_) => "bool",
            Self::Address(_) => "address",
            Self::String(_) => "string",
            Self::Tuple(_) => "tuple",
            Self::Array(_) => "array",
        }
    }

    fn unexpected(&self, expected: &'static str) -> ButlerError {
        ButlerError::UnexpectedValue {
            expected,
            found: self.kind().to_string(),
        }
    }

    pub fn as_uint(&self) -> Result<U256> {
        match self {
            Self::Uint(v) => Ok(*v),
            other => Err(other.unexpected("uint")),
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Self::Bool(v) => Ok(*v),
            other => Err(other.unexpected("bool")),
        }
    }

    pub fn as_address(&self) -> Result<Address> {
        match self {
            Self::Address(v) => Ok(*v),
            other => Err(other.unexpected("address")),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            Self::String(v) => Ok(v),
            other => Err(other.unexpected("string")),
        }
    }

    pub fn as_tuple(&self) -> Result<&[AbiValue]> {
        match self {
            Self::Tuple(v) => Ok(v),
            other => Err(other.unexpected("tuple")),
        }
    }

    pub fn as_array(&self) -> Result<&[AbiValue]> {
        match self {
            Self::Array(v) => Ok(v),
            other => Err(other.unexpected("array")),
        }
    }

    /// `uint8` returns such as `decimals()`
    pub fn as_u8(&self) -> Result<u8> {
        let v = self.as_uint()?;
        u8::try_from(v).map_err(|_| ButlerError::UnexpectedValue {
            expected: "uint8",
            found: v.to_string(),
        })
    }
}

impl From<U256> for AbiValue {
    fn from(v: U256) -> Self {
        Self::Uint(v)
    }
}

impl From<u64> for AbiValue {
    fn from(v: u64) -> Self {
        Self::Uint(U256::from(v))
    }
}

impl From<bool> for AbiValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Address> for AbiValue {
    fn from(v: Address) -> Self {
        Self::Address(v)
    }
}

impl From<&str> for AbiValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

/// A read-only contract call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractCall {
    pub address: Address,
    /// Human-readable ABI fragment, e.g. `function decimals() view returns (uint8)`
    pub signature: &'static str,
    pub function: &'static str,
    pub args: Vec<AbiValue>,
}

impl ContractCall {
    pub fn new(address: Address, signature: &'static str, args: Vec<AbiValue>) -> Self {
        Self {
            address,
            signature,
            function: abi::function_name(signature),
            args,
        }
    }
}

/// Outgoing transaction
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TxRequest {
    pub to: Address,
    pub value: Option<U256>,
    pub data: Option<Vec<u8>>,
}

impl TxRequest {
    /// `0x`-prefixed calldata, as wallet SDKs expect it
    pub fn data_hex(&self) -> Option<String> {
        self.data.as_ref().map(|d| format!("0x{}", hex::encode(d)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// 1 = success, 0 = reverted
    pub status: u64,
}

impl TxReceipt {
    pub const fn succeeded(&self) -> bool {
        self.status != 0
    }
}

/// Wallet operations consumed by the butler
#[async_trait]
pub trait WalletProvider: Send + Sync {
    fn address(&self) -> Address;

    fn network_id(&self) -> &str;

    /// Native balance in wei
    async fn balance(&self) -> std::result::Result<U256, WalletError>;

    async fn read_contract(&self, call: &ContractCall) -> std::result::Result<AbiValue, WalletError>;

    /// Submit a transaction and return its hash
    async fn send_transaction(&self, tx: &TxRequest) -> std::result::Result<String, WalletError>;

    /// `None` when the network never produced a receipt
    async fn wait_for_receipt(&self, tx_hash: &str)
    -> std::result::Result<Option<TxReceipt>, WalletError>;

    /// Opaque credential blob to persist between runs
    async fn export(&self) -> std::result::Result<String, WalletError>;
}

/// Entry point that turns persisted wallet material into a live wallet handle
#[async_trait]
pub trait WalletConnector: Send + Sync {
    async fn connect(
        &self,
        export: Option<String>,
        network_id: &str,
    ) -> std::result::Result<Arc<dyn WalletProvider>, WalletError>;
}
