//! Error Types for the DeFi Butler

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ButlerError>;

/// Failures reported by a wallet capability
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Wallet connection failed: {0}")]
    Connect(String),

    #[error("Balance read failed: {0}")]
    Balance(String),

    #[error("Contract read `{function}` failed: {reason}")]
    Read { function: String, reason: String },

    #[error("Transaction failed: {0}")]
    Transaction(String),

    #[error("Wallet export failed: {0}")]
    Export(String),

    #[error("Wallet store error: {0}")]
    Store(String),
}

#[derive(Error, Debug)]
pub enum ButlerError {
    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("Unexpected contract value: expected {expected}, got {found}")]
    UnexpectedValue { expected: &'static str, found: String },

    #[error("Amount out of range: {0}")]
    AmountOutOfRange(String),

    #[error("Transaction {tx_hash} failed on-chain")]
    TransactionReverted { tx_hash: String },

    #[error("No receipt for transaction {tx_hash}")]
    MissingReceipt { tx_hash: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ButlerError {
    /// Whether the wallet reported that the user declined to sign
    pub fn is_user_rejection(&self) -> bool {
        self.to_string().contains("user rejected")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_rejection_detection() {
        let rejected: ButlerError =
            WalletError::Transaction("user rejected the request".into()).into();
        let reverted = ButlerError::TransactionReverted {
            tx_hash: "0xabc".into(),
        };

        assert!(rejected.is_user_rejection());
        assert!(!reverted.is_user_rejection());
    }
}
