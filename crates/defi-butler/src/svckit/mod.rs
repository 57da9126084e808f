//! Service Kit
//!
//! On-chain services built on the wallet capability: balance reads, portfolio
//! assembly and AAVE lending.

pub mod aave;
pub mod balances;

pub use aave::{AaveLending, ReserveData, ReservePosition, UserReserve};
pub use balances::{BalanceReader, WalletBalances, assemble_portfolio};
