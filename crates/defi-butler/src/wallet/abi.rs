//! ABI fragments and calldata encoding for the handful of calls the butler makes.

use alloy_primitives::{Address, keccak256};

pub const BALANCE_OF: &str = "function balanceOf(address account) view returns (uint256)";
pub const SYMBOL: &str = "function symbol() view returns (string)";
pub const DECIMALS: &str = "function decimals() view returns (uint8)";

/// AAVE UI pool data provider: `(UserReserveData[], uint8 userEmodeCategoryId)`
pub const GET_USER_RESERVES_DATA: &str = "function getUserReservesData(address provider, address user) view returns ((address underlyingAsset, uint256 scaledATokenBalance, bool usageAsCollateralEnabledOnUser, uint256 scaledVariableDebt)[], uint8)";

/// WETH gateway entry point, payable
pub const DEPOSIT_ETH: &str = "depositETH(address,address,uint16)";

/// Function name of a human-readable fragment (`function foo(...)` → `foo`)
pub fn function_name(signature: &'static str) -> &'static str {
    let body = signature.strip_prefix("function ").unwrap_or(signature);
    body.split('(').next().unwrap_or(body).trim()
}

/// First four bytes of the keccak hash of a canonical signature
pub fn selector(canonical: &str) -> [u8; 4] {
    let hash = keccak256(canonical.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Calldata for `depositETH(pool, on_behalf_of, 0)`
pub fn deposit_eth_calldata(pool: Address, on_behalf_of: Address) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + 32 * 3);
    data.extend_from_slice(&selector(DEPOSIT_ETH));
    data.extend_from_slice(pool.into_word().as_slice());
    data.extend_from_slice(on_behalf_of.into_word().as_slice());
    // referral code
    data.extend_from_slice(&[0u8; 32]);
    data
}
