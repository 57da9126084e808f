//! Network Address Book
//!
//! AAVE and token addresses for the two Base networks the butler knows about.

use alloy_primitives::{Address, address};
use serde::{Deserialize, Serialize};

/// Network id that selects Base mainnet; every other id falls back to the testnet
pub const BASE_MAINNET_ID: &str = "base-mainnet";
pub const BASE_SEPOLIA_ID: &str = "base-sepolia";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    BaseSepolia,
    BaseMainnet,
}

/// Contracts used on a network
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AaveContracts {
    pub pool: Address,
    /// UI pool data provider, source of `getUserReservesData`
    pub pool_data_provider: Address,
    pub pool_addresses_provider: Address,
    pub weth_gateway: Address,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenAddresses {
    pub usdc: Address,
    pub weth: Address,
}

impl Network {
    pub fn from_id(network_id: &str) -> Self {
        if network_id == BASE_MAINNET_ID {
            Self::BaseMainnet
        } else {
            Self::BaseSepolia
        }
    }

    pub const fn id(self) -> &'static str {
        match self {
            Self::BaseSepolia => BASE_SEPOLIA_ID,
            Self::BaseMainnet => BASE_MAINNET_ID,
        }
    }

    pub const fn aave(self) -> AaveContracts {
        match self {
            Self::BaseSepolia => AaveContracts {
                pool: address!("bE781D7Bdf469f3d94a62Cdcc407aCe106AEcA74"),
                pool_data_provider: address!("699784A7bbBD29021927B57059c932B10FEb9Bc3"),
                pool_addresses_provider: address!("150E9a8b83b731B9218a5633F1E804BC82508A46"),
                weth_gateway: address!("d5DDE725b0A2dE43fBDb4E488A7fdA389210d461"),
            },
            Self::BaseMainnet => AaveContracts {
                pool: address!("A238Dd80C259a72e81d7e4664a9801593F98d1c5"),
                pool_data_provider: address!("68100bD5345eA474D93577127C11F39FF8463e93"),
                pool_addresses_provider: address!("e20fCBdBfFC4Dd138cE8b2E6FBb6CB49777ad64D"),
                weth_gateway: address!("d5DDE725b0A2dE43fBDb4E488A7fdA389210d461"),
            },
        }
    }

    pub const fn tokens(self) -> TokenAddresses {
        match self {
            Self::BaseSepolia => TokenAddresses {
                usdc: address!("036CbD53842c5426634e7929541eC2318f3dCF7e"),
                weth: address!("4200000000000000000000000000000000000006"),
            },
            Self::BaseMainnet => TokenAddresses {
                usdc: address!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"),
                weth: address!("4200000000000000000000000000000000000006"),
            },
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_ids_fall_back_to_testnet() {
        assert_eq!(Network::from_id("base-mainnet"), Network::BaseMainnet);
        assert_eq!(Network::from_id("base-sepolia"), Network::BaseSepolia);
        assert_eq!(Network::from_id("ethereum"), Network::BaseSepolia);
    }

    #[test]
    fn test_networks_share_gateway_and_weth() {
        let test = Network::BaseSepolia;
        let main = Network::BaseMainnet;

        assert_eq!(test.aave().weth_gateway, main.aave().weth_gateway);
        assert_eq!(test.tokens().weth, main.tokens().weth);
        assert_ne!(test.aave().pool, main.aave().pool);
        assert_ne!(test.tokens().usdc, main.tokens().usdc);
    }
}
