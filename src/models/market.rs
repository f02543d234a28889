use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};

/// Identifies one AMM: the factory derives the exchange address from all three fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketKey {
    pub market: Address,
    pub para_share_token: Address,
    pub fee: U256,
}

impl MarketKey {
    pub fn new(market: Address, para_share_token: Address, fee: U256) -> Self {
        Self {
            market,
            para_share_token,
            fee,
        }
    }
}

/// Collateral backing an exchange, fixed when the gateway is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollateralKind {
    /// ERC20 collateral pulled through an allowance
    #[default]
    Erc20,
    /// Native asset sent as `msg.value` on payable calls
    Native,
}

impl CollateralKind {
    pub fn for_native(&self) -> bool {
        matches!(self, CollateralKind::Native)
    }
}

/// Decimal places used to convert between display and base units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDecimals {
    pub cash: u32,
    pub shares: u32,
    pub lp_tokens: u32,
    /// Precision that breakdown values are truncated to
    pub display: u32,
}

impl Default for TokenDecimals {
    fn default() -> Self {
        Self {
            cash: 18,
            shares: 18,
            lp_tokens: 18,
            display: 4,
        }
    }
}
