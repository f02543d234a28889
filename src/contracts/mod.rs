//! Contract interfaces for the AMM factory, its exchanges and ERC20 tokens
//!
//! The factory deploys exchanges at deterministic addresses. A lookup for an
//! exchange that was never deployed returns the zero address.
pub mod erc20;
pub mod amm_factory;
pub mod amm_exchange;
pub use erc20::IERC20;
pub use amm_factory::IAMMFactory;
pub use amm_exchange::IAMMExchange;
use ethers::types::Address;

pub mod addresses {
    use super::Address;

    pub const NULL_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

    /// Unset mapping entries come back as the zero address
    pub fn is_null(address: Address) -> bool {
        address == Address::zero()
    }
}
