use async_trait::async_trait;
use ethers::types::{Address, TxHash, U256};
use crate::models::{
    AddLiquidityRate, CollateralKind, MarketKey, RemoveLiquidityRate, ShareBalances,
};
use crate::utils::Result;

/// Core abstraction: the on-chain AMM surface
///
/// Rate methods are read-only static calls and never change chain state.
/// Write methods return as soon as the node accepts the transaction; use
/// `wait_for_confirmations` to learn its fate.
#[async_trait]
pub trait AmmGateway: Send + Sync {
    /// Collateral variant, fixed at construction
    fn collateral(&self) -> CollateralKind;

    /// Deterministic exchange address, deployed or not
    async fn calculate_amm_address(&self, key: &MarketKey) -> Result<Address>;

    /// Deployed exchange address, zero when none exists
    async fn exchanges(&self, key: &MarketKey) -> Result<Address>;

    async fn rate_add_amm_with_liquidity(
        &self,
        key: &MarketKey,
        cash: U256,
        ratio: U256,
        keep_yes: bool,
        recipient: Address,
    ) -> Result<AddLiquidityRate>;

    /// Seeds a deployed exchange that has no liquidity yet
    async fn rate_add_initial_liquidity(
        &self,
        key: &MarketKey,
        cash: U256,
        ratio: U256,
        keep_yes: bool,
        recipient: Address,
    ) -> Result<AddLiquidityRate>;

    async fn rate_add_liquidity(
        &self,
        amm: Address,
        cash: U256,
        recipient: Address,
    ) -> Result<AddLiquidityRate>;

    async fn rate_remove_liquidity(
        &self,
        amm: Address,
        lp_tokens: U256,
        min_sets_sold: U256,
    ) -> Result<RemoveLiquidityRate>;

    async fn rate_exit_position(
        &self,
        amm: Address,
        short_shares: U256,
        long_shares: U256,
    ) -> Result<U256>;

    /// ERC20 balance; exchanges are themselves LP tokens
    async fn balance_of(&self, token: Address, account: Address) -> Result<U256>;

    async fn total_supply(&self, token: Address) -> Result<U256>;

    async fn share_balances(&self, amm: Address, account: Address) -> Result<ShareBalances>;

    async fn add_amm(&self, key: &MarketKey) -> Result<TxHash>;

    async fn add_amm_with_liquidity(
        &self,
        key: &MarketKey,
        cash: U256,
        ratio: U256,
        keep_yes: bool,
        recipient: Address,
    ) -> Result<TxHash>;

    async fn add_initial_liquidity(
        &self,
        key: &MarketKey,
        cash: U256,
        ratio: U256,
        keep_yes: bool,
        recipient: Address,
    ) -> Result<TxHash>;

    async fn add_liquidity(&self, amm: Address, cash: U256, recipient: Address) -> Result<TxHash>;

    async fn remove_liquidity(
        &self,
        amm: Address,
        lp_tokens: U256,
        min_sets_sold: U256,
    ) -> Result<TxHash>;

    async fn swap(
        &self,
        amm: Address,
        input_shares: U256,
        input_long: bool,
        min_output_shares: U256,
    ) -> Result<TxHash>;

    async fn enter_position(
        &self,
        amm: Address,
        cash: U256,
        buy_long: bool,
        min_shares: U256,
    ) -> Result<TxHash>;

    async fn exit_position(
        &self,
        amm: Address,
        short_shares: U256,
        long_shares: U256,
        min_cash: U256,
    ) -> Result<TxHash>;

    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash>;

    /// Suspend until the transaction is mined; returns its confirmation count
    async fn wait_for_confirmations(&self, hash: TxHash) -> Result<u64>;
}
