//! `AmmGateway` over ethers contract bindings
//!
//! Works with any middleware: a bare provider is enough for quotes, writes
//! need a signing middleware supplied by the caller.

use std::sync::Arc;
use async_trait::async_trait;
use ethers::abi::Detokenize;
use ethers::contract::ContractCall;
use ethers::providers::{Middleware, PendingTransaction};
use ethers::types::{Address, TxHash, U256, U64};
use crate::contracts::{IAMMExchange, IAMMFactory, IERC20};
use crate::core::AmmGateway;
use crate::models::{
    AddLiquidityRate, CollateralKind, MarketKey, RemoveLiquidityRate, ShareBalances,
};
use crate::utils::{AmmError, Result};

pub struct EthersGateway<M> {
    client: Arc<M>,
    factory: IAMMFactory<M>,
    collateral: CollateralKind,
    /// Blocks to wait for before a receipt counts
    confirmations: usize,
}

impl<M: Middleware + 'static> EthersGateway<M> {
    pub fn new(client: Arc<M>, factory: Address, collateral: CollateralKind) -> Self {
        Self {
            factory: IAMMFactory::new(factory, client.clone()),
            client,
            collateral,
            confirmations: 1,
        }
    }

    pub fn with_confirmations(mut self, confirmations: usize) -> Self {
        self.confirmations = confirmations.max(1);
        self
    }

    fn exchange(&self, amm: Address) -> IAMMExchange<M> {
        IAMMExchange::new(amm, self.client.clone())
    }

    fn token(&self, token: Address) -> IERC20<M> {
        IERC20::new(token, self.client.clone())
    }

    /// Native collateral travels as `msg.value`
    fn with_cash<D: Detokenize>(&self, call: ContractCall<M, D>, cash: U256) -> ContractCall<M, D> {
        if self.collateral.for_native() {
            call.value(cash)
        } else {
            call
        }
    }

    async fn send<D: Detokenize + Send + Sync>(
        &self,
        call: ContractCall<M, D>,
        label: &str,
    ) -> Result<TxHash> {
        let pending = call
            .send()
            .await
            .map_err(|e| AmmError::TransactionError(format!("{} rejected: {}", label, e)))?;
        let hash = pending.tx_hash();
        tracing::info!("📨 {} sent: {:?}", label, hash);
        Ok(hash)
    }
}

fn call_failed(label: &str, e: impl std::fmt::Display) -> AmmError {
    AmmError::ContractCallError(format!("{} failed: {}", label, e))
}

fn add_rate((lp_tokens, short_shares, long_shares): (U256, U256, U256)) -> AddLiquidityRate {
    AddLiquidityRate {
        lp_tokens,
        short_shares,
        long_shares,
    }
}

#[async_trait]
impl<M: Middleware + 'static> AmmGateway for EthersGateway<M> {
    fn collateral(&self) -> CollateralKind {
        self.collateral
    }

    async fn calculate_amm_address(&self, key: &MarketKey) -> Result<Address> {
        self.factory
            .calculate_amm_address(key.market, key.para_share_token, key.fee)
            .call()
            .await
            .map_err(|e| call_failed("calculateAMMAddress", e))
    }

    async fn exchanges(&self, key: &MarketKey) -> Result<Address> {
        self.factory
            .exchanges(key.market, key.para_share_token, key.fee)
            .call()
            .await
            .map_err(|e| call_failed("exchanges", e))
    }

    async fn rate_add_amm_with_liquidity(
        &self,
        key: &MarketKey,
        cash: U256,
        ratio: U256,
        keep_yes: bool,
        recipient: Address,
    ) -> Result<AddLiquidityRate> {
        let call = self.factory
            .add_amm_with_liquidity(key.market, key.para_share_token, key.fee, cash, ratio, keep_yes, recipient)
            .from(recipient);
        let (_amm, lp_tokens, short_shares, long_shares) = self
            .with_cash(call, cash)
            .call()
            .await
            .map_err(|e| call_failed("addAMMWithLiquidity (static)", e))?;

        Ok(AddLiquidityRate {
            lp_tokens,
            short_shares,
            long_shares,
        })
    }

    async fn rate_add_initial_liquidity(
        &self,
        key: &MarketKey,
        cash: U256,
        ratio: U256,
        keep_yes: bool,
        recipient: Address,
    ) -> Result<AddLiquidityRate> {
        let call = self.factory
            .add_initial_liquidity(key.market, key.para_share_token, key.fee, cash, ratio, keep_yes, recipient)
            .from(recipient);
        self.with_cash(call, cash)
            .call()
            .await
            .map(add_rate)
            .map_err(|e| call_failed("addInitialLiquidity (static)", e))
    }

    async fn rate_add_liquidity(
        &self,
        amm: Address,
        cash: U256,
        recipient: Address,
    ) -> Result<AddLiquidityRate> {
        let call = self.exchange(amm)
            .add_liquidity(cash, recipient)
            .from(recipient);
        self.with_cash(call, cash)
            .call()
            .await
            .map(add_rate)
            .map_err(|e| call_failed("addLiquidity (static)", e))
    }

    async fn rate_remove_liquidity(
        &self,
        amm: Address,
        lp_tokens: U256,
        min_sets_sold: U256,
    ) -> Result<RemoveLiquidityRate> {
        let (short, long, cash, sets) = self.exchange(amm)
            .rate_remove_liquidity(lp_tokens, min_sets_sold)
            .call()
            .await
            .map_err(|e| call_failed("rateRemoveLiquidity", e))?;

        Ok(RemoveLiquidityRate { short, long, cash, sets })
    }

    async fn rate_exit_position(
        &self,
        amm: Address,
        short_shares: U256,
        long_shares: U256,
    ) -> Result<U256> {
        self.exchange(amm)
            .rate_exit_position(short_shares, long_shares)
            .call()
            .await
            .map_err(|e| call_failed("rateExitPosition", e))
    }

    async fn balance_of(&self, token: Address, account: Address) -> Result<U256> {
        self.token(token)
            .balance_of(account)
            .call()
            .await
            .map_err(|e| call_failed("balanceOf", e))
    }

    async fn total_supply(&self, token: Address) -> Result<U256> {
        self.token(token)
            .total_supply()
            .call()
            .await
            .map_err(|e| call_failed("totalSupply", e))
    }

    async fn share_balances(&self, amm: Address, account: Address) -> Result<ShareBalances> {
        let (invalid, no, yes) = self.exchange(amm)
            .share_balances(account)
            .call()
            .await
            .map_err(|e| call_failed("shareBalances", e))?;

        Ok(ShareBalances { invalid, no, yes })
    }

    async fn add_amm(&self, key: &MarketKey) -> Result<TxHash> {
        let call = self.factory.add_amm(key.market, key.para_share_token, key.fee);
        self.send(call, "addAMM").await
    }

    async fn add_amm_with_liquidity(
        &self,
        key: &MarketKey,
        cash: U256,
        ratio: U256,
        keep_yes: bool,
        recipient: Address,
    ) -> Result<TxHash> {
        let call = self.factory.add_amm_with_liquidity(
            key.market, key.para_share_token, key.fee, cash, ratio, keep_yes, recipient,
        );
        self.send(self.with_cash(call, cash), "addAMMWithLiquidity").await
    }

    async fn add_initial_liquidity(
        &self,
        key: &MarketKey,
        cash: U256,
        ratio: U256,
        keep_yes: bool,
        recipient: Address,
    ) -> Result<TxHash> {
        let call = self.factory.add_initial_liquidity(
            key.market, key.para_share_token, key.fee, cash, ratio, keep_yes, recipient,
        );
        self.send(self.with_cash(call, cash), "addInitialLiquidity").await
    }

    async fn add_liquidity(&self, amm: Address, cash: U256, recipient: Address) -> Result<TxHash> {
        let call = self.exchange(amm).add_liquidity(cash, recipient);
        self.send(self.with_cash(call, cash), "addLiquidity").await
    }

    async fn remove_liquidity(
        &self,
        amm: Address,
        lp_tokens: U256,
        min_sets_sold: U256,
    ) -> Result<TxHash> {
        let call = self.exchange(amm).remove_liquidity(lp_tokens, min_sets_sold);
        self.send(call, "removeLiquidity").await
    }

    async fn swap(
        &self,
        amm: Address,
        input_shares: U256,
        input_long: bool,
        min_output_shares: U256,
    ) -> Result<TxHash> {
        let call = self.exchange(amm).swap(input_shares, input_long, min_output_shares);
        self.send(call, "swap").await
    }

    async fn enter_position(
        &self,
        amm: Address,
        cash: U256,
        buy_long: bool,
        min_shares: U256,
    ) -> Result<TxHash> {
        let call = self.exchange(amm).enter_position(cash, buy_long, min_shares);
        self.send(self.with_cash(call, cash), "enterPosition").await
    }

    async fn exit_position(
        &self,
        amm: Address,
        short_shares: U256,
        long_shares: U256,
        min_cash: U256,
    ) -> Result<TxHash> {
        let call = self.exchange(amm).exit_position(short_shares, long_shares, min_cash);
        self.send(call, "exitPosition").await
    }

    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash> {
        let call = self.token(token).approve(spender, amount);
        self.send(call, "approve").await
    }

    async fn wait_for_confirmations(&self, hash: TxHash) -> Result<u64> {
        tracing::debug!("Waiting for {:?}", hash);

        let provider = self.client.provider();
        let receipt = PendingTransaction::new(hash, provider)
            .confirmations(self.confirmations)
            .await?;

        // Dropped from the mempool
        let Some(receipt) = receipt else {
            return Ok(0);
        };

        if receipt.status == Some(U64::zero()) {
            return Err(AmmError::TransactionError(format!("{:?} reverted", hash)));
        }

        let current = provider.get_block_number().await?;
        let confirmations = receipt
            .block_number
            .map(|mined| current.as_u64().saturating_sub(mined.as_u64()) + 1)
            .unwrap_or(0);
        Ok(confirmations)
    }
}
