use std::sync::Arc;
use ethers::types::{Address, TxHash, U256};
use crate::contracts::addresses;
use crate::core::AmmGateway;
use crate::liquidity::{compute_ratio, LiquidityRatio};
use crate::models::{
    AddLiquidityRate, Amount, MarketKey, OutcomePrices, RemoveLiquidityRate, ShareBalances,
};
use crate::utils::{AmmError, Result};

/// Deployment state of a market's exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolState {
    NotDeployed,
    /// Deployed, zero LP supply
    Empty { amm: Address },
    Funded { amm: Address, total_supply: U256 },
}

/// Which contract call adds the liquidity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddLiquidityPlan {
    /// No cash: deploy the exchange without liquidity
    CreateEmpty,
    /// Deploy and seed in one factory call
    CreateWithLiquidity { cash: U256, ratio: U256, keep_yes: bool },
    /// Exchange exists but was never funded; seeded through the factory
    Seed { amm: Address, cash: U256, ratio: U256, keep_yes: bool },
    /// Funded exchange: liquidity goes in at the pool's current prices
    Add { amm: Address, cash: U256 },
}

/// One market's AMM, seen through a gateway
///
/// Collateral handling (ERC20 allowance vs native value) is a property of
/// the gateway it was built with.
#[derive(Clone)]
pub struct AmmExchange {
    gateway: Arc<dyn AmmGateway>,
    key: MarketKey,
}

impl AmmExchange {
    pub fn new(gateway: Arc<dyn AmmGateway>, key: MarketKey) -> Self {
        Self { gateway, key }
    }

    pub fn key(&self) -> &MarketKey {
        &self.key
    }

    pub fn for_native(&self) -> bool {
        self.gateway.collateral().for_native()
    }

    /// Address the exchange has (or will have once deployed)
    pub async fn amm_address(&self) -> Result<Address> {
        self.gateway.calculate_amm_address(&self.key).await
    }

    pub async fn deployed_address(&self) -> Result<Option<Address>> {
        let amm = self.gateway.exchanges(&self.key).await?;
        Ok((!addresses::is_null(amm)).then_some(amm))
    }

    pub async fn amm_exists(&self) -> Result<bool> {
        Ok(self.deployed_address().await?.is_some())
    }

    pub async fn pool_state(&self) -> Result<PoolState> {
        let Some(amm) = self.deployed_address().await? else {
            return Ok(PoolState::NotDeployed);
        };

        let total_supply = self.gateway.total_supply(amm).await?;
        if total_supply.is_zero() {
            Ok(PoolState::Empty { amm })
        } else {
            Ok(PoolState::Funded { amm, total_supply })
        }
    }

    /// Pick the add-liquidity call for `cash` base units at `prices`
    pub async fn plan_add_liquidity(
        &self,
        cash: &Amount,
        prices: &OutcomePrices,
    ) -> Result<AddLiquidityPlan> {
        let (yes_percent, no_percent) = prices.to_percents()?;
        let ratio = compute_ratio(cash, &yes_percent, &no_percent)?;
        let state = self.pool_state().await?;

        tracing::debug!("Planning add liquidity: {:?} with {:?}", state, ratio);

        let plan = match (ratio, state) {
            (LiquidityRatio::Empty, PoolState::NotDeployed) => AddLiquidityPlan::CreateEmpty,
            (LiquidityRatio::Seeded { cash, ratio, keep_yes }, PoolState::NotDeployed) => {
                AddLiquidityPlan::CreateWithLiquidity { cash, ratio, keep_yes }
            }
            (LiquidityRatio::Seeded { cash, ratio, keep_yes }, PoolState::Empty { amm }) => {
                AddLiquidityPlan::Seed { amm, cash, ratio, keep_yes }
            }
            (LiquidityRatio::Seeded { cash, .. }, PoolState::Funded { amm, .. }) => {
                AddLiquidityPlan::Add { amm, cash }
            }
            (LiquidityRatio::Empty, PoolState::Empty { amm } | PoolState::Funded { amm, .. }) => {
                return Err(AmmError::Validation(format!(
                    "no cash to add to existing exchange {:?}", amm
                )));
            }
        };
        Ok(plan)
    }

    /// Read-only quote of what `plan` would hand to `recipient`
    pub async fn rate_add_liquidity(
        &self,
        plan: &AddLiquidityPlan,
        recipient: Address,
    ) -> Result<AddLiquidityRate> {
        match *plan {
            AddLiquidityPlan::CreateEmpty => Ok(AddLiquidityRate::default()),
            AddLiquidityPlan::CreateWithLiquidity { cash, ratio, keep_yes } => {
                self.gateway
                    .rate_add_amm_with_liquidity(&self.key, cash, ratio, keep_yes, recipient)
                    .await
            }
            AddLiquidityPlan::Seed { cash, ratio, keep_yes, .. } => {
                self.gateway
                    .rate_add_initial_liquidity(&self.key, cash, ratio, keep_yes, recipient)
                    .await
            }
            AddLiquidityPlan::Add { amm, cash } => {
                self.gateway.rate_add_liquidity(amm, cash, recipient).await
            }
        }
    }

    /// Send the transaction for `plan`
    pub async fn add_liquidity(&self, plan: &AddLiquidityPlan, recipient: Address) -> Result<TxHash> {
        tracing::info!("💧 Adding liquidity to market {:?}: {:?}", self.key.market, plan);

        match *plan {
            AddLiquidityPlan::CreateEmpty => {
                if self.amm_exists().await? {
                    return Err(AmmError::Validation(
                        "exchange already exists and no cash was given".into(),
                    ));
                }
                self.gateway.add_amm(&self.key).await
            }
            AddLiquidityPlan::CreateWithLiquidity { cash, ratio, keep_yes } => {
                self.gateway
                    .add_amm_with_liquidity(&self.key, cash, ratio, keep_yes, recipient)
                    .await
            }
            AddLiquidityPlan::Seed { cash, ratio, keep_yes, .. } => {
                self.gateway
                    .add_initial_liquidity(&self.key, cash, ratio, keep_yes, recipient)
                    .await
            }
            AddLiquidityPlan::Add { amm, cash } => {
                self.gateway.add_liquidity(amm, cash, recipient).await
            }
        }
    }

    pub async fn rate_remove_liquidity(
        &self,
        lp_tokens: U256,
        min_sets_sold: U256,
    ) -> Result<RemoveLiquidityRate> {
        let amm = self.amm_address().await?;
        self.gateway.rate_remove_liquidity(amm, lp_tokens, min_sets_sold).await
    }

    pub async fn remove_liquidity(&self, lp_tokens: U256, min_sets_sold: U256) -> Result<TxHash> {
        tracing::info!("💧 Removing {} LP tokens from market {:?}", lp_tokens, self.key.market);
        let amm = self.amm_address().await?;
        self.gateway.remove_liquidity(amm, lp_tokens, min_sets_sold).await
    }

    /// Swap shares of one side for the other
    pub async fn swap(&self, input_shares: U256, buy_yes: bool, min_shares: U256) -> Result<TxHash> {
        let amm = self.amm_address().await?;
        // The contract takes the side being sold
        self.gateway.swap(amm, input_shares, !buy_yes, min_shares).await
    }

    pub async fn enter_position(&self, cash: U256, buy_yes: bool, min_shares: U256) -> Result<TxHash> {
        let amm = self.amm_address().await?;
        self.gateway.enter_position(amm, cash, buy_yes, min_shares).await
    }

    pub async fn exit_position(
        &self,
        no_shares: U256,
        yes_shares: U256,
        min_cash: U256,
    ) -> Result<TxHash> {
        let amm = self.amm_address().await?;
        self.gateway.exit_position(amm, no_shares, yes_shares, min_cash).await
    }

    pub async fn rate_exit_position(&self, no_shares: U256, yes_shares: U256) -> Result<U256> {
        let amm = self.amm_address().await?;
        self.gateway.rate_exit_position(amm, no_shares, yes_shares).await
    }

    /// LP token supply
    pub async fn total_supply(&self) -> Result<U256> {
        let amm = self.amm_address().await?;
        self.gateway.total_supply(amm).await
    }

    /// LP tokens held by `account`
    pub async fn balance_of(&self, account: Address) -> Result<U256> {
        let amm = self.amm_address().await?;
        self.gateway.balance_of(amm, account).await
    }

    /// `(lp balance, total supply)`, both zero while no exchange is deployed
    pub async fn lp_position(&self, account: Address) -> Result<(U256, U256)> {
        let Some(amm) = self.deployed_address().await? else {
            return Ok((U256::zero(), U256::zero()));
        };
        let balance = self.gateway.balance_of(amm, account).await?;
        let supply = self.gateway.total_supply(amm).await?;
        Ok((balance, supply))
    }

    pub async fn share_balances(&self, account: Address) -> Result<ShareBalances> {
        let amm = self.amm_address().await?;
        self.gateway.share_balances(amm, account).await
    }

    pub async fn approve_lp_tokens(&self, spender: Address, amount: U256) -> Result<TxHash> {
        let amm = self.amm_address().await?;
        self.gateway.approve(amm, spender, amount).await
    }
}
