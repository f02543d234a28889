//! Liquidity breakdowns: what a user receives for an add or remove
//!
//! Quantities always come from read-only contract calls so they match what
//! the chain will execute. A `None` result means "nothing to show yet" and
//! callers fall back to the zero breakdown; it is never an error.

use std::sync::Arc;
use ethers::types::{Address, U256};
use crate::core::{AmmExchange, AmmGateway};
use crate::models::{
    AddLiquidityRate, Amount, LiquidityBreakdown, MarketKey, OutcomePrices, PriceInputs,
    RemoveLiquidityRate, TokenDecimals,
};
use crate::utils::Result;
use super::share::{pool_share_after_add, pool_share_after_remove};

#[derive(Debug, Clone, Default)]
pub struct AddBreakdownParams {
    pub account: Option<Address>,
    pub market: Option<MarketKey>,
    /// Cash to add, in display units as typed
    pub amount: String,
    pub prices: PriceInputs,
    pub decimals: TokenDecimals,
}

#[derive(Debug, Clone, Default)]
pub struct RemoveBreakdownParams {
    pub account: Option<Address>,
    pub market: Option<MarketKey>,
    /// LP tokens to burn, in display units as typed
    pub amount: String,
    pub decimals: TokenDecimals,
}

/// Parsed amount, only when strictly positive
pub fn positive_amount(input: &str) -> Option<Amount> {
    Amount::parse(input).ok().filter(|amount| !amount.is_zero())
}

pub async fn get_add_breakdown(
    gateway: &Arc<dyn AmmGateway>,
    params: &AddBreakdownParams,
) -> Option<LiquidityBreakdown> {
    let account = params.account?;
    let market = params.market?;
    let amount = positive_amount(&params.amount)?;
    let prices = params.prices.resolve().ok()?;
    let cash = amount.to_base_units(params.decimals.cash).ok()?;

    let exchange = AmmExchange::new(gateway.clone(), market);
    let (rate, share) = match quote_add(&exchange, &cash, &prices, account).await {
        Ok(quote) => quote,
        Err(e) => {
            tracing::debug!("Add liquidity quote failed for {:?}: {}", market.market, e);
            return None;
        }
    };

    let decimals = &params.decimals;
    let breakdown = LiquidityBreakdown::for_add(
        to_display(rate.long_shares, decimals.shares, decimals.display)?,
        to_display(rate.short_shares, decimals.shares, decimals.display)?,
        to_display(rate.lp_tokens, decimals.lp_tokens, decimals.display)?,
    );
    Some(breakdown.with_pool_share(share))
}

pub async fn get_remove_breakdown(
    gateway: &Arc<dyn AmmGateway>,
    params: &RemoveBreakdownParams,
) -> Option<LiquidityBreakdown> {
    let account = params.account?;
    let market = params.market?;
    let amount = positive_amount(&params.amount)?;
    let lp_tokens = amount.to_raw(params.decimals.lp_tokens).ok()?;
    if lp_tokens.is_zero() {
        return None;
    }

    let exchange = AmmExchange::new(gateway.clone(), market);
    let (rate, share) = match quote_remove(&exchange, lp_tokens, account).await {
        Ok(quote) => quote,
        Err(e) => {
            tracing::debug!("Remove liquidity quote failed for {:?}: {}", market.market, e);
            return None;
        }
    };

    let decimals = &params.decimals;
    let breakdown = LiquidityBreakdown::for_remove(
        to_display(rate.long, decimals.shares, decimals.display)?,
        to_display(rate.short, decimals.shares, decimals.display)?,
        to_display(rate.cash, decimals.cash, decimals.display)?,
    );
    Some(breakdown.with_pool_share(share))
}

async fn quote_add(
    exchange: &AmmExchange,
    cash: &Amount,
    prices: &OutcomePrices,
    recipient: Address,
) -> Result<(AddLiquidityRate, Amount)> {
    let plan = exchange.plan_add_liquidity(cash, prices).await?;
    let rate = exchange.rate_add_liquidity(&plan, recipient).await?;
    let (balance, supply) = exchange.lp_position(recipient).await?;
    Ok((rate, pool_share_after_add(balance, rate.lp_tokens, supply)?))
}

async fn quote_remove(
    exchange: &AmmExchange,
    lp_tokens: U256,
    account: Address,
) -> Result<(RemoveLiquidityRate, Amount)> {
    let rate = exchange.rate_remove_liquidity(lp_tokens, U256::zero()).await?;
    let (balance, supply) = exchange.lp_position(account).await?;
    Ok((rate, pool_share_after_remove(balance, lp_tokens, supply)?))
}

fn to_display(raw: U256, decimals: u32, precision: u32) -> Option<Amount> {
    match Amount::from_raw(raw, decimals) {
        Ok(amount) => Some(amount.round_down(precision)),
        Err(e) => {
            tracing::debug!("Cannot display {}: {}", raw, e);
            None
        }
    }
}
