//! A user's slice of a pool, before and after a liquidity change
//!
//! Percentages are floored to two decimal places.

use ethers::types::U256;
use crate::models::Amount;
use crate::utils::{AmmError, Result};

/// Share of the pool once `added` LP tokens join a `balance` position.
/// A pool without supply is entirely the user's.
pub fn pool_share_after_add(balance: U256, added: U256, total_supply: U256) -> Result<Amount> {
    let whole = total_supply.saturating_add(added);
    if whole.is_zero() {
        return Ok(Amount::ONE_HUNDRED);
    }
    percent_of(balance.saturating_add(added), whole)
}

/// Share of the pool left after burning `removed` LP tokens out of `balance`.
pub fn pool_share_after_remove(balance: U256, removed: U256, total_supply: U256) -> Result<Amount> {
    let whole = total_supply.saturating_sub(removed);
    if whole.is_zero() {
        return Ok(Amount::ZERO);
    }
    percent_of(balance.saturating_sub(removed), whole)
}

/// LP tokens making up `percent` of a `balance` position, floored
pub fn lp_for_percent(balance: U256, percent: &Amount) -> Result<U256> {
    if percent.is_zero() || *percent > Amount::ONE_HUNDRED {
        return Err(AmmError::Validation(format!(
            "percent to remove must be in (0, 100], got {}", percent
        )));
    }

    let (mantissa, scale) = percent.parts();
    let overflow = || AmmError::InvalidAmount(format!("{}% of {} overflows", percent, balance));
    let numerator = balance.checked_mul(U256::from(mantissa)).ok_or_else(overflow)?;
    let denominator = U256::from(100u64)
        .checked_mul(U256::exp10(scale as usize))
        .ok_or_else(overflow)?;
    Ok(numerator / denominator)
}

fn percent_of(part: U256, whole: U256) -> Result<Amount> {
    // Basis points: 100.00% == 10_000
    let bps = part
        .min(whole)
        .checked_mul(U256::from(10_000u64))
        .ok_or_else(|| AmmError::InvalidAmount(format!("{} / {} overflows", part, whole)))?
        / whole;
    Amount::from_raw(bps, 2)
}
