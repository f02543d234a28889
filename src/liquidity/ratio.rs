//! Initial liquidity ratio
//!
//! A pool is seeded by minting complete sets and keeping one side. The kept
//! side is the more expensive one: scarce shares are worth more, so a pool
//! priced with more NO than YES shares keeps YES shares, and vice versa.
//!
//! The factory only accepts integer ratios scaled by 1e18. Both the ratio and
//! the cash amount are floored, never rounded up.

use ethers::types::U256;
use crate::models::Amount;
use crate::utils::{AmmError, Result};

/// Fixed-point scale of the on-chain ratio argument
pub const RATIO_SCALE: u64 = 1_000_000_000_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiquidityRatio {
    /// No cash: create the pool without liquidity, no ratio involved
    Empty,
    Seeded {
        cash: U256,
        ratio: U256,
        keep_yes: bool,
    },
}

impl LiquidityRatio {
    pub fn is_empty(&self) -> bool {
        matches!(self, LiquidityRatio::Empty)
    }
}

/// Ratio and kept side for seeding a pool with `cash_amount` base units at
/// the given outcome percentages.
pub fn compute_ratio(
    cash_amount: &Amount,
    yes_percent: &Amount,
    no_percent: &Amount,
) -> Result<LiquidityRatio> {
    let cash = cash_amount.to_raw(0)?;
    if cash.is_zero() {
        return Ok(LiquidityRatio::Empty);
    }

    if yes_percent.is_zero() || no_percent.is_zero() {
        return Err(AmmError::Validation(format!(
            "outcome percents must be positive (yes {}, no {})",
            yes_percent, no_percent
        )));
    }
    let total = yes_percent.checked_add(no_percent);
    if total != Some(Amount::ONE_HUNDRED) {
        return Err(AmmError::Validation(format!(
            "outcome percents must sum to 100 (yes {}, no {})",
            yes_percent, no_percent
        )));
    }

    let keep_yes = no_percent > yes_percent;
    let ratio = if keep_yes {
        floor_scaled_ratio(yes_percent, no_percent)?
    } else {
        floor_scaled_ratio(no_percent, yes_percent)?
    };

    Ok(LiquidityRatio::Seeded { cash, ratio, keep_yes })
}

/// `floor(1e18 * numerator / denominator)` in exact integer arithmetic
fn floor_scaled_ratio(numerator: &Amount, denominator: &Amount) -> Result<U256> {
    let (n_mantissa, n_scale) = numerator.parts();
    let (d_mantissa, d_scale) = denominator.parts();

    // n/d = (n_mantissa * 10^d_scale) / (d_mantissa * 10^n_scale)
    let overflow = || AmmError::InvalidAmount(format!("ratio {}/{} overflows", numerator, denominator));
    let num = U256::from(RATIO_SCALE)
        .checked_mul(U256::from(n_mantissa))
        .and_then(|v| v.checked_mul(U256::exp10(d_scale as usize)))
        .ok_or_else(overflow)?;
    let den = U256::from(d_mantissa)
        .checked_mul(U256::exp10(n_scale as usize))
        .ok_or_else(overflow)?;

    if den.is_zero() {
        return Err(AmmError::Validation("ratio denominator is zero".into()));
    }
    Ok(num / den)
}
