//! Arbitrary-precision amounts for money-safe math
//!
//! Amounts are never floats. Conversions to and from on-chain base units are
//! exact; anything below one base unit is floored away.

use std::fmt;
use std::str::FromStr;
use ethers::types::U256;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use crate::utils::{AmmError, Result};

/// Non-negative decimal amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);
    pub const ONE: Amount = Amount(Decimal::ONE);
    pub const ONE_HUNDRED: Amount = Amount(Decimal::ONE_HUNDRED);
    pub const HALF: Amount = Amount(Decimal::from_parts(5, 0, 0, false, 1));

    pub fn new(value: Decimal) -> Result<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmmError::InvalidAmount(format!("{} is negative", value)));
        }
        Ok(Self(value.normalize()))
    }

    /// Parse user input. Empty, non-numeric, `NaN` and negative input are rejected.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AmmError::InvalidAmount("empty input".into()));
        }

        let parsed = if trimmed.contains(['e', 'E']) {
            Decimal::from_scientific(trimmed)
        } else {
            Decimal::from_str(trimmed)
        };

        let value = parsed
            .map_err(|e| AmmError::InvalidAmount(format!("'{}': {}", trimmed, e)))?;
        Self::new(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Mantissa and scale such that `self == mantissa / 10^scale`.
    pub(crate) fn parts(&self) -> (u128, u32) {
        // Non-negative by construction, so the mantissa fits in u128.
        (self.0.mantissa().unsigned_abs(), self.0.scale())
    }

    /// Truncate toward zero at `dp` decimal places.
    pub fn round_down(&self, dp: u32) -> Self {
        Self(self.0.round_dp_with_strategy(dp, RoundingStrategy::ToZero).normalize())
    }

    pub fn checked_add(&self, other: &Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// `None` when the result would be negative.
    pub fn checked_sub(&self, other: &Amount) -> Option<Amount> {
        let diff = self.0.checked_sub(other.0)?;
        Amount::new(diff).ok()
    }

    pub fn checked_mul(&self, other: &Amount) -> Option<Amount> {
        self.0.checked_mul(other.0).map(|v| Amount(v.normalize()))
    }

    /// Shift the decimal point right by `decimals` places without flooring.
    pub fn to_base_units(&self, decimals: u32) -> Result<Amount> {
        let factor = Decimal::from_i128_with_scale(10i128.pow(decimals.min(28)), 0);
        let shifted = if decimals > 28 {
            None
        } else {
            self.0.checked_mul(factor)
        };
        shifted
            .map(|v| Amount(v.normalize()))
            .ok_or_else(|| AmmError::InvalidAmount(format!("{} overflows at {} decimals", self, decimals)))
    }

    /// Integer base units, flooring any remainder below one unit.
    pub fn to_raw(&self, decimals: u32) -> Result<U256> {
        let (mantissa, scale) = self.parts();
        let mantissa = U256::from(mantissa);

        if decimals >= scale {
            mantissa
                .checked_mul(U256::exp10((decimals - scale) as usize))
                .ok_or_else(|| AmmError::InvalidAmount(format!("{} overflows at {} decimals", self, decimals)))
        } else {
            Ok(mantissa / U256::exp10((scale - decimals) as usize))
        }
    }

    /// Display amount from integer base units.
    pub fn from_raw(raw: U256, decimals: u32) -> Result<Self> {
        // Decimal carries a 96-bit mantissa and at most 28 fractional digits.
        if raw.bits() > 96 {
            return Err(AmmError::InvalidAmount(format!("{} does not fit a decimal", raw)));
        }
        let value = Decimal::try_from_i128_with_scale(raw.as_u128() as i128, decimals)
            .map_err(|e| AmmError::InvalidAmount(format!("{} at {} decimals: {}", raw, decimals, e)))?;
        Ok(Self(value.normalize()))
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmmError;

    fn try_from(value: Decimal) -> Result<Self> {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount(Decimal::from(value))
    }
}

impl FromStr for Amount {
    type Err = AmmError;

    fn from_str(s: &str) -> Result<Self> {
        Amount::parse(s)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}
