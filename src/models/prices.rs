//! YES/NO outcome prices
//!
//! Prices are fractions of one unit of collateral, so a valid pair always sums to 1.

use serde::{Deserialize, Serialize};
use crate::models::Amount;
use crate::utils::{AmmError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    No,
    Yes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomePrices {
    yes: Amount,
    no: Amount,
}

impl OutcomePrices {
    pub fn new(yes: Amount, no: Amount) -> Result<Self> {
        Self::check_range(&yes)?;
        Self::check_range(&no)?;

        let sum = yes.checked_add(&no)
            .ok_or_else(|| AmmError::Validation("price sum overflows".into()))?;
        if sum != Amount::ONE {
            return Err(AmmError::Validation(format!(
                "yes ({}) and no ({}) prices must sum to 1", yes, no
            )));
        }

        Ok(Self { yes, no })
    }

    /// Pair where the other side is `1 - price`.
    pub fn from_side(outcome: Outcome, price: Amount) -> Result<Self> {
        Self::check_range(&price)?;
        let other = Amount::ONE.checked_sub(&price)
            .ok_or_else(|| AmmError::Validation(format!("price {} exceeds 1", price)))?;

        match outcome {
            Outcome::Yes => Self::new(price, other),
            Outcome::No => Self::new(other, price),
        }
    }

    /// Parse a pair of user-entered prices.
    pub fn parse(yes: &str, no: &str) -> Result<Self> {
        Self::new(Amount::parse(yes)?, Amount::parse(no)?)
    }

    pub fn even() -> Self {
        Self { yes: Amount::HALF, no: Amount::HALF }
    }

    pub fn yes(&self) -> Amount {
        self.yes
    }

    pub fn no(&self) -> Amount {
        self.no
    }

    /// Prices as percentages `(yes, no)`, summing to 100.
    pub fn to_percents(&self) -> Result<(Amount, Amount)> {
        let scale = |price: &Amount| {
            price
                .checked_mul(&Amount::ONE_HUNDRED)
                .ok_or_else(|| AmmError::InvalidAmount(format!("price {} overflows as a percent", price)))
        };
        Ok((scale(&self.yes)?, scale(&self.no)?))
    }

    fn check_range(price: &Amount) -> Result<()> {
        if price.is_zero() || *price >= Amount::ONE {
            return Err(AmmError::Validation(format!(
                "price {} must be between 0 and 1", price
            )));
        }
        Ok(())
    }
}

/// Raw price inputs as typed by the user.
///
/// Entering a valid price on one side fills the other with its complement,
/// so the pair keeps summing to 1 while the user types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceInputs {
    pub yes: String,
    pub no: String,
}

impl PriceInputs {
    pub fn new(yes: impl Into<String>, no: impl Into<String>) -> Self {
        Self { yes: yes.into(), no: no.into() }
    }

    pub fn set(&mut self, outcome: Outcome, input: impl Into<String>) {
        let input = input.into();

        if let Ok(price) = Amount::parse(&input) {
            if let Ok(pair) = OutcomePrices::from_side(outcome, price) {
                match outcome {
                    Outcome::Yes => self.no = pair.no().to_string(),
                    Outcome::No => self.yes = pair.yes().to_string(),
                }
            }
        }

        match outcome {
            Outcome::Yes => self.yes = input,
            Outcome::No => self.no = input,
        }
    }

    /// Either side left blank or at zero.
    pub fn is_unset(&self) -> bool {
        let blank = |s: &str| {
            let s = s.trim();
            s.is_empty() || Amount::parse(s).map(|p| p.is_zero()).unwrap_or(false)
        };
        blank(&self.yes) || blank(&self.no)
    }

    pub fn resolve(&self) -> Result<OutcomePrices> {
        OutcomePrices::parse(&self.yes, &self.no)
    }
}
