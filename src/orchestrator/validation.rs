//! Form input and the inline errors shown next to it
//!
//! Validation is synchronous and never fails the flow: an input either has
//! no error or exactly one message to display.

use ethers::types::Address;
use serde::{Deserialize, Serialize};
use crate::liquidity::positive_amount;
use crate::models::{Amount, MarketKey, PriceInputs};

pub const CONNECT_ACCOUNT: &str = "Connect Account";
pub const ENTER_AMOUNT: &str = "Enter Amount";
pub const ERROR_AMOUNT: &str = "Amount is not valid";
pub const INSUFFICIENT_BALANCE: &str = "Insufficient Balance";
pub const SET_PRICES: &str = "Set Prices";
pub const PRICE_NOT_VALID: &str = "Price is not valid";

/// Shown for any rejected write that the user did not cancel
pub const LIQUIDITY_ERROR: &str =
    "Liquidity error, please try reducing the size of your trade to avoid a price slippage.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiquidityMode {
    /// First liquidity for a market; prices must be set
    Create,
    #[default]
    Add,
    Remove,
}

impl LiquidityMode {
    pub fn history_message(&self) -> &'static str {
        match self {
            LiquidityMode::Create | LiquidityMode::Add => "Add Liquidity",
            LiquidityMode::Remove => "Remove Liquidity",
        }
    }
}

/// Everything the user has entered so far
#[derive(Debug, Clone, Default)]
pub struct LiquidityInput {
    pub mode: LiquidityMode,
    pub account: Option<Address>,
    pub market: Option<MarketKey>,
    /// Cash for adds, LP tokens for removes, as typed
    pub amount: String,
    pub prices: PriceInputs,
    /// Spendable balance in display units, when known
    pub max_amount: Option<Amount>,
    pub market_description: Option<String>,
}

/// First problem with `input`, if any
pub fn form_error(input: &LiquidityInput) -> Option<&'static str> {
    if input.account.is_none() {
        return Some(CONNECT_ACCOUNT);
    }

    let trimmed = input.amount.trim();
    if trimmed.is_empty() || trimmed.parse::<Amount>().map(|a| a.is_zero()).unwrap_or(false) {
        return Some(ENTER_AMOUNT);
    }
    let Some(amount) = positive_amount(trimmed) else {
        return Some(ERROR_AMOUNT);
    };

    if let Some(max) = input.max_amount {
        if amount > max {
            return Some(INSUFFICIENT_BALANCE);
        }
    }

    if input.mode == LiquidityMode::Remove {
        return None;
    }

    if input.mode == LiquidityMode::Create && input.prices.is_unset() {
        return Some(SET_PRICES);
    }
    if input.prices.resolve().is_err() {
        return Some(PRICE_NOT_VALID);
    }

    None
}
