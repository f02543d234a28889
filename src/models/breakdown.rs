use ethers::types::U256;
use serde::{Deserialize, Serialize};
use super::amount::Amount;

/// Raw result of a read-only add-liquidity call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddLiquidityRate {
    pub lp_tokens: U256,
    /// NO shares handed back to the recipient
    pub short_shares: U256,
    /// YES shares handed back to the recipient
    pub long_shares: U256,
}

/// Raw result of `rateRemoveLiquidity`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemoveLiquidityRate {
    pub short: U256,
    pub long: U256,
    pub cash: U256,
    pub sets: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShareBalances {
    pub invalid: U256,
    pub no: U256,
    pub yes: U256,
}

/// What a user receives from an add or remove, in display units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityBreakdown {
    pub yes_shares: Amount,
    pub no_shares: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lp_tokens: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash_amount: Option<Amount>,
    /// Percent of the pool held once the change lands
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_share: Option<Amount>,
}

impl LiquidityBreakdown {
    pub fn for_add(yes_shares: Amount, no_shares: Amount, lp_tokens: Amount) -> Self {
        Self {
            yes_shares,
            no_shares,
            lp_tokens: Some(lp_tokens),
            cash_amount: None,
            pool_share: None,
        }
    }

    pub fn for_remove(yes_shares: Amount, no_shares: Amount, cash_amount: Amount) -> Self {
        Self {
            yes_shares,
            no_shares,
            lp_tokens: None,
            cash_amount: Some(cash_amount),
            pool_share: None,
        }
    }

    pub fn with_pool_share(mut self, share: Amount) -> Self {
        self.pool_share = Some(share);
        self
    }

    /// Zero state shown while a remove cannot be quoted
    pub fn empty_remove() -> Self {
        Self::for_remove(Amount::ZERO, Amount::ZERO, Amount::ZERO)
    }

    /// Label/value rows in display order
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("yes shares", self.yes_shares.to_string()),
            ("no shares", self.no_shares.to_string()),
        ];
        if let Some(lp) = self.lp_tokens {
            rows.push(("liquidity shares", lp.to_string()));
        }
        if let Some(cash) = self.cash_amount {
            rows.push(("collateral", cash.to_string()));
        }
        if let Some(share) = self.pool_share {
            rows.push(("pool share", format!("{}%", share)));
        }
        rows
    }
}

impl Default for LiquidityBreakdown {
    fn default() -> Self {
        Self::for_add(Amount::ZERO, Amount::ZERO, Amount::ZERO)
    }
}

impl std::fmt::Display for LiquidityBreakdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (label, value) in self.rows() {
            writeln!(f, "{:<18} {}", label, value)?;
        }
        Ok(())
    }
}
