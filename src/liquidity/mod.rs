//! Liquidity math and quoting for binary-outcome pools

pub mod ratio;
pub mod breakdown;
pub mod share;

pub use ratio::{compute_ratio, LiquidityRatio, RATIO_SCALE};
pub use breakdown::{
    get_add_breakdown, get_remove_breakdown, positive_amount, AddBreakdownParams,
    RemoveBreakdownParams,
};
pub use share::{lp_for_percent, pool_share_after_add, pool_share_after_remove};
