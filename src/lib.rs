pub mod contracts;
pub mod config;

pub mod core;
pub mod models;
pub mod liquidity;
pub mod orchestrator;
pub mod blockchain;
pub mod utils;

pub use core::{AmmExchange, AmmGateway};
pub use models::{Amount, LiquidityBreakdown, MarketKey, OutcomePrices, TransactionRecord, TxStatus};
pub use liquidity::{compute_ratio, get_add_breakdown, get_remove_breakdown, LiquidityRatio};
pub use orchestrator::{FlowState, LiquidityFlow, TransactionStore};
pub use utils::{AmmError, Result};
