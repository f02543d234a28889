pub mod amount;
pub mod prices;
pub mod market;
pub mod breakdown;
pub mod transaction;

pub use amount::Amount;
pub use prices::{Outcome, OutcomePrices, PriceInputs};
pub use market::{CollateralKind, MarketKey, TokenDecimals};
pub use breakdown::{AddLiquidityRate, LiquidityBreakdown, RemoveLiquidityRate, ShareBalances};
pub use transaction::{TransactionRecord, TxStatus};
