pub mod traits;
pub mod exchange;

pub use traits::AmmGateway;
pub use exchange::{AddLiquidityPlan, AmmExchange, PoolState};
