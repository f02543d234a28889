//! Transaction orchestration for liquidity changes
//!
//! Input validation, quoting, confirmation, submission and confirmation
//! tracking. The transaction history is injected, never looked up globally.

pub mod transactions;
pub mod validation;
pub mod flow;

pub use transactions::TransactionStore;
pub use validation::{form_error, LiquidityInput, LiquidityMode, LIQUIDITY_ERROR};
pub use flow::{FlowState, LiquidityFlow, Submission};
