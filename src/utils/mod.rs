pub mod errors;

pub use errors::{AmmError, Result};
