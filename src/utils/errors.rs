use thiserror::Error;

#[derive(Error, Debug)]
pub enum AmmError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("RPC error: {0}")]
    RpcError(#[from] ethers::providers::ProviderError),

    #[error("Contract call failed: {0}")]
    ContractCallError(String),

    #[error("Transaction failed: {0}")]
    TransactionError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AmmError {
    /// True when the wallet/signer reported that the user refused to sign.
    pub fn is_user_denied(&self) -> bool {
        self.to_string().contains("denied")
    }
}

pub type Result<T> = std::result::Result<T, AmmError>;
