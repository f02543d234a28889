use std::time::{SystemTime, UNIX_EPOCH};
use ethers::types::{Address, TxHash};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TxStatus {
    Pending,
    Confirmed,
    Failure,
}

impl TxStatus {
    pub fn is_final(&self) -> bool {
        !matches!(self, TxStatus::Pending)
    }
}

/// One entry of the transaction history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub hash: TxHash,
    pub status: TxStatus,
    /// Milliseconds since the unix epoch
    pub added_time: u64,
    pub message: String,
    pub from: Address,
    pub chain_id: u64,
    pub market_description: Option<String>,
    pub seen: bool,
}

impl TransactionRecord {
    /// Record for a transaction that was just sent and has no receipt yet
    pub fn pending(hash: TxHash, from: Address, chain_id: u64, message: impl Into<String>) -> Self {
        let added_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        Self {
            hash,
            status: TxStatus::Pending,
            added_time,
            message: message.into(),
            from,
            chain_id,
            market_description: None,
            seen: false,
        }
    }

    pub fn with_market_description(mut self, description: impl Into<String>) -> Self {
        self.market_description = Some(description.into());
        self
    }
}
