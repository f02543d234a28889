//! In-memory transaction history
//!
//! Owned by the composition root and handed to whoever submits or watches
//! transactions. Records are keyed by hash and never removed.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use ethers::types::TxHash;
use crate::models::{TransactionRecord, TxStatus};

#[derive(Debug, Default)]
pub struct TransactionStore {
    records: RwLock<Vec<TransactionRecord>>,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when a record with the same hash already exists
    pub fn add(&self, record: TransactionRecord) -> bool {
        let mut records = self.write();
        if records.iter().any(|r| r.hash == record.hash) {
            tracing::warn!("Transaction {:?} already recorded", record.hash);
            return false;
        }
        tracing::debug!("Recorded transaction {:?} ({})", record.hash, record.message);
        records.push(record);
        true
    }

    /// Move a pending record to `status`. Final records are left alone.
    pub fn update_by_hash(&self, hash: TxHash, status: TxStatus) -> bool {
        let mut records = self.write();
        match records.iter_mut().find(|r| r.hash == hash) {
            Some(record) if !record.status.is_final() => {
                record.status = status;
                tracing::debug!("Transaction {:?} is now {:?}", hash, status);
                true
            }
            Some(record) => {
                tracing::debug!("Transaction {:?} already {:?}", hash, record.status);
                false
            }
            None => false,
        }
    }

    pub fn mark_seen(&self, hash: TxHash) -> bool {
        let mut records = self.write();
        match records.iter_mut().find(|r| r.hash == hash) {
            Some(record) => {
                record.seen = true;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, hash: TxHash) -> Option<TransactionRecord> {
        self.read().iter().find(|r| r.hash == hash).cloned()
    }

    /// All records in submission order
    pub fn list(&self) -> Vec<TransactionRecord> {
        self.read().clone()
    }

    pub fn pending(&self) -> Vec<TransactionRecord> {
        self.read()
            .iter()
            .filter(|r| r.status == TxStatus::Pending)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the lock cannot leave a record half-written,
    // so a poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, Vec<TransactionRecord>> {
        self.records.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<TransactionRecord>> {
        self.records.write().unwrap_or_else(|e| e.into_inner())
    }
}
