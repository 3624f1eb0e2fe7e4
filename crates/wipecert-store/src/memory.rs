//! In-memory implementation of the ReceiptStore trait.
//!
//! This is primarily for testing. It has the same append-only semantics as
//! the durable stores but keeps everything in memory with no persistence.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use wipecert_core::{Receipt, ReceiptId};

use crate::error::{Result, StoreError};
use crate::traits::ReceiptStore;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    receipts: RwLock<BTreeMap<ReceiptId, Receipt>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            receipts: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReceiptStore for MemoryStore {
    async fn put(&self, receipt: &Receipt) -> Result<()> {
        let mut receipts = self.receipts.write().map_err(|_| StoreError::Poisoned)?;
        if receipts.contains_key(&receipt.id) {
            return Err(StoreError::AlreadyExists(receipt.id));
        }
        receipts.insert(receipt.id, receipt.clone());
        Ok(())
    }

    async fn get(&self, id: &ReceiptId) -> Result<Option<Receipt>> {
        let receipts = self.receipts.read().map_err(|_| StoreError::Poisoned)?;
        Ok(receipts.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<ReceiptId>> {
        let receipts = self.receipts.read().map_err(|_| StoreError::Poisoned)?;
        Ok(receipts.keys().copied().collect())
    }

    async fn count(&self) -> Result<usize> {
        let receipts = self.receipts.read().map_err(|_| StoreError::Poisoned)?;
        Ok(receipts.len())
    }
}
