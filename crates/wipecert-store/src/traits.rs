//! ReceiptStore trait: the abstract interface for receipt persistence.
//!
//! Implementations include a file-per-record directory (primary), SQLite,
//! and in-memory (for tests).

use std::sync::Arc;

use async_trait::async_trait;
use wipecert_core::{Receipt, ReceiptId};

use crate::error::Result;

/// Async interface for append-only receipt persistence.
///
/// # Design Notes
///
/// - **Append-only**: `put` of an identifier that already exists fails with
///   `AlreadyExists`; a stored receipt is never overwritten.
/// - **Visibility**: once `put` returns `Ok`, every subsequent `get` sees the
///   receipt.
/// - **Concurrent writers**: distinct identifiers never interfere, and a
///   reader never observes a partially written receipt.
#[async_trait]
pub trait ReceiptStore: Send + Sync {
    /// Durably record a receipt.
    async fn put(&self, receipt: &Receipt) -> Result<()>;

    /// Fetch a receipt by identifier.
    async fn get(&self, id: &ReceiptId) -> Result<Option<Receipt>>;

    /// All stored identifiers, sorted.
    async fn list(&self) -> Result<Vec<ReceiptId>>;

    /// Number of stored receipts.
    async fn count(&self) -> Result<usize> {
        Ok(self.list().await?.len())
    }

    /// Check whether a receipt exists.
    async fn contains(&self, id: &ReceiptId) -> Result<bool> {
        Ok(self.get(id).await?.is_some())
    }
}

#[async_trait]
impl<S: ReceiptStore + ?Sized> ReceiptStore for Arc<S> {
    async fn put(&self, receipt: &Receipt) -> Result<()> {
        (**self).put(receipt).await
    }

    async fn get(&self, id: &ReceiptId) -> Result<Option<Receipt>> {
        (**self).get(id).await
    }

    async fn list(&self) -> Result<Vec<ReceiptId>> {
        (**self).list().await
    }

    async fn count(&self) -> Result<usize> {
        (**self).count().await
    }

    async fn contains(&self, id: &ReceiptId) -> Result<bool> {
        (**self).contains(id).await
    }
}
