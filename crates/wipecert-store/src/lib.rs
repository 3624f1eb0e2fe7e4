//! # wipecert store
//!
//! Durable, append-only persistence for receipts of verified certificates.
//!
//! ## Key Types
//!
//! - [`ReceiptStore`] - The async trait for all storage operations
//! - [`FileStore`] - One JSON file per receipt in a directory
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use wipecert_store::{FileStore, ReceiptStore};
//!
//! async fn example() {
//!     let store = FileStore::open("./out/receipts").unwrap();
//!     let stored = store.count().await.unwrap();
//!     println!("{} receipts on disk", stored);
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Append-only**: storing an identifier twice fails with `AlreadyExists`
//! - **Atomic writes**: readers never observe a partially written receipt
//! - **No retries**: a failed write is reported to the caller as-is

pub mod error;
pub mod file;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::ReceiptStore;
