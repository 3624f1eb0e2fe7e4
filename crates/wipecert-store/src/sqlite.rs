//! SQLite implementation of the ReceiptStore trait.
//!
//! Uses rusqlite with bundled SQLite, wrapped in async via
//! tokio::spawn_blocking. One row per receipt; the primary key enforces
//! append-only identifiers.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use wipecert_core::{Receipt, ReceiptId, SignedCertificate};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::ReceiptStore;

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&conn)
        })
        .await?
    }
}

#[async_trait]
impl ReceiptStore for SqliteStore {
    async fn put(&self, receipt: &Receipt) -> Result<()> {
        let id = receipt.id;
        let stored_at = receipt.stored_at;
        let payload = serde_json::to_string(&receipt.payload)?;

        self.blocking(move |conn| {
            match conn.execute(
                "INSERT INTO receipts (id, stored_at, payload) VALUES (?1, ?2, ?3)",
                params![id.to_hex(), stored_at, payload],
            ) {
                Ok(_) => Ok(()),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == ErrorCode::ConstraintViolation =>
                {
                    Err(StoreError::AlreadyExists(id))
                }
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    async fn get(&self, id: &ReceiptId) -> Result<Option<Receipt>> {
        let id = *id;

        self.blocking(move |conn| {
            let row: Option<(i64, String)> = conn
                .query_row(
                    "SELECT stored_at, payload FROM receipts WHERE id = ?1",
                    params![id.to_hex()],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            match row {
                Some((stored_at, payload)) => {
                    let payload: SignedCertificate = serde_json::from_str(&payload)?;
                    Ok(Some(Receipt::new(id, payload, stored_at)))
                }
                None => Ok(None),
            }
        })
        .await
    }

    async fn list(&self) -> Result<Vec<ReceiptId>> {
        self.blocking(|conn| {
            let mut stmt = conn.prepare("SELECT id FROM receipts ORDER BY id")?;
            let hexes = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            hexes
                .iter()
                .map(|hex| {
                    ReceiptId::from_hex(hex).map_err(|e| {
                        StoreError::InvalidData(format!("bad receipt id {:?}: {}", hex, e))
                    })
                })
                .collect()
        })
        .await
    }

    async fn count(&self) -> Result<usize> {
        self.blocking(|conn| {
            let n: i64 = conn.query_row("SELECT COUNT(*) FROM receipts", [], |row| row.get(0))?;
            Ok(n as usize)
        })
        .await
    }
}
