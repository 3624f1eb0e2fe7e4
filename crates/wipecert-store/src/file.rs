//! File-per-record implementation of the ReceiptStore trait.
//!
//! Each receipt lives at `<dir>/<id>.json`. Writes go to a temporary file in
//! the same directory, are fsynced, then linked into place without
//! replacing an existing file. A reader therefore sees either the complete
//! receipt or no file at all.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tracing::debug;
use wipecert_core::{Receipt, ReceiptId};

use crate::error::{Result, StoreError};
use crate::traits::ReceiptStore;

const EXTENSION: &str = "json";

/// Directory-backed receipt store.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a receipt with this identifier is stored at.
    pub fn path_for(&self, id: &ReceiptId) -> PathBuf {
        self.dir.join(format!("{}.{}", id.to_hex(), EXTENSION))
    }

    fn write_blocking(dir: &Path, target: &Path, receipt: &Receipt) -> Result<()> {
        if target.exists() {
            return Err(StoreError::AlreadyExists(receipt.id));
        }

        let body = serde_json::to_vec_pretty(receipt)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&body)?;
        tmp.as_file().sync_all()?;

        tmp.persist_noclobber(target).map_err(|e| {
            if e.error.kind() == io::ErrorKind::AlreadyExists {
                StoreError::AlreadyExists(receipt.id)
            } else {
                StoreError::Io(e.error)
            }
        })?;

        // Make the new directory entry itself durable. Not every platform
        // allows opening a directory for sync, so failure here is ignored.
        if let Ok(handle) = fs::File::open(dir) {
            let _ = handle.sync_all();
        }
        Ok(())
    }

    fn read_blocking(path: &Path, id: ReceiptId) -> Result<Option<Receipt>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let receipt: Receipt = serde_json::from_slice(&bytes)?;
        if receipt.id != id {
            return Err(StoreError::InvalidData(format!(
                "{} holds receipt {}",
                path.display(),
                receipt.id
            )));
        }
        Ok(Some(receipt))
    }

    fn list_blocking(dir: &Path) -> Result<Vec<ReceiptId>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            // Temporary files and foreign names never parse as identifiers.
            if let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| ReceiptId::from_hex(s).ok())
            {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }
}

#[async_trait]
impl ReceiptStore for FileStore {
    async fn put(&self, receipt: &Receipt) -> Result<()> {
        let dir = self.dir.clone();
        let target = self.path_for(&receipt.id);
        let receipt = receipt.clone();

        tokio::task::spawn_blocking(move || {
            Self::write_blocking(&dir, &target, &receipt)?;
            debug!(id = %receipt.id, path = %target.display(), "receipt written");
            Ok(())
        })
        .await?
    }

    async fn get(&self, id: &ReceiptId) -> Result<Option<Receipt>> {
        let id = *id;
        let path = self.path_for(&id);
        tokio::task::spawn_blocking(move || Self::read_blocking(&path, id)).await?
    }

    async fn list(&self) -> Result<Vec<ReceiptId>> {
        let dir = self.dir.clone();
        tokio::task::spawn_blocking(move || Self::list_blocking(&dir)).await?
    }

    async fn contains(&self, id: &ReceiptId) -> Result<bool> {
        let path = self.path_for(id);
        tokio::task::spawn_blocking(move || Ok(path.is_file())).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_receipt;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_put_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("receipts")).unwrap();
        let receipt = sample_receipt("c-1");

        store.put(&receipt).await.unwrap();

        let path = store.path_for(&receipt.id);
        assert!(path.is_file());
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            format!("{}.json", receipt.id.to_hex())
        );

        let on_disk: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk["payload"]["id"], "c-1");
        assert_eq!(on_disk["storedAt"], receipt.stored_at);

        assert_eq!(store.get(&receipt.id).await.unwrap(), Some(receipt));
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let receipt = sample_receipt("c-1");
        store.put(&receipt).await.unwrap();

        let mut other = sample_receipt("c-2");
        other.id = receipt.id;
        assert!(matches!(
            store.put(&other).await,
            Err(StoreError::AlreadyExists(_))
        ));

        let kept = store.get(&receipt.id).await.unwrap().unwrap();
        assert_eq!(kept.payload, receipt.payload);
    }

    #[tokio::test]
    async fn test_list_ignores_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        std::fs::write(dir.path().join("not-an-id.json"), "{}").unwrap();

        let receipt = sample_receipt("c-1");
        store.put(&receipt).await.unwrap();

        assert_eq!(store.list().await.unwrap(), vec![receipt.id]);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_and_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let id = ReceiptId::generate();
        assert!(store.get(&id).await.unwrap().is_none());
        assert!(!store.contains(&id).await.unwrap());

        std::fs::write(store.path_for(&id), "{ truncated").unwrap();
        assert!(matches!(
            store.get(&id).await,
            Err(StoreError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_mismatched_id_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let receipt = sample_receipt("c-1");
        store.put(&receipt).await.unwrap();

        let other = ReceiptId::generate();
        std::fs::copy(store.path_for(&receipt.id), store.path_for(&other)).unwrap();
        assert!(matches!(
            store.get(&other).await,
            Err(StoreError::InvalidData(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_writers() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::open(dir.path()).unwrap());

        let mut handles = Vec::new();
        for i in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let receipt = sample_receipt(&format!("c-{}", i));
                store.put(&receipt).await.map(|_| receipt.id)
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap());
        }
        ids.sort();

        assert_eq!(store.list().await.unwrap(), ids);
        // No temporary files left behind.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 32);
    }
}
