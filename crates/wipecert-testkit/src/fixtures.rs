//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use tempfile::TempDir;
use wipecert_core::{
    sign_certificate, Certificate, PrivateKey, PublicKey, ReceiptId, SignedCertificate,
};
use wipecert_store::FileStore;

use crate::keys;
use crate::vectors::sample_certificate;

/// A signer key pair plus an unrelated public key.
pub struct TestFixture {
    pub signer: PrivateKey,
    pub verifier: PublicKey,
    pub other: PublicKey,
}

impl TestFixture {
    /// Create a fixture around the fixed testkit keys.
    pub fn new() -> Self {
        Self {
            signer: keys::signer_private(),
            verifier: keys::signer_public(),
            other: keys::other_public(),
        }
    }

    /// The public key matching [`signer`](Self::signer).
    pub fn public_key(&self) -> PublicKey {
        self.verifier.clone()
    }

    /// Sign a certificate with the fixture signer.
    pub fn sign(&self, certificate: Certificate) -> SignedCertificate {
        sign_certificate(&self.signer, certificate).expect("testkit signer can sign")
    }

    /// The golden sample certificate, signed.
    pub fn signed_sample(&self) -> SignedCertificate {
        self.sign(sample_certificate())
    }

    /// A signed certificate with the given id and the sample's other fields.
    pub fn signed_with_id(&self, id: &str) -> SignedCertificate {
        let mut cert = sample_certificate();
        cert.set("id", id);
        self.sign(cert)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A [`FileStore`] in a fresh temporary directory.
///
/// The directory is removed when the returned guard drops.
pub fn temp_file_store() -> (TempDir, FileStore) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = FileStore::open(dir.path().join("receipts")).expect("open file store");
    (dir, store)
}

/// Receipt file names currently present in a directory.
pub fn receipt_files(store: &FileStore) -> Vec<ReceiptId> {
    let mut ids: Vec<ReceiptId> = std::fs::read_dir(store.dir())
        .expect("read store dir")
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            entry
                .path()
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse().ok())
        })
        .collect();
    ids.sort();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use wipecert_core::verify;

    #[test]
    fn test_signed_sample_verifies() {
        let fixture = TestFixture::new();
        assert!(verify(&fixture.verifier, &fixture.signed_sample()).is_ok());
        assert!(verify(&fixture.other, &fixture.signed_sample()).is_err());
    }

    #[test]
    fn test_signed_with_id() {
        let fixture = TestFixture::new();
        let signed = fixture.signed_with_id("c-42");
        assert_eq!(signed.unsigned().id(), Some("c-42"));
        assert!(verify(&fixture.verifier, &signed).is_ok());
    }

    #[tokio::test]
    async fn test_temp_file_store() {
        use wipecert_core::Receipt;
        use wipecert_store::ReceiptStore;

        let fixture = TestFixture::new();
        let (_dir, store) = temp_file_store();
        let receipt = Receipt::new(ReceiptId::generate(), fixture.signed_sample(), 1);
        store.put(&receipt).await.unwrap();

        assert_eq!(receipt_files(&store), vec![receipt.id]);
        assert_eq!(store.list().await.unwrap(), receipt_files(&store));
    }
}
