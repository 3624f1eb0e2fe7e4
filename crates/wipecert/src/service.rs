//! The submission service: verify, then record a receipt.
//!
//! The service owns its verifying key and storage handle. It holds no other
//! state, so one instance can be shared across any number of concurrent
//! submissions.

use std::sync::Arc;

use tracing::{debug, info};
use wipecert_core::{
    classify, now_millis, verify, FieldValue, PublicKey, Receipt, ReceiptId, SignedCertificate,
    VerificationError, Verdict,
};
use wipecert_store::ReceiptStore;

use crate::error::{Error, ErrorClass, Result};
use crate::response::{SubmitResponse, VerifyResponse};

/// Verifies signed certificates and issues receipts for the valid ones.
pub struct SubmissionService<S: ReceiptStore> {
    public_key: PublicKey,
    store: Arc<S>,
}

impl<S: ReceiptStore> SubmissionService<S> {
    /// Create a service around an already-loaded verifying key.
    pub fn new(public_key: PublicKey, store: S) -> Self {
        Self {
            public_key,
            store: Arc::new(store),
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Check a certificate without storing anything.
    pub fn verify(
        &self,
        certificate: &SignedCertificate,
    ) -> std::result::Result<(), VerificationError> {
        verify(&self.public_key, certificate)
    }

    /// Verify a certificate and, only if it is valid, record a receipt.
    ///
    /// Every successful call yields a fresh identifier; identical payloads
    /// submitted twice produce two receipts.
    pub async fn submit(&self, certificate: SignedCertificate) -> Result<ReceiptId> {
        self.verify(&certificate)?;

        let id = ReceiptId::generate();
        let cert_id = certificate
            .fields()
            .get("id")
            .and_then(FieldValue::as_str)
            .map(str::to_owned);
        let receipt = Receipt::new(id, certificate, now_millis());
        self.store.put(&receipt).await?;

        info!(receipt_id = %id, cert_id = ?cert_id, "receipt stored");
        Ok(id)
    }

    /// Fetch a previously issued receipt.
    pub async fn receipt(&self, id: &ReceiptId) -> Result<Option<Receipt>> {
        Ok(self.store.get(id).await?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // JSON entry points
    // ─────────────────────────────────────────────────────────────────────────

    /// Verify a signed-certificate JSON document.
    ///
    /// Never fails: unparseable input is reported as invalid with a reason.
    pub fn verify_json(&self, body: &[u8]) -> VerifyResponse {
        let certificate = match SignedCertificate::from_json(body) {
            Ok(certificate) => certificate,
            Err(e) => {
                debug!(reason = %e, "verification input is not a certificate");
                return VerifyResponse::invalid(e.to_string());
            }
        };
        let verdict: Verdict = classify(&self.verify(&certificate));
        VerifyResponse::from(&verdict)
    }

    /// Submit a signed-certificate JSON document.
    ///
    /// Rejections and malformed input come back as `Ok` with `ok: false`.
    /// Only fatal errors (storage, keys) are returned as `Err`.
    pub async fn submit_json(&self, body: &[u8]) -> Result<SubmitResponse> {
        let outcome = match SignedCertificate::from_json(body) {
            Ok(certificate) => self.submit(certificate).await,
            Err(e) => Err(Error::from(e)),
        };

        match outcome {
            Ok(id) => Ok(SubmitResponse::accepted(id)),
            Err(e) if e.class() == ErrorClass::Rejection => {
                Ok(SubmitResponse::rejected(e.reason()))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use wipecert_store::{MemoryStore, StoreError};
    use wipecert_testkit::TestFixture;

    /// A store whose writes always fail.
    struct BrokenStore;

    #[async_trait]
    impl ReceiptStore for BrokenStore {
        async fn put(&self, _receipt: &Receipt) -> wipecert_store::Result<()> {
            Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )))
        }

        async fn get(&self, _id: &ReceiptId) -> wipecert_store::Result<Option<Receipt>> {
            Ok(None)
        }

        async fn list(&self) -> wipecert_store::Result<Vec<ReceiptId>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_submit_stores_valid_certificate() {
        let fixture = TestFixture::new();
        let service = SubmissionService::new(fixture.public_key(), MemoryStore::new());
        let signed = fixture.signed_sample();

        let id = service.submit(signed.clone()).await.unwrap();

        let receipt = service.receipt(&id).await.unwrap().unwrap();
        assert_eq!(receipt.id, id);
        assert_eq!(receipt.payload, signed);
        assert!(receipt.stored_at > 0);
    }

    #[tokio::test]
    async fn test_submit_rejects_without_storing() {
        let fixture = TestFixture::new();
        let service = SubmissionService::new(fixture.public_key(), MemoryStore::new());
        let mut signed = fixture.signed_sample();
        signed.fields_mut().insert("device".into(), "Model-Y".into());

        let err = service.submit(signed).await.unwrap_err();
        assert!(matches!(err, Error::Rejected(VerificationError::InvalidSignature)));
        assert_eq!(service.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_resubmission_is_not_deduplicated() {
        let fixture = TestFixture::new();
        let service = SubmissionService::new(fixture.public_key(), MemoryStore::new());
        let signed = fixture.signed_sample();

        let a = service.submit(signed.clone()).await.unwrap();
        let b = service.submit(signed).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(service.store().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_storage_failure_is_fatal() {
        let fixture = TestFixture::new();
        let service = SubmissionService::new(fixture.public_key(), BrokenStore);
        let body = fixture.signed_sample().to_json_pretty().unwrap();

        let err = service.submit_json(body.as_bytes()).await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::Fatal);
        assert!(matches!(err, Error::Storage(_)));
    }

    #[tokio::test]
    async fn test_submit_json_reports_rejections() {
        let fixture = TestFixture::new();
        let service = SubmissionService::new(fixture.public_key(), MemoryStore::new());

        let response = service.submit_json(b"[1, 2, 3]").await.unwrap();
        assert!(!response.ok);
        assert!(response.receipt_id.is_none());
        assert!(response.reason.is_some());

        let response = service.submit_json(b"{\"id\": \"c-1\"}").await.unwrap();
        assert_eq!(
            response,
            SubmitResponse::rejected(VerificationError::MissingSignature.to_string())
        );
        assert_eq!(service.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_verify_json() {
        let fixture = TestFixture::new();
        let service = SubmissionService::new(fixture.public_key(), MemoryStore::new());
        let body = fixture.signed_sample().to_json_pretty().unwrap();

        assert_eq!(service.verify_json(body.as_bytes()), VerifyResponse::valid());

        let response = service.verify_json(b"not json");
        assert!(!response.valid);
        assert!(response.reason.unwrap().contains("not valid JSON"));
    }
}
