//! # wipecert
//!
//! Issue and check tamper-evident sanitization certificates.
//!
//! A producer signs a certificate's canonical bytes with its RSA key; a
//! verifier recomputes those bytes, checks the detached signature, and on
//! success records a receipt.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use wipecert::{Config, SubmitResponse};
//!
//! async fn example(body: &[u8]) -> wipecert::Result<SubmitResponse> {
//!     // Keys and receipt directory from PUBKEY_CONTENT, VERIFIER_OUT, HOME, ...
//!     let service = Config::from_env().submission_service()?;
//!
//!     // Rejections come back as `ok: false` with a reason.
//!     service.submit_json(body).await
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `wipecert::core` - certificates, canonical encoding, keys, verification
//! - `wipecert::store` - receipt storage backends

pub mod config;
pub mod error;
pub mod notify;
pub mod response;
pub mod service;

// Re-export component crates
pub use wipecert_core as core;
pub use wipecert_store as store;

pub use config::Config;
pub use error::{Error, ErrorClass, Result};
pub use notify::{deliver, DeliveryReport, Notifier, NotifyError, RetryPolicy};
pub use response::{SubmitResponse, VerifyResponse};
pub use service::SubmissionService;

// Re-export commonly used core types
pub use wipecert_core::{
    canonicalize, classify, sign, sign_certificate, verify, Certificate, FieldValue, Fields,
    PrivateKey, PublicKey, Receipt, ReceiptId, SignatureRecord, SignedCertificate,
    VerificationError, Verdict,
};
pub use wipecert_store::{FileStore, MemoryStore, ReceiptStore, SqliteStore};
