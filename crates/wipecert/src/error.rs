//! Error types for the submission service.

use thiserror::Error;
use wipecert_core::{CertificateError, KeyError, SigningError, VerificationError};
use wipecert_store::StoreError;

/// Whether an error describes the input or the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The certificate was unacceptable. Resubmitting it unchanged will fail again.
    Rejection,
    /// Configuration, key material, or storage failed. The input may be fine.
    Fatal,
}

/// Errors that can occur during service operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Key material could not be resolved or decoded.
    #[error("key error: {0}")]
    Key(#[from] KeyError),

    /// The signing key could not produce a signature.
    #[error(transparent)]
    Signing(#[from] SigningError),

    /// Verification reached a terminal rejection.
    #[error("certificate rejected: {0}")]
    Rejected(#[from] VerificationError),

    /// The submitted document is not a certificate.
    #[error("malformed certificate: {0}")]
    MalformedInput(#[from] CertificateError),

    /// The receipt could not be recorded. Safe to retry.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::Rejected(_) | Error::MalformedInput(_) => ErrorClass::Rejection,
            Error::Key(_) | Error::Signing(_) | Error::Storage(_) | Error::Config(_) => {
                ErrorClass::Fatal
            }
        }
    }

    /// Reason string reported to the submitter for rejections.
    pub fn reason(&self) -> String {
        match self {
            Error::Rejected(e) => e.to_string(),
            Error::MalformedInput(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, Error>;
