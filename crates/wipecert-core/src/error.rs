//! Error types for the wipecert core.

use thiserror::Error;

/// Errors raised while resolving or decoding key material.
///
/// These are fatal to any operation that needs the key.
#[derive(Debug, Error)]
pub enum KeyError {
    /// No configured source produced key bytes.
    #[error("no {kind} key found: {detail}")]
    NotFound { kind: &'static str, detail: String },

    /// Key bytes exist but do not decode as an RSA key of the expected format.
    #[error("failed to parse {kind} key from {source_name}: {reason}")]
    Parse {
        kind: &'static str,
        source_name: String,
        reason: String,
    },

    /// The modulus is below the accepted minimum.
    #[error("{kind} key modulus is {bits} bits, minimum is {minimum}")]
    TooWeak {
        kind: &'static str,
        bits: usize,
        minimum: usize,
    },
}

/// The private key could not produce a signature.
#[derive(Debug, Error)]
#[error("signing failed: {0}")]
pub struct SigningError(pub String);

/// Terminal rejection outcomes of a verification attempt.
///
/// None of these are retried; each carries a reportable reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("certificate carries no signature")]
    MissingSignature,

    #[error("unsupported signature algorithm: {0:?}")]
    UnsupportedAlgorithm(String),

    #[error("malformed signature encoding: {0}")]
    MalformedSignatureEncoding(String),

    #[error("signature does not match certificate contents")]
    InvalidSignature,
}

impl VerificationError {
    /// Short stable code for wire responses and logs.
    pub fn code(&self) -> &'static str {
        match self {
            VerificationError::MissingSignature => "missing_signature",
            VerificationError::UnsupportedAlgorithm(_) => "unsupported_algorithm",
            VerificationError::MalformedSignatureEncoding(_) => "malformed_signature_encoding",
            VerificationError::InvalidSignature => "invalid_signature",
        }
    }

    /// True when the input was structurally unusable rather than cryptographically wrong.
    pub fn is_malformed_input(&self) -> bool {
        !matches!(self, VerificationError::InvalidSignature)
    }
}

/// The submitted document is not a certificate at all.
#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("certificate is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("certificate must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}
