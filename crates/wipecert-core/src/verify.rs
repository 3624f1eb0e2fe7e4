//! Verification of signed certificates.
//!
//! Each call is a pure function of the public key and the certificate. The
//! checks run in a fixed order and stop at the first failure:
//!
//! 1. a usable `signature` member exists
//! 2. `alg` is the one recognized algorithm
//! 3. `hex` decodes to signature bytes
//! 4. the remaining fields are canonicalized
//! 5. the signature is checked against the canonical bytes

use std::fmt;

use tracing::{debug, warn};

use crate::certificate::{SignedCertificate, SIGNATURE_ALGORITHM};
use crate::crypto::PublicKey;
use crate::error::VerificationError;
use crate::value::FieldValue;

/// Terminal outcome of a verification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    /// Well-formed but the signature does not match.
    Rejected(VerificationError),
    /// The signature member is absent or unusable.
    MalformedInput(VerificationError),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }

    /// Reason string for anything other than `Valid`.
    pub fn reason(&self) -> Option<String> {
        match self {
            Verdict::Valid => None,
            Verdict::Rejected(e) | Verdict::MalformedInput(e) => Some(e.to_string()),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Valid => f.write_str("valid"),
            Verdict::Rejected(e) => write!(f, "rejected: {}", e),
            Verdict::MalformedInput(e) => write!(f, "malformed input: {}", e),
        }
    }
}

/// Map a verification result to its verdict.
pub fn classify(result: &Result<(), VerificationError>) -> Verdict {
    match result {
        Ok(()) => Verdict::Valid,
        Err(e) if e.is_malformed_input() => Verdict::MalformedInput(e.clone()),
        Err(e) => Verdict::Rejected(e.clone()),
    }
}

/// Extract and decode the signature bytes from the `signature` member.
fn decode_signature(field: Option<&FieldValue>) -> Result<Vec<u8>, VerificationError> {
    let record = match field.and_then(FieldValue::as_map) {
        Some(map) => map,
        None => return Err(VerificationError::MissingSignature),
    };

    let alg = record.get("alg");
    let hex_field = record.get("hex");
    if alg.is_none() && hex_field.is_none() {
        return Err(VerificationError::MissingSignature);
    }

    match alg.and_then(FieldValue::as_str) {
        Some(SIGNATURE_ALGORITHM) => {}
        Some(other) => return Err(VerificationError::UnsupportedAlgorithm(other.to_string())),
        None => {
            let shown = alg.map(FieldValue::type_name).unwrap_or("<absent>");
            return Err(VerificationError::UnsupportedAlgorithm(shown.to_string()));
        }
    }

    let hex_text = match hex_field {
        Some(FieldValue::Text(s)) => s,
        Some(other) => {
            return Err(VerificationError::MalformedSignatureEncoding(format!(
                "hex must be a string, got {}",
                other.type_name()
            )))
        }
        None => {
            return Err(VerificationError::MalformedSignatureEncoding(
                "hex is missing".to_string(),
            ))
        }
    };

    hex::decode(hex_text).map_err(|e| VerificationError::MalformedSignatureEncoding(e.to_string()))
}

/// Verify a signed certificate against a public key.
pub fn verify(key: &PublicKey, certificate: &SignedCertificate) -> Result<(), VerificationError> {
    let result = verify_inner(key, certificate);
    match &result {
        Ok(()) => debug!(fingerprint = key.fingerprint(), "certificate signature valid"),
        Err(e) => warn!(code = e.code(), reason = %e, "certificate verification failed"),
    }
    result
}

fn verify_inner(key: &PublicKey, certificate: &SignedCertificate) -> Result<(), VerificationError> {
    let signature = decode_signature(certificate.signature_field())?;
    let message = certificate.canonical_bytes();
    if key.verify_bytes(&message, &signature) {
        Ok(())
    } else {
        Err(VerificationError::InvalidSignature)
    }
}
