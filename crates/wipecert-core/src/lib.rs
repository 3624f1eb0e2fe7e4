//! # wipecert core
//!
//! Pure primitives for sanitization certificates: field values, canonical
//! encoding, RSA key material, signing, and verification.
//!
//! This crate performs no storage and no networking. The only I/O is reading
//! key files in [`keys`] and streaming media in [`digest`].
//!
//! ## Key Types
//!
//! - [`Certificate`] - unsigned field mapping describing one wipe
//! - [`SignedCertificate`] - a certificate plus its detached `signature` member
//! - [`PrivateKey`] / [`PublicKey`] - RSA key material
//! - [`Receipt`] / [`ReceiptId`] - the record created for a verified certificate
//!
//! ## Canonicalization
//!
//! Signatures cover compact, key-sorted, ASCII-only JSON. See [`canonical`].

pub mod canonical;
pub mod certificate;
pub mod crypto;
pub mod digest;
pub mod error;
pub mod keys;
pub mod receipt;
pub mod value;
pub mod verify;

pub use canonical::{canonical_string, canonicalize};
pub use certificate::{
    Certificate, CertificateBuilder, SignatureRecord, SignedCertificate, CORE_FIELDS,
    SIGNATURE_ALGORITHM, SIGNATURE_FIELD,
};
pub use crypto::{sign, sign_certificate, KeyMaterial, PrivateKey, PublicKey, MIN_MODULUS_BITS};
pub use error::{CertificateError, KeyError, SigningError, VerificationError};
pub use keys::{load_private_key, load_public_key, KeySources};
pub use receipt::{now_millis, Receipt, ReceiptId};
pub use value::{FieldValue, Fields};
pub use verify::{classify, verify, Verdict};
