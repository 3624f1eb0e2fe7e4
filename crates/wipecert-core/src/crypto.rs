//! Cryptographic primitives: RSA key material and RSASSA-PKCS1-v1_5 / SHA-256.
//!
//! PKCS#1 v1.5 signatures are deterministic: the same key and message always
//! yield the same bytes, which is what the golden vectors rely on.

use std::fmt;

use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

use crate::certificate::{Certificate, SignatureRecord, SignedCertificate};
use crate::error::{KeyError, SigningError};
use crate::value::Fields;

/// Smallest accepted RSA modulus.
pub const MIN_MODULUS_BITS: usize = 2048;

/// Exact bit length of the modulus. `size()` rounds up to whole bytes.
fn modulus_bits(key: &impl PublicKeyParts) -> usize {
    key.n().bits()
}

fn check_strength(kind: &'static str, bits: usize) -> Result<(), KeyError> {
    if bits < MIN_MODULUS_BITS {
        return Err(KeyError::TooWeak {
            kind,
            bits,
            minimum: MIN_MODULUS_BITS,
        });
    }
    Ok(())
}

/// An RSA private key used to sign certificates.
#[derive(Clone)]
pub struct PrivateKey {
    inner: RsaPrivateKey,
}

impl PrivateKey {
    /// Wrap an RSA key, enforcing the minimum modulus size.
    pub fn from_rsa(inner: RsaPrivateKey) -> Result<Self, KeyError> {
        check_strength("private", modulus_bits(&inner))?;
        Ok(Self { inner })
    }

    /// Decode a PEM private key: PKCS#8 first, PKCS#1 as fallback.
    pub fn from_pem(pem: &str, source_name: &str) -> Result<Self, KeyError> {
        let inner = RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|pkcs8_err| {
                RsaPrivateKey::from_pkcs1_pem(pem).map_err(|_| pkcs8_err.to_string())
            })
            .map_err(|reason| KeyError::Parse {
                kind: "private",
                source_name: source_name.to_string(),
                reason,
            })?;
        Self::from_rsa(inner)
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        modulus_bits(&self.inner)
    }

    /// Derive the matching public key.
    pub fn public_key(&self) -> Result<PublicKey, KeyError> {
        PublicKey::from_rsa(self.inner.to_public_key())
    }

    /// Sign raw message bytes with PKCS#1 v1.5 over SHA-256.
    pub fn sign_bytes(&self, message: &[u8]) -> Result<Vec<u8>, SigningError> {
        let hashed = Sha256::digest(message);
        let mut rng = rand::thread_rng();
        self.inner
            .sign_with_rng(&mut rng, Pkcs1v15Sign::new::<Sha256>(), &hashed)
            .map_err(|e| SigningError(e.to_string()))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey(RSA-{})", self.bits())
    }
}

/// An RSA public key used to verify certificates.
#[derive(Clone)]
pub struct PublicKey {
    inner: RsaPublicKey,
    fingerprint: String,
}

impl PublicKey {
    /// Wrap an RSA key, enforcing the minimum modulus size.
    pub fn from_rsa(inner: RsaPublicKey) -> Result<Self, KeyError> {
        check_strength("public", modulus_bits(&inner))?;
        let der = inner.to_public_key_der().map_err(|e| KeyError::Parse {
            kind: "public",
            source_name: "in-memory key".to_string(),
            reason: e.to_string(),
        })?;
        let fingerprint = hex::encode(Sha256::digest(der.as_bytes()));
        Ok(Self { inner, fingerprint })
    }

    /// Decode a PEM public key: SubjectPublicKeyInfo first, PKCS#1 as fallback.
    pub fn from_pem(pem: &str, source_name: &str) -> Result<Self, KeyError> {
        let inner = RsaPublicKey::from_public_key_pem(pem)
            .or_else(|spki_err| {
                RsaPublicKey::from_pkcs1_pem(pem).map_err(|_| spki_err.to_string())
            })
            .map_err(|reason| KeyError::Parse {
                kind: "public",
                source_name: source_name.to_string(),
                reason,
            })?;
        Self::from_rsa(inner)
    }

    pub fn bits(&self) -> usize {
        modulus_bits(&self.inner)
    }

    /// Length in bytes of every signature this key verifies.
    pub fn signature_len(&self) -> usize {
        self.inner.size()
    }

    /// SHA-256 of the SubjectPublicKeyInfo DER, lowercase hex.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Check a PKCS#1 v1.5 / SHA-256 signature over raw message bytes.
    pub fn verify_bytes(&self, message: &[u8], signature: &[u8]) -> bool {
        let hashed = Sha256::digest(message);
        self.inner
            .verify(Pkcs1v15Sign::new::<Sha256>(), &hashed, signature)
            .is_ok()
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for PublicKey {}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey(RSA-{}, {})", self.bits(), &self.fingerprint[..16])
    }
}

/// Key material tagged by role.
#[derive(Debug, Clone)]
pub enum KeyMaterial {
    Private(PrivateKey),
    Public(PublicKey),
}

impl KeyMaterial {
    pub fn kind(&self) -> &'static str {
        match self {
            KeyMaterial::Private(_) => "private",
            KeyMaterial::Public(_) => "public",
        }
    }

    /// The signing key. Public material cannot sign.
    pub fn signing_key(&self) -> Result<&PrivateKey, SigningError> {
        match self {
            KeyMaterial::Private(key) => Ok(key),
            KeyMaterial::Public(_) => Err(SigningError(
                "public key material cannot produce signatures".into(),
            )),
        }
    }

    /// The verifying key, derived from private material when needed.
    pub fn verifying_key(&self) -> Result<PublicKey, KeyError> {
        match self {
            KeyMaterial::Private(key) => key.public_key(),
            KeyMaterial::Public(key) => Ok(key.clone()),
        }
    }
}

impl From<PrivateKey> for KeyMaterial {
    fn from(key: PrivateKey) -> Self {
        KeyMaterial::Private(key)
    }
}

impl From<PublicKey> for KeyMaterial {
    fn from(key: PublicKey) -> Self {
        KeyMaterial::Public(key)
    }
}

/// Produce a detached signature over the canonical form of `fields`.
///
/// Any existing `signature` member is excluded before canonicalization.
pub fn sign(key: &PrivateKey, fields: &Fields) -> Result<SignatureRecord, SigningError> {
    let message = Certificate::from_fields(fields.clone()).canonical_bytes();
    let signature = key.sign_bytes(&message)?;
    Ok(SignatureRecord::new(&signature))
}

/// Sign a certificate and attach the signature record.
pub fn sign_certificate(
    key: &PrivateKey,
    certificate: Certificate,
) -> Result<SignedCertificate, SigningError> {
    let record = sign(key, certificate.fields())?;
    Ok(SignedCertificate::new(certificate, &record))
}
