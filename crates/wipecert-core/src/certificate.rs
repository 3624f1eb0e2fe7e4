//! Certificates and signed certificates.
//!
//! A [`Certificate`] is the unsigned field mapping produced by a
//! sanitization run. A [`SignedCertificate`] is the same mapping plus a
//! `signature` member; it is kept exactly as received so that a receipt
//! stores the payload verbatim.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::canonical::canonicalize;
use crate::error::CertificateError;
use crate::value::{FieldValue, Fields};

/// Name of the member holding the detached signature.
pub const SIGNATURE_FIELD: &str = "signature";

/// Fields every certificate is expected to carry.
pub const CORE_FIELDS: [&str; 6] = ["id", "device", "profile", "method", "timestamp", "hash"];

/// The signature algorithm identifier written and accepted.
pub const SIGNATURE_ALGORITHM: &str = "RSASSA-PKCS1v15";

/// Parse a JSON document into a top-level field mapping.
fn parse_object(bytes: &[u8]) -> Result<Fields, CertificateError> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    match FieldValue::from(value) {
        FieldValue::Map(fields) => Ok(fields),
        other => Err(CertificateError::NotAnObject(other.type_name())),
    }
}

/// An unsigned certificate.
///
/// Never contains a `signature` member.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Certificate {
    fields: Fields,
}

impl Certificate {
    /// Build from a field mapping, discarding any `signature` member.
    pub fn from_fields(mut fields: Fields) -> Self {
        fields.remove(SIGNATURE_FIELD);
        Self { fields }
    }

    /// Parse from JSON bytes. A `signature` member is discarded.
    pub fn from_json(bytes: &[u8]) -> Result<Self, CertificateError> {
        parse_object(bytes).map(Self::from_fields)
    }

    /// Start building a certificate with the given identifier.
    pub fn builder(id: impl Into<String>) -> CertificateBuilder {
        CertificateBuilder::new(id)
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn into_fields(self) -> Fields {
        self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Set a field, returning the previous value.
    ///
    /// `signature` is reserved and is ignored here.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        let name = name.into();
        if name == SIGNATURE_FIELD {
            warn!("ignoring attempt to set reserved field on unsigned certificate");
            return None;
        }
        self.fields.insert(name, value.into())
    }

    pub fn id(&self) -> Option<&str> {
        self.get("id").and_then(FieldValue::as_str)
    }

    pub fn device(&self) -> Option<&str> {
        self.get("device").and_then(FieldValue::as_str)
    }

    pub fn profile(&self) -> Option<&str> {
        self.get("profile").and_then(FieldValue::as_str)
    }

    pub fn method(&self) -> Option<&str> {
        self.get("method").and_then(FieldValue::as_str)
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.get("timestamp").and_then(FieldValue::as_i64)
    }

    pub fn hash(&self) -> Option<&str> {
        self.get("hash").and_then(FieldValue::as_str)
    }

    /// Core fields that are absent.
    ///
    /// Advisory only; signing and verification cover whatever fields exist.
    pub fn missing_core_fields(&self) -> Vec<&'static str> {
        CORE_FIELDS
            .iter()
            .copied()
            .filter(|name| !self.fields.contains_key(*name))
            .collect()
    }

    /// The bytes a signature covers.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        canonicalize(&self.fields)
    }
}

/// Builder for certificates.
#[derive(Debug, Clone)]
pub struct CertificateBuilder {
    fields: Fields,
}

impl CertificateBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        let mut fields = Fields::new();
        fields.insert("id".into(), FieldValue::Text(id.into()));
        Self { fields }
    }

    pub fn device(self, device: impl Into<String>) -> Self {
        self.field("device", FieldValue::Text(device.into()))
    }

    pub fn profile(self, profile: impl Into<String>) -> Self {
        self.field("profile", FieldValue::Text(profile.into()))
    }

    pub fn method(self, method: impl Into<String>) -> Self {
        self.field("method", FieldValue::Text(method.into()))
    }

    /// Unix seconds.
    pub fn timestamp(self, timestamp: i64) -> Self {
        self.field("timestamp", timestamp)
    }

    /// Lowercase hex digest of the sanitized medium.
    pub fn hash(self, hash: impl Into<String>) -> Self {
        self.field("hash", FieldValue::Text(hash.into()))
    }

    /// Add an arbitrary extra field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let name = name.into();
        if name != SIGNATURE_FIELD {
            self.fields.insert(name, value.into());
        }
        self
    }

    pub fn build(self) -> Certificate {
        Certificate {
            fields: self.fields,
        }
    }
}

/// The `signature` member written by the signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    pub alg: String,
    /// Lowercase hex of the raw signature bytes.
    pub hex: String,
}

impl SignatureRecord {
    pub fn new(signature: &[u8]) -> Self {
        Self {
            alg: SIGNATURE_ALGORITHM.to_string(),
            hex: hex::encode(signature),
        }
    }

    pub fn to_field_value(&self) -> FieldValue {
        let mut map = Fields::new();
        map.insert("alg".into(), FieldValue::Text(self.alg.clone()));
        map.insert("hex".into(), FieldValue::Text(self.hex.clone()));
        FieldValue::Map(map)
    }
}

/// A certificate as received by a verifier: all fields, including
/// whatever `signature` member (if any) it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedCertificate {
    fields: Fields,
}

impl SignedCertificate {
    /// Attach a signature record to a certificate.
    pub fn new(certificate: Certificate, signature: &SignatureRecord) -> Self {
        let mut fields = certificate.into_fields();
        fields.insert(SIGNATURE_FIELD.into(), signature.to_field_value());
        Self { fields }
    }

    /// Wrap a raw field mapping without inspecting it.
    pub fn from_fields(fields: Fields) -> Self {
        Self { fields }
    }

    /// Parse from JSON bytes. The signature member is not validated here.
    pub fn from_json(bytes: &[u8]) -> Result<Self, CertificateError> {
        parse_object(bytes).map(Self::from_fields)
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Mutable access to the raw fields.
    pub fn fields_mut(&mut self) -> &mut Fields {
        &mut self.fields
    }

    /// The raw `signature` member, if present.
    pub fn signature_field(&self) -> Option<&FieldValue> {
        self.fields.get(SIGNATURE_FIELD)
    }

    /// The certificate the signature covers.
    pub fn unsigned(&self) -> Certificate {
        Certificate::from_fields(self.fields.clone())
    }

    /// The bytes the signature covers.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        self.unsigned().canonical_bytes()
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        FieldValue::Map(self.fields.clone()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Certificate {
        Certificate::builder("c-1")
            .device("Model-X")
            .profile("purge")
            .method("secure-erase")
            .timestamp(1700000000)
            .hash("aabb")
            .build()
    }

    #[test]
    fn test_builder_sets_core_fields() {
        let cert = sample();
        assert_eq!(cert.id(), Some("c-1"));
        assert_eq!(cert.device(), Some("Model-X"));
        assert_eq!(cert.profile(), Some("purge"));
        assert_eq!(cert.method(), Some("secure-erase"));
        assert_eq!(cert.timestamp(), Some(1700000000));
        assert_eq!(cert.hash(), Some("aabb"));
        assert!(cert.missing_core_fields().is_empty());
    }

    #[test]
    fn test_missing_core_fields() {
        let cert = Certificate::builder("c-2").device("d").build();
        assert_eq!(
            cert.missing_core_fields(),
            vec!["profile", "method", "timestamp", "hash"]
        );
    }

    #[test]
    fn test_signature_excluded_from_unsigned() {
        let record = SignatureRecord {
            alg: SIGNATURE_ALGORITHM.into(),
            hex: "00ff".into(),
        };
        let signed = SignedCertificate::new(sample(), &record);
        assert!(signed.signature_field().is_some());
        assert!(signed.unsigned().get(SIGNATURE_FIELD).is_none());
        assert_eq!(signed.canonical_bytes(), sample().canonical_bytes());
    }

    #[test]
    fn test_reserved_field_cannot_be_set() {
        let mut cert = sample();
        assert!(cert.set(SIGNATURE_FIELD, "x").is_none());
        assert!(cert.get(SIGNATURE_FIELD).is_none());

        let built = Certificate::builder("c-3").field(SIGNATURE_FIELD, "x").build();
        assert!(built.get(SIGNATURE_FIELD).is_none());
    }

    #[test]
    fn test_from_json_preserves_unknown_fields() {
        let json = br#"{"id":"c-1","operator":{"name":"jd"},"signature":{"alg":"x","hex":"y"}}"#;
        let signed = SignedCertificate::from_json(json).unwrap();
        assert_eq!(signed.fields().len(), 3);

        let cert = Certificate::from_json(json).unwrap();
        assert_eq!(cert.fields().len(), 2);
        assert!(cert.get("operator").is_some());
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(matches!(
            SignedCertificate::from_json(b"[1,2]"),
            Err(CertificateError::NotAnObject("array"))
        ));
        assert!(matches!(
            SignedCertificate::from_json(b"{not json"),
            Err(CertificateError::Json(_))
        ));
    }

    #[test]
    fn test_pretty_json_roundtrip() {
        let record = SignatureRecord::new(&[0xde, 0xad]);
        let signed = SignedCertificate::new(sample(), &record);
        let text = signed.to_json_pretty().unwrap();
        let back = SignedCertificate::from_json(text.as_bytes()).unwrap();
        assert_eq!(back, signed);
    }
}
