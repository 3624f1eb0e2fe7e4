//! Golden test vectors for cross-implementation verification.
//!
//! The canonical bytes were produced by an independent encoder
//! (`sort_keys`, compact separators, ASCII-only output), and the signature by
//! an independent PKCS#1 v1.5 / SHA-256 implementation using
//! [`SIGNER_PRIVATE_PEM`](crate::keys::SIGNER_PRIVATE_PEM). Every
//! implementation must reproduce them byte for byte.

use wipecert_core::{Certificate, FieldValue, Fields};

/// Canonical bytes of [`sample_certificate`].
pub const SAMPLE_CANONICAL: &str = r#"{"device":"Model-X","hash":"aa000000000000000000000000000000000000000000000000000000000000bb","id":"c-1","method":"secure-erase","profile":"purge","timestamp":1700000000}"#;

/// Canonical bytes of [`sample_certificate`] with `device` set to `Model-Y`.
pub const SAMPLE_CANONICAL_MODEL_Y: &str = r#"{"device":"Model-Y","hash":"aa000000000000000000000000000000000000000000000000000000000000bb","id":"c-1","method":"secure-erase","profile":"purge","timestamp":1700000000}"#;

/// Signature of [`SAMPLE_CANONICAL`] under the testkit signer, lowercase hex.
pub const SAMPLE_SIGNATURE_HEX: &str = concat!(
    "3113dab5f72bcf36c618464c39ece7260ec7d5c81e704013f5ee4f922be867c8",
    "c9939a4686a2fa509beafc9b0d141cd7f40060e38b03f15f7aa1048fb0530f96",
    "932d729b32c27010bd9f8467193649b33272c4854fcaf0f3c923034063e45ca5",
    "927b067ef6e748f05539a496b7fcd29909ea713f6d480df796770c396509dfc6",
    "3a0a6b3a4e101403e6e8b5ba0531b3eb3b61300ae09bbd628ebbea69d54c9f70",
    "3a380b8dfb7a82eeaa4b9575dd3e3afe48649adabf2bd23070efaed69bfeebfc",
    "eece09978af773715a48c7b114afcfef384a75796e8d980d8c257daa4a860d7f",
    "0b370098733a109b1d1512d3b3399b129a82cb48f060568cf5d41d1783c46367",
);

/// The concrete scenario certificate.
pub fn sample_certificate() -> Certificate {
    Certificate::builder("c-1")
        .device("Model-X")
        .profile("purge")
        .method("secure-erase")
        .timestamp(1_700_000_000)
        .hash(format!("aa{}bb", "0".repeat(60)))
        .build()
}

/// A canonical encoding test case.
#[derive(Debug, Clone)]
pub struct CanonicalVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Input document, in arbitrary key order and formatting.
    pub input: &'static str,
    /// Expected canonical text.
    pub expected: &'static str,
}

impl CanonicalVector {
    /// Parse the input document into fields.
    pub fn fields(&self) -> Fields {
        match serde_json::from_str::<serde_json::Value>(self.input).map(FieldValue::from) {
            Ok(FieldValue::Map(fields)) => fields,
            other => panic!("vector {:?} is not a JSON object: {:?}", self.name, other),
        }
    }
}

/// Get all canonical encoding vectors.
pub fn canonical_vectors() -> Vec<CanonicalVector> {
    vec![
        CanonicalVector {
            name: "nested mapping and list",
            input: r#"{"z":{"b":1,"a":[1,"é",null,true]},"m":"tab\tq\"\\","a":-2.5}"#,
            expected: r#"{"a":-2.5,"m":"tab\tq\"\\","z":{"a":[1,"\u00e9",null,true],"b":1}}"#,
        },
        CanonicalVector {
            name: "non-ascii keys sort by code point",
            input: r#"{"z":2,"é":1,"A":3,"aa":4,"a":5}"#,
            expected: r#"{"A":3,"a":5,"aa":4,"z":2,"\u00e9":1}"#,
        },
        CanonicalVector {
            name: "astral and control characters",
            input: r#"{"s":"\u0001 \u007f \ud83d\ude00 \u2028 /"}"#,
            expected: r#"{"s":"\u0001 \u007f \ud83d\ude00 \u2028 /"}"#,
        },
        CanonicalVector {
            name: "float forms",
            input: r#"{"f":[0.1,1e-05,1e16,123456789.125,-0.0,1.5e300,100.0,2.5e-7]}"#,
            expected: r#"{"f":[0.1,1e-05,1e+16,123456789.125,-0.0,1.5e+300,100.0,2.5e-07]}"#,
        },
        CanonicalVector {
            name: "integers",
            input: r#"{"i":[0,-1,9007199254740993,18446744073709551615,-9223372036854775808]}"#,
            expected: r#"{"i":[0,-1,9007199254740993,18446744073709551615,-9223372036854775808]}"#,
        },
        CanonicalVector {
            name: "integers beyond 64 bits and negative zero",
            input: r#"{"i":[-0,18446744073709551616,-18446744073709551617,123456789012345678901234567890]}"#,
            expected: r#"{"i":[0,18446744073709551616,-18446744073709551617,123456789012345678901234567890]}"#,
        },
        CanonicalVector {
            name: "float literal spellings",
            input: r#"{"f":[1.50,1E5,1e400,-1e400,10.0e15]}"#,
            expected: r#"{"f":[1.5,100000.0,Infinity,-Infinity,1e+16]}"#,
        },
        CanonicalVector {
            name: "empty containers",
            input: r#"{"e":{},"l":[],"n":null,"t":"","b":false}"#,
            expected: r#"{"b":false,"e":{},"l":[],"n":null,"t":""}"#,
        },
        CanonicalVector {
            name: "signature member is not part of the certificate",
            input: r#"{"id":"c-1","signature":{"alg":"RSASSA-PKCS1v15","hex":"00"}}"#,
            expected: r#"{"id":"c-1"}"#,
        },
    ]
}

/// Check every canonical vector and return the names of any that fail.
pub fn failing_canonical_vectors() -> Vec<&'static str> {
    canonical_vectors()
        .into_iter()
        .filter(|v| Certificate::from_fields(v.fields()).canonical_bytes() != v.expected.as_bytes())
        .map(|v| v.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_canonical() {
        assert_eq!(
            sample_certificate().canonical_bytes(),
            SAMPLE_CANONICAL.as_bytes()
        );
    }

    #[test]
    fn test_all_canonical_vectors() {
        assert!(
            failing_canonical_vectors().is_empty(),
            "failing: {:?}",
            failing_canonical_vectors()
        );
    }

    #[test]
    fn test_signature_hex_shape() {
        assert_eq!(SAMPLE_SIGNATURE_HEX.len(), 512);
        assert!(hex::decode(SAMPLE_SIGNATURE_HEX).is_ok());
    }
}
