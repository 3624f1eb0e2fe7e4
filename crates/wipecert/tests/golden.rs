//! Golden test vectors for cross-implementation verification.
//!
//! Every implementation must produce identical:
//! - canonical bytes for the sample certificate
//! - signature bytes (PKCS#1 v1.5 is deterministic)
//! - verification outcomes for matching, unrelated, and tampered inputs

use wipecert::core::{sign, SignatureRecord, SIGNATURE_ALGORITHM};
use wipecert::{verify, Certificate, SignedCertificate, VerificationError};
use wipecert_testkit::keys::{other_public, signer_private, signer_public};
use wipecert_testkit::vectors::{
    canonical_vectors, sample_certificate, SAMPLE_CANONICAL, SAMPLE_CANONICAL_MODEL_Y,
    SAMPLE_SIGNATURE_HEX,
};

fn golden_signed() -> SignedCertificate {
    let record = SignatureRecord {
        alg: SIGNATURE_ALGORITHM.to_string(),
        hex: SAMPLE_SIGNATURE_HEX.to_string(),
    };
    SignedCertificate::new(sample_certificate(), &record)
}

#[test]
fn golden_canonical_bytes() {
    let bytes = sample_certificate().canonical_bytes();
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        SAMPLE_CANONICAL,
        "canonical encoding drifted"
    );
}

#[test]
fn golden_canonical_vectors() {
    for vector in canonical_vectors() {
        let actual = Certificate::from_fields(vector.fields()).canonical_bytes();
        assert_eq!(
            String::from_utf8(actual).unwrap(),
            vector.expected,
            "vector {:?}",
            vector.name
        );
    }
}

#[test]
fn golden_signature_is_reproduced() {
    let record = sign(&signer_private(), sample_certificate().fields()).unwrap();
    assert_eq!(record.alg, "RSASSA-PKCS1v15");
    assert_eq!(record.hex.len(), 512);
    assert_eq!(record.hex, SAMPLE_SIGNATURE_HEX);
}

#[test]
fn golden_signature_verifies() {
    assert_eq!(verify(&signer_public(), &golden_signed()), Ok(()));
}

#[test]
fn golden_unrelated_key_rejects() {
    assert_eq!(
        verify(&other_public(), &golden_signed()),
        Err(VerificationError::InvalidSignature)
    );
}

#[test]
fn golden_model_y_rejects() {
    let mut tampered = golden_signed();
    tampered
        .fields_mut()
        .insert("device".into(), "Model-Y".into());

    assert_eq!(tampered.canonical_bytes(), SAMPLE_CANONICAL_MODEL_Y.as_bytes());
    assert_eq!(
        verify(&signer_public(), &tampered),
        Err(VerificationError::InvalidSignature)
    );
}

#[test]
fn golden_document_parses_and_verifies() {
    // Key order and whitespace as another producer might write them.
    let document = format!(
        r#"{{
  "timestamp": 1700000000,
  "signature": {{"hex": "{}", "alg": "RSASSA-PKCS1v15"}},
  "profile": "purge",
  "id": "c-1",
  "hash": "aa{}bb",
  "method": "secure-erase",
  "device": "Model-X"
}}"#,
        SAMPLE_SIGNATURE_HEX.to_uppercase(),
        "0".repeat(60)
    );

    let signed = SignedCertificate::from_json(document.as_bytes()).unwrap();
    assert_eq!(signed.canonical_bytes(), SAMPLE_CANONICAL.as_bytes());
    assert_eq!(verify(&signer_public(), &signed), Ok(()));
}
