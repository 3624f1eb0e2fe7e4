//! Benchmarks for canonical encoding, signing, and verification.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wipecert_core::{canonicalize, verify, Certificate, FieldValue, Fields};
use wipecert_testkit::{sample_certificate, TestFixture};

fn wide_certificate() -> Certificate {
    let mut builder = Certificate::builder("bench-1")
        .device("Model-X")
        .profile("purge")
        .method("secure-erase")
        .timestamp(1_700_000_000)
        .hash("ab".repeat(32));
    for i in 0..64 {
        let mut nested = Fields::new();
        nested.insert("sector".into(), FieldValue::from(i as i64 * 4096));
        nested.insert("note".into(), FieldValue::from(format!("pass {} é", i)));
        builder = builder.field(format!("extent_{:02}", i), nested);
    }
    builder.build()
}

fn bench_canonicalize(c: &mut Criterion) {
    let sample = sample_certificate();
    let wide = wide_certificate();

    c.bench_function("canonicalize/sample", |b| {
        b.iter(|| canonicalize(black_box(sample.fields())))
    });
    c.bench_function("canonicalize/wide", |b| {
        b.iter(|| canonicalize(black_box(wide.fields())))
    });
}

fn bench_sign_verify(c: &mut Criterion) {
    let fixture = TestFixture::new();
    let signed = fixture.signed_sample();

    c.bench_function("sign/sample", |b| {
        b.iter(|| fixture.sign(black_box(sample_certificate())))
    });
    c.bench_function("verify/sample", |b| {
        b.iter(|| verify(black_box(&fixture.verifier), black_box(&signed)))
    });
}

criterion_group!(benches, bench_canonicalize, bench_sign_verify);
criterion_main!(benches);
