//! Field cipher throughput.

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use transposit_core::crypto::{AesCbcCipher, EncryptionKey, FieldCipher};

fn bench_cipher(c: &mut Criterion) {
    let cipher = AesCbcCipher::new(EncryptionKey::from_bytes([42u8; 32]));
    let envelope = cipher.encode("123456789012").unwrap();

    c.bench_function("encode_account_number", |b| {
        b.iter(|| cipher.encode(black_box("123456789012")));
    });

    c.bench_function("decode_account_number", |b| {
        b.iter(|| cipher.decode(black_box(&envelope)));
    });
}

criterion_group!(benches, bench_cipher);
criterion_main!(benches);
