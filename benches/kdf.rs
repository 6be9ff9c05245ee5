//! benches/kdf.rs
//! Passphrase stretching across work factors, plus per-block key derivation
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lrzcrypt_rs::aliases::{Passphrase, Salt16};
use lrzcrypt_rs::{derive_block_keys, stretch_passphrase};
use std::hint::black_box;
use std::time::Duration;

fn kdf_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("KDF");
    // Faster runs for slow high-loop benches
    group.measurement_time(Duration::from_secs(8));
    group.sample_size(20);

    let pass = Passphrase::from_slice(b"benchmark-passphrase");
    let salt = Salt16::new([0x42; 16]);

    for &loops in &[1_000u64, 10_000, 100_000, 1_000_000] {
        let id = BenchmarkId::new("stretch_loops", loops);
        group.bench_with_input(id, &loops, |b, &loops| {
            b.iter(|| {
                let hash = stretch_passphrase(black_box(&pass), loops).unwrap();
                black_box(hash);
            });
        });
    }

    let global_hash = stretch_passphrase(&pass, 1_000).unwrap();
    group.bench_function("derive_block_keys", |b| {
        b.iter(|| {
            let keys = derive_block_keys(black_box(&global_hash), black_box(&salt), &pass).unwrap();
            black_box(keys);
        });
    });

    group.finish();
}

criterion_group!(benches, kdf_benches);
criterion_main!(benches);
