//! benches/transform.rs
//! Block transform throughput: aligned blocks and the stolen-tail path
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lrzcrypt_rs::aliases::Salt16;
use lrzcrypt_rs::{BlockHeader, Direction, Session};
use std::hint::black_box;

fn bench_transform(c: &mut Criterion) {
    let session = Session::new("benchmark", 1_000).unwrap();
    let salt = Salt16::new([0x11; 16]);

    let mut group = c.benchmark_group("transform");
    // 1 KiB, 64 KiB, 1 MiB, 10 MiB, each with and without a 7-byte tail
    for size in [1024usize, 65_536, 1_048_576, 10 * 1_048_576] {
        for len in [size, size + 7] {
            group.throughput(Throughput::Bytes(len as u64));
            let mut buf = vec![0xa5u8; len];
            group.bench_with_input(BenchmarkId::new("encrypt", len), &len, |b, _| {
                b.iter(|| {
                    session
                        .transform_block(black_box(&mut buf), &salt, Direction::Encrypt)
                        .unwrap();
                });
            });
            group.bench_with_input(BenchmarkId::new("decrypt", len), &len, |b, _| {
                b.iter(|| {
                    session
                        .transform_block(black_box(&mut buf), &salt, Direction::Decrypt)
                        .unwrap();
                });
            });
        }
    }
    group.finish();

    let header = BlockHeader {
        c_type: 3,
        c_len: 1 << 20,
        u_len: 4 << 20,
        last_head: 0,
    };
    c.bench_function("seal_open_header", |b| {
        b.iter(|| {
            let record = session.seal_header(black_box(&header), &salt).unwrap();
            black_box(session.open_header(&record, Direction::Decrypt).unwrap());
        });
    });
}

criterion_group!(benches, bench_transform);
criterion_main!(benches);
