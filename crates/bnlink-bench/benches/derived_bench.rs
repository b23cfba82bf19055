//! Pure helper benchmarks.

use bnlink_core::derived::{num_bytes_for_bits, prime_checks_for_size};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

fn bench_prime_checks(c: &mut Criterion) {
    let sizes: &[i32] = &[64, 256, 512, 1024, 2048, 4096, 8192];
    let mut group = c.benchmark_group("prime_checks_for_size");

    for &bits in sizes {
        group.bench_with_input(BenchmarkId::from_parameter(bits), &bits, |b, &bits| {
            b.iter(|| criterion::black_box(prime_checks_for_size(criterion::black_box(bits))));
        });
    }
    group.finish();
}

fn bench_num_bytes(c: &mut Criterion) {
    c.bench_function("num_bytes_for_bits/0..4096", |b| {
        b.iter(|| {
            let total: i32 = (0..4096).map(num_bytes_for_bits).sum();
            criterion::black_box(total);
        });
    });
}

criterion_group!(benches, bench_prime_checks, bench_num_bytes);
criterion_main!(benches);
