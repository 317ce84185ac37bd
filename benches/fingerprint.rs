//! Benchmarks for shingle extraction and comparison.
//!
//! Extraction is linear in document length; comparisons are linear in
//! `tabs × courses` (shingles) or `tabs` (SimHash).

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::*;
use shinglesketch::popcount::{hamming, hamming_portable};
use shinglesketch::{shingles_calc, shingles_dist, sim_hash, sim_hash_text, sim_hashes_dist};

// === Generators ===

fn random_text(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            if rng.gen_ratio(1, 6) {
                b' '
            } else {
                b'a' + rng.gen_range(0..26u8)
            }
        })
        .collect()
}

// === Benchmarks ===

fn bench_shingles_calc(c: &mut Criterion) {
    let mut group = c.benchmark_group("shingles_calc");

    for len in [1_024usize, 16_384, 262_144].iter() {
        group.throughput(Throughput::Bytes(*len as u64));
        let text = random_text(*len, 42);

        group.bench_with_input(BenchmarkId::from_parameter(len), len, |bench, _| {
            bench.iter(|| shingles_calc(black_box(&text), 32, 29, 10));
        });
    }

    group.finish();
}

fn bench_tabs(c: &mut Criterion) {
    let mut group = c.benchmark_group("sim_hash_text_tabs");
    let text = random_text(16_384, 7);

    for tabs in [1usize, 4, 10, 32].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(tabs), tabs, |bench, &tabs| {
            bench.iter(|| sim_hash_text(black_box(&text), 32, 29, tabs));
        });
    }

    group.finish();
}

fn bench_compare(c: &mut Criterion) {
    let a = shingles_calc(&random_text(8_192, 1), 32, 29, 10).unwrap();
    let b = shingles_calc(&random_text(8_192, 2), 32, 29, 10).unwrap();
    let fa = a.sim_hashes();
    let fb = b.sim_hashes();

    c.bench_function("shingles_dist", |bench| {
        bench.iter(|| shingles_dist(black_box(&a), black_box(&b)))
    });
    c.bench_function("sim_hashes_dist", |bench| {
        bench.iter(|| sim_hashes_dist(black_box(fa.as_slice()), black_box(fb.as_slice())))
    });
    c.bench_function("sim_hash_29", |bench| {
        let row = a.row(0).unwrap_or_default();
        bench.iter(|| sim_hash(black_box(row)))
    });
}

fn bench_hamming(c: &mut Criterion) {
    let mut group = c.benchmark_group("hamming");
    let mut rng = StdRng::seed_from_u64(3);
    let pairs: Vec<(u64, u64)> = (0..1024).map(|_| (rng.gen(), rng.gen())).collect();

    group.throughput(Throughput::Elements(pairs.len() as u64));
    group.bench_function("selected", |bench| {
        bench.iter(|| pairs.iter().map(|&(a, b)| hamming(black_box(a), b)).sum::<u32>())
    });
    group.bench_function("portable", |bench| {
        bench.iter(|| {
            pairs
                .iter()
                .map(|&(a, b)| hamming_portable(black_box(a), b))
                .sum::<u32>()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_shingles_calc, bench_tabs, bench_compare, bench_hamming);
criterion_main!(benches);
