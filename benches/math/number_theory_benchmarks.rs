use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dhello::math::number_theory::{is_generator, is_prime, mod_pow};
use num_bigint::BigUint;

fn bench_mod_pow(c: &mut Criterion) {
    let mut group = c.benchmark_group("mod_pow");
    let modulus = BigUint::from(1_000_000_007u64);
    let base = BigUint::from(5u32);

    for digits in [10u32, 100, 1_000] {
        let exponent = BigUint::from(10u32).pow(digits) - BigUint::from(1u32);
        group.bench_with_input(
            BenchmarkId::new("exponent_digits", digits),
            &exponent,
            |b, exponent| b.iter(|| mod_pow(black_box(&base), black_box(exponent), &modulus)),
        );
    }
    group.finish();
}

fn bench_is_prime(c: &mut Criterion) {
    let mut group = c.benchmark_group("is_prime");
    for n in [10_007u64, 1_000_003, 1_000_000_007] {
        let n = BigUint::from(n);
        group.bench_with_input(BenchmarkId::from_parameter(&n), &n, |b, n| {
            b.iter(|| is_prime(black_box(n)))
        });
    }
    group.finish();
}

fn bench_is_generator(c: &mut Criterion) {
    let p = BigUint::from(1_000_003u64);
    let g = BigUint::from(2u32);
    c.bench_function("is_generator_1000003", |b| {
        b.iter(|| is_generator(black_box(&g), black_box(&p)))
    });
}

criterion_group!(benches, bench_mod_pow, bench_is_prime, bench_is_generator);
criterion_main!(benches);
