use algebra::{decompose::SignedDigitDecomposer, BarrettModulus, NttTable, Polynomial};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::thread_rng;

pub fn criterion_benchmark(c: &mut Criterion) {
    let log_n = 10;
    let n = 1 << log_n;

    let modulus = BarrettModulus::new(998244353).unwrap();
    let table = NttTable::new(modulus, log_n).unwrap();
    let decomposer = SignedDigitDecomposer::covering(modulus, 10).unwrap();

    let mut r = thread_rng();
    let poly = Polynomial::random(n, modulus, &mut r);

    c.bench_function(&format!("ntt {}", n), |b| {
        b.iter(|| table.transform(&poly))
    });

    let ntt_poly = table.transform(&poly);

    c.bench_function(&format!("intt {}", n), |b| {
        b.iter(|| table.inverse_transform(&ntt_poly))
    });

    let mut digits = vec![Polynomial::zero(n); decomposer.digits()];
    c.bench_function(&format!("signed decompose {}", n), |b| {
        b.iter(|| decomposer.decompose_inplace(&poly, &mut digits))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
