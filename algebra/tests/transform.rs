use algebra::{
    reduce::{ReduceAdd, ReduceAddAssign, ReduceMul, ReduceSubAssign},
    BarrettModulus, NttTable, Polynomial,
};
use rand::{distributions::Uniform, prelude::Distribution, thread_rng, Rng};

const M: u64 = 132120577;
const N: usize = 1024;

#[test]
fn test_transform() {
    let modulus = BarrettModulus::new(M).unwrap();
    let table = NttTable::new(modulus, N.trailing_zeros()).unwrap();

    let a: Vec<u64> = Uniform::new(0, M)
        .sample_iter(thread_rng())
        .take(N)
        .collect();

    let mut b = a.clone();
    table.transform_slice(&mut b);
    table.inverse_transform_slice(&mut b);

    assert_eq!(a, b);
}

fn naive_mul(poly1: &[u64], poly2: &[u64], modulus: BarrettModulus) -> Vec<u64> {
    assert_eq!(poly1.len(), poly2.len());
    let n = poly1.len();

    let mut result = vec![0; n];

    for i in 0..n {
        for j in 0..=i {
            modulus.reduce_add_assign(&mut result[i], modulus.reduce_mul(poly1[j], poly2[i - j]));
        }
    }

    // mod (x^n + 1)
    for i in n..n * 2 - 1 {
        let k = i - n;
        for j in i - n + 1..n {
            modulus.reduce_sub_assign(&mut result[k], modulus.reduce_mul(poly1[j], poly2[i - j]));
        }
    }

    result
}

#[test]
fn test_cal() {
    let mut rng = thread_rng();
    let modulus = BarrettModulus::new(M).unwrap();
    let table = NttTable::new(modulus, N.trailing_zeros()).unwrap();

    let dis = Uniform::new(0, M);

    let mut a: Vec<u64> = dis.sample_iter(&mut rng).take(N).collect();
    let mut b: Vec<u64> = dis.sample_iter(&mut rng).take(N).collect();

    let add: Vec<u64> = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| modulus.reduce_add(x, y))
        .collect();
    let mul = naive_mul(&a, &b, modulus);

    table.transform_slice(&mut a);
    table.transform_slice(&mut b);

    let mut ntt_add: Vec<u64> = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| modulus.reduce_add(x, y))
        .collect();
    let mut ntt_mul: Vec<u64> = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| modulus.reduce_mul(x, y))
        .collect();
    table.inverse_transform_slice(&mut ntt_add);
    table.inverse_transform_slice(&mut ntt_mul);

    assert_eq!(ntt_mul, mul);
    assert_eq!(ntt_add, add);
}

#[test]
fn test_transform_matches_monomial_rotation() {
    let mut rng = thread_rng();
    let dis = Uniform::new(0, M);

    let modulus = BarrettModulus::new(M).unwrap();
    let table = NttTable::new(modulus, N.trailing_zeros()).unwrap();

    let degree = rng.gen_range(0..2 * N);
    let poly = Polynomial::new(dis.sample_iter(&mut rng).take(N).collect());

    let mut monomial = Polynomial::zero(N);
    if degree < N {
        monomial[degree] = 1;
    } else {
        monomial[degree - N] = M - 1;
    }

    let mut product = table.transform(&poly);
    product.mul_reduce_assign(&table.transform(&monomial), modulus);

    assert_eq!(
        table.inverse_transform_inplace(product),
        poly.mul_monomial(degree as i64, modulus)
    );
}
