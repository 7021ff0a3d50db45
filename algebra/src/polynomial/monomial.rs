use crate::{reduce::ReduceNeg, BarrettModulus};

/// Returns `X^amount · coeffs` in `Z_Q[X]/(X^N + 1)` where `N = coeffs.len()`.
///
/// `amount` is taken modulo `2N`, since `X^(2N) = 1`. A non-negative amount rotates
/// towards higher degrees and a negative one towards lower degrees. Coefficients that
/// wrap past `X^N` change sign.
#[inline]
pub fn rotate_ring_signed(coeffs: &[u64], amount: i64, modulus: BarrettModulus) -> Vec<u64> {
    let mut result = vec![0; coeffs.len()];
    rotate_ring_signed_into(coeffs, amount, modulus, &mut result);
    result
}

/// The non-allocating form of [`rotate_ring_signed`], writing into `destination`.
pub fn rotate_ring_signed_into(
    coeffs: &[u64],
    amount: i64,
    modulus: BarrettModulus,
    destination: &mut [u64],
) {
    let n = coeffs.len();
    debug_assert!(n.is_power_of_two());
    debug_assert_eq!(n, destination.len());

    let shift = amount.rem_euclid((n as i64) << 1) as usize;
    for (k, &c) in coeffs.iter().enumerate() {
        let index = k + shift;
        if index < n {
            destination[index] = c;
        } else if index < n << 1 {
            destination[index - n] = modulus.reduce_neg(c);
        } else {
            destination[index - (n << 1)] = c;
        }
    }
}

/// Returns `p(X^degree)` for `p` given by `coeffs`, `degree` odd.
#[inline]
pub fn automorphism(coeffs: &[u64], degree: usize, modulus: BarrettModulus) -> Vec<u64> {
    let mut result = vec![0; coeffs.len()];
    automorphism_into(coeffs, degree, modulus, &mut result);
    result
}

/// The non-allocating form of [`automorphism`], writing into `destination`.
pub fn automorphism_into(
    coeffs: &[u64],
    degree: usize,
    modulus: BarrettModulus,
    destination: &mut [u64],
) {
    let n = coeffs.len();
    debug_assert!(degree & 1 == 1);
    debug_assert_eq!(n, destination.len());

    let mask = (n << 1) - 1;
    for (i, &c) in coeffs.iter().enumerate() {
        let to = (i * degree) & mask;
        if to < n {
            destination[to] = c;
        } else {
            destination[to - n] = modulus.reduce_neg(c);
        }
    }
}
