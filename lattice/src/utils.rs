//! Pre-allocated spaces and helpers.

use algebra::{
    reduce::{ReduceAddAssign, ReduceMul},
    NttPolynomial, Polynomial,
};

use crate::NttRlwe;

/// Pre allocated space for the external product.
#[derive(Debug, Clone)]
pub struct ExternalProductSpace {
    pub(crate) digits: Vec<Polynomial>,
    pub(crate) ntt_digit: NttPolynomial,
    pub(crate) accumulator: NttRlwe,
}

impl ExternalProductSpace {
    /// Creates a new [`ExternalProductSpace`] for ring dimension `coeff_count` and
    /// `digits` gadget digits.
    #[inline]
    pub fn new(coeff_count: usize, digits: usize) -> Self {
        Self {
            digits: vec![Polynomial::zero(coeff_count); digits << 1],
            ntt_digit: NttPolynomial::zero(coeff_count),
            accumulator: NttRlwe::zero(coeff_count),
        }
    }
}

/// Performs dot product for two slices.
#[inline]
pub fn dot_product<M>(u: &[u64], v: &[u64], modulus: M) -> u64
where
    M: ReduceMul + ReduceAddAssign + Copy,
{
    debug_assert_eq!(u.len(), v.len());
    u.iter().zip(v).fold(0, |mut acc, (&x, &y)| {
        modulus.reduce_add_assign(&mut acc, modulus.reduce_mul(x, y));
        acc
    })
}
