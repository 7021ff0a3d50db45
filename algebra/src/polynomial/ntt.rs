use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::{
    reduce::{ReduceAddAssign, ReduceMul, ReduceMulAdd, ReduceNeg, ReduceSubAssign},
    BarrettModulus,
};

/// A polynomial in the transform representation, that is its evaluations at the
/// primitive `2N`-th roots of unity, in the order of the [`crate::NttTable`] that made it.
///
/// Multiplication is coordinate-wise in this representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NttPolynomial {
    data: Vec<u64>,
}

impl NttPolynomial {
    /// Creates a new [`NttPolynomial`] from transform-domain values.
    #[inline]
    pub fn new(data: Vec<u64>) -> Self {
        Self { data }
    }

    /// Creates the zero [`NttPolynomial`] with `coeff_count` values.
    #[inline]
    pub fn zero(coeff_count: usize) -> Self {
        Self {
            data: vec![0; coeff_count],
        }
    }

    /// Returns the values, consuming the polynomial.
    #[inline]
    pub fn data(self) -> Vec<u64> {
        self.data
    }

    /// Returns the value count of this [`NttPolynomial`].
    #[inline]
    pub fn coeff_count(&self) -> usize {
        self.data.len()
    }

    /// Returns the values as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[u64] {
        &self.data
    }

    /// Returns the values as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u64] {
        &mut self.data
    }

    /// Returns an iterator over the values.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, u64> {
        self.data.iter()
    }

    /// Sets every value to zero.
    #[inline]
    pub fn set_zero(&mut self) {
        self.data.fill(0);
    }

    /// Copies the values of `other` into `self`.
    #[inline]
    pub fn copy_from(&mut self, other: &Self) {
        self.data.copy_from_slice(&other.data);
    }

    /// Performs `self += rhs (mod modulus)`.
    #[inline]
    pub fn add_reduce_assign(&mut self, rhs: &Self, modulus: BarrettModulus) {
        debug_assert_eq!(self.coeff_count(), rhs.coeff_count());
        self.data
            .iter_mut()
            .zip(rhs.iter())
            .for_each(|(a, &b)| modulus.reduce_add_assign(a, b));
    }

    /// Performs `self -= rhs (mod modulus)`.
    #[inline]
    pub fn sub_reduce_assign(&mut self, rhs: &Self, modulus: BarrettModulus) {
        debug_assert_eq!(self.coeff_count(), rhs.coeff_count());
        self.data
            .iter_mut()
            .zip(rhs.iter())
            .for_each(|(a, &b)| modulus.reduce_sub_assign(a, b));
    }

    /// Performs `self = -self (mod modulus)`.
    #[inline]
    pub fn neg_reduce_assign(&mut self, modulus: BarrettModulus) {
        self.data
            .iter_mut()
            .for_each(|a| *a = modulus.reduce_neg(*a));
    }

    /// Performs `self *= scalar (mod modulus)`.
    #[inline]
    pub fn mul_scalar_reduce_assign(&mut self, scalar: u64, modulus: BarrettModulus) {
        self.data
            .iter_mut()
            .for_each(|a| *a = modulus.reduce_mul(*a, scalar));
    }

    /// Performs the coordinate-wise product `self *= rhs (mod modulus)`.
    #[inline]
    pub fn mul_reduce_assign(&mut self, rhs: &Self, modulus: BarrettModulus) {
        debug_assert_eq!(self.coeff_count(), rhs.coeff_count());
        self.data
            .iter_mut()
            .zip(rhs.iter())
            .for_each(|(a, &b)| *a = modulus.reduce_mul(*a, b));
    }

    /// Returns the coordinate-wise product `self * rhs (mod modulus)`.
    #[inline]
    pub fn mul_reduce(&self, rhs: &Self, modulus: BarrettModulus) -> Self {
        let mut result = self.clone();
        result.mul_reduce_assign(rhs, modulus);
        result
    }

    /// Performs `self += a * b (mod modulus)` coordinate-wise.
    #[inline]
    pub fn add_mul_reduce_assign(&mut self, a: &Self, b: &Self, modulus: BarrettModulus) {
        debug_assert_eq!(self.coeff_count(), a.coeff_count());
        debug_assert_eq!(self.coeff_count(), b.coeff_count());
        self.data
            .iter_mut()
            .zip(a.iter().zip(b.iter()))
            .for_each(|(c, (&x, &y))| *c = modulus.reduce_mul_add(x, y, *c));
    }
}

impl Index<usize> for NttPolynomial {
    type Output = u64;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<usize> for NttPolynomial {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}
