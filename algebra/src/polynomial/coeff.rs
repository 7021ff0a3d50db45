use std::ops::{Index, IndexMut};

use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};

use crate::{
    random::{sample_binary_values, sample_ternary_values, sample_uniform_values, DiscreteGaussian},
    reduce::{ReduceAddAssign, ReduceMul, ReduceNeg, ReduceSubAssign},
    BarrettModulus,
};

use super::{automorphism_into, rotate_ring_signed_into};

/// A polynomial in coefficient representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polynomial {
    data: Vec<u64>,
}

impl Polynomial {
    /// Creates a new [`Polynomial`] from its coefficients.
    #[inline]
    pub fn new(data: Vec<u64>) -> Self {
        Self { data }
    }

    /// Creates a new [`Polynomial`] copied from `data`.
    #[inline]
    pub fn from_slice(data: &[u64]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    /// Creates the zero polynomial with `coeff_count` coefficients.
    #[inline]
    pub fn zero(coeff_count: usize) -> Self {
        Self {
            data: vec![0; coeff_count],
        }
    }

    /// Returns the coefficients, consuming the polynomial.
    #[inline]
    pub fn data(self) -> Vec<u64> {
        self.data
    }

    /// Returns the coefficient count of this [`Polynomial`].
    #[inline]
    pub fn coeff_count(&self) -> usize {
        self.data.len()
    }

    /// Returns the coefficients as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[u64] {
        &self.data
    }

    /// Returns the coefficients as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u64] {
        &mut self.data
    }

    /// Returns an iterator over the coefficients.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, u64> {
        self.data.iter()
    }

    /// Returns a mutable iterator over the coefficients.
    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, u64> {
        self.data.iter_mut()
    }

    /// Sets every coefficient to zero.
    #[inline]
    pub fn set_zero(&mut self) {
        self.data.fill(0);
    }

    /// Returns `true` if every coefficient is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&c| c == 0)
    }

    /// Copies the coefficients of `other` into `self`.
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

    /// Returns `X^amount · self` in `Z_Q[X]/(X^N + 1)`.
    ///
    /// Negative amounts rotate the other way, see [`rotate_ring_signed`](super::rotate_ring_signed).
    #[inline]
    pub fn mul_monomial(&self, amount: i64, modulus: BarrettModulus) -> Self {
        let mut result = Self::zero(self.coeff_count());
        rotate_ring_signed_into(self.as_slice(), amount, modulus, result.as_mut_slice());
        result
    }

    /// Returns `self(X^degree)` in `Z_Q[X]/(X^N + 1)` for an odd `degree`.
    #[inline]
    pub fn automorphism(&self, degree: usize, modulus: BarrettModulus) -> Self {
        let mut result = Self::zero(self.coeff_count());
        automorphism_into(self.as_slice(), degree, modulus, result.as_mut_slice());
        result
    }

    /// Generates a [`Polynomial`] with uniformly random coefficients in `[0, modulus)`.
    #[inline]
    pub fn random<R>(coeff_count: usize, modulus: BarrettModulus, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(sample_uniform_values(coeff_count, modulus.value(), rng))
    }

    /// Generates a [`Polynomial`] with binary coefficients.
    #[inline]
    pub fn random_binary<R>(coeff_count: usize, rng: &mut R) -> Self
    where
        R: Rng + CryptoRng,
    {
        Self::new(sample_binary_values(coeff_count, rng))
    }

    /// Generates a [`Polynomial`] with ternary coefficients, `-1` stored as `modulus - 1`.
    #[inline]
    pub fn random_ternary<R>(coeff_count: usize, modulus: BarrettModulus, rng: &mut R) -> Self
    where
        R: Rng + CryptoRng,
    {
        Self::new(sample_ternary_values(coeff_count, modulus.value(), rng))
    }

    /// Generates a [`Polynomial`] with discrete gaussian coefficients.
    #[inline]
    pub fn random_gaussian<R>(coeff_count: usize, gaussian: &DiscreteGaussian, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(gaussian.sample_values(coeff_count, rng))
    }
}

impl Index<usize> for Polynomial {
    type Output = u64;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<usize> for Polynomial {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl AsRef<[u64]> for Polynomial {
    #[inline]
    fn as_ref(&self) -> &[u64] {
        &self.data
    }
}
