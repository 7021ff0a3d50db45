use algebra::reduce::{ReduceAddAssign, ReduceMul, ReduceNeg, ReduceSubAssign};
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::utils::dot_product;

/// Represents a cryptographic structure based on the Learning with Errors (LWE) problem.
///
/// The phase of the sample is `b - <a, s>`, where `s` is the secret vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lwe<T> {
    /// A vector of elements of `T`, representing the public part of the LWE instance.
    a: Vec<T>,
    /// An element of `T`, representing the value which is computed as the dot product of `a` with a secret vector, plus some noise.
    b: T,
}

impl<T: Copy> Lwe<T> {
    /// Creates a new [`Lwe<T>`].
    #[inline]
    pub fn new(a: Vec<T>, b: T) -> Self {
        Self { a, b }
    }

    /// Returns a reference to the `a` of this [`Lwe<T>`].
    #[inline]
    pub fn a(&self) -> &[T] {
        self.a.as_ref()
    }

    /// Returns a mutable reference to the `a` of this [`Lwe<T>`].
    #[inline]
    pub fn a_mut(&mut self) -> &mut [T] {
        &mut self.a
    }

    /// Returns the `b` of this [`Lwe<T>`].
    #[inline]
    pub fn b(&self) -> T {
        self.b
    }

    /// Returns a mutable reference to the `b` of this [`Lwe<T>`].
    #[inline]
    pub fn b_mut(&mut self) -> &mut T {
        &mut self.b
    }

    /// Returns the dimension of this [`Lwe<T>`].
    #[inline]
    pub fn dimension(&self) -> usize {
        self.a.len()
    }

    /// Splits this [`Lwe<T>`] into `a` and `b`.
    #[inline]
    pub fn into_parts(self) -> (Vec<T>, T) {
        (self.a, self.b)
    }
}

impl<T: Copy + Zero> Lwe<T> {
    /// Creates the zero [`Lwe<T>`] of the given dimension.
    #[inline]
    pub fn zero(dimension: usize) -> Self {
        Self {
            a: vec![T::zero(); dimension],
            b: T::zero(),
        }
    }
}

impl Lwe<u64> {
    /// Performs component-wise modular addition, consuming `self`.
    #[inline]
    pub fn add_reduce_component_wise<M>(mut self, rhs: &Self, modulus: M) -> Self
    where
        M: ReduceAddAssign + Copy,
    {
        self.add_reduce_assign_component_wise(rhs, modulus);
        self
    }

    /// Performs component-wise modular subtraction, consuming `self`.
    #[inline]
    pub fn sub_reduce_component_wise<M>(mut self, rhs: &Self, modulus: M) -> Self
    where
        M: ReduceSubAssign + Copy,
    {
        self.sub_reduce_assign_component_wise(rhs, modulus);
        self
    }

    /// Performs `self += rhs` component-wise.
    #[inline]
    pub fn add_reduce_assign_component_wise<M>(&mut self, rhs: &Self, modulus: M)
    where
        M: ReduceAddAssign + Copy,
    {
        debug_assert_eq!(self.dimension(), rhs.dimension());
        self.a
            .iter_mut()
            .zip(rhs.a())
            .for_each(|(v0, &v1)| modulus.reduce_add_assign(v0, v1));
        modulus.reduce_add_assign(&mut self.b, rhs.b());
    }

    /// Performs `self -= rhs` component-wise.
    #[inline]
    pub fn sub_reduce_assign_component_wise<M>(&mut self, rhs: &Self, modulus: M)
    where
        M: ReduceSubAssign + Copy,
    {
        debug_assert_eq!(self.dimension(), rhs.dimension());
        self.a
            .iter_mut()
            .zip(rhs.a())
            .for_each(|(v0, &v1)| modulus.reduce_sub_assign(v0, v1));
        modulus.reduce_sub_assign(&mut self.b, rhs.b());
    }

    /// Performs `self *= scalar` component-wise.
    #[inline]
    pub fn mul_scalar_reduce_assign<M>(&mut self, scalar: u64, modulus: M)
    where
        M: ReduceMul + Copy,
    {
        self.a
            .iter_mut()
            .for_each(|v| *v = modulus.reduce_mul(*v, scalar));
        self.b = modulus.reduce_mul(self.b, scalar);
    }

    /// Performs `self = -self` component-wise.
    #[inline]
    pub fn neg_reduce_assign<M>(&mut self, modulus: M)
    where
        M: ReduceNeg + Copy,
    {
        self.a.iter_mut().for_each(|v| *v = modulus.reduce_neg(*v));
        self.b = modulus.reduce_neg(self.b);
    }

    /// Returns the phase `b - <a, secret>` of this sample.
    #[inline]
    pub fn phase<M>(&self, secret: &[u64], modulus: M) -> u64
    where
        M: ReduceMul + ReduceAddAssign + ReduceSubAssign + Copy,
    {
        let mut phase = self.b;
        modulus.reduce_sub_assign(&mut phase, dot_product(&self.a, secret, modulus));
        phase
    }
}
