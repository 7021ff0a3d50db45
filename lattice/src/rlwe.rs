use algebra::{
    decompose::SignedDigitDecomposer,
    random::DiscreteGaussian,
    reduce::ReduceNeg,
    BarrettModulus, NttPolynomial, NttTable, Polynomial,
};
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};

use crate::{utils::ExternalProductSpace, Lwe, NttRgsw};

/// A ring learning with errors sample `(a, b)` in coefficient representation.
///
/// The phase of the sample is `b - a·z`, where `z` is the ring secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rlwe {
    a: Polynomial,
    b: Polynomial,
}

impl Rlwe {
    /// Creates a new [`Rlwe`].
    #[inline]
    pub fn new(a: Polynomial, b: Polynomial) -> Self {
        debug_assert_eq!(a.coeff_count(), b.coeff_count());
        Self { a, b }
    }

    /// Creates the zero [`Rlwe`] with `coeff_count` coefficients per element.
    #[inline]
    pub fn zero(coeff_count: usize) -> Self {
        Self {
            a: Polynomial::zero(coeff_count),
            b: Polynomial::zero(coeff_count),
        }
    }

    /// Creates a trivial [`Rlwe`] `(0, b)`.
    #[inline]
    pub fn trivial(b: Polynomial) -> Self {
        Self {
            a: Polynomial::zero(b.coeff_count()),
            b,
        }
    }

    /// Returns a reference to the `a` of this [`Rlwe`].
    #[inline]
    pub fn a(&self) -> &Polynomial {
        &self.a
    }

    /// Returns a mutable reference to the `a` of this [`Rlwe`].
    #[inline]
    pub fn a_mut(&mut self) -> &mut Polynomial {
        &mut self.a
    }

    /// Returns a reference to the `b` of this [`Rlwe`].
    #[inline]
    pub fn b(&self) -> &Polynomial {
        &self.b
    }

    /// Returns a mutable reference to the `b` of this [`Rlwe`].
    #[inline]
    pub fn b_mut(&mut self) -> &mut Polynomial {
        &mut self.b
    }

    /// Returns the coefficient count of the elements of this [`Rlwe`].
    #[inline]
    pub fn dimension(&self) -> usize {
        self.a.coeff_count()
    }

    /// Splits this [`Rlwe`] into `a` and `b`.
    #[inline]
    pub fn into_parts(self) -> (Polynomial, Polynomial) {
        (self.a, self.b)
    }

    /// Performs `self += rhs` element-wise.
    #[inline]
    pub fn add_assign_element_wise(&mut self, rhs: &Self, modulus: BarrettModulus) {
        self.a.add_reduce_assign(&rhs.a, modulus);
        self.b.add_reduce_assign(&rhs.b, modulus);
    }

    /// Performs `self -= rhs` element-wise.
    #[inline]
    pub fn sub_assign_element_wise(&mut self, rhs: &Self, modulus: BarrettModulus) {
        self.a.sub_reduce_assign(&rhs.a, modulus);
        self.b.sub_reduce_assign(&rhs.b, modulus);
    }

    /// Returns `X^amount · self`, multiplying the phase by the same monomial.
    #[inline]
    pub fn mul_monomial(&self, amount: i64, modulus: BarrettModulus) -> Self {
        Self {
            a: self.a.mul_monomial(amount, modulus),
            b: self.b.mul_monomial(amount, modulus),
        }
    }

    /// Converts this [`Rlwe`] into the transform representation.
    #[inline]
    pub fn to_ntt_rlwe(&self, table: &NttTable) -> NttRlwe {
        NttRlwe::new(table.transform(&self.a), table.transform(&self.b))
    }

    /// Returns the phase `b - a·z` with `z` given in transform representation.
    pub fn phase(&self, ntt_secret: &NttPolynomial, table: &NttTable) -> Polynomial {
        let mut a_z = table.transform(&self.a);
        a_z.mul_reduce_assign(ntt_secret, table.modulus());
        let mut phase = self.b.clone();
        phase.sub_reduce_assign(&table.inverse_transform_inplace(a_z), table.modulus());
        phase
    }

    /// Extracts the constant coefficient of the phase as an [`Lwe`] sample under the
    /// coefficient vector of `z`.
    ///
    /// The result satisfies `b' - <a', z> = (b - a·z)[0]`.
    pub fn extract_lwe(&self, modulus: BarrettModulus) -> Lwe<u64> {
        let n = self.dimension();
        let mut a = Vec::with_capacity(n);
        a.push(self.a[0]);
        a.extend((1..n).map(|i| modulus.reduce_neg(self.a[n - i])));
        Lwe::new(a, self.b[0])
    }

    /// Performs the external product `self ⊡ rgsw` in place.
    ///
    /// The pair `(a, b)` is decomposed into `2·digits` signed digits, each digit is
    /// transformed and multiplied with the matching row of `rgsw`, and the sums are
    /// transformed back. If `rgsw` encrypts `±X^m` under `z`, the phase of `self` is
    /// multiplied by `±X^m` up to added noise.
    pub fn mul_ntt_rgsw_inplace(
        &mut self,
        rgsw: &NttRgsw,
        decomposer: &SignedDigitDecomposer,
        table: &NttTable,
        space: &mut ExternalProductSpace,
    ) {
        debug_assert_eq!(rgsw.row_count(), decomposer.digits() << 1);
        let modulus = table.modulus();
        let ExternalProductSpace {
            digits,
            ntt_digit,
            accumulator,
        } = space;

        decomposer.decompose_pair_inplace(&self.a, &self.b, digits);
        accumulator.set_zero();
        for (digit, row) in digits.iter().zip(rgsw.rows()) {
            table.transform_into(digit, ntt_digit);
            accumulator.add_ntt_mul_assign(ntt_digit, row, modulus);
        }
        table.inverse_transform_into(accumulator.a(), &mut self.a);
        table.inverse_transform_into(accumulator.b(), &mut self.b);
    }
}

/// A ring learning with errors sample `(a, b)` in transform representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NttRlwe {
    a: NttPolynomial,
    b: NttPolynomial,
}

impl NttRlwe {
    /// Creates a new [`NttRlwe`].
    #[inline]
    pub fn new(a: NttPolynomial, b: NttPolynomial) -> Self {
        debug_assert_eq!(a.coeff_count(), b.coeff_count());
        Self { a, b }
    }

    /// Creates the zero [`NttRlwe`].
    #[inline]
    pub fn zero(coeff_count: usize) -> Self {
        Self {
            a: NttPolynomial::zero(coeff_count),
            b: NttPolynomial::zero(coeff_count),
        }
    }

    /// Returns a reference to the `a` of this [`NttRlwe`].
    #[inline]
    pub fn a(&self) -> &NttPolynomial {
        &self.a
    }

    /// Returns a mutable reference to the `a` of this [`NttRlwe`].
    #[inline]
    pub fn a_mut(&mut self) -> &mut NttPolynomial {
        &mut self.a
    }

    /// Returns a reference to the `b` of this [`NttRlwe`].
    #[inline]
    pub fn b(&self) -> &NttPolynomial {
        &self.b
    }

    /// Returns a mutable reference to the `b` of this [`NttRlwe`].
    #[inline]
    pub fn b_mut(&mut self) -> &mut NttPolynomial {
        &mut self.b
    }

    /// Returns mutable references to both elements.
    #[inline]
    pub fn parts_mut(&mut self) -> (&mut NttPolynomial, &mut NttPolynomial) {
        (&mut self.a, &mut self.b)
    }

    /// Sets both elements to zero.
    #[inline]
    pub fn set_zero(&mut self) {
        self.a.set_zero();
        self.b.set_zero();
    }

    /// Performs `self += rhs` element-wise.
    #[inline]
    pub fn add_assign_element_wise(&mut self, rhs: &Self, modulus: BarrettModulus) {
        self.a.add_reduce_assign(&rhs.a, modulus);
        self.b.add_reduce_assign(&rhs.b, modulus);
    }

    /// Performs `self -= rhs` element-wise.
    #[inline]
    pub fn sub_assign_element_wise(&mut self, rhs: &Self, modulus: BarrettModulus) {
        self.a.sub_reduce_assign(&rhs.a, modulus);
        self.b.sub_reduce_assign(&rhs.b, modulus);
    }

    /// Performs `self += scalar · rhs` where `scalar` is in transform representation.
    #[inline]
    pub fn add_ntt_mul_assign(
        &mut self,
        scalar: &NttPolynomial,
        rhs: &Self,
        modulus: BarrettModulus,
    ) {
        self.a.add_mul_reduce_assign(scalar, &rhs.a, modulus);
        self.b.add_mul_reduce_assign(scalar, &rhs.b, modulus);
    }

    /// Converts this [`NttRlwe`] into coefficient representation.
    #[inline]
    pub fn to_rlwe(&self, table: &NttTable) -> Rlwe {
        Rlwe::new(
            table.inverse_transform(&self.a),
            table.inverse_transform(&self.b),
        )
    }

    /// Generates an encryption of zero `(a, a·z + e)`.
    ///
    /// `a` is sampled uniformly unless `mask` is given, and `e` is sampled from `gaussian`
    /// unless it is `None`.
    pub fn generate_zero_sample<R>(
        ntt_secret: &NttPolynomial,
        mask: Option<&Polynomial>,
        gaussian: Option<&DiscreteGaussian>,
        table: &NttTable,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + CryptoRng,
    {
        let n = table.dimension();
        let modulus = table.modulus();
        let a = match mask {
            Some(mask) => table.transform(mask),
            None => table.transform_inplace(Polynomial::random(n, modulus, rng)),
        };
        let e = match gaussian {
            Some(gaussian) => Polynomial::random_gaussian(n, gaussian, rng),
            None => Polynomial::zero(n),
        };
        let mut b = table.transform_inplace(e);
        b.add_mul_reduce_assign(&a, ntt_secret, modulus);
        Self { a, b }
    }

    /// Encrypts zero under the public key `(c, c·z + e)` as `(u·c + e0, u·(c·z + e) + e1)`.
    ///
    /// `u` is binary and private to the caller. The phase is `u·e + e1 - e0·z`. `e0` and `e1`
    /// are sampled from `gaussian` unless it is `None`.
    pub fn encrypt_zero_with_public_key<R>(
        public_key: &Self,
        gaussian: Option<&DiscreteGaussian>,
        table: &NttTable,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + CryptoRng,
    {
        let n = table.dimension();
        let modulus = table.modulus();
        let u = table.transform_inplace(Polynomial::random_binary(n, rng));
        let (e0, e1) = match gaussian {
            Some(gaussian) => (
                Polynomial::random_gaussian(n, gaussian, rng),
                Polynomial::random_gaussian(n, gaussian, rng),
            ),
            None => (Polynomial::zero(n), Polynomial::zero(n)),
        };
        let mut a = table.transform_inplace(e0);
        a.add_mul_reduce_assign(&u, &public_key.a, modulus);
        let mut b = table.transform_inplace(e1);
        b.add_mul_reduce_assign(&u, &public_key.b, modulus);
        Self { a, b }
    }
}
