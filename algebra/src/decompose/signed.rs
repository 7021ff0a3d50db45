use serde::{Deserialize, Serialize};

use crate::{
    reduce::{Centered, ReduceMul, ReduceMulAdd},
    AlgebraError, BarrettModulus, Polynomial,
};

/// Signed decomposition of values modulo `Q` in a power of two basis `G = 2^log_basis`.
///
/// A value `t` is first centered into `(-Q/2, Q/2]`, then split into `digits` signed digits
/// `r_l` with `Σ r_l·G^l ≡ t (mod Q)`. Every digit but the last lies in `[-G/2, G/2)`.
/// The last digit takes whatever remains, so reconstruction is exact for every input.
/// When `digits · log_basis` covers the bit length of `Q` the last digit stays small too.
///
/// Digits are stored re-biased into `[0, Q)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedDigitDecomposer {
    modulus: BarrettModulus,
    log_basis: u32,
    digits: usize,
    gadget: Vec<u64>,
}

impl SignedDigitDecomposer {
    /// Creates a new [`SignedDigitDecomposer`].
    ///
    /// # Errors
    ///
    /// Returns an error if `log_basis` is not in `[1, 62]` or `digits` is zero.
    pub fn new(
        modulus: BarrettModulus,
        log_basis: u32,
        digits: usize,
    ) -> Result<Self, AlgebraError> {
        if log_basis == 0 || log_basis > 62 || digits == 0 {
            return Err(AlgebraError::InvalidBasis { log_basis, digits });
        }
        let basis = (1u64 << log_basis) % modulus.value();
        let mut gadget = Vec::with_capacity(digits);
        let mut power = 1 % modulus.value();
        for _ in 0..digits {
            gadget.push(power);
            power = modulus.reduce_mul(power, basis);
        }
        Ok(Self {
            modulus,
            log_basis,
            digits,
            gadget,
        })
    }

    /// Creates a [`SignedDigitDecomposer`] with the fewest digits covering the modulus.
    #[inline]
    pub fn covering(modulus: BarrettModulus, log_basis: u32) -> Result<Self, AlgebraError> {
        if log_basis == 0 {
            return Err(AlgebraError::InvalidBasis {
                log_basis,
                digits: 0,
            });
        }
        let digits = modulus.bits().div_ceil(log_basis) as usize;
        Self::new(modulus, log_basis, digits)
    }

    /// Returns the modulus of this [`SignedDigitDecomposer`].
    #[inline]
    pub fn modulus(&self) -> BarrettModulus {
        self.modulus
    }

    /// Returns the log basis of this [`SignedDigitDecomposer`].
    #[inline]
    pub fn log_basis(&self) -> u32 {
        self.log_basis
    }

    /// Returns the basis value `G` of this [`SignedDigitDecomposer`].
    #[inline]
    pub fn basis(&self) -> u64 {
        1 << self.log_basis
    }

    /// Returns the digit count of this [`SignedDigitDecomposer`].
    #[inline]
    pub fn digits(&self) -> usize {
        self.digits
    }

    /// Returns the gadget vector `(G^0, G^1, ...) mod Q`.
    #[inline]
    pub fn gadget(&self) -> &[u64] {
        &self.gadget
    }

    /// Returns `true` if `digits · log_basis` covers the bit length of the modulus.
    #[inline]
    pub fn covers_modulus(&self) -> bool {
        self.digits as u64 * self.log_basis as u64 >= self.modulus.bits() as u64
    }

    /// Decomposes a single value into `destination`, one entry per digit.
    #[inline]
    pub fn decompose_value(&self, value: u64, destination: &mut [u64]) {
        debug_assert_eq!(destination.len(), self.digits);
        let q = self.modulus.value();
        let shift = i64::BITS - self.log_basis;
        let mut d = self.modulus.centered(value);
        let Some((last, rest)) = destination.split_last_mut() else {
            return;
        };
        for out in rest.iter_mut() {
            let r = (d << shift) >> shift;
            d = (d - r) >> self.log_basis;
            *out = if r < 0 { (r + q as i64) as u64 } else { r as u64 };
        }
        *last = if d < 0 { (d + q as i64) as u64 } else { d as u64 };
    }

    /// Decomposes `polynomial` into `destination`, which must hold `digits` polynomials.
    pub fn decompose_inplace(&self, polynomial: &Polynomial, destination: &mut [Polynomial]) {
        debug_assert_eq!(destination.len(), self.digits);
        let mut value_digits = vec![0u64; self.digits];
        for (idx, &c) in polynomial.iter().enumerate() {
            self.decompose_value(c, &mut value_digits);
            for (poly, &digit) in destination.iter_mut().zip(value_digits.iter()) {
                poly[idx] = digit;
            }
        }
    }

    /// Decomposes `polynomial` into `digits` new polynomials.
    #[inline]
    pub fn decompose(&self, polynomial: &Polynomial) -> Vec<Polynomial> {
        let mut destination = vec![Polynomial::zero(polynomial.coeff_count()); self.digits];
        self.decompose_inplace(polynomial, &mut destination);
        destination
    }

    /// Decomposes the pair `(a, b)` into `2·digits` polynomials, interleaved so that
    /// `destination[j + 2l]` is the `l`-th digit of the `j`-th element.
    pub fn decompose_pair_inplace(
        &self,
        a: &Polynomial,
        b: &Polynomial,
        destination: &mut [Polynomial],
    ) {
        debug_assert_eq!(destination.len(), self.digits << 1);
        let mut value_digits = vec![0u64; self.digits];
        for (j, element) in [a, b].into_iter().enumerate() {
            for (idx, &c) in element.iter().enumerate() {
                self.decompose_value(c, &mut value_digits);
                for (l, &digit) in value_digits.iter().enumerate() {
                    destination[j + 2 * l][idx] = digit;
                }
            }
        }
    }

    /// Computes `Σ digits[l]·G^l (mod Q)`.
    pub fn recompose(&self, digits: &[Polynomial]) -> Polynomial {
        debug_assert_eq!(digits.len(), self.digits);
        let coeff_count = digits.first().map_or(0, Polynomial::coeff_count);
        let mut result = Polynomial::zero(coeff_count);
        for (digit, &g) in digits.iter().zip(self.gadget.iter()) {
            result
                .iter_mut()
                .zip(digit.iter())
                .for_each(|(acc, &v)| *acc = self.modulus.reduce_mul_add(v, g, *acc));
        }
        result
    }
}
