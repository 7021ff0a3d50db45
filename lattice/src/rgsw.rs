use algebra::{
    decompose::SignedDigitDecomposer,
    polynomial::rotate_ring_signed_into,
    random::DiscreteGaussian,
    reduce::ReduceNeg,
    BarrettModulus, NttPolynomial, NttTable, Polynomial,
};
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};

use crate::NttRlwe;

/// The plaintext of a gadget ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RgswMessage {
    /// The monomial `±X^degree` with `degree < N`.
    Monomial {
        /// Exponent in `[0, N)`.
        degree: usize,
        /// Whether the monomial is negated.
        negative: bool,
    },
    /// The zero polynomial.
    Zero,
}

impl RgswMessage {
    /// Returns the message `X^exponent` for any exponent, folding it into `±X^degree` with
    /// `degree < dimension` by `X^N = -1`.
    #[inline]
    pub fn monomial(exponent: i64, dimension: usize) -> Self {
        let exponent = exponent.rem_euclid((dimension as i64) << 1) as usize;
        if exponent >= dimension {
            Self::Monomial {
                degree: exponent - dimension,
                negative: true,
            }
        } else {
            Self::Monomial {
                degree: exponent,
                negative: false,
            }
        }
    }
}

/// A gadget ciphertext (RGSW) stored in transform representation.
///
/// It holds `2·digits` rows of [`NttRlwe`] samples under a ring secret `z`. For a message
/// `m` and gadget vector `(G^0, .., G^(digits-1))`:
///
/// - row `2l` is `(a + G^l·m, a·z + e)`, its phase is `e - G^l·m·z`;
/// - row `2l+1` is `(a', a'·z + e' + G^l·m)`, its phase is `e' + G^l·m`.
///
/// The message is never decrypted directly, it only acts through the external product
/// [`Rlwe::mul_ntt_rgsw_inplace`](crate::Rlwe::mul_ntt_rgsw_inplace).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NttRgsw {
    rows: Vec<NttRlwe>,
}

impl NttRgsw {
    /// Creates a new [`NttRgsw`] from its rows.
    #[inline]
    pub fn new(rows: Vec<NttRlwe>) -> Self {
        debug_assert!(rows.len() % 2 == 0);
        Self { rows }
    }

    /// Creates an all-zero [`NttRgsw`] with `2·digits` rows.
    #[inline]
    pub fn zero(coeff_count: usize, digits: usize) -> Self {
        Self {
            rows: vec![NttRlwe::zero(coeff_count); digits << 1],
        }
    }

    /// Returns the rows of this [`NttRgsw`].
    #[inline]
    pub fn rows(&self) -> &[NttRlwe] {
        &self.rows
    }

    /// Returns the mutable rows of this [`NttRgsw`].
    #[inline]
    pub fn rows_mut(&mut self) -> &mut [NttRlwe] {
        &mut self.rows
    }

    /// Returns the row count `2·digits` of this [`NttRgsw`].
    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the gadget digit count of this [`NttRgsw`].
    #[inline]
    pub fn digits(&self) -> usize {
        self.rows.len() >> 1
    }

    /// Returns the coefficient count of the ring elements.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.rows.first().map_or(0, |row| row.a().coeff_count())
    }

    /// Performs `self += rhs` row-wise.
    #[inline]
    pub fn add_assign_element_wise(&mut self, rhs: &Self, modulus: BarrettModulus) {
        debug_assert_eq!(self.row_count(), rhs.row_count());
        self.rows
            .iter_mut()
            .zip(rhs.rows())
            .for_each(|(r0, r1)| r0.add_assign_element_wise(r1, modulus));
    }

    /// Subtracts `polys[r]` from the `a` element of row `r`, for every row.
    #[inline]
    pub fn sub_assign_a_column(&mut self, polys: &[NttPolynomial], modulus: BarrettModulus) {
        debug_assert_eq!(self.row_count(), polys.len());
        self.rows
            .iter_mut()
            .zip(polys)
            .for_each(|(row, p)| row.a_mut().sub_reduce_assign(p, modulus));
    }

    /// Multiplies every ring element of this [`NttRgsw`] by `X^amount` in place.
    ///
    /// Each element is brought back to coefficients, its coefficients are permuted with
    /// [`rotate_ring_signed_into`], and it is transformed again. An encryption of `m`
    /// becomes an encryption of `X^amount·m` under the same secret, with the same noise
    /// norm. `scratch` must hold `N` coefficients.
    pub fn mul_monomial_inplace(
        &mut self,
        amount: i64,
        table: &NttTable,
        scratch: &mut Polynomial,
    ) {
        let modulus = table.modulus();
        for row in self.rows.iter_mut() {
            let (a, b) = row.parts_mut();
            for element in [a, b] {
                table.inverse_transform_into(element, scratch);
                let destination = element.as_mut_slice();
                rotate_ring_signed_into(scratch.as_slice(), amount, modulus, destination);
                table.transform_slice(element.as_mut_slice());
            }
        }
    }

    /// Returns this [`NttRgsw`] multiplied by `X^amount`.
    #[inline]
    pub fn mul_monomial(&self, amount: i64, table: &NttTable) -> Self {
        let mut result = self.clone();
        let mut scratch = Polynomial::zero(table.dimension());
        result.mul_monomial_inplace(amount, table, &mut scratch);
        result
    }

    /// Encrypts `message` under `ntt_secret`.
    ///
    /// Row `r` uses `masks[r]` as its `a` when masks are given, and a uniform `a` otherwise.
    /// Errors are drawn from `gaussian`, or left out when it is `None`.
    #[allow(clippy::too_many_arguments)]
    pub fn encrypt<R>(
        ntt_secret: &NttPolynomial,
        message: RgswMessage,
        decomposer: &SignedDigitDecomposer,
        masks: Option<&[Polynomial]>,
        gaussian: Option<&DiscreteGaussian>,
        table: &NttTable,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + CryptoRng,
    {
        let n = table.dimension();
        let modulus = table.modulus();
        let row_count = decomposer.digits() << 1;
        debug_assert!(masks.map_or(true, |m| m.len() == row_count));

        let gadget_terms: Vec<Option<NttPolynomial>> = decomposer
            .gadget()
            .iter()
            .map(|&g| match message {
                RgswMessage::Monomial { degree, negative } => {
                    let mut term = Polynomial::zero(n);
                    term[degree] = if negative { modulus.reduce_neg(g) } else { g };
                    Some(table.transform_inplace(term))
                }
                RgswMessage::Zero => None,
            })
            .collect();

        let rows = (0..row_count)
            .map(|r| {
                let mask = masks.map(|m| &m[r]);
                let mut row =
                    NttRlwe::generate_zero_sample(ntt_secret, mask, gaussian, table, rng);
                if let Some(term) = &gadget_terms[r >> 1] {
                    if r & 1 == 0 {
                        row.a_mut().add_reduce_assign(term, modulus);
                    } else {
                        row.b_mut().add_reduce_assign(term, modulus);
                    }
                }
                row
            })
            .collect();

        Self { rows }
    }
}
