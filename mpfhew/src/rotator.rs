use std::sync::Arc;

use algebra::{NttTable, Polynomial};
use lattice::NttRgsw;

use crate::Parameters;

/// Rotates gadget ciphertexts by a plaintext amount.
///
/// Every ring element of the key is multiplied by `X^t` with `t = (amount mod q)·2N/q`,
/// which turns an encryption of `X^m` into an encryption of `X^(m + t)` under the same
/// secret and with the same noise norm.
#[derive(Debug, Clone)]
pub struct HomomorphicRotator {
    ntt_table: Arc<NttTable>,
    lwe_modulus: i64,
    twice_ring_dimension_div_lwe_modulus: i64,
}

impl HomomorphicRotator {
    /// Creates a new [`HomomorphicRotator`].
    #[inline]
    pub fn new(params: &Parameters) -> Self {
        Self {
            ntt_table: Arc::clone(params.ntt_table()),
            lwe_modulus: params.lwe_modulus_value() as i64,
            twice_ring_dimension_div_lwe_modulus: params.twice_ring_dimension_div_lwe_modulus()
                as i64,
        }
    }

    /// Returns the monomial exponent in `[0, 2N)` of a rotation by `amount`.
    #[inline]
    pub fn exponent(&self, amount: i64) -> i64 {
        amount.rem_euclid(self.lwe_modulus) * self.twice_ring_dimension_div_lwe_modulus
    }

    /// Returns `key` rotated by `amount`.
    #[inline]
    pub fn rotate(&self, key: &NttRgsw, amount: i64) -> NttRgsw {
        let mut result = key.clone();
        let mut scratch = Polynomial::zero(self.ntt_table.dimension());
        self.rotate_in_place(&mut result, amount, &mut scratch);
        result
    }

    /// Rotates `key` by `amount` in place, `scratch` must hold `N` coefficients.
    #[inline]
    pub fn rotate_in_place(&self, key: &mut NttRgsw, amount: i64, scratch: &mut Polynomial) {
        let exponent = self.exponent(amount);
        if exponent != 0 {
            key.mul_monomial_inplace(exponent, &self.ntt_table, scratch);
        }
    }
}
