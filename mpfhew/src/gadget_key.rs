use std::sync::Arc;

use algebra::{decompose::SignedDigitDecomposer, random::DiscreteGaussian, NttTable, Polynomial};
use lattice::{NttRgsw, RgswMessage};
use rand::{CryptoRng, Rng};

use crate::{NoiseMode, Parameters, RingSecretKey};

/// Builds gadget (RGSW) ciphertexts of LWE messages under a ring secret.
///
/// A message `m` is mapped to the monomial `X^((m mod q)·2N/q)`, folded into `±X^mm` with
/// `mm < N`. Row `r` of the result uses `common[r]` as its mask when common masks are
/// given, which is how parties build shares over the same common random polynomials.
#[derive(Debug, Clone)]
pub struct GadgetKeyBuilder {
    decomposer: SignedDigitDecomposer,
    gaussian: Option<DiscreteGaussian>,
    ntt_table: Arc<NttTable>,
    lwe_modulus: i64,
    twice_ring_dimension_div_lwe_modulus: i64,
}

impl GadgetKeyBuilder {
    /// Creates a new [`GadgetKeyBuilder`].
    pub fn new(params: &Parameters) -> Self {
        let gaussian = match params.noise_mode() {
            NoiseMode::Gaussian => Some(*params.ring_noise()),
            NoiseMode::Omitted => None,
        };
        Self {
            decomposer: params.decomposer().clone(),
            gaussian,
            ntt_table: Arc::clone(params.ntt_table()),
            lwe_modulus: params.lwe_modulus_value() as i64,
            twice_ring_dimension_div_lwe_modulus: params.twice_ring_dimension_div_lwe_modulus()
                as i64,
        }
    }

    /// Returns the row count of the built ciphertexts.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.decomposer.digits() << 1
    }

    /// Returns the ntt table.
    #[inline]
    pub fn ntt_table(&self) -> &Arc<NttTable> {
        &self.ntt_table
    }

    /// Encrypts the LWE message `message`, reduced modulo `q`.
    #[inline]
    pub fn encrypt<R>(
        &self,
        secret: &RingSecretKey,
        message: i64,
        common: Option<&[Polynomial]>,
        rng: &mut R,
    ) -> NttRgsw
    where
        R: Rng + CryptoRng,
    {
        let exponent =
            message.rem_euclid(self.lwe_modulus) * self.twice_ring_dimension_div_lwe_modulus;
        self.encrypt_monomial(secret, exponent as usize, common, rng)
    }

    /// Encrypts the monomial `X^exponent` for `exponent < 2N`.
    pub fn encrypt_monomial<R>(
        &self,
        secret: &RingSecretKey,
        exponent: usize,
        common: Option<&[Polynomial]>,
        rng: &mut R,
    ) -> NttRgsw
    where
        R: Rng + CryptoRng,
    {
        let dimension = self.ntt_table.dimension();
        debug_assert!(exponent < dimension << 1);
        self.encrypt_message(
            secret,
            RgswMessage::monomial(exponent as i64, dimension),
            common,
            rng,
        )
    }

    /// Encrypts the zero polynomial, no gadget term is added.
    #[inline]
    pub fn encrypt_zero<R>(
        &self,
        secret: &RingSecretKey,
        common: Option<&[Polynomial]>,
        rng: &mut R,
    ) -> NttRgsw
    where
        R: Rng + CryptoRng,
    {
        self.encrypt_message(secret, RgswMessage::Zero, common, rng)
    }

    fn encrypt_message<R>(
        &self,
        secret: &RingSecretKey,
        message: RgswMessage,
        common: Option<&[Polynomial]>,
        rng: &mut R,
    ) -> NttRgsw
    where
        R: Rng + CryptoRng,
    {
        debug_assert!(common.map_or(true, |c| c.len() == self.row_count()));
        NttRgsw::encrypt(
            secret.ntt_key(),
            message,
            &self.decomposer,
            common,
            self.gaussian.as_ref(),
            &self.ntt_table,
            rng,
        )
    }
}

#[cfg(test)]
mod tests {
    use algebra::reduce::ReduceNeg;

    use super::*;
    use crate::{ConstParameters, TOY_PARAMETERS};

    fn noiseless() -> Parameters {
        Parameters::new(ConstParameters {
            noise_mode: NoiseMode::Omitted,
            ..TOY_PARAMETERS
        })
        .unwrap()
    }

    #[test]
    fn test_rows_phase() {
        let mut rng = rand::thread_rng();
        let params = noiseless();
        let table = params.ntt_table();
        let modulus = params.ring_modulus();
        let secret = RingSecretKey::generate(&params, &mut rng);
        let builder = GadgetKeyBuilder::new(&params);
        let n = params.ring_dimension();

        // q/2 + 3 maps to N + 3, so the gadget term is -G^l·X^3.
        let key = builder.encrypt(&secret, 512 + 3, None, &mut rng);
        assert_eq!(key.row_count(), 6);

        for (l, &g) in params.gadget().iter().enumerate() {
            let odd = key.rows()[2 * l + 1].to_rlwe(table);
            let phase = odd.phase(secret.ntt_key(), table);
            let mut expected = Polynomial::zero(n);
            expected[3] = modulus.reduce_neg(g);
            assert_eq!(phase, expected);

            let even = key.rows()[2 * l].to_rlwe(table);
            let phase = even.phase(secret.ntt_key(), table);
            let mut expected = secret.key().mul_monomial(3, modulus);
            expected.mul_scalar_reduce_assign(g, modulus);
            assert_eq!(phase, expected);
        }
    }

    #[test]
    fn test_common_masks() {
        let mut rng = rand::thread_rng();
        let params = noiseless();
        let table = params.ntt_table();
        let secret = RingSecretKey::generate(&params, &mut rng);
        let builder = GadgetKeyBuilder::new(&params);

        let masks: Vec<Polynomial> = (0..builder.row_count())
            .map(|_| Polynomial::random(params.ring_dimension(), params.ring_modulus(), &mut rng))
            .collect();
        let zero = builder.encrypt_zero(&secret, Some(&masks), &mut rng);
        for (row, mask) in zero.rows().iter().zip(&masks) {
            assert_eq!(row.a(), &table.transform(mask));
            assert!(row.to_rlwe(table).phase(secret.ntt_key(), table).is_zero());
        }

        // The message aliases modulo q.
        let k0 = builder.encrypt(&secret, 7, Some(&masks), &mut rng);
        let k1 = builder.encrypt(&secret, 7 - 1024, Some(&masks), &mut rng);
        assert_eq!(k0, k1);
        let k2 = builder.encrypt_monomial(&secret, 7, Some(&masks), &mut rng);
        assert_eq!(k0, k2);
    }
}
