use algebra::{NttPolynomial, Polynomial};
use lattice::{NttRlwe, Rlwe};
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{CommonRandomness, CrsSlot, FhewError, NoiseMode, Parameters, RingSecretKey};

/// The generator `g` of the automorphism group used for windows.
pub const AUTOMORPHISM_GENERATOR: usize = 5;

/// Returns the automorphism degree of window index `window`: `2N - g` for `0`, and
/// `g^window mod 2N` otherwise.
#[inline]
pub fn automorphism_degree(window: usize, ring_dimension: usize) -> usize {
    let twice_ring_dimension = ring_dimension << 1;
    if window == 0 {
        twice_ring_dimension - AUTOMORPHISM_GENERATOR % twice_ring_dimension
    } else {
        let mut degree = 1;
        for _ in 0..window {
            degree = degree * AUTOMORPHISM_GENERATOR % twice_ring_dimension;
        }
        degree
    }
}

/// Gadget key switching keys for the automorphisms `X -> X^(g_w)`, `w <= window`.
///
/// Row `l` of window `w` is `(c, c·z + e - G^l·σ_w(z))` for a common random `c`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomorphismKey {
    keys: Vec<Vec<NttRlwe>>,
}

impl AutomorphismKey {
    /// Returns the largest window index.
    #[inline]
    pub fn window(&self) -> usize {
        self.keys.len() - 1
    }

    /// Returns `σ_w(ciphertext)`, an encryption of `σ_w(m)` under the original secret.
    pub fn apply(
        &self,
        ciphertext: &Rlwe,
        window: usize,
        params: &Parameters,
    ) -> Result<Rlwe, FhewError> {
        let rows = self.keys.get(window).ok_or(FhewError::KeyShapeMismatch)?;
        let modulus = params.ring_modulus();
        let table = params.ntt_table();
        let ring_dimension = params.ring_dimension();
        if ciphertext.dimension() != ring_dimension {
            return Err(FhewError::KeyShapeMismatch);
        }
        let degree = automorphism_degree(window, ring_dimension);

        let a = ciphertext.a().automorphism(degree, modulus);
        let mut acc = NttRlwe::zero(ring_dimension);
        let mut ntt_digit = NttPolynomial::zero(ring_dimension);
        for (digit, row) in params.decomposer().decompose(&a).iter().zip(rows) {
            table.transform_into(digit, &mut ntt_digit);
            acc.add_ntt_mul_assign(&ntt_digit, row, modulus);
        }

        let mut result = acc.to_rlwe(table);
        result
            .b_mut()
            .add_reduce_assign(&ciphertext.b().automorphism(degree, modulus), modulus);
        Ok(result)
    }
}

/// Builds an [`AutomorphismKey`] jointly, one party after another.
#[derive(Debug, Clone)]
pub struct AutomorphismKeyAssembler {
    params: Parameters,
    keys: Vec<Vec<NttRlwe>>,
    parties: usize,
    absorbed: usize,
}

impl AutomorphismKeyAssembler {
    /// Seeds the `a` column of every row with the [`CrsSlot::Automorphism`] polynomials.
    pub fn new(
        params: &Parameters,
        crs: &CommonRandomness,
        window: usize,
        parties: usize,
    ) -> Result<Self, FhewError> {
        if parties == 0 {
            return Err(FhewError::NoShares);
        }
        let table = params.ntt_table();
        let ring_dimension = params.ring_dimension();
        let keys = (0..=window)
            .map(|w| {
                (0..params.gadget_digits())
                    .map(|digit| {
                        let slot = CrsSlot::Automorphism { digit, window: w };
                        let mut masks = crs.ntt_polynomials(slot, table);
                        let a = masks.pop().ok_or(FhewError::KeyShapeMismatch)?;
                        Ok(NttRlwe::new(a, NttPolynomial::zero(ring_dimension)))
                    })
                    .collect::<Result<Vec<_>, FhewError>>()
            })
            .collect::<Result<Vec<_>, FhewError>>()?;

        Ok(Self {
            params: params.clone(),
            keys,
            parties,
            absorbed: 0,
        })
    }

    /// Adds party `party_index`'s share `c·z_p + e_p - G^l·σ_w(z_p)` to every row.
    #[instrument(skip_all, fields(party = party_index, parties = self.parties))]
    pub fn absorb<R>(
        mut self,
        party_index: usize,
        secret: &RingSecretKey,
        rng: &mut R,
    ) -> Result<Self, FhewError>
    where
        R: Rng + CryptoRng,
    {
        if party_index != self.absorbed || party_index >= self.parties {
            return Err(FhewError::PartyOutOfOrder {
                expected: self.absorbed,
                found: party_index,
            });
        }
        let ring_dimension = self.params.ring_dimension();
        if secret.key().coeff_count() != ring_dimension {
            return Err(FhewError::KeyShapeMismatch);
        }

        let modulus = self.params.ring_modulus();
        let table = self.params.ntt_table();
        let gaussian = match self.params.noise_mode() {
            NoiseMode::Gaussian => Some(self.params.ring_noise()),
            NoiseMode::Omitted => None,
        };

        for (w, rows) in self.keys.iter_mut().enumerate() {
            let degree = automorphism_degree(w, ring_dimension);
            let ntt_auto_secret =
                table.transform_inplace(secret.key().automorphism(degree, modulus));

            for (row, &g) in rows.iter_mut().zip(self.params.gadget()) {
                let e = match gaussian {
                    Some(gaussian) => Polynomial::random_gaussian(ring_dimension, gaussian, rng),
                    None => Polynomial::zero(ring_dimension),
                };
                let mut share = table.transform_inplace(e);
                share.add_mul_reduce_assign(row.a(), secret.ntt_key(), modulus);
                let mut gadget_term = ntt_auto_secret.clone();
                gadget_term.mul_scalar_reduce_assign(g, modulus);
                share.sub_reduce_assign(&gadget_term, modulus);
                row.b_mut().add_reduce_assign(&share, modulus);
            }
        }

        self.absorbed += 1;
        debug!(absorbed = self.absorbed, "automorphism share absorbed");
        Ok(self)
    }

    /// Returns the finished key once every party has contributed.
    pub fn finish(self) -> Result<AutomorphismKey, FhewError> {
        if self.absorbed != self.parties {
            return Err(FhewError::IncompleteAssembly {
                absorbed: self.absorbed,
                parties: self.parties,
            });
        }
        Ok(AutomorphismKey { keys: self.keys })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrees() {
        assert_eq!(automorphism_degree(0, 512), 1019);
        assert_eq!(automorphism_degree(1, 512), 5);
        assert_eq!(automorphism_degree(2, 512), 25);
        for w in 1..20 {
            assert_eq!(
                automorphism_degree(w, 512) as u64,
                5u64.pow(w as u32) % 1024
            );
            assert_eq!(automorphism_degree(w, 512) % 2, 1);
        }
    }
}
