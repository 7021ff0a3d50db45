use algebra::{BarrettModulus, NttPolynomial, NttTable, Polynomial};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::Parameters;

/// Identifies one batch of common random polynomials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrsSlot {
    /// Masks of the aggregated encryption of one.
    One,
    /// Mask of the joint public key.
    PublicKey,
    /// Mask of the automorphism key for gadget digit `digit` and window index `window`.
    Automorphism {
        /// Gadget digit position.
        digit: usize,
        /// Window index.
        window: usize,
    },
}

impl CrsSlot {
    /// Returns the ChaCha stream of this slot.
    #[inline]
    fn stream(self) -> u64 {
        const LOW: u64 = (1 << 31) - 1;
        match self {
            CrsSlot::One => 0,
            CrsSlot::PublicKey => 1 << 62,
            CrsSlot::Automorphism { digit, window } => {
                (2 << 62) | ((digit as u64 & LOW) << 31) | (window as u64 & LOW)
            }
        }
    }

    /// Returns how many polynomials the slot holds for `gadget_rows` gadget rows.
    #[inline]
    fn len(self, gadget_rows: usize) -> usize {
        match self {
            CrsSlot::One => gadget_rows,
            CrsSlot::PublicKey | CrsSlot::Automorphism { .. } => 1,
        }
    }
}

/// Common random polynomials shared by all parties, expanded from a public seed.
///
/// Every [`CrsSlot`] reads its own ChaCha20 stream, so each slot is reproducible on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonRandomness {
    seed: [u8; 32],
    ring_dimension: usize,
    ring_modulus: BarrettModulus,
    gadget_rows: usize,
}

impl CommonRandomness {
    /// Creates a new [`CommonRandomness`] from a public seed.
    #[inline]
    pub fn new(params: &Parameters, seed: [u8; 32]) -> Self {
        Self {
            seed,
            ring_dimension: params.ring_dimension(),
            ring_modulus: params.ring_modulus(),
            gadget_rows: params.gadget_rows(),
        }
    }

    /// Returns the seed.
    #[inline]
    pub fn seed(&self) -> &[u8; 32] {
        &self.seed
    }

    /// Returns the polynomials of `slot`: one per gadget row for [`CrsSlot::One`], a single
    /// one otherwise.
    pub fn polynomials(&self, slot: CrsSlot) -> Vec<Polynomial> {
        let mut rng = ChaCha20Rng::from_seed(self.seed);
        rng.set_stream(slot.stream());
        (0..slot.len(self.gadget_rows))
            .map(|_| Polynomial::random(self.ring_dimension, self.ring_modulus, &mut rng))
            .collect()
    }

    /// Returns the polynomials of `slot` in transform representation.
    #[inline]
    pub fn ntt_polynomials(&self, slot: CrsSlot, table: &NttTable) -> Vec<NttPolynomial> {
        self.polynomials(slot)
            .into_iter()
            .map(|p| table.transform_inplace(p))
            .collect()
    }
}
