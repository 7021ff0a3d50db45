use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use algebra::{decompose::SignedDigitDecomposer, utils::Pool, NttTable};
use lattice::{utils::ExternalProductSpace, Rlwe};
use tracing::{instrument, trace};

use crate::{BootstrappingKey, FhewError, Parameters};

/// Preallocated space for one accumulation.
#[derive(Debug, Clone)]
pub struct AccumulatorSpace {
    product: ExternalProductSpace,
}

impl AccumulatorSpace {
    /// Creates a new [`AccumulatorSpace`].
    #[inline]
    pub fn new(ring_dimension: usize, gadget_digits: usize) -> Self {
        Self {
            product: ExternalProductSpace::new(ring_dimension, gadget_digits),
        }
    }
}

impl Deref for AccumulatorSpace {
    type Target = ExternalProductSpace;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.product
    }
}

impl DerefMut for AccumulatorSpace {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.product
    }
}

/// The DM accumulator.
///
/// It owns a [`BootstrappingKey`] and multiplies an RLWE accumulator by
/// `X^(-(2N/q)·<a, s>)` for an LWE mask `a`, one external product per nonzero refresh
/// digit of each `-a_i mod q`.
#[derive(Debug, Clone)]
pub struct Accumulator {
    key: BootstrappingKey,
    decomposer: SignedDigitDecomposer,
    ntt_table: Arc<NttTable>,
    lwe_modulus: u64,
    space: Pool<AccumulatorSpace>,
}

impl Accumulator {
    /// Creates a new [`Accumulator`], `key` must have the shape `params` describes.
    pub fn new(params: &Parameters, key: BootstrappingKey) -> Result<Self, FhewError> {
        if !key.is_compatible(params) {
            return Err(FhewError::KeyShapeMismatch);
        }
        Ok(Self {
            key,
            decomposer: params.decomposer().clone(),
            ntt_table: Arc::clone(params.ntt_table()),
            lwe_modulus: params.lwe_modulus_value(),
            space: Pool::new(),
        })
    }

    /// Returns the bootstrapping key.
    #[inline]
    pub fn key(&self) -> &BootstrappingKey {
        &self.key
    }

    /// Returns the bootstrapping key, consuming the accumulator.
    #[inline]
    pub fn into_key(self) -> BootstrappingKey {
        self.key
    }

    /// Multiplies `acc` by `X^(-(2N/q)·<mask, s>)`.
    #[instrument(level = "trace", skip_all, fields(lwe_dimension = mask.len()))]
    pub fn accumulate(&self, acc: &mut Rlwe, mask: &[u64]) -> Result<(), FhewError> {
        let lwe_dimension = self.key.lwe_dimension();
        if mask.len() != lwe_dimension {
            return Err(FhewError::MaskLength {
                expected: lwe_dimension,
                found: mask.len(),
            });
        }

        let basis = self.key.refresh_basis() as u64;
        let mut space = self.space.get_or_else(|| {
            AccumulatorSpace::new(self.ntt_table.dimension(), self.decomposer.digits())
        });

        let mut products = 0usize;
        for (i, &a_i) in mask.iter().enumerate() {
            let mut residue = (self.lwe_modulus - a_i % self.lwe_modulus) % self.lwe_modulus;
            for k in 0..self.key.refresh_digits() {
                let digit = (residue % basis) as usize;
                residue /= basis;
                if digit == 0 {
                    continue;
                }
                if let Some(cell) = self.key.get(i, digit, k) {
                    acc.mul_ntt_rgsw_inplace(cell, &self.decomposer, &self.ntt_table, &mut space);
                    products += 1;
                }
            }
            trace!(coordinate = i, products, "coordinate accumulated");
        }

        self.space.store(space);
        Ok(())
    }
}
