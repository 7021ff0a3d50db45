use algebra::{
    random::{sample_binary_values, sample_ternary_values},
    reduce::ReduceAdd,
    NttPolynomial, Polynomial,
};
use rand::{CryptoRng, Rng};

use crate::{FhewError, Parameters, SecretDistribution};

/// LWE secret key, values stored in `[0, q)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LweSecretKey {
    key: Vec<u64>,
}

impl LweSecretKey {
    /// Creates a new [`LweSecretKey`] from values in `[0, q)`.
    #[inline]
    pub fn new(key: Vec<u64>) -> Self {
        Self { key }
    }

    /// Samples a new [`LweSecretKey`] with the distribution of `params`.
    pub fn generate<R>(params: &Parameters, rng: &mut R) -> Self
    where
        R: Rng + CryptoRng,
    {
        let n = params.lwe_dimension();
        let key = match params.lwe_secret_distribution() {
            SecretDistribution::Binary => sample_binary_values(n, rng),
            SecretDistribution::Ternary => {
                sample_ternary_values(n, params.lwe_modulus_value(), rng)
            }
        };
        Self { key }
    }

    /// Returns the key values.
    #[inline]
    pub fn as_slice(&self) -> &[u64] {
        &self.key
    }

    /// Returns the dimension of this [`LweSecretKey`].
    #[inline]
    pub fn dimension(&self) -> usize {
        self.key.len()
    }

    /// Returns the key values centered into `(-q/2, q/2]`.
    pub fn centered(&self, params: &Parameters) -> Vec<i64> {
        self.key
            .iter()
            .map(|&v| params.centered_lwe_value(v))
            .collect()
    }

    /// Returns the sum of the given keys modulo `q`.
    pub fn joint(keys: &[&Self], params: &Parameters) -> Result<Self, FhewError> {
        let modulus = params.lwe_modulus();
        let (first, rest) = keys.split_first().ok_or(FhewError::NoShares)?;
        let mut key = first.key.clone();
        for other in rest {
            if other.dimension() != key.len() {
                return Err(FhewError::KeyShapeMismatch);
            }
            key.iter_mut()
                .zip(&other.key)
                .for_each(|(a, &b)| *a = modulus.reduce_add(*a, b));
        }
        Ok(Self { key })
    }
}

/// Ring secret key `z`, kept in coefficient and transform representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingSecretKey {
    key: Polynomial,
    ntt_key: NttPolynomial,
}

impl RingSecretKey {
    /// Creates a new [`RingSecretKey`] from its coefficients.
    #[inline]
    pub fn new(key: Polynomial, params: &Parameters) -> Self {
        let ntt_key = params.ntt_table().transform(&key);
        Self { key, ntt_key }
    }

    /// Samples a new [`RingSecretKey`] with the distribution of `params`.
    pub fn generate<R>(params: &Parameters, rng: &mut R) -> Self
    where
        R: Rng + CryptoRng,
    {
        let n = params.ring_dimension();
        let key = match params.ring_secret_distribution() {
            SecretDistribution::Binary => Polynomial::random_binary(n, rng),
            SecretDistribution::Ternary => {
                Polynomial::random_ternary(n, params.ring_modulus(), rng)
            }
        };
        Self::new(key, params)
    }

    /// Returns the coefficients of this [`RingSecretKey`].
    #[inline]
    pub fn key(&self) -> &Polynomial {
        &self.key
    }

    /// Returns the transform representation of this [`RingSecretKey`].
    #[inline]
    pub fn ntt_key(&self) -> &NttPolynomial {
        &self.ntt_key
    }

    /// Returns the sum of the given keys modulo `Q`.
    pub fn joint(keys: &[&Self], params: &Parameters) -> Result<Self, FhewError> {
        let modulus = params.ring_modulus();
        let (first, rest) = keys.split_first().ok_or(FhewError::NoShares)?;
        let mut key = first.key.clone();
        for other in rest {
            if other.key.coeff_count() != key.coeff_count() {
                return Err(FhewError::KeyShapeMismatch);
            }
            key.add_reduce_assign(&other.key, modulus);
        }
        Ok(Self::new(key, params))
    }
}

/// The secret shares one party holds.
#[derive(Debug, Clone)]
pub struct PartySecret {
    lwe: LweSecretKey,
    ring: RingSecretKey,
}

impl PartySecret {
    /// Samples the LWE and ring shares of one party.
    pub fn generate<R>(params: &Parameters, rng: &mut R) -> Self
    where
        R: Rng + CryptoRng,
    {
        Self {
            lwe: LweSecretKey::generate(params, rng),
            ring: RingSecretKey::generate(params, rng),
        }
    }

    /// Returns the LWE share.
    #[inline]
    pub fn lwe(&self) -> &LweSecretKey {
        &self.lwe
    }

    /// Returns the ring share.
    #[inline]
    pub fn ring(&self) -> &RingSecretKey {
        &self.ring
    }

    /// Returns the joint keys `(Σ s_p mod q, Σ z_p mod Q)` of all parties.
    pub fn joint(
        secrets: &[PartySecret],
        params: &Parameters,
    ) -> Result<(LweSecretKey, RingSecretKey), FhewError> {
        let lwe: Vec<&LweSecretKey> = secrets.iter().map(PartySecret::lwe).collect();
        let ring: Vec<&RingSecretKey> = secrets.iter().map(PartySecret::ring).collect();
        Ok((
            LweSecretKey::joint(&lwe, params)?,
            RingSecretKey::joint(&ring, params)?,
        ))
    }
}
