use algebra::{
    random::sample_uniform_values,
    reduce::ReduceAdd,
    PowOf2Modulus,
};
use lattice::Lwe;
use rand::{prelude::Distribution, CryptoRng, Rng};

use crate::{LweSecretKey, Parameters};

/// An LWE ciphertext of a bit, modulo `q`.
pub type LweCiphertext = Lwe<u64>;

/// Encodes a bit into `Z_q` as `bit·q/4`.
#[inline]
pub fn encode(bit: bool, modulus: u64) -> u64 {
    if bit {
        modulus >> 2
    } else {
        0
    }
}

/// Decodes a phase in `Z_q` as `round(4·phase/q) mod 4`, nonzero meaning `true`.
#[inline]
pub fn decode(phase: u64, modulus: u64) -> bool {
    let scaled = ((phase as u128) << 2) + (modulus as u128 >> 1);
    (scaled / modulus as u128) % 4 != 0
}

impl LweSecretKey {
    /// Encrypts a bit as `(a, <a, s> + bit·q/4 + e)`.
    pub fn encrypt_bit<R>(&self, bit: bool, params: &Parameters, rng: &mut R) -> LweCiphertext
    where
        R: Rng + CryptoRng,
    {
        let q = params.lwe_modulus_value();
        let modulus = params.lwe_modulus();

        let a = sample_uniform_values(self.dimension(), q, rng);
        let mut b = lattice::utils::dot_product(&a, self.as_slice(), modulus);
        b = modulus.reduce_add(b, encode(bit, q));
        b = modulus.reduce_add(b, params.lwe_noise().sample(rng));

        Lwe::new(a, b)
    }

    /// Decrypts a bit encrypted by [`LweSecretKey::encrypt_bit`].
    #[inline]
    pub fn decrypt_bit(&self, ciphertext: &LweCiphertext, params: &Parameters) -> bool {
        let phase = ciphertext.phase(self.as_slice(), params.lwe_modulus());
        decode(phase, params.lwe_modulus_value())
    }
}

/// Returns `ct0 + ct1`.
#[inline]
pub(crate) fn add_inputs(
    ct0: &LweCiphertext,
    ct1: &LweCiphertext,
    modulus: PowOf2Modulus,
) -> LweCiphertext {
    ct0.clone().add_reduce_component_wise(ct1, modulus)
}

/// Returns `2·(ct0 - ct1)`.
#[inline]
pub(crate) fn double_difference_inputs(
    ct0: &LweCiphertext,
    ct1: &LweCiphertext,
    modulus: PowOf2Modulus,
) -> LweCiphertext {
    let mut result = ct0.clone().sub_reduce_component_wise(ct1, modulus);
    result.mul_scalar_reduce_assign(2, modulus);
    result
}

/// Returns the homomorphic negation `(-a, q/4 - b)` of a bit ciphertext.
#[inline]
pub(crate) fn not_input(ct: &LweCiphertext, modulus: PowOf2Modulus) -> LweCiphertext {
    let mut result = ct.clone();
    result.neg_reduce_assign(modulus);
    let q = modulus.value();
    *result.b_mut() = modulus.reduce_add(result.b(), q >> 2);
    result
}
