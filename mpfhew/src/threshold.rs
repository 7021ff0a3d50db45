use algebra::reduce::{ReduceAdd, ReduceSub};
use lattice::utils::dot_product;
use rand::{prelude::Distribution, CryptoRng, Rng};

use crate::{FhewError, Parameters, RefreshedCiphertext, RingSecretKey};

/// The lead party's partial decryption `b - <a, z_1> + e`.
pub fn partial_decrypt_lead<R>(
    ciphertext: &RefreshedCiphertext,
    secret: &RingSecretKey,
    params: &Parameters,
    rng: &mut R,
) -> u64
where
    R: Rng + CryptoRng,
{
    let modulus = params.ring_modulus();
    let partial = partial_decrypt_main(ciphertext, secret, params, rng);
    modulus.reduce_add(partial, ciphertext.lwe().b())
}

/// Another party's partial decryption `-<a, z_p> + e`.
pub fn partial_decrypt_main<R>(
    ciphertext: &RefreshedCiphertext,
    secret: &RingSecretKey,
    params: &Parameters,
    rng: &mut R,
) -> u64
where
    R: Rng + CryptoRng,
{
    let modulus = params.ring_modulus();
    let inner = dot_product(ciphertext.lwe().a(), secret.key().as_slice(), modulus);
    let smudge = params.smudging().sample(rng);
    modulus.reduce_sub(smudge, inner)
}

/// Sums the partial decryptions of all parties and decodes the bit.
pub fn fuse_partial_decryptions(partials: &[u64], params: &Parameters) -> Result<bool, FhewError> {
    if partials.is_empty() {
        return Err(FhewError::NoShares);
    }
    let modulus = params.ring_modulus();
    let phase = partials
        .iter()
        .fold(0, |acc, &partial| modulus.reduce_add(acc, partial));
    Ok(crate::decode(phase, params.ring_modulus_value()))
}
