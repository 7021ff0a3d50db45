#![allow(dead_code)]

use algebra::Polynomial;
use lattice::{NttRlwe, Rlwe};
use mpfhew::{
    aggregate, BootstrappingKey, CommonRandomness, GadgetKeyBuilder, JointPublicKey,
    MultipartyKeyAssembler, Parameters, PartySecret, PublicKeyShare, RgswShare, RingSecretKey,
};
use rand::{CryptoRng, Rng};

/// Installs a test writer subscriber once.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Samples `count` party secrets.
pub fn party_secrets<R>(params: &Parameters, count: usize, rng: &mut R) -> Vec<PartySecret>
where
    R: Rng + CryptoRng,
{
    (0..count)
        .map(|_| PartySecret::generate(params, rng))
        .collect()
}

/// Aggregates the encryption of one every assembly starts from.
pub fn aggregate_one<R>(
    params: &Parameters,
    secrets: &[PartySecret],
    crs: &CommonRandomness,
    rng: &mut R,
) -> lattice::NttRgsw
where
    R: Rng + CryptoRng,
{
    let builder = GadgetKeyBuilder::new(params);
    let shares: Vec<RgswShare> = secrets
        .iter()
        .enumerate()
        .map(|(p, secret)| {
            if p == 0 {
                RgswShare::one(&builder, crs, secret.ring(), rng)
            } else {
                RgswShare::zero(&builder, crs, secret.ring(), rng)
            }
        })
        .collect();
    aggregate(&shares, crs, params).unwrap()
}

/// Aggregates every party's share of the joint public key.
pub fn joint_public_key<R>(
    params: &Parameters,
    secrets: &[PartySecret],
    crs: &CommonRandomness,
    rng: &mut R,
) -> JointPublicKey
where
    R: Rng + CryptoRng,
{
    let shares: Vec<PublicKeyShare> = secrets
        .iter()
        .map(|secret| PublicKeyShare::generate(params, crs, secret.ring(), rng))
        .collect();
    JointPublicKey::aggregate(&shares, crs, params).unwrap()
}

/// Runs the whole key assembly protocol over `secrets`, in order.
///
/// With `rerandomize`, every party hides its rotation under the joint public key.
pub fn assemble_key<R>(
    params: &Parameters,
    secrets: &[PartySecret],
    crs: &CommonRandomness,
    rerandomize: bool,
    rng: &mut R,
) -> BootstrappingKey
where
    R: Rng + CryptoRng,
{
    let one = aggregate_one(params, secrets, crs, rng);
    let public_key = rerandomize.then(|| joint_public_key(params, secrets, crs, rng));

    let mut assembler = MultipartyKeyAssembler::new(params, &one, secrets.len()).unwrap();
    for (p, secret) in secrets.iter().enumerate() {
        assembler = assembler
            .absorb(p, secret.lwe(), public_key.as_ref(), rng)
            .unwrap();
    }
    assembler.finish().unwrap()
}

/// Encodes `values` in `{0, 1, 2, 3}` as `round(v·Q/4)`.
pub fn encode_polynomial(values: &[u64], params: &Parameters) -> Polynomial {
    let q = params.ring_modulus_value();
    Polynomial::new(
        values
            .iter()
            .map(|&v| ((v as u128 * q as u128 + 2) / 4) as u64 % q)
            .collect(),
    )
}

/// Decodes every coefficient as `round(4·c/Q) mod 4`.
pub fn decode_polynomial(polynomial: &Polynomial, params: &Parameters) -> Vec<u64> {
    let q = params.ring_modulus_value() as u128;
    polynomial
        .iter()
        .map(|&c| (((c as u128) * 4 + q / 2) / q % 4) as u64)
        .collect()
}

/// Samples a message polynomial with coefficients in `{0, 1, 2, 3}`.
pub fn random_values<R: Rng>(params: &Parameters, rng: &mut R) -> Vec<u64> {
    (0..params.ring_dimension())
        .map(|_| rng.gen_range(0..4))
        .collect()
}

/// Encrypts `message` under `secret` with fresh ring noise.
pub fn encrypt_rlwe<R>(
    message: &Polynomial,
    secret: &RingSecretKey,
    params: &Parameters,
    rng: &mut R,
) -> Rlwe
where
    R: Rng + CryptoRng,
{
    let table = params.ntt_table();
    let zero = NttRlwe::generate_zero_sample(
        secret.ntt_key(),
        None,
        Some(params.ring_noise()),
        table,
        rng,
    );
    let mut rlwe = zero.to_rlwe(table);
    rlwe.b_mut().add_reduce_assign(message, params.ring_modulus());
    rlwe
}

/// Decrypts and decodes `rlwe` under `secret`.
pub fn decrypt_rlwe(rlwe: &Rlwe, secret: &RingSecretKey, params: &Parameters) -> Vec<u64> {
    let phase = rlwe.phase(secret.ntt_key(), params.ntt_table());
    decode_polynomial(&phase, params)
}
