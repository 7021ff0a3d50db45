mod common;

use algebra::Polynomial;
use lattice::{utils::ExternalProductSpace, NttRgsw, Rlwe};
use mpfhew::{
    Accumulator, BootstrappingKey, ConstParameters, GadgetKeyBuilder, HomomorphicRotator,
    LweSecretKey, Parameters, RingSecretKey, TOY_PARAMETERS,
};
use rand::Rng;

fn external_product(rlwe: &Rlwe, key: &NttRgsw, params: &Parameters) -> Rlwe {
    let mut result = rlwe.clone();
    let mut space = ExternalProductSpace::new(params.ring_dimension(), params.gadget_digits());
    result.mul_ntt_rgsw_inplace(key, params.decomposer(), params.ntt_table(), &mut space);
    result
}

fn decrypt_product(
    acc: &Rlwe,
    key: &NttRgsw,
    ring: &RingSecretKey,
    params: &Parameters,
) -> Vec<u64> {
    common::decrypt_rlwe(&external_product(acc, key, params), ring, params)
}

fn rotated_values(values: &[u64], exponent: i64, params: &Parameters) -> Vec<u64> {
    let encoded = common::encode_polynomial(values, params);
    let rotated = encoded.mul_monomial(exponent, params.ring_modulus());
    common::decode_polynomial(&rotated, params)
}

#[test]
fn test_rotate_one_by_three_is_four() {
    common::init_logging();
    let mut rng = rand::thread_rng();
    let params = Parameters::new(ConstParameters {
        lwe_dimension: 1,
        gadget_basis: 1 << 15,
        gadget_digits: 2,
        ..TOY_PARAMETERS
    })
    .unwrap();
    assert_eq!(params.ring_dimension(), 512);

    let ring = RingSecretKey::generate(&params, &mut rng);
    let builder = GadgetKeyBuilder::new(&params);
    let rotator = HomomorphicRotator::new(&params);

    let values = common::random_values(&params, &mut rng);
    let acc = common::encrypt_rlwe(
        &common::encode_polynomial(&values, &params),
        &ring,
        &params,
        &mut rng,
    );

    let rotated = rotator.rotate(&builder.encrypt(&ring, 1, None, &mut rng), 3);
    let fresh = builder.encrypt(&ring, 4, None, &mut rng);

    let by_rotated = decrypt_product(&acc, &rotated, &ring, &params);
    let by_fresh = decrypt_product(&acc, &fresh, &ring, &params);
    assert_eq!(by_rotated, by_fresh);
    assert_eq!(by_rotated, rotated_values(&values, 4, &params));

    // The same rotation through the accumulator, with the single secret coordinate 1.
    let lwe = LweSecretKey::new(vec![1]);
    let key = BootstrappingKey::generate(&params, &lwe, &ring, &mut rng).unwrap();
    let accumulator = Accumulator::new(&params, key).unwrap();
    let mut acc_by_key = acc.clone();
    accumulator
        .accumulate(&mut acc_by_key, &[params.lwe_modulus_value() - 4])
        .unwrap();
    assert_eq!(common::decrypt_rlwe(&acc_by_key, &ring, &params), by_fresh);
}

#[test]
fn test_rotation_matches_fresh_key() {
    common::init_logging();
    let mut rng = rand::thread_rng();
    let params = Parameters::new(TOY_PARAMETERS).unwrap();
    let q = params.lwe_modulus_value() as i64;

    let ring = RingSecretKey::generate(&params, &mut rng);
    let builder = GadgetKeyBuilder::new(&params);
    let rotator = HomomorphicRotator::new(&params);

    let values = common::random_values(&params, &mut rng);
    let acc = common::encrypt_rlwe(
        &common::encode_polynomial(&values, &params),
        &ring,
        &params,
        &mut rng,
    );

    for _ in 0..8 {
        let m = rng.gen_range(-q..q);
        let r = rng.gen_range(-q..q);
        let rotated = rotator.rotate(&builder.encrypt(&ring, m, None, &mut rng), r);
        let fresh = builder.encrypt(&ring, m + r, None, &mut rng);

        let by_rotated = decrypt_product(&acc, &rotated, &ring, &params);
        let by_fresh = decrypt_product(&acc, &fresh, &ring, &params);
        assert_eq!(by_rotated, by_fresh, "m = {m}, r = {r}");
        assert_eq!(by_fresh, rotated_values(&values, params.message_exponent(m + r), &params));
    }
}

#[test]
fn test_half_modulus_flips_sign_once() {
    common::init_logging();
    let mut rng = rand::thread_rng();
    let params = Parameters::new(TOY_PARAMETERS).unwrap();
    let q = params.lwe_modulus_value() as i64;
    let modulus = params.ring_modulus();

    let ring = RingSecretKey::generate(&params, &mut rng);
    let builder = GadgetKeyBuilder::new(&params);
    let rotator = HomomorphicRotator::new(&params);

    let values = common::random_values(&params, &mut rng);
    let encoded = common::encode_polynomial(&values, &params);
    let acc = common::encrypt_rlwe(&encoded, &ring, &params, &mut rng);

    let mut negated: Polynomial = encoded.clone();
    negated.neg_reduce_assign(modulus);
    let negated = common::decode_polynomial(&negated, &params);

    // mm = N exactly: the key encrypts -X^0.
    let half = builder.encrypt(&ring, q / 2, None, &mut rng);
    let decrypted = decrypt_product(&acc, &half, &ring, &params);
    assert_eq!(decrypted, negated);

    // Crossing N by rotation flips the sign once, crossing 2N flips it back.
    let below = rotator.rotate(&builder.encrypt(&ring, q / 2 - 1, None, &mut rng), 1);
    let decrypted = decrypt_product(&acc, &below, &ring, &params);
    assert_eq!(decrypted, negated);

    let around = rotator.rotate(&half, q / 2);
    let decrypted = decrypt_product(&acc, &around, &ring, &params);
    assert_eq!(decrypted, values);
}
