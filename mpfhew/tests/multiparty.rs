mod common;

use mpfhew::{
    aggregate, fuse_partial_decryptions, partial_decrypt_lead, partial_decrypt_main,
    AssemblyState, BinaryGate, BootstrappingKey, CommonRandomness, Evaluator, FhewError,
    GadgetKeyBuilder, HomomorphicRotator, JointPublicKey, MultipartyKeyAssembler, Parameters,
    PartySecret, PublicKeyShare, RgswShare, TOY_PARAMETERS,
};
use rand::Rng;

const INPUTS: [(bool, bool); 4] = [(false, false), (false, true), (true, false), (true, true)];

#[test]
fn test_multiparty_equivalence() {
    common::init_logging();
    let mut rng = rand::thread_rng();
    let params = Parameters::new(TOY_PARAMETERS).unwrap();

    for parties in 1..=5 {
        let crs = CommonRandomness::new(&params, rng.gen());
        let secrets = common::party_secrets(&params, parties, &mut rng);
        // The toy ring noise budget covers public key rerandomization for up to three parties.
        let rerandomize = (2..=3).contains(&parties);
        let key = common::assemble_key(&params, &secrets, &crs, rerandomize, &mut rng);
        let (lwe, ring) = PartySecret::joint(&secrets, &params).unwrap();

        let evaluator = Evaluator::new(params.clone(), key).unwrap();
        let key = BootstrappingKey::generate(&params, &lwe, &ring, &mut rng).unwrap();
        let single = Evaluator::new(params.clone(), key).unwrap();

        for gate in [BinaryGate::And, BinaryGate::Or, BinaryGate::Nand, BinaryGate::Nor] {
            for (m0, m1) in INPUTS {
                let c0 = lwe.encrypt_bit(m0, &params, &mut rng);
                let c1 = lwe.encrypt_bit(m1, &params, &mut rng);
                let expected = gate.evaluate(m0, m1);

                let refreshed = evaluator.bootstrap_gate(gate, &c0, &c1).unwrap();
                assert_eq!(
                    refreshed.decrypt(&ring, &params),
                    expected,
                    "{parties} parties, {gate:?}({m0}, {m1})"
                );

                let refreshed = single.bootstrap_gate(gate, &c0, &c1).unwrap();
                assert_eq!(refreshed.decrypt(&ring, &params), expected);
            }
        }
    }
}

#[test]
fn test_five_party_and_threshold_decryption() {
    common::init_logging();
    let mut rng = rand::thread_rng();
    let params = Parameters::new(TOY_PARAMETERS).unwrap();

    let crs = CommonRandomness::new(&params, rng.gen());
    let secrets = common::party_secrets(&params, 5, &mut rng);
    // Five rerandomizations exceed the toy ring noise budget.
    let key = common::assemble_key(&params, &secrets, &crs, false, &mut rng);
    let (lwe, _) = PartySecret::joint(&secrets, &params).unwrap();
    let evaluator = Evaluator::new(params.clone(), key).unwrap();

    for (m0, m1) in INPUTS {
        let c0 = lwe.encrypt_bit(m0, &params, &mut rng);
        let c1 = lwe.encrypt_bit(m1, &params, &mut rng);
        let refreshed = evaluator.bootstrap_gate(BinaryGate::And, &c0, &c1).unwrap();

        let partials: Vec<u64> = secrets
            .iter()
            .enumerate()
            .map(|(p, secret)| {
                if p == 0 {
                    partial_decrypt_lead(&refreshed, secret.ring(), &params, &mut rng)
                } else {
                    partial_decrypt_main(&refreshed, secret.ring(), &params, &mut rng)
                }
            })
            .collect();

        assert_eq!(fuse_partial_decryptions(&partials, &params).unwrap(), m0 & m1);
    }

    assert_eq!(
        fuse_partial_decryptions(&[], &params).unwrap_err(),
        FhewError::NoShares
    );
}

#[test]
fn test_protocol_violations() {
    common::init_logging();
    let mut rng = rand::thread_rng();
    let params = Parameters::new(TOY_PARAMETERS).unwrap();
    let crs = CommonRandomness::new(&params, [3; 32]);
    let other = CommonRandomness::new(&params, [4; 32]);
    let builder = GadgetKeyBuilder::new(&params);
    let secrets = common::party_secrets(&params, 3, &mut rng);
    let one = common::aggregate_one(&params, &secrets, &crs, &mut rng);
    let public_key = common::joint_public_key(&params, &secrets, &crs, &mut rng);

    assert_eq!(
        MultipartyKeyAssembler::new(&params, &one, 0).unwrap_err(),
        FhewError::NoShares
    );

    let assembler = MultipartyKeyAssembler::new(&params, &one, 3).unwrap();
    assert_eq!(assembler.next_party(), Some(0));
    assert_eq!(
        assembler
            .clone()
            .absorb(1, secrets[1].lwe(), None, &mut rng)
            .unwrap_err(),
        FhewError::PartyOutOfOrder {
            expected: 0,
            found: 1
        }
    );

    let assembler = assembler
        .absorb(0, secrets[0].lwe(), Some(&public_key), &mut rng)
        .unwrap();
    assert_eq!(
        assembler.clone().finish().unwrap_err(),
        FhewError::IncompleteAssembly {
            absorbed: 1,
            parties: 3
        }
    );

    let assembler = assembler
        .absorb(1, secrets[1].lwe(), None, &mut rng)
        .unwrap()
        .absorb(2, secrets[2].lwe(), Some(&public_key), &mut rng)
        .unwrap();
    assert_eq!(assembler.next_party(), None);
    assert_eq!(
        assembler
            .clone()
            .absorb(3, secrets[0].lwe(), None, &mut rng)
            .unwrap_err(),
        FhewError::PartyOutOfOrder {
            expected: 3,
            found: 3
        }
    );
    assert!(assembler.finish().is_ok());

    // Shares over the masks of another seed do not aggregate.
    let share = RgswShare::one(&builder, &crs, secrets[0].ring(), &mut rng);
    let stray = RgswShare::zero(&builder, &other, secrets[1].ring(), &mut rng);
    assert_eq!(
        aggregate([&share, &stray], &crs, &params).unwrap_err(),
        FhewError::CommonRandomnessMismatch {
            expected: [3; 32],
            found: [4; 32],
        }
    );

    let public_shares = [
        PublicKeyShare::generate(&params, &crs, secrets[0].ring(), &mut rng),
        PublicKeyShare::generate(&params, &other, secrets[1].ring(), &mut rng),
    ];
    assert_eq!(
        JointPublicKey::aggregate(&public_shares, &crs, &params).unwrap_err(),
        FhewError::CommonRandomnessMismatch {
            expected: [3; 32],
            found: [4; 32],
        }
    );
}

/// Returns, per LWE coordinate, the value in `{-1, 0, 1}` whose rotation of `one` equals
/// the coordinate's first cell.
fn recover_rotations(
    key: &BootstrappingKey,
    one: &lattice::NttRgsw,
    params: &Parameters,
) -> Vec<Option<i64>> {
    let rotator = HomomorphicRotator::new(params);
    (0..params.lwe_dimension())
        .map(|i| {
            let cell = key.get(i, 1, 0).unwrap();
            (-1..=1).find(|&s| rotator.rotate(one, s) == *cell)
        })
        .collect()
}

#[test]
fn test_hand_off_hides_lwe_secret() {
    common::init_logging();
    let mut rng = rand::thread_rng();
    let params = Parameters::new(TOY_PARAMETERS).unwrap();
    let crs = CommonRandomness::new(&params, rng.gen());
    let secrets = common::party_secrets(&params, 2, &mut rng);
    let one = common::aggregate_one(&params, &secrets, &crs, &mut rng);
    let public_key = common::joint_public_key(&params, &secrets, &crs, &mut rng);
    let assembler = MultipartyKeyAssembler::new(&params, &one, 2).unwrap();

    // Without rerandomization the next party reads the share straight off the key.
    let exposed = assembler
        .clone()
        .absorb(0, secrets[0].lwe(), None, &mut rng)
        .unwrap()
        .into_state();
    let recovered: Vec<i64> = recover_rotations(exposed.key(), &one, &params)
        .into_iter()
        .map(|s| s.unwrap())
        .collect();
    assert_eq!(recovered, secrets[0].lwe().centered(&params));

    let hidden = assembler
        .absorb(0, secrets[0].lwe(), Some(&public_key), &mut rng)
        .unwrap()
        .into_state();
    assert!(recover_rotations(hidden.key(), &one, &params)
        .iter()
        .all(Option::is_none));

    let key = MultipartyKeyAssembler::resume(&params, hidden)
        .unwrap()
        .absorb(1, secrets[1].lwe(), Some(&public_key), &mut rng)
        .unwrap()
        .finish()
        .unwrap();
    let (lwe, ring) = PartySecret::joint(&secrets, &params).unwrap();
    let evaluator = Evaluator::new(params.clone(), key).unwrap();
    for (m0, m1) in INPUTS {
        let c0 = lwe.encrypt_bit(m0, &params, &mut rng);
        let c1 = lwe.encrypt_bit(m1, &params, &mut rng);
        let refreshed = evaluator.bootstrap_gate(BinaryGate::Or, &c0, &c1).unwrap();
        assert_eq!(refreshed.decrypt(&ring, &params), m0 | m1);
    }
}

#[test]
fn test_serialized_hand_off() {
    common::init_logging();
    let mut rng = rand::thread_rng();
    let params = Parameters::new(TOY_PARAMETERS).unwrap();
    let crs = CommonRandomness::new(&params, rng.gen());
    let builder = GadgetKeyBuilder::new(&params);
    let secrets = common::party_secrets(&params, 2, &mut rng);

    let shares = [
        RgswShare::one(&builder, &crs, secrets[0].ring(), &mut rng),
        RgswShare::zero(&builder, &crs, secrets[1].ring(), &mut rng),
    ];
    // Shares travel serialized too.
    let shares: Vec<RgswShare> = shares
        .iter()
        .map(|share| bincode::deserialize(&bincode::serialize(share).unwrap()).unwrap())
        .collect();
    let one = aggregate(&shares, &crs, &params).unwrap();

    let public_key = common::joint_public_key(&params, &secrets, &crs, &mut rng);
    let public_key: JointPublicKey =
        bincode::deserialize(&bincode::serialize(&public_key).unwrap()).unwrap();

    let state = MultipartyKeyAssembler::new(&params, &one, 2)
        .unwrap()
        .absorb(0, secrets[0].lwe(), Some(&public_key), &mut rng)
        .unwrap()
        .into_state();
    let bytes = bincode::serialize(&state).unwrap();

    let received: AssemblyState = bincode::deserialize(&bytes).unwrap();
    assert_eq!(received, state);
    assert_eq!(received.absorbed(), 1);

    let key = MultipartyKeyAssembler::resume(&params, received)
        .unwrap()
        .absorb(1, secrets[1].lwe(), Some(&public_key), &mut rng)
        .unwrap()
        .finish()
        .unwrap();

    let key: BootstrappingKey = bincode::deserialize(&bincode::serialize(&key).unwrap()).unwrap();
    let (lwe, ring) = PartySecret::joint(&secrets, &params).unwrap();
    let evaluator = Evaluator::new(params.clone(), key).unwrap();

    let c0 = lwe.encrypt_bit(true, &params, &mut rng);
    let c1 = lwe.encrypt_bit(false, &params, &mut rng);
    let refreshed = evaluator.bootstrap_gate(BinaryGate::Nand, &c0, &c1).unwrap();
    assert!(refreshed.decrypt(&ring, &params));
}
