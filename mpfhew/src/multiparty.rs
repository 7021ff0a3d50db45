use algebra::{random::DiscreteGaussian, NttPolynomial, Polynomial};
use lattice::{NttRgsw, NttRlwe};
use rand::{CryptoRng, Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    BootstrappingKey, CommonRandomness, CrsSlot, FhewError, GadgetKeyBuilder,
    HomomorphicRotator, LweSecretKey, NoiseMode, Parameters, RingSecretKey,
};

/// One party's gadget ciphertext built over the common masks of [`CrsSlot::One`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgswShare {
    seed: [u8; 32],
    key: NttRgsw,
}

impl RgswShare {
    /// The lead party's share of the aggregated encryption of one.
    pub fn one<R>(
        builder: &GadgetKeyBuilder,
        crs: &CommonRandomness,
        secret: &RingSecretKey,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + CryptoRng,
    {
        let masks = crs.polynomials(CrsSlot::One);
        Self {
            seed: *crs.seed(),
            key: builder.encrypt(secret, 0, Some(&masks), rng),
        }
    }

    /// A non-lead party's share, encrypting zero.
    pub fn zero<R>(
        builder: &GadgetKeyBuilder,
        crs: &CommonRandomness,
        secret: &RingSecretKey,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + CryptoRng,
    {
        let masks = crs.polynomials(CrsSlot::One);
        Self {
            seed: *crs.seed(),
            key: builder.encrypt_zero(secret, Some(&masks), rng),
        }
    }

    /// Returns the seed of the common randomness the share was built from.
    #[inline]
    pub fn seed(&self) -> &[u8; 32] {
        &self.seed
    }

    /// Returns the gadget ciphertext.
    #[inline]
    pub fn key(&self) -> &NttRgsw {
        &self.key
    }
}

/// Combines the shares of all parties into the aggregated encryption of one.
///
/// The shares are summed row-wise. Every share carries the common mask in its `a` column,
/// so `(P - 1)` copies of it are subtracted again. The result encrypts the sum of the
/// messages under the sum of the ring secrets.
#[instrument(skip_all)]
pub fn aggregate<'a, I>(
    shares: I,
    crs: &CommonRandomness,
    params: &Parameters,
) -> Result<NttRgsw, FhewError>
where
    I: IntoIterator<Item = &'a RgswShare>,
{
    let modulus = params.ring_modulus();
    let mut shares = shares.into_iter();
    let first = shares.next().ok_or(FhewError::NoShares)?;
    check_seed(crs, &first.seed)?;
    if !has_shape(&first.key, params) {
        return Err(FhewError::KeyShapeMismatch);
    }

    let mut sum = first.key.clone();
    let mut count = 1u64;
    for share in shares {
        check_seed(crs, &share.seed)?;
        if !has_shape(&share.key, params) {
            return Err(FhewError::KeyShapeMismatch);
        }
        sum.add_assign_element_wise(&share.key, modulus);
        count += 1;
    }

    if count > 1 {
        let extra = (count - 1) % params.ring_modulus_value();
        let mut masks = crs.ntt_polynomials(CrsSlot::One, params.ntt_table());
        if masks.len() != sum.row_count() {
            return Err(FhewError::KeyShapeMismatch);
        }
        masks
            .iter_mut()
            .for_each(|mask| mask.mul_scalar_reduce_assign(extra, modulus));
        sum.sub_assign_a_column(&masks, modulus);
    }

    debug!(shares = count, "shares aggregated");
    Ok(sum)
}

fn check_seed(crs: &CommonRandomness, found: &[u8; 32]) -> Result<(), FhewError> {
    if crs.seed() != found {
        return Err(FhewError::CommonRandomnessMismatch {
            expected: *crs.seed(),
            found: *found,
        });
    }
    Ok(())
}

#[inline]
fn has_shape(key: &NttRgsw, params: &Parameters) -> bool {
    key.row_count() == params.gadget_rows() && key.dimension() == params.ring_dimension()
}

/// One party's share `c·z_p + e_p` of the joint public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyShare {
    seed: [u8; 32],
    b: NttPolynomial,
}

impl PublicKeyShare {
    /// Builds the share of `secret` over the mask of [`CrsSlot::PublicKey`].
    pub fn generate<R>(
        params: &Parameters,
        crs: &CommonRandomness,
        secret: &RingSecretKey,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + CryptoRng,
    {
        let mask = crs.polynomials(CrsSlot::PublicKey);
        let sample = NttRlwe::generate_zero_sample(
            secret.ntt_key(),
            mask.first(),
            noise(params),
            params.ntt_table(),
            rng,
        );
        Self {
            seed: *crs.seed(),
            b: sample.b().clone(),
        }
    }

    /// Returns the seed of the common randomness the share was built from.
    #[inline]
    pub fn seed(&self) -> &[u8; 32] {
        &self.seed
    }
}

/// The RLWE public key `(c, Σ c·z_p + e_p)` of the joint ring secret.
///
/// Absorbing parties encrypt zero under it to hide their rotations from the next party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointPublicKey {
    key: NttRlwe,
}

impl JointPublicKey {
    /// Sums the shares of all parties.
    pub fn aggregate<'a, I>(
        shares: I,
        crs: &CommonRandomness,
        params: &Parameters,
    ) -> Result<Self, FhewError>
    where
        I: IntoIterator<Item = &'a PublicKeyShare>,
    {
        let modulus = params.ring_modulus();
        let dimension = params.ring_dimension();
        let mut b: Option<NttPolynomial> = None;
        for share in shares {
            check_seed(crs, &share.seed)?;
            if share.b.coeff_count() != dimension {
                return Err(FhewError::KeyShapeMismatch);
            }
            match b.as_mut() {
                Some(sum) => sum.add_reduce_assign(&share.b, modulus),
                None => b = Some(share.b.clone()),
            }
        }
        let b = b.ok_or(FhewError::NoShares)?;
        let mut masks = crs.ntt_polynomials(CrsSlot::PublicKey, params.ntt_table());
        let a = masks.pop().ok_or(FhewError::KeyShapeMismatch)?;
        Ok(Self {
            key: NttRlwe::new(a, b),
        })
    }

    /// Returns the key as an RLWE sample of zero.
    #[inline]
    pub fn key(&self) -> &NttRlwe {
        &self.key
    }

    /// Returns a fresh gadget ciphertext of zero, each row encrypted under this key.
    fn encrypt_zero<R>(&self, params: &Parameters, rng: &mut R) -> NttRgsw
    where
        R: Rng + CryptoRng,
    {
        let gaussian = noise(params);
        let table = params.ntt_table();
        NttRgsw::new(
            (0..params.gadget_rows())
                .map(|_| NttRlwe::encrypt_zero_with_public_key(&self.key, gaussian, table, rng))
                .collect(),
        )
    }
}

#[inline]
fn noise(params: &Parameters) -> Option<&DiscreteGaussian> {
    match params.noise_mode() {
        NoiseMode::Gaussian => Some(params.ring_noise()),
        NoiseMode::Omitted => None,
    }
}

/// The part of a [`MultipartyKeyAssembler`] that moves between parties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyState {
    key: BootstrappingKey,
    parties: usize,
    absorbed: usize,
}

impl AssemblyState {
    /// Returns the partially assembled key.
    #[inline]
    pub fn key(&self) -> &BootstrappingKey {
        &self.key
    }

    /// Returns the party count.
    #[inline]
    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Returns how many parties have contributed.
    #[inline]
    pub fn absorbed(&self) -> usize {
        self.absorbed
    }
}

/// Builds a bootstrapping key jointly, one party after another.
///
/// Every cell starts as the aggregated encryption of one under `z = Σ z_p`. Party `p`
/// rotates cell `(i, j, k)` by `s_p[i]·j·baseR^k`, so after all parties it encrypts
/// `X^((Σ s_p[i])·j·baseR^k·2N/q)`, the cell a single key holder would produce for the
/// joint secrets. Parties are numbered from `0` and must contribute in order.
#[derive(Debug, Clone)]
pub struct MultipartyKeyAssembler {
    params: Parameters,
    rotator: HomomorphicRotator,
    state: AssemblyState,
}

impl MultipartyKeyAssembler {
    /// Seeds every cell with `aggregate_one`, the aggregated encryption of one.
    pub fn new(
        params: &Parameters,
        aggregate_one: &NttRgsw,
        parties: usize,
    ) -> Result<Self, FhewError> {
        if parties == 0 {
            return Err(FhewError::NoShares);
        }
        if !has_shape(aggregate_one, params) {
            return Err(FhewError::KeyShapeMismatch);
        }
        let key = BootstrappingKey::filled(params, aggregate_one)?;
        Ok(Self {
            params: params.clone(),
            rotator: HomomorphicRotator::new(params),
            state: AssemblyState {
                key,
                parties,
                absorbed: 0,
            },
        })
    }

    /// Continues an assembly from a state handed over by the previous party.
    pub fn resume(params: &Parameters, state: AssemblyState) -> Result<Self, FhewError> {
        if !state.key.is_compatible(params) || state.absorbed > state.parties {
            return Err(FhewError::KeyShapeMismatch);
        }
        Ok(Self {
            params: params.clone(),
            rotator: HomomorphicRotator::new(params),
            state,
        })
    }

    /// Returns the state to hand over to the next party.
    #[inline]
    pub fn into_state(self) -> AssemblyState {
        self.state
    }

    /// Returns the current state.
    #[inline]
    pub fn state(&self) -> &AssemblyState {
        &self.state
    }

    /// Returns the party expected to contribute next, if any.
    #[inline]
    pub fn next_party(&self) -> Option<usize> {
        (self.state.absorbed < self.state.parties).then_some(self.state.absorbed)
    }

    /// Rotates every cell by party `party_index`'s LWE share.
    ///
    /// With a `public_key`, every cell also receives a fresh encryption of zero under it, so
    /// the next party cannot undo the rotation and read the share off the key.
    #[instrument(skip_all, fields(party = party_index, parties = self.state.parties))]
    pub fn absorb<R>(
        mut self,
        party_index: usize,
        secret: &LweSecretKey,
        public_key: Option<&JointPublicKey>,
        rng: &mut R,
    ) -> Result<Self, FhewError>
    where
        R: Rng + CryptoRng,
    {
        if self.next_party() != Some(party_index) {
            return Err(FhewError::PartyOutOfOrder {
                expected: self.state.absorbed,
                found: party_index,
            });
        }
        if secret.dimension() != self.params.lwe_dimension() {
            return Err(FhewError::KeyShapeMismatch);
        }
        if let Some(public_key) = public_key {
            if public_key.key.b().coeff_count() != self.params.ring_dimension() {
                return Err(FhewError::KeyShapeMismatch);
            }
        }

        let shares = secret.centered(&self.params);
        let powers = self.params.refresh_powers();
        let digits = self.params.refresh_digits();
        let modulus = self.params.ring_modulus();
        let ring_dimension = self.params.ring_dimension();
        let per_coordinate = self.state.key.cells_per_coordinate();
        let seeds: Vec<[u8; 32]> = match public_key {
            Some(_) => (0..self.state.key.cell_count()).map(|_| rng.gen()).collect(),
            None => Vec::new(),
        };
        let params = &self.params;
        let rotator = &self.rotator;

        self.state
            .key
            .cells_mut()
            .par_chunks_mut(per_coordinate)
            .enumerate()
            .for_each(|(i, cells)| {
                let mut scratch = Polynomial::zero(ring_dimension);
                for (offset, cell) in cells.iter_mut().enumerate() {
                    let j = (offset / digits + 1) as i64;
                    let amount = shares[i] * j * powers[offset % digits] as i64;
                    rotator.rotate_in_place(cell, amount, &mut scratch);
                    if let Some(public_key) = public_key {
                        let seed = seeds[i * per_coordinate + offset];
                        let mut cell_rng = ChaCha12Rng::from_seed(seed);
                        let zero = public_key.encrypt_zero(params, &mut cell_rng);
                        cell.add_assign_element_wise(&zero, modulus);
                    }
                }
            });

        self.state.absorbed += 1;
        debug!(
            absorbed = self.state.absorbed,
            rerandomized = public_key.is_some(),
            "party absorbed"
        );
        Ok(self)
    }

    /// Returns the finished key once every party has contributed.
    pub fn finish(self) -> Result<BootstrappingKey, FhewError> {
        let AssemblyState {
            key,
            parties,
            absorbed,
        } = self.state;
        if absorbed != parties {
            return Err(FhewError::IncompleteAssembly { absorbed, parties });
        }
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
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
    fn test_aggregate_one_phase() {
        let mut rng = rand::thread_rng();
        let params = noiseless();
        let table = params.ntt_table();
        let crs = CommonRandomness::new(&params, [1; 32]);
        let builder = GadgetKeyBuilder::new(&params);

        let secrets: Vec<RingSecretKey> = (0..3)
            .map(|_| RingSecretKey::generate(&params, &mut rng))
            .collect();
        let refs: Vec<&RingSecretKey> = secrets.iter().collect();
        let joint = RingSecretKey::joint(&refs, &params).unwrap();

        let mut shares = vec![RgswShare::one(&builder, &crs, &secrets[0], &mut rng)];
        shares.extend(
            secrets[1..]
                .iter()
                .map(|s| RgswShare::zero(&builder, &crs, s, &mut rng)),
        );
        let one = aggregate(&shares, &crs, &params).unwrap();
        let expected = builder.encrypt(&joint, 0, Some(&crs.polynomials(CrsSlot::One)), &mut rng);

        for (r0, r1) in one.rows().iter().zip(expected.rows()) {
            assert_eq!(r0, r1);
            assert_eq!(
                r0.to_rlwe(table).phase(joint.ntt_key(), table),
                r1.to_rlwe(table).phase(joint.ntt_key(), table)
            );
        }
    }

    #[test]
    fn test_aggregate_errors() {
        let mut rng = rand::thread_rng();
        let params = Parameters::new(TOY_PARAMETERS).unwrap();
        let crs = CommonRandomness::new(&params, [2; 32]);
        let other = CommonRandomness::new(&params, [3; 32]);
        let builder = GadgetKeyBuilder::new(&params);
        let secret = RingSecretKey::generate(&params, &mut rng);

        let shares = [
            RgswShare::one(&builder, &crs, &secret, &mut rng),
            RgswShare::zero(&builder, &other, &secret, &mut rng),
        ];
        assert_eq!(
            aggregate(&shares, &crs, &params).unwrap_err(),
            FhewError::CommonRandomnessMismatch {
                expected: [2; 32],
                found: [3; 32],
            }
        );
        assert_eq!(
            aggregate(&[], &crs, &params).unwrap_err(),
            FhewError::NoShares
        );
    }

    #[test]
    fn test_joint_public_key() {
        let mut rng = rand::thread_rng();
        let params = noiseless();
        let table = params.ntt_table();
        let crs = CommonRandomness::new(&params, [4; 32]);

        let secrets: Vec<RingSecretKey> = (0..3)
            .map(|_| RingSecretKey::generate(&params, &mut rng))
            .collect();
        let refs: Vec<&RingSecretKey> = secrets.iter().collect();
        let joint = RingSecretKey::joint(&refs, &params).unwrap();
        let shares: Vec<PublicKeyShare> = secrets
            .iter()
            .map(|s| PublicKeyShare::generate(&params, &crs, s, &mut rng))
            .collect();
        let public_key = JointPublicKey::aggregate(&shares, &crs, &params).unwrap();
        assert!(public_key.key().to_rlwe(table).phase(joint.ntt_key(), table).is_zero());

        let zero = public_key.encrypt_zero(&params, &mut rng);
        assert_eq!(zero.row_count(), params.gadget_rows());
        for row in zero.rows() {
            assert!(row.to_rlwe(table).phase(joint.ntt_key(), table).is_zero());
        }

        let other = CommonRandomness::new(&params, [5; 32]);
        assert_eq!(
            JointPublicKey::aggregate(&shares, &other, &params).unwrap_err(),
            FhewError::CommonRandomnessMismatch {
                expected: [5; 32],
                found: [4; 32],
            }
        );
        assert_eq!(
            JointPublicKey::aggregate([], &crs, &params).unwrap_err(),
            FhewError::NoShares
        );
    }
}
