use std::sync::Arc;

use algebra::{
    decompose::SignedDigitDecomposer, random::DiscreteGaussian, BarrettModulus, NttTable,
    PowOf2Modulus,
};
use serde::{Deserialize, Serialize};

use crate::FhewError;

/// The distribution of a secret key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecretDistribution {
    /// Coefficients in `{0, 1}`.
    Binary,
    /// Coefficients in `{-1, 0, 1}`.
    #[default]
    Ternary,
}

/// Whether fresh gadget ciphertexts carry an error term.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoiseMode {
    /// Errors are drawn from the ring gaussian.
    #[default]
    Gaussian,
    /// Errors are left out. Only meant for tests.
    Omitted,
}

/// The raw values of a parameter set.
///
/// This type is used for setting some default Parameters, it is validated by
/// [`Parameters::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstParameters {
    /// LWE vector dimension, refers to **`n`** in the paper.
    pub lwe_dimension: usize,
    /// LWE cipher modulus, refers to **`q`** in the paper.
    pub lwe_modulus: u64,
    /// The lwe noise error's standard deviation.
    pub lwe_noise_std_dev: f64,
    /// LWE secret key distribution.
    pub lwe_secret_distribution: SecretDistribution,

    /// Ring polynomial dimension, refers to **`N`** in the paper.
    pub ring_dimension: usize,
    /// Ring polynomial modulus, refers to **`Q`** in the paper.
    pub ring_modulus: u64,
    /// The ring noise error's standard deviation.
    pub ring_noise_std_dev: f64,
    /// Ring secret key distribution.
    pub ring_secret_distribution: SecretDistribution,

    /// Gadget basis **`G`**, a power of two.
    pub gadget_basis: u64,
    /// Gadget digit count.
    pub gadget_digits: usize,

    /// Refresh basis **`baseR`** of the bootstrapping key.
    pub refresh_basis: u64,
    /// Refresh digit count.
    pub refresh_digits: usize,

    /// The smudging noise's standard deviation for threshold decryption.
    pub smudging_std_dev: f64,
    /// Whether fresh gadget ciphertexts carry errors.
    pub noise_mode: NoiseMode,
}

/// A small parameter set for tests, `N = 512`, `n = 16`.
pub const TOY_PARAMETERS: ConstParameters = ConstParameters {
    lwe_dimension: 16,
    lwe_modulus: 1024,
    lwe_noise_std_dev: 3.2,
    lwe_secret_distribution: SecretDistribution::Ternary,
    ring_dimension: 512,
    ring_modulus: 998244353,
    ring_noise_std_dev: 3.2,
    ring_secret_distribution: SecretDistribution::Ternary,
    gadget_basis: 1 << 10,
    gadget_digits: 3,
    refresh_basis: 4,
    refresh_digits: 5,
    smudging_std_dev: 1024.0,
    noise_mode: NoiseMode::Gaussian,
};

/// A medium parameter set, `N = 1024`, `n = 128`.
pub const MEDIUM_PARAMETERS: ConstParameters = ConstParameters {
    lwe_dimension: 128,
    lwe_modulus: 1024,
    lwe_noise_std_dev: 3.2,
    lwe_secret_distribution: SecretDistribution::Ternary,
    ring_dimension: 1024,
    ring_modulus: 998244353,
    ring_noise_std_dev: 3.2,
    ring_secret_distribution: SecretDistribution::Ternary,
    gadget_basis: 1 << 10,
    gadget_digits: 3,
    refresh_basis: 32,
    refresh_digits: 2,
    smudging_std_dev: 1024.0,
    noise_mode: NoiseMode::Gaussian,
};

impl ConstParameters {
    /// Looks up a preset by name, `"toy"` or `"medium"`.
    pub fn preset(name: &str) -> Result<Self, FhewError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "toy" => Ok(TOY_PARAMETERS),
            "medium" => Ok(MEDIUM_PARAMETERS),
            other => Err(FhewError::Config(format!("unknown parameter preset `{other}`"))),
        }
    }
}

/// Validated parameters with the tables derived from them.
#[derive(Debug, Clone)]
pub struct Parameters {
    const_params: ConstParameters,
    lwe_modulus: PowOf2Modulus,
    ring_modulus: BarrettModulus,
    twice_ring_dimension_div_lwe_modulus: usize,
    decomposer: SignedDigitDecomposer,
    refresh_powers: Vec<u64>,
    lwe_noise: DiscreteGaussian,
    ring_noise: DiscreteGaussian,
    smudging: DiscreteGaussian,
    ntt_table: Arc<NttTable>,
}

impl Parameters {
    /// Create a new Parameter instance.
    pub fn new(params: ConstParameters) -> Result<Self, FhewError> {
        let ring_dimension = params.ring_dimension;
        let lwe_modulus = params.lwe_modulus;

        // N = 2^i
        if ring_dimension < 2 || !ring_dimension.is_power_of_two() {
            return Err(FhewError::RingDimensionInvalid(ring_dimension));
        }

        if params.lwe_dimension == 0 {
            return Err(FhewError::LweDimensionInvalid(params.lwe_dimension));
        }

        // q = 2^i, 8 <= q, q | 2N
        let twice_ring_dimension = (ring_dimension as u64) << 1;
        if lwe_modulus < 8
            || !lwe_modulus.is_power_of_two()
            || twice_ring_dimension % lwe_modulus != 0
        {
            return Err(FhewError::LweModulusInvalid {
                lwe_modulus,
                ring_dimension,
            });
        }

        // Q prime, 2N | (Q - 1)
        let ring_modulus = BarrettModulus::new(params.ring_modulus)?;
        if (params.ring_modulus - 1) % twice_ring_dimension != 0 || !ring_modulus.is_prime() {
            return Err(FhewError::RingModulusIncompatible {
                ring_modulus: params.ring_modulus,
                ring_dimension,
            });
        }

        let gadget_basis = params.gadget_basis;
        if gadget_basis < 2 || !gadget_basis.is_power_of_two() {
            return Err(FhewError::GadgetBasisNotPowerOfTwo(gadget_basis));
        }
        let log_basis = gadget_basis.trailing_zeros();
        let decomposer = SignedDigitDecomposer::new(ring_modulus, log_basis, params.gadget_digits)?;
        if !decomposer.covers_modulus() {
            return Err(FhewError::GadgetDigitsInsufficient {
                digits: params.gadget_digits,
                log_basis,
                modulus_bits: ring_modulus.bits(),
            });
        }

        let refresh_basis = params.refresh_basis;
        if refresh_basis < 2 {
            return Err(FhewError::RefreshBaseInvalid(refresh_basis));
        }
        let refresh_powers = refresh_powers(refresh_basis, params.refresh_digits, lwe_modulus)
            .ok_or(FhewError::RefreshDigitsInsufficient {
                refresh_basis,
                refresh_digits: params.refresh_digits,
                lwe_modulus,
            })?;

        let ntt_table = NttTable::new(ring_modulus, ring_dimension.trailing_zeros())?;

        let lwe_noise = noise(params.lwe_noise_std_dev, lwe_modulus)?;
        let ring_noise = noise(params.ring_noise_std_dev, params.ring_modulus)?;
        let smudging = noise(params.smudging_std_dev, params.ring_modulus)?;

        Ok(Self {
            const_params: params,
            lwe_modulus: PowOf2Modulus::new(lwe_modulus)?,
            ring_modulus,
            twice_ring_dimension_div_lwe_modulus: (twice_ring_dimension / lwe_modulus) as usize,
            decomposer,
            refresh_powers,
            lwe_noise,
            ring_noise,
            smudging,
            ntt_table: Arc::new(ntt_table),
        })
    }

    /// Returns the raw values these parameters were built from.
    #[inline]
    pub fn const_params(&self) -> &ConstParameters {
        &self.const_params
    }

    /// Returns the lwe dimension, refers to **`n`** in the paper.
    #[inline]
    pub fn lwe_dimension(&self) -> usize {
        self.const_params.lwe_dimension
    }

    /// Returns the lwe modulus, refers to **`q`** in the paper.
    #[inline]
    pub fn lwe_modulus(&self) -> PowOf2Modulus {
        self.lwe_modulus
    }

    /// Returns the value of the lwe modulus.
    #[inline]
    pub fn lwe_modulus_value(&self) -> u64 {
        self.const_params.lwe_modulus
    }

    /// Returns the LWE secret key distribution.
    #[inline]
    pub fn lwe_secret_distribution(&self) -> SecretDistribution {
        self.const_params.lwe_secret_distribution
    }

    /// Returns the lwe noise distribution.
    #[inline]
    pub fn lwe_noise(&self) -> &DiscreteGaussian {
        &self.lwe_noise
    }

    /// Returns the ring dimension, refers to **`N`** in the paper.
    #[inline]
    pub fn ring_dimension(&self) -> usize {
        self.const_params.ring_dimension
    }

    /// Returns the ring modulus, refers to **`Q`** in the paper.
    #[inline]
    pub fn ring_modulus(&self) -> BarrettModulus {
        self.ring_modulus
    }

    /// Returns the value of the ring modulus.
    #[inline]
    pub fn ring_modulus_value(&self) -> u64 {
        self.const_params.ring_modulus
    }

    /// Returns the ring secret key distribution.
    #[inline]
    pub fn ring_secret_distribution(&self) -> SecretDistribution {
        self.const_params.ring_secret_distribution
    }

    /// Returns the ring noise distribution.
    #[inline]
    pub fn ring_noise(&self) -> &DiscreteGaussian {
        &self.ring_noise
    }

    /// Returns the smudging noise distribution of threshold decryption.
    #[inline]
    pub fn smudging(&self) -> &DiscreteGaussian {
        &self.smudging
    }

    /// Returns the noise mode of fresh gadget ciphertexts.
    #[inline]
    pub fn noise_mode(&self) -> NoiseMode {
        self.const_params.noise_mode
    }

    /// Returns **`2N/q`**.
    #[inline]
    pub fn twice_ring_dimension_div_lwe_modulus(&self) -> usize {
        self.twice_ring_dimension_div_lwe_modulus
    }

    /// Returns the gadget decomposer.
    #[inline]
    pub fn decomposer(&self) -> &SignedDigitDecomposer {
        &self.decomposer
    }

    /// Returns the gadget digit count.
    #[inline]
    pub fn gadget_digits(&self) -> usize {
        self.const_params.gadget_digits
    }

    /// Returns the gadget vector `G^l mod Q`.
    #[inline]
    pub fn gadget(&self) -> &[u64] {
        self.decomposer.gadget()
    }

    /// Returns the row count `2·digitsG` of a gadget ciphertext.
    #[inline]
    pub fn gadget_rows(&self) -> usize {
        self.const_params.gadget_digits << 1
    }

    /// Returns the refresh basis **`baseR`**.
    #[inline]
    pub fn refresh_basis(&self) -> u64 {
        self.const_params.refresh_basis
    }

    /// Returns the refresh digit count.
    #[inline]
    pub fn refresh_digits(&self) -> usize {
        self.const_params.refresh_digits
    }

    /// Returns `baseR^k mod q` for `k < digitsR`.
    #[inline]
    pub fn refresh_powers(&self) -> &[u64] {
        &self.refresh_powers
    }

    /// Returns the NTT table of the ring.
    #[inline]
    pub fn ntt_table(&self) -> &Arc<NttTable> {
        &self.ntt_table
    }

    /// Maps an LWE message to the monomial exponent `(m mod q)·2N/q` in `[0, 2N)`.
    #[inline]
    pub fn message_exponent(&self, message: i64) -> i64 {
        message.rem_euclid(self.const_params.lwe_modulus as i64)
            * self.twice_ring_dimension_div_lwe_modulus as i64
    }

    /// Returns the LWE secret key distribution's value `v` centered into `(-q/2, q/2]`.
    #[inline]
    pub(crate) fn centered_lwe_value(&self, value: u64) -> i64 {
        let q = self.const_params.lwe_modulus;
        if value > q >> 1 {
            value as i64 - q as i64
        } else {
            value as i64
        }
    }
}

/// Returns `baseR^k mod q` for `k < digits`, or `None` if `baseR^digits < q`.
fn refresh_powers(basis: u64, digits: usize, lwe_modulus: u64) -> Option<Vec<u64>> {
    let mut powers = Vec::with_capacity(digits);
    let mut power: u128 = 1;
    for _ in 0..digits {
        powers.push((power % lwe_modulus as u128) as u64);
        power = power.saturating_mul(basis as u128);
    }
    (power >= lwe_modulus as u128).then_some(powers)
}

/// Builds a gaussian whose tail cut stays below half of `modulus`.
fn noise(std_dev: f64, modulus: u64) -> Result<DiscreteGaussian, FhewError> {
    let gaussian = DiscreteGaussian::with_std_dev(std_dev, modulus)?;
    if gaussian.max_std_dev() >= (modulus >> 1) as f64 {
        return Err(FhewError::NoiseTooLarge { std_dev, modulus });
    }
    Ok(gaussian)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let toy = Parameters::new(TOY_PARAMETERS).unwrap();
        assert_eq!(toy.twice_ring_dimension_div_lwe_modulus(), 1);
        assert_eq!(toy.refresh_powers(), &[1, 4, 16, 64, 256]);
        assert_eq!(toy.gadget(), &[1, 1 << 10, 1 << 20]);

        let medium = Parameters::new(MEDIUM_PARAMETERS).unwrap();
        assert_eq!(medium.twice_ring_dimension_div_lwe_modulus(), 2);
        assert_eq!(medium.refresh_powers(), &[1, 32]);

        assert_eq!(ConstParameters::preset(" Toy ").unwrap(), TOY_PARAMETERS);
        assert!(matches!(
            ConstParameters::preset("huge"),
            Err(FhewError::Config(_))
        ));
    }

    #[test]
    fn test_invalid_parameters() {
        let check = |f: fn(&mut ConstParameters), expected: FhewError| {
            let mut params = TOY_PARAMETERS;
            f(&mut params);
            assert_eq!(Parameters::new(params).unwrap_err(), expected);
        };

        check(|p| p.ring_dimension = 500, FhewError::RingDimensionInvalid(500));
        check(|p| p.lwe_dimension = 0, FhewError::LweDimensionInvalid(0));
        check(
            |p| p.lwe_modulus = 2048,
            FhewError::LweModulusInvalid {
                lwe_modulus: 2048,
                ring_dimension: 512,
            },
        );
        check(
            |p| p.lwe_modulus = 1000,
            FhewError::LweModulusInvalid {
                lwe_modulus: 1000,
                ring_dimension: 512,
            },
        );
        check(
            |p| p.ring_modulus = 132120577 + 2,
            FhewError::RingModulusIncompatible {
                ring_modulus: 132120579,
                ring_dimension: 512,
            },
        );
        check(|p| p.gadget_basis = 1000, FhewError::GadgetBasisNotPowerOfTwo(1000));
        check(
            |p| p.gadget_digits = 2,
            FhewError::GadgetDigitsInsufficient {
                digits: 2,
                log_basis: 10,
                modulus_bits: 30,
            },
        );
        check(|p| p.refresh_basis = 1, FhewError::RefreshBaseInvalid(1));
        check(
            |p| p.refresh_digits = 4,
            FhewError::RefreshDigitsInsufficient {
                refresh_basis: 4,
                refresh_digits: 4,
                lwe_modulus: 1024,
            },
        );
        check(
            |p| p.lwe_noise_std_dev = 1000.0,
            FhewError::NoiseTooLarge {
                std_dev: 1000.0,
                modulus: 1024,
            },
        );
        check(
            |p| p.smudging_std_dev = 1e9,
            FhewError::NoiseTooLarge {
                std_dev: 1e9,
                modulus: 998244353,
            },
        );
    }

    #[test]
    fn test_message_exponent() {
        let medium = Parameters::new(MEDIUM_PARAMETERS).unwrap();
        assert_eq!(medium.message_exponent(0), 0);
        assert_eq!(medium.message_exponent(3), 6);
        assert_eq!(medium.message_exponent(-1), 2046);
        assert_eq!(medium.message_exponent(1024 + 5), 10);
        assert_eq!(medium.centered_lwe_value(1023), -1);
        assert_eq!(medium.centered_lwe_value(512), 512);
    }
}
