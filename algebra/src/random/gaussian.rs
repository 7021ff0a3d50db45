use rand::{distributions::Distribution, Rng};
use rand_distr::Normal;
use crate::AlgebraError;

/// The gaussian distribution `N(0, std_dev²)` rounded to integers, with samples beyond
/// `max_std_dev` rejected, mapped into `[0, modulus)`.
#[derive(Debug, Clone, Copy)]
pub struct DiscreteGaussian {
    std_dev: f64,
    max_std_dev: f64,
    modulus: u64,
    normal: Normal<f64>,
}

impl DiscreteGaussian {
    /// Creates a new [`DiscreteGaussian`].
    ///
    /// # Errors
    ///
    /// Returns an error if `std_dev` is negative or not finite, or if `max_std_dev` is
    /// smaller than `std_dev`.
    pub fn new(std_dev: f64, max_std_dev: f64, modulus: u64) -> Result<Self, AlgebraError> {
        if max_std_dev.is_nan() || max_std_dev < std_dev {
            return Err(AlgebraError::DistributionErr(format!(
                "max std dev {max_std_dev} is smaller than std dev {std_dev}"
            )));
        }
        let normal = Normal::new(0.0, std_dev)
            .map_err(|e| AlgebraError::DistributionErr(e.to_string()))?;
        Ok(Self {
            std_dev,
            max_std_dev,
            modulus,
            normal,
        })
    }

    /// Creates a [`DiscreteGaussian`] cut at `6·std_dev`.
    #[inline]
    pub fn with_std_dev(std_dev: f64, modulus: u64) -> Result<Self, AlgebraError> {
        Self::new(std_dev, std_dev * 6.0, modulus)
    }

    /// Returns the standard deviation of this [`DiscreteGaussian`].
    #[inline]
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Returns the tail cut of this [`DiscreteGaussian`].
    #[inline]
    pub fn max_std_dev(&self) -> f64 {
        self.max_std_dev
    }

    /// Returns the modulus samples are reduced by.
    #[inline]
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Returns the same distribution reduced by another modulus.
    #[inline]
    pub fn with_modulus(mut self, modulus: u64) -> Self {
        self.modulus = modulus;
        self
    }

    /// Samples a signed integer.
    #[inline]
    pub fn sample_signed<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        if self.std_dev == 0.0 {
            return 0;
        }
        loop {
            let value = self.normal.sample(rng);
            if value.abs() <= self.max_std_dev {
                return value.round() as i64;
            }
        }
    }

    /// Samples `count` values in `[0, modulus)`.
    #[inline]
    pub fn sample_values<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<u64> {
        (0..count).map(|_| self.sample(rng)).collect()
    }
}

impl Distribution<u64> for DiscreteGaussian {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        let value = self.sample_signed(rng) as i128;
        value.rem_euclid(self.modulus as i128) as u64
    }
}
