//! This module defines some errors that
//! may occur during the execution of the library.

use thiserror::Error;

/// Errors that may occur.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlgebraError {
    /// Error that occurs when the given modulus has no primitive root with the given degree.
    #[error("There is no primitive root with the degree {degree} and the modulus {modulus}!")]
    NoPrimitiveRoot {
        /// The degree for the primitive root
        degree: u64,
        /// The modulus.
        modulus: u64,
    },
    /// Error that occurs when the modulus does not fit the lazy reduction bound.
    #[error("Modulus {modulus} is too large, it must be less than 2^62")]
    ModulusTooLarge {
        /// The modulus.
        modulus: u64,
    },
    /// Error that occurs when the modulus is too small to be useful.
    #[error("Modulus {modulus} is too small")]
    ModulusTooSmall {
        /// The modulus.
        modulus: u64,
    },
    /// Error that occurs when a power of two was required.
    #[error("Value {value} is not a power of two")]
    NotPowerOfTwo {
        /// The offending value.
        value: u64,
    },
    /// Error that occurs when the transform dimension is not supported.
    #[error("Dimension {dimension} is not supported, expected a power of two no less than 2")]
    InvalidDimension {
        /// The dimension.
        dimension: usize,
    },
    /// Error that occurs when a decomposition basis is unusable.
    #[error("Decomposition with 2^{log_basis} basis and {digits} digits is not supported")]
    InvalidBasis {
        /// The bit count of the basis.
        log_basis: u32,
        /// The digit count.
        digits: usize,
    },
    /// Error that occurs when fails to generate the distribution.
    #[error("Fail to generate the desired distribution: {0}")]
    DistributionErr(String),
}
