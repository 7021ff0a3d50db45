use algebra::AlgebraError;

/// Errors that may occur.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FhewError {
    /// Error that occurs when the ring dimension is not a power of two.
    #[error("Ring dimension {0} is not valid!")]
    RingDimensionInvalid(
        /// The ring dimension.
        usize,
    ),
    /// Error that occurs when the ring modulus is not a prime `Q ≡ 1 (mod 2N)`.
    #[error("Ring modulus {ring_modulus} is not compatible with ring dimension {ring_dimension}!")]
    RingModulusIncompatible {
        /// Ring modulus `Q`.
        ring_modulus: u64,
        /// Ring dimension `N`.
        ring_dimension: usize,
    },
    /// Error that occurs when the LWE modulus is not a power of two dividing `2N`.
    #[error("LWE modulus {lwe_modulus} is not compatible with ring dimension {ring_dimension}!")]
    LweModulusInvalid {
        /// LWE modulus `q`.
        lwe_modulus: u64,
        /// Ring dimension `N`.
        ring_dimension: usize,
    },
    /// Error that occurs when the LWE dimension is zero.
    #[error("LWE dimension {0} is not valid!")]
    LweDimensionInvalid(
        /// The LWE dimension.
        usize,
    ),
    /// Error that occurs when the gadget basis is not a power of two.
    #[error("Gadget basis {0} is not a power of two!")]
    GadgetBasisNotPowerOfTwo(
        /// The gadget basis.
        u64,
    ),
    /// Error that occurs when the gadget digits do not cover the ring modulus.
    #[error("{digits} digits of {log_basis} bits do not cover a {modulus_bits} bits modulus!")]
    GadgetDigitsInsufficient {
        /// Gadget digit count.
        digits: usize,
        /// Bits of the gadget basis.
        log_basis: u32,
        /// Bits of the ring modulus.
        modulus_bits: u32,
    },
    /// Error that occurs when the refresh basis is smaller than two.
    #[error("Refresh basis {0} is not valid!")]
    RefreshBaseInvalid(
        /// The refresh basis.
        u64,
    ),
    /// Error that occurs when `baseR^digitsR < q`.
    #[error("{refresh_digits} digits of basis {refresh_basis} do not cover {lwe_modulus}!")]
    RefreshDigitsInsufficient {
        /// Refresh basis.
        refresh_basis: u64,
        /// Refresh digit count.
        refresh_digits: usize,
        /// LWE modulus.
        lwe_modulus: u64,
    },
    /// Error that occurs when a gaussian's tail cut `6σ` reaches half of its modulus.
    #[error("Noise std dev {std_dev} is too large for modulus {modulus}!")]
    NoiseTooLarge {
        /// The standard deviation.
        std_dev: f64,
        /// The modulus the noise lives in.
        modulus: u64,
    },
    /// Error from the algebra layer.
    #[error(transparent)]
    Algebra(#[from] AlgebraError),
    /// Error that occurs when a share was built from another common random seed.
    #[error("Expected a share of seed {expected:02x?}, found seed {found:02x?}!")]
    CommonRandomnessMismatch {
        /// The seed of the common randomness used for aggregation.
        expected: [u8; 32],
        /// The seed the share was built from.
        found: [u8; 32],
    },
    /// Error that occurs when a party contributes out of turn.
    #[error("Expected party {expected}, found party {found}!")]
    PartyOutOfOrder {
        /// The next party in order.
        expected: usize,
        /// The party that tried to contribute.
        found: usize,
    },
    /// Error that occurs when a key is finished before every party contributed.
    #[error("Only {absorbed} of {parties} parties contributed!")]
    IncompleteAssembly {
        /// Parties that contributed.
        absorbed: usize,
        /// Parties expected.
        parties: usize,
    },
    /// Error that occurs when there is nothing to combine.
    #[error("No shares were given!")]
    NoShares,
    /// Error that occurs when a key does not have the shape the parameters describe.
    #[error("Key shape does not match the parameters!")]
    KeyShapeMismatch,
    /// Error that occurs when an LWE mask has the wrong length.
    #[error("LWE mask length {found} does not match the LWE dimension {expected}!")]
    MaskLength {
        /// The LWE dimension.
        expected: usize,
        /// The given mask length.
        found: usize,
    },
    /// Error that occurs when the key arena cannot be allocated.
    #[error("Failed to allocate {cells} key cells ({bytes} bytes)!")]
    AllocationFailure {
        /// Cell count.
        cells: usize,
        /// Requested bytes.
        bytes: usize,
    },
    /// Error that occurs when the configuration cannot be used.
    #[error("Configuration error: {0}")]
    Config(String),
}
