use lattice::NttRgsw;
use rand::{CryptoRng, Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{FhewError, GadgetKeyBuilder, LweSecretKey, Parameters, RingSecretKey};

/// The DM bootstrapping key.
///
/// Cell `(i, j, k)` encrypts `X^(s_i·j·baseR^k·2N/q)` for the centered LWE secret `s_i`,
/// with `i < n`, `1 <= j < baseR` and `k < digitsR`. The `j = 0` cells would encrypt
/// `X^0` and are never read, so they are not stored. The cells live in one flat arena,
/// ordered by `i`, then `j`, then `k`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrappingKey {
    lwe_dimension: usize,
    refresh_basis: usize,
    refresh_digits: usize,
    cells: Vec<NttRgsw>,
}

impl BootstrappingKey {
    /// Generates the key of a single key holder.
    ///
    /// Cells are encrypted in parallel, each with its own generator seeded from `rng`.
    #[instrument(skip_all, fields(
        lwe_dimension = params.lwe_dimension(),
        refresh_basis = params.refresh_basis(),
    ))]
    pub fn generate<R>(
        params: &Parameters,
        lwe_secret: &LweSecretKey,
        ring_secret: &RingSecretKey,
        rng: &mut R,
    ) -> Result<Self, FhewError>
    where
        R: Rng + CryptoRng,
    {
        if lwe_secret.dimension() != params.lwe_dimension() {
            return Err(FhewError::KeyShapeMismatch);
        }
        let builder = GadgetKeyBuilder::new(params);
        let secret = lwe_secret.centered(params);
        let powers = params.refresh_powers();

        let mut key = Self::empty(params)?;
        let mut arena = std::mem::take(&mut key.cells);
        let seeds: Vec<[u8; 32]> = (0..key.capacity()).map(|_| rng.gen()).collect();
        arena.par_extend(seeds.into_par_iter().enumerate().map(|(index, seed)| {
            let (i, j, k) = key.coordinate(index);
            let mut cell_rng = ChaCha12Rng::from_seed(seed);
            let message = secret[i] * j as i64 * powers[k] as i64;
            builder.encrypt(ring_secret, message, None, &mut cell_rng)
        }));
        key.cells = arena;

        debug!(cells = key.cells.len(), "bootstrapping key generated");
        Ok(key)
    }

    /// Creates a key whose every cell is a copy of `cell`.
    pub(crate) fn filled(params: &Parameters, cell: &NttRgsw) -> Result<Self, FhewError> {
        let mut key = Self::empty(params)?;
        let count = key.capacity();
        key.cells.resize(count, cell.clone());
        Ok(key)
    }

    /// Creates a key with an empty arena reserved for every cell.
    fn empty(params: &Parameters) -> Result<Self, FhewError> {
        let lwe_dimension = params.lwe_dimension();
        let refresh_basis = params.refresh_basis() as usize;
        let refresh_digits = params.refresh_digits();

        let cells = lwe_dimension
            .saturating_mul(refresh_basis - 1)
            .saturating_mul(refresh_digits);
        let bytes = cells
            .saturating_mul(params.gadget_rows() << 1)
            .saturating_mul(params.ring_dimension())
            .saturating_mul(std::mem::size_of::<u64>());

        let mut arena = Vec::new();
        arena
            .try_reserve_exact(cells)
            .map_err(|_| FhewError::AllocationFailure { cells, bytes })?;

        Ok(Self {
            lwe_dimension,
            refresh_basis,
            refresh_digits,
            cells: arena,
        })
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.lwe_dimension * self.cells_per_coordinate()
    }

    /// Returns the LWE dimension **`n`**.
    #[inline]
    pub fn lwe_dimension(&self) -> usize {
        self.lwe_dimension
    }

    /// Returns the refresh basis **`baseR`**.
    #[inline]
    pub fn refresh_basis(&self) -> usize {
        self.refresh_basis
    }

    /// Returns the refresh digit count.
    #[inline]
    pub fn refresh_digits(&self) -> usize {
        self.refresh_digits
    }

    /// Returns the stored cell count `n·(baseR - 1)·digitsR`.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns the cell count of one LWE coordinate, `(baseR - 1)·digitsR`.
    #[inline]
    pub fn cells_per_coordinate(&self) -> usize {
        (self.refresh_basis - 1) * self.refresh_digits
    }

    #[inline]
    fn index(&self, i: usize, j: usize, k: usize) -> Option<usize> {
        (i < self.lwe_dimension && (1..self.refresh_basis).contains(&j) && k < self.refresh_digits)
            .then(|| (i * (self.refresh_basis - 1) + (j - 1)) * self.refresh_digits + k)
    }

    /// Returns the coordinate `(i, j, k)` of the cell at `index` of the arena.
    #[inline]
    pub fn coordinate(&self, index: usize) -> (usize, usize, usize) {
        let k = index % self.refresh_digits;
        let rest = index / self.refresh_digits;
        let j = rest % (self.refresh_basis - 1) + 1;
        (rest / (self.refresh_basis - 1), j, k)
    }

    /// Returns the cell `(i, j, k)`, or `None` when it is out of range or `j = 0`.
    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<&NttRgsw> {
        self.index(i, j, k).and_then(|index| self.cells.get(index))
    }

    /// Returns the mutable cell `(i, j, k)`, or `None` when it is out of range or `j = 0`.
    #[inline]
    pub fn get_mut(&mut self, i: usize, j: usize, k: usize) -> Option<&mut NttRgsw> {
        self.index(i, j, k)
            .and_then(|index| self.cells.get_mut(index))
    }

    /// Returns all cells in arena order.
    #[inline]
    pub fn cells(&self) -> &[NttRgsw] {
        &self.cells
    }

    #[inline]
    pub(crate) fn cells_mut(&mut self) -> &mut [NttRgsw] {
        &mut self.cells
    }

    /// Returns `true` if this key has the shape `params` describes.
    pub fn is_compatible(&self, params: &Parameters) -> bool {
        self.lwe_dimension == params.lwe_dimension()
            && self.refresh_basis as u64 == params.refresh_basis()
            && self.refresh_digits == params.refresh_digits()
            && self.cells.len() == self.capacity()
            && self.cells.iter().all(|cell| {
                cell.row_count() == params.gadget_rows()
                    && cell.dimension() == params.ring_dimension()
            })
    }
}
