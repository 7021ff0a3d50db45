//! Negacyclic number theory transform over `Z_Q[X]/(X^N + 1)`.

use std::fmt;

use crate::{
    reduce::{ReduceAdd, ReduceExp, ReduceInv, ReduceMul, ReduceSub},
    utils::bit_reverse,
    AlgebraError, BarrettModulus, NttPolynomial, Polynomial,
};

/// This struct store the pre-computed data for number theory transform and
/// inverse number theory transform.
///
/// With the `concrete-ntt` feature the transforms run on a [`concrete_ntt::prime64::Plan`]
/// whenever the plan supports the modulus and dimension. Otherwise they run on the butterfly
/// tables below. The two backends order the transform domain differently, so transformed
/// values are only meaningful to the table that produced them.
///
/// ## The butterfly tables meet the following conditions:
///
/// 1. `root` is a primitive `2N`-th root of unity, i.e. `root^N ≡ -1 (mod modulus)`.
/// 2. `root_powers` holds `root^bitrev(i)` for `i` in `[0, N)`.
/// 3. `inv_root_powers` holds `root^(-bitrev(i))` for `i` in `[0, N)`.
/// 4. `inv_dimension` is `N^(-1) (mod modulus)`.
#[derive(Clone)]
pub struct NttTable {
    modulus: BarrettModulus,
    log_dimension: u32,
    dimension: usize,
    root: u64,
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    #[cfg(feature = "concrete-ntt")]
    Concrete(Box<concrete_ntt::prime64::Plan>),
    Butterfly {
        root_powers: Vec<u64>,
        inv_root_powers: Vec<u64>,
        inv_dimension: u64,
    },
}

impl NttTable {
    /// Creates a new [`NttTable`] for dimension `2^log_dimension`.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimension is smaller than 2 or if the modulus has no
    /// primitive `2N`-th root of unity.
    pub fn new(modulus: BarrettModulus, log_dimension: u32) -> Result<Self, AlgebraError> {
        Self::with_butterflies(modulus, log_dimension).map(Self::into_default_backend)
    }

    #[cfg(feature = "concrete-ntt")]
    fn into_default_backend(self) -> Self {
        match concrete_ntt::prime64::Plan::try_new(self.dimension, self.modulus.value()) {
            Some(plan) => Self {
                backend: Backend::Concrete(Box::new(plan)),
                ..self
            },
            None => self,
        }
    }

    #[cfg(not(feature = "concrete-ntt"))]
    #[inline]
    fn into_default_backend(self) -> Self {
        self
    }

    /// Creates a new [`NttTable`] that always runs on the butterfly tables.
    pub fn with_butterflies(
        modulus: BarrettModulus,
        log_dimension: u32,
    ) -> Result<Self, AlgebraError> {
        if log_dimension == 0 || log_dimension >= usize::BITS - 1 {
            return Err(AlgebraError::InvalidDimension {
                dimension: 1usize.checked_shl(log_dimension).unwrap_or(0),
            });
        }
        let dimension = 1usize << log_dimension;
        let root = find_negacyclic_root(modulus, dimension)?;
        let inv_root = modulus
            .reduce_inv(root)
            .ok_or(AlgebraError::NoPrimitiveRoot {
                degree: (dimension as u64) << 1,
                modulus: modulus.value(),
            })?;
        let inv_dimension = modulus
            .reduce_inv(dimension as u64)
            .ok_or(AlgebraError::InvalidDimension { dimension })?;

        let mut powers = Vec::with_capacity(dimension);
        let mut inv_powers = Vec::with_capacity(dimension);
        let (mut p, mut ip) = (1u64, 1u64);
        for _ in 0..dimension {
            powers.push(p);
            inv_powers.push(ip);
            p = modulus.reduce_mul(p, root);
            ip = modulus.reduce_mul(ip, inv_root);
        }

        let root_powers = (0..dimension)
            .map(|i| powers[bit_reverse(i, log_dimension)])
            .collect();
        let inv_root_powers = (0..dimension)
            .map(|i| inv_powers[bit_reverse(i, log_dimension)])
            .collect();

        Ok(Self {
            modulus,
            log_dimension,
            dimension,
            root,
            backend: Backend::Butterfly {
                root_powers,
                inv_root_powers,
                inv_dimension,
            },
        })
    }

    /// Returns `true` if the transforms run on a `concrete-ntt` plan.
    #[inline]
    pub fn is_concrete(&self) -> bool {
        match self.backend {
            #[cfg(feature = "concrete-ntt")]
            Backend::Concrete(_) => true,
            Backend::Butterfly { .. } => false,
        }
    }

    /// Returns the modulus of this [`NttTable`].
    #[inline]
    pub fn modulus(&self) -> BarrettModulus {
        self.modulus
    }

    /// Returns the dimension of this [`NttTable`].
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the log dimension of this [`NttTable`].
    #[inline]
    pub fn log_dimension(&self) -> u32 {
        self.log_dimension
    }

    /// Returns the primitive `2N`-th root of unity of this [`NttTable`].
    #[inline]
    pub fn root(&self) -> u64 {
        self.root
    }

    /// Transforms a coefficient slice into the transform domain in place.
    pub fn transform_slice(&self, values: &mut [u64]) {
        debug_assert_eq!(values.len(), self.dimension);
        match &self.backend {
            #[cfg(feature = "concrete-ntt")]
            Backend::Concrete(plan) => plan.fwd(values),
            Backend::Butterfly { root_powers, .. } => {
                butterfly_forward(values, root_powers, self.modulus)
            }
        }
    }

    /// Transforms a transform-domain slice back into coefficients in place.
    pub fn inverse_transform_slice(&self, values: &mut [u64]) {
        debug_assert_eq!(values.len(), self.dimension);
        match &self.backend {
            #[cfg(feature = "concrete-ntt")]
            Backend::Concrete(plan) => {
                plan.inv(values);
                plan.normalize(values);
            }
            Backend::Butterfly {
                inv_root_powers,
                inv_dimension,
                ..
            } => butterfly_inverse(values, inv_root_powers, *inv_dimension, self.modulus),
        }
    }

    /// Performs a number theory transform on `polynomial`, consuming it.
    #[inline]
    pub fn transform_inplace(&self, polynomial: Polynomial) -> NttPolynomial {
        let mut data = polynomial.data();
        self.transform_slice(&mut data);
        NttPolynomial::new(data)
    }

    /// Performs a number theory transform on `polynomial`.
    #[inline]
    pub fn transform(&self, polynomial: &Polynomial) -> NttPolynomial {
        self.transform_inplace(polynomial.clone())
    }

    /// Performs an inverse number theory transform on `ntt_polynomial`, consuming it.
    #[inline]
    pub fn inverse_transform_inplace(&self, ntt_polynomial: NttPolynomial) -> Polynomial {
        let mut data = ntt_polynomial.data();
        self.inverse_transform_slice(&mut data);
        Polynomial::new(data)
    }

    /// Performs an inverse number theory transform on `ntt_polynomial`.
    #[inline]
    pub fn inverse_transform(&self, ntt_polynomial: &NttPolynomial) -> Polynomial {
        self.inverse_transform_inplace(ntt_polynomial.clone())
    }

    /// Transforms `polynomial` into `destination` without allocating.
    #[inline]
    pub fn transform_into(&self, polynomial: &Polynomial, destination: &mut NttPolynomial) {
        destination.as_mut_slice().copy_from_slice(polynomial.as_slice());
        self.transform_slice(destination.as_mut_slice());
    }

    /// Inverse transforms `ntt_polynomial` into `destination` without allocating.
    #[inline]
    pub fn inverse_transform_into(
        &self,
        ntt_polynomial: &NttPolynomial,
        destination: &mut Polynomial,
    ) {
        destination
            .as_mut_slice()
            .copy_from_slice(ntt_polynomial.as_slice());
        self.inverse_transform_slice(destination.as_mut_slice());
    }
}

impl fmt::Debug for NttTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NttTable")
            .field("modulus", &self.modulus.value())
            .field("dimension", &self.dimension)
            .field("root", &self.root)
            .field("concrete", &self.is_concrete())
            .finish()
    }
}

impl PartialEq for NttTable {
    fn eq(&self, other: &Self) -> bool {
        self.modulus == other.modulus
            && self.log_dimension == other.log_dimension
            && self.is_concrete() == other.is_concrete()
    }
}

impl Eq for NttTable {}

/// Cooley-Tukey butterflies, the output is in bit-reversed order.
fn butterfly_forward(values: &mut [u64], root_powers: &[u64], modulus: BarrettModulus) {
    let dimension = values.len();
    let mut t = dimension;
    let mut m = 1;
    while m < dimension {
        t >>= 1;
        for i in 0..m {
            let j1 = 2 * i * t;
            let s = root_powers[m + i];
            let (lo, hi) = values[j1..j1 + 2 * t].split_at_mut(t);
            for (x, y) in lo.iter_mut().zip(hi.iter_mut()) {
                let u = *x;
                let v = modulus.reduce_mul(*y, s);
                *x = modulus.reduce_add(u, v);
                *y = modulus.reduce_sub(u, v);
            }
        }
        m <<= 1;
    }
}

/// Gentleman-Sande butterflies followed by the `N^(-1)` scaling.
fn butterfly_inverse(
    values: &mut [u64],
    inv_root_powers: &[u64],
    inv_dimension: u64,
    modulus: BarrettModulus,
) {
    let mut t = 1;
    let mut m = values.len();
    while m > 1 {
        let h = m >> 1;
        let mut j1 = 0;
        for i in 0..h {
            let s = inv_root_powers[h + i];
            let (lo, hi) = values[j1..j1 + 2 * t].split_at_mut(t);
            for (x, y) in lo.iter_mut().zip(hi.iter_mut()) {
                let u = *x;
                let v = *y;
                *x = modulus.reduce_add(u, v);
                *y = modulus.reduce_mul(modulus.reduce_sub(u, v), s);
            }
            j1 += 2 * t;
        }
        t <<= 1;
        m = h;
    }
    values
        .iter_mut()
        .for_each(|v| *v = modulus.reduce_mul(*v, inv_dimension));
}

/// Finds a primitive `2·dimension`-th root of unity modulo a prime `modulus`.
fn find_negacyclic_root(modulus: BarrettModulus, dimension: usize) -> Result<u64, AlgebraError> {
    let q = modulus.value();
    let order = (dimension as u64) << 1;
    let err = AlgebraError::NoPrimitiveRoot {
        degree: order,
        modulus: q,
    };
    if (q - 1) % order != 0 {
        return Err(err);
    }
    let cofactor = (q - 1) / order;
    let minus_one = q - 1;
    (2..q.min(1 << 20))
        .map(|g| modulus.reduce_exp(g, cofactor))
        .find(|&root| modulus.reduce_exp(root, dimension as u64) == minus_one)
        .ok_or(err)
}
