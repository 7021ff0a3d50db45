#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![deny(missing_docs)]

//! Modular arithmetic and negacyclic polynomial rings for lattice cryptography.

mod error;

pub mod decompose;
pub mod modulus;
pub mod ntt;
pub mod polynomial;
pub mod random;
pub mod reduce;
pub mod utils;

pub use error::AlgebraError;
pub use modulus::{BarrettModulus, PowOf2Modulus};
pub use ntt::NttTable;
pub use polynomial::{NttPolynomial, Polynomial};
