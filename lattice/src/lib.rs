#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![deny(missing_docs)]

//! Defines some lattice cryptographic structure.

mod lwe;
mod rgsw;
mod rlwe;

pub mod utils;

pub use lwe::Lwe;
pub use rgsw::{NttRgsw, RgswMessage};
pub use rlwe::{NttRlwe, Rlwe};
