//! Modular reduction traits.
//!
//! The traits are implemented on modulus types, so the modulus is the receiver:
//! `modulus.reduce_add(a, b)`.

mod ops;

pub use ops::*;
