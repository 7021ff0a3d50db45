//! Modulus types used by the rings of this crate.

mod barrett;
mod powof2;

pub use barrett::BarrettModulus;
pub use powof2::PowOf2Modulus;
