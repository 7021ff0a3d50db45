//! Gadget decomposition.

mod signed;

pub use signed::SignedDigitDecomposer;
