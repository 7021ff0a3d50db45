//! Defines some algorithms for random values generation.

mod gaussian;
mod sample;

pub use gaussian::DiscreteGaussian;
pub use sample::{sample_binary_values, sample_ternary_values, sample_uniform_values};
