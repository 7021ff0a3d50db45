//! Polynomials over `Z_Q[X]/(X^N + 1)`.
//!
//! [`Polynomial`] holds coefficients and [`NttPolynomial`] holds transform-domain values.
//! The two representations never mix: converting between them always goes through an
//! [`NttTable`](crate::NttTable).

mod coeff;
mod monomial;
mod ntt;

pub use coeff::Polynomial;
pub use monomial::{automorphism, automorphism_into, rotate_ring_signed, rotate_ring_signed_into};
pub use ntt::NttPolynomial;
