use algebra::{reduce::ReduceAdd, Polynomial};
use lattice::{Lwe, Rlwe};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    lwe::{add_inputs, double_difference_inputs, not_input},
    Accumulator, BootstrappingKey, FhewError, LweCiphertext, Parameters, RingSecretKey,
};

/// Binary gates evaluated by bootstrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryGate {
    /// `a & b`
    And,
    /// `a | b`
    Or,
    /// `!(a & b)`
    Nand,
    /// `!(a | b)`
    Nor,
    /// `a ^ b`
    Xor,
    /// `!(a ^ b)`
    Xnor,
}

impl BinaryGate {
    /// All gates.
    pub const ALL: [BinaryGate; 6] = [
        BinaryGate::And,
        BinaryGate::Or,
        BinaryGate::Nand,
        BinaryGate::Nor,
        BinaryGate::Xor,
        BinaryGate::Xnor,
    ];

    /// Returns the start `w0` of the half window of combined phases that map to `true`.
    #[inline]
    pub fn window_start(self, lwe_modulus: u64) -> u64 {
        let eighth = lwe_modulus >> 3;
        match self {
            BinaryGate::And | BinaryGate::Xor => 3 * eighth,
            BinaryGate::Or => eighth,
            BinaryGate::Nand | BinaryGate::Xnor => 7 * eighth,
            BinaryGate::Nor => 5 * eighth,
        }
    }

    /// Evaluates the gate on plaintext bits.
    #[inline]
    pub const fn evaluate(self, a: bool, b: bool) -> bool {
        match self {
            BinaryGate::And => a & b,
            BinaryGate::Or => a | b,
            BinaryGate::Nand => !(a & b),
            BinaryGate::Nor => !(a | b),
            BinaryGate::Xor => a ^ b,
            BinaryGate::Xnor => !(a ^ b),
        }
    }
}

/// A bootstrapped bit: an LWE sample modulo `Q` of dimension `N` under the ring secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshedCiphertext(Lwe<u64>);

impl RefreshedCiphertext {
    /// Creates a new [`RefreshedCiphertext`].
    #[inline]
    pub fn new(lwe: Lwe<u64>) -> Self {
        Self(lwe)
    }

    /// Returns the LWE sample.
    #[inline]
    pub fn lwe(&self) -> &Lwe<u64> {
        &self.0
    }

    /// Returns the LWE sample, consuming `self`.
    #[inline]
    pub fn into_lwe(self) -> Lwe<u64> {
        self.0
    }

    /// Decrypts with the ring secret as `round(4·(b - <a, z>)/Q) mod 4`.
    pub fn decrypt(&self, secret: &RingSecretKey, params: &Parameters) -> bool {
        let phase = self.0.phase(secret.key().as_slice(), params.ring_modulus());
        crate::decode(phase, params.ring_modulus_value())
    }
}

/// Evaluates binary gates with a bootstrapping key.
#[derive(Debug, Clone)]
pub struct Evaluator {
    params: Parameters,
    accumulator: Accumulator,
}

impl Evaluator {
    /// Creates a new [`Evaluator`].
    pub fn new(params: Parameters, key: BootstrappingKey) -> Result<Self, FhewError> {
        let accumulator = Accumulator::new(&params, key)?;
        Ok(Self {
            params,
            accumulator,
        })
    }

    /// Returns the parameters.
    #[inline]
    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// Returns the accumulator.
    #[inline]
    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    /// Performs the homomorphic not operation, no bootstrapping is needed.
    #[inline]
    pub fn not(&self, ct: &LweCiphertext) -> LweCiphertext {
        not_input(ct, self.params.lwe_modulus())
    }

    /// Evaluates `gate` on two bit ciphertexts and refreshes the result.
    #[instrument(skip_all, fields(gate = ?gate))]
    pub fn bootstrap_gate(
        &self,
        gate: BinaryGate,
        ct0: &LweCiphertext,
        ct1: &LweCiphertext,
    ) -> Result<RefreshedCiphertext, FhewError> {
        let lwe_dimension = self.params.lwe_dimension();
        if let Some(ct) = [ct0, ct1].into_iter().find(|ct| ct.dimension() != lwe_dimension) {
            return Err(FhewError::MaskLength {
                expected: lwe_dimension,
                found: ct.dimension(),
            });
        }

        let lwe_modulus = self.params.lwe_modulus();
        let combined = match gate {
            BinaryGate::Xor | BinaryGate::Xnor => double_difference_inputs(ct0, ct1, lwe_modulus),
            _ => add_inputs(ct0, ct1, lwe_modulus),
        };

        let mut acc = Rlwe::trivial(self.test_vector(gate, combined.b()));
        self.accumulator.accumulate(&mut acc, combined.a())?;

        let modulus = self.params.ring_modulus();
        let mut lwe = acc.extract_lwe(modulus);
        *lwe.b_mut() = modulus.reduce_add(lwe.b(), self.lift());

        debug!("gate bootstrapped");
        Ok(RefreshedCiphertext(lwe))
    }

    /// `Q/8 + 1`, the amplitude of the test vector.
    #[inline]
    fn lift(&self) -> u64 {
        (self.params.ring_modulus_value() >> 3) + 1
    }

    /// Builds the test vector of `gate` for the combined body `b`.
    ///
    /// Coefficient `j·2N/q` for `j < q/2` is `Q/8 + 1` when `b - j` lies in the gate's
    /// window `[w0, w0 + q/2)`, and `-(Q/8 + 1)` otherwise.
    fn test_vector(&self, gate: BinaryGate, b: u64) -> Polynomial {
        let q = self.params.lwe_modulus_value();
        let half = q >> 1;
        let window_start = gate.window_start(q);
        let factor = self.params.twice_ring_dimension_div_lwe_modulus();

        let lift = self.lift();
        let neg_lift = self.params.ring_modulus_value() - lift;

        let mut m = Polynomial::zero(self.params.ring_dimension());
        for j in 0..half {
            let temp = (b + q - j) % q;
            let in_window = (temp + q - window_start) % q < half;
            m[j as usize * factor] = if in_window { lift } else { neg_lift };
        }
        m
    }
}
