/// The modulo operation.
pub trait Reduce<T> {
    /// Calculates `value (mod modulus)` where `self` is modulus.
    fn reduce(self, value: T) -> u64;
}

/// The modular addition.
pub trait ReduceAdd {
    /// Calculates `a + b (mod modulus)` where `self` is modulus.
    ///
    /// # Correctness
    ///
    /// - `a < modulus`
    /// - `b < modulus`
    fn reduce_add(self, a: u64, b: u64) -> u64;
}

/// The modular addition assignment.
pub trait ReduceAddAssign {
    /// Calculates `a += b (mod modulus)` where `self` is modulus.
    fn reduce_add_assign(self, a: &mut u64, b: u64);
}

/// The modular subtraction.
pub trait ReduceSub {
    /// Calculates `a - b (mod modulus)` where `self` is modulus.
    ///
    /// # Correctness
    ///
    /// - `a < modulus`
    /// - `b < modulus`
    fn reduce_sub(self, a: u64, b: u64) -> u64;
}

/// The modular subtraction assignment.
pub trait ReduceSubAssign {
    /// Calculates `a -= b (mod modulus)` where `self` is modulus.
    fn reduce_sub_assign(self, a: &mut u64, b: u64);
}

/// The modular negation.
pub trait ReduceNeg {
    /// Calculates `-value (mod modulus)` where `self` is modulus.
    ///
    /// # Correctness
    ///
    /// - `value < modulus`
    fn reduce_neg(self, value: u64) -> u64;
}

/// The modular multiplication.
pub trait ReduceMul {
    /// Calculates `a * b (mod modulus)` where `self` is modulus.
    ///
    /// # Correctness
    ///
    /// - `a < modulus`
    /// - `b < modulus`
    fn reduce_mul(self, a: u64, b: u64) -> u64;
}

/// The modular multiply-add.
pub trait ReduceMulAdd {
    /// Calculates `a * b + c (mod modulus)` where `self` is modulus.
    fn reduce_mul_add(self, a: u64, b: u64, c: u64) -> u64;
}

/// The modular exponentiation.
pub trait ReduceExp {
    /// Calculates `base^exp (mod modulus)` where `self` is modulus.
    fn reduce_exp(self, base: u64, exp: u64) -> u64;
}

/// The modular inversion for prime modulus.
pub trait ReduceInv {
    /// Calculates `value^(-1) (mod modulus)` where `self` is a prime modulus.
    ///
    /// Returns `None` when `value` is zero.
    fn reduce_inv(self, value: u64) -> Option<u64>;
}

/// Conversions between the `[0, modulus)` representation and centered signed integers.
pub trait Centered {
    /// Maps `value` in `[0, modulus)` to `(-modulus/2, modulus/2]`.
    fn centered(self, value: u64) -> i64;

    /// Maps any signed integer into `[0, modulus)`.
    fn from_signed(self, value: i64) -> u64;
}
