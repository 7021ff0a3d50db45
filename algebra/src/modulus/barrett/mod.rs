use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    reduce::{
        Centered, Reduce, ReduceAdd, ReduceAddAssign, ReduceExp, ReduceInv, ReduceMul,
        ReduceMulAdd, ReduceNeg, ReduceSub, ReduceSubAssign,
    },
    AlgebraError,
};

/// The largest supported modulus bit count, so that sums of two residues never overflow
/// and products fit the barrett window.
pub const MAX_MODULUS_BITS: u32 = 62;

/// A modulus, using barrett reduction algorithm.
///
/// The struct stores the modulus number and some precomputed
/// data. Here, `k` is the bit length of the modulus and the ratio is `⌊4^k/value⌋`.
///
/// It's efficient if many reductions are performed with a single modulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarrettModulus {
    /// the value to indicate the modulus
    value: u64,
    /// ratio `µ` = ⌊4^k/value⌋
    ratio: u64,
    /// bit length `k` of the modulus
    bits: u32,
}

impl Display for BarrettModulus {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl BarrettModulus {
    /// Creates a [`BarrettModulus`] instance.
    ///
    /// # Errors
    ///
    /// Returns an error if `value < 2` or `value >= 2^62`.
    pub fn new(value: u64) -> Result<Self, AlgebraError> {
        if value < 2 {
            return Err(AlgebraError::ModulusTooSmall { modulus: value });
        }
        let bits = u64::BITS - value.leading_zeros();
        if bits > MAX_MODULUS_BITS {
            return Err(AlgebraError::ModulusTooLarge { modulus: value });
        }
        let ratio = ((1u128 << (2 * bits)) / value as u128) as u64;
        Ok(Self { value, ratio, bits })
    }

    /// Returns the value of this [`BarrettModulus`].
    #[inline]
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Returns the bit length of this [`BarrettModulus`].
    #[inline]
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Returns the ratio of this [`BarrettModulus`].
    #[inline]
    pub const fn ratio(&self) -> u64 {
        self.ratio
    }

    /// Returns `true` if the value of this [`BarrettModulus`] is prime.
    ///
    /// Deterministic Miller-Rabin for 64 bit integers.
    pub fn is_prime(&self) -> bool {
        let n = self.value;
        if n < 4 {
            return n >= 2;
        }
        if n % 2 == 0 {
            return false;
        }
        let s = (n - 1).trailing_zeros();
        let d = (n - 1) >> s;
        'witness: for a in [2u64, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37] {
            if a % n == 0 {
                continue;
            }
            let mut x = self.reduce_exp(a, d);
            if x == 1 || x == n - 1 {
                continue;
            }
            for _ in 1..s {
                x = self.reduce_mul(x, x);
                if x == n - 1 {
                    continue 'witness;
                }
            }
            return false;
        }
        true
    }
}

impl Reduce<u64> for BarrettModulus {
    #[inline]
    fn reduce(self, value: u64) -> u64 {
        Reduce::<u128>::reduce(self, value as u128)
    }
}

impl Reduce<u128> for BarrettModulus {
    /// Barrett reduction, requires `value < modulus²`.
    #[inline]
    fn reduce(self, value: u128) -> u64 {
        if value < self.value as u128 {
            return value as u64;
        }
        if value >= (self.value as u128) * (self.value as u128) {
            return (value % self.value as u128) as u64;
        }
        let estimate = ((value >> (self.bits - 1)) * self.ratio as u128) >> (self.bits + 1);
        let mut r = (value - estimate * self.value as u128) as u64;
        while r >= self.value {
            r -= self.value;
        }
        r
    }
}

impl ReduceAdd for BarrettModulus {
    #[inline]
    fn reduce_add(self, a: u64, b: u64) -> u64 {
        let r = a + b;
        if r >= self.value {
            r - self.value
        } else {
            r
        }
    }
}

impl ReduceAddAssign for BarrettModulus {
    #[inline]
    fn reduce_add_assign(self, a: &mut u64, b: u64) {
        *a = self.reduce_add(*a, b);
    }
}

impl ReduceSub for BarrettModulus {
    #[inline]
    fn reduce_sub(self, a: u64, b: u64) -> u64 {
        if a >= b {
            a - b
        } else {
            a + self.value - b
        }
    }
}

impl ReduceSubAssign for BarrettModulus {
    #[inline]
    fn reduce_sub_assign(self, a: &mut u64, b: u64) {
        *a = self.reduce_sub(*a, b);
    }
}

impl ReduceNeg for BarrettModulus {
    #[inline]
    fn reduce_neg(self, value: u64) -> u64 {
        if value == 0 {
            0
        } else {
            self.value - value
        }
    }
}

impl ReduceMul for BarrettModulus {
    #[inline]
    fn reduce_mul(self, a: u64, b: u64) -> u64 {
        Reduce::<u128>::reduce(self, a as u128 * b as u128)
    }
}

impl ReduceMulAdd for BarrettModulus {
    #[inline]
    fn reduce_mul_add(self, a: u64, b: u64, c: u64) -> u64 {
        Reduce::<u128>::reduce(self, a as u128 * b as u128 + c as u128)
    }
}

impl ReduceExp for BarrettModulus {
    fn reduce_exp(self, base: u64, mut exp: u64) -> u64 {
        let mut base = Reduce::<u64>::reduce(self, base);
        let mut result = 1 % self.value;
        while exp > 0 {
            if exp & 1 == 1 {
                result = self.reduce_mul(result, base);
            }
            base = self.reduce_mul(base, base);
            exp >>= 1;
        }
        result
    }
}

impl ReduceInv for BarrettModulus {
    #[inline]
    fn reduce_inv(self, value: u64) -> Option<u64> {
        let value = Reduce::<u64>::reduce(self, value);
        if value == 0 {
            None
        } else {
            Some(self.reduce_exp(value, self.value - 2))
        }
    }
}

impl Centered for BarrettModulus {
    #[inline]
    fn centered(self, value: u64) -> i64 {
        if value > self.value >> 1 {
            value as i64 - self.value as i64
        } else {
            value as i64
        }
    }

    #[inline]
    fn from_signed(self, value: i64) -> u64 {
        value.rem_euclid(self.value as i64) as u64
    }
}
