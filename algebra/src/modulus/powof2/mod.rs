use serde::{Deserialize, Serialize};

use crate::{
    reduce::{
        Centered, Reduce, ReduceAdd, ReduceAddAssign, ReduceMul, ReduceNeg, ReduceSub,
        ReduceSubAssign,
    },
    AlgebraError,
};

/// A struct for power of 2 modulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(transparent)]
pub struct PowOf2Modulus {
    /// The special value for performing `reduce`.
    ///
    /// It's equal to modulus value sub one.
    mask: u64,
}

impl PowOf2Modulus {
    /// Creates a [`PowOf2Modulus`] instance.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not a power of two no less than 2.
    #[inline]
    pub fn new(value: u64) -> Result<Self, AlgebraError> {
        if value < 2 || !value.is_power_of_two() {
            return Err(AlgebraError::NotPowerOfTwo { value });
        }
        Ok(Self { mask: value - 1 })
    }

    /// Returns the value of this [`PowOf2Modulus`].
    #[inline]
    pub const fn value(&self) -> u64 {
        self.mask + 1
    }

    /// Returns the mask of this [`PowOf2Modulus`],
    /// which is equal to modulus value sub one.
    #[inline]
    pub const fn mask(&self) -> u64 {
        self.mask
    }
}

impl Reduce<u64> for PowOf2Modulus {
    #[inline]
    fn reduce(self, value: u64) -> u64 {
        value & self.mask
    }
}

impl Reduce<u128> for PowOf2Modulus {
    #[inline]
    fn reduce(self, value: u128) -> u64 {
        (value as u64) & self.mask
    }
}

impl ReduceAdd for PowOf2Modulus {
    #[inline]
    fn reduce_add(self, a: u64, b: u64) -> u64 {
        a.wrapping_add(b) & self.mask
    }
}

impl ReduceAddAssign for PowOf2Modulus {
    #[inline]
    fn reduce_add_assign(self, a: &mut u64, b: u64) {
        *a = self.reduce_add(*a, b);
    }
}

impl ReduceSub for PowOf2Modulus {
    #[inline]
    fn reduce_sub(self, a: u64, b: u64) -> u64 {
        a.wrapping_sub(b) & self.mask
    }
}

impl ReduceSubAssign for PowOf2Modulus {
    #[inline]
    fn reduce_sub_assign(self, a: &mut u64, b: u64) {
        *a = self.reduce_sub(*a, b);
    }
}

impl ReduceNeg for PowOf2Modulus {
    #[inline]
    fn reduce_neg(self, value: u64) -> u64 {
        value.wrapping_neg() & self.mask
    }
}

impl ReduceMul for PowOf2Modulus {
    #[inline]
    fn reduce_mul(self, a: u64, b: u64) -> u64 {
        a.wrapping_mul(b) & self.mask
    }
}

impl Centered for PowOf2Modulus {
    #[inline]
    fn centered(self, value: u64) -> i64 {
        let value = value & self.mask;
        if value > self.value() >> 1 {
            value as i64 - self.value() as i64
        } else {
            value as i64
        }
    }

    #[inline]
    fn from_signed(self, value: i64) -> u64 {
        (value as u64) & self.mask
    }
}
