//! Small helpers shared across the workspace.

mod pool;

pub use pool::Pool;

/// Reverses the lowest `bits` bits of `value`.
#[inline]
pub fn bit_reverse(value: usize, bits: u32) -> usize {
    if bits == 0 {
        0
    } else {
        value.reverse_bits() >> (usize::BITS - bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_reverse() {
        assert_eq!(bit_reverse(0b0011, 4), 0b1100);
        assert_eq!(bit_reverse(1, 1), 1);
        assert_eq!(bit_reverse(5, 0), 0);
    }
}
