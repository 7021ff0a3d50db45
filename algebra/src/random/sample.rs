use rand::{
    distributions::{Distribution, Uniform},
    CryptoRng, Rng,
};

/// Samples `length` values uniformly from `[0, modulus)`.
#[inline]
pub fn sample_uniform_values<R>(length: usize, modulus: u64, rng: &mut R) -> Vec<u64>
where
    R: Rng + ?Sized,
{
    let distr = Uniform::new(0, modulus);
    (0..length).map(|_| distr.sample(rng)).collect()
}

/// Sample a binary vector.
pub fn sample_binary_values<R>(length: usize, rng: &mut R) -> Vec<u64>
where
    R: Rng + CryptoRng,
{
    let mut v = vec![0; length];
    let mut iter = v.chunks_exact_mut(32);
    for chunk in &mut iter {
        let mut r = rng.next_u32();
        for elem in chunk.iter_mut() {
            *elem = (r & 0b1) as u64;
            r >>= 1;
        }
    }
    let mut r = rng.next_u32();
    for elem in iter.into_remainder() {
        *elem = (r & 0b1) as u64;
        r >>= 1;
    }
    v
}

/// Sample a ternary vector, `-1` is stored as `modulus - 1`.
///
/// `0` is drawn with probability `1/2`, `1` and `-1` with probability `1/4` each.
pub fn sample_ternary_values<R>(length: usize, modulus: u64, rng: &mut R) -> Vec<u64>
where
    R: Rng + CryptoRng,
{
    let s = [0, 0, 1, modulus - 1];
    let mut v = vec![0; length];
    let mut iter = v.chunks_exact_mut(16);
    for chunk in &mut iter {
        let mut r = rng.next_u32();
        for elem in chunk.iter_mut() {
            *elem = s[(r & 0b11) as usize];
            r >>= 2;
        }
    }
    let mut r = rng.next_u32();
    for elem in iter.into_remainder() {
        *elem = s[(r & 0b11) as usize];
        r >>= 2;
    }
    v
}
