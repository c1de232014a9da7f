//! Seeded, random-access sequences of pseudo-random values.
//!
//! The `n`-th value is a SplitMix64 output computed directly from the seed,
//! so a sequence needs no storage and can be indexed in any order.

use std::marker::PhantomData;

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

fn mix(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Types that can be drawn from a random `u64`
pub trait FromRandom: Sized {
    fn from_random(bits: u64) -> Self;
}

impl FromRandom for u64 {
    fn from_random(bits: u64) -> Self {
        bits
    }
}

impl FromRandom for u32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_random(bits: u64) -> Self {
        (bits >> 32) as u32
    }
}

impl FromRandom for i64 {
    #[allow(clippy::cast_possible_wrap)]
    fn from_random(bits: u64) -> Self {
        bits as i64
    }
}

impl FromRandom for i32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn from_random(bits: u64) -> Self {
        (bits >> 32) as i32
    }
}

impl FromRandom for f64 {
    /// Uniform in `[0, 1)` from the top 53 bits
    #[allow(clippy::cast_precision_loss)]
    fn from_random(bits: u64) -> Self {
        (bits >> 11) as f64 / (1_u64 << 53) as f64
    }
}

impl FromRandom for f32 {
    /// Uniform in `[0, 1)` from the top 24 bits
    #[allow(clippy::cast_precision_loss)]
    fn from_random(bits: u64) -> Self {
        (bits >> 40) as f32 / (1_u32 << 24) as f32
    }
}

/// An endless sequence of pseudo-random `T` determined by a seed.
///
/// ```
/// use denseblas_math::random::RandomIter;
///
/// let mut iter = RandomIter::<f64>::new(42);
/// let third = iter.get(2);
/// assert_eq!(iter.nth(2), Some(third));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomIter<T> {
    seed: u64,
    pos: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T: FromRandom> RandomIter<T> {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            pos: 0,
            _marker: PhantomData,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The `n`-th value of the sequence, counted from the seed rather than the current position
    pub fn get(&self, n: u64) -> T {
        T::from_random(mix(
            self.seed.wrapping_add(n.wrapping_add(1).wrapping_mul(GOLDEN_GAMMA)),
        ))
    }
}

impl<T: FromRandom> Iterator for RandomIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let value = self.get(self.pos);
        self.pos = self.pos.wrapping_add(1);
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }

    fn nth(&mut self, n: usize) -> Option<T> {
        self.pos = self.pos.wrapping_add(n as u64);
        self.next()
    }
}

#[cfg(test)]
mod tests {
    use super::RandomIter;

    #[test]
    fn matches_splitmix() {
        // first outputs of SplitMix64 seeded with 0
        let mut iter = RandomIter::<u64>::new(0);
        assert_eq!(iter.next(), Some(0xE220_A839_7B1D_CDAF));
        assert_eq!(iter.next(), Some(0x6E78_9E6A_A1B9_65F4));
    }

    #[test]
    fn random_access() {
        let iter = RandomIter::<u32>::new(1234);
        let seq: Vec<u32> = iter.take(64).collect();
        for (n, &v) in seq.iter().enumerate() {
            assert_eq!(iter.get(n as u64), v);
        }

        let mut skip = iter;
        assert_eq!(skip.nth(10), Some(seq[10]));
        assert_eq!(skip.next(), Some(seq[11]));
    }

    #[test]
    fn deterministic() {
        let a: Vec<i64> = RandomIter::new(7).take(16).collect();
        let b: Vec<i64> = RandomIter::new(7).take(16).collect();
        let c: Vec<i64> = RandomIter::new(8).take(16).collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn unit_interval() {
        assert!(RandomIter::<f64>::new(42)
            .take(1000)
            .all(|v| (0.0..1.0).contains(&v)));
        assert!(RandomIter::<f32>::new(42)
            .take(1000)
            .all(|v| (0.0..1.0).contains(&v)));

        let mean = RandomIter::<f64>::new(3).take(10_000).sum::<f64>() / 10_000.0;
        assert!((mean - 0.5).abs() < 0.02, "mean = {mean}");
    }

    #[test]
    fn signed_covers_both_signs() {
        let values: Vec<i32> = RandomIter::new(99).take(100).collect();
        assert!(values.iter().any(|&v| v < 0));
        assert!(values.iter().any(|&v| v > 0));
    }
}
