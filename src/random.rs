//! Integer draws for cosmetic tile variation.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Random source used when picking between interchangeable tiles.
///
/// Seeded sources are fully reproducible; [`RandomSource::from_entropy`] is
/// for callers that want a different look on every run.
pub struct RandomSource {
    rng: ChaCha8Rng,
}

impl RandomSource {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Uniform integer in `0..max`. Returns 0 when `max <= 0`.
    pub fn next_int(&mut self, max: i32) -> i32 {
        if max <= 0 {
            return 0;
        }
        self.rng.gen_range(0..max)
    }

    /// Uniform integer in `min..max`. Returns `min` for an empty range.
    pub fn next_range(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    /// Uniform pick from a slice.
    pub fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        items.choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_sequence_repeats() {
        let mut a = RandomSource::from_seed(7);
        let mut b = RandomSource::from_seed(7);
        let xs: Vec<i32> = (0..32).map(|_| a.next_int(100)).collect();
        let ys: Vec<i32> = (0..32).map(|_| b.next_int(100)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_ranges() {
        let mut rng = RandomSource::from_seed(3);
        for _ in 0..200 {
            let v = rng.next_range(5, 8);
            assert!((5..8).contains(&v));
            assert!((0..3).contains(&rng.next_int(3)));
        }
        assert_eq!(rng.next_int(0), 0);
        assert_eq!(rng.next_range(4, 4), 4);
    }

    #[test]
    fn test_pick() {
        let mut rng = RandomSource::from_seed(11);
        let items = [321, 285, 325];
        for _ in 0..50 {
            assert!(items.contains(&rng.pick(&items).unwrap()));
        }
        assert_eq!(rng.pick::<i32>(&[]), None);
    }
}
