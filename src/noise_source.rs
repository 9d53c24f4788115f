//! Seedable 3D gradient noise.

use noise::{NoiseFn, Perlin, Seedable};

/// Deterministic Perlin noise field.
///
/// Identical seeds and coordinates always give identical output. [`sample`]
/// is roughly in `[-1, 1]`; [`sample_unit`] rescales it to `[0, 1]`, the
/// range every generation threshold is expressed in.
///
/// [`sample`]: NoiseSource::sample
/// [`sample_unit`]: NoiseSource::sample_unit
#[derive(Clone, Debug)]
pub struct NoiseSource {
    perlin: Perlin,
}

impl NoiseSource {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }

    /// Replace the permutation table with one built from `seed`.
    pub fn reseed(&mut self, seed: u32) {
        self.perlin = Perlin::new(seed);
    }

    pub fn seed(&self) -> u32 {
        self.perlin.seed()
    }

    pub fn sample(&self, x: f64, y: f64, z: f64) -> f32 {
        self.perlin.get([x, y, z]) as f32
    }

    /// Noise remapped from `[-1, 1]` to `[0, 1]`.
    pub fn sample_unit(&self, x: f64, y: f64, z: f64) -> f32 {
        (self.sample(x, y, z) + 1.0) / 2.0
    }
}
