//! Feature classification
//!
//! Turns the banded heightmap into per-cell feature bits (land, borders,
//! forest, mountain tiers). Each pass reads the result of the previous one,
//! so the order below is significant.

use std::ops::{BitAnd, BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use crate::bitmask::FULLY_SURROUNDED;
use crate::heightmap::ElevationBand;
use crate::noise_source::NoiseSource;
use crate::tilemap::Tilemap;

/// Per-cell feature bitfield.
///
/// Mountain tiers are composites: `LEVEL3` contains the `LEVEL2`, `LEVEL1`,
/// `MOUNTAIN` and `LAND` bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureFlags(pub u8);

impl FeatureFlags {
    pub const WATER: FeatureFlags = FeatureFlags(0);
    pub const LAND: FeatureFlags = FeatureFlags(0b0000_0001);
    /// Land cell with a non-land 8-neighbor.
    pub const LAND_BORDER: FeatureFlags = FeatureFlags(0b0000_0010);
    pub const FOREST: FeatureFlags = FeatureFlags(0b0000_0100 | Self::LAND.0);
    pub const MOUNTAIN: FeatureFlags = FeatureFlags(0b0000_1000 | Self::LAND.0);
    pub const LEVEL1: FeatureFlags = FeatureFlags(0b0001_0000 | Self::MOUNTAIN.0);
    pub const LEVEL2: FeatureFlags = FeatureFlags(0b0010_0000 | Self::LEVEL1.0);
    pub const LEVEL3: FeatureFlags = FeatureFlags(0b0100_0000 | Self::LEVEL2.0);
    /// Mountain cell with a non-mountain 8-neighbor.
    pub const MOUNTAIN_BORDER: FeatureFlags = FeatureFlags(0b1000_0000);

    /// True when every bit of `other` is set.
    pub fn contains(self, other: FeatureFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_water(self) -> bool {
        !self.contains(Self::LAND)
    }

    /// Highest mountain tier present (0 when not a mountain).
    pub fn mountain_tier(self) -> u8 {
        if self.contains(Self::LEVEL3) {
            3
        } else if self.contains(Self::LEVEL2) {
            2
        } else if self.contains(Self::LEVEL1) {
            1
        } else {
            0
        }
    }

    /// Composite flag for a mountain tier (1..=3).
    pub fn for_tier(tier: u8) -> Option<FeatureFlags> {
        match tier {
            1 => Some(Self::LEVEL1),
            2 => Some(Self::LEVEL2),
            3 => Some(Self::LEVEL3),
            _ => None,
        }
    }
}

impl BitOr for FeatureFlags {
    type Output = FeatureFlags;

    fn bitor(self, rhs: FeatureFlags) -> FeatureFlags {
        FeatureFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for FeatureFlags {
    fn bitor_assign(&mut self, rhs: FeatureFlags) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for FeatureFlags {
    type Output = FeatureFlags;

    fn bitand(self, rhs: FeatureFlags) -> FeatureFlags {
        FeatureFlags(self.0 & rhs.0)
    }
}

/// One noise channel used for forest placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForestChannel {
    pub frequency: f64,
    pub z_offset: f64,
    pub threshold: f32,
}

/// Parameters for feature classification
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureParams {
    /// A plain land cell becomes forest when any channel reaches its threshold
    pub forest_channels: Vec<ForestChannel>,
}

impl Default for FeatureParams {
    fn default() -> Self {
        Self {
            forest_channels: vec![
                // Large groves
                ForestChannel { frequency: 0.5, z_offset: 0.0, threshold: 0.6 },
                // Scattered copses
                ForestChannel { frequency: 200.0, z_offset: 2.0, threshold: 0.5 },
            ],
        }
    }
}

/// Classify a banded heightmap into feature bits.
pub fn classify_features(
    seed: u32,
    heightmap: &Tilemap<f32>,
    params: &FeatureParams,
) -> Tilemap<FeatureFlags> {
    let mut features = seed_landmass(heightmap);
    mark_borders(&mut features, FeatureFlags::LAND, FeatureFlags::LAND_BORDER);
    place_mountains(&mut features, heightmap);
    mark_borders(&mut features, FeatureFlags::MOUNTAIN, FeatureFlags::MOUNTAIN_BORDER);
    place_forests(&mut features, &NoiseSource::new(seed), params);
    features
}

/// Band 0 is water, everything else starts as plain land.
fn seed_landmass(heightmap: &Tilemap<f32>) -> Tilemap<FeatureFlags> {
    let cells = heightmap
        .as_slice()
        .iter()
        .map(|&h| match ElevationBand::from_value(h) {
            ElevationBand::Water => FeatureFlags::WATER,
            _ => FeatureFlags::LAND,
        })
        .collect();
    Tilemap::from_vec(heightmap.width, heightmap.height, cells).unwrap_or_else(|| Tilemap::new(0, 0))
}

/// Flag cells carrying `feature` that are not fully surrounded by it.
fn mark_borders(features: &mut Tilemap<FeatureFlags>, feature: FeatureFlags, border: FeatureFlags) {
    let borders: Vec<usize> = features
        .iter()
        .filter(|(_, _, f)| f.contains(feature))
        .filter(|&(x, y, _)| features.bitmask(x, y, |n| n.contains(feature)) != FULLY_SURROUNDED)
        .map(|(x, y, _)| features.index_of(x, y))
        .collect();

    let cells = features.as_mut_slice();
    for i in borders {
        cells[i] |= border;
    }
}

/// Interior bands 2-4 become nested mountain tiers. Bordered cells stay plain land.
fn place_mountains(features: &mut Tilemap<FeatureFlags>, heightmap: &Tilemap<f32>) {
    let bands = heightmap.as_slice();
    for (i, cell) in features.as_mut_slice().iter_mut().enumerate() {
        if cell.contains(FeatureFlags::LAND_BORDER) {
            continue;
        }
        let tier = match ElevationBand::from_value(bands[i]) {
            ElevationBand::Foothill => FeatureFlags::LEVEL1,
            ElevationBand::Highland => FeatureFlags::LEVEL2,
            ElevationBand::Peak => FeatureFlags::LEVEL3,
            _ => continue,
        };
        *cell = tier;
    }
}

fn place_forests(features: &mut Tilemap<FeatureFlags>, noise: &NoiseSource, params: &FeatureParams) {
    let width = features.width as f64;
    let height = features.height as f64;

    for (x, y, cell) in features.iter_mut() {
        if *cell != FeatureFlags::LAND {
            continue;
        }

        let xf = x as f64 / width;
        let yf = y as f64 / height;

        let wooded = params.forest_channels.iter().any(|c| {
            noise.sample_unit(c.frequency * xf, c.frequency * yf, c.z_offset) >= c.threshold
        });
        if wooded {
            *cell = FeatureFlags::FOREST;
        }
    }
}
