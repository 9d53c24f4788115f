use serde::{Deserialize, Serialize};

use crate::noise_source::NoiseSource;
use crate::tilemap::Tilemap;

// =============================================================================
// TERRAIN PARAMETERS
// =============================================================================

/// Parameters for heightmap generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightmapParams {
    /// Frequency multiples of the normalized [0,1] coordinates, one per octave
    pub octave_frequencies: Vec<f64>,
    /// Gain applied to every octave before averaging
    pub octave_gain: f32,
    /// Upper bounds (inclusive) of bands 0..=3; anything above is band 4
    pub band_thresholds: [f32; 4],
}

impl Default for HeightmapParams {
    fn default() -> Self {
        Self {
            octave_frequencies: vec![1.0, 5.0, 10.0, 20.0],
            octave_gain: 1.3,
            band_thresholds: [0.40, 0.55, 0.60, 0.65],
        }
    }
}

// =============================================================================
// ELEVATION BANDS
// =============================================================================

/// Discrete elevation band. The heightmap stores the band number as a float.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElevationBand {
    Water = 0,
    Lowland = 1,
    Foothill = 2,
    Highland = 3,
    Peak = 4,
}

impl ElevationBand {
    pub fn from_value(value: f32) -> ElevationBand {
        if value >= 4.0 {
            ElevationBand::Peak
        } else if value >= 3.0 {
            ElevationBand::Highland
        } else if value >= 2.0 {
            ElevationBand::Foothill
        } else if value >= 1.0 {
            ElevationBand::Lowland
        } else {
            ElevationBand::Water
        }
    }

    pub fn value(self) -> f32 {
        self as u8 as f32
    }

    /// Band of a raw [0,1] elevation.
    pub fn classify(elevation: f32, thresholds: &[f32; 4]) -> ElevationBand {
        if elevation <= thresholds[0] {
            ElevationBand::Water
        } else if elevation <= thresholds[1] {
            ElevationBand::Lowland
        } else if elevation <= thresholds[2] {
            ElevationBand::Foothill
        } else if elevation <= thresholds[3] {
            ElevationBand::Highland
        } else {
            ElevationBand::Peak
        }
    }
}

// =============================================================================
// MAIN HEIGHTMAP GENERATION
// =============================================================================

/// Generate the band-quantized heightmap:
/// 1. Radial falloff towards the map edges
/// 2. Averaged multi-octave noise scaled by the falloff
/// 3. Clamp to [0,1]
/// 4. Quantize into 5 bands
pub fn generate_heightmap(
    seed: u32,
    width: usize,
    height: usize,
    params: &HeightmapParams,
) -> Tilemap<f32> {
    let noise = NoiseSource::new(seed);
    let mut heightmap = generate_elevation(&noise, width, height, params);
    quantize_bands(&mut heightmap, &params.band_thresholds);
    heightmap
}

/// Raw elevation in [0,1] before quantization.
pub fn generate_elevation(
    noise: &NoiseSource,
    width: usize,
    height: usize,
    params: &HeightmapParams,
) -> Tilemap<f32> {
    if width == 0 || height == 0 {
        return Tilemap::new_with(0, 0, 0.0);
    }

    let falloff = radial_falloff(width, height);
    let mut heightmap = Tilemap::new_with(width, height, 0.0f32);
    let octaves = params.octave_frequencies.len().max(1) as f32;

    for (x, y, value) in heightmap.iter_mut() {
        // Normalize coordinates for noise sampling
        let nx = x as f64 / width as f64;
        let ny = y as f64 / height as f64;

        let sum: f32 = params
            .octave_frequencies
            .iter()
            .map(|&f| params.octave_gain * noise.sample_unit(f * nx, f * ny, 0.0))
            .sum();

        let elevation = *falloff.get(x, y) * (sum / octaves);
        *value = elevation.clamp(0.0, 1.0);
    }

    heightmap
}

/// Circular landmass bias: 1 at the center, 0 at the corners.
pub fn radial_falloff(width: usize, height: usize) -> Tilemap<f32> {
    let center_x = (width / 2) as f32;
    let center_y = (height / 2) as f32;
    let max_distance = distance(0.0, 0.0, center_x, center_y);

    let mut falloff = Tilemap::new_with(width, height, 1.0f32);
    if max_distance == 0.0 {
        return falloff;
    }

    for (x, y, value) in falloff.iter_mut() {
        *value = 1.0 - distance(x as f32, y as f32, center_x, center_y) / max_distance;
    }
    falloff
}

/// Replace raw elevations with their band numbers.
pub fn quantize_bands(heightmap: &mut Tilemap<f32>, thresholds: &[f32; 4]) {
    for (_, _, value) in heightmap.iter_mut() {
        *value = ElevationBand::classify(*value, thresholds).value();
    }
}

fn distance(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    ((x2 - x1) * (x2 - x1) + (y2 - y1) * (y2 - y1)).sqrt()
}
