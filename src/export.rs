use std::fs::File;
use std::io::BufWriter;

use image::{ImageBuffer, Rgb, RgbImage};
use serde::Serialize;

use crate::ascii::feature_color;
use crate::error::Result;
use crate::features::FeatureFlags;
use crate::grid::WorldGrid;
use crate::seeds::WorldSeeds;
use crate::tilemap::Tilemap;
use crate::world::GeneratedWorld;

/// Export the feature map as a PNG, one pixel per cell (minimap view).
pub fn export_feature_map(features: &Tilemap<FeatureFlags>, path: &str) -> Result<()> {
    let mut img: RgbImage = ImageBuffer::new(features.width as u32, features.height as u32);

    for (x, y, &feature) in features.iter() {
        let (r, g, b) = feature_color(feature);
        img.put_pixel(x as u32, y as u32, Rgb([r, g, b]));
    }

    img.save(path)?;
    Ok(())
}

/// Export the banded heightmap using the spectral colormap.
pub fn export_heightmap(heightmap: &Tilemap<f32>, path: &str) -> Result<()> {
    let mut img: RgbImage = ImageBuffer::new(heightmap.width as u32, heightmap.height as u32);

    for (x, y, &band) in heightmap.iter() {
        let color = spectral_colormap((band / 4.0).clamp(0.0, 1.0));
        img.put_pixel(x as u32, y as u32, Rgb(color));
    }

    img.save(path)?;
    Ok(())
}

/// Spectral colormap (matplotlib style): dark blue -> cyan -> green -> yellow -> orange -> red
fn spectral_colormap(t: f32) -> [u8; 3] {
    let colors: [[f32; 3]; 11] = [
        [0.37, 0.31, 0.64],
        [0.20, 0.53, 0.74],
        [0.40, 0.76, 0.65],
        [0.67, 0.87, 0.64],
        [0.90, 0.96, 0.60],
        [1.00, 1.00, 0.75],
        [1.00, 0.88, 0.55],
        [0.99, 0.68, 0.38],
        [0.96, 0.43, 0.26],
        [0.84, 0.24, 0.31],
        [0.62, 0.00, 0.26],
    ];

    let t_scaled = t * 10.0;
    let idx = (t_scaled as usize).min(9);
    let frac = t_scaled - idx as f32;

    let c1 = colors[idx];
    let c2 = colors[idx + 1];

    [
        ((c1[0] + (c2[0] - c1[0]) * frac) * 255.0) as u8,
        ((c1[1] + (c2[1] - c1[1]) * frac) * 255.0) as u8,
        ((c1[2] + (c2[2] - c1[2]) * frac) * 255.0) as u8,
    ]
}

/// What a renderer needs to rebuild the map.
#[derive(Serialize)]
struct WorldExport<'a> {
    seeds: &'a WorldSeeds,
    grid: &'a WorldGrid,
    features: &'a Tilemap<FeatureFlags>,
}

/// Write the tile grid and feature map as JSON.
pub fn export_world_json(world: &GeneratedWorld, path: &str) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    let export = WorldExport {
        seeds: &world.seeds,
        grid: &world.grid,
        features: &world.features,
    };
    serde_json::to_writer(writer, &export)?;
    Ok(())
}
