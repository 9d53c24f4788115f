//! World generation pipeline
//!
//! seed → heightmap → feature map → tile grid → animation flags.

use std::path::Path;

use crate::animation::{tag_animations, AnimTable};
use crate::config::WorldGenConfig;
use crate::error::Result;
use crate::features::{classify_features, FeatureFlags};
use crate::grid::WorldGrid;
use crate::heightmap::generate_heightmap;
use crate::random::RandomSource;
use crate::seeds::WorldSeeds;
use crate::terrain::TerrainRuleSet;
use crate::tiles::{build_tiles, ResolveStats};
use crate::tilemap::Tilemap;

/// All generated world data bundled together
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedWorld {
    /// Seeds used for generation (allows recreation)
    pub seeds: WorldSeeds,
    /// Band-quantized elevation (0.0 to 4.0)
    pub heightmap: Tilemap<f32>,
    /// Raw feature classification, kept for minimap-style consumers
    pub features: Tilemap<FeatureFlags>,
    /// Resolved tile layers with animation flags
    pub grid: WorldGrid,
    pub stats: ResolveStats,
}

impl GeneratedWorld {
    pub fn width(&self) -> usize {
        self.grid.width
    }

    pub fn height(&self) -> usize {
        self.grid.height
    }

    /// Feature counts: (water, land, forest, mountain).
    pub fn feature_counts(&self) -> (usize, usize, usize, usize) {
        let mut counts = (0, 0, 0, 0);
        for (_, _, &f) in self.features.iter() {
            if f.is_water() {
                counts.0 += 1;
            } else if f.contains(FeatureFlags::MOUNTAIN) {
                counts.3 += 1;
            } else if f.contains(FeatureFlags::FOREST) {
                counts.2 += 1;
            } else {
                counts.1 += 1;
            }
        }
        counts
    }
}

/// Generate a world from a rule file with default settings.
pub fn generate_world(
    rule_set_path: impl AsRef<Path>,
    seed: u32,
    width: usize,
    height: usize,
) -> Result<GeneratedWorld> {
    let rules = TerrainRuleSet::load(rule_set_path)?;
    generate_world_with(&rules, &AnimTable::standard(), &WorldGenConfig::default(), seed, width, height)
}

/// Generate a world from an already loaded rule set.
pub fn generate_world_with(
    rules: &TerrainRuleSet,
    anim: &AnimTable,
    config: &WorldGenConfig,
    seed: u32,
    width: usize,
    height: usize,
) -> Result<GeneratedWorld> {
    generate_world_seeded(rules, anim, config, WorldSeeds::from_master(seed), width, height)
}

/// Generate a world with explicit per-system seeds.
pub fn generate_world_seeded(
    rules: &TerrainRuleSet,
    anim: &AnimTable,
    config: &WorldGenConfig,
    seeds: WorldSeeds,
    width: usize,
    height: usize,
) -> Result<GeneratedWorld> {
    log::info!("Generating {}x{} world with seed {}", width, height, seeds.master);

    let heightmap = generate_heightmap(seeds.terrain, width, height, &config.heightmap);
    let features = classify_features(seeds.terrain, &heightmap, &config.features);

    let mut rng = RandomSource::from_seed(seeds.variation);
    let (mut grid, stats) = build_tiles(&features, rules, &config.palette, config.depth, &mut rng)?;

    let animated = tag_animations(&mut grid, anim);
    log::info!(
        "World complete: {} tiles placed, {} animated, {} fallbacks",
        grid.valid_tile_count,
        animated,
        stats.unresolved_total()
    );

    Ok(GeneratedWorld { seeds, heightmap, features, grid, stats })
}
