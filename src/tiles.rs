//! Tile resolution
//!
//! Converts the feature map into concrete tile indices, one layer per
//! feature:
//!
//! | layer | content                         |
//! |-------|---------------------------------|
//! | 0     | water (every cell)              |
//! | 1     | land                            |
//! | 2     | mountain tier 1, or forest      |
//! | 3     | mountain tier 2                 |
//! | 4     | mountain tier 3                 |
//!
//! A (category, bitmask) pair with no rule resolves to the palette's error
//! tile so that generation always completes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::features::FeatureFlags;
use crate::grid::{TileIndex, WorldGrid};
use crate::random::RandomSource;
use crate::terrain::TerrainRuleSet;
use crate::tilemap::Tilemap;

pub const LAND_CATEGORY: &str = "land";
pub const FOREST_CATEGORY: &str = "forest";
pub const MOUNTAIN_CATEGORY: &str = "mountain";

pub const WATER_LAYER: usize = 0;
pub const LAND_LAYER: usize = 1;
pub const FOREST_LAYER: usize = 2;
/// Layer of mountain tier 1; tiers 2 and 3 sit directly above.
pub const MOUNTAIN_BASE_LAYER: usize = 2;
pub const MIN_DEPTH: usize = 5;

/// A looked-up tile that stands for a set of interchangeable tiles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariantRule {
    pub sentinel: TileIndex,
    pub variants: Vec<TileIndex>,
}

/// Fixed tile indices used by the resolver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilePalette {
    pub water_tile: TileIndex,
    /// Substituted when the rule set has no entry for a bitmask.
    pub error_tile: TileIndex,
    pub grass: VariantRule,
    pub forest: VariantRule,
}

impl Default for TilePalette {
    fn default() -> Self {
        Self {
            water_tile: 801,
            error_tile: 1023,
            grass: VariantRule { sentinel: 0, variants: vec![0, 1, 2] },
            forest: VariantRule { sentinel: 321, variants: vec![321, 285, 325] },
        }
    }
}

/// Bookkeeping from one resolver run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolveStats {
    /// (cell, layer) writes performed.
    pub tiles_written: usize,
    /// Lookups that fell back to the error tile, per (category, bitmask).
    pub unresolved: BTreeMap<(String, u8), usize>,
}

impl ResolveStats {
    pub fn unresolved_total(&self) -> usize {
        self.unresolved.values().sum()
    }
}

/// Replace `tile` with a uniform pick from `rule.variants` when it is the
/// rule's sentinel.
pub fn substitute_uniform(tile: TileIndex, rule: &VariantRule, rng: &mut RandomSource) -> TileIndex {
    if tile != rule.sentinel {
        return tile;
    }
    rng.pick(&rule.variants).unwrap_or(tile)
}

struct Resolver<'a> {
    rules: &'a TerrainRuleSet,
    palette: &'a TilePalette,
    stats: ResolveStats,
}

impl Resolver<'_> {
    fn resolve(&mut self, category: &str, bitmask: u8) -> TileIndex {
        match self.rules.lookup(category, bitmask) {
            Some(tile) => tile,
            None => {
                log::debug!(
                    "No {} tile for bitmask {:#010b}, using error tile {}",
                    category, bitmask, self.palette.error_tile
                );
                *self
                    .stats
                    .unresolved
                    .entry((category.to_string(), bitmask))
                    .or_insert(0) += 1;
                self.palette.error_tile
            }
        }
    }
}

/// Predicate matching cells that carry every bit of `feature`.
fn has(feature: FeatureFlags) -> impl Fn(&FeatureFlags) -> bool {
    move |cell| cell.contains(feature)
}

/// Build the layered tile grid from a classified feature map.
///
/// `depth` is raised to [`MIN_DEPTH`] when smaller, since mountain tiers
/// need layers 2 to 4.
pub fn build_tiles(
    features: &Tilemap<FeatureFlags>,
    rules: &TerrainRuleSet,
    palette: &TilePalette,
    depth: usize,
    rng: &mut RandomSource,
) -> Result<(WorldGrid, ResolveStats)> {
    let mut grid = WorldGrid::new(features.width, features.height, depth.max(MIN_DEPTH))?;
    let mut resolver = Resolver { rules, palette, stats: ResolveStats::default() };
    let mut written = 0;

    for (x, y, &cell) in features.iter() {
        grid.set(x, y, WATER_LAYER, palette.water_tile);
        written += 1;

        if cell.contains(FeatureFlags::LAND) {
            let mask = features.bitmask(x, y, has(FeatureFlags::LAND));
            let tile = resolver.resolve(LAND_CATEGORY, mask);
            grid.set(x, y, LAND_LAYER, substitute_uniform(tile, &palette.grass, rng));
            written += 1;
        }

        if cell.contains(FeatureFlags::MOUNTAIN) {
            let m1 = features.bitmask(x, y, has(FeatureFlags::LEVEL1));
            let m2 = features.bitmask(x, y, has(FeatureFlags::LEVEL2));
            let m3 = features.bitmask(x, y, has(FeatureFlags::LEVEL3));

            // Higher tiers also count as neighbors for the rings below them.
            let tiers = [
                (FeatureFlags::LEVEL1, m1 | m2 | m3),
                (FeatureFlags::LEVEL2, m2 | m3),
                (FeatureFlags::LEVEL3, m3),
            ];
            for (layer, (tier, mask)) in (MOUNTAIN_BASE_LAYER..).zip(tiers) {
                if cell.contains(tier) {
                    grid.set(x, y, layer, resolver.resolve(MOUNTAIN_CATEGORY, mask));
                    written += 1;
                }
            }
        } else if cell.contains(FeatureFlags::FOREST) {
            let mask = features.bitmask(x, y, has(FeatureFlags::FOREST));
            let tile = resolver.resolve(FOREST_CATEGORY, mask);
            grid.set(x, y, FOREST_LAYER, substitute_uniform(tile, &palette.forest, rng));
            written += 1;
        }
    }

    grid.valid_tile_count = written;
    let mut stats = resolver.stats;
    stats.tiles_written = written;

    if !stats.unresolved.is_empty() {
        log::warn!(
            "{} tiles fell back to the error tile ({} distinct bitmasks)",
            stats.unresolved_total(),
            stats.unresolved.len()
        );
    }

    Ok((grid, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::NO_TILE;

    fn feature_map(width: usize, height: usize, cells: &[FeatureFlags]) -> Tilemap<FeatureFlags> {
        Tilemap::from_vec(width, height, cells.to_vec()).unwrap()
    }

    #[test]
    fn test_substitute_uniform() {
        let mut rng = RandomSource::from_seed(1);
        let rule = VariantRule { sentinel: 321, variants: vec![321, 285, 325] };

        assert_eq!(substitute_uniform(17, &rule, &mut rng), 17);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            let tile = substitute_uniform(321, &rule, &mut rng);
            assert!(rule.variants.contains(&tile));
            seen.insert(tile);
        }
        assert_eq!(seen.len(), 3);

        let empty = VariantRule { sentinel: 5, variants: vec![] };
        assert_eq!(substitute_uniform(5, &empty, &mut rng), 5);
    }

    #[test]
    fn test_water_only_map() {
        let features = feature_map(2, 2, &[FeatureFlags::WATER; 4]);
        let mut rng = RandomSource::from_seed(0);
        let (grid, stats) =
            build_tiles(&features, &TerrainRuleSet::new(), &TilePalette::default(), 5, &mut rng).unwrap();

        assert_eq!(grid.layer(0), &[801; 4]);
        assert!(grid.layer(1).iter().all(|&t| t == NO_TILE));
        assert_eq!(grid.valid_tile_count, 4);
        assert_eq!(stats.tiles_written, grid.count_tiles());
        assert!(stats.unresolved.is_empty());
    }

    #[test]
    fn test_missing_rule_uses_error_tile() {
        let mut cells = [FeatureFlags::WATER; 9];
        cells[4] = FeatureFlags::LAND;
        let features = feature_map(3, 3, &cells);
        let palette = TilePalette::default();
        let mut rng = RandomSource::from_seed(0);

        let (grid, stats) = build_tiles(&features, &TerrainRuleSet::new(), &palette, 5, &mut rng).unwrap();

        assert_eq!(grid.get(1, 1, LAND_LAYER), palette.error_tile);
        assert_eq!(stats.unresolved.get(&(LAND_CATEGORY.to_string(), 0)), Some(&1));
        assert_eq!(grid.valid_tile_count, 10);
    }

    #[test]
    fn test_mountain_tiers_stack() {
        // 5x5 block of land with a tier-3 peak in the middle ringed by tier 1.
        let mut cells = vec![FeatureFlags::LAND; 25];
        for y in 1..4 {
            for x in 1..4 {
                cells[y * 5 + x] = FeatureFlags::LEVEL1;
            }
        }
        cells[12] = FeatureFlags::LEVEL3;
        let features = feature_map(5, 5, &cells);

        let rules = TerrainRuleSet::parse(
            "mountain 40 N S E W NE NW SE SW\n\
             mountain 41 0\n",
        );
        let mut rng = RandomSource::from_seed(0);
        let (grid, _) = build_tiles(&features, &rules, &TilePalette::default(), 5, &mut rng).unwrap();

        // Center: tier 1 is fully surrounded, tiers 2 and 3 are isolated.
        assert_eq!(grid.get(2, 2, 2), 40);
        assert_eq!(grid.get(2, 2, 3), 41);
        assert_eq!(grid.get(2, 2, 4), 41);
        // Ring cell only carries tier 1.
        assert_eq!(grid.get(1, 1, 3), NO_TILE);
        assert_ne!(grid.get(1, 1, 2), NO_TILE);
        // Everything has water and land underneath.
        assert_eq!(grid.get(2, 2, 0), 801);
        assert_ne!(grid.get(2, 2, 1), NO_TILE);
        assert_eq!(grid.valid_tile_count, grid.count_tiles());
    }

    #[test]
    fn test_forest_variants() {
        let mut cells = vec![FeatureFlags::LAND; 9];
        cells[4] = FeatureFlags::FOREST;
        let features = feature_map(3, 3, &cells);
        let rules = TerrainRuleSet::parse("forest 321 0\n");
        let palette = TilePalette::default();

        let mut rng = RandomSource::from_seed(4);
        let (grid, _) = build_tiles(&features, &rules, &palette, 5, &mut rng).unwrap();
        assert!(palette.forest.variants.contains(&grid.get(1, 1, FOREST_LAYER)));
        assert_eq!(grid.get(0, 0, FOREST_LAYER), NO_TILE);
    }

    #[test]
    fn test_two_rule_land_file_on_4x4() {
        let rules = TerrainRuleSet::parse("land 0 0\nland 1 N S E W NE NW SE SW\n");
        let palette = TilePalette::default();
        let features = feature_map(4, 4, &[FeatureFlags::LAND; 16]);
        let mut rng = RandomSource::from_seed(8008135);

        let (grid, stats) = build_tiles(&features, &rules, &palette, 5, &mut rng).unwrap();

        for (x, y, _) in features.iter() {
            let tile = grid.get(x, y, LAND_LAYER);
            if (1..=2).contains(&x) && (1..=2).contains(&y) {
                assert_eq!(tile, 1, "interior ({}, {})", x, y);
            } else {
                assert_eq!(tile, palette.error_tile, "edge ({}, {})", x, y);
            }
            assert_eq!(grid.get(x, y, WATER_LAYER), palette.water_tile);
        }
        assert_eq!(stats.unresolved_total(), 12);
        assert_eq!(grid.valid_tile_count, 32);

        // An isolated land cell hits the `land 0 0` rule and gets a grass variant.
        let mut cells = [FeatureFlags::WATER; 16];
        cells[5] = FeatureFlags::LAND;
        let features = feature_map(4, 4, &cells);
        let (grid, stats) = build_tiles(&features, &rules, &palette, 5, &mut rng).unwrap();
        assert!(palette.grass.variants.contains(&grid.get(1, 1, LAND_LAYER)));
        assert!(stats.unresolved.is_empty());
    }

    #[test]
    fn test_depth_is_raised_to_minimum() {
        let features = feature_map(1, 1, &[FeatureFlags::WATER]);
        let mut rng = RandomSource::from_seed(0);
        let (grid, _) =
            build_tiles(&features, &TerrainRuleSet::new(), &TilePalette::default(), 1, &mut rng).unwrap();
        assert_eq!(grid.depth, MIN_DEPTH);
    }
}
