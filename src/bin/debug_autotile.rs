//! Debug tool for checking rule-file coverage
//! Generates worlds for a handful of seeds and lists every (category, bitmask)
//! that fell back to the error tile, with the rule line that would fix it.

use std::collections::BTreeMap;
use std::env;
use std::error::Error;

use kingdom_worldgen::animation::AnimTable;
use kingdom_worldgen::ascii::{render_ascii_map, AsciiMode};
use kingdom_worldgen::bitmask::mask_tokens;
use kingdom_worldgen::config::WorldGenConfig;
use kingdom_worldgen::terrain::TerrainRuleSet;
use kingdom_worldgen::world::generate_world_with;

const WIDTH: usize = 96;
const HEIGHT: usize = 64;
const SEEDS: [u32; 4] = [8008135, 42, 1337, 90210];

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let path = env::args().nth(1).unwrap_or_else(|| "data/kingdom.terrain".to_string());
    let rules = TerrainRuleSet::load(&path)?;
    let anim = AnimTable::standard();
    let config = WorldGenConfig::default();

    println!("Rule file: {} ({} rules, categories: {})", path, rules.len(), rules.categories().join(", "));

    let mut missing: BTreeMap<(String, u8), usize> = BTreeMap::new();
    for seed in SEEDS {
        let world = generate_world_with(&rules, &anim, &config, seed, WIDTH, HEIGHT)?;
        println!(
            "seed {:>8}: {} tiles, {} fallbacks",
            seed,
            world.grid.valid_tile_count,
            world.stats.unresolved_total()
        );
        for (key, count) in &world.stats.unresolved {
            *missing.entry(key.clone()).or_insert(0) += count;
        }
        if seed == SEEDS[0] {
            print!("{}", render_ascii_map(&world, AsciiMode::Features));
        }
    }

    if missing.is_empty() {
        println!("All bitmasks resolved.");
        return Ok(());
    }

    println!();
    println!("Missing rules (category, mask, hits):");
    for ((category, mask), count) in &missing {
        println!("  {} ? {:<24} # {:#010b}, {} hits", category, mask_tokens(*mask), mask, count);
    }

    Ok(())
}
