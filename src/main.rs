use std::error::Error;

use clap::Parser;
use rayon::prelude::*;

use kingdom_worldgen::animation::AnimTable;
use kingdom_worldgen::ascii;
use kingdom_worldgen::config::WorldGenConfig;
use kingdom_worldgen::export;
use kingdom_worldgen::seeds::WorldSeeds;
use kingdom_worldgen::terrain::TerrainRuleSet;
use kingdom_worldgen::world::generate_world_seeded;

#[derive(Parser, Debug)]
#[command(name = "kingdom_worldgen")]
#[command(about = "Generate autotiled kingdom maps from a seed and a terrain rule file")]
struct Args {
    /// Terrain rule file
    #[arg(short, long, default_value = "data/kingdom.terrain")]
    rules: String,

    /// Width of the map in tiles
    #[arg(short = 'W', long, default_value = "128")]
    width: usize,

    /// Height of the map in tiles
    #[arg(short = 'H', long, default_value = "128")]
    height: usize,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u32>,

    /// Override the grass/forest variation seed, keeping the landmass of --seed
    #[arg(long)]
    variation_seed: Option<u64>,

    /// JSON file overriding generation parameters
    #[arg(long)]
    config: Option<String>,

    /// Print the feature map as colored ASCII
    #[arg(long)]
    ascii: bool,

    /// Write all ASCII views to a text file
    #[arg(long)]
    export_ascii: Option<String>,

    /// Export the feature map to PNG
    #[arg(long)]
    export_features: Option<String>,

    /// Export the banded heightmap to PNG
    #[arg(long)]
    export_heightmap: Option<String>,

    /// Export tile grid and feature map to JSON
    #[arg(long)]
    export_json: Option<String>,

    /// Generate this many consecutive seeds in parallel and print a summary
    #[arg(long)]
    batch: Option<u32>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(rand::random);
    let config = match &args.config {
        Some(path) => WorldGenConfig::load(path)?,
        None => WorldGenConfig::default(),
    };
    let rules = TerrainRuleSet::load(&args.rules)?;
    let anim = AnimTable::standard();
    let seeds_for = |master: u32| {
        let seeds = WorldSeeds::from_master(master);
        match args.variation_seed {
            Some(variation) => seeds.with_variation(variation),
            None => seeds,
        }
    };

    println!("Loaded {} terrain rules from {}", rules.len(), args.rules);
    println!("Map size: {}x{}", args.width, args.height);

    if let Some(count) = args.batch {
        println!("Generating {} worlds starting at seed {}...", count, seed);
        let summaries = (0..count)
            .into_par_iter()
            .map(|i| {
                let s = seed.wrapping_add(i);
                generate_world_seeded(&rules, &anim, &config, seeds_for(s), args.width, args.height).map(|world| {
                    let (water, land, forest, mountain) = world.feature_counts();
                    format!(
                        "seed {:>10}: water {:>6}  land {:>6}  forest {:>6}  mountain {:>6}  tiles {:>7}  fallbacks {}",
                        s, water, land, forest, mountain,
                        world.grid.valid_tile_count,
                        world.stats.unresolved_total()
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        for line in summaries {
            println!("{}", line);
        }
        return Ok(());
    }

    let seeds = seeds_for(seed);
    println!("Generating world with {}", seeds);
    let world = generate_world_seeded(&rules, &anim, &config, seeds, args.width, args.height)?;

    let (water, land, forest, mountain) = world.feature_counts();
    let total = (args.width * args.height).max(1) as f64;
    println!(
        "Features: {:.1}% water, {:.1}% land, {:.1}% forest, {:.1}% mountain",
        100.0 * water as f64 / total,
        100.0 * land as f64 / total,
        100.0 * forest as f64 / total,
        100.0 * mountain as f64 / total,
    );
    println!("Placed {} tiles across {} layers", world.grid.valid_tile_count, world.grid.depth);
    if !world.stats.unresolved.is_empty() {
        println!(
            "{} tiles used the error tile (run debug_autotile for the missing rules)",
            world.stats.unresolved_total()
        );
    }

    if args.ascii {
        print!("{}", ascii::render_colored_feature_map(&world));
        println!("{}", ascii::feature_legend());
    }

    if let Some(path) = &args.export_ascii {
        ascii::export_world_file(&world, path)?;
        println!("Wrote ASCII views to {}", path);
    }

    if let Some(path) = &args.export_features {
        export::export_feature_map(&world.features, path)?;
        println!("Wrote feature map to {}", path);
    }

    if let Some(path) = &args.export_heightmap {
        export::export_heightmap(&world.heightmap, path)?;
        println!("Wrote heightmap to {}", path);
    }

    if let Some(path) = &args.export_json {
        export::export_world_json(&world, path)?;
        println!("Wrote world data to {}", path);
    }

    Ok(())
}
