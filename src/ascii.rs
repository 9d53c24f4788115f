//! ASCII rendering and export module for generated worlds
//!
//! Provides text previews of the feature map, elevation bands and layer
//! stacking for terminals and log files.

use std::fs::File;
use std::io::{self, Write};

use crate::features::FeatureFlags;
use crate::world::GeneratedWorld;

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AsciiMode {
    /// Show feature characters
    Features,
    /// Show elevation bands
    Height,
    /// Show the top-most occupied tile layer
    Layers,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Features => "Features",
            AsciiMode::Height => "Height",
            AsciiMode::Layers => "Layers",
        }
    }

    pub fn all() -> &'static [AsciiMode] {
        &[AsciiMode::Features, AsciiMode::Height, AsciiMode::Layers]
    }
}

/// Get ASCII character for a feature cell. Mountain rims are lowercase.
pub fn feature_char(feature: FeatureFlags) -> char {
    let mountain = match feature.mountain_tier() {
        3 => Some('A'),
        2 => Some('M'),
        1 => Some('N'),
        _ => None,
    };
    if let Some(ch) = mountain {
        return if feature.contains(FeatureFlags::MOUNTAIN_BORDER) {
            ch.to_ascii_lowercase()
        } else {
            ch
        };
    }
    if feature.is_water() {
        '~'
    } else if feature.contains(FeatureFlags::FOREST) {
        'T'
    } else if feature.contains(FeatureFlags::LAND_BORDER) {
        ','
    } else {
        '.'
    }
}

/// Get ASCII character for an elevation band (0.0 to 4.0)
pub fn height_char(band: f32) -> char {
    const CHARS: &[char] = &['~', '.', '-', '+', '^'];
    let idx = band.clamp(0.0, 4.0) as usize;
    CHARS[idx.min(CHARS.len() - 1)]
}

/// RGB color for a feature cell, shared with the PNG export.
pub fn feature_color(feature: FeatureFlags) -> (u8, u8, u8) {
    let mountain = match feature.mountain_tier() {
        3 => Some((235, 235, 240)),
        2 => Some((150, 140, 130)),
        1 => Some((115, 100, 80)),
        _ => None,
    };
    if let Some(color) = mountain {
        return if feature.contains(FeatureFlags::MOUNTAIN_BORDER) {
            shade(color, 0.8)
        } else {
            color
        };
    }
    if feature.is_water() {
        (40, 90, 170)
    } else if feature.contains(FeatureFlags::FOREST) {
        (30, 100, 40)
    } else if feature.contains(FeatureFlags::LAND_BORDER) {
        (210, 195, 130)
    } else {
        (90, 160, 70)
    }
}

fn shade((r, g, b): (u8, u8, u8), factor: f32) -> (u8, u8, u8) {
    let scale = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
    (scale(r), scale(g), scale(b))
}

pub fn render_ascii_map(world: &GeneratedWorld, mode: AsciiMode) -> String {
    let width = world.features.width;
    let height = world.features.height;
    let mut result = String::with_capacity((width + 1) * height);

    for y in 0..height {
        for x in 0..width {
            let ch = match mode {
                AsciiMode::Features => feature_char(*world.features.get(x, y)),
                AsciiMode::Height => height_char(*world.heightmap.get(x, y)),
                AsciiMode::Layers => world
                    .grid
                    .top_tile(x, y)
                    .and_then(|(z, _)| char::from_digit(z as u32, 10))
                    .unwrap_or(' '),
            };
            result.push(ch);
        }
        result.push('\n');
    }

    result
}

pub fn feature_legend() -> String {
    "~ water  . land  , coast  T forest  N hills  M mountains  A peaks  (lowercase: mountain rim)".to_string()
}

pub fn ansi_colored_char(ch: char, fg: (u8, u8, u8), bg: (u8, u8, u8)) -> String {
    format!(
        "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m{}\x1b[0m",
        fg.0, fg.1, fg.2,
        bg.0, bg.1, bg.2,
        ch
    )
}

/// Feature map with 24-bit terminal colors.
pub fn render_colored_feature_map(world: &GeneratedWorld) -> String {
    let mut result = String::new();
    for y in 0..world.features.height {
        for x in 0..world.features.width {
            let feature = *world.features.get(x, y);
            result.push_str(&ansi_colored_char(feature_char(feature), (0, 0, 0), feature_color(feature)));
        }
        result.push('\n');
    }
    result
}

/// Write all ASCII views of a world to a text file.
pub fn export_world_file(world: &GeneratedWorld, path: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    let (water, land, forest, mountain) = world.feature_counts();

    writeln!(file, "=== WORLD {}x{} seed={} ===", world.width(), world.height(), world.seeds.master)?;
    writeln!(
        file,
        "water: {}  land: {}  forest: {}  mountain: {}  tiles: {}",
        water, land, forest, mountain, world.grid.valid_tile_count
    )?;
    writeln!(file, "{}", feature_legend())?;

    for &mode in AsciiMode::all() {
        writeln!(file)?;
        writeln!(file, "--- {} ---", mode.name())?;
        write!(file, "{}", render_ascii_map(world, mode))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimTable;
    use crate::config::WorldGenConfig;
    use crate::terrain::TerrainRuleSet;
    use crate::world::generate_world_with;

    #[test]
    fn test_feature_chars() {
        assert_eq!(feature_char(FeatureFlags::WATER), '~');
        assert_eq!(feature_char(FeatureFlags::LAND), '.');
        assert_eq!(feature_char(FeatureFlags::LAND | FeatureFlags::LAND_BORDER), ',');
        assert_eq!(feature_char(FeatureFlags::FOREST), 'T');
        assert_eq!(feature_char(FeatureFlags::LEVEL1), 'N');
        assert_eq!(feature_char(FeatureFlags::LEVEL1 | FeatureFlags::MOUNTAIN_BORDER), 'n');
        assert_eq!(feature_char(FeatureFlags::LEVEL3), 'A');
        assert_eq!(feature_char(FeatureFlags::LEVEL3 | FeatureFlags::MOUNTAIN_BORDER), 'a');
        assert_eq!(height_char(4.0), '^');
    }

    #[test]
    fn test_mountain_rim_is_shaded() {
        let interior = feature_color(FeatureFlags::LEVEL2);
        let rim = feature_color(FeatureFlags::LEVEL2 | FeatureFlags::MOUNTAIN_BORDER);
        assert_eq!(interior, (150, 140, 130));
        assert_eq!(rim, (120, 112, 104));
        // The rim bit only matters on mountains.
        assert_eq!(feature_color(FeatureFlags::MOUNTAIN_BORDER), feature_color(FeatureFlags::WATER));
    }

    #[test]
    fn test_render_dimensions() {
        let world = generate_world_with(
            &TerrainRuleSet::new(),
            &AnimTable::standard(),
            &WorldGenConfig::default(),
            3,
            12,
            7,
        )
        .unwrap();

        for &mode in AsciiMode::all() {
            let text = render_ascii_map(&world, mode);
            let lines: Vec<&str> = text.lines().collect();
            assert_eq!(lines.len(), 7);
            assert!(lines.iter().all(|l| l.chars().count() == 12));
        }
    }
}
