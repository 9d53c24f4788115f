//! Configuration for world generation.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::features::FeatureParams;
use crate::heightmap::HeightmapParams;
use crate::tiles::{TilePalette, MIN_DEPTH};

/// All tunables of the generation pipeline. Missing fields in a config file
/// fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldGenConfig {
    /// Number of tile layers (at least 5).
    pub depth: usize,

    pub heightmap: HeightmapParams,

    pub features: FeatureParams,

    pub palette: TilePalette,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            depth: MIN_DEPTH,
            heightmap: HeightmapParams::default(),
            features: FeatureParams::default(),
            palette: TilePalette::default(),
        }
    }
}

impl WorldGenConfig {
    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
