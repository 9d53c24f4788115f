//! Tile-based world generation library
//!
//! Builds a layered autotiled map from a seed and a `.terrain` rule file.
//! Re-exports modules for use by binaries and tools.

pub mod animation;
pub mod ascii;
pub mod bitmask;
pub mod config;
pub mod error;
pub mod export;
pub mod features;
pub mod grid;
pub mod heightmap;
pub mod noise_source;
pub mod random;
pub mod seeds;
pub mod terrain;
pub mod tilemap;
pub mod tiles;
pub mod world;

pub use error::{Result, WorldError};
pub use world::{generate_world, generate_world_with, GeneratedWorld};
