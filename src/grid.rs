//! Layered tile volume produced by world generation.

use serde::{Deserialize, Serialize};

use crate::animation::AnimTable;
use crate::error::{Result, WorldError};

/// Index into the tile sheet.
pub type TileIndex = i32;

/// Marks an empty cell at a layer.
pub const NO_TILE: TileIndex = -1;

/// Per-cell render flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileFlags(pub u8);

impl TileFlags {
    pub const NONE: TileFlags = TileFlags(0b0000_0000);
    pub const ANIM: TileFlags = TileFlags(0b0000_0001);

    pub fn contains(self, other: TileFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: TileFlags) {
        self.0 |= other.0;
    }
}

/// `width x height x depth` tile indices, flattened as
/// `x + y * width + z * width * height`. Layer 0 is the base layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldGrid {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
    tiles: Vec<TileIndex>,
    flags: Vec<TileFlags>,
    /// Number of (cell, layer) slots holding a tile.
    pub valid_tile_count: usize,
}

impl WorldGrid {
    /// Allocate an empty grid. Fails instead of aborting when the volume cannot
    /// be allocated.
    pub fn new(width: usize, height: usize, depth: usize) -> Result<Self> {
        let alloc_error = || WorldError::Allocation {
            width,
            height,
            depth,
            cells: width.saturating_mul(height).saturating_mul(depth),
        };
        let cells = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(depth))
            .ok_or_else(alloc_error)?;

        let mut tiles = Vec::new();
        tiles.try_reserve_exact(cells).map_err(|_| alloc_error())?;
        tiles.resize(cells, NO_TILE);

        let mut flags = Vec::new();
        flags.try_reserve_exact(cells).map_err(|_| alloc_error())?;
        flags.resize(cells, TileFlags::NONE);

        Ok(Self {
            width,
            height,
            depth,
            tiles,
            flags,
            valid_tile_count: 0,
        })
    }

    /// Flat index of `(x, y, z)`, or `None` when out of bounds.
    pub fn index_of(&self, x: usize, y: usize, z: usize) -> Option<usize> {
        if x >= self.width || y >= self.height || z >= self.depth {
            return None;
        }
        Some(x + y * self.width + z * self.width * self.height)
    }

    /// Inverse of [`WorldGrid::index_of`].
    pub fn coords_of(&self, index: usize) -> Option<(usize, usize, usize)> {
        if index >= self.tiles.len() {
            return None;
        }
        let layer_size = self.width * self.height;
        let local = index % layer_size;
        Some((local % self.width, local / self.width, index / layer_size))
    }

    /// Tile at `(x, y, z)`; [`NO_TILE`] when empty or out of bounds.
    pub fn get(&self, x: usize, y: usize, z: usize) -> TileIndex {
        self.index_of(x, y, z).map_or(NO_TILE, |i| self.tiles[i])
    }

    /// Write a tile; out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, z: usize, tile: TileIndex) {
        if let Some(i) = self.index_of(x, y, z) {
            self.tiles[i] = tile;
        }
    }

    pub fn tile(&self, index: usize) -> TileIndex {
        self.tiles.get(index).copied().unwrap_or(NO_TILE)
    }

    pub fn flags(&self, index: usize) -> TileFlags {
        self.flags.get(index).copied().unwrap_or_default()
    }

    pub fn insert_flags(&mut self, index: usize, flags: TileFlags) {
        if let Some(f) = self.flags.get_mut(index) {
            f.insert(flags);
        }
    }

    pub fn tiles(&self) -> &[TileIndex] {
        &self.tiles
    }

    /// All tiles of one layer, row-major.
    pub fn layer(&self, z: usize) -> &[TileIndex] {
        if z >= self.depth {
            return &[];
        }
        let layer_size = self.width * self.height;
        &self.tiles[z * layer_size..(z + 1) * layer_size]
    }

    /// Top-most non-empty tile at `(x, y)` with its layer.
    pub fn top_tile(&self, x: usize, y: usize) -> Option<(usize, TileIndex)> {
        (0..self.depth)
            .rev()
            .map(|z| (z, self.get(x, y, z)))
            .find(|&(_, t)| t != NO_TILE)
    }

    /// Tile to draw at `index` for animation frame `frame`.
    pub fn display_tile(&self, index: usize, frame: usize, anim: &AnimTable) -> TileIndex {
        let tile = self.tile(index);
        if self.flags(index).contains(TileFlags::ANIM) {
            anim.frame(tile, frame)
        } else {
            tile
        }
    }

    /// Occupied slots, counted by scanning.
    pub fn count_tiles(&self) -> usize {
        self.tiles.iter().filter(|&&t| t != NO_TILE).count()
    }
}
