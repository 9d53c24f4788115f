//! Looping tile animations.
//!
//! The grid always stores the frame-0 tile. Cells whose tile has an entry in
//! the [`AnimTable`] get [`TileFlags::ANIM`]; the renderer swaps in
//! `table[tile][frame % 4]` at draw time.

use std::collections::HashMap;

use crate::grid::{TileFlags, TileIndex, WorldGrid, NO_TILE};

pub const ANIM_FRAMES: usize = 4;

/// Base tile → its 4 animation frames.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimTable {
    cycles: HashMap<TileIndex, [TileIndex; ANIM_FRAMES]>,
}

impl AnimTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shoreline and shallow-water cycles of the standard tile sheet. Each
    /// frame sits 5 tiles to the right of the previous one.
    pub fn standard() -> Self {
        let mut table = Self::new();
        for base in [420, 421, 422, 423, 424, 460, 461, 462, 463, 464, 500, 501, 502, 503, 504] {
            table.insert(base, [base, base + 5, base + 10, base + 15]);
        }
        table
    }

    pub fn insert(&mut self, base: TileIndex, frames: [TileIndex; ANIM_FRAMES]) {
        self.cycles.insert(base, frames);
    }

    pub fn contains(&self, tile: TileIndex) -> bool {
        self.cycles.contains_key(&tile)
    }

    /// Tile shown for `frame`; non-animated tiles map to themselves.
    pub fn frame(&self, tile: TileIndex, frame: usize) -> TileIndex {
        self.cycles
            .get(&tile)
            .map_or(tile, |frames| frames[frame % ANIM_FRAMES])
    }

    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }
}

/// Flag every cell whose tile starts an animation cycle. Returns how many
/// cells were tagged.
pub fn tag_animations(grid: &mut WorldGrid, table: &AnimTable) -> usize {
    let animated: Vec<usize> = grid
        .tiles()
        .iter()
        .enumerate()
        .filter(|&(_, &tile)| tile != NO_TILE && table.contains(tile))
        .map(|(i, _)| i)
        .collect();

    for &i in &animated {
        grid.insert_flags(i, TileFlags::ANIM);
    }
    animated.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table() {
        let table = AnimTable::standard();
        assert_eq!(table.len(), 15);
        assert_eq!(table.frame(420, 0), 420);
        assert_eq!(table.frame(420, 3), 435);
        assert_eq!(table.frame(504, 2), 514);
        assert_eq!(table.frame(420, 6), 430);
        assert_eq!(table.frame(801, 2), 801);
    }

    #[test]
    fn test_tagging_is_additive() {
        let mut grid = WorldGrid::new(3, 1, 2).unwrap();
        grid.set(0, 0, 0, 420);
        grid.set(1, 0, 0, 801);
        grid.set(2, 0, 1, 461);

        let table = AnimTable::standard();
        assert_eq!(tag_animations(&mut grid, &table), 2);

        let i0 = grid.index_of(0, 0, 0).unwrap();
        let i1 = grid.index_of(1, 0, 0).unwrap();
        let i2 = grid.index_of(2, 0, 1).unwrap();
        assert!(grid.flags(i0).contains(TileFlags::ANIM));
        assert!(!grid.flags(i1).contains(TileFlags::ANIM));
        assert!(grid.flags(i2).contains(TileFlags::ANIM));

        // Tagging against an empty table removes nothing.
        tag_animations(&mut grid, &AnimTable::new());
        assert!(grid.flags(i0).contains(TileFlags::ANIM));

        // Stored index stays at frame 0.
        assert_eq!(grid.tile(i0), 420);
        assert_eq!(grid.display_tile(i0, 1, &table), 425);
        assert_eq!(grid.display_tile(i1, 1, &table), 801);
    }
}
