//! 8-direction neighbor bitmasks for autotiling.
//!
//! Bit layout (row by row, top to bottom):
//!
//! ```text
//!   NW=1   N=2   NE=4
//!   W=8    .     E=16
//!   SW=32  S=64  SE=128
//! ```
//!
//! A corner bit is only kept when both of its adjacent cardinal bits are set,
//! so diagonal-only contact reads the same as no contact at all.

/// Mask value of a cell whose 8 neighbors all satisfy the predicate.
pub const FULLY_SURROUNDED: u8 = 0xFF;

/// One of the 8 neighbor directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    NorthWest,
    North,
    NorthEast,
    West,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl Direction {
    pub fn all() -> &'static [Direction] {
        &[
            Direction::NorthWest,
            Direction::North,
            Direction::NorthEast,
            Direction::West,
            Direction::East,
            Direction::SouthWest,
            Direction::South,
            Direction::SouthEast,
        ]
    }

    pub fn bit(self) -> u8 {
        match self {
            Direction::NorthWest => 1,
            Direction::North => 2,
            Direction::NorthEast => 4,
            Direction::West => 8,
            Direction::East => 16,
            Direction::SouthWest => 32,
            Direction::South => 64,
            Direction::SouthEast => 128,
        }
    }

    /// Grid offset `(dx, dy)`, y growing southwards.
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::NorthWest => (-1, -1),
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
            Direction::SouthWest => (-1, 1),
            Direction::South => (0, 1),
            Direction::SouthEast => (1, 1),
        }
    }

    /// Rule-file token (`N`, `NE`, ...).
    pub fn token(self) -> &'static str {
        match self {
            Direction::NorthWest => "NW",
            Direction::North => "N",
            Direction::NorthEast => "NE",
            Direction::West => "W",
            Direction::East => "E",
            Direction::SouthWest => "SW",
            Direction::South => "S",
            Direction::SouthEast => "SE",
        }
    }

    /// Parse a rule-file token. Case sensitive.
    pub fn from_token(token: &str) -> Option<Direction> {
        Direction::all().iter().copied().find(|d| d.token() == token)
    }
}

/// Compute the neighbor bitmask of `grid[index]` against `predicate`.
///
/// `grid` is row-major with the given `width`; its height is
/// `grid.len() / width`. Neighbors outside the grid fail the predicate.
pub fn compute_bitmask<T>(
    grid: &[T],
    index: usize,
    width: usize,
    predicate: impl Fn(&T) -> bool,
) -> u8 {
    if width == 0 || index >= grid.len() {
        return 0;
    }

    let height = grid.len() / width;
    let x = (index % width) as isize;
    let y = (index / width) as isize;

    let test = |dir: Direction| -> bool {
        let (dx, dy) = dir.offset();
        let nx = x + dx;
        let ny = y + dy;
        if nx < 0 || ny < 0 || nx as usize >= width || ny as usize >= height {
            return false;
        }
        predicate(&grid[ny as usize * width + nx as usize])
    };

    let n = test(Direction::North);
    let s = test(Direction::South);
    let w = test(Direction::West);
    let e = test(Direction::East);

    let mut mask = 0u8;
    if n {
        mask |= Direction::North.bit();
    }
    if s {
        mask |= Direction::South.bit();
    }
    if w {
        mask |= Direction::West.bit();
    }
    if e {
        mask |= Direction::East.bit();
    }

    // Corners need both cardinal supports.
    if n && w && test(Direction::NorthWest) {
        mask |= Direction::NorthWest.bit();
    }
    if n && e && test(Direction::NorthEast) {
        mask |= Direction::NorthEast.bit();
    }
    if s && w && test(Direction::SouthWest) {
        mask |= Direction::SouthWest.bit();
    }
    if s && e && test(Direction::SouthEast) {
        mask |= Direction::SouthEast.bit();
    }

    mask
}

/// Rule-file tokens describing a mask, e.g. `"N W NW"`. `"0"` for no bits.
pub fn mask_tokens(mask: u8) -> String {
    if mask == 0 {
        return "0".to_string();
    }
    Direction::all()
        .iter()
        .filter(|d| mask & d.bit() != 0)
        .map(|d| d.token())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(cells: &[u8]) -> Vec<bool> {
        cells.iter().map(|&c| c == 1).collect()
    }

    #[test]
    fn test_diagonal_only_is_suppressed() {
        let g = grid(&[
            1, 0, 0,
            0, 0, 0,
            0, 0, 0,
        ]);
        assert_eq!(compute_bitmask(&g, 4, 3, |&b| b), 0);
    }

    #[test]
    fn test_corner_kept_with_both_cardinals() {
        let g = grid(&[
            1, 1, 0,
            1, 0, 0,
            0, 0, 0,
        ]);
        let expected = Direction::NorthWest.bit() | Direction::North.bit() | Direction::West.bit();
        assert_eq!(compute_bitmask(&g, 4, 3, |&b| b), expected);
    }

    #[test]
    fn test_corner_dropped_with_one_cardinal() {
        let g = grid(&[
            1, 1, 0,
            0, 0, 0,
            0, 0, 0,
        ]);
        assert_eq!(compute_bitmask(&g, 4, 3, |&b| b), Direction::North.bit());
    }

    #[test]
    fn test_fully_surrounded() {
        let g = vec![true; 9];
        assert_eq!(compute_bitmask(&g, 4, 3, |&b| b), FULLY_SURROUNDED);
    }

    #[test]
    fn test_off_grid_neighbors_are_absent() {
        let g = vec![true; 9];
        // Top-left corner only sees E, S and SE.
        let expected = Direction::East.bit() | Direction::South.bit() | Direction::SouthEast.bit();
        assert_eq!(compute_bitmask(&g, 0, 3, |&b| b), expected);
        // Right edge must not wrap into the next row.
        let mask = compute_bitmask(&g, 5, 3, |&b| b);
        assert_eq!(mask & Direction::East.bit(), 0);
    }

    #[test]
    fn test_tokens() {
        assert_eq!(Direction::from_token("NE"), Some(Direction::NorthEast));
        assert_eq!(Direction::from_token("ne"), None);
        assert_eq!(mask_tokens(0), "0");
        assert_eq!(mask_tokens(Direction::North.bit() | Direction::South.bit()), "N S");
    }
}
