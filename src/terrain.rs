//! Autotile rule sets loaded from `.terrain` files.
//!
//! Each data line reads `<category> <tile_index> <dir>...`, for example
//! `land 12 N W NW`. Direction tokens are OR'd into the neighbor bitmask the
//! tile is meant for; the token `0` stands for "no neighbors". Lines starting
//! with `#` are comments.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::bitmask::Direction;
use crate::error::Result;
use crate::grid::TileIndex;

/// Bitmask → tile table for one terrain category.
type CategoryTable = Box<[Option<TileIndex>; 256]>;

/// Immutable mapping from (category, bitmask) to a tile index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TerrainRuleSet {
    categories: HashMap<String, CategoryTable>,
}

impl TerrainRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a rule file from disk.
    ///
    /// Malformed lines are logged and skipped; only a failure to read the file
    /// itself is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let rules = Self::parse_named(&contents, &path.display().to_string());
        log::info!(
            "Loaded {} terrain rules in {} categories from {}",
            rules.len(),
            rules.categories.len(),
            path.display()
        );
        Ok(rules)
    }

    /// Parse rule-file text.
    pub fn parse(contents: &str) -> Self {
        Self::parse_named(contents, "<memory>")
    }

    fn parse_named(contents: &str, source: &str) -> Self {
        let mut rules = Self::new();

        for (line_no, line) in contents.lines().enumerate() {
            let line_no = line_no + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let tokens: Vec<&str> = trimmed.split_whitespace().collect();
            if tokens.len() < 3 {
                log::error!("Invalid data line ({}) in terrain file: {}", line_no, source);
                continue;
            }

            let tile: TileIndex = match tokens[1].parse() {
                Ok(tile) => tile,
                Err(_) => {
                    log::error!(
                        "Invalid tile index '{}' on line {} in terrain file: {}",
                        tokens[1], line_no, source
                    );
                    continue;
                }
            };

            let mask = tokens[2..]
                .iter()
                .fold(0u8, |mask, token| mask | direction_bits(token, line_no, source));

            rules.insert(tokens[0], mask, tile);
        }

        rules
    }

    /// Add or replace a rule. Last write wins.
    pub fn insert(&mut self, category: &str, bitmask: u8, tile: TileIndex) {
        let table = self
            .categories
            .entry(category.to_string())
            .or_insert_with(|| Box::new([None; 256]));
        table[bitmask as usize] = Some(tile);
    }

    /// Tile for `(category, bitmask)`, or `None` when no rule exists. Never
    /// invents a default.
    pub fn lookup(&self, category: &str, bitmask: u8) -> Option<TileIndex> {
        self.categories.get(category)?[bitmask as usize]
    }

    /// Category names, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.categories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of distinct (category, bitmask) rules.
    pub fn len(&self) -> usize {
        self.categories
            .values()
            .map(|table| table.iter().filter(|t| t.is_some()).count())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn direction_bits(token: &str, line_no: usize, source: &str) -> u8 {
    if token == "0" {
        return 0;
    }
    match Direction::from_token(token) {
        Some(dir) => dir.bit(),
        None => {
            log::warn!(
                "Invalid direction type '{}' on line {} in terrain file: {}",
                token, line_no, source
            );
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const N: u8 = 2;
    const S: u8 = 64;

    #[test]
    fn test_round_trip_single_line() {
        let rules = TerrainRuleSet::parse("land 99 N S\n");
        assert_eq!(rules.lookup("land", N | S), Some(99));
        assert_eq!(rules.lookup("land", N), None);
        assert_eq!(rules.lookup("forest", N | S), None);
    }

    #[test]
    fn test_zero_token_and_full_mask() {
        let rules = TerrainRuleSet::parse("land 0 0\nland 1 N S E W NE NW SE SW\n");
        assert_eq!(rules.lookup("land", 0), Some(0));
        assert_eq!(rules.lookup("land", 0xFF), Some(1));
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = "\n\
                    land 5\n\
                    # comment line\n\
                    forest notanumber N\n\
                    forest 7 N\n";
        let rules = TerrainRuleSet::parse(text);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.lookup("forest", N), Some(7));
        assert_eq!(rules.categories(), vec!["forest"]);
    }

    #[test]
    fn test_unknown_direction_contributes_nothing() {
        let rules = TerrainRuleSet::parse("mountain 40 N up S\nmountain 41 n\n");
        assert_eq!(rules.lookup("mountain", N | S), Some(40));
        // Lowercase tokens are not directions.
        assert_eq!(rules.lookup("mountain", 0), Some(41));
    }

    #[test]
    fn test_last_write_wins() {
        let rules = TerrainRuleSet::parse("land 3 N\nland 4 N\n");
        assert_eq!(rules.lookup("land", N), Some(4));
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_tabs_and_repeated_spaces() {
        let rules = TerrainRuleSet::parse("land\t12   N  \tS\n");
        assert_eq!(rules.lookup("land", N | S), Some(12));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "land 99 N S").unwrap();
        writeln!(file, "forest 321 0").unwrap();

        let rules = TerrainRuleSet::load(file.path()).unwrap();
        assert_eq!(rules.lookup("land", N | S), Some(99));
        assert_eq!(rules.lookup("forest", 0), Some(321));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(TerrainRuleSet::load(dir.path().join("missing.terrain")).is_err());
    }
}
