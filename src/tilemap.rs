use serde::{Deserialize, Serialize};

use crate::bitmask::compute_bitmask;

/// A 2D row-major grid. Does not wrap: reads outside the map are absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }
}

impl<T> Tilemap<T> {
    /// Wrap an existing row-major buffer. Returns `None` if the length does not
    /// match `width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        if data.len() != width * height {
            return None;
        }
        Some(Self { width, height, data })
    }

    /// Row-major index of `(x, y)`.
    pub fn index_of(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index_of(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index_of(x, y);
        self.data[idx] = value;
    }

    /// Neighbor bitmask of `(x, y)` against `predicate`.
    pub fn bitmask(&self, x: usize, y: usize, predicate: impl Fn(&T) -> bool) -> u8 {
        compute_bitmask(&self.data, self.index_of(x, y), self.width, predicate)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.data.iter().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let width = self.width;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            let x = idx % width;
            let y = idx / width;
            (x, y, val)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_coords_match_index() {
        let map: Tilemap<u8> = Tilemap::new(7, 3);
        for (i, (x, y, _)) in map.iter().enumerate() {
            assert_eq!(map.index_of(x, y), i);
        }
        assert_eq!(map.index_of(2, 1), 9);
    }

    #[test]
    fn test_from_vec_checks_length() {
        assert!(Tilemap::from_vec(2, 2, vec![1, 2, 3]).is_none());
        let map = Tilemap::from_vec(2, 2, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(*map.get(1, 1), 4);
    }
}
