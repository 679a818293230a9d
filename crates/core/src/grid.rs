//! Grid module - the tile arrangement
//!
//! The grid is a `side x side` board stored as a flat, row-major vector of tiles.
//! `tiles[i]` is the tile currently sitting in cell `i`.
//!
//! Invariants (checked by [`Grid::validate`]):
//! - exactly `side * side` tiles
//! - tile ids form the permutation `0..side*side`
//! - exactly one blank tile, whose id is `side * side - 1`
//!
//! The grid performs no legality checks on swaps; that is the move validator's job.

use tracing::error;

use crate::error::{PuzzleError, Result};
use crate::types::{blank_id, Tile, MAX_SIDE, MIN_SIDE};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    side: usize,
    /// Row-major tiles (row * side + col)
    tiles: Vec<Tile>,
}

impl Grid {
    /// Create the canonical solved grid.
    pub fn create_solved(side: usize) -> Result<Self> {
        check_side(side)?;
        let tiles = (0..side * side).map(|id| Tile::new(id, side)).collect();
        Ok(Self { side, tiles })
    }

    /// Rebuild a grid from row-major tile ids.
    ///
    /// Fails with `InvariantViolation` unless `ids` is a permutation of `0..side*side`.
    pub fn from_ids(side: usize, ids: &[usize]) -> Result<Self> {
        check_side(side)?;
        let n = side * side;
        if ids.len() != n {
            return Err(PuzzleError::InvariantViolation {
                detail: "tile count does not match board size",
            });
        }

        let mut seen = vec![false; n];
        for &id in ids {
            if id >= n || seen[id] {
                return Err(PuzzleError::InvariantViolation {
                    detail: "tile ids are not a permutation",
                });
            }
            seen[id] = true;
        }

        let tiles = ids.iter().map(|&id| Tile::new(id, side)).collect();
        Ok(Self { side, tiles })
    }

    /// Wrap raw tiles without any invariant check.
    ///
    /// Meant for restoring boards from external data; run [`Grid::validate`] before trusting it.
    pub fn from_raw_tiles(side: usize, tiles: Vec<Tile>) -> Self {
        Self { side, tiles }
    }

    /// Side length of the board
    pub fn side(&self) -> usize {
        self.side
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile at cell `index`, or None if out of bounds
    pub fn get(&self, index: usize) -> Option<Tile> {
        self.tiles.get(index).copied()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Row-major tile ids
    pub fn ids(&self) -> impl Iterator<Item = u16> + '_ {
        self.tiles.iter().map(|t| t.id)
    }

    /// (row, col) of a cell index
    #[inline(always)]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index / self.side, index % self.side)
    }

    /// Locate the blank tile.
    ///
    /// Fails with `InvariantViolation` when there is no blank or more than one.
    pub fn index_of_blank(&self) -> Result<usize> {
        let mut found = None;
        for (i, tile) in self.tiles.iter().enumerate() {
            if tile.is_blank {
                if found.is_some() {
                    error!(side = self.side, "grid holds more than one blank tile");
                    return Err(PuzzleError::InvariantViolation {
                        detail: "more than one blank tile",
                    });
                }
                found = Some(i);
            }
        }
        found.ok_or_else(|| {
            error!(side = self.side, "grid holds no blank tile");
            PuzzleError::InvariantViolation {
                detail: "no blank tile",
            }
        })
    }

    /// True iff every cell holds the tile whose id equals the cell index
    pub fn is_solved(&self) -> bool {
        self.tiles
            .iter()
            .enumerate()
            .all(|(i, tile)| tile.id as usize == i)
    }

    /// Return a copy with cells `i` and `j` exchanged.
    ///
    /// Panics if either index is out of bounds.
    pub fn swap(&self, i: usize, j: usize) -> Grid {
        let mut next = self.clone();
        next.swap_in_place(i, j);
        next
    }

    /// Exchange cells `i` and `j` in place.
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn swap_in_place(&mut self, i: usize, j: usize) {
        self.tiles.swap(i, j);
    }

    /// Full invariant check: permutation of ids, a single blank with the reserved id.
    ///
    /// Returns the blank index on success.
    pub fn validate(&self) -> Result<usize> {
        let n = self.side * self.side;
        if self.tiles.len() != n {
            return Err(PuzzleError::InvariantViolation {
                detail: "tile count does not match board size",
            });
        }

        let mut seen = vec![false; n];
        for tile in &self.tiles {
            let id = tile.id as usize;
            if id >= n || seen[id] {
                error!(side = self.side, id, "grid ids are not a permutation");
                return Err(PuzzleError::InvariantViolation {
                    detail: "tile ids are not a permutation",
                });
            }
            seen[id] = true;
        }

        let blank = self.index_of_blank()?;
        if self.tiles[blank].id as usize != blank_id(self.side) {
            error!(side = self.side, blank, "blank tile carries the wrong id");
            return Err(PuzzleError::InvariantViolation {
                detail: "blank tile carries the wrong id",
            });
        }
        Ok(blank)
    }

    /// Mutable access to tiles (for testing invariant failures)
    #[cfg(test)]
    pub(crate) fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }
}

fn check_side(side: usize) -> Result<()> {
    if (MIN_SIDE..=MAX_SIDE).contains(&side) {
        Ok(())
    } else {
        Err(PuzzleError::InvalidSide { side })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solved_grid_layout() {
        let grid = Grid::create_solved(4).unwrap();
        assert_eq!(grid.len(), 16);
        assert_eq!(grid.side(), 4);
        assert!(grid.is_solved());
        assert_eq!(grid.index_of_blank().unwrap(), 15);
        for (i, tile) in grid.tiles().iter().enumerate() {
            assert_eq!(tile.id as usize, i);
            assert_eq!(tile.home as usize, i);
            assert_eq!(tile.is_blank, i == 15);
        }
    }

    #[test]
    fn solved_for_every_side() {
        for side in MIN_SIDE..=20 {
            let grid = Grid::create_solved(side).unwrap();
            assert!(grid.is_solved(), "side {side}");
            assert_eq!(grid.validate().unwrap(), side * side - 1);
        }
    }

    #[test]
    fn rejects_out_of_range_sides() {
        assert_eq!(
            Grid::create_solved(1),
            Err(PuzzleError::InvalidSide { side: 1 })
        );
        assert_eq!(
            Grid::create_solved(MAX_SIDE + 1),
            Err(PuzzleError::InvalidSide { side: MAX_SIDE + 1 })
        );
    }

    #[test]
    fn swap_leaves_input_untouched() {
        let grid = Grid::create_solved(3).unwrap();
        let swapped = grid.swap(8, 7);

        assert!(grid.is_solved());
        assert!(!swapped.is_solved());
        assert_eq!(swapped.index_of_blank().unwrap(), 7);
        assert_eq!(swapped.get(8).unwrap().id, 7);
    }

    #[test]
    fn coords_are_row_major() {
        let grid = Grid::create_solved(4).unwrap();
        assert_eq!(grid.coords(0), (0, 0));
        assert_eq!(grid.coords(3), (0, 3));
        assert_eq!(grid.coords(4), (1, 0));
        assert_eq!(grid.coords(15), (3, 3));
    }

    #[test]
    fn from_ids_rejects_duplicates_and_gaps() {
        assert!(Grid::from_ids(2, &[0, 1, 2, 3]).unwrap().is_solved());
        assert!(Grid::from_ids(2, &[0, 1, 3, 2]).is_ok());
        assert!(matches!(
            Grid::from_ids(2, &[0, 1, 1, 3]),
            Err(PuzzleError::InvariantViolation { .. })
        ));
        assert!(matches!(
            Grid::from_ids(2, &[0, 1, 2]),
            Err(PuzzleError::InvariantViolation { .. })
        ));
        assert!(matches!(
            Grid::from_ids(2, &[0, 1, 2, 4]),
            Err(PuzzleError::InvariantViolation { .. })
        ));
    }

    #[test]
    fn missing_or_duplicate_blank_is_an_invariant_violation() {
        let mut grid = Grid::create_solved(3).unwrap();
        grid.tiles_mut()[8].is_blank = false;
        assert!(grid.index_of_blank().unwrap_err().is_invariant_violation());

        let mut grid = Grid::create_solved(3).unwrap();
        grid.tiles_mut()[0].is_blank = true;
        assert!(grid.index_of_blank().unwrap_err().is_invariant_violation());
        assert!(grid.validate().is_err());
    }
}
