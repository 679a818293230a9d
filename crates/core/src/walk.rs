//! Walk generator - randomized shuffle by relocating the blank
//!
//! Each step slides a random neighbor of the blank into it. The cell the blank just
//! left is excluded whenever another candidate exists, so consecutive steps never
//! cancel each other out. Because every step is a legal slide, every generated
//! arrangement is reachable from the solved board and therefore solvable; no parity
//! check is needed.
//!
//! Walks are restartable: [`Walk::resume`] continues from the grid's current blank
//! and from the last recorded move, so repeated shuffles compose into one long walk.

use arrayvec::ArrayVec;

use crate::error::Result;
use crate::grid::Grid;
use crate::moves::neighbors_of;
use crate::rng::SimpleRng;
use crate::types::Move;

/// Stepping state of a blank random walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walk {
    side: usize,
    /// Cell currently holding the blank
    blank: usize,
    /// Cell the blank occupied before the last step
    came_from: Option<usize>,
}

impl Walk {
    /// Continue a walk whose newest recorded move was `last`.
    ///
    /// `last` only counts if it actually ended at the grid's current blank.
    pub fn resume(grid: &Grid, last: Option<Move>) -> Result<Self> {
        let blank = grid.index_of_blank()?;
        let came_from = last.filter(|mv| mv.neighbor == blank).map(|mv| mv.blank);
        Ok(Self {
            side: grid.side(),
            blank,
            came_from,
        })
    }

    pub fn blank(&self) -> usize {
        self.blank
    }

    /// Choose the next move and advance the walk past it.
    ///
    /// The caller applies the returned move to its grid.
    pub fn next_move(&mut self, rng: &mut SimpleRng) -> Move {
        let neighbors = neighbors_of(self.blank, self.side);
        let forward: ArrayVec<usize, 4> = neighbors
            .iter()
            .copied()
            .filter(|&cell| Some(cell) != self.came_from)
            .collect();

        // A dead end (single neighbor) may only go back.
        let pool = if forward.is_empty() {
            &neighbors
        } else {
            &forward
        };
        let chosen = pool[rng.next_range(pool.len() as u32) as usize];

        let mv = Move::new(self.blank, chosen);
        self.came_from = Some(self.blank);
        self.blank = chosen;
        mv
    }
}

/// Walk `steps` moves on `grid` in place and return the segment taken.
///
/// `last` is the newest move already recorded for this grid, if any.
pub fn apply_walk(
    grid: &mut Grid,
    steps: u32,
    last: Option<Move>,
    rng: &mut SimpleRng,
) -> Result<Vec<Move>> {
    let mut walk = Walk::resume(grid, last)?;
    let mut segment = Vec::with_capacity(steps as usize);
    for _ in 0..steps {
        let mv = walk.next_move(rng);
        grid.swap_in_place(mv.blank, mv.neighbor);
        segment.push(mv);
    }
    Ok(segment)
}

/// Pure variant of [`apply_walk`] starting a fresh walk.
pub fn generate(grid: &Grid, steps: u32, rng: &mut SimpleRng) -> Result<(Grid, Vec<Move>)> {
    let mut next = grid.clone();
    let segment = apply_walk(&mut next, steps, None, rng)?;
    Ok((next, segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::is_adjacent;

    fn sorted_ids(grid: &Grid) -> Vec<u16> {
        let mut ids: Vec<u16> = grid.ids().collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn every_step_is_a_legal_slide() {
        let grid = Grid::create_solved(5).unwrap();
        let mut rng = SimpleRng::new(11);
        let (_, segment) = generate(&grid, 200, &mut rng).unwrap();

        assert_eq!(segment.len(), 200);
        assert_eq!(segment[0].blank, 24);
        for pair in segment.windows(2) {
            assert!(is_adjacent(pair[0].blank, pair[0].neighbor, 5));
            // Chained: each move starts where the blank ended.
            assert_eq!(pair[1].blank, pair[0].neighbor);
        }
    }

    #[test]
    fn never_steps_straight_back() {
        let grid = Grid::create_solved(4).unwrap();
        let mut rng = SimpleRng::new(5);
        let (_, segment) = generate(&grid, 500, &mut rng).unwrap();

        for pair in segment.windows(2) {
            assert_ne!(pair[1], pair[0].reversed(), "walk undid its previous move");
        }
    }

    #[test]
    fn keeps_the_tile_permutation() {
        let grid = Grid::create_solved(16).unwrap();
        let mut rng = SimpleRng::new(2024);
        let (shuffled, _) = generate(&grid, 500, &mut rng).unwrap();

        assert_eq!(sorted_ids(&shuffled), (0..256).collect::<Vec<u16>>());
        assert!(shuffled.validate().is_ok());
        assert!(!shuffled.is_solved());
    }

    #[test]
    fn short_even_walk_with_fixed_seed() {
        let grid = Grid::create_solved(4).unwrap();
        let mut rng = SimpleRng::new(12345);
        let (shuffled, segment) = generate(&grid, 2, &mut rng).unwrap();

        assert_eq!(segment.len(), 2);
        // Two non-backtracking steps always leave two tiles displaced.
        assert!(!shuffled.is_solved());

        // After an even number of steps the blank sits on a cell of the same colour.
        let blank = shuffled.index_of_blank().unwrap();
        let (r, c) = shuffled.coords(blank);
        assert_eq!((r + c) % 2, (3 + 3) % 2);
    }

    #[test]
    fn same_seed_same_walk() {
        let grid = Grid::create_solved(6).unwrap();
        let a = generate(&grid, 100, &mut SimpleRng::new(77)).unwrap();
        let b = generate(&grid, 100, &mut SimpleRng::new(77)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_steps_is_a_no_op() {
        let grid = Grid::create_solved(3).unwrap();
        let (next, segment) = generate(&grid, 0, &mut SimpleRng::new(1)).unwrap();
        assert!(segment.is_empty());
        assert_eq!(next, grid);
    }

    #[test]
    fn resume_avoids_undoing_the_recorded_move() {
        // 2x2 board: every cell has exactly two neighbors, so after excluding the
        // previous cell the walk is forced.
        let mut grid = Grid::create_solved(2).unwrap();
        let mut rng = SimpleRng::new(9);
        let first = apply_walk(&mut grid, 1, None, &mut rng).unwrap();
        let second = apply_walk(&mut grid, 1, first.last().copied(), &mut rng).unwrap();

        assert_eq!(second[0].blank, first[0].neighbor);
        assert_ne!(second[0].neighbor, first[0].blank);
    }

    #[test]
    fn resume_ignores_a_stale_last_move() {
        let grid = Grid::create_solved(3).unwrap();
        // Last move ends somewhere other than the blank: it is not part of this walk.
        let walk = Walk::resume(&grid, Some(Move::new(0, 1))).unwrap();
        assert_eq!(walk.blank(), 8);
        assert_eq!(walk.came_from, None);
    }
}
