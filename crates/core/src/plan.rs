//! Direct-solve plan
//!
//! Walks tile ids in ascending order and swaps each tile from wherever it sits into
//! its home cell. The swaps are arbitrary cell exchanges, not slides: they exist to
//! animate a staggered per-tile solve when no recorded walk is available.

use crate::grid::Grid;

/// Ordered cell swaps that turn `grid` into the solved arrangement.
///
/// Empty for an already solved grid. Every swap moves at least one tile home, so the
/// plan never exceeds `grid.len() - 1` swaps.
pub fn direct_solve_plan(grid: &Grid) -> Vec<(usize, usize)> {
    let n = grid.len();

    // position_of[id] = cell currently holding tile `id`
    let mut position_of = vec![0usize; n];
    let mut at: Vec<usize> = grid.ids().map(usize::from).collect();
    for (cell, &id) in at.iter().enumerate() {
        position_of[id] = cell;
    }

    let mut plan = Vec::new();
    for id in 0..n {
        let current = position_of[id];
        if current == id {
            continue;
        }
        // Tile `id` goes home; the tile squatting there takes its old cell.
        let displaced = at[id];
        at.swap(current, id);
        position_of[id] = id;
        position_of[displaced] = current;
        plan.push((current, id));
    }
    plan
}
