//! Move validator - adjacency and legal-click rules
//!
//! Two cells are adjacent when they share a row and their columns differ by one,
//! or share a column and their rows differ by one. Diagonals never count and
//! neighbors never wrap across row boundaries.

use arrayvec::ArrayVec;

use crate::error::Result;
use crate::grid::Grid;

/// Cells orthogonally next to `index`, in up/down/left/right order.
///
/// Corners have 2 neighbors, edges 3, interior cells 4. Out-of-range indices have none.
pub fn neighbors_of(index: usize, side: usize) -> ArrayVec<usize, 4> {
    let mut out = ArrayVec::new();
    if side == 0 || index >= side * side {
        return out;
    }

    let row = index / side;
    let col = index % side;

    if row > 0 {
        out.push(index - side);
    }
    if row + 1 < side {
        out.push(index + side);
    }
    if col > 0 {
        out.push(index - 1);
    }
    if col + 1 < side {
        out.push(index + 1);
    }
    out
}

/// True iff `b` is an orthogonal neighbor of `a`. Symmetric.
pub fn is_adjacent(a: usize, b: usize, side: usize) -> bool {
    neighbors_of(a, side).contains(&b)
}

/// True iff clicking cell `clicked` would slide a tile into the blank.
///
/// Clicking the blank itself or any cell not next to it is never legal.
/// Fails only when the grid has lost its single blank.
pub fn is_legal_click(grid: &Grid, clicked: usize) -> Result<bool> {
    let blank = grid.index_of_blank()?;
    Ok(clicked != blank && is_adjacent(clicked, blank, grid.side()))
}

/// Cells whose tiles can currently slide into the blank.
pub fn movable_cells(grid: &Grid) -> Result<ArrayVec<usize, 4>> {
    let blank = grid.index_of_blank()?;
    Ok(neighbors_of(blank, grid.side()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_edge_and_interior_counts() {
        let side = 4;
        assert_eq!(neighbors_of(0, side).as_slice(), &[4, 1]);
        assert_eq!(neighbors_of(3, side).as_slice(), &[7, 2]);
        assert_eq!(neighbors_of(15, side).as_slice(), &[11, 14]);
        assert_eq!(neighbors_of(1, side).len(), 3);
        assert_eq!(neighbors_of(5, side).as_slice(), &[1, 9, 4, 6]);
    }

    #[test]
    fn neighbors_do_not_wrap_rows() {
        let side = 4;
        // End of row 0 and start of row 1 are numerically adjacent but not on the board.
        assert!(!is_adjacent(3, 4, side));
        assert!(!is_adjacent(4, 3, side));
        assert!(!neighbors_of(4, side).contains(&3));
    }

    #[test]
    fn diagonals_are_not_adjacent() {
        assert!(!is_adjacent(0, 5, 4));
        assert!(!is_adjacent(5, 0, 4));
    }

    #[test]
    fn out_of_range_has_no_neighbors() {
        assert!(neighbors_of(16, 4).is_empty());
        assert!(!is_adjacent(16, 15, 4));
    }

    #[test]
    fn legal_clicks_on_solved_grid() {
        let grid = Grid::create_solved(4).unwrap();
        assert!(is_legal_click(&grid, 14).unwrap());
        assert!(is_legal_click(&grid, 11).unwrap());
        assert!(!is_legal_click(&grid, 15).unwrap());
        assert!(!is_legal_click(&grid, 10).unwrap());
        assert!(!is_legal_click(&grid, 0).unwrap());
        assert!(!is_legal_click(&grid, 99).unwrap());
        assert_eq!(movable_cells(&grid).unwrap().as_slice(), &[11, 14]);
    }
}
