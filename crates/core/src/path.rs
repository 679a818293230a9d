//! Recorded walk since the last solved state.
//!
//! Replaying the moves in order from the solved grid reproduces the current grid;
//! undoing them newest-first from the current grid restores the solved grid.

use crate::grid::Grid;
use crate::types::Move;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    moves: Vec<Move>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn last(&self) -> Option<Move> {
        self.moves.last().copied()
    }

    pub fn push(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    pub fn extend(&mut self, segment: &[Move]) {
        self.moves.extend_from_slice(segment);
    }

    /// Remove and return the newest move.
    pub fn pop(&mut self) -> Option<Move> {
        self.moves.pop()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    /// Apply every move in recording order to a copy of `start`.
    pub fn replay_onto(&self, start: &Grid) -> Grid {
        let mut grid = start.clone();
        for mv in &self.moves {
            grid.swap_in_place(mv.blank, mv.neighbor);
        }
        grid
    }

    /// Undo every move newest-first on a copy of `current`.
    pub fn unwind_from(&self, current: &Grid) -> Grid {
        let mut grid = current.clone();
        for mv in self.moves.iter().rev().map(Move::reversed) {
            grid.swap_in_place(mv.blank, mv.neighbor);
        }
        grid
    }
}
