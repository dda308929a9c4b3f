//! Dense blocking-occupant storage backing the world grid.

use gridlock_core::{Blocker, CellCoord};

/// Row-major grid of blocking-occupant slots.
///
/// The permanent floor and the transient effects layered above it live
/// elsewhere; this structure only answers "what blocks this cell".
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<Option<Blocker>>,
}

impl Grid {
    pub(crate) fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![None; capacity],
        }
    }

    pub(crate) fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    pub(crate) fn blocker(&self, cell: CellCoord) -> Option<Blocker> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    pub(crate) fn place(&mut self, cell: CellCoord, blocker: Blocker) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = Some(blocker);
            }
        }
    }

    pub(crate) fn clear(&mut self, cell: CellCoord) -> Option<Blocker> {
        self.index(cell)
            .and_then(|index| self.cells.get_mut(index))
            .and_then(Option::take)
    }

    pub(crate) fn cells(&self) -> &[Option<Blocker>] {
        &self.cells
    }

    pub(crate) fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_and_clear_round_trip() {
        let mut grid = Grid::new(3, 2);
        let cell = CellCoord::new(2, 1);

        assert_eq!(grid.blocker(cell), None);
        grid.place(cell, Blocker::Wall);
        assert_eq!(grid.blocker(cell), Some(Blocker::Wall));
        assert_eq!(grid.clear(cell), Some(Blocker::Wall));
        assert_eq!(grid.blocker(cell), None);
    }

    #[test]
    fn out_of_bounds_cells_are_inert() {
        let mut grid = Grid::new(2, 2);
        let outside = CellCoord::new(2, 0);

        assert!(!grid.contains(outside));
        grid.place(outside, Blocker::Explosive);
        assert_eq!(grid.blocker(outside), None);
        assert_eq!(grid.clear(outside), None);
    }
}
