//! Dense cell matrix plus the append-only pending change log.

use grid_skirmish_core::{Cell, GridPoint, PositionChange};

/// Single source of truth for grid occupancy.
///
/// Every logged mutation flows through [`Grid::update`]; lookups and writes
/// outside the bounds degrade to a sentinel or a silent no-op so coordinate
/// math at the edges can never crash a tick.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    rows: i32,
    columns: i32,
    cells: Vec<Cell>,
    pending: Vec<PositionChange>,
}

impl Grid {
    pub(crate) fn new(rows: usize, columns: usize) -> Self {
        let rows = i32::try_from(rows).unwrap_or(i32::MAX);
        let columns = i32::try_from(columns).unwrap_or(i32::MAX);
        let capacity = (rows as usize).saturating_mul(columns as usize);
        Self {
            rows,
            columns,
            cells: vec![Cell::Empty; capacity],
            pending: Vec::new(),
        }
    }

    pub(crate) const fn rows(&self) -> i32 {
        self.rows
    }

    pub(crate) const fn columns(&self) -> i32 {
        self.columns
    }

    fn index(&self, point: GridPoint) -> Option<usize> {
        if point.row() >= 0 && point.row() < self.rows && point.col() >= 0 && point.col() < self.columns
        {
            Some(point.row() as usize * self.columns as usize + point.col() as usize)
        } else {
            None
        }
    }

    /// Returns the cell state, or `None` for any out-of-bounds point.
    ///
    /// The sentinel never equals a passable state, so callers use it as a
    /// boundary check without guarding coordinates first.
    pub(crate) fn get(&self, point: GridPoint) -> Option<Cell> {
        self.index(point).map(|index| self.cells[index])
    }

    /// Writes `change.value` at `change.at` and appends the change to the
    /// pending log.
    ///
    /// A change carrying a vacated cell additionally clears that cell; the
    /// pair is one atomic record from the renderer's perspective.
    /// Out-of-bounds targets are silently dropped and never logged.
    pub(crate) fn update(&mut self, change: PositionChange) {
        let Some(index) = self.index(change.at) else {
            return;
        };
        self.cells[index] = change.value;
        if let Some(from) = change.from {
            if let Some(vacated) = self.index(from) {
                self.cells[vacated] = Cell::Empty;
            }
        }
        self.pending.push(change);
    }

    /// Applies a sequence of changes atomically with respect to log order.
    pub(crate) fn update_many(&mut self, changes: impl IntoIterator<Item = PositionChange>) {
        for change in changes {
            self.update(change);
        }
    }

    /// Writes a cell without logging a change record.
    ///
    /// Reserved for transient flood-fill marks, which must never reach the
    /// renderer.
    pub(crate) fn set(&mut self, point: GridPoint, cell: Cell) {
        if let Some(index) = self.index(point) {
            self.cells[index] = cell;
        }
    }

    /// Returns and clears the pending log.
    ///
    /// Called exactly once per engine operation, after all mutations, so each
    /// renderer call sees only that operation's changes.
    pub(crate) fn drain(&mut self) -> Vec<PositionChange> {
        std::mem::take(&mut self.pending)
    }

    /// Every in-bounds grid point in row-major order.
    pub(crate) fn points(&self) -> impl Iterator<Item = GridPoint> {
        let rows = self.rows;
        let columns = self.columns;
        (0..rows).flat_map(move |row| (0..columns).map(move |col| GridPoint::new(row, col)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_sentinel_for_every_out_of_bounds_point() {
        let grid = Grid::new(4, 6);
        assert_eq!(grid.get(GridPoint::new(-1, 0)), None);
        assert_eq!(grid.get(GridPoint::new(0, -1)), None);
        assert_eq!(grid.get(GridPoint::new(4, 0)), None);
        assert_eq!(grid.get(GridPoint::new(0, 6)), None);
        assert_eq!(grid.get(GridPoint::new(3, 5)), Some(Cell::Empty));
    }

    #[test]
    fn out_of_bounds_update_is_a_silent_no_op() {
        let mut grid = Grid::new(4, 6);
        grid.update(PositionChange::point(GridPoint::new(9, 9), Cell::Brick));
        grid.update(PositionChange::point(GridPoint::new(-1, 2), Cell::Brick));
        assert!(grid.drain().is_empty());
    }

    #[test]
    fn move_change_clears_the_vacated_cell() {
        let mut grid = Grid::new(4, 6);
        grid.update(PositionChange::point(GridPoint::new(1, 1), Cell::Hero));
        grid.update(PositionChange::moved(
            GridPoint::new(1, 2),
            Cell::Hero,
            GridPoint::new(1, 1),
        ));
        assert_eq!(grid.get(GridPoint::new(1, 1)), Some(Cell::Empty));
        assert_eq!(grid.get(GridPoint::new(1, 2)), Some(Cell::Hero));
        assert_eq!(grid.drain().len(), 2);
    }

    #[test]
    fn drain_clears_the_pending_log() {
        let mut grid = Grid::new(4, 6);
        grid.update_many([
            PositionChange::point(GridPoint::new(0, 0), Cell::Border),
            PositionChange::point(GridPoint::new(0, 1), Cell::Border),
        ]);
        assert_eq!(grid.drain().len(), 2);
        assert!(grid.drain().is_empty());
    }

    #[test]
    fn set_writes_without_logging() {
        let mut grid = Grid::new(4, 6);
        grid.set(GridPoint::new(2, 2), Cell::Consider);
        assert_eq!(grid.get(GridPoint::new(2, 2)), Some(Cell::Consider));
        assert!(grid.drain().is_empty());
    }
}
