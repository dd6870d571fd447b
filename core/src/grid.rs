use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Cell indices collected without allocating, the grid never has more than [`GRID_CELLS`].
pub type CellList = SmallVec<[CellIndex; GRID_CELLS]>;

/// Fixed 3x3 board of holes.
///
/// Only two paths mutate it: the mole scheduler reveals hidden cells and hits or auto-hide timers hide
/// revealed ones.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<Cell>,
}

impl Grid {
    pub fn new() -> Self {
        Self {
            cells: Array2::default((GRID_ROWS, GRID_COLS).to_nd_index()),
        }
    }

    pub fn validate_cell(&self, cell: CellIndex) -> Result<CellIndex> {
        if usize::from(cell) < GRID_CELLS {
            Ok(cell)
        } else {
            Err(GameError::InvalidCell)
        }
    }

    pub fn cell_at(&self, cell: CellIndex) -> Cell {
        self.cells[cell_coords(cell).to_nd_index()]
    }

    pub fn is_revealed(&self, cell: CellIndex) -> bool {
        self.cell_at(cell).is_revealed()
    }

    pub fn hidden_cells(&self) -> CellList {
        self.iter()
            .filter(|(_, cell)| !cell.is_revealed())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn revealed_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_revealed()).count()
    }

    pub fn is_clear(&self) -> bool {
        self.revealed_count() == 0
    }

    /// Cells in row-major order together with their linear index.
    pub fn iter(&self) -> impl Iterator<Item = (CellIndex, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &cell)| (cell_index((row as Coord, col as Coord)), cell))
    }

    pub(crate) fn reveal(&mut self, cell: CellIndex, id: RevealId) -> bool {
        let slot = &mut self.cells[cell_coords(cell).to_nd_index()];
        match *slot {
            Cell::Hidden => {
                *slot = Cell::Revealed(id);
                true
            }
            Cell::Revealed(_) => false,
        }
    }

    /// Hides the cell whatever reveal it shows, returning that reveal.
    pub(crate) fn hide(&mut self, cell: CellIndex) -> Option<RevealId> {
        let slot = &mut self.cells[cell_coords(cell).to_nd_index()];
        let previous = slot.reveal_id();
        *slot = Cell::Hidden;
        previous
    }

    /// Hides the cell only while it still shows reveal `id`.
    pub(crate) fn hide_if(&mut self, cell: CellIndex, id: RevealId) -> bool {
        let slot = &mut self.cells[cell_coords(cell).to_nd_index()];
        if *slot == Cell::Revealed(id) {
            *slot = Cell::Hidden;
            true
        } else {
            false
        }
    }

    pub(crate) fn clear(&mut self) {
        self.cells.fill(Cell::Hidden);
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<CellIndex> for Grid {
    type Output = Cell;

    fn index(&self, cell: CellIndex) -> &Self::Output {
        &self.cells[cell_coords(cell).to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_all_hidden() {
        let grid = Grid::new();

        assert!(grid.is_clear());
        assert_eq!(grid.hidden_cells().len(), GRID_CELLS);
        assert_eq!(grid.iter().count(), GRID_CELLS);
    }

    #[test]
    fn validate_cell_rejects_out_of_range() {
        let grid = Grid::new();

        assert_eq!(grid.validate_cell(8), Ok(8));
        assert_eq!(grid.validate_cell(9), Err(GameError::InvalidCell));
    }

    #[test]
    fn reveal_only_applies_to_hidden_cells() {
        let mut grid = Grid::new();
        let first = RevealId::FIRST;

        assert!(grid.reveal(4, first));
        assert!(!grid.reveal(4, first.next()));
        assert_eq!(grid[4], Cell::Revealed(first));
        assert!(!grid.hidden_cells().contains(&4));
    }

    #[test]
    fn hide_if_ignores_other_reveal_instances() {
        let mut grid = Grid::new();
        let first = RevealId::FIRST;
        let second = first.next();

        grid.reveal(2, first);
        assert_eq!(grid.hide(2), Some(first));
        grid.reveal(2, second);

        assert!(!grid.hide_if(2, first));
        assert!(grid.is_revealed(2));
        assert!(grid.hide_if(2, second));
        assert!(!grid.is_revealed(2));
    }

    #[test]
    fn iter_reports_row_major_indices() {
        let mut grid = Grid::new();
        grid.reveal(7, RevealId::FIRST);

        let revealed: CellList = grid
            .iter()
            .filter(|(_, cell)| cell.is_revealed())
            .map(|(index, _)| index)
            .collect();

        assert_eq!(revealed.as_slice(), &[7]);
        assert_eq!(grid.cell_at(7), grid[7]);
    }
}
