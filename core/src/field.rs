use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::types::narrow;
use crate::*;

/// Rectangular board of cells, fixed in shape for the lifetime of a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<Cell>,
}

impl Grid {
    /// Allocates a board where every cell is hidden, unflagged and has no adjacent mines.
    pub fn new(size: Coord2) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::EmptyBoard);
        }
        Ok(Self {
            cells: Array2::default(nd_index(size)),
        })
    }

    /// Builds a board with the given mines already in place and counts filled in.
    pub fn with_mines(size: Coord2, mines: &[Coord2]) -> Result<Self> {
        let mut grid = Self::new(size)?;
        grid.mark_mines(mines, None)?;
        Ok(grid)
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (narrow(rows), narrow(cols))
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    pub fn mine_count(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| cell.value.is_mine())
            .fold(0, |count, _| count + 1)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (rows, cols) = self.size();
        if coords.0 < rows && coords.1 < cols {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    pub fn get(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(self[coords])
    }

    /// In-bounds neighbors of `coords`, in row-major order.
    pub fn neighbors_of(&self, coords: Coord2) -> Result<NeighborIter> {
        let coords = self.validate_coords(coords)?;
        Ok(self.neighbors(coords))
    }

    /// `Mine` for a mined cell, otherwise how many of its neighbors hold mines.
    pub fn count_adjacent_mines(&self, coords: Coord2) -> Result<CellValue> {
        let coords = self.validate_coords(coords)?;
        Ok(self.adjacent_value(coords))
    }

    /// Caller guarantees `coords` is on the board.
    pub(crate) fn neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    fn adjacent_value(&self, coords: Coord2) -> CellValue {
        if self[coords].value.is_mine() {
            return CellValue::Mine;
        }
        let count = self
            .neighbors(coords)
            .filter(|&pos| self[pos].value.is_mine())
            .fold(0, |count, _| count + 1);
        CellValue::Adjacent(count)
    }

    /// Asks `generator` for `mine_count` mines that avoid `exclude`, then computes every cell's count.
    ///
    /// The board is left untouched when the generator's answer does not fit.
    pub fn place_mines(
        &mut self,
        generator: &mut (impl MineGenerator + ?Sized),
        mine_count: CellCount,
        exclude: Coord2,
    ) -> Result<()> {
        let exclude = self.validate_coords(exclude)?;
        if mine_count >= self.total_cells() {
            return Err(GameError::TooManyMines);
        }

        let mines = generator.generate(self.size(), mine_count, exclude);
        if mines.len() != usize::from(mine_count) {
            log::warn!(
                "Generator returned {} mines, requested: {}",
                mines.len(),
                mine_count
            );
            return Err(GameError::InvalidMineLayout);
        }

        self.mark_mines(&mines, Some(exclude))?;
        log::debug!(
            "Placed {} mines on a {:?} board, start cell {:?} kept safe",
            mine_count,
            self.size(),
            exclude
        );
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &cell)| ((narrow(row), narrow(col)), cell))
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[nd_index(coords)]
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (Coord2, &mut Cell)> + '_ {
        self.cells
            .indexed_iter_mut()
            .map(|((row, col), cell)| ((narrow(row), narrow(col)), cell))
    }

    fn mark_mines(&mut self, mines: &[Coord2], exclude: Option<Coord2>) -> Result<()> {
        if self.cells.iter().any(|cell| cell.value.is_mine()) {
            return Err(GameError::MinesAlreadyPlaced);
        }
        if mines.len() >= usize::from(self.total_cells()) {
            return Err(GameError::TooManyMines);
        }

        // validate everything first so a bad layout never leaves a half-mined board
        let mut mine_mask: Array2<bool> = Array2::default(self.cells.raw_dim());
        for &coords in mines {
            let coords = self
                .validate_coords(coords)
                .map_err(|_| GameError::InvalidMineLayout)?;
            if Some(coords) == exclude || mine_mask[nd_index(coords)] {
                log::warn!("Rejected mine at {:?}", coords);
                return Err(GameError::InvalidMineLayout);
            }
            mine_mask[nd_index(coords)] = true;
        }

        for (cell, &is_mine) in self.cells.iter_mut().zip(mine_mask.iter()) {
            if is_mine {
                cell.value = CellValue::Mine;
            }
        }

        let (rows, cols) = self.size();
        for row in 0..rows {
            for col in 0..cols {
                let value = self.adjacent_value((row, col));
                self.cell_mut((row, col)).value = value;
            }
        }
        Ok(())
    }
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[nd_index(coords)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    #[derive(Debug)]
    struct Canned(Vec<Coord2>);

    impl MineGenerator for Canned {
        fn generate(&mut self, _size: Coord2, _mine_count: CellCount, _exclude: Coord2) -> Vec<Coord2> {
            self.0.clone()
        }
    }

    #[test]
    fn new_grid_is_blank() {
        let grid = Grid::new((2, 3)).unwrap();

        assert_eq!(grid.size(), (2, 3));
        assert_eq!(grid.total_cells(), 6);
        assert_eq!(grid.mine_count(), 0);
        assert!(grid.iter().all(|(_, cell)| cell == Cell::default()));
        assert_eq!(grid[(1, 2)].value(), CellValue::Adjacent(0));
    }

    #[test]
    fn new_rejects_empty_board() {
        assert_eq!(Grid::new((0, 4)), Err(GameError::EmptyBoard));
        assert_eq!(Grid::new((4, 0)), Err(GameError::EmptyBoard));
    }

    #[test]
    fn with_mines_fills_adjacent_counts() {
        // . * .
        // . . .
        // * . .
        let grid = Grid::with_mines((3, 3), &[(0, 1), (2, 0)]).unwrap();

        assert_eq!(grid[(0, 1)].value(), CellValue::Mine);
        assert_eq!(grid[(0, 0)].value(), CellValue::Adjacent(1));
        assert_eq!(grid[(1, 0)].value(), CellValue::Adjacent(2));
        assert_eq!(grid[(1, 1)].value(), CellValue::Adjacent(2));
        assert_eq!(grid[(2, 2)].value(), CellValue::Adjacent(0));
        assert_eq!(grid.count_adjacent_mines((0, 1)), Ok(CellValue::Mine));
        assert_eq!(grid.count_adjacent_mines((1, 0)), Ok(CellValue::Adjacent(2)));
        assert_eq!(grid.mine_count(), 2);
    }

    #[test]
    fn fully_surrounded_cell_counts_eight() {
        let mines: Vec<Coord2> = NeighborIter::new((1, 1), (3, 3)).collect();
        let grid = Grid::with_mines((3, 3), &mines).unwrap();

        assert_eq!(grid[(1, 1)].value(), CellValue::Adjacent(8));
    }

    #[test]
    fn with_mines_rejects_bad_layouts() {
        assert_eq!(
            Grid::with_mines((2, 2), &[(0, 0), (0, 0)]),
            Err(GameError::InvalidMineLayout)
        );
        assert_eq!(
            Grid::with_mines((2, 2), &[(2, 0)]),
            Err(GameError::InvalidMineLayout)
        );
        assert_eq!(
            Grid::with_mines((2, 2), &[(0, 0), (0, 1), (1, 0), (1, 1)]),
            Err(GameError::TooManyMines)
        );
    }

    #[test]
    fn place_mines_keeps_excluded_cell_safe() {
        let mut grid = Grid::new((9, 9)).unwrap();
        let mut generator = RandomMineGenerator::new(7);

        grid.place_mines(&mut generator, 10, (4, 4)).unwrap();

        assert_eq!(grid.mine_count(), 10);
        assert!(!grid[(4, 4)].is_mine());
    }

    #[test]
    fn place_mines_rejects_generator_that_ignores_exclusion() {
        let mut grid = Grid::new((3, 3)).unwrap();
        let before = grid.clone();

        let result = grid.place_mines(&mut Canned(vec![(1, 1)]), 1, (1, 1));

        assert_eq!(result, Err(GameError::InvalidMineLayout));
        assert_eq!(grid, before);
    }

    #[test]
    fn place_mines_rejects_wrong_count() {
        let mut grid = Grid::new((3, 3)).unwrap();

        let result = grid.place_mines(&mut Canned(vec![(0, 0)]), 2, (1, 1));

        assert_eq!(result, Err(GameError::InvalidMineLayout));
        assert_eq!(grid.mine_count(), 0);
    }

    #[test]
    fn place_mines_only_once() {
        let mut grid = Grid::with_mines((3, 3), &[(0, 0)]).unwrap();

        let result = grid.place_mines(&mut Canned(vec![(2, 2)]), 1, (1, 1));

        assert_eq!(result, Err(GameError::MinesAlreadyPlaced));
    }

    #[test]
    fn place_mines_needs_a_safe_cell() {
        let mut grid = Grid::new((2, 2)).unwrap();

        let result = grid.place_mines(&mut RandomMineGenerator::new(1), 4, (0, 0));

        assert_eq!(result, Err(GameError::TooManyMines));
    }

    #[test]
    fn get_checks_bounds() {
        let grid = Grid::new((2, 2)).unwrap();

        assert_eq!(grid.get((1, 1)), Ok(Cell::default()));
        assert_eq!(grid.get((2, 1)), Err(GameError::OutOfBounds));
        assert_eq!(grid.get((1, 2)), Err(GameError::OutOfBounds));
    }

    #[test]
    fn adjacency_checks_bounds() {
        let grid = Grid::with_mines((3, 3), &[(0, 0)]).unwrap();

        assert_eq!(grid.count_adjacent_mines((3, 3)), Err(GameError::OutOfBounds));
        assert_eq!(grid.count_adjacent_mines((0, 3)), Err(GameError::OutOfBounds));
        assert!(matches!(grid.neighbors_of((3, 3)), Err(GameError::OutOfBounds)));

        let corner: Vec<Coord2> = grid.neighbors_of((2, 2)).unwrap().collect();
        assert_eq!(corner, vec![(1, 1), (1, 2), (2, 1)]);
    }
}
