use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Row-major grid of [`Cell`]s with the mine layout and adjacency counts baked in.
///
/// Deserialization rebuilds the layout from the stored mines and rejects any
/// count, coordinate or cover state that disagrees with it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardRepr")]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

#[derive(Deserialize)]
struct BoardRepr {
    cells: Array2<Cell>,
    mine_count: CellCount,
}

impl TryFrom<BoardRepr> for Board {
    type Error = GameError;

    fn try_from(repr: BoardRepr) -> Result<Self> {
        let mut board = Self::from_mine_mask(&repr.cells.map(Cell::is_mine))?;
        if board.mine_count != repr.mine_count {
            return Err(GameError::InconsistentBoard);
        }

        for (cell, stored) in board.cells.iter_mut().zip(repr.cells.iter()) {
            if stored.coords() != cell.coords()
                || stored.mine_count_around() != cell.mine_count_around()
                || (stored.is_flagged() && !stored.is_covered())
            {
                return Err(GameError::InconsistentBoard);
            }
            cell.restore(stored.is_covered(), stored.is_flagged());
        }
        Ok(board)
    }
}

impl Board {
    /// Builds a board from a mask where `true` marks a mine, indexed `[row, col]`.
    pub fn from_mine_mask(mine_mask: &Array2<bool>) -> Result<Self> {
        let (rows, cols) = mine_mask.dim();
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count();

        let invalid = || GameError::InvalidConfiguration {
            rows: Coord::try_from(rows).unwrap_or(Coord::MAX),
            cols: Coord::try_from(cols).unwrap_or(Coord::MAX),
            mines: CellCount::try_from(mine_count).unwrap_or(CellCount::MAX),
        };
        let size = grid_size(mine_mask).ok_or_else(invalid)?;
        let mine_count: CellCount = mine_count.try_into().map_err(|_| invalid())?;
        GameConfig::new(size, mine_count)?;

        let cells = Array2::from_shape_fn((rows, cols), |(row, col)| {
            // dimensions were checked against `Coord` above
            let coords = (row as Coord, col as Coord);
            let is_mine = mine_mask[[row, col]];
            let count = if is_mine {
                0
            } else {
                NeighborIter::new(coords, size)
                    .filter(|&pos| mine_mask[grid_index(pos)])
                    .count() as u8
            };
            Cell::new(coords, is_mine, count)
        });

        Ok(Self { cells, mine_count })
    }

    /// Builds a board of `size` with mines at exactly `mine_coords`; duplicates count once.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let (rows, cols) = size;
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidConfiguration {
                rows,
                cols,
                mines: mine_coords.len().try_into().unwrap_or(CellCount::MAX),
            });
        }

        let mut mine_mask: Array2<bool> = Array2::default(grid_index(size));
        for &(row, col) in mine_coords {
            if row >= rows || col >= cols {
                return Err(GameError::OutOfBounds { row, col });
            }
            mine_mask[grid_index((row, col))] = true;
        }

        Self::from_mine_mask(&mine_mask)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (rows, cols) = self.size();
        if coords.0 < rows && coords.1 < cols {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds {
                row: coords.0,
                col: coords.1,
            })
        }
    }

    pub fn size(&self) -> Coord2 {
        // every constructor goes through `from_mine_mask`, which rejects oversized grids
        let (rows, cols) = self.cells.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn cols(&self) -> Coord {
        self.size().1
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        cell_count(rows, cols)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mine_count)
    }

    pub fn cell(&self, coords: Coord2) -> Result<&Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(&self.cells[grid_index(coords)])
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> Result<&mut Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(&mut self.cells[grid_index(coords)])
    }

    /// Cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Covers and unflags every cell, keeping the mine layout.
    pub(crate) fn reset_play_state(&mut self) {
        self.cells.iter_mut().for_each(Cell::reset);
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].is_mine())
            .count() as u8
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[grid_index(coords)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_match_neighbor_mines() {
        let board = Board::from_mine_coords((3, 3), &[(0, 0), (2, 2)]).unwrap();

        assert_eq!(board.mine_count(), 2);
        assert_eq!(board[(1, 1)].mine_count_around(), 2);
        assert_eq!(board[(0, 1)].mine_count_around(), 1);
        assert_eq!(board[(0, 2)].mine_count_around(), 0);
        assert_eq!(board[(2, 0)].mine_count_around(), 0);
        assert_eq!(board[(0, 0)].mine_count_around(), 0);
        for cell in board.iter().filter(|cell| !cell.is_mine()) {
            assert_eq!(
                cell.mine_count_around(),
                board.adjacent_mine_count(cell.coords())
            );
        }
    }

    #[test]
    fn cells_are_row_major_with_unique_coords() {
        let board = Board::from_mine_coords((2, 3), &[]).unwrap();
        let coords: Vec<_> = board.iter().map(Cell::coords).collect();

        assert_eq!(coords, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
        assert_eq!(board.total_cells(), 6);
        assert_eq!(board.safe_cell_count(), 6);
        assert_eq!((board.rows(), board.cols()), (2, 3));
    }

    #[test]
    fn reset_play_state_keeps_layout() {
        let mut board = Board::from_mine_coords((2, 3), &[(1, 2)]).unwrap();
        let fresh = board.clone();
        board.cell_mut((0, 0)).unwrap().uncover();
        board.cell_mut((1, 2)).unwrap().toggle_flag();

        board.reset_play_state();

        assert_eq!(board, fresh);
    }

    #[test]
    fn serde_round_trip_keeps_play_state() {
        let mut board = Board::from_mine_coords((2, 2), &[(0, 0)]).unwrap();
        board.cell_mut((1, 1)).unwrap().uncover();
        board.cell_mut((0, 0)).unwrap().toggle_flag();

        let json = serde_json::to_string(&board).unwrap();
        let restored: Board = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, board);
        assert_eq!(restored.mine_count(), 1);
        assert!(!restored[(1, 1)].is_covered());
        assert!(restored[(0, 0)].is_flagged());
    }

    fn tampered(
        board: &Board,
        edit: impl FnOnce(&mut serde_json::Value),
    ) -> serde_json::Result<Board> {
        let mut value = serde_json::to_value(board).unwrap();
        edit(&mut value);
        serde_json::from_value(value)
    }

    fn cell_value(value: &mut serde_json::Value, index: usize) -> &mut serde_json::Value {
        &mut value["cells"]["data"][index]
    }

    #[test]
    fn deserialize_rejects_inconsistent_boards() {
        let board = Board::from_mine_coords((2, 2), &[(0, 0)]).unwrap();

        assert!(tampered(&board, |_| {}).is_ok());
        assert!(tampered(&board, |value| value["mine_count"] = 9.into()).is_err());
        assert!(
            tampered(&board, |value| cell_value(value, 3)["mine_count_around"] = 4.into()).is_err()
        );
        assert!(tampered(&board, |value| cell_value(value, 1)["is_mine"] = true.into()).is_err());
        assert!(
            tampered(&board, |value| cell_value(value, 2)["coords"] = serde_json::json!([1, 1]))
                .is_err()
        );
        assert!(
            tampered(&board, |value| {
                let cell = cell_value(value, 3);
                cell["is_covered"] = false.into();
                cell["is_flagged"] = true.into();
            })
            .is_err()
        );
    }

    #[test]
    fn duplicate_mine_coords_count_once() {
        let board = Board::from_mine_coords((2, 2), &[(1, 1), (1, 1)]).unwrap();

        assert_eq!(board.mine_count(), 1);
        assert_eq!(board.game_config(), GameConfig::new_unchecked((2, 2), 1));
    }

    #[test]
    fn rejects_mines_outside_board() {
        assert_eq!(
            Board::from_mine_coords((2, 2), &[(2, 0)]),
            Err(GameError::OutOfBounds { row: 2, col: 0 })
        );
    }

    #[test]
    fn rejects_empty_board() {
        assert!(matches!(
            Board::from_mine_coords((0, 3), &[]),
            Err(GameError::InvalidConfiguration { .. })
        ));
        assert!(Board::from_mine_mask(&Array2::default((3, 0))).is_err());
    }

    #[test]
    fn cell_lookup_checks_bounds() {
        let board = Board::from_mine_coords((2, 2), &[]).unwrap();

        assert!(board.cell((1, 1)).is_ok());
        assert_eq!(
            board.cell((1, 2)),
            Err(GameError::OutOfBounds { row: 1, col: 2 })
        );
    }
}
