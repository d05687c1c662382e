use serde::{Deserialize, Serialize};

use crate::Coord2;

/// A single grid position.
///
/// Whether the cell holds a mine and how many mines surround it are fixed when
/// the board is built. Only the cover and flag state change afterwards, and only
/// through [`PlayEngine`](crate::PlayEngine).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    coords: Coord2,
    is_mine: bool,
    mine_count_around: u8,
    is_covered: bool,
    is_flagged: bool,
}

impl Cell {
    pub(crate) const fn new(coords: Coord2, is_mine: bool, mine_count_around: u8) -> Self {
        Self {
            coords,
            is_mine,
            mine_count_around,
            is_covered: true,
            is_flagged: false,
        }
    }

    pub const fn coords(&self) -> Coord2 {
        self.coords
    }

    pub const fn row(&self) -> u8 {
        self.coords.0
    }

    pub const fn col(&self) -> u8 {
        self.coords.1
    }

    pub const fn is_mine(&self) -> bool {
        self.is_mine
    }

    /// Mines among the neighboring cells, always 0 for a mine cell.
    pub const fn mine_count_around(&self) -> u8 {
        self.mine_count_around
    }

    pub const fn is_covered(&self) -> bool {
        self.is_covered
    }

    pub const fn is_flagged(&self) -> bool {
        self.is_flagged
    }

    pub const fn view(&self) -> CellView {
        if self.is_flagged {
            CellView::Flagged
        } else if self.is_covered {
            CellView::Covered
        } else if self.is_mine {
            CellView::Mine
        } else if self.mine_count_around > 0 {
            CellView::Number(self.mine_count_around)
        } else {
            CellView::Blank
        }
    }

    pub(crate) fn uncover(&mut self) {
        self.is_covered = false;
    }

    pub(crate) fn toggle_flag(&mut self) {
        self.is_flagged = !self.is_flagged;
    }

    pub(crate) fn restore(&mut self, is_covered: bool, is_flagged: bool) {
        self.is_covered = is_covered;
        self.is_flagged = is_flagged;
    }

    pub(crate) fn reset(&mut self) {
        self.restore(true, false);
    }
}

/// How a renderer should draw a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Covered,
    Flagged,
    Mine,
    Number(u8),
    Blank,
}

impl CellView {
    // whether the cell still hides its content
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Covered | Self::Flagged)
    }
}
