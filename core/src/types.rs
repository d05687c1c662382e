use ndarray::Array2;

/// Single grid axis, used for row/column positions and board height/width.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Grid coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// `ndarray` index of the cell at `(row, col)`.
pub const fn grid_index(coords: Coord2) -> [usize; 2] {
    [coords.0 as usize, coords.1 as usize]
}

/// Number of cells on a `rows` by `cols` board; cannot overflow since both sides fit in a `u8`.
pub const fn cell_count(rows: Coord, cols: Coord) -> CellCount {
    rows as CellCount * cols as CellCount
}

/// Dimensions of a grid as `(rows, cols)`, or `None` when either side does not fit a [`Coord`].
pub fn grid_size<T>(grid: &Array2<T>) -> Option<Coord2> {
    let (rows, cols) = grid.dim();
    Some((rows.try_into().ok()?, cols.try_into().ok()?))
}

const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (i8, i8), bounds: Coord2) -> Option<Coord2> {
    let (row, col) = coords;
    let (d_row, d_col) = delta;
    let (rows, cols) = bounds;

    let next_row = row.checked_add_signed(d_row)?;
    if next_row >= rows {
        return None;
    }

    let next_col = col.checked_add_signed(d_col)?;
    if next_col >= cols {
        return None;
    }

    Some((next_row, next_col))
}

/// Iterates the up-to-8 cells surrounding `center`, clipped at the grid edges.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *DISPLACEMENTS.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(next_item) = apply_delta(self.center, delta, self.bounds) {
                return Some(next_item);
            }
        }
    }
}
