use crate::*;
pub use random::*;

mod random;

pub trait LayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<Board>;
}

/// Generates a `num_rows` by `num_cols` board with `num_mines` mines placed uniformly at random.
pub fn generate(num_rows: Coord, num_cols: Coord, num_mines: CellCount) -> Result<Board> {
    let config = GameConfig::new((num_rows, num_cols), num_mines)?;
    RandomLayoutGenerator::from_entropy().generate(config)
}
