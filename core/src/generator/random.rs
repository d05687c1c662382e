use ndarray::Array2;

use super::*;

/// Purely random generation strategy: every cell is equally likely to hold a mine.
///
/// The layout is a function of the seed and the config only, so the same seed always reproduces
/// the same board.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<Board> {
        use rand::prelude::*;

        config.validate()?;
        log::debug!(
            "Generating {}x{} board with {} mines, seed {}",
            config.rows(),
            config.cols(),
            config.mines,
            self.seed
        );

        let (rows, cols) = config.size;
        let mut positions: Vec<Coord2> = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| (row, col)))
            .collect();

        let mut rng = SmallRng::seed_from_u64(self.seed);
        positions.shuffle(&mut rng);

        let mut mine_mask: Array2<bool> = Array2::default(grid_index(config.size));
        for &coords in positions.iter().take(config.mines.into()) {
            log::trace!("Placing mine at {:?}", coords);
            mine_mask[grid_index(coords)] = true;
        }

        let board = Board::from_mine_mask(&mine_mask)?;

        // double check mine count
        if board.mine_count() != config.mines {
            log::warn!(
                "Generated board count mismatch, actual: {}, requested: {}",
                board.mine_count(),
                config.mines
            );
        }
        Ok(board)
    }
}
