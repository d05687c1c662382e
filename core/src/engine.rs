use core::num::Saturating;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Live session state: the board as the player sees it plus the derived status.
///
/// Only [`PlayEngine`] can change it; everything here is read-only to callers. It serializes for
/// renderers but cannot be deserialized back into a session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameState {
    board: Board,
    status: GameStatus,
    revealed_count: Saturating<CellCount>,
    flagged_count: Saturating<CellCount>,
    triggered_mine: Option<Coord2>,
}

impl GameState {
    fn new(mut board: Board) -> Self {
        board.reset_play_state();
        Self {
            board,
            status: GameStatus::default(),
            revealed_count: Saturating(0),
            flagged_count: Saturating(0),
            triggered_mine: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Safe cells uncovered so far.
    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count.0
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count.0
    }

    /// The mine that ended the game, if it was lost.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn mines_left(&self) -> isize {
        (self.board.mine_count() as isize) - (self.flagged_count.0 as isize)
    }
}

/// Owns one [`GameState`] and applies player moves to it.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayEngine {
    state: GameState,
}

impl PlayEngine {
    /// Starts a session on the mine layout of `board`; any cover or flag state it carries is reset.
    pub fn new(board: Board) -> Self {
        log::debug!(
            "New session on {}x{} board with {} mines",
            board.rows(),
            board.cols(),
            board.mine_count()
        );
        Self {
            state: GameState::new(board),
        }
    }

    /// Starts a session on a freshly generated random board.
    pub fn new_session(num_rows: Coord, num_cols: Coord, num_mines: CellCount) -> Result<Self> {
        Ok(Self::new(generate(num_rows, num_cols, num_mines)?))
    }

    pub fn with_generator(config: GameConfig, generator: impl LayoutGenerator) -> Result<Self> {
        Ok(Self::new(generator.generate(config)?))
    }

    pub fn current_state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.state.board.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.state.board.mine_count()
    }

    pub fn mines_left(&self) -> isize {
        self.state.mines_left()
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.state.triggered_mine
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<&Cell> {
        self.state.board.cell(coords)
    }

    pub fn view_at(&self, coords: Coord2) -> Result<CellView> {
        Ok(self.cell_at(coords)?.view())
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let finished = self.state.is_finished();
        let cell = self.state.board.cell_mut(coords)?;

        if finished || !cell.is_covered() {
            return Ok(FlagOutcome::NoChange);
        }

        cell.toggle_flag();
        if cell.is_flagged() {
            self.state.flagged_count += 1;
        } else {
            self.state.flagged_count -= 1;
        }
        log::trace!("Toggled flag at {:?}", coords);
        Ok(FlagOutcome::Changed)
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let finished = self.state.is_finished();
        let cell = self.state.board.cell_mut(coords)?;

        if finished || !cell.is_covered() || cell.is_flagged() {
            return Ok(RevealOutcome::NoChange);
        }

        cell.uncover();
        log::trace!("Revealed {:?}", coords);

        if cell.is_mine() {
            self.state.triggered_mine = Some(coords);
            self.end_game(false);
            return Ok(RevealOutcome::HitMine);
        }

        self.state.revealed_count += 1;
        if self.state.revealed_count == Saturating(self.state.board.safe_cell_count()) {
            self.end_game(true);
            Ok(RevealOutcome::Won)
        } else {
            Ok(RevealOutcome::Revealed)
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state.status = if won {
            GameStatus::Won
        } else {
            GameStatus::Lost
        };
        log::debug!("Game ended: {:?}", self.state.status);
    }
}
