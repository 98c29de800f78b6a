use alloc::boxed::Box;
use alloc::collections::VecDeque;
use core::num::Saturating;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::InProgress)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One game from the first click to a win or a loss.
///
/// Mines are only placed on the first effective reveal, so that cell is always safe. Calls made after the game
/// ended are accepted and change nothing.
#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    grid: Grid,
    generator: Option<Box<dyn MineGenerator>>,
    flags_placed: Saturating<CellCount>,
    cells_revealed: Saturating<CellCount>,
    elapsed_seconds: Saturating<u32>,
    status: GameStatus,
    triggered_mine: Option<Coord2>,
    mines_shown: CellCount,
}

impl GameSession {
    /// New game with pseudo-random mines derived from `seed`.
    pub fn start(config: GameConfig, seed: u64) -> Result<Self> {
        Self::with_generator(config, RandomMineGenerator::new(seed))
    }

    pub fn with_generator(config: GameConfig, generator: impl MineGenerator + 'static) -> Result<Self> {
        config.validate()?;
        let grid = Grid::new(config.size())?;
        log::debug!(
            "New game: {}x{} with {} mines",
            config.rows,
            config.columns,
            config.mines
        );
        Ok(Self::from_parts(config, grid, Some(Box::new(generator))))
    }

    /// New game on a fixed layout. Mines are in place from the start, so the first reveal may hit one.
    pub fn with_mines(size: Coord2, mines: &[Coord2]) -> Result<Self> {
        let grid = Grid::with_mines(size, mines)?;
        let config = GameConfig::new(size.0, size.1, grid.mine_count())?;
        Ok(Self::from_parts(config, grid, None))
    }

    fn from_parts(config: GameConfig, grid: Grid, generator: Option<Box<dyn MineGenerator>>) -> Self {
        Self {
            config,
            grid,
            generator,
            flags_placed: Saturating(0),
            cells_revealed: Saturating(0),
            elapsed_seconds: Saturating(0),
            status: Default::default(),
            triggered_mine: None,
            mines_shown: 0,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.grid.size()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cell(&self, coords: Coord2) -> Result<Cell> {
        self.grid.get(coords)
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines
    }

    /// Whether the mine layout is fixed yet, which happens on the first effective reveal.
    pub fn mines_placed(&self) -> bool {
        self.generator.is_none()
    }

    pub fn flags_placed(&self) -> CellCount {
        self.flags_placed.0
    }

    /// Mines minus flags. Goes negative when the player places more flags than there are mines.
    pub fn remaining_flags(&self) -> i32 {
        i32::from(self.config.mines) - i32::from(self.flags_placed.0)
    }

    pub fn cells_revealed(&self) -> CellCount {
        self.cells_revealed.0
    }

    pub fn cells_to_reveal(&self) -> CellCount {
        self.config.safe_cells()
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds.0
    }

    /// The mine whose reveal lost the game.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// How many mines were shown when the game was lost, the triggered one included.
    pub fn mines_shown(&self) -> CellCount {
        self.mines_shown
    }

    /// True after a loss where no mine had been flagged, so every mine ended up shown.
    pub fn all_mines_shown(&self) -> bool {
        matches!(self.status, GameStatus::Lost) && self.mines_shown == self.config.mines
    }

    /// Advances the clock by one second while the game is in progress, returns the elapsed seconds.
    pub fn tick(&mut self) -> u32 {
        if self.status.is_in_progress() {
            self.elapsed_seconds += 1;
        }
        self.elapsed_seconds.0
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagReport> {
        self.toggle_flag_with(coords, false)
    }

    /// Flags a hidden cell. An already-flagged cell is still unflagged, exactly like [`Self::toggle_flag`].
    pub fn force_flag(&mut self, coords: Coord2) -> Result<FlagReport> {
        self.toggle_flag_with(coords, true)
    }

    fn toggle_flag_with(&mut self, coords: Coord2, force_flag: bool) -> Result<FlagReport> {
        use MarkOutcome::*;

        let coords = self.grid.validate_coords(coords)?;

        let outcome = if self.status.is_finished() {
            NoChange
        } else {
            let cell = self.grid.cell_mut(coords);
            match (cell.revealed, cell.flagged) {
                (true, _) => NoChange,
                (false, false) => {
                    cell.flagged = true;
                    self.flags_placed += 1;
                    Changed
                }
                (false, true) => {
                    // force_flag does not keep the flag, it is cleared either way
                    cell.flagged = false;
                    self.flags_placed -= 1;
                    log::trace!("Unflagged {:?} (force_flag: {})", coords, force_flag);
                    Changed
                }
            }
        };

        Ok(FlagReport {
            outcome,
            remaining_flags: self.remaining_flags(),
        })
    }

    /// Reveals a hidden, unflagged cell, flooding through zero cells to their numbered border.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealReport> {
        let coords = self.grid.validate_coords(coords)?;
        let mut report = RevealReport::default();

        let cell = self.grid[coords];
        if self.status.is_finished() || cell.flagged || cell.revealed {
            return Ok(report);
        }

        self.ensure_mines(coords)?;
        self.reveal_from(coords, &mut report);
        Ok(report)
    }

    /// Whether `coords` is a revealed number with exactly that many flagged hidden neighbors.
    pub fn can_expand(&self, coords: Coord2) -> Result<bool> {
        let coords = self.grid.validate_coords(coords)?;
        let cell = self.grid[coords];

        Ok(match cell.value {
            CellValue::Adjacent(count) if cell.revealed => count == self.count_flagged_neighbors(coords),
            _ => false,
        })
    }

    /// Reveals every neighbor of a satisfied number. A misplaced flag means a mine gets revealed.
    pub fn expand(&mut self, coords: Coord2) -> Result<RevealReport> {
        let mut report = RevealReport::default();

        if !self.can_expand(coords)? || self.status.is_finished() {
            return Ok(report);
        }

        for neighbor in self.grid.neighbors(coords) {
            self.reveal_from(neighbor, &mut report);
            if self.status.is_finished() {
                break;
            }
        }
        Ok(report)
    }

    fn ensure_mines(&mut self, first: Coord2) -> Result<()> {
        let Some(mut generator) = self.generator.take() else {
            return Ok(());
        };

        if let Err(err) = self
            .grid
            .place_mines(generator.as_mut(), self.config.mines, first)
        {
            self.generator = Some(generator);
            return Err(err);
        }
        Ok(())
    }

    /// Flood-fill from `start`, guarded by each cell's revealed flag and stopping as soon as the game ends.
    fn reveal_from(&mut self, start: Coord2, report: &mut RevealReport) {
        let mut to_visit = VecDeque::from([start]);

        while let Some(coords) = to_visit.pop_front() {
            let outcome = self.reveal_single_cell(coords, report);
            report.outcome = report.outcome | outcome;

            if self.status.is_finished() {
                return;
            }

            if outcome.has_update() && self.grid[coords].value == CellValue::Adjacent(0) {
                let grid = &self.grid;
                to_visit.extend(
                    grid.neighbors(coords)
                        .filter(|&pos| !grid[pos].revealed && !grid[pos].flagged),
                );
            }
        }
    }

    fn reveal_single_cell(&mut self, coords: Coord2, report: &mut RevealReport) -> RevealOutcome {
        let cell = self.grid.cell_mut(coords);
        if cell.flagged || cell.revealed {
            return RevealOutcome::NoChange;
        }
        cell.revealed = true;
        let value = cell.value;
        report.cells.push(coords);

        if value.is_mine() {
            self.triggered_mine = Some(coords);
            self.end_game(false, report);
            return RevealOutcome::HitMine;
        }

        self.cells_revealed += 1;
        log::trace!("Revealed {:?}: {:?}", coords, value);

        if self.cells_revealed.0 == self.cells_to_reveal() {
            self.end_game(true, report);
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        }
    }

    fn end_game(&mut self, won: bool, report: &mut RevealReport) {
        if self.status.is_finished() {
            return;
        }

        if won {
            self.status = GameStatus::Won;
            log::debug!("Game won after {} seconds", self.elapsed_seconds.0);
        } else {
            self.status = GameStatus::Lost;
            self.show_mines(report);
            log::debug!(
                "Game lost at {:?}, {} of {} mines shown",
                self.triggered_mine,
                self.mines_shown,
                self.config.mines
            );
        }
    }

    /// Reveals every unflagged mine. Flagged mines are taken as correct guesses and stay hidden.
    fn show_mines(&mut self, report: &mut RevealReport) {
        let mut shown = 0;
        for (coords, cell) in self.grid.iter_mut() {
            if !cell.value.is_mine() || cell.flagged {
                continue;
            }
            shown += 1;
            if !cell.revealed {
                cell.revealed = true;
                report.cells.push(coords);
            }
        }
        self.mines_shown = shown;
    }

    fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.grid
            .neighbors(coords)
            .filter(|&pos| self.grid[pos].flagged && !self.grid[pos].revealed)
            .fold(0, |count, _| count + 1)
    }
}
