use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Lifecycle of one puzzle session once its givens have loaded.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EngineState {
    Playing,
    Won,
}

impl EngineState {
    pub const fn is_won(self) -> bool {
        matches!(self, Self::Won)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Playing
    }
}

/// Outcome of one applied edit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum EditOutcome {
    /// The cell was blanked; no server round-trip is needed.
    Cleared,
    /// A digit was written and must be validated remotely.
    Entered(u8),
}

impl EditOutcome {
    pub const fn needs_validation(self) -> bool {
        matches!(self, Self::Entered(_))
    }
}

/// Working state of one puzzle: the immutable givens, the player's grid
/// seeded as a deep copy of them, and the Playing→Won machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardEngine {
    givens: Givens,
    entries: Array2<u8>,
    state: EngineState,
}

impl BoardEngine {
    pub fn new(givens: Givens) -> Self {
        let entries = givens.to_cells();
        Self {
            givens,
            entries,
            state: Default::default(),
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_won(&self) -> bool {
        self.state.is_won()
    }

    pub fn givens(&self) -> &Givens {
        &self.givens
    }

    pub fn is_fixed(&self, coords: Coord2) -> bool {
        self.givens.is_fixed(coords)
    }

    pub fn entry_at(&self, coords: Coord2) -> u8 {
        self.entries[coords.to_nd_index()]
    }

    /// Cells still blank in the working grid.
    pub fn blank_count(&self) -> usize {
        self.entries.iter().filter(|&&value| value == 0).count()
    }

    /// Applies one sanitized entry. Fixed cells and won sessions never
    /// accept an edit; 0 blanks the cell.
    pub fn set_entry(&mut self, coords: Coord2, value: u8) -> Result<EditOutcome> {
        let coords = self.givens.validate_coords(coords)?;
        self.check_playing()?;

        if value > MAX_DIGIT {
            return Err(BoardError::InvalidValue);
        }
        if self.givens.is_fixed(coords) {
            return Err(BoardError::FixedCell);
        }

        self.entries[coords.to_nd_index()] = value;
        Ok(if value == 0 {
            EditOutcome::Cleared
        } else {
            EditOutcome::Entered(value)
        })
    }

    /// Playing → Won. A won session never reverts; only loading a new
    /// puzzle (a fresh engine) restarts the cycle.
    pub fn mark_won(&mut self) {
        self.state = EngineState::Won;
    }

    /// Row-major snapshot of the working grid for a completion check.
    pub fn to_rows(&self) -> GridRows {
        let mut rows: GridRows = Default::default();
        for ((row, col), &value) in self.entries.indexed_iter() {
            rows[row][col] = value;
        }
        rows
    }

    fn check_playing(&self) -> Result<()> {
        if self.state.is_won() {
            Err(BoardError::AlreadySolved)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(givens: &[(Coord2, u8)]) -> BoardEngine {
        let mut rows: GridRows = Default::default();
        for &((row, col), value) in givens {
            rows[row as usize][col as usize] = value;
        }
        BoardEngine::new(Givens::from_rows(rows).unwrap())
    }

    #[test]
    fn working_grid_is_seeded_as_a_deep_copy_of_the_givens() {
        let mut engine = engine_with(&[((0, 0), 5)]);

        assert_eq!(engine.entry_at((0, 0)), 5);
        assert_eq!(engine.entry_at((0, 1)), 0);

        engine.set_entry((0, 1), 7).unwrap();

        assert_eq!(engine.givens().value_at((0, 1)), 0);
        assert_eq!(engine.entry_at((0, 1)), 7);
    }

    #[test]
    fn fixed_cells_reject_every_edit() {
        let mut engine = engine_with(&[((3, 3), 9)]);

        assert_eq!(engine.set_entry((3, 3), 1), Err(BoardError::FixedCell));
        assert_eq!(engine.set_entry((3, 3), 0), Err(BoardError::FixedCell));
        assert_eq!(engine.entry_at((3, 3)), 9);
    }

    #[test]
    fn entering_a_digit_requires_validation_but_clearing_does_not() {
        let mut engine = engine_with(&[]);

        let entered = engine.set_entry((2, 4), 6).unwrap();
        assert_eq!(entered, EditOutcome::Entered(6));
        assert!(entered.needs_validation());

        let cleared = engine.set_entry((2, 4), 0).unwrap();
        assert_eq!(cleared, EditOutcome::Cleared);
        assert!(!cleared.needs_validation());
        assert_eq!(engine.entry_at((2, 4)), 0);
    }

    #[test]
    fn a_won_session_accepts_no_further_entries() {
        let mut engine = engine_with(&[]);
        engine.set_entry((0, 0), 4).unwrap();
        engine.mark_won();

        assert!(engine.is_won());
        assert_eq!(engine.set_entry((0, 1), 2), Err(BoardError::AlreadySolved));
        assert_eq!(engine.set_entry((0, 0), 0), Err(BoardError::AlreadySolved));
        assert_eq!(engine.entry_at((0, 0)), 4);
    }

    #[test]
    fn out_of_range_values_and_coords_are_rejected() {
        let mut engine = engine_with(&[]);

        assert_eq!(engine.set_entry((0, 0), 10), Err(BoardError::InvalidValue));
        assert_eq!(engine.set_entry((9, 0), 5), Err(BoardError::InvalidCoords));
    }

    #[test]
    fn blank_count_tracks_the_working_grid() {
        let mut engine = engine_with(&[((0, 0), 5)]);
        assert_eq!(engine.blank_count(), 80);

        engine.set_entry((1, 1), 3).unwrap();
        assert_eq!(engine.blank_count(), 79);

        engine.set_entry((1, 1), 0).unwrap();
        assert_eq!(engine.blank_count(), 80);
    }

    #[test]
    fn row_snapshot_reflects_entries_over_givens() {
        let mut engine = engine_with(&[((0, 0), 5)]);
        engine.set_entry((8, 8), 1).unwrap();

        let rows = engine.to_rows();
        assert_eq!(rows[0][0], 5);
        assert_eq!(rows[8][8], 1);
        assert_eq!(rows[4][4], 0);
    }
}
