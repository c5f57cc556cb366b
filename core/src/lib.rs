#![no_std]

extern crate alloc;

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod types;

/// Immutable clue layout of one puzzle. Entries are digits, 0 = blank.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Givens {
    cells: Array2<u8>,
}

impl Givens {
    /// Builds a layout from row-major wire rows, rejecting anything that is
    /// not a digit 0–9.
    pub fn from_rows(rows: GridRows) -> Result<Self> {
        for row in &rows {
            for &value in row {
                if value > MAX_DIGIT {
                    return Err(BoardError::InvalidValue);
                }
            }
        }
        let cells = Array2::from_shape_fn(GRID_DIM, |(row, col)| rows[row][col]);
        Ok(Self { cells })
    }

    /// A nonzero given is fixed and never editable.
    pub fn is_fixed(&self, coords: Coord2) -> bool {
        self[coords] != 0
    }

    pub fn value_at(&self, coords: Coord2) -> u8 {
        self[coords]
    }

    pub fn given_count(&self) -> usize {
        self.cells.iter().filter(|&&value| value != 0).count()
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if coords.0 < GRID_SIZE && coords.1 < GRID_SIZE {
            Ok(coords)
        } else {
            Err(BoardError::InvalidCoords)
        }
    }

    pub(crate) fn to_cells(&self) -> Array2<u8> {
        self.cells.clone()
    }
}

impl Index<Coord2> for Givens {
    type Output = u8;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_with(cells: &[(Coord2, u8)]) -> GridRows {
        let mut rows: GridRows = Default::default();
        for &((row, col), value) in cells {
            rows[row as usize][col as usize] = value;
        }
        rows
    }

    #[test]
    fn nonzero_givens_are_fixed() {
        let givens = Givens::from_rows(rows_with(&[((0, 0), 5)])).unwrap();

        assert!(givens.is_fixed((0, 0)));
        assert!(!givens.is_fixed((0, 1)));
        assert_eq!(givens.value_at((0, 0)), 5);
        assert_eq!(givens.given_count(), 1);
    }

    #[test]
    fn rows_with_a_value_above_nine_are_rejected() {
        let result = Givens::from_rows(rows_with(&[((4, 4), 10)]));

        assert_eq!(result, Err(BoardError::InvalidValue));
    }

    #[test]
    fn coords_outside_the_board_are_rejected() {
        let givens = Givens::from_rows(Default::default()).unwrap();

        assert_eq!(givens.validate_coords((8, 8)), Ok((8, 8)));
        assert_eq!(givens.validate_coords((9, 0)), Err(BoardError::InvalidCoords));
        assert_eq!(givens.validate_coords((0, 9)), Err(BoardError::InvalidCoords));
    }
}
