use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Digit out of range")]
    InvalidValue,
    #[error("Cell holds a fixed given")]
    FixedCell,
    #[error("Puzzle already solved, no new entries are accepted")]
    AlreadySolved,
}

pub type Result<T> = core::result::Result<T, BoardError>;
