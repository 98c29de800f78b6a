use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Coordinates are outside the board")]
    OutOfBounds,
    #[error("Board needs at least one row and one column")]
    EmptyBoard,
    #[error("Too many mines, at least one cell must stay safe")]
    TooManyMines,
    #[error("Mine layout does not fit the board")]
    InvalidMineLayout,
    #[error("Mines were already placed on this board")]
    MinesAlreadyPlaced,
    #[error("Unknown difficulty, expected one of: easy, medium, hard")]
    UnknownDifficulty,
}

pub type Result<T> = core::result::Result<T, GameError>;
