use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Move out of range: row {row}, col {col} (both must be within 0..=2)")]
    OutOfRange { row: usize, col: usize },
    #[error("Match already decided")]
    MatchDecided,
    #[error("Invalid board: {0}")]
    InvalidBoard(String),
}
