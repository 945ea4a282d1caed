use crate::board::{Board, Mark};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Terminal classification of a match.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Outcome {
    /// The given mark completed a line.
    Win(Mark),
    /// All nine cells are occupied and no line was completed.
    Tie,
}

impl Outcome {
    pub fn winner(self) -> Option<Mark> {
        match self {
            Outcome::Win(mark) => Some(mark),
            Outcome::Tie => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Outcome::Win(Mark::X) => "x",
            Outcome::Win(Mark::O) => "o",
            Outcome::Tie => "tie",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win(mark) => write!(f, "{mark} wins"),
            Outcome::Tie => write!(f, "tie"),
        }
    }
}

impl Serialize for Outcome {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Outcome {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        match raw.to_ascii_lowercase().as_str() {
            "x" => Ok(Outcome::Win(Mark::X)),
            "o" => Ok(Outcome::Win(Mark::O)),
            "tie" => Ok(Outcome::Tie),
            _ => Err(serde::de::Error::custom(format!("invalid outcome: {raw}"))),
        }
    }
}

/// Classifies `board` right after `mover` has played.
///
/// A complete line of either mark is credited to `mover`, the side that just
/// moved, not to whichever mark the line holds. Otherwise a full board is a
/// [`Outcome::Tie`] and anything else is still undecided (`None`).
///
/// # Examples
///
/// ```
/// use noughts_engine::board::{Board, Mark};
/// use noughts_engine::outcome::{evaluate, Outcome};
///
/// let board: Board = "xxx/oo./...".parse().unwrap();
/// assert_eq!(evaluate(&board, Mark::X), Some(Outcome::Win(Mark::X)));
///
/// let open: Board = "x../.o./...".parse().unwrap();
/// assert_eq!(evaluate(&open, Mark::O), None);
/// ```
pub fn evaluate(board: &Board, mover: Mark) -> Option<Outcome> {
    if board.has_line() {
        Some(Outcome::Win(mover))
    } else if board.is_full() {
        Some(Outcome::Tie)
    } else {
        None
    }
}
