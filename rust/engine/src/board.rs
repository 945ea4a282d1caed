use crate::errors::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side length of the grid. Only 3×3 play is supported.
pub const SIZE: usize = 3;

/// One of the two player symbols.
/// Used both for the side to move and for cell occupancy.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    /// Cross (`x`)
    X,
    /// Nought (`o`)
    O,
}

impl Mark {
    /// The other mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Mark::X => 'x',
            Mark::O => 'o',
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Mark {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Mark::X),
            "o" => Ok(Mark::O),
            other => Err(GameError::InvalidBoard(format!("unknown mark `{other}`"))),
        }
    }
}

/// A single grid square: empty (`None`) or occupied by a mark.
pub type Cell = Option<Mark>;

/// A grid coordinate as submitted by a player.
///
/// Construction does not validate the range; [`Coord::validate`] and the
/// transition function reject anything outside `0..=2`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn validate(self) -> Result<Self, GameError> {
        if self.row >= SIZE || self.col >= SIZE {
            return Err(GameError::OutOfRange {
                row: self.row,
                col: self.col,
            });
        }
        Ok(self)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// All eight winning lines: three rows, three columns, two diagonals.
pub const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(2, 0), (1, 1), (0, 2)],
];

/// The 3×3 grid.
///
/// Serializes as a nested array of nullable mark tags, e.g.
/// `[["x", null, null], [null, "o", null], [null, null, null]]`.
/// `Board` is `Copy`, so search code can pass positions by value.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [[Cell; SIZE]; SIZE],
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rows(cells: [[Cell; SIZE]; SIZE]) -> Self {
        Self { cells }
    }

    pub fn rows(&self) -> &[[Cell; SIZE]; SIZE] {
        &self.cells
    }

    /// Cell at `coord`. The coordinate must already be in range.
    pub fn get(&self, coord: Coord) -> Cell {
        self.cells[coord.row][coord.col]
    }

    pub fn is_occupied(&self, coord: Coord) -> bool {
        self.get(coord).is_some()
    }

    /// Copy of this board with `mark` placed at `coord`.
    pub fn with_mark(mut self, coord: Coord, mark: Mark) -> Self {
        self.cells[coord.row][coord.col] = Some(mark);
        self
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| cell.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.occupied_count() == SIZE * SIZE
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..SIZE)
            .flat_map(|row| (0..SIZE).map(move |col| Coord::new(row, col)))
            .filter(move |coord| !self.is_occupied(*coord))
    }

    /// Mark holding a complete line, if any.
    ///
    /// Lines are checked rows, then columns, then diagonals; the first complete
    /// one decides.
    pub fn line_owner(&self) -> Option<Mark> {
        LINES.iter().find_map(|line| {
            let [a, b, c] = line.map(|(row, col)| self.cells[row][col]);
            match a {
                Some(mark) if b == a && c == a => Some(mark),
                _ => None,
            }
        })
    }

    pub fn has_line(&self) -> bool {
        self.line_owner().is_some()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, row) in self.cells.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            for cell in row {
                let symbol = cell.map(Mark::as_char).unwrap_or('.');
                write!(f, "{symbol}")?;
            }
        }
        Ok(())
    }
}

/// Parses nine cell symbols in row-major order.
///
/// `x`/`o` (any case) are marks, `.`, `-` and `_` are empty. Whitespace and
/// `/` are ignored so `"x.o/.x./..."` and multi-line layouts both work.
impl FromStr for Board {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = [[None; SIZE]; SIZE];
        let mut count = 0usize;

        for ch in s.chars().filter(|c| !c.is_whitespace() && *c != '/') {
            let cell = match ch.to_ascii_lowercase() {
                'x' => Some(Mark::X),
                'o' => Some(Mark::O),
                '.' | '-' | '_' => None,
                other => {
                    return Err(GameError::InvalidBoard(format!(
                        "unexpected symbol `{other}`"
                    )))
                }
            };
            if count >= SIZE * SIZE {
                return Err(GameError::InvalidBoard(
                    "more than 9 cells supplied".to_string(),
                ));
            }
            cells[count / SIZE][count % SIZE] = cell;
            count += 1;
        }

        if count != SIZE * SIZE {
            return Err(GameError::InvalidBoard(format!(
                "expected 9 cells, found {count}"
            )));
        }

        Ok(Self { cells })
    }
}
