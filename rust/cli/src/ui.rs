//! UI helper functions for terminal output formatting.

use noughts_engine::board::{Board, Coord, Mark};
use noughts_engine::outcome::Outcome;
use std::io::Write;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

/// Grid with row and column indices, `.` for empty cells.
///
/// ```
/// use noughts_cli::ui::render_board;
/// use noughts_engine::board::Board;
///
/// let board: Board = "x../.o./...".parse().unwrap();
/// assert_eq!(
///     render_board(&board),
///     "    0 1 2\n  0 x . .\n  1 . o .\n  2 . . ."
/// );
/// ```
pub fn render_board(board: &Board) -> String {
    let mut lines = vec!["    0 1 2".to_string()];
    for (idx, row) in board.rows().iter().enumerate() {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| cell.map(Mark::as_char).unwrap_or('.').to_string())
            .collect();
        lines.push(format!("  {} {}", idx, cells.join(" ")));
    }
    lines.join("\n")
}

pub fn describe_outcome(outcome: Outcome) -> String {
    match outcome {
        Outcome::Win(mark) => format!("Result: {} wins", mark),
        Outcome::Tie => "Result: tie".to_string(),
    }
}

/// Parses `"row col"`, `"row,col"` or `"rowcol"` into a coordinate.
///
/// Range is not checked here; the engine rejects cells outside the grid.
pub fn parse_coord(input: &str) -> Option<Coord> {
    let digits: Vec<&str> = input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .collect();
    let (row, col) = match digits.as_slice() {
        [row, col] => (row.parse().ok()?, col.parse().ok()?),
        [both] if both.len() == 2 && both.chars().all(|c| c.is_ascii_digit()) => {
            let mut chars = both.chars();
            (
                chars.next()?.to_digit(10)? as usize,
                chars.next()?.to_digit(10)? as usize,
            )
        }
        _ => return None,
    };
    Some(Coord::new(row, col))
}
