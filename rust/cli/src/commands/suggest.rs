//! `suggest`: advisor recommendation for an arbitrary position.

use crate::error::CliError;
use crate::ui;
use noughts_ai::create_advisor;
use noughts_engine::board::{Board, Mark};
use noughts_engine::game::{Match, MatchId};
use noughts_engine::outcome::Outcome;
use std::io::Write;

/// Prints the recommended move for `turn` on `board`.
///
/// Plain output is `row col`; `json` prints `{"row","col","advisor"}`.
/// A decided or full board is an error.
pub fn handle_suggest_command(
    board: &str,
    turn: Mark,
    advisor: &str,
    json: bool,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let board: Board = match board.parse() {
        Ok(board) => board,
        Err(e) => {
            ui::write_error(err, &format!("cannot read --board: {}", e))?;
            return Err(e.into());
        }
    };
    let advisor = create_advisor(advisor)?;
    let position = position(board, turn);

    let coord = match advisor.recommend(&position) {
        Ok(coord) => coord,
        Err(e) => {
            if let Some(outcome) = position.outcome {
                ui::write_error(err, &ui::describe_outcome(outcome))?;
            }
            return Err(e.into());
        }
    };

    if json {
        let body = serde_json::json!({
            "row": coord.row,
            "col": coord.col,
            "advisor": advisor.name(),
        });
        writeln!(out, "{}", body)?;
    } else {
        writeln!(out, "{} {}", coord.row, coord.col)?;
    }
    Ok(())
}

fn position(board: Board, turn: Mark) -> Match {
    let mut position = Match::new(MatchId::new("cli"), "Local Position", turn);
    position.board = board;
    position.outcome = board
        .line_owner()
        .map(Outcome::Win)
        .or_else(|| board.is_full().then_some(Outcome::Tie));
    position
}
