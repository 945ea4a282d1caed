//! # Play Command
//!
//! A local match on the terminal, against the advisor or hot-seat.
//!
//! Moves are typed as `row col` (also `row,col` or `rc`); `q` or `quit`
//! leaves the match. A move onto a taken cell changes nothing and asks again.

use crate::cli::Vs;
use crate::error::CliError;
use crate::ui;
use noughts_ai::create_advisor;
use noughts_engine::board::{Coord, Mark};
use noughts_engine::game::{self, Match};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::io::{BufRead, Write};

/// Settings for one `play` invocation.
#[derive(Debug, Clone)]
pub struct PlayOptions {
    /// Mark typed in from `input`; in hot-seat mode both marks are
    pub human: Mark,
    pub vs: Vs,
    pub starting_mark: Mark,
    pub advisor: String,
    /// Seed for the match id and name; random when absent
    pub seed: Option<u64>,
}

/// Runs the game loop until the match is decided or the player quits.
///
/// # Errors
///
/// - `CliError::Config` for an unknown advisor
/// - `CliError::Interrupted` when `input` ends before the match is decided
/// - `CliError::Io` when writing to `out`/`err` fails
pub fn handle_play_command(
    options: &PlayOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
    input: &mut dyn BufRead,
) -> Result<(), CliError> {
    let advisor = create_advisor(&options.advisor)?;
    let seed = options.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut current = game::create(options.starting_mark, &mut rng);

    writeln!(
        out,
        "play: vs={} mark={} seed={}",
        options.vs.as_str(),
        options.human,
        seed
    )?;
    writeln!(out, "Match: {} ({})", current.name, current.id)?;

    loop {
        writeln!(out, "{}", ui::render_board(&current.board))?;
        if let Some(outcome) = current.outcome {
            writeln!(out, "{}", ui::describe_outcome(outcome))?;
            return Ok(());
        }

        let coord = if options.vs == Vs::Advisor && current.turn != options.human {
            let coord = advisor.recommend(&current)?;
            writeln!(
                out,
                "{} ({}) plays {} {}",
                current.turn,
                advisor.name(),
                coord.row,
                coord.col
            )?;
            coord
        } else {
            match prompt_move(&current, out, err, input)? {
                Some(coord) => coord,
                None => {
                    writeln!(out, "Quit.")?;
                    return Ok(());
                }
            }
        };

        match game::apply_move(&current, coord) {
            Ok(next) if next == current => {
                ui::display_warning(err, &format!("cell {} {} is taken", coord.row, coord.col))?;
            }
            Ok(next) => current = next,
            Err(e) => ui::write_error(err, &e.to_string())?,
        }
    }
}

/// Reads lines until one parses as a coordinate. `None` means the player quit.
fn prompt_move(
    current: &Match,
    out: &mut dyn Write,
    err: &mut dyn Write,
    input: &mut dyn BufRead,
) -> Result<Option<Coord>, CliError> {
    loop {
        write!(out, "{} to move (row col, q to quit): ", current.turn)?;
        out.flush()?;

        let Some(line) = read_line(input)? else {
            writeln!(out)?;
            return Err(CliError::Interrupted(
                "input closed before the match was decided".into(),
            ));
        };
        if matches!(line.as_str(), "q" | "quit") {
            return Ok(None);
        }
        match ui::parse_coord(&line) {
            Some(coord) => return Ok(Some(coord)),
            None => ui::write_error(err, &format!("cannot read `{}` as `row col`", line))?,
        }
    }
}

fn read_line(input: &mut dyn BufRead) -> Result<Option<String>, CliError> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn options(vs: Vs, human: Mark) -> PlayOptions {
        PlayOptions {
            human,
            vs,
            starting_mark: Mark::X,
            advisor: "alphabeta".into(),
            seed: Some(3),
        }
    }

    fn play(options: &PlayOptions, input: &str) -> (Result<(), CliError>, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut input = Cursor::new(input.as_bytes().to_vec());
        let result = handle_play_command(options, &mut out, &mut err, &mut input);
        (
            result,
            String::from_utf8(out).expect("utf8"),
            String::from_utf8(err).expect("utf8"),
        )
    }

    #[test]
    fn hot_seat_game_reaches_a_win() {
        let (result, out, err) = play(&options(Vs::Human, Mark::X), "0 0\n1 1\n0 1\n2 2\n0 2\n");
        assert!(result.is_ok(), "stderr: {err}");
        assert!(out.contains("Result: x wins"));
        assert!(out.starts_with("play: vs=human mark=x seed=3\n"));
    }

    #[test]
    fn bad_and_taken_cells_ask_again() {
        let (result, out, err) = play(
            &options(Vs::Human, Mark::X),
            "hello\n0 0\n0 0\n3 3\nq\n",
        );
        assert!(result.is_ok());
        assert!(err.contains("cannot read `hello`"));
        assert!(err.contains("cell 0 0 is taken"));
        assert!(err.contains("out of range"));
        assert!(out.trim_end().ends_with("Quit."));
    }

    #[test]
    fn closed_input_interrupts() {
        let (result, _, _) = play(&options(Vs::Human, Mark::X), "1 1\n");
        assert!(matches!(result, Err(CliError::Interrupted(_))));
    }

    #[test]
    fn advisor_never_loses_to_the_corner_opening() {
        let moves = "0 0\n2 2\n0 2\n2 0\n1 0\n0 1\n1 2\n2 1\n";
        let (result, out, _) = play(&options(Vs::Advisor, Mark::X), moves);
        // The human may run out of legal replies; either way x must not win.
        assert!(!out.contains("Result: x wins"));
        assert!(result.is_ok() || matches!(result, Err(CliError::Interrupted(_))));
        assert!(out.contains("o (alphabeta) plays"));
    }

    #[test]
    fn advisor_opens_when_it_has_the_first_move() {
        let (_, out, _) = play(&options(Vs::Advisor, Mark::O), "q\n");
        assert!(out.contains("x (alphabeta) plays 0 0"));
    }

    #[test]
    fn same_seed_names_the_same_match() {
        let (_, first, _) = play(&options(Vs::Human, Mark::X), "q\n");
        let (_, second, _) = play(&options(Vs::Human, Mark::X), "q\n");
        let header = |text: &str| text.lines().nth(1).map(str::to_string);
        assert_eq!(header(&first), header(&second));
    }

    #[test]
    fn unknown_advisor_fails_before_play() {
        let mut opts = options(Vs::Advisor, Mark::X);
        opts.advisor = "oracle".into();
        let (result, out, _) = play(&opts, "");
        assert!(matches!(result, Err(CliError::Config(_))));
        assert!(out.is_empty());
    }
}
