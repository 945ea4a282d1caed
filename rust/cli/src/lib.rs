//! # Noughts CLI Library
//!
//! Command-line access to the tic-tac-toe rules and move advisors without
//! running the web server.
//!
//! ## Main Entry Point
//!
//! [`run`] parses arguments, executes the subcommand and returns the exit code.
//!
//! ```
//! let mut out = Vec::new();
//! let mut err = Vec::new();
//! let args = ["noughts", "suggest", "--board", "xx./oo./...", "--turn", "x"];
//! let code = noughts_cli::run(args, &mut out, &mut err);
//! assert_eq!(code, 0);
//! assert_eq!(String::from_utf8(out).unwrap(), "0 2\n");
//! ```
//!
//! ## Available Subcommands
//!
//! - `suggest`: Recommend a move for a position
//! - `play`: Play a local match against the advisor or hot-seat
//! - `cfg`: Display the resolved configuration

use clap::Parser;
use std::io::{BufRead, Write};
pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod ui;

use cli::{Commands, NoughtsCli};
use commands::{PlayOptions, handle_cfg_command, handle_play_command, handle_suggest_command};

pub use error::CliError;

const COMMANDS: &[&str] = &["suggest", "play", "cfg"];

/// Main entry point for the CLI application. `play` reads moves from stdin.
///
/// Exit code: `0` for success, `2` for errors, `130` when input closes mid-game.
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let stdin = std::io::stdin();
    let mut stdin_lock = stdin.lock();
    run_with_input(args, out, err, &mut stdin_lock)
}

/// [`run`] with an explicit input stream for `play`.
pub fn run_with_input<I, S>(
    args: I,
    out: &mut dyn Write,
    err: &mut dyn Write,
    input: &mut dyn BufRead,
) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match NoughtsCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return usage_error(e, out, err),
    };

    let result = match cli.cmd {
        Commands::Cfg => handle_cfg_command(out, err),
        Commands::Suggest {
            board,
            turn,
            advisor,
            json,
        } => config::load_with_sources()
            .map_err(CliError::from)
            .and_then(|resolved| {
                let advisor = advisor.unwrap_or(resolved.config.advisor);
                handle_suggest_command(&board, turn.into(), &advisor, json, out, err)
            }),
        Commands::Play {
            mark,
            vs,
            advisor,
            seed,
        } => config::load_with_sources()
            .map_err(CliError::from)
            .and_then(|resolved| {
                let options = PlayOptions {
                    human: mark.into(),
                    vs,
                    starting_mark: resolved.config.starting_mark,
                    advisor: advisor.unwrap_or(resolved.config.advisor),
                    seed: seed.or(resolved.config.seed),
                };
                handle_play_command(&options, out, err, input)
            }),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            let _ = writeln!(err, "Error: {}", e);
            match e {
                CliError::Interrupted(_) => exit_code::INTERRUPTED,
                _ => exit_code::ERROR,
            }
        }
    }
}

fn usage_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version go to stdout and succeed
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        if write!(out, "{}", e).is_err() {
            return exit_code::ERROR;
        }
        return exit_code::SUCCESS;
    }

    if writeln!(err, "{}", e).is_err()
        || writeln!(err).is_err()
        || writeln!(err, "Usage: noughts <command> [options]\n").is_err()
        || writeln!(err, "Commands:").is_err()
    {
        return exit_code::ERROR;
    }
    for c in COMMANDS {
        if writeln!(err, "  {}", c).is_err() {
            return exit_code::ERROR;
        }
    }
    let _ = writeln!(err, "\nFor full help, run: noughts --help");
    exit_code::ERROR
}
