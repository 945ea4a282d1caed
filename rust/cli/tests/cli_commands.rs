use noughts_cli::exit_code;
use noughts_cli::{run, run_with_input};
use serde_json::Value;
use serial_test::serial;
use std::io::{Cursor, Write};

const VARS: [&str; 4] = [
    "NOUGHTS_CONFIG",
    "NOUGHTS_START",
    "NOUGHTS_ADVISOR",
    "NOUGHTS_SEED",
];

struct EnvGuard {
    restores: Vec<(&'static str, Option<String>)>,
}

impl EnvGuard {
    /// Clears every `NOUGHTS_*` variable, then applies `pairs`.
    fn apply(pairs: &[(&'static str, &str)]) -> Self {
        let restores = VARS
            .iter()
            .map(|key| (*key, std::env::var(key).ok()))
            .collect();
        for key in VARS {
            unsafe { std::env::remove_var(key) };
        }
        for (key, value) in pairs {
            unsafe { std::env::set_var(key, value) };
        }
        EnvGuard { restores }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, previous) in &self.restores {
            match previous {
                Some(val) => unsafe { std::env::set_var(key, val) },
                None => unsafe { std::env::remove_var(key) },
            }
        }
    }
}

fn run_cli(args: &[&str], input: &str) -> (i32, String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let mut input = Cursor::new(input.as_bytes().to_vec());
    let mut argv = vec!["noughts"];
    argv.extend_from_slice(args);
    let code = run_with_input(argv, &mut out, &mut err, &mut input);
    (
        code,
        String::from_utf8_lossy(&out).into_owned(),
        String::from_utf8_lossy(&err).into_owned(),
    )
}

#[test]
#[serial]
fn help_lists_every_command() {
    let _env = EnvGuard::apply(&[]);
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run(["noughts", "--help"], &mut out, &mut err);
    assert_eq!(code, exit_code::SUCCESS);
    let stdout = String::from_utf8_lossy(&out);
    for cmd in ["suggest", "play", "cfg"] {
        assert!(stdout.contains(cmd), "help should list `{cmd}`");
    }
}

#[test]
#[serial]
fn unknown_command_prints_usage() {
    let _env = EnvGuard::apply(&[]);
    let (code, out, err) = run_cli(&["deal"], "");
    assert_eq!(code, exit_code::ERROR);
    assert!(out.is_empty());
    assert!(err.contains("Usage: noughts <command> [options]"));
}

#[test]
#[serial]
fn cfg_shows_defaults() {
    let _env = EnvGuard::apply(&[]);
    let (code, out, err) = run_cli(&["cfg"], "");
    assert_eq!(code, 0, "stderr: {err}");

    let json: Value = serde_json::from_str(&out).expect("json");
    assert_eq!(json["starting_mark"]["value"], "x");
    assert_eq!(json["starting_mark"]["source"], "default");
    assert_eq!(json["advisor"]["value"], "alphabeta");
    assert_eq!(json["seed"]["value"], Value::Null);
}

#[test]
#[serial]
fn cfg_reports_file_and_env_sources() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "starting_mark = \"o\"\nseed = 11").expect("write");
    let path = file.path().to_string_lossy().to_string();

    let _env = EnvGuard::apply(&[
        ("NOUGHTS_CONFIG", path.as_str()),
        ("NOUGHTS_SEED", "12"),
        ("NOUGHTS_ADVISOR", "minimax"),
    ]);
    let (code, out, _) = run_cli(&["cfg"], "");
    assert_eq!(code, 0);

    let json: Value = serde_json::from_str(&out).expect("json");
    assert_eq!(json["starting_mark"]["value"], "o");
    assert_eq!(json["starting_mark"]["source"], "file");
    assert_eq!(json["seed"]["value"], 12);
    assert_eq!(json["seed"]["source"], "env");
    assert_eq!(json["advisor"]["source"], "env");
}

#[test]
#[serial]
fn invalid_config_fails_every_command() {
    let _env = EnvGuard::apply(&[("NOUGHTS_ADVISOR", "oracle")]);
    let (code, _, err) = run_cli(&["cfg"], "");
    assert_eq!(code, exit_code::ERROR);
    assert!(err.contains("Invalid configuration"));

    let (code, _, _) = run_cli(&["suggest", "--board", ".........", "--turn", "x"], "");
    assert_eq!(code, exit_code::ERROR);
}

#[test]
#[serial]
fn suggest_uses_configured_advisor_unless_overridden() {
    let _env = EnvGuard::apply(&[("NOUGHTS_ADVISOR", "minimax")]);
    let (code, out, _) = run_cli(
        &["suggest", "--board", "x../.o./...", "--turn", "x", "--json"],
        "",
    );
    assert_eq!(code, 0);
    let json: Value = serde_json::from_str(&out).expect("json");
    assert_eq!(json["advisor"], "minimax");

    let (_, out, _) = run_cli(
        &[
            "suggest", "--board", "x../.o./...", "--turn", "x", "--json", "--advisor", "alphabeta",
        ],
        "",
    );
    let json: Value = serde_json::from_str(&out).expect("json");
    assert_eq!(json["advisor"], "alphabeta");
}

#[test]
#[serial]
fn suggest_on_finished_board_fails() {
    let _env = EnvGuard::apply(&[]);
    let (code, out, err) = run_cli(&["suggest", "--board", "xox/xoo/oxx", "--turn", "x"], "");
    assert_eq!(code, exit_code::ERROR);
    assert!(out.is_empty());
    assert!(err.contains("Result: tie"));
}

#[test]
#[serial]
fn play_honours_configured_start_and_seed() {
    let _env = EnvGuard::apply(&[("NOUGHTS_START", "o"), ("NOUGHTS_SEED", "21")]);
    let (code, out, _) = run_cli(&["play", "--vs", "human"], "q\n");
    assert_eq!(code, 0);
    assert!(out.starts_with("play: vs=human mark=x seed=21\n"));
    assert!(out.contains("o to move"));
    assert!(out.trim_end().ends_with("Quit."));
}

#[test]
#[serial]
fn play_interrupted_by_closed_input() {
    let _env = EnvGuard::apply(&[]);
    let (code, _, err) = run_cli(&["play", "--vs", "human", "--seed", "1"], "0 0\n");
    assert_eq!(code, exit_code::INTERRUPTED);
    assert!(err.contains("Interrupted"));
}

#[test]
#[serial]
fn play_against_advisor_to_completion() {
    let _env = EnvGuard::apply(&[]);
    // Every cell in order; taken cells are skipped with a warning.
    let input = "1 1\n0 0\n0 1\n0 2\n1 0\n1 2\n2 0\n2 1\n2 2\n";
    let (code, out, _) = run_cli(&["play", "--mark", "x", "--seed", "4"], input);
    assert!(out.contains("Result: "), "stdout: {out}");
    assert!(!out.contains("Result: x wins"));
    assert_eq!(code, 0);
}
