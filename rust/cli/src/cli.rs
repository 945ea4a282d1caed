//! Command-line argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use noughts_engine::board::Mark;

#[derive(Parser, Debug)]
#[command(
    name = "noughts",
    version,
    about = "Noughts: tic-tac-toe rules, advisor and local play"
)]
pub struct NoughtsCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recommend a move for a position
    Suggest {
        /// Grid as three rows of `x`, `o` or `.`, e.g. "x.o/.x./..."
        #[arg(long)]
        board: String,
        /// Side to move
        #[arg(long, value_enum)]
        turn: Side,
        /// Advisor name; defaults to the configured one
        #[arg(long)]
        advisor: Option<String>,
        /// Print the recommendation as JSON
        #[arg(long)]
        json: bool,
    },
    /// Play a local match on stdin/stdout
    Play {
        /// Mark controlled by the person at the keyboard
        #[arg(long, value_enum, default_value_t = Side::X)]
        mark: Side,
        #[arg(long, value_enum, default_value_t = Vs::Advisor)]
        vs: Vs,
        #[arg(long)]
        advisor: Option<String>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Side {
    X,
    O,
}

impl From<Side> for Mark {
    fn from(side: Side) -> Self {
        match side {
            Side::X => Mark::X,
            Side::O => Mark::O,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Vs {
    Advisor,
    Human,
}

impl Vs {
    pub fn as_str(self) -> &'static str {
        match self {
            Vs::Advisor => "advisor",
            Vs::Human => "human",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_suggest_arguments() {
        let cli = NoughtsCli::try_parse_from([
            "noughts", "suggest", "--board", "x../.o./...", "--turn", "x", "--json",
        ])
        .expect("parse");
        match cli.cmd {
            Commands::Suggest {
                board, turn, json, ..
            } => {
                assert_eq!(board, "x../.o./...");
                assert_eq!(turn, Side::X);
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn play_defaults() {
        let cli = NoughtsCli::try_parse_from(["noughts", "play"]).expect("parse");
        match cli.cmd {
            Commands::Play {
                mark,
                vs,
                advisor,
                seed,
            } => {
                assert_eq!(mark, Side::X);
                assert_eq!(vs, Vs::Advisor);
                assert!(advisor.is_none());
                assert!(seed.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn suggest_requires_turn() {
        assert!(NoughtsCli::try_parse_from(["noughts", "suggest", "--board", "........."]).is_err());
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory;
        NoughtsCli::command().debug_assert();
    }
}
