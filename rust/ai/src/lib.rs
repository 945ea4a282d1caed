//! # noughts-ai: Move Advisors for Tic-Tac-Toe
//!
//! Recommends a move for the side to move in a [`Match`]. Advisors are pure:
//! they read the match, search over board copies and return a coordinate.
//!
//! ## Core Components
//!
//! - [`MoveAdvisor`] - Trait implemented by every advisor
//! - [`minimax`] - Exhaustive game-tree search, optionally with alpha-beta pruning
//! - [`create_advisor`] - Factory that builds an advisor from its name
//!
//! ## Quick Start
//!
//! ```rust
//! use noughts_ai::{create_advisor, MoveAdvisor};
//! use noughts_engine::board::{Coord, Mark};
//! use noughts_engine::game::{Match, MatchId};
//!
//! let advisor = create_advisor("minimax").unwrap();
//!
//! // x x .
//! // o o .
//! // . . .
//! let mut game = Match::new(MatchId::new("demo"), "Gold Hawk", Mark::X);
//! for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
//!     game = game.apply_move(Coord::new(row, col)).unwrap();
//! }
//!
//! assert_eq!(advisor.recommend(&game).unwrap(), Coord::new(0, 2));
//! ```
//!
//! ## Advisor Types
//!
//! - `"minimax"` - Plain exhaustive minimax
//! - `"alphabeta"` - Same search with alpha-beta pruning; always picks the same move

use noughts_engine::board::Coord;
use noughts_engine::game::Match;
use thiserror::Error;

pub mod minimax;

/// Names accepted by [`create_advisor`].
pub const ADVISOR_NAMES: [&str; 2] = [minimax::MINIMAX, minimax::ALPHABETA];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdvisorError {
    #[error("match is already decided")]
    MatchDecided,
    #[error("no empty cell left to play")]
    NoLegalMoves,
    #[error("unknown advisor `{0}` (expected one of: minimax, alphabeta)")]
    UnknownAdvisor(String),
}

/// Interface shared by move advisors.
///
/// Implementations must not modify the match they are given and must always
/// terminate.
///
/// # Example Implementation
///
/// ```rust
/// use noughts_ai::{AdvisorError, MoveAdvisor};
/// use noughts_engine::board::Coord;
/// use noughts_engine::game::Match;
///
/// struct FirstEmpty;
///
/// impl MoveAdvisor for FirstEmpty {
///     fn recommend(&self, game: &Match) -> Result<Coord, AdvisorError> {
///         if game.is_decided() {
///             return Err(AdvisorError::MatchDecided);
///         }
///         game.board.empty_cells().next().ok_or(AdvisorError::NoLegalMoves)
///     }
///
///     fn name(&self) -> &str {
///         "first-empty"
///     }
/// }
/// ```
pub trait MoveAdvisor: Send + Sync {
    /// Best coordinate for `game.turn`.
    fn recommend(&self, game: &Match) -> Result<Coord, AdvisorError>;

    fn name(&self) -> &str;
}

/// Builds an advisor from its name.
///
/// ```rust
/// use noughts_ai::{create_advisor, AdvisorError};
///
/// assert_eq!(create_advisor("alphabeta").unwrap().name(), "alphabeta");
/// assert!(matches!(
///     create_advisor("oracle"),
///     Err(AdvisorError::UnknownAdvisor(_))
/// ));
/// ```
pub fn create_advisor(name: &str) -> Result<Box<dyn MoveAdvisor>, AdvisorError> {
    match name.trim().to_ascii_lowercase().as_str() {
        minimax::MINIMAX => Ok(Box::new(minimax::MinimaxAdvisor::new())),
        minimax::ALPHABETA => Ok(Box::new(minimax::MinimaxAdvisor::with_pruning())),
        _ => Err(AdvisorError::UnknownAdvisor(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_knows_every_listed_name() {
        for name in ADVISOR_NAMES {
            let advisor = create_advisor(name).expect("known advisor");
            assert_eq!(advisor.name(), name);
        }
    }

    #[test]
    fn factory_is_case_insensitive() {
        assert_eq!(create_advisor(" MiniMax ").expect("known").name(), "minimax");
    }

    #[test]
    fn factory_rejects_unknown_names() {
        assert_eq!(
            create_advisor("random").err(),
            Some(AdvisorError::UnknownAdvisor("random".into()))
        );
    }
}
