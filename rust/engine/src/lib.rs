//! # noughts-engine: Tic-Tac-Toe State Model
//!
//! The authoritative game rules for a 3×3 match: the match record, the pure
//! transition that applies a move, and the evaluator that derives the terminal
//! outcome. Nothing here performs I/O or holds shared state; every function
//! returns a new value and leaves its inputs untouched.
//!
//! ## Core Modules
//!
//! - [`board`] - Marks, cells, coordinates and the 3×3 grid
//! - [`outcome`] - Win/tie detection over a board just after a move
//! - [`game`] - The match record, creation and the move transition
//! - [`names`] - Display-name generation from an injected random source
//! - [`errors`] - Error types for rejected transitions
//!
//! ## Quick Start
//!
//! ```rust
//! use noughts_engine::board::{Coord, Mark};
//! use noughts_engine::game::create;
//! use noughts_engine::outcome::Outcome;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let mut game = create(Mark::X, &mut rng);
//!
//! for (row, col) in [(0, 0), (1, 1), (0, 1), (2, 2), (0, 2)] {
//!     game = game.apply_move(Coord::new(row, col)).unwrap();
//! }
//!
//! assert_eq!(game.outcome, Some(Outcome::Win(Mark::X)));
//! assert_eq!(game.turn, Mark::O);
//! ```
//!
//! ## Rejected Moves
//!
//! Coordinates outside the grid and moves on a decided match are errors.
//! A move onto an occupied cell is not: it returns the match unchanged.
//!
//! ```rust
//! use noughts_engine::board::{Coord, Mark};
//! use noughts_engine::errors::GameError;
//! use noughts_engine::game::{Match, MatchId};
//!
//! let game = Match::new(MatchId::new("demo"), "Blue Hawk", Mark::O);
//! assert_eq!(
//!     game.apply_move(Coord::new(3, 1)),
//!     Err(GameError::OutOfRange { row: 3, col: 1 })
//! );
//! ```

pub mod board;
pub mod errors;
pub mod game;
pub mod names;
pub mod outcome;
