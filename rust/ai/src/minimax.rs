//! Exhaustive minimax search over the 3×3 game tree.
//!
//! Scores are taken from the perspective of the side to move at the root
//! (the maximizer): a line completed by the maximizer is worth +10, a line
//! completed by the opponent -10 and a full board without a line 0. There is
//! no depth discount, so every winning move scores the same and ties are
//! broken by the first empty cell in row-major order.
//!
//! Each recursion level works on its own [`Board`] value; the caller's match
//! is never touched.

use crate::{AdvisorError, MoveAdvisor};
use noughts_engine::board::{Board, Coord, Mark};
use noughts_engine::game::Match;
use noughts_engine::outcome::{evaluate, Outcome};

pub const MINIMAX: &str = "minimax";
pub const ALPHABETA: &str = "alphabeta";

const WIN_SCORE: i32 = 10;
const LOSS_SCORE: i32 = -10;
const TIE_SCORE: i32 = 0;

/// Perfect-play advisor.
///
/// # Example
///
/// ```rust
/// use noughts_ai::minimax::MinimaxAdvisor;
/// use noughts_ai::MoveAdvisor;
/// use noughts_engine::board::{Coord, Mark};
/// use noughts_engine::game::{Match, MatchId};
///
/// // o must block the top row.
/// let mut game = Match::new(MatchId::new("m"), "Deep Echo", Mark::X);
/// for (row, col) in [(0, 0), (1, 1), (0, 1)] {
///     game = game.apply_move(Coord::new(row, col)).unwrap();
/// }
///
/// let plain = MinimaxAdvisor::new().recommend(&game).unwrap();
/// let pruned = MinimaxAdvisor::with_pruning().recommend(&game).unwrap();
/// assert_eq!(plain, Coord::new(0, 2));
/// assert_eq!(plain, pruned);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinimaxAdvisor {
    pruning: bool,
}

impl MinimaxAdvisor {
    pub fn new() -> Self {
        Self { pruning: false }
    }

    /// Alpha-beta variant; visits fewer nodes and returns the same move.
    pub fn with_pruning() -> Self {
        Self { pruning: true }
    }

    pub fn uses_pruning(&self) -> bool {
        self.pruning
    }

    /// Best cell for `mover` on `board` together with its score.
    ///
    /// `None` when the board has no empty cell.
    pub fn best_move(&self, board: Board, mover: Mark) -> Option<(Coord, i32)> {
        let mut best: Option<(Coord, i32)> = None;
        let mut alpha = i32::MIN;

        for coord in board.empty_cells() {
            let next = board.with_mark(coord, mover);
            let score = if self.pruning {
                self.score_after(next, mover, mover, alpha, i32::MAX)
            } else {
                self.score_after(next, mover, mover, i32::MIN, i32::MAX)
            };

            // Strict comparison keeps the earliest cell on equal scores.
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((coord, score));
                alpha = alpha.max(score);
            }
        }
        best
    }

    /// Value of `board` just after `last_mover` played, for `maximizer`.
    fn score_after(
        &self,
        board: Board,
        last_mover: Mark,
        maximizer: Mark,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        match evaluate(&board, last_mover) {
            Some(Outcome::Win(winner)) if winner == maximizer => return WIN_SCORE,
            Some(Outcome::Win(_)) => return LOSS_SCORE,
            Some(Outcome::Tie) => return TIE_SCORE,
            None => {}
        }

        let to_move = last_mover.opponent();
        let maximizing = to_move == maximizer;
        let mut value = if maximizing { i32::MIN } else { i32::MAX };

        for coord in board.empty_cells() {
            let child = self.score_after(
                board.with_mark(coord, to_move),
                to_move,
                maximizer,
                alpha,
                beta,
            );

            if maximizing {
                value = value.max(child);
                alpha = alpha.max(value);
            } else {
                value = value.min(child);
                beta = beta.min(value);
            }

            if self.pruning && alpha >= beta {
                break;
            }
        }
        value
    }
}

impl MoveAdvisor for MinimaxAdvisor {
    fn recommend(&self, game: &Match) -> Result<Coord, AdvisorError> {
        if game.is_decided() {
            return Err(AdvisorError::MatchDecided);
        }
        self.best_move(game.board, game.turn)
            .map(|(coord, _)| coord)
            .ok_or(AdvisorError::NoLegalMoves)
    }

    fn name(&self) -> &str {
        if self.pruning { ALPHABETA } else { MINIMAX }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noughts_engine::game::MatchId;

    fn game_after(start: Mark, moves: &[(usize, usize)]) -> Match {
        moves
            .iter()
            .fold(Match::new(MatchId::new("m"), "Cold Wolf", start), |g, &(r, c)| {
                g.apply_move(Coord::new(r, c)).expect("legal move")
            })
    }

    #[test]
    fn advisor_names() {
        assert_eq!(MinimaxAdvisor::new().name(), "minimax");
        assert_eq!(MinimaxAdvisor::with_pruning().name(), "alphabeta");
        assert!(MinimaxAdvisor::with_pruning().uses_pruning());
    }

    #[test]
    fn forcing_block_ties_with_immediate_win() {
        // x x .
        // o o .
        // . . .   o to move: (0, 2) blocks and forks, (1, 2) wins at once.
        // Without a depth discount both score +10 and the earlier cell wins.
        let game = game_after(Mark::O, &[(1, 0), (0, 0), (1, 1), (0, 1)]);
        assert_eq!(game.turn, Mark::O);
        assert_eq!(
            MinimaxAdvisor::new().best_move(game.board, game.turn),
            Some((Coord::new(0, 2), WIN_SCORE))
        );
    }

    #[test]
    fn blocks_opponent_line() {
        // x . .
        // . o .
        // x . .   o to move must take (1, 0)
        let game = game_after(Mark::X, &[(0, 0), (1, 1), (2, 0)]);
        assert_eq!(MinimaxAdvisor::new().recommend(&game), Ok(Coord::new(1, 0)));
    }

    #[test]
    fn empty_board_picks_first_cell_on_equal_scores() {
        // Every opening draws under perfect play, so row-major order decides.
        let (coord, score) = MinimaxAdvisor::new()
            .best_move(Board::empty(), Mark::X)
            .expect("move");
        assert_eq!(coord, Coord::new(0, 0));
        assert_eq!(score, TIE_SCORE);
    }

    #[test]
    fn decided_match_fails_fast() {
        let game = game_after(Mark::X, &[(0, 0), (1, 1), (0, 1), (2, 2), (0, 2)]);
        assert_eq!(
            MinimaxAdvisor::with_pruning().recommend(&game),
            Err(AdvisorError::MatchDecided)
        );
    }

    #[test]
    fn full_board_without_outcome_has_no_moves() {
        // Only reachable through a hand-built record.
        let board: Board = "xox/xoo/oxx".parse().expect("board");
        let mut game = Match::new(MatchId::new("m"), "n", Mark::O);
        game.board = board;
        assert_eq!(
            MinimaxAdvisor::new().recommend(&game),
            Err(AdvisorError::NoLegalMoves)
        );
    }

    #[test]
    fn recommend_leaves_match_untouched() {
        let game = game_after(Mark::X, &[(1, 1), (0, 0)]);
        let before = game.clone();
        let _ = MinimaxAdvisor::new().recommend(&game).expect("move");
        let _ = MinimaxAdvisor::with_pruning().recommend(&game).expect("move");
        assert_eq!(game, before);
    }
}
