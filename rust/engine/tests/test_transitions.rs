use noughts_engine::board::{Board, Coord, Mark};
use noughts_engine::errors::GameError;
use noughts_engine::game::{apply_move, create, Match, MatchId};
use noughts_engine::outcome::{evaluate, Outcome};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::collections::HashSet;

fn fresh(start: Mark) -> Match {
    Match::new(MatchId::new("t-1"), "Test Match", start)
}

fn play(start: Mark, moves: &[(usize, usize)]) -> Match {
    moves.iter().fold(fresh(start), |game, &(row, col)| {
        apply_move(&game, Coord::new(row, col)).expect("legal move")
    })
}

/// Every position reachable through legal play from either starting mark.
fn reachable_positions() -> Vec<Match> {
    let mut seen = HashSet::new();
    let mut stack = vec![fresh(Mark::X), fresh(Mark::O)];
    let mut out = Vec::new();

    while let Some(game) = stack.pop() {
        if !seen.insert((game.board, game.turn, game.outcome)) {
            continue;
        }
        if !game.is_decided() {
            for coord in game.board.empty_cells() {
                stack.push(apply_move(&game, coord).expect("legal move"));
            }
        }
        out.push(game);
    }
    out
}

#[test]
fn create_starts_empty_with_requested_mark() {
    let mut rng = ChaCha20Rng::seed_from_u64(2024);
    let game = create(Mark::X, &mut rng);
    assert_eq!(game.board, Board::empty());
    assert_eq!(game.occupied_cells(), 0);
    assert_eq!(game.turn, Mark::X);
    assert_eq!(game.outcome, None);
    assert!(!game.id.as_str().is_empty());
    assert_eq!(game.name.split(' ').count(), 2);
}

#[test]
fn top_row_win_is_credited_to_x_and_turn_passes_to_o() {
    let game = play(Mark::X, &[(0, 0), (1, 1), (0, 1), (2, 2), (0, 2)]);
    assert_eq!(game.outcome, Some(Outcome::Win(Mark::X)));
    assert_eq!(game.turn, Mark::O);
    assert_eq!(game.occupied_cells(), 5);
}

#[test]
fn filling_the_board_without_a_line_is_a_tie() {
    // x o x
    // x o o
    // o x x
    let game = play(
        Mark::X,
        &[
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 1),
            (1, 0),
            (1, 2),
            (2, 1),
            (2, 0),
            (2, 2),
        ],
    );
    assert!(game.board.is_full());
    assert_eq!(game.outcome, Some(Outcome::Tie));
}

#[test]
fn move_onto_cell_holding_o_returns_identical_match() {
    let game = play(Mark::X, &[(0, 0), (1, 1)]);
    assert_eq!(game.turn, Mark::X);
    let replay = apply_move(&game, Coord::new(1, 1)).expect("no-op is not an error");
    assert_eq!(replay, game);
    assert_eq!(replay.turn, Mark::X);
}

#[test]
fn out_of_range_coordinates_are_rejected() {
    let game = fresh(Mark::X);
    for (row, col) in [(3, 0), (0, 3), (7, 9)] {
        assert_eq!(
            apply_move(&game, Coord::new(row, col)),
            Err(GameError::OutOfRange { row, col })
        );
    }
}

#[test]
fn decided_match_accepts_no_further_moves() {
    let game = play(Mark::X, &[(0, 0), (1, 1), (0, 1), (2, 2), (0, 2)]);
    assert_eq!(
        apply_move(&game, Coord::new(2, 0)),
        Err(GameError::MatchDecided)
    );
}

#[test]
fn apply_move_never_mutates_input() {
    let game = play(Mark::O, &[(2, 2), (0, 0)]);
    let snapshot = game.clone();
    let _ = apply_move(&game, Coord::new(1, 1)).expect("legal move");
    assert_eq!(game, snapshot);
}

#[test]
fn legal_moves_touch_exactly_one_cell_and_flip_turn() {
    for game in reachable_positions().into_iter().filter(|g| !g.is_decided()) {
        for coord in game.board.empty_cells() {
            let next = apply_move(&game, coord).expect("legal move");

            assert_eq!(next.id, game.id);
            assert_eq!(next.name, game.name);
            assert_eq!(next.board.get(coord), Some(game.turn));
            assert_eq!(next.turn, game.turn.opponent());
            assert_eq!(next.occupied_cells(), game.occupied_cells() + 1);
            assert_eq!(next.outcome, evaluate(&next.board, game.turn));

            for row in 0..3 {
                for col in 0..3 {
                    let other = Coord::new(row, col);
                    if other != coord {
                        assert_eq!(next.board.get(other), game.board.get(other));
                    }
                }
            }
        }
    }
}

#[test]
fn occupied_cells_are_no_ops_everywhere() {
    for game in reachable_positions().into_iter().filter(|g| !g.is_decided()) {
        for row in 0..3 {
            for col in 0..3 {
                let coord = Coord::new(row, col);
                if game.board.is_occupied(coord) {
                    assert_eq!(apply_move(&game, coord).expect("no-op"), game);
                }
            }
        }
    }
}

#[test]
fn decided_positions_never_credit_the_opponent() {
    for game in reachable_positions() {
        if let Some(Outcome::Win(winner)) = game.outcome {
            // The side that just moved is the opponent of the side to move.
            assert_eq!(winner, game.turn.opponent());
        }
    }
}
