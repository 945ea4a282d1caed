use noughts_engine::board::{Board, Coord, Mark, LINES};
use noughts_engine::outcome::{evaluate, Outcome};

#[test]
fn every_line_is_detected_for_both_marks() {
    for mark in [Mark::X, Mark::O] {
        for line in LINES {
            let board = line.iter().fold(Board::empty(), |board, &(row, col)| {
                board.with_mark(Coord::new(row, col), mark)
            });
            assert_eq!(board.line_owner(), Some(mark));
            assert_eq!(evaluate(&board, mark), Some(Outcome::Win(mark)));
        }
    }
}

#[test]
fn evaluation_is_deterministic() {
    let boards = ["xxx/oo./...", "xox/xoo/oxx", "x../.o./..x", "o.x/.o./x.o"];
    for text in boards {
        let board: Board = text.parse().expect("parse");
        for mover in [Mark::X, Mark::O] {
            let first = evaluate(&board, mover);
            for _ in 0..5 {
                assert_eq!(evaluate(&board, mover), first);
            }
        }
    }
}

#[test]
fn open_board_is_undecided() {
    assert_eq!(evaluate(&Board::empty(), Mark::X), None);
    let board: Board = "xo./.x./o..".parse().expect("parse");
    assert_eq!(evaluate(&board, Mark::O), None);
}

#[test]
fn two_in_a_row_is_not_a_win() {
    let board: Board = "xx./oo./...".parse().expect("parse");
    assert_eq!(evaluate(&board, Mark::O), None);
}
