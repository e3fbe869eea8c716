use super::board::{Board, WIN_LINES};
use super::types::{GameStatus, Mark};

pub fn has_won(board: &Board, mark: Mark) -> bool {
    if mark == Mark::Empty {
        return false;
    }
    let cells = board.cells();
    WIN_LINES
        .iter()
        .any(|line| line.iter().all(|&index| cells[index] == mark))
}

/// Only meaningful once `has_won` is false for both marks: a full board can
/// also be a won board.
pub fn is_draw(board: &Board) -> bool {
    board.is_full()
}

pub fn evaluate(board: &Board) -> GameStatus {
    if has_won(board, Mark::X) {
        GameStatus::XWon
    } else if has_won(board, Mark::O) {
        GameStatus::OWon
    } else if is_draw(board) {
        GameStatus::Draw
    } else {
        GameStatus::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(indices: &[usize], mark: Mark) -> Board {
        let mut board = Board::empty();
        for &index in indices {
            board.apply_move(index, mark);
        }
        board
    }

    #[test]
    fn test_every_win_line_is_detected_for_its_mark_only() {
        for line in WIN_LINES {
            for mark in [Mark::X, Mark::O] {
                let board = board_with(&line, mark);
                assert!(has_won(&board, mark), "{:?} should win on {:?}", mark, line);
                let other = mark.opponent().unwrap();
                assert!(!has_won(&board, other), "{:?} should not win on {:?}", other, line);
            }
        }
    }

    #[test]
    fn test_two_in_a_row_is_not_a_win() {
        let board = board_with(&[0, 1], Mark::X);
        assert!(!has_won(&board, Mark::X));
        assert_eq!(evaluate(&board), GameStatus::InProgress);
    }

    #[test]
    fn test_empty_mark_never_wins() {
        assert!(!has_won(&Board::empty(), Mark::Empty));
    }

    #[test]
    fn test_full_board_without_winner_is_draw() {
        use Mark::{O, X};
        let board = Board::from_cells([X, O, X, X, O, O, O, X, X]);
        assert!(!has_won(&board, X));
        assert!(!has_won(&board, O));
        assert!(is_draw(&board));
        assert_eq!(evaluate(&board), GameStatus::Draw);
    }

    #[test]
    fn test_board_with_empty_cell_is_never_draw() {
        use Mark::{Empty, O, X};
        let won = Board::from_cells([X, X, X, O, O, Empty, Empty, Empty, Empty]);
        assert!(!is_draw(&won));
        let open = Board::from_cells([X, O, X, X, O, O, O, X, Empty]);
        assert!(!is_draw(&open));
    }

    #[test]
    fn test_full_and_won_board_evaluates_as_win() {
        use Mark::{O, X};
        let board = Board::from_cells([X, X, X, O, O, X, X, O, O]);
        assert!(is_draw(&board));
        assert_eq!(evaluate(&board), GameStatus::XWon);
    }
}
