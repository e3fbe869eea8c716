use super::board::Board;
use super::game_state::TicTacToeGameState;
use super::types::Mark;
use super::win_detector::has_won;

const WIN_SCORE: i32 = 10;
const DRAW_SCORE: i32 = 0;

pub struct BotInput {
    pub board: Board,
    pub bot_mark: Mark,
}

impl BotInput {
    /// The bot always plays the mark whose turn it currently is.
    pub fn from_game_state(state: &TicTacToeGameState) -> Self {
        Self {
            board: *state.board(),
            bot_mark: state.current_mark(),
        }
    }
}

pub fn calculate_move(input: BotInput) -> Option<usize> {
    let human_mark = input.bot_mark.opponent()?;
    calculate_best_move(&input.board, input.bot_mark, human_mark)
}

/// Full-depth minimax over every remaining cell. Candidates are scanned in
/// ascending index order and only a strictly greater score replaces the
/// current best, so ties resolve to the lowest index.
pub fn calculate_best_move(board: &Board, bot_mark: Mark, human_mark: Mark) -> Option<usize> {
    let mut board = *board;

    let mut best_move = None;
    let mut best_score = i32::MIN;

    for index in board.available_moves() {
        board.apply_move(index, bot_mark);
        let score = minimax(&mut board, human_mark, bot_mark, human_mark);
        board.clear(index);

        if score > best_score {
            best_score = score;
            best_move = Some(index);
        }
    }

    best_move
}

/// Value of `board` for the bot with `to_move` about to play.
///
/// Terminal checks run in a fixed order: human win (-10), bot win (+10),
/// full board (0). No depth discount is applied.
pub fn minimax(board: &mut Board, to_move: Mark, bot_mark: Mark, human_mark: Mark) -> i32 {
    if has_won(board, human_mark) {
        return -WIN_SCORE;
    }
    if has_won(board, bot_mark) {
        return WIN_SCORE;
    }

    let available_moves = board.available_moves();
    if available_moves.is_empty() {
        return DRAW_SCORE;
    }

    let is_maximizing = to_move == bot_mark;
    let next_to_move = if is_maximizing { human_mark } else { bot_mark };
    let mut best = if is_maximizing { i32::MIN } else { i32::MAX };

    for index in available_moves {
        board.apply_move(index, to_move);
        let score = minimax(board, next_to_move, bot_mark, human_mark);
        board.clear(index);

        best = if is_maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }

    best
}
