mod board;
mod bot_controller;
mod game_state;
mod types;
mod win_detector;

pub use board::{Board, CELL_COUNT, WIN_LINES};
pub use bot_controller::{BotInput, calculate_best_move, calculate_move, minimax};
pub use game_state::{MoveRejection, TicTacToeGameState};
pub use types::{GameStatus, Mark, Participant};
pub use win_detector::{evaluate, has_won, is_draw};
