use std::fmt;

use crate::ParticipantId;
use super::board::Board;
use super::bot_controller::{BotInput, calculate_move};
use super::types::{GameStatus, Mark, Participant};
use super::win_detector::{has_won, is_draw};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveRejection {
    GameOver,
    NotYourTurn,
    OutOfBounds,
    CellOccupied,
}

impl fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            MoveRejection::GameOver => "Game is already over",
            MoveRejection::NotYourTurn => "Not your turn",
            MoveRejection::OutOfBounds => "Position out of bounds",
            MoveRejection::CellOccupied => "Cell is already marked",
        };
        f.write_str(reason)
    }
}

/// A single 3x3 match. The first participant always plays X and moves first.
#[derive(Clone, Debug)]
pub struct TicTacToeGameState {
    board: Board,
    player_x: ParticipantId,
    player_o: Participant,
    current_mark: Mark,
    status: GameStatus,
    last_move: Option<usize>,
}

impl TicTacToeGameState {
    pub fn new(player_x: ParticipantId, player_o: Participant) -> Self {
        Self {
            board: Board::empty(),
            player_x,
            player_o,
            current_mark: Mark::X,
            status: GameStatus::InProgress,
            last_move: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player_x(&self) -> &ParticipantId {
        &self.player_x
    }

    pub fn player_o(&self) -> &Participant {
        &self.player_o
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn current_mark(&self) -> Mark {
        self.current_mark
    }

    pub fn last_move(&self) -> Option<usize> {
        self.last_move
    }

    pub fn participant_for(&self, mark: Mark) -> Option<Participant> {
        match mark {
            Mark::X => Some(Participant::Player(self.player_x.clone())),
            Mark::O => Some(self.player_o.clone()),
            Mark::Empty => None,
        }
    }

    pub fn current_participant(&self) -> Participant {
        // current_mark is only ever X or O.
        self.participant_for(self.current_mark)
            .unwrap_or_else(|| Participant::Player(self.player_x.clone()))
    }

    pub fn is_automated_turn(&self) -> bool {
        self.status == GameStatus::InProgress && self.current_participant().is_automated()
    }

    pub fn is_participant(&self, player_id: &ParticipantId) -> bool {
        &self.player_x == player_id || self.player_o.player_id() == Some(player_id)
    }

    pub fn place_mark(&mut self, actor: &Participant, index: usize) -> Result<(), MoveRejection> {
        if self.status.is_over() {
            return Err(MoveRejection::GameOver);
        }

        if actor != &self.current_participant() {
            return Err(MoveRejection::NotYourTurn);
        }

        match self.board.cell(index) {
            None => return Err(MoveRejection::OutOfBounds),
            Some(Mark::Empty) => {}
            Some(_) => return Err(MoveRejection::CellOccupied),
        }

        self.board.apply_move(index, self.current_mark);
        self.last_move = Some(index);

        self.check_game_over();

        if self.status == GameStatus::InProgress {
            self.switch_turn();
        }

        Ok(())
    }

    /// Computes and applies the automated opponent's move. Returns the cell
    /// played, or `None` when it is not the bot's turn.
    pub fn play_automated_turn(&mut self) -> Option<usize> {
        if !self.is_automated_turn() {
            return None;
        }

        let index = calculate_move(BotInput::from_game_state(self))?;
        self.place_mark(&Participant::Automated, index).ok()?;
        Some(index)
    }

    pub fn get_winner(&self) -> Option<Participant> {
        self.status
            .winner_mark()
            .and_then(|mark| self.participant_for(mark))
    }

    fn switch_turn(&mut self) {
        self.current_mark = match self.current_mark {
            Mark::X => Mark::O,
            _ => Mark::X,
        };
    }

    /// Only the mark that just moved can have completed a line.
    fn check_game_over(&mut self) {
        if has_won(&self.board, self.current_mark) {
            self.status = match self.current_mark {
                Mark::O => GameStatus::OWon,
                _ => GameStatus::XWon,
            };
            return;
        }

        if is_draw(&self.board) {
            self.status = GameStatus::Draw;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> ParticipantId {
        ParticipantId::new("alice")
    }

    fn bob() -> ParticipantId {
        ParticipantId::new("bob")
    }

    fn player(id: ParticipantId) -> Participant {
        Participant::Player(id)
    }

    fn pvp() -> TicTacToeGameState {
        TicTacToeGameState::new(alice(), player(bob()))
    }

    #[test]
    fn test_new_game_starts_with_x_and_first_participant() {
        let state = pvp();
        assert_eq!(state.current_mark(), Mark::X);
        assert_eq!(state.current_participant(), player(alice()));
        assert_eq!(state.status(), GameStatus::InProgress);
        assert_eq!(state.board(), &Board::empty());
    }

    #[test]
    fn test_place_mark_switches_turn() {
        let mut state = pvp();
        state.place_mark(&player(alice()), 4).unwrap();
        assert_eq!(state.board().cell(4), Some(Mark::X));
        assert_eq!(state.current_participant(), player(bob()));
        assert_eq!(state.last_move(), Some(4));
    }

    #[test]
    fn test_place_mark_rejects_wrong_actor_without_changes() {
        let mut state = pvp();
        assert_eq!(state.place_mark(&player(bob()), 0), Err(MoveRejection::NotYourTurn));
        assert_eq!(
            state.place_mark(&player(ParticipantId::new("mallory")), 0),
            Err(MoveRejection::NotYourTurn)
        );
        assert_eq!(state.board(), &Board::empty());
        assert_eq!(state.current_participant(), player(alice()));
    }

    #[test]
    fn test_place_mark_rejects_occupied_and_out_of_bounds() {
        let mut state = pvp();
        state.place_mark(&player(alice()), 0).unwrap();
        assert_eq!(state.place_mark(&player(bob()), 0), Err(MoveRejection::CellOccupied));
        assert_eq!(state.place_mark(&player(bob()), 9), Err(MoveRejection::OutOfBounds));
        assert_eq!(state.current_participant(), player(bob()));
    }

    #[test]
    fn test_row_completes_game_for_x() {
        let mut state = pvp();
        for (actor, index) in [(alice(), 0), (bob(), 3), (alice(), 1), (bob(), 4), (alice(), 2)] {
            state.place_mark(&player(actor), index).unwrap();
        }
        assert_eq!(state.status(), GameStatus::XWon);
        assert_eq!(state.get_winner(), Some(player(alice())));
        assert_eq!(state.place_mark(&player(bob()), 5), Err(MoveRejection::GameOver));
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let mut state = pvp();
        // X O X / X O O / O X X
        let moves = [
            (alice(), 0), (bob(), 1), (alice(), 2), (bob(), 4), (alice(), 3),
            (bob(), 5), (alice(), 7), (bob(), 6), (alice(), 8),
        ];
        for (actor, index) in moves {
            state.place_mark(&player(actor), index).unwrap();
        }
        assert_eq!(state.status(), GameStatus::Draw);
        assert_eq!(state.get_winner(), None);
    }

    #[test]
    fn test_automated_turn_only_when_bot_to_move() {
        let mut state = TicTacToeGameState::new(alice(), Participant::Automated);
        assert!(!state.is_automated_turn());
        assert_eq!(state.play_automated_turn(), None);

        state.place_mark(&player(alice()), 0).unwrap();
        assert!(state.is_automated_turn());
        assert_eq!(state.play_automated_turn(), Some(4));
        assert_eq!(state.board().cell(4), Some(Mark::O));
        assert_eq!(state.current_participant(), player(alice()));
    }

    #[test]
    fn test_human_cannot_move_for_bot() {
        let mut state = TicTacToeGameState::new(alice(), Participant::Automated);
        state.place_mark(&player(alice()), 0).unwrap();
        assert_eq!(state.place_mark(&player(alice()), 1), Err(MoveRejection::NotYourTurn));
    }

    #[test]
    fn test_is_participant() {
        let state = TicTacToeGameState::new(alice(), Participant::Automated);
        assert!(state.is_participant(&alice()));
        assert!(!state.is_participant(&bob()));
        assert!(pvp().is_participant(&bob()));
    }
}
