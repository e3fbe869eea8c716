use reaper_common::ParticipantId;
use reaper_common::engine::session::{SessionSnapshot, SessionState};
use reaper_common::games::tictactoe::{CELL_COUNT, Mark, Participant};
use serenity::all::{ButtonStyle, CreateActionRow, CreateButton, CreateEmbed, CreateEmbedFooter};

pub const MOVE_ID_PREFIX: &str = "tictactoe_move_";
pub const STOP_ID: &str = "tictactoe_stop";

const EMPTY_LABEL: &str = "\u{200B}";
const WIN_IMAGE_URL: &str = "https://media.tenor.com/rH3Yh7-6UhsAAAAM/cereal-tic-tac-toe.gif";

/// A button press on a game message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameButton {
    Move(usize),
    Stop,
}

impl GameButton {
    pub fn parse(custom_id: &str) -> Option<Self> {
        if custom_id == STOP_ID {
            return Some(GameButton::Stop);
        }
        let cell = custom_id.strip_prefix(MOVE_ID_PREFIX)?.parse().ok()?;
        Some(GameButton::Move(cell))
    }

    pub fn custom_id(self) -> String {
        match self {
            GameButton::Move(cell) => format!("{}{}", MOVE_ID_PREFIX, cell),
            GameButton::Stop => STOP_ID.to_string(),
        }
    }
}

pub fn mention(id: &ParticipantId) -> String {
    format!("<@{}>", id)
}

fn mark_emoji(mark: Mark) -> &'static str {
    match mark {
        Mark::X => "❌",
        Mark::O => "⭕",
        Mark::Empty => "",
    }
}

pub fn matchup_line(player_x: &ParticipantId, player_o: &Participant) -> String {
    let opponent = match player_o {
        Participant::Player(id) => format!("{} (⭕)", mention(id)),
        Participant::Automated => "Bot (⭕)".to_string(),
    };
    format!("{} (❌) vs {}", mention(player_x), opponent)
}

pub fn turn_line(to_move: &Participant, mark: Mark) -> String {
    match to_move {
        Participant::Automated => format!("Bot's turn ({})", mark_emoji(mark)),
        Participant::Player(id) => format!("{}'s turn ({})", mention(id), mark.symbol()),
    }
}

pub fn result_line(winner: Option<(&Participant, Mark)>) -> String {
    match winner {
        Some((Participant::Player(id), mark)) => {
            format!("🎉 {} ({}) wins!", mention(id), mark.symbol())
        }
        Some((Participant::Automated, mark)) => format!("🎉 Bot ({}) wins!", mark_emoji(mark)),
        None => "🤝 It’s a draw!".to_string(),
    }
}

fn mark_of(snapshot: &SessionSnapshot, participant: &Participant) -> Mark {
    match participant {
        Participant::Player(id) if *id == snapshot.player_x => Mark::X,
        _ => Mark::O,
    }
}

pub fn game_embed(snapshot: &SessionSnapshot) -> CreateEmbed {
    let matchup = matchup_line(&snapshot.player_x, &snapshot.player_o);
    match &snapshot.state {
        SessionState::AwaitingMove(to_move) => CreateEmbed::new()
            .colour(0x2ECC71)
            .title("🎮 Tic-Tac-Toe")
            .description(matchup)
            .field("Turn", turn_line(to_move, mark_of(snapshot, to_move)), false)
            .footer(CreateEmbedFooter::new("Click a button to make your move!")),
        SessionState::Won { mark, winner } => CreateEmbed::new()
            .colour(0x00FF00)
            .title("🏁 Game Over")
            .description(result_line(Some((winner, *mark))))
            .image(WIN_IMAGE_URL)
            .field("Congratulations!", "You nailed it! 🎉🏆", false),
        SessionState::Draw => CreateEmbed::new()
            .colour(0xFFFF00)
            .title("🏁 Game Over")
            .description(result_line(None))
            .field("Tie Game!", "Well played by both! 🤝", false),
        SessionState::Stopped { by } => CreateEmbed::new()
            .colour(0xFF4500)
            .title("🛑 Game Stopped")
            .description(format!("The game was stopped by {}.", mention(by))),
        SessionState::TimedOut => CreateEmbed::new()
            .colour(0xFFA500)
            .title("⌛ Game Timed Out")
            .description("The game has ended due to inactivity."),
    }
}

/// Label, style and disabled flag of the button for one cell.
pub fn cell_appearance(mark: Mark, game_over: bool) -> (&'static str, ButtonStyle, bool) {
    match mark {
        Mark::X => ("X", ButtonStyle::Danger, true),
        Mark::O => ("O", ButtonStyle::Primary, true),
        Mark::Empty => (EMPTY_LABEL, ButtonStyle::Secondary, game_over),
    }
}

/// Three rows of cell buttons, plus a stop row while the game is running.
pub fn game_components(snapshot: &SessionSnapshot) -> Vec<CreateActionRow> {
    let game_over = snapshot.state.is_terminal();
    let cells = snapshot.board.cells();
    let mut rows: Vec<CreateActionRow> = (0..CELL_COUNT)
        .step_by(3)
        .map(|row_start| {
            let buttons = (row_start..row_start + 3)
                .map(|cell| {
                    let (label, style, disabled) = cell_appearance(cells[cell], game_over);
                    CreateButton::new(GameButton::Move(cell).custom_id())
                        .label(label)
                        .style(style)
                        .disabled(disabled)
                })
                .collect();
            CreateActionRow::Buttons(buttons)
        })
        .collect();

    if !game_over {
        rows.push(CreateActionRow::Buttons(vec![
            CreateButton::new(GameButton::Stop.custom_id())
                .label("Stop Game")
                .style(ButtonStyle::Danger),
        ]));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> ParticipantId {
        ParticipantId::new("111")
    }

    fn bob() -> ParticipantId {
        ParticipantId::new("222")
    }

    #[test]
    fn test_parse_button_ids() {
        assert_eq!(GameButton::parse("tictactoe_move_0"), Some(GameButton::Move(0)));
        assert_eq!(GameButton::parse("tictactoe_move_8"), Some(GameButton::Move(8)));
        assert_eq!(GameButton::parse("tictactoe_stop"), Some(GameButton::Stop));
        assert_eq!(GameButton::parse("tictactoe_move_x"), None);
        assert_eq!(GameButton::parse("help_select"), None);
    }

    #[test]
    fn test_out_of_range_cell_still_parses() {
        // Range checks belong to the game state.
        assert_eq!(GameButton::parse("tictactoe_move_12"), Some(GameButton::Move(12)));
    }

    #[test]
    fn test_custom_id_matches_parse() {
        for button in [GameButton::Move(4), GameButton::Stop] {
            assert_eq!(GameButton::parse(&button.custom_id()), Some(button));
        }
    }

    #[test]
    fn test_matchup_line() {
        assert_eq!(
            matchup_line(&alice(), &Participant::Automated),
            "<@111> (❌) vs Bot (⭕)"
        );
        assert_eq!(
            matchup_line(&alice(), &Participant::Player(bob())),
            "<@111> (❌) vs <@222> (⭕)"
        );
    }

    #[test]
    fn test_turn_line() {
        assert_eq!(
            turn_line(&Participant::Player(alice()), Mark::X),
            "<@111>'s turn (X)"
        );
        assert_eq!(turn_line(&Participant::Automated, Mark::O), "Bot's turn (⭕)");
    }

    #[test]
    fn test_result_line() {
        let alice = Participant::Player(alice());
        assert_eq!(result_line(Some((&alice, Mark::X))), "🎉 <@111> (X) wins!");
        assert_eq!(
            result_line(Some((&Participant::Automated, Mark::O))),
            "🎉 Bot (⭕) wins!"
        );
        assert_eq!(result_line(None), "🤝 It’s a draw!");
    }

    #[test]
    fn test_cell_appearance() {
        assert_eq!(cell_appearance(Mark::X, false), ("X", ButtonStyle::Danger, true));
        assert_eq!(cell_appearance(Mark::O, false), ("O", ButtonStyle::Primary, true));
        assert_eq!(
            cell_appearance(Mark::Empty, false),
            ("\u{200B}", ButtonStyle::Secondary, false)
        );
        assert!(cell_appearance(Mark::Empty, true).2);
    }
}
