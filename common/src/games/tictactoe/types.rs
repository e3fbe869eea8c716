use std::fmt;

use crate::ParticipantId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mark {
    Empty,
    X,
    O,
}

impl Mark {
    pub fn opponent(&self) -> Option<Mark> {
        match self {
            Mark::X => Some(Mark::O),
            Mark::O => Some(Mark::X),
            Mark::Empty => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
            Mark::Empty => "",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    XWon,
    OWon,
    Draw,
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        *self != GameStatus::InProgress
    }

    pub fn winner_mark(&self) -> Option<Mark> {
        match self {
            GameStatus::XWon => Some(Mark::X),
            GameStatus::OWon => Some(Mark::O),
            GameStatus::InProgress | GameStatus::Draw => None,
        }
    }
}

/// One side of a match. Only the second seat may be taken by the bot.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Participant {
    Player(ParticipantId),
    Automated,
}

impl Participant {
    pub fn is_automated(&self) -> bool {
        matches!(self, Participant::Automated)
    }

    pub fn player_id(&self) -> Option<&ParticipantId> {
        match self {
            Participant::Player(id) => Some(id),
            Participant::Automated => None,
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Participant::Player(id) => write!(f, "{}", id),
            Participant::Automated => write!(f, "bot"),
        }
    }
}
