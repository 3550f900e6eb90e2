use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::models::ParseError;

/// One menu choice, keyed by its letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Buy,
    Sell,
    Explore,
    Move,
    LookForTrouble,
    HuntForTreasure,
    DigForGold,
    Exit,
}

impl Command {
    /// Menu order.
    pub const ALL: [Command; 8] = [
        Command::Buy,
        Command::Sell,
        Command::Explore,
        Command::Move,
        Command::LookForTrouble,
        Command::HuntForTreasure,
        Command::DigForGold,
        Command::Exit,
    ];

    pub fn letter(self) -> char {
        match self {
            Command::Buy => 'b',
            Command::Sell => 's',
            Command::Explore => 'e',
            Command::Move => 'm',
            Command::LookForTrouble => 'l',
            Command::HuntForTreasure => 'h',
            Command::DigForGold => 'd',
            Command::Exit => 'x',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        let letter = letter.to_ascii_lowercase();
        Self::ALL.into_iter().find(|command| command.letter() == letter)
    }

    /// Menu line, with the letter in parentheses.
    pub fn menu_label(self) -> &'static str {
        match self {
            Command::Buy => "(B)uy something at the shop.",
            Command::Sell => "(S)ell something at the shop.",
            Command::Explore => "(E)xplore surrounding terrain.",
            Command::Move => "(M)ove on to a different town.",
            Command::LookForTrouble => "(L)ook for trouble!",
            Command::HuntForTreasure => "(H)unt for treasure",
            Command::DigForGold => "(D)ig for gold",
            Command::Exit => "Give up the hunt and e(X)it.",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => {
                Self::from_letter(letter).ok_or_else(|| ParseError::UnknownCommand(trimmed.into()))
            }
            _ => Err(ParseError::UnknownCommand(trimmed.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_round_trip_through_parsing() {
        for command in Command::ALL {
            assert_eq!(command.letter().to_string().parse::<Command>(), Ok(command));
        }
        assert_eq!(" X ".parse::<Command>(), Ok(Command::Exit));
    }

    #[test]
    fn anything_else_is_unknown() {
        for input in ["", "q", "buy", "bb"] {
            assert!(matches!(
                input.parse::<Command>(),
                Err(ParseError::UnknownCommand(_))
            ));
        }
    }
}
