use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::models::{Difficulty, ItemKind, ParseError};
use crate::narrative::{Narrative, Tone};

const STARTING_GOLD: i32 = 20;
const TEST_GOLD: i32 = 100;

/// How a game is set up: difficulty, purse and starting kit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Easy,
    Normal,
    Hard,
    /// Hard towns, but the shop stocks a free katana.
    Samurai,
    /// Rich hunter carrying every crossing item.
    Test,
    /// Broke hunter in hard towns.
    TestLose,
}

impl GameMode {
    /// Modes offered on the selection screen.
    pub const LISTED: [GameMode; 4] = [
        GameMode::Easy,
        GameMode::Normal,
        GameMode::Hard,
        GameMode::Samurai,
    ];

    /// Resolve a player's answer, falling back to normal mode.
    ///
    /// The flag is false when the answer was not recognised.
    pub fn from_choice(choice: &str) -> (Self, bool) {
        match choice.parse() {
            Ok(mode) => (mode, true),
            Err(_) => (GameMode::Normal, false),
        }
    }

    pub fn difficulty(self) -> Difficulty {
        match self {
            GameMode::Easy => Difficulty::Easy,
            GameMode::Normal | GameMode::Test => Difficulty::Normal,
            GameMode::Hard | GameMode::Samurai | GameMode::TestLose => Difficulty::Hard,
        }
    }

    pub fn starting_gold(self) -> i32 {
        match self {
            GameMode::Easy => STARTING_GOLD * 2,
            GameMode::Normal | GameMode::Hard | GameMode::Samurai => STARTING_GOLD,
            GameMode::Test => TEST_GOLD,
            GameMode::TestLose => 0,
        }
    }

    pub fn is_samurai(self) -> bool {
        self == GameMode::Samurai
    }

    /// Items the hunter owns before reaching the first town.
    pub fn starter_kit(self) -> Vec<ItemKind> {
        match self {
            GameMode::Test => ItemKind::ALL
                .into_iter()
                .filter(|item| *item != ItemKind::Katana)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Selection-screen label.
    pub fn label(self) -> &'static str {
        match self {
            GameMode::Easy => "(E)asy",
            GameMode::Normal => "(N)ormal",
            GameMode::Hard => "(H)ard",
            GameMode::Samurai => "(S)amurai",
            GameMode::Test => "test",
            GameMode::TestLose => "test lose",
        }
    }

    pub fn greeting(self) -> Narrative {
        match self {
            GameMode::Easy => {
                Narrative::new().push("Easy Mode. This be your first time?", Tone::Success)
            }
            GameMode::Normal => {
                Narrative::new().push("Normal Mode. Good luck adventurer.", Tone::Warning)
            }
            GameMode::Hard => Narrative::new().push(
                "Hard Mode it is then. Prepare for a challenge.",
                Tone::Danger,
            ),
            GameMode::Samurai => Narrative::new().push(
                "Hello, Samurai. It is an honor to see you.",
                Tone::Katana,
            ),
            GameMode::Test => Narrative::new().plain("Test mode activated."),
            GameMode::TestLose => Narrative::new().plain("Test Lose activated."),
        }
    }

    /// Shown when the answer was not understood.
    pub fn fallback_greeting() -> Narrative {
        Narrative::new().push("Uhhh... I'm just gonna give you Normal Mode...", Tone::Warning)
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameMode::Easy => "easy",
            GameMode::Normal => "normal",
            GameMode::Hard => "hard",
            GameMode::Samurai => "samurai",
            GameMode::Test => "test",
            GameMode::TestLose => "test lose",
        };
        f.write_str(name)
    }
}

impl FromStr for GameMode {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "e" => Ok(GameMode::Easy),
            "n" => Ok(GameMode::Normal),
            "h" => Ok(GameMode::Hard),
            "s" => Ok(GameMode::Samurai),
            "test" => Ok(GameMode::Test),
            "test lose" => Ok(GameMode::TestLose),
            _ => Err(ParseError::UnknownMode(normalized)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_each_mode() {
        assert_eq!(GameMode::Easy.starting_gold(), 40);
        assert_eq!(GameMode::Samurai.difficulty(), Difficulty::Hard);
        assert_eq!(GameMode::Samurai.starting_gold(), 20);
        assert_eq!(GameMode::Test.difficulty(), Difficulty::Normal);
        assert_eq!(GameMode::TestLose.starting_gold(), 0);
        assert!(GameMode::Samurai.starter_kit().is_empty());
    }

    #[test]
    fn test_mode_owns_everything_but_the_katana() {
        let kit = GameMode::Test.starter_kit();
        assert_eq!(kit.len(), 7);
        assert!(!kit.contains(&ItemKind::Katana));
    }

    #[test]
    fn unknown_answers_fall_back_to_normal() {
        assert_eq!(GameMode::from_choice(" H "), (GameMode::Hard, true));
        assert_eq!(GameMode::from_choice("Test Lose"), (GameMode::TestLose, true));
        assert_eq!(GameMode::from_choice("medium"), (GameMode::Normal, false));
        assert_eq!(
            "medium".parse::<GameMode>(),
            Err(ParseError::UnknownMode("medium".to_string()))
        );
    }
}
