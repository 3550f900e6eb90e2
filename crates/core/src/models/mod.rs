#![allow(missing_docs)]

//! Shared domain models.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while interpreting text supplied by a driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The name does not match any item the game knows about.
    #[error("unknown item '{0}'")]
    UnknownItem(String),
    /// The input is not one of the menu command letters.
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    /// The difficulty answer is not a recognised mode.
    #[error("unknown game mode '{0}'")]
    UnknownMode(String),
}

/// Equipment a hunter can carry. Each kind is held at most once.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Katana,
    Water,
    Rope,
    Machete,
    Shovel,
    Boots,
    Horse,
    Boat,
}

impl ItemKind {
    /// Every item in catalog order.
    pub const ALL: [ItemKind; 8] = [
        ItemKind::Katana,
        ItemKind::Water,
        ItemKind::Rope,
        ItemKind::Machete,
        ItemKind::Shovel,
        ItemKind::Boots,
        ItemKind::Horse,
        ItemKind::Boat,
    ];

    /// Lowercase name used in narrative and when parsing player input.
    pub fn name(self) -> &'static str {
        match self {
            ItemKind::Katana => "katana",
            ItemKind::Water => "water",
            ItemKind::Rope => "rope",
            ItemKind::Machete => "machete",
            ItemKind::Shovel => "shovel",
            ItemKind::Boots => "boots",
            ItemKind::Horse => "horse",
            ItemKind::Boat => "boat",
        }
    }

    /// Whether the item reads naturally with "a" in front of it.
    ///
    /// "You don't have a boots" is wrong, so plurals and mass nouns opt out.
    pub fn takes_article(self) -> bool {
        !matches!(self, ItemKind::Boots | ItemKind::Water)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ItemKind {
    type Err = ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let needle = input.trim().to_lowercase();
        ItemKind::ALL
            .into_iter()
            .find(|item| item.name() == needle)
            .ok_or_else(|| ParseError::UnknownItem(input.trim().to_string()))
    }
}

/// Collectible treasures. A hunter wins by holding one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreasureKind {
    Crown,
    Gem,
    Trophy,
}

impl TreasureKind {
    /// Number of distinct treasures needed to win.
    pub const COUNT: usize = 3;

    /// Name with its article, as it appears in narrative ("a crown").
    pub fn label(self) -> &'static str {
        match self {
            TreasureKind::Crown => "a crown",
            TreasureKind::Gem => "a gem",
            TreasureKind::Trophy => "a trophy",
        }
    }
}

impl fmt::Display for TreasureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TreasureKind::Crown => "crown",
            TreasureKind::Gem => "gem",
            TreasureKind::Trophy => "trophy",
        };
        f.write_str(name)
    }
}

/// What a town has buried in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cache {
    Treasure(TreasureKind),
    Dust,
}

impl Cache {
    /// The four equally likely outcomes of a town's treasure roll.
    pub const OUTCOMES: [Cache; 4] = [
        Cache::Treasure(TreasureKind::Crown),
        Cache::Treasure(TreasureKind::Gem),
        Cache::Treasure(TreasureKind::Trophy),
        Cache::Dust,
    ];
}

/// Difficulty presets that parameterise every town and shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    /// Tuning values for this difficulty.
    pub fn settings(self) -> DifficultySettings {
        match self {
            Difficulty::Easy => DifficultySettings {
                markdown: 1.0,
                toughness: 0.2,
                break_chance: 0.0,
            },
            Difficulty::Normal => DifficultySettings {
                markdown: 0.5,
                toughness: 0.4,
                break_chance: 0.5,
            },
            Difficulty::Hard => DifficultySettings {
                markdown: 0.25,
                toughness: 0.75,
                break_chance: 0.65,
            },
        }
    }
}

/// Numeric knobs derived from a [`Difficulty`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultySettings {
    /// Sell-back multiplier applied to an item's base cost.
    pub markdown: f64,
    /// Weighs both the tough-town roll and brawl odds.
    pub toughness: f64,
    /// Probability the crossing item is lost after a crossing.
    pub break_chance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_item_names_case_insensitively() {
        assert_eq!(" Rope ".parse::<ItemKind>(), Ok(ItemKind::Rope));
        assert_eq!("KATANA".parse::<ItemKind>(), Ok(ItemKind::Katana));
        assert_eq!(
            "sword".parse::<ItemKind>(),
            Err(ParseError::UnknownItem("sword".to_string()))
        );
    }

    #[test]
    fn boots_and_water_skip_the_article() {
        let bare: Vec<_> = ItemKind::ALL
            .into_iter()
            .filter(|item| !item.takes_article())
            .collect();
        assert_eq!(bare, vec![ItemKind::Water, ItemKind::Boots]);
    }

    #[test]
    fn presets_match_the_difficulty_table() {
        let hard = Difficulty::Hard.settings();
        assert_eq!(hard.markdown, 0.25);
        assert_eq!(hard.toughness, 0.75);
        assert_eq!(hard.break_chance, 0.65);
        assert_eq!(Difficulty::Easy.settings().break_chance, 0.0);
    }
}
