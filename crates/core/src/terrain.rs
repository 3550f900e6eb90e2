//! Obstacles surrounding each town and the gear needed to cross them.

use serde::{Deserialize, Serialize};

use crate::hunter::Hunter;
use crate::models::ItemKind;
use crate::narrative::Narrative;
use crate::random::RandomSource;

/// The fixed terrain table, each entry equally likely.
const TERRAINS: [(&str, ItemKind, Option<ItemKind>); 6] = [
    ("Mountains", ItemKind::Rope, None),
    ("Ocean", ItemKind::Boat, None),
    ("Plains", ItemKind::Horse, None),
    ("Desert", ItemKind::Water, None),
    ("Marsh", ItemKind::Boots, None),
    ("Jungle", ItemKind::Machete, Some(ItemKind::Katana)),
];

/// Terrain surrounding a town. Immutable once rolled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terrain {
    name: String,
    required: ItemKind,
    alternate: Option<ItemKind>,
}

impl Terrain {
    /// Build a terrain by hand.
    pub fn new(name: impl Into<String>, required: ItemKind, alternate: Option<ItemKind>) -> Self {
        Self {
            name: name.into(),
            required,
            alternate,
        }
    }

    /// Pick one of the six terrains uniformly.
    pub fn random(rng: &mut impl RandomSource) -> Self {
        let index = rng.roll(0, TERRAINS.len() as i32 - 1) as usize;
        let (name, required, alternate) = TERRAINS[index.min(TERRAINS.len() - 1)];
        Self::new(name, required, alternate)
    }

    /// Every terrain in table order.
    pub fn all() -> Vec<Self> {
        TERRAINS
            .iter()
            .map(|(name, required, alternate)| Self::new(*name, *required, *alternate))
            .collect()
    }

    /// Display name, e.g. `Mountains`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Item that always gets a hunter across.
    pub fn required_item(&self) -> ItemKind {
        self.required
    }

    /// Second item that also works, if this terrain has one.
    pub fn alternate_item(&self) -> Option<ItemKind> {
        self.alternate
    }

    /// Whether `hunter` carries what it takes to cross.
    pub fn can_cross(&self, hunter: &Hunter) -> bool {
        hunter.has_item(self.required)
            || self
                .alternate
                .map(|item| hunter.has_item(item))
                .unwrap_or(false)
    }

    /// Explore text for the surrounding terrain.
    pub fn info(&self) -> Narrative {
        Narrative::new()
            .plain("You are surrounded by ")
            .terrain(&self.name)
            .plain(" which needs (a) ")
            .item(self.required)
            .plain(" to cross.")
    }
}
