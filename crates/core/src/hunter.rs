#![allow(missing_docs)]

//! The player character: gold, kit and treasure collection.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{ItemKind, TreasureKind};
use crate::narrative::Narrative;

/// Player-controlled hunter.
///
/// Gold is signed and may drop below zero after a lost brawl; the session
/// treats that as the loss condition rather than the hunter refusing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hunter {
    name: String,
    gold: i32,
    kit: BTreeSet<ItemKind>,
    treasures: Vec<TreasureKind>,
    samurai: bool,
}

impl Hunter {
    /// Create a hunter with an empty kit.
    pub fn new(name: impl Into<String>, gold: i32, samurai: bool) -> Self {
        Self {
            name: name.into(),
            gold,
            kit: BTreeSet::new(),
            treasures: Vec::with_capacity(TreasureKind::COUNT),
            samurai,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gold(&self) -> i32 {
        self.gold
    }

    pub fn is_samurai(&self) -> bool {
        self.samurai
    }

    /// Items currently carried, in catalog order.
    pub fn kit(&self) -> impl Iterator<Item = ItemKind> + '_ {
        self.kit.iter().copied()
    }

    /// Treasures in the order they were found.
    pub fn treasures(&self) -> &[TreasureKind] {
        &self.treasures
    }

    /// Pay `cost` for `item`.
    ///
    /// Refuses without touching any state when the item is already carried
    /// or the hunter cannot afford it.
    pub fn buy_item(&mut self, item: ItemKind, cost: i32) -> bool {
        if self.kit.contains(&item) || self.gold < cost {
            return false;
        }
        self.gold -= cost;
        self.kit.insert(item);
        debug!(item = %item, cost, gold = self.gold, "item bought");
        true
    }

    /// Hand `item` over for `price` gold. Fails only when the item is not carried.
    pub fn sell_item(&mut self, item: ItemKind, price: i32) -> bool {
        if !self.kit.remove(&item) {
            return false;
        }
        self.gold += price;
        debug!(item = %item, price, gold = self.gold, "item sold");
        true
    }

    /// Add `delta` to the purse. No floor is applied.
    pub fn change_gold(&mut self, delta: i32) {
        self.gold += delta;
    }

    pub fn has_item(&self, item: ItemKind) -> bool {
        self.kit.contains(&item)
    }

    /// Drop `item` from the kit if present.
    pub fn remove_item(&mut self, item: ItemKind) {
        self.kit.remove(&item);
    }

    pub fn has_treasure(&self, treasure: TreasureKind) -> bool {
        self.treasures.contains(&treasure)
    }

    /// Add a treasure unless it is a duplicate or the collection is full.
    pub fn add_treasure(&mut self, treasure: TreasureKind) -> bool {
        if self.has_treasure(treasure) || self.treasures.len() >= TreasureKind::COUNT {
            return false;
        }
        self.treasures.push(treasure);
        true
    }

    /// True once every treasure has been collected.
    pub fn is_complete(&self) -> bool {
        self.treasures.len() == TreasureKind::COUNT
    }

    /// One-paragraph status line: purse, kit and treasures.
    pub fn info(&self) -> Narrative {
        let mut narrative = Narrative::new()
            .plain(format!("{} has ", self.name))
            .gold(self.gold);
        if self.kit.is_empty() {
            narrative = narrative.plain(" and an empty kit.");
        } else {
            narrative = narrative.plain(" and a kit with ");
            for (index, item) in self.kit().enumerate() {
                if index > 0 {
                    narrative = narrative.plain(", ");
                }
                narrative = narrative.item(item);
            }
            narrative = narrative.plain(".");
        }
        narrative = narrative.plain("\nTreasures found: ");
        if self.treasures.is_empty() {
            return narrative.plain("none");
        }
        for (index, treasure) in self.treasures.iter().enumerate() {
            if index > 0 {
                narrative = narrative.plain(", ");
            }
            narrative = narrative.treasure(*treasure);
        }
        narrative
    }

    /// Kit listing shown when the hunter offers items to a shop.
    pub fn inventory(&self) -> Narrative {
        if self.kit.is_empty() {
            return Narrative::new().plain("Nothing at all.\n");
        }
        self.kit().fold(Narrative::new(), |narrative, item| {
            narrative.item(item).plain("\n")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hunter(gold: i32) -> Hunter {
        Hunter::new("ann", gold, false)
    }

    #[test]
    fn buying_deducts_exactly_the_cost() {
        let mut hunter = hunter(20);
        assert!(hunter.buy_item(ItemKind::Rope, 4));
        assert_eq!(hunter.gold(), 16);
        assert!(hunter.has_item(ItemKind::Rope));
    }

    #[test]
    fn buying_refuses_duplicates_and_shortfalls_without_mutation() {
        let mut hunter = hunter(5);
        assert!(hunter.buy_item(ItemKind::Water, 2));
        let before = hunter.clone();

        assert!(!hunter.buy_item(ItemKind::Water, 2));
        assert!(!hunter.buy_item(ItemKind::Boat, 20));
        assert_eq!(hunter, before);
    }

    #[test]
    fn exact_funds_are_enough() {
        let mut hunter = hunter(8);
        assert!(hunter.buy_item(ItemKind::Shovel, 8));
        assert_eq!(hunter.gold(), 0);
    }

    #[test]
    fn selling_unowned_items_never_touches_gold() {
        let mut hunter = hunter(3);
        assert!(!hunter.sell_item(ItemKind::Horse, 6));
        assert_eq!(hunter.gold(), 3);

        hunter.buy_item(ItemKind::Horse, 0);
        assert!(hunter.sell_item(ItemKind::Horse, 6));
        assert_eq!(hunter.gold(), 9);
        assert!(!hunter.has_item(ItemKind::Horse));
    }

    #[test]
    fn gold_can_go_negative() {
        let mut hunter = hunter(2);
        hunter.change_gold(-3);
        assert_eq!(hunter.gold(), -1);
    }

    #[test]
    fn remove_item_is_idempotent() {
        let mut hunter = hunter(0);
        hunter.remove_item(ItemKind::Boots);
        hunter.buy_item(ItemKind::Boots, 0);
        hunter.remove_item(ItemKind::Boots);
        hunter.remove_item(ItemKind::Boots);
        assert!(!hunter.has_item(ItemKind::Boots));
    }

    #[test]
    fn treasures_are_distinct_and_capped() {
        let mut hunter = hunter(0);
        assert!(hunter.add_treasure(TreasureKind::Gem));
        assert!(!hunter.add_treasure(TreasureKind::Gem));
        assert!(hunter.add_treasure(TreasureKind::Crown));
        assert!(!hunter.is_complete());
        assert!(hunter.add_treasure(TreasureKind::Trophy));
        assert!(hunter.is_complete());
        assert_eq!(
            hunter.treasures(),
            &[TreasureKind::Gem, TreasureKind::Crown, TreasureKind::Trophy]
        );
    }

    #[test]
    fn info_lists_kit_and_treasures() {
        let mut hunter = hunter(12);
        hunter.buy_item(ItemKind::Boat, 0);
        hunter.buy_item(ItemKind::Rope, 0);
        hunter.add_treasure(TreasureKind::Trophy);
        assert_eq!(
            hunter.info().to_string(),
            "ann has 12 gold and a kit with rope, boat.\nTreasures found: a trophy"
        );
    }
}
