#![allow(missing_docs)]

//! Item catalog, pricing and the buy/sell protocol.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::hunter::Hunter;
use crate::models::{DifficultySettings, ItemKind};
use crate::narrative::{Narrative, Tone};

/// Which way goods flow across the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    /// The hunter pays the shop.
    Buy,
    /// The shop pays the hunter.
    Sell,
}

/// Base purchase price of an item in gold.
pub fn base_cost(item: ItemKind) -> i32 {
    match item {
        ItemKind::Katana => 0,
        ItemKind::Water => 2,
        ItemKind::Rope => 4,
        ItemKind::Machete => 6,
        ItemKind::Shovel => 8,
        ItemKind::Boots => 10,
        ItemKind::Horse => 12,
        ItemKind::Boat => 20,
    }
}

/// Order in which the shopkeeper lists wares.
const DISPLAY_ORDER: [ItemKind; 8] = [
    ItemKind::Katana,
    ItemKind::Water,
    ItemKind::Rope,
    ItemKind::Machete,
    ItemKind::Boots,
    ItemKind::Shovel,
    ItemKind::Horse,
    ItemKind::Boat,
];

/// How a successful purchase was paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Deal {
    /// Full price, no katana involved.
    Paid,
    /// Charged, then refunded because the buyer carries a katana.
    KatanaDiscount,
    /// The buyer was short on gold but the katana made the shopkeeper give it away.
    Intimidated,
}

/// Result of asking the shopkeeper for a price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quote {
    /// The shop trades this item at `price`.
    Price {
        item: ItemKind,
        price: i32,
        side: TradeSide,
    },
    /// Not sold here, or not a known item at all.
    Unavailable { name: String, side: TradeSide },
}

/// Outcome of [`Shop::execute_buy`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuyOutcome {
    Bought {
        item: ItemKind,
        price: i32,
        deal: Deal,
    },
    AlreadyOwned(ItemKind),
    InsufficientFunds { item: ItemKind, price: i32 },
    Unavailable(String),
}

/// Outcome of [`Shop::execute_sell`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SellOutcome {
    Sold { item: ItemKind, price: i32 },
    Rejected(String),
}

/// A town's shop. Prices are fixed; only the sell-back markdown varies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    markdown: f64,
    allows_katana: bool,
}

impl Shop {
    /// Create a shop with the given sell-back multiplier.
    pub fn new(markdown: f64, allows_katana: bool) -> Self {
        Self {
            markdown: markdown.clamp(0.0, 1.0),
            allows_katana,
        }
    }

    /// Shop tuned for a difficulty; the katana is stocked only for samurai.
    pub fn for_settings(settings: &DifficultySettings, samurai: bool) -> Self {
        Self::new(settings.markdown, samurai)
    }

    /// Sell-back multiplier.
    pub fn markdown(&self) -> f64 {
        self.markdown
    }

    /// Whether the katana is on the shelf.
    pub fn allows_katana(&self) -> bool {
        self.allows_katana
    }

    /// Price of `item` on the given side of the counter, `None` when not traded.
    pub fn quote(&self, item: ItemKind, side: TradeSide) -> Option<i32> {
        if item == ItemKind::Katana && !self.allows_katana {
            return None;
        }
        let cost = base_cost(item);
        match side {
            TradeSide::Buy => Some(cost),
            TradeSide::Sell => Some((f64::from(cost) * self.markdown).floor() as i32),
        }
    }

    /// Price lookup for a name typed by the player.
    pub fn quote_named(&self, name: &str, side: TradeSide) -> Quote {
        name.parse::<ItemKind>()
            .ok()
            .and_then(|item| {
                self.quote(item, side)
                    .map(|price| Quote::Price { item, price, side })
            })
            .unwrap_or_else(|| Quote::Unavailable {
                name: name.trim().to_lowercase(),
                side,
            })
    }

    /// Items on the shelf with their purchase prices, in display order.
    pub fn catalog(&self) -> Vec<(ItemKind, i32)> {
        DISPLAY_ORDER
            .into_iter()
            .filter_map(|item| self.quote(item, TradeSide::Buy).map(|price| (item, price)))
            .collect()
    }

    /// Opening lines when the hunter steps up to the counter.
    pub fn greeting(&self, side: TradeSide, hunter: &Hunter) -> Narrative {
        match side {
            TradeSide::Buy => {
                let mut narrative = Narrative::new()
                    .plain("Welcome to the shop! We have the finest wares in town.\n")
                    .plain("Currently we have the following items:\n");
                for (item, price) in self.catalog() {
                    let label = capitalize(item.name());
                    narrative = if item == ItemKind::Katana {
                        narrative.push(label.to_uppercase(), Tone::Katana)
                    } else {
                        narrative.push(label, Tone::Item)
                    };
                    narrative = narrative.plain(": ").gold(price).plain("\n");
                }
                narrative.plain("\nWhat're you lookin' to buy?")
            }
            TradeSide::Sell => Narrative::new()
                .plain("What're you lookin' to sell?\n")
                .plain("You currently have the following items:\n")
                .then(hunter.inventory()),
        }
    }

    /// Buy `item` for `hunter`.
    ///
    /// A hunter carrying a katana never ends up paying: either the purchase is
    /// refunded after the charge, or, when short on gold, the item is handed over.
    pub fn execute_buy(&self, hunter: &mut Hunter, item: ItemKind) -> BuyOutcome {
        let Some(price) = self.quote(item, TradeSide::Buy) else {
            return BuyOutcome::Unavailable(item.name().to_string());
        };

        if hunter.buy_item(item, price) {
            let deal = if hunter.has_item(ItemKind::Katana) {
                hunter.change_gold(price);
                Deal::KatanaDiscount
            } else {
                Deal::Paid
            };
            info!(item = %item, price, ?deal, gold = hunter.gold(), "purchase completed");
            return BuyOutcome::Bought { item, price, deal };
        }

        if hunter.has_item(item) {
            return BuyOutcome::AlreadyOwned(item);
        }

        if hunter.has_item(ItemKind::Katana) {
            hunter.buy_item(item, 0);
            info!(item = %item, price, gold = hunter.gold(), "shopkeeper intimidated");
            return BuyOutcome::Bought {
                item,
                price,
                deal: Deal::Intimidated,
            };
        }

        debug!(item = %item, price, gold = hunter.gold(), "purchase refused");
        BuyOutcome::InsufficientFunds { item, price }
    }

    /// Buy by player-typed name; unknown names are unavailable.
    pub fn buy_named(&self, hunter: &mut Hunter, name: &str) -> BuyOutcome {
        match name.parse::<ItemKind>() {
            Ok(item) => self.execute_buy(hunter, item),
            Err(_) => BuyOutcome::Unavailable(name.trim().to_lowercase()),
        }
    }

    /// Sell `item` from `hunter`'s kit at the marked-down price.
    pub fn execute_sell(&self, hunter: &mut Hunter, item: ItemKind) -> SellOutcome {
        let Some(price) = self.quote(item, TradeSide::Sell) else {
            return SellOutcome::Rejected(item.name().to_string());
        };
        if hunter.sell_item(item, price) {
            info!(item = %item, price, gold = hunter.gold(), "sale completed");
            SellOutcome::Sold { item, price }
        } else {
            SellOutcome::Rejected(item.name().to_string())
        }
    }

    /// Sell by player-typed name; unknown names are rejected.
    pub fn sell_named(&self, hunter: &mut Hunter, name: &str) -> SellOutcome {
        match name.parse::<ItemKind>() {
            Ok(item) => self.execute_sell(hunter, item),
            Err(_) => SellOutcome::Rejected(name.trim().to_lowercase()),
        }
    }
}

impl Quote {
    /// Shopkeeper's reply to a price request, ending in the y/n question.
    pub fn narrative(&self) -> Narrative {
        match self {
            Quote::Price {
                price,
                side: TradeSide::Buy,
                ..
            } => Narrative::new()
                .plain("It'll cost you ")
                .gold(*price)
                .plain(". Buy it (y/n)?"),
            Quote::Price {
                price,
                side: TradeSide::Sell,
                ..
            } => Narrative::new()
                .plain("It'll get you ")
                .gold(*price)
                .plain(". Sell it (y/n)?"),
            Quote::Unavailable {
                side: TradeSide::Buy,
                ..
            } => Narrative::new().plain("We ain't got none of those."),
            Quote::Unavailable {
                side: TradeSide::Sell,
                ..
            } => Narrative::new().plain("We don't want none of those."),
        }
    }
}

impl BuyOutcome {
    /// True when the item changed hands.
    pub fn is_bought(&self) -> bool {
        matches!(self, BuyOutcome::Bought { .. })
    }

    pub fn narrative(&self) -> Narrative {
        match self {
            BuyOutcome::Bought {
                item,
                deal: Deal::Paid,
                ..
            } => Narrative::new()
                .plain("Ye' got yerself a ")
                .item(*item)
                .plain(". Come again soon."),
            BuyOutcome::Bought {
                item,
                deal: Deal::KatanaDiscount,
                ..
            } => Narrative::new()
                .plain("Nice ")
                .item(ItemKind::Katana)
                .plain(" you have there sir... Just this once I can give you the ")
                .item(*item)
                .plain(" for free. Just don't start swinging..."),
            BuyOutcome::Bought {
                item,
                deal: Deal::Intimidated,
                ..
            } => Narrative::new()
                .plain("It seems you don't have enough gold for that. B-but your ")
                .item(ItemKind::Katana)
                .plain(" looks mighty frightening, just take the ")
                .item(*item)
                .plain(" and don't hurt me!"),
            BuyOutcome::AlreadyOwned(item) => Narrative::new()
                .plain("It seems you already have a ")
                .item(*item)
                .plain("."),
            BuyOutcome::InsufficientFunds { .. } => Narrative::new().plain(
                "I'm afraid you don't have enough gold, come back when you're a little, mmmm richer.",
            ),
            BuyOutcome::Unavailable(_) => Narrative::new().plain("We ain't got none of those."),
        }
    }
}

impl SellOutcome {
    /// True when the item changed hands.
    pub fn is_sold(&self) -> bool {
        matches!(self, SellOutcome::Sold { .. })
    }

    pub fn narrative(&self) -> Narrative {
        match self {
            SellOutcome::Sold { .. } => Narrative::new().plain("Pleasure doin' business with you."),
            SellOutcome::Rejected(_) => Narrative::new().plain("Stop stringin' me along!"),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;

    fn normal_shop() -> Shop {
        Shop::for_settings(&Difficulty::Normal.settings(), false)
    }

    fn samurai() -> Hunter {
        let mut hunter = Hunter::new("kenji", 20, true);
        hunter.buy_item(ItemKind::Katana, 0);
        hunter
    }

    #[test]
    fn buying_rope_in_normal_mode() {
        let shop = normal_shop();
        let mut hunter = Hunter::new("ann", 20, false);
        let outcome = shop.execute_buy(&mut hunter, ItemKind::Rope);
        assert_eq!(
            outcome,
            BuyOutcome::Bought {
                item: ItemKind::Rope,
                price: 4,
                deal: Deal::Paid
            }
        );
        assert_eq!(hunter.gold(), 16);
        assert!(hunter.has_item(ItemKind::Rope));
    }

    #[test]
    fn every_affordable_item_costs_its_quote() {
        let shop = normal_shop();
        for (item, price) in shop.catalog() {
            let mut hunter = Hunter::new("ann", 50, false);
            assert!(shop.execute_buy(&mut hunter, item).is_bought());
            assert_eq!(hunter.gold(), 50 - price, "{item}");
        }
    }

    #[test]
    fn katana_is_only_stocked_for_samurai() {
        let plain = normal_shop();
        assert_eq!(plain.quote(ItemKind::Katana, TradeSide::Buy), None);
        assert!(plain.catalog().iter().all(|(item, _)| *item != ItemKind::Katana));

        let dojo = Shop::for_settings(&Difficulty::Hard.settings(), true);
        assert_eq!(dojo.quote(ItemKind::Katana, TradeSide::Buy), Some(0));
        assert_eq!(dojo.catalog()[0], (ItemKind::Katana, 0));

        let mut hunter = Hunter::new("ann", 20, false);
        assert_eq!(
            plain.execute_buy(&mut hunter, ItemKind::Katana),
            BuyOutcome::Unavailable("katana".to_string())
        );
    }

    #[test]
    fn buying_the_katana_is_narrated_as_free() {
        let dojo = Shop::for_settings(&Difficulty::Normal.settings(), true);
        let mut hunter = Hunter::new("kenji", 20, true);
        let outcome = dojo.execute_buy(&mut hunter, ItemKind::Katana);
        assert_eq!(
            outcome,
            BuyOutcome::Bought {
                item: ItemKind::Katana,
                price: 0,
                deal: Deal::KatanaDiscount
            }
        );
        assert_eq!(hunter.gold(), 20);
        assert!(outcome.narrative().to_string().starts_with("Nice katana"));
    }

    #[test]
    fn sell_prices_round_down() {
        let hard = Shop::for_settings(&Difficulty::Hard.settings(), false);
        assert_eq!(hard.quote(ItemKind::Machete, TradeSide::Sell), Some(1));
        assert_eq!(hard.quote(ItemKind::Water, TradeSide::Sell), Some(0));
        let easy = Shop::for_settings(&Difficulty::Easy.settings(), false);
        assert_eq!(easy.quote(ItemKind::Boat, TradeSide::Sell), Some(20));
    }

    #[test]
    fn samurai_purchases_are_gold_neutral() {
        let shop = Shop::for_settings(&Difficulty::Hard.settings(), true);
        let mut hunter = samurai();
        let outcome = shop.execute_buy(&mut hunter, ItemKind::Water);
        assert_eq!(
            outcome,
            BuyOutcome::Bought {
                item: ItemKind::Water,
                price: 2,
                deal: Deal::KatanaDiscount
            }
        );
        assert_eq!(hunter.gold(), 20);

        for item in [ItemKind::Boat, ItemKind::Horse, ItemKind::Boots] {
            let before = hunter.gold();
            assert!(shop.execute_buy(&mut hunter, item).is_bought());
            assert_eq!(hunter.gold(), before, "{item}");
        }
    }

    #[test]
    fn short_samurai_intimidates_the_shopkeeper() {
        let shop = normal_shop();
        let mut hunter = samurai();
        hunter.change_gold(-15);
        let outcome = shop.execute_buy(&mut hunter, ItemKind::Boat);
        assert_eq!(
            outcome,
            BuyOutcome::Bought {
                item: ItemKind::Boat,
                price: 20,
                deal: Deal::Intimidated
            }
        );
        assert_eq!(hunter.gold(), 5);
        assert!(hunter.has_item(ItemKind::Boat));
        assert!(outcome.narrative().to_string().contains("don't hurt me"));
    }

    #[test]
    fn refusals_leave_the_hunter_untouched() {
        let shop = normal_shop();
        let mut hunter = Hunter::new("ann", 5, false);
        hunter.buy_item(ItemKind::Rope, 0);
        let before = hunter.clone();

        assert_eq!(
            shop.execute_buy(&mut hunter, ItemKind::Rope),
            BuyOutcome::AlreadyOwned(ItemKind::Rope)
        );
        assert_eq!(
            shop.execute_buy(&mut hunter, ItemKind::Horse),
            BuyOutcome::InsufficientFunds {
                item: ItemKind::Horse,
                price: 12
            }
        );
        assert_eq!(
            shop.buy_named(&mut hunter, "Sword"),
            BuyOutcome::Unavailable("sword".to_string())
        );
        assert_eq!(hunter, before);
    }

    #[test]
    fn selling_unowned_items_is_rejected() {
        let shop = normal_shop();
        let mut hunter = Hunter::new("ann", 3, false);
        assert_eq!(
            shop.execute_sell(&mut hunter, ItemKind::Boat),
            SellOutcome::Rejected("boat".to_string())
        );
        assert!(!shop.sell_named(&mut hunter, "banana").is_sold());
        assert_eq!(hunter.gold(), 3);
    }

    #[test]
    fn selling_pays_the_markdown_price() {
        let shop = normal_shop();
        let mut hunter = Hunter::new("ann", 0, false);
        hunter.buy_item(ItemKind::Horse, 0);
        assert_eq!(
            shop.execute_sell(&mut hunter, ItemKind::Horse),
            SellOutcome::Sold {
                item: ItemKind::Horse,
                price: 6
            }
        );
        assert_eq!(hunter.gold(), 6);
    }

    #[test]
    fn a_samurai_may_sell_the_katana_for_nothing() {
        let shop = Shop::for_settings(&Difficulty::Hard.settings(), true);
        let mut hunter = samurai();
        assert_eq!(
            shop.execute_sell(&mut hunter, ItemKind::Katana),
            SellOutcome::Sold {
                item: ItemKind::Katana,
                price: 0
            }
        );
        assert_eq!(hunter.gold(), 20);
        assert!(!hunter.has_item(ItemKind::Katana));
    }

    #[test]
    fn quotes_by_name() {
        let shop = normal_shop();
        assert_eq!(
            shop.quote_named("Boots", TradeSide::Sell),
            Quote::Price {
                item: ItemKind::Boots,
                price: 5,
                side: TradeSide::Sell
            }
        );
        let missing = shop.quote_named("katana", TradeSide::Buy);
        assert_eq!(missing.narrative().to_string(), "We ain't got none of those.");
    }

    #[test]
    fn greeting_lists_wares_in_shop_order() {
        let shop = normal_shop();
        let hunter = Hunter::new("ann", 0, false);
        let text = shop.greeting(TradeSide::Buy, &hunter).to_string();
        let boots = text.find("Boots: 10 gold").expect("boots listed");
        let shovel = text.find("Shovel: 8 gold").expect("shovel listed");
        assert!(boots < shovel);
        assert!(!text.contains("KATANA"));
    }
}
