#![allow(missing_docs)]

//! A single location: its terrain, shop and one-shot encounters.
//!
//! A town keeps two one-way flags. `searched` flips the first time the hunter
//! looks for treasure and `dug` flips the first time the hunter digs with a
//! shovel in hand; neither ever resets for that town. Brawls have no such
//! limit. The hunter leaves by crossing the terrain, after which the town is
//! dropped along with its treasure roll.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::hunter::Hunter;
use crate::models::{Cache, DifficultySettings, ItemKind, TreasureKind};
use crate::narrative::{Narrative, Tone};
use crate::random::RandomSource;
use crate::shop::{BuyOutcome, SellOutcome, Shop, TradeSide};
use crate::terrain::Terrain;

const TOUGH_TOWN_QUIET_CHANCE: f64 = 0.4;
const SLEEPY_TOWN_QUIET_CHANCE: f64 = 0.7;
const SLEEPY_TOWN_FIGHT_SCALE: f64 = 0.8;
const BRAWL_GOLD: (i32, i32) = (1, 10);
const DIG_GOLD: (i32, i32) = (1, 20);
const DIG_MISS_CHANCE: f64 = 0.5;

/// Result of looking for trouble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TroubleOutcome {
    Quiet,
    /// The brawler saw the katana and paid up without a fight.
    Tribute { gold: i32 },
    Won { gold: i32 },
    Lost { gold: i32 },
}

/// Result of hunting for treasure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreasureOutcome {
    Found(TreasureKind),
    /// Found something the hunter already owns; it stays behind.
    Duplicate(TreasureKind),
    Dust,
    AlreadySearched,
}

/// Result of digging for gold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DigOutcome {
    NoShovel,
    AlreadyDug,
    Dirt,
    Gold(i32),
}

/// Result of trying to leave town.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossingOutcome {
    /// Cut through the jungle with a katana; nothing can break.
    Sliced { terrain: String },
    Crossed {
        terrain: String,
        item: ItemKind,
        broke: bool,
    },
    Blocked {
        hunter: String,
        item: ItemKind,
    },
}

/// Result of a shop transaction made in town.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeOutcome {
    Buy(BuyOutcome),
    Sell(SellOutcome),
}

/// One location the hunter can visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Town {
    terrain: Terrain,
    shop: Shop,
    tough: bool,
    toughness: f64,
    break_chance: f64,
    cache: Cache,
    dug: bool,
    searched: bool,
}

impl Town {
    /// Roll a fresh town: terrain first, then buried treasure, then toughness.
    pub fn new(settings: &DifficultySettings, samurai: bool, rng: &mut impl RandomSource) -> Self {
        let terrain = Terrain::random(rng);
        let index = rng.roll(0, Cache::OUTCOMES.len() as i32 - 1) as usize;
        let cache = Cache::OUTCOMES[index.min(Cache::OUTCOMES.len() - 1)];
        let tough = rng.chance() < settings.toughness;
        let town = Self::from_parts(
            terrain,
            Shop::for_settings(settings, samurai),
            cache,
            tough,
            settings,
        );
        info!(
            terrain = town.terrain.name(),
            ?cache,
            tough,
            "town created"
        );
        town
    }

    /// Assemble a town from already-decided pieces.
    pub fn from_parts(
        terrain: Terrain,
        shop: Shop,
        cache: Cache,
        tough: bool,
        settings: &DifficultySettings,
    ) -> Self {
        Self {
            terrain,
            shop,
            tough,
            toughness: settings.toughness,
            break_chance: settings.break_chance,
            cache,
            dug: false,
            searched: false,
        }
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn shop(&self) -> &Shop {
        &self.shop
    }

    pub fn is_tough(&self) -> bool {
        self.tough
    }

    pub fn cache(&self) -> Cache {
        self.cache
    }

    pub fn has_dug(&self) -> bool {
        self.dug
    }

    pub fn has_searched(&self) -> bool {
        self.searched
    }

    /// News shown when a hunter walks in.
    pub fn arrival(&self, hunter: &Hunter) -> Narrative {
        let welcome = Narrative::new().plain(format!("Welcome to town, {}.\n", hunter.name()));
        if self.tough {
            welcome.push("It's pretty rough around here, so watch yourself.", Tone::Warning)
        } else {
            welcome.plain("We're just a sleepy little town with mild mannered folk.")
        }
    }

    /// Short description for the status panel.
    pub fn info(&self) -> Narrative {
        Narrative::new()
            .plain("This nice little town is surrounded by ")
            .terrain(self.terrain.name())
            .plain(".")
    }

    /// Go looking for a brawl. Repeatable.
    pub fn look_for_trouble(
        &self,
        hunter: &mut Hunter,
        rng: &mut impl RandomSource,
    ) -> TroubleOutcome {
        let (quiet_chance, fight_difficulty) = if self.tough {
            (TOUGH_TOWN_QUIET_CHANCE, self.toughness)
        } else {
            (
                SLEEPY_TOWN_QUIET_CHANCE,
                SLEEPY_TOWN_FIGHT_SCALE * self.toughness,
            )
        };

        if rng.chance() < quiet_chance {
            return TroubleOutcome::Quiet;
        }

        let gold = rng.roll(BRAWL_GOLD.0, BRAWL_GOLD.1);
        let outcome = if hunter.has_item(ItemKind::Katana) {
            hunter.change_gold(gold);
            TroubleOutcome::Tribute { gold }
        } else if rng.chance() > fight_difficulty {
            hunter.change_gold(gold);
            TroubleOutcome::Won { gold }
        } else {
            hunter.change_gold(-gold);
            TroubleOutcome::Lost { gold }
        };
        debug!(?outcome, gold = hunter.gold(), "brawl resolved");
        outcome
    }

    /// Search the town once for its buried treasure.
    pub fn hunt_for_treasure(&mut self, hunter: &mut Hunter) -> TreasureOutcome {
        if self.searched {
            return TreasureOutcome::AlreadySearched;
        }
        self.searched = true;
        match self.cache {
            Cache::Dust => TreasureOutcome::Dust,
            Cache::Treasure(treasure) => {
                if hunter.add_treasure(treasure) {
                    info!(%treasure, found = hunter.treasures().len(), "treasure collected");
                    TreasureOutcome::Found(treasure)
                } else {
                    TreasureOutcome::Duplicate(treasure)
                }
            }
        }
    }

    /// Dig once for gold. Without a shovel nothing happens and the dig stays available.
    pub fn dig_for_gold(&mut self, hunter: &mut Hunter, rng: &mut impl RandomSource) -> DigOutcome {
        if self.dug {
            return DigOutcome::AlreadyDug;
        }
        if !hunter.has_item(ItemKind::Shovel) {
            return DigOutcome::NoShovel;
        }
        self.dug = true;
        if rng.chance() < DIG_MISS_CHANCE {
            return DigOutcome::Dirt;
        }
        let gold = rng.roll(DIG_GOLD.0, DIG_GOLD.1);
        hunter.change_gold(gold);
        DigOutcome::Gold(gold)
    }

    /// Try to cross the surrounding terrain.
    ///
    /// A katana through the jungle never breaks. Any other crossing may cost
    /// the hunter the required item.
    pub fn leave(&self, hunter: &mut Hunter, rng: &mut impl RandomSource) -> CrossingOutcome {
        let terrain = self.terrain.name().to_string();
        let required = self.terrain.required_item();

        if !self.terrain.can_cross(hunter) {
            return CrossingOutcome::Blocked {
                hunter: hunter.name().to_string(),
                item: required,
            };
        }

        if self.terrain.alternate_item() == Some(ItemKind::Katana)
            && hunter.has_item(ItemKind::Katana)
        {
            return CrossingOutcome::Sliced { terrain };
        }

        let broke = rng.chance() < self.break_chance;
        if broke {
            hunter.remove_item(required);
        }
        info!(terrain = %terrain, item = %required, broke, "terrain crossed");
        CrossingOutcome::Crossed {
            terrain,
            item: required,
            broke,
        }
    }

    /// Step up to the counter.
    pub fn enter_shop(&self, hunter: &Hunter, side: TradeSide) -> Narrative {
        self.shop.greeting(side, hunter)
    }

    /// Complete a confirmed trade for an item named by the player.
    pub fn trade(&self, hunter: &mut Hunter, side: TradeSide, name: &str) -> TradeOutcome {
        match side {
            TradeSide::Buy => TradeOutcome::Buy(self.shop.buy_named(hunter, name)),
            TradeSide::Sell => TradeOutcome::Sell(self.shop.sell_named(hunter, name)),
        }
    }
}

impl TroubleOutcome {
    pub fn narrative(&self) -> Narrative {
        match self {
            TroubleOutcome::Quiet => Narrative::new().plain("You couldn't find any trouble"),
            TroubleOutcome::Tribute { gold } => Narrative::new()
                .push("You want trouble, stranger?! You g-\n", Tone::Danger)
                .push("Oh my god that's a ", Tone::Friendly)
                .item(ItemKind::Katana)
                .push(
                    ". Yeah nope I'm out. I am NOT fighting a samurai. Just take my gold man.\n",
                    Tone::Friendly,
                )
                .plain("That was... interesting. Well, at least you got ")
                .gold(*gold)
                .plain("."),
            TroubleOutcome::Won { gold } => Narrative::new()
                .push("You want trouble, stranger?! You got it!\nOof! Umph! Ow!\n", Tone::Danger)
                .push(
                    "Okay, stranger! You proved yer mettle. Here, take my gold.",
                    Tone::Friendly,
                )
                .plain("\nYou won the brawl and received ")
                .gold(*gold)
                .plain("."),
            TroubleOutcome::Lost { gold } => Narrative::new()
                .push(
                    "You want trouble, stranger?! You got it!\nOof! Umph! Ow!\nThat'll teach you to go lookin' fer trouble in MY town! Now pay up!",
                    Tone::Danger,
                )
                .plain("\nYou lost the brawl and pay ")
                .gold(*gold)
                .plain("."),
        }
    }
}

impl TreasureOutcome {
    pub fn narrative(&self) -> Narrative {
        match self {
            TreasureOutcome::Found(treasure) => Narrative::new()
                .plain("You found ")
                .treasure(*treasure)
                .plain("! You add it to your collection."),
            TreasureOutcome::Duplicate(treasure) => Narrative::new()
                .plain("You found ")
                .treasure(*treasure)
                .plain("! It seems you already have that treasure. You decide to leave this one here for the next adventurer."),
            TreasureOutcome::Dust => Narrative::new().plain("All you could find was dust."),
            TreasureOutcome::AlreadySearched => {
                Narrative::new().plain("You have already searched this town!")
            }
        }
    }
}

impl DigOutcome {
    pub fn narrative(&self) -> Narrative {
        match self {
            DigOutcome::NoShovel => Narrative::new()
                .plain("You can't dig for gold without a ")
                .item(ItemKind::Shovel)
                .plain("."),
            DigOutcome::AlreadyDug => {
                Narrative::new().plain("You already dug for gold in this town.")
            }
            DigOutcome::Dirt => Narrative::new().plain("You dug but only found dirt."),
            DigOutcome::Gold(gold) => Narrative::new()
                .plain("You dug up ")
                .gold(*gold)
                .plain("!"),
        }
    }
}

impl CrossingOutcome {
    /// True when the hunter made it across.
    pub fn crossed(&self) -> bool {
        !matches!(self, CrossingOutcome::Blocked { .. })
    }

    pub fn narrative(&self) -> Narrative {
        match self {
            CrossingOutcome::Sliced { terrain } => Narrative::new()
                .plain("You expertly slice your way through the dense bamboo of the ")
                .terrain(terrain)
                .plain(" with your ")
                .item(ItemKind::Katana)
                .plain("."),
            CrossingOutcome::Crossed {
                terrain,
                item,
                broke,
            } => {
                let narrative = Narrative::new()
                    .plain(format!("You used your {item} to cross the "))
                    .terrain(terrain)
                    .plain(".");
                if *broke {
                    narrative
                        .plain("\nUnfortunately, you lost your ")
                        .item(*item)
                        .plain(".")
                } else {
                    narrative
                }
            }
            CrossingOutcome::Blocked { hunter, item } => {
                let article = if item.takes_article() { "a " } else { "" };
                Narrative::new()
                    .plain(format!(
                        "You can't leave town, {hunter}. You don't have {article}"
                    ))
                    .item(*item)
                    .plain(".")
            }
        }
    }
}

impl TradeOutcome {
    pub fn narrative(&self) -> Narrative {
        match self {
            TradeOutcome::Buy(outcome) => outcome.narrative(),
            TradeOutcome::Sell(outcome) => outcome.narrative(),
        }
    }
}
