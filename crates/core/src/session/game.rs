use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{info, warn};

use crate::hunter::Hunter;
use crate::models::{Difficulty, DifficultySettings, ItemKind, TreasureKind};
use crate::narrative::{Narrative, Tone};
use crate::random::RandomSource;
use crate::shop::{Quote, TradeSide};
use crate::town::Town;

use super::{Command, GameMode};

/// Where the game stands after a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Ongoing,
    Won,
    Lost,
    Quit,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::Ongoing
    }
}

/// Read-only view of the game for drivers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub hunter: String,
    pub gold: i32,
    pub kit: Vec<ItemKind>,
    pub treasures: Vec<TreasureKind>,
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub terrain: String,
    pub required_item: ItemKind,
    pub tough_town: bool,
    pub searched: bool,
    pub dug: bool,
    pub towns_visited: u32,
    pub turns: u32,
    pub shop: Option<ShopVisit>,
}

/// An open conversation at the shop counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShopVisit {
    pub side: TradeSide,
    /// Item quoted and awaiting a y/n answer.
    pub pending: Option<ItemKind>,
}

/// Everything a driver needs to render the result of one call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnReport {
    pub narrative: Narrative,
    pub snapshot: Snapshot,
    pub status: GameStatus,
}

/// One playthrough: a hunter, the town they stand in and the dice.
///
/// The session never blocks or prints. Each call consumes one player intent
/// and returns a [`TurnReport`].
#[derive(Debug, Clone)]
pub struct GameSession<R: RandomSource = StdRng> {
    hunter: Hunter,
    town: Town,
    mode: GameMode,
    settings: DifficultySettings,
    rng: R,
    shop: Option<ShopVisit>,
    quit: bool,
    towns_visited: u32,
    turns: u32,
}

impl<R: RandomSource> GameSession<R> {
    /// Set up the hunter for `mode` and roll the first town.
    pub fn new(name: &str, mode: GameMode, mut rng: R) -> Self {
        let name = name.trim().to_lowercase();
        let mut hunter = Hunter::new(name, mode.starting_gold(), mode.is_samurai());
        for item in mode.starter_kit() {
            hunter.buy_item(item, 0);
        }
        let settings = mode.difficulty().settings();
        let town = Town::new(&settings, hunter.is_samurai(), &mut rng);
        info!(hunter = hunter.name(), %mode, gold = hunter.gold(), "game started");
        Self {
            hunter,
            town,
            mode,
            settings,
            rng,
            shop: None,
            quit: false,
            towns_visited: 1,
            turns: 0,
        }
    }

    /// Start from the player's raw answers: greeting, then first arrival.
    pub fn start(name: &str, choice: &str, rng: R) -> (Self, TurnReport) {
        let (mode, recognised) = GameMode::from_choice(choice);
        let greeting = if recognised {
            mode.greeting()
        } else {
            warn!(choice, "unrecognised mode, using normal");
            GameMode::fallback_greeting()
        };
        let session = Self::new(name, mode, rng);
        let narrative = greeting
            .plain("\n")
            .then(session.town.arrival(&session.hunter));
        let report = session.report(narrative);
        (session, report)
    }

    pub fn hunter(&self) -> &Hunter {
        &self.hunter
    }

    pub fn town(&self) -> &Town {
        &self.town
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Win is checked before loss.
    pub fn status(&self) -> GameStatus {
        if self.hunter.is_complete() {
            GameStatus::Won
        } else if self.hunter.gold() < 0 {
            GameStatus::Lost
        } else if self.quit {
            GameStatus::Quit
        } else {
            GameStatus::Ongoing
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            hunter: self.hunter.name().to_string(),
            gold: self.hunter.gold(),
            kit: self.hunter.kit().collect(),
            treasures: self.hunter.treasures().to_vec(),
            mode: self.mode,
            difficulty: self.mode.difficulty(),
            terrain: self.town.terrain().name().to_string(),
            required_item: self.town.terrain().required_item(),
            tough_town: self.town.is_tough(),
            searched: self.town.has_searched(),
            dug: self.town.has_dug(),
            towns_visited: self.towns_visited,
            turns: self.turns,
            shop: self.shop,
        }
    }

    /// Hunter and town summary lines.
    pub fn info(&self) -> Narrative {
        self.hunter.info().plain("\n").then(self.town.info())
    }

    /// Parse a menu letter and apply it.
    pub fn apply_input(&mut self, input: &str) -> TurnReport {
        match input.parse::<Command>() {
            Ok(command) => self.apply(command),
            Err(err) => {
                warn!(%err, "rejected menu input");
                self.report(Narrative::new().push(
                    "Yikes! That's an invalid option! Try again.",
                    Tone::Warning,
                ))
            }
        }
    }

    /// Apply one menu command.
    ///
    /// Buying and selling only open the shop; finish the trade with
    /// [`quote`](Self::quote) and [`confirm`](Self::confirm).
    pub fn apply(&mut self, command: Command) -> TurnReport {
        if self.status().is_over() {
            return self.report(Narrative::new());
        }
        self.turns += 1;
        self.shop = None;

        let narrative = match command {
            Command::Buy => self.open_shop(TradeSide::Buy),
            Command::Sell => self.open_shop(TradeSide::Sell),
            Command::Explore => self.town.terrain().info(),
            Command::Move => self.move_on(),
            Command::LookForTrouble => self
                .town
                .look_for_trouble(&mut self.hunter, &mut self.rng)
                .narrative(),
            Command::HuntForTreasure => self.town.hunt_for_treasure(&mut self.hunter).narrative(),
            Command::DigForGold => self
                .town
                .dig_for_gold(&mut self.hunter, &mut self.rng)
                .narrative(),
            Command::Exit => {
                self.quit = true;
                info!(hunter = self.hunter.name(), "hunter gave up");
                Narrative::new().plain(format!("Fare thee well, {}!", self.hunter.name()))
            }
        };
        self.finish_turn(narrative)
    }

    /// Ask the shopkeeper about an item by name.
    ///
    /// An unavailable item ends the visit; a priced one waits for [`confirm`](Self::confirm).
    pub fn quote(&mut self, name: &str) -> TurnReport {
        let Some(visit) = self.shop else {
            return self.report(Narrative::new().plain("You are not in the shop."));
        };
        let quote = self.town.shop().quote_named(name, visit.side);
        let narrative = quote.narrative();
        match quote {
            Quote::Price { item, .. } => {
                self.shop = Some(ShopVisit {
                    side: visit.side,
                    pending: Some(item),
                });
                self.report(narrative)
            }
            Quote::Unavailable { .. } => {
                self.shop = None;
                self.report(narrative.plain("\n").then(left_shop()))
            }
        }
    }

    /// Answer the shopkeeper's y/n question. The visit ends either way.
    pub fn confirm(&mut self, accept: bool) -> TurnReport {
        let Some(ShopVisit {
            side,
            pending: Some(item),
        }) = self.shop
        else {
            return self.report(Narrative::new().plain("There is nothing to agree to."));
        };
        self.shop = None;
        if !accept {
            return self.report(left_shop());
        }
        let outcome = self.town.trade(&mut self.hunter, side, item.name());
        let narrative = outcome.narrative().plain("\n").then(left_shop());
        self.finish_turn(narrative)
    }

    /// Walk away from the counter without trading.
    pub fn leave_shop(&mut self) -> TurnReport {
        self.shop = None;
        self.report(left_shop())
    }

    fn open_shop(&mut self, side: TradeSide) -> Narrative {
        self.shop = Some(ShopVisit {
            side,
            pending: None,
        });
        self.town.enter_shop(&self.hunter, side)
    }

    fn move_on(&mut self) -> Narrative {
        let crossing = self.town.leave(&mut self.hunter, &mut self.rng);
        let narrative = crossing.narrative();
        if !crossing.crossed() {
            return narrative;
        }
        self.town = Town::new(&self.settings, self.hunter.is_samurai(), &mut self.rng);
        self.towns_visited += 1;
        narrative
            .plain("\n")
            .then(self.town.arrival(&self.hunter))
    }

    fn finish_turn(&mut self, narrative: Narrative) -> TurnReport {
        let narrative = match self.status() {
            GameStatus::Won => {
                info!(hunter = self.hunter.name(), turns = self.turns, "hunter won");
                narrative
                    .plain("\n\n")
                    .push("You Win!\n", Tone::Success)
                    .plain("You found all 3 treasures!")
            }
            GameStatus::Lost => {
                info!(hunter = self.hunter.name(), gold = self.hunter.gold(), "hunter lost");
                narrative
                    .plain("\n\n")
                    .push("GAME OVER\n", Tone::Danger)
                    .plain("You ran out of gold!")
            }
            GameStatus::Quit | GameStatus::Ongoing => narrative,
        };
        self.report(narrative)
    }

    fn report(&self, narrative: Narrative) -> TurnReport {
        TurnReport {
            narrative,
            snapshot: self.snapshot(),
            status: self.status(),
        }
    }
}

fn left_shop() -> Narrative {
    Narrative::new().plain("You left the shop.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// First town: Mountains, the given cache, sleepy. Later draws follow.
    fn session_with(
        mode: GameMode,
        cache: i32,
        chances: &[f64],
        rolls: &[i32],
    ) -> GameSession<ScriptedRandom> {
        let rng = ScriptedRandom::new(
            [0.99].into_iter().chain(chances.iter().copied()),
            [0, cache].into_iter().chain(rolls.iter().copied()),
        );
        GameSession::new("Ann", mode, rng)
    }

    #[test]
    fn start_greets_and_describes_the_first_town() {
        let rng = ScriptedRandom::new([0.99], [3, 3]);
        let (session, report) = GameSession::start("Ann", "e", rng);
        assert_eq!(session.mode(), GameMode::Easy);
        assert_eq!(report.snapshot.gold, 40);
        assert_eq!(report.snapshot.hunter, "ann");
        assert_eq!(report.snapshot.terrain, "Desert");
        assert_eq!(report.status, GameStatus::Ongoing);
        assert_eq!(
            report.narrative.to_string(),
            "Easy Mode. This be your first time?\nWelcome to town, ann.\nWe're just a sleepy little town with mild mannered folk."
        );
    }

    #[test]
    fn unknown_mode_grumbles_and_plays_normal() {
        let (session, report) = GameSession::start("bo", "xyz", ScriptedRandom::default());
        assert_eq!(session.mode(), GameMode::Normal);
        assert!(report.narrative.to_string().starts_with("Uhhh..."));
        assert_eq!(report.snapshot.gold, 20);
    }

    #[test]
    fn invalid_menu_input_changes_nothing() {
        let mut session = session_with(GameMode::Normal, 3, &[], &[]);
        let before = session.snapshot();
        let report = session.apply_input("q");
        assert_eq!(
            report.narrative.to_string(),
            "Yikes! That's an invalid option! Try again."
        );
        assert_eq!(report.snapshot, before);
    }

    #[test]
    fn buying_rope_walks_through_the_shop_protocol() {
        let mut session = session_with(GameMode::Normal, 3, &[], &[]);
        let report = session.apply(Command::Buy);
        assert!(report.narrative.to_string().contains("Rope: 4 gold"));
        assert!(!report.narrative.to_string().contains("KATANA"));

        let report = session.quote("Rope");
        assert_eq!(
            report.narrative.to_string(),
            "It'll cost you 4 gold. Buy it (y/n)?"
        );
        assert_eq!(
            report.snapshot.shop.and_then(|visit| visit.pending),
            Some(ItemKind::Rope)
        );

        let report = session.confirm(true);
        assert_eq!(report.snapshot.gold, 16);
        assert_eq!(report.snapshot.kit, vec![ItemKind::Rope]);
        assert_eq!(report.snapshot.shop, None);
        assert!(report.narrative.to_string().ends_with("You left the shop."));
    }

    #[test]
    fn declining_or_unknown_items_leave_the_shop_untouched() {
        let mut session = session_with(GameMode::Normal, 3, &[], &[]);
        session.apply(Command::Buy);
        session.quote("boat");
        let report = session.confirm(false);
        assert_eq!(report.narrative.to_string(), "You left the shop.");
        assert_eq!(report.snapshot.gold, 20);

        session.apply(Command::Buy);
        let report = session.quote("katana");
        assert_eq!(
            report.narrative.to_string(),
            "We ain't got none of those.\nYou left the shop."
        );
        assert_eq!(report.snapshot.shop, None);
    }

    #[test]
    fn samurai_katana_makes_every_purchase_free() {
        let mut session = session_with(GameMode::Samurai, 3, &[], &[]);
        session.apply(Command::Buy);
        session.quote("katana");
        session.confirm(true);
        assert!(session.hunter().has_item(ItemKind::Katana));

        session.apply(Command::Buy);
        session.quote("water");
        let report = session.confirm(true);
        assert_eq!(report.snapshot.gold, 20);
        assert!(report.snapshot.kit.contains(&ItemKind::Water));
    }

    #[test]
    fn only_samurai_hunters_find_katanas_in_later_towns() {
        let normal = session_with(GameMode::Normal, 3, &[], &[]);
        assert!(!normal.town().shop().allows_katana());

        let mut session = session_with(GameMode::Samurai, 3, &[0.9], &[2, 0]);
        assert!(session.town().shop().allows_katana());
        for item in ["katana", "rope"] {
            session.apply(Command::Buy);
            session.quote(item);
            session.confirm(true);
        }
        let report = session.apply(Command::Move);
        assert_eq!(report.snapshot.towns_visited, 2);
        assert!(session.hunter().is_samurai());
        assert!(session.town().shop().allows_katana());
    }

    #[test]
    fn selling_pays_the_marked_down_price() {
        let mut session = session_with(GameMode::Test, 3, &[], &[]);
        session.apply(Command::Sell);
        let report = session.quote("boat");
        assert_eq!(
            report.narrative.to_string(),
            "It'll get you 10 gold. Sell it (y/n)?"
        );
        let report = session.confirm(true);
        assert_eq!(report.snapshot.gold, 110);
        assert!(!report.snapshot.kit.contains(&ItemKind::Boat));
    }

    #[test]
    fn moving_needs_the_crossing_item() {
        let mut session = session_with(GameMode::Normal, 3, &[], &[]);
        let report = session.apply(Command::Move);
        assert_eq!(
            report.narrative.to_string(),
            "You can't leave town, ann. You don't have a rope."
        );
        assert_eq!(report.snapshot.towns_visited, 1);
    }

    #[test]
    fn moving_rolls_a_fresh_town() {
        // keep the rope, then roll Ocean with a gem in a tough town
        let mut session = session_with(GameMode::Test, 3, &[0.9, 0.1], &[1, 1]);
        let report = session.apply(Command::Move);
        assert_eq!(report.snapshot.terrain, "Ocean");
        assert!(report.snapshot.tough_town);
        assert!(!report.snapshot.searched);
        assert_eq!(report.snapshot.towns_visited, 2);
        assert!(report.snapshot.kit.contains(&ItemKind::Rope));
        let text = report.narrative.to_string();
        assert!(text.starts_with("You used your rope to cross the Mountains."));
        assert!(text.ends_with("It's pretty rough around here, so watch yourself."));
        assert_eq!(
            session.town().cache(),
            crate::models::Cache::Treasure(TreasureKind::Gem)
        );
    }

    #[test]
    fn a_lost_brawl_below_zero_ends_the_game() {
        // trouble found, lose 1 gold in a hard sleepy town
        let mut session = session_with(GameMode::TestLose, 3, &[0.9, 0.1], &[1]);
        let report = session.apply(Command::LookForTrouble);
        assert_eq!(report.snapshot.gold, -1);
        assert_eq!(report.status, GameStatus::Lost);
        assert!(report.narrative.to_string().ends_with("GAME OVER\nYou ran out of gold!"));

        let after = session.apply(Command::DigForGold);
        assert!(after.narrative.is_empty());
        assert_eq!(after.snapshot.turns, report.snapshot.turns);
    }

    #[test]
    fn three_treasures_win_even_when_broke() {
        let mut session = session_with(GameMode::Normal, 0, &[], &[]);
        session.hunter.add_treasure(TreasureKind::Gem);
        session.hunter.add_treasure(TreasureKind::Trophy);
        let report = session.apply(Command::HuntForTreasure);
        assert_eq!(report.snapshot.treasures.len(), 3);
        assert_eq!(report.status, GameStatus::Won);
        assert!(report.narrative.to_string().contains("You Win!"));

        session.hunter.change_gold(-25);
        assert_eq!(session.status(), GameStatus::Won);
    }

    #[test]
    fn exit_says_goodbye() {
        let mut session = session_with(GameMode::Normal, 3, &[], &[]);
        let report = session.apply_input("x");
        assert_eq!(report.narrative.to_string(), "Fare thee well, ann!");
        assert_eq!(report.status, GameStatus::Quit);
    }

    #[test]
    fn seeded_sessions_replay_identically() {
        let play = |seed: u64| {
            let rng = ChaCha8Rng::seed_from_u64(seed);
            let (mut session, _) = GameSession::start("ann", "test", rng);
            let mut log = Vec::new();
            for letter in ["l", "h", "d", "m", "l", "h", "m", "d"] {
                let report = session.apply_input(letter);
                log.push(report.snapshot);
            }
            log
        };
        assert_eq!(play(2024), play(2024));
    }

    #[test]
    fn snapshots_serialize_for_drivers() {
        let session = session_with(GameMode::Hard, 3, &[], &[]);
        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["mode"], "hard");
        assert_eq!(json["difficulty"], "hard");
        assert_eq!(json["required_item"], "rope");
        assert_eq!(json["shop"], serde_json::Value::Null);
    }
}
