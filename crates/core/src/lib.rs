#![warn(clippy::all, missing_docs)]

//! Rules engine for Treasure Hunter.
//!
//! The crate owns the hunter, towns, terrain and shop rules along with
//! configuration and the session façade that drivers call once per player
//! intent. Nothing here performs terminal I/O; every operation returns an
//! outcome value carrying its narrative.

pub mod config;
pub mod hunter;
pub mod models;
pub mod narrative;
pub mod random;
pub mod session;
pub mod shop;
pub mod terrain;
pub mod town;

pub use config::AppConfig;
pub use hunter::Hunter;
pub use models::{Difficulty, ItemKind, ParseError, TreasureKind};
pub use narrative::{Fragment, Narrative, Tone};
pub use random::{RandomSource, ScriptedRandom};
pub use session::{Command, GameMode, GameSession, GameStatus, Snapshot, TurnReport};
pub use shop::{Shop, TradeSide};
pub use terrain::Terrain;
pub use town::Town;
