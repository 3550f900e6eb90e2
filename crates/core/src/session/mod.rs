#![allow(missing_docs)]

//! Game session façade: menu commands, game modes and turn reports.

mod command;
mod game;
mod mode;

pub use command::Command;
pub use game::{GameSession, GameStatus, ShopVisit, Snapshot, TurnReport};
pub use mode::GameMode;
