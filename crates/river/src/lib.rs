mod action;
mod config;
mod game;
mod range;
mod state;
mod tree;

pub use action::RiverAction;
pub use config::{BetSizing, RiverConfig, RiverConfigBuilder};
pub use game::RiverGame;
pub use range::{HandRange, RangeHand};
pub use state::RiverState;
pub use tree::{RiverTree, Showdown};
