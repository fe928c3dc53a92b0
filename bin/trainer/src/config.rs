//! JSON schemas for the subgame input and strategy-dump output files.

use cfr_cards::{Card, Hole};
use cfr_core::{Probability, SolverError};
use cfr_river::{RiverConfig, RiverConfigBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub struct PlayerRangeFile {
    pub hands: Vec<String>,
    pub weights: Vec<f32>,
}

#[derive(Debug, Deserialize)]
pub struct SubgameConfigFile {
    pub board: Vec<String>,
    pub pot: i32,
    pub stack: i32,
    #[serde(default)]
    pub bet_sizes: Vec<f64>,
    pub oop_first_bets: Option<Vec<f64>>,
    pub ip_first_bets: Option<Vec<f64>>,
    pub oop_first_raises: Option<Vec<f64>>,
    pub ip_first_raises: Option<Vec<f64>>,
    pub oop_next_raises: Option<Vec<f64>>,
    pub ip_next_raises: Option<Vec<f64>>,
    #[serde(default)]
    pub include_all_in: bool,
    #[serde(default = "default_max_raises")]
    pub max_raises: u8,
    pub players: Vec<PlayerRangeFile>,
}

fn default_max_raises() -> u8 {
    4
}

fn parse_card(token: &str) -> Result<Card, SolverError> {
    Card::try_from(token).map_err(|_| SolverError::InvalidBoard {
        len: token.len(),
        expected: 2,
    })
}

fn parse_hole(token: &str) -> Result<Hole, SolverError> {
    if token.len() != 4 {
        return Err(SolverError::InvalidBoard {
            len: token.len(),
            expected: 4,
        });
    }
    let a = parse_card(&token[0..2])?;
    let b = parse_card(&token[2..4])?;
    Ok(Hole::new(a, b))
}

/// Builds a validated [`RiverConfig`] from the on-disk subgame schema of
/// the driver contract, threading parse failures through the same
/// [`SolverError`] the builder itself raises so the CLI has one error
/// type to map to an exit code.
pub fn build_river_config(file: &SubgameConfigFile) -> Result<RiverConfig, SolverError> {
    let board = file
        .board
        .iter()
        .map(|s| parse_card(s))
        .collect::<Result<Vec<_>, _>>()?;

    let mut builder = RiverConfigBuilder::new()
        .board(board)
        .pot(file.pot)
        .stack(file.stack)
        .bet_sizes(file.bet_sizes.clone())
        .include_all_in(file.include_all_in)
        .max_raises(file.max_raises);

    if let Some(sizes) = &file.oop_first_bets {
        builder = builder.oop_first_bets(sizes.clone());
    }
    if let Some(sizes) = &file.ip_first_bets {
        builder = builder.ip_first_bets(sizes.clone());
    }
    if let Some(sizes) = &file.oop_first_raises {
        builder = builder.oop_first_raises(sizes.clone());
    }
    if let Some(sizes) = &file.ip_first_raises {
        builder = builder.ip_first_raises(sizes.clone());
    }
    if let Some(sizes) = &file.oop_next_raises {
        builder = builder.oop_next_raises(sizes.clone());
    }
    if let Some(sizes) = &file.ip_next_raises {
        builder = builder.ip_next_raises(sizes.clone());
    }

    for (player, range) in file.players.iter().enumerate() {
        let combos = range
            .hands
            .iter()
            .zip(range.weights.iter())
            .map(|(hand, weight)| parse_hole(hand).map(|hole| (hole, *weight as Probability)))
            .collect::<Result<Vec<_>, _>>()?;
        builder = builder.range(player, combos);
    }

    builder.build()
}

#[derive(Debug, Serialize)]
pub struct InfosetDump {
    pub actions: Vec<String>,
    pub strategy: Vec<Vec<Probability>>,
}

#[derive(Debug, Serialize)]
pub struct PlayerDump {
    pub hands: Vec<String>,
    pub weights: Vec<Probability>,
    pub profile: HashMap<String, InfosetDump>,
}

#[derive(Debug, Serialize)]
pub struct StrategyDumpFile {
    pub players: [PlayerDump; 2],
}
