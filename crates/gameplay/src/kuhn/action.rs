use std::fmt::{Display, Formatter, Result};

/// Kuhn's three-letter action alphabet. `Check` also serves as the "call"
/// token when it follows a bet — the game has only one bet size, so there
/// is no separate raise action to disambiguate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KuhnAction {
    Check,
    Bet,
    Fold,
}

impl Display for KuhnAction {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(
            f,
            "{}",
            match self {
                KuhnAction::Check => "c",
                KuhnAction::Bet => "b",
                KuhnAction::Fold => "f",
            }
        )
    }
}

/// The three Kuhn ranks, ordered low to high. Suits do not exist in this
/// toy game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KuhnCard {
    Jack,
    Queen,
    King,
}

impl Display for KuhnCard {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(
            f,
            "{}",
            match self {
                KuhnCard::Jack => "J",
                KuhnCard::Queen => "Q",
                KuhnCard::King => "K",
            }
        )
    }
}

pub const DECK: [KuhnCard; 3] = [KuhnCard::Jack, KuhnCard::Queen, KuhnCard::King];
