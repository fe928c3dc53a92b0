use super::card::Card;
use std::fmt::{Display, Formatter, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Street {
    Flop,
    Turn,
    River,
}

/// Community cards. The solver core only ever builds river boards (five
/// cards, no further dealing), but `Street` is kept so a board's
/// completeness can be asserted at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub cards: Vec<Card>,
}

impl Board {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn street(&self) -> Option<Street> {
        match self.cards.len() {
            3 => Some(Street::Flop),
            4 => Some(Street::Turn),
            5 => Some(Street::River),
            _ => None,
        }
    }

    pub fn has_duplicates(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        !self.cards.iter().all(|c| seen.insert(*c))
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter) -> Result {
        for card in &self.cards {
            write!(f, "{card} ")?;
        }
        Ok(())
    }
}
