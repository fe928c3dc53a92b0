use super::card::Card;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn new() -> Deck {
        Deck {
            cards: (0..52).map(Card::from).collect(),
        }
    }

    pub fn shuffled(seed: u64) -> Deck {
        let mut deck = Self::new();
        let mut rng = SmallRng::seed_from_u64(seed);
        deck.cards.shuffle(&mut rng);
        deck
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}
