use super::rank::Rank;
use super::suit::Suit;
use std::fmt::{Display, Formatter, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    pub fn to_int(&self) -> u8 {
        (self.rank as u8) * 4 + (self.suit as u8)
    }

    pub fn to_bits(&self) -> u64 {
        1 << self.to_int()
    }
}

/// u8 isomorphism: `rank * 4 + suit`, i.e. 0..52 with suit as the fast axis.
impl From<Card> for u8 {
    fn from(c: Card) -> u8 {
        c.to_int()
    }
}
impl From<u8> for Card {
    fn from(n: u8) -> Self {
        Self {
            rank: Rank::from(n / 4),
            suit: Suit::from(n % 4),
        }
    }
}

/// u64 isomorphism: a single set bit at `to_int()`.
impl From<Card> for u64 {
    fn from(c: Card) -> u64 {
        c.to_bits()
    }
}
impl From<u64> for Card {
    fn from(n: u64) -> Self {
        Self {
            rank: Rank::from((n.trailing_zeros() / 4) as u8),
            suit: Suit::from((n.trailing_zeros() % 4) as u8),
        }
    }
}

impl TryFrom<&str> for Card {
    type Error = ();
    fn try_from(s: &str) -> std::result::Result<Self, Self::Error> {
        let mut chars = s.chars();
        let rank = Rank::try_from(chars.next().ok_or(())?)?;
        let suit = Suit::try_from(chars.next().ok_or(())?)?;
        if chars.next().is_some() {
            return Err(());
        }
        Ok(Self { rank, suit })
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}
