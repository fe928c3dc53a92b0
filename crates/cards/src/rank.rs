use std::fmt::{Display, Formatter, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Two = 0,
    Three = 1,
    Four = 2,
    Five = 3,
    Six = 4,
    Seven = 5,
    Eight = 6,
    Nine = 7,
    Ten = 8,
    Jack = 9,
    Queen = 10,
    King = 11,
    Ace = 12,
}

impl From<u8> for Rank {
    fn from(n: u8) -> Rank {
        match n {
            0 => Rank::Two,
            1 => Rank::Three,
            2 => Rank::Four,
            3 => Rank::Five,
            4 => Rank::Six,
            5 => Rank::Seven,
            6 => Rank::Eight,
            7 => Rank::Nine,
            8 => Rank::Ten,
            9 => Rank::Jack,
            10 => Rank::Queen,
            11 => Rank::King,
            12 => Rank::Ace,
            _ => panic!("invalid rank {n}"),
        }
    }
}

/// Ranks pack into the low bit of a 13-bit mask (the bit position equals
/// the rank's ordinal), used pervasively by the evaluator's bitmask scans.
impl From<Rank> for u16 {
    fn from(r: Rank) -> u16 {
        1 << (r as u8)
    }
}

/// Recovers a rank from a single-set-bit mask, or the highest set bit of a
/// wider mask (used when reading off a straight's top card).
impl From<u16> for Rank {
    fn from(mask: u16) -> Rank {
        Rank::from((15 - mask.leading_zeros()) as u8)
    }
}

impl TryFrom<char> for Rank {
    type Error = ();
    fn try_from(c: char) -> std::result::Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            '2' => Ok(Rank::Two),
            '3' => Ok(Rank::Three),
            '4' => Ok(Rank::Four),
            '5' => Ok(Rank::Five),
            '6' => Ok(Rank::Six),
            '7' => Ok(Rank::Seven),
            '8' => Ok(Rank::Eight),
            '9' => Ok(Rank::Nine),
            'T' => Ok(Rank::Ten),
            'J' => Ok(Rank::Jack),
            'Q' => Ok(Rank::Queen),
            'K' => Ok(Rank::King),
            'A' => Ok(Rank::Ace),
            _ => Err(()),
        }
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(
            f,
            "{}",
            match self {
                Rank::Two => "2",
                Rank::Three => "3",
                Rank::Four => "4",
                Rank::Five => "5",
                Rank::Six => "6",
                Rank::Seven => "7",
                Rank::Eight => "8",
                Rank::Nine => "9",
                Rank::Ten => "T",
                Rank::Jack => "J",
                Rank::Queen => "Q",
                Rank::King => "K",
                Rank::Ace => "A",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_round_trips_through_single_bit() {
        for n in 0..13u8 {
            let rank = Rank::from(n);
            let mask = u16::from(rank);
            assert_eq!(mask.count_ones(), 1);
            assert_eq!(Rank::from(mask) as u8, n);
        }
    }

    #[test]
    fn mask_of_wider_set_reads_highest() {
        let mask = u16::from(Rank::Two) | u16::from(Rank::Ace);
        assert_eq!(Rank::from(mask), Rank::Ace);
    }

    #[test]
    fn parses_char_tokens() {
        assert_eq!(Rank::try_from('T'), Ok(Rank::Ten));
        assert_eq!(Rank::try_from('a'), Ok(Rank::Ace));
        assert_eq!(Rank::try_from('x'), Err(()));
    }
}
