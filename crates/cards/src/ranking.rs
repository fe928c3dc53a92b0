use super::rank::Rank;

/// A poker hand's category, carrying just enough rank information to break
/// ties within the category; finer kicker ties are resolved by
/// [`crate::kickers::Kickers`]. Derived `Ord` gives the showdown order
/// directly, since variants are declared weakest-first.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub enum Ranking {
    HighCard(Rank),        // 4 kickers
    OnePair(Rank),         // 3 kickers
    TwoPair(Rank, Rank),   // 1 kicker
    ThreeOAK(Rank),        // 2 kickers
    Straight(Rank),        // 0 kickers
    Flush(Rank),           // 0 kickers
    FullHouse(Rank, Rank), // 0 kickers
    FourOAK(Rank),         // 1 kicker
    StraightFlush(Rank),   // 0 kickers
}

impl Ranking {
    pub fn n_kickers(&self) -> usize {
        match self {
            Ranking::HighCard(_) => 4,
            Ranking::OnePair(_) => 3,
            Ranking::ThreeOAK(_) => 2,
            Ranking::FourOAK(_) | Ranking::TwoPair(_, _) => 1,
            _ => 0,
        }
    }

    /// Mask of ranks that are *not* already accounted for by this ranking's
    /// own rank fields, i.e. the candidates eligible to serve as kickers.
    pub fn mask(&self) -> u16 {
        match *self {
            Ranking::TwoPair(hi, lo) => !(u16::from(hi) | u16::from(lo)),
            Ranking::HighCard(hi)
            | Ranking::OnePair(hi)
            | Ranking::FourOAK(hi)
            | Ranking::ThreeOAK(hi) => !u16::from(hi),
            Ranking::FullHouse(..)
            | Ranking::StraightFlush(..)
            | Ranking::Straight(..)
            | Ranking::Flush(..) => unreachable!("category carries no kickers"),
        }
    }
}

impl std::fmt::Display for Ranking {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Ranking::FullHouse(r1, r2) => write!(f, "FullHouse     {r1}{r2}"),
            Ranking::TwoPair(r1, r2) => write!(f, "TwoPair       {r1}{r2}"),
            Ranking::HighCard(r) => write!(f, "HighCard      {r} "),
            Ranking::OnePair(r) => write!(f, "OnePair       {r} "),
            Ranking::ThreeOAK(r) => write!(f, "ThreeOfAKind  {r} "),
            Ranking::Straight(r) => write!(f, "Straight      {r} "),
            Ranking::FourOAK(r) => write!(f, "FourOfAKind   {r} "),
            Ranking::Flush(r) => write!(f, "Flush         {r} "),
            Ranking::StraightFlush(r) => write!(f, "StraightFlush {r} "),
        }
    }
}
