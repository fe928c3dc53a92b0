use super::evaluator::Evaluator;
use super::hand::Hand;
use super::kickers::Kickers;
use super::ranking::Ranking;

/// A hand's strength: a lexicographically comparable `(category,
/// tiebreakers…)` tuple. Always constructed from a `Hand` of five to
/// seven cards; ties between two `Strength` values mean the hands chop
/// the pot.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub struct Strength {
    category: Ranking,
    kickers: Kickers,
}

impl Strength {
    pub fn category(&self) -> Ranking {
        self.category
    }
}

impl From<Hand> for Strength {
    fn from(hand: Hand) -> Self {
        Self::from(Evaluator::from(hand))
    }
}

impl From<Evaluator> for Strength {
    fn from(e: Evaluator) -> Self {
        let category = e.find_ranking();
        let kickers = e.find_kickers(category);
        Self::from((category, kickers))
    }
}

impl From<(Ranking, Kickers)> for Strength {
    fn from((category, kickers): (Ranking, Kickers)) -> Self {
        Self { category, kickers }
    }
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:<18}{:>13}", self.category, self.kickers)
    }
}
