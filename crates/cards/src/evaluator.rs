use super::card::Card;
use super::hand::Hand;
use super::kickers::Kickers;
use super::rank::Rank;
use super::ranking::Ranking;
use super::suit::Suit;

/// A lazy evaluator for a hand's strength.
///
/// Rather than literally enumerating the C(7,5)=21 five-card subsets, this
/// searches for the highest-ranking category directly against the hand's
/// compact bitmask representation; the result is identical to the
/// subset-enumeration definition but runs in a handful of bitwise ops.
pub struct Evaluator(Hand);

impl From<Hand> for Evaluator {
    fn from(h: Hand) -> Self {
        Self(h)
    }
}

impl Evaluator {
    /// Evaluates five to seven cards, returning the best five-card
    /// category reachable from the set. Panics if fewer than five cards
    /// are present, per the evaluator's contract.
    pub fn evaluate(cards: &[Card]) -> Ranking {
        assert!(cards.len() >= 5, "evaluator needs at least 5 cards");
        Self::from(Hand::from(cards.to_vec())).find_ranking()
    }

    pub fn find_ranking(&self) -> Ranking {
        assert!(self.0.len() >= 5, "evaluator needs at least 5 cards");
        None.or_else(|| self.find_flush())
            .or_else(|| self.find_4_oak())
            .or_else(|| self.find_3_oak_2_oak())
            .or_else(|| self.find_straight())
            .or_else(|| self.find_3_oak())
            .or_else(|| self.find_2_oak_2_oak())
            .or_else(|| self.find_2_oak())
            .or_else(|| self.find_1_oak())
            .expect("at least one card in hand")
    }

    pub fn find_kickers(&self, value: Ranking) -> Kickers {
        let n = value.n_kickers();
        if n == 0 {
            return Kickers::from(0u16);
        }
        let mask = value.mask();
        let mut bits = mask & self.rank_masks();
        while bits.count_ones() as usize > n {
            bits &= !(1 << bits.trailing_zeros());
        }
        Kickers::from(bits)
    }

    fn find_1_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(1).map(Ranking::HighCard)
    }
    fn find_2_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(2).map(Ranking::OnePair)
    }
    fn find_3_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(3).map(Ranking::ThreeOAK)
    }
    fn find_4_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(4).map(Ranking::FourOAK)
    }
    fn find_2_oak_2_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(2).and_then(|hi| {
            self.find_rank_of_n_oak_under(2, Some(hi))
                .map(|lo| Ranking::TwoPair(hi, lo))
                .or(Some(Ranking::OnePair(hi)))
        })
    }
    fn find_3_oak_2_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(3).and_then(|trips| {
            self.find_rank_of_n_oak_under(2, Some(trips))
                .map(|pair| Ranking::FullHouse(trips, pair))
        })
    }
    fn find_straight(&self) -> Option<Ranking> {
        self.find_rank_of_straight(self.rank_masks())
            .map(Ranking::Straight)
    }
    fn find_flush(&self) -> Option<Ranking> {
        self.find_suit_of_flush().map(|suit| {
            self.find_rank_of_straight_flush(suit)
                .map(Ranking::StraightFlush)
                .unwrap_or_else(|| {
                    let bits = self.suit_masks()[suit as usize];
                    Ranking::Flush(Rank::from(bits))
                })
        })
    }

    fn find_rank_of_straight(&self, hand: u16) -> Option<Rank> {
        const WHEEL: u16 = 0b_1_0000_0000_1111;
        let mut bits = hand;
        bits &= bits << 1;
        bits &= bits << 1;
        bits &= bits << 1;
        bits &= bits << 1;
        if bits > 0 {
            Some(Rank::from(bits))
        } else if WHEEL == (WHEEL & hand) {
            Some(Rank::Five)
        } else {
            None
        }
    }
    fn find_rank_of_straight_flush(&self, suit: Suit) -> Option<Rank> {
        let bits = self.suit_masks()[suit as usize];
        self.find_rank_of_straight(bits)
    }
    fn find_suit_of_flush(&self) -> Option<Suit> {
        self.suit_count()
            .iter()
            .position(|&n| n >= 5)
            .map(|i| Suit::from(i as u8))
    }
    fn find_rank_of_n_oak_under(&self, oak: usize, under: Option<Rank>) -> Option<Rank> {
        let ceiling = under.map(|r| r as u8).unwrap_or(13) as u64;
        let lower_mask = (1u64 << (4 * ceiling)) - 1;
        let hand = u64::from(self.0) & lower_mask;
        let mut nibble = 0b_1111_u64 << (4 * ceiling) >> 4;
        while nibble > 0 {
            if oak <= (hand & nibble).count_ones() as usize {
                let rank = nibble.trailing_zeros() / 4;
                return Some(Rank::from(rank as u8));
            }
            nibble >>= 4;
        }
        None
    }
    fn find_rank_of_n_oak(&self, n: usize) -> Option<Rank> {
        self.find_rank_of_n_oak_under(n, None)
    }

    /// Which ranks are present in the hand, neglecting suit.
    fn rank_masks(&self) -> u16 {
        Vec::<Card>::from(self.0)
            .iter()
            .map(|c| u16::from(c.rank()))
            .fold(0, |acc, r| acc | r)
    }
    /// How many cards of each suit (index) are present, neglecting rank.
    fn suit_count(&self) -> [u8; 4] {
        Vec::<Card>::from(self.0)
            .iter()
            .map(|c| u8::from(c.suit() as u8))
            .fold([0; 4], |mut counts, s| {
                counts[s as usize] += 1;
                counts
            })
    }
    /// Which ranks are present, grouped by suit.
    fn suit_masks(&self) -> [u16; 4] {
        Vec::<Card>::from(self.0)
            .iter()
            .map(|c| (c.suit() as u8, u16::from(c.rank())))
            .fold([0; 4], |mut suits, (s, r)| {
                suits[s as usize] |= r;
                suits
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::Rank;
    use crate::suit::Suit;

    fn evaluate(cards: Vec<(Rank, Suit)>) -> Ranking {
        let cards: Vec<Card> = cards.into_iter().map(|(r, s)| Card::new(r, s)).collect();
        Evaluator::evaluate(&cards)
    }

    #[test]
    fn high_card() {
        let hand = vec![
            (Rank::Ace, Suit::Spade),
            (Rank::King, Suit::Heart),
            (Rank::Queen, Suit::Diamond),
            (Rank::Jack, Suit::Club),
            (Rank::Nine, Suit::Spade),
        ];
        assert_eq!(evaluate(hand), Ranking::HighCard(Rank::Ace));
    }

    #[test]
    fn one_pair() {
        let hand = vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Ace, Suit::Heart),
            (Rank::King, Suit::Diamond),
            (Rank::Queen, Suit::Club),
            (Rank::Jack, Suit::Spade),
        ];
        assert_eq!(evaluate(hand), Ranking::OnePair(Rank::Ace));
    }

    #[test]
    fn two_pair() {
        let hand = vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Ace, Suit::Heart),
            (Rank::King, Suit::Diamond),
            (Rank::King, Suit::Club),
            (Rank::Queen, Suit::Spade),
        ];
        assert_eq!(evaluate(hand), Ranking::TwoPair(Rank::Ace, Rank::King));
    }

    #[test]
    fn three_of_a_kind() {
        let hand = vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Ace, Suit::Heart),
            (Rank::Ace, Suit::Diamond),
            (Rank::King, Suit::Club),
            (Rank::Queen, Suit::Spade),
        ];
        assert_eq!(evaluate(hand), Ranking::ThreeOAK(Rank::Ace));
    }

    #[test]
    fn straight() {
        let hand = vec![
            (Rank::Ten, Suit::Spade),
            (Rank::Jack, Suit::Heart),
            (Rank::Queen, Suit::Diamond),
            (Rank::King, Suit::Club),
            (Rank::Ace, Suit::Spade),
        ];
        assert_eq!(evaluate(hand), Ranking::Straight(Rank::Ace));
    }

    #[test]
    fn flush() {
        let hand = vec![
            (Rank::Ace, Suit::Spade),
            (Rank::King, Suit::Spade),
            (Rank::Queen, Suit::Spade),
            (Rank::Jack, Suit::Spade),
            (Rank::Nine, Suit::Spade),
        ];
        assert_eq!(evaluate(hand), Ranking::Flush(Rank::Ace));
    }

    #[test]
    fn full_house() {
        let hand = vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Ace, Suit::Heart),
            (Rank::Ace, Suit::Diamond),
            (Rank::King, Suit::Club),
            (Rank::King, Suit::Spade),
        ];
        assert_eq!(evaluate(hand), Ranking::FullHouse(Rank::Ace, Rank::King));
    }

    #[test]
    fn four_of_a_kind() {
        let hand = vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Ace, Suit::Heart),
            (Rank::Ace, Suit::Diamond),
            (Rank::Ace, Suit::Club),
            (Rank::King, Suit::Spade),
        ];
        assert_eq!(evaluate(hand), Ranking::FourOAK(Rank::Ace));
    }

    #[test]
    fn straight_flush() {
        let hand = vec![
            (Rank::Ten, Suit::Spade),
            (Rank::Jack, Suit::Spade),
            (Rank::Queen, Suit::Spade),
            (Rank::King, Suit::Spade),
            (Rank::Ace, Suit::Spade),
        ];
        assert_eq!(evaluate(hand), Ranking::StraightFlush(Rank::Ace));
    }

    #[test]
    fn wheel_straight() {
        let hand = vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Two, Suit::Heart),
            (Rank::Three, Suit::Diamond),
            (Rank::Four, Suit::Club),
            (Rank::Five, Suit::Spade),
        ];
        assert_eq!(evaluate(hand), Ranking::Straight(Rank::Five));
    }

    #[test]
    fn wheel_straight_flush() {
        let hand = vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Two, Suit::Spade),
            (Rank::Three, Suit::Spade),
            (Rank::Four, Suit::Spade),
            (Rank::Five, Suit::Spade),
        ];
        assert_eq!(evaluate(hand), Ranking::StraightFlush(Rank::Five));
    }

    #[test]
    fn seven_card_hand_picks_best_five() {
        let hand = vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Ace, Suit::Heart),
            (Rank::King, Suit::Diamond),
            (Rank::King, Suit::Club),
            (Rank::Queen, Suit::Spade),
            (Rank::Jack, Suit::Heart),
            (Rank::Nine, Suit::Diamond),
        ];
        assert_eq!(evaluate(hand), Ranking::TwoPair(Rank::Ace, Rank::King));
    }

    #[test]
    fn flush_beats_straight() {
        let hand = vec![
            (Rank::Four, Suit::Heart),
            (Rank::Six, Suit::Heart),
            (Rank::Seven, Suit::Heart),
            (Rank::Eight, Suit::Heart),
            (Rank::Nine, Suit::Heart),
            (Rank::Ten, Suit::Spade),
        ];
        assert_eq!(evaluate(hand), Ranking::Flush(Rank::Nine));
    }

    #[test]
    fn full_house_beats_flush() {
        let hand = vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Ace, Suit::Heart),
            (Rank::Ace, Suit::Diamond),
            (Rank::King, Suit::Spade),
            (Rank::King, Suit::Heart),
            (Rank::Queen, Suit::Spade),
            (Rank::Jack, Suit::Spade),
        ];
        assert_eq!(evaluate(hand), Ranking::FullHouse(Rank::Ace, Rank::King));
    }

    #[test]
    fn two_three_of_a_kinds_make_a_full_house() {
        let hand = vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Ace, Suit::Heart),
            (Rank::Ace, Suit::Diamond),
            (Rank::King, Suit::Club),
            (Rank::King, Suit::Spade),
            (Rank::King, Suit::Heart),
            (Rank::Queen, Suit::Diamond),
        ];
        assert_eq!(evaluate(hand), Ranking::FullHouse(Rank::Ace, Rank::King));
    }

    #[test]
    fn four_of_a_kind_beats_full_house() {
        let hand = vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Ace, Suit::Heart),
            (Rank::Ace, Suit::Diamond),
            (Rank::Ace, Suit::Club),
            (Rank::King, Suit::Spade),
            (Rank::King, Suit::Heart),
            (Rank::Queen, Suit::Diamond),
        ];
        assert_eq!(evaluate(hand), Ranking::FourOAK(Rank::Ace));
    }

    #[test]
    fn straight_flush_beats_four_of_a_kind() {
        let hand = vec![
            (Rank::Ten, Suit::Spade),
            (Rank::Jack, Suit::Spade),
            (Rank::Queen, Suit::Spade),
            (Rank::King, Suit::Spade),
            (Rank::Ace, Suit::Spade),
            (Rank::Ace, Suit::Heart),
            (Rank::Ace, Suit::Diamond),
        ];
        assert_eq!(evaluate(hand), Ranking::StraightFlush(Rank::Ace));
    }

    #[test]
    fn low_straight_among_six_cards() {
        let hand = vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Two, Suit::Spade),
            (Rank::Three, Suit::Heart),
            (Rank::Four, Suit::Diamond),
            (Rank::Five, Suit::Club),
            (Rank::Six, Suit::Spade),
        ];
        assert_eq!(evaluate(hand), Ranking::Straight(Rank::Six));
    }

    #[test]
    fn three_pair_keeps_only_the_top_two() {
        let hand = vec![
            (Rank::Ace, Suit::Spade),
            (Rank::Ace, Suit::Heart),
            (Rank::King, Suit::Diamond),
            (Rank::King, Suit::Club),
            (Rank::Queen, Suit::Spade),
            (Rank::Queen, Suit::Heart),
            (Rank::Jack, Suit::Diamond),
        ];
        assert_eq!(evaluate(hand), Ranking::TwoPair(Rank::Ace, Rank::King));
    }

    #[test]
    #[should_panic]
    fn fewer_than_five_cards_panics() {
        let hand = vec![(Rank::Ace, Suit::Spade), (Rank::King, Suit::Heart)];
        evaluate(hand);
    }
}
