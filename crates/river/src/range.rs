use cfr_cards::{Board, Card, Hole, Strength};
use cfr_core::Probability;

/// One combo in a player's range: a hole-card pair, its (pre-normalization)
/// weight, and its strength against a fixed board, computed once at
/// construction and never touched again.
#[derive(Debug, Clone, Copy)]
pub struct RangeHand {
    pub hole: Hole,
    pub weight: Probability,
    pub strength: Strength,
}

/// A player's range on a fixed board: weighted hole-card combos plus a
/// precomputed blocking table so the showdown kernel can subtract blocked
/// opponent combos in time proportional to the block set, not the whole
/// opponent range.
#[derive(Debug, Clone)]
pub struct HandRange {
    pub hands: Vec<RangeHand>,
    /// `blocked[i]` lists indices into *this* range's hero/villain
    /// counterpart that share a card with `hands[i]`. Populated by
    /// [`HandRange::index_blocking_against`] once both ranges are known.
    blocked: Vec<Vec<usize>>,
    /// Indices into `hands`, sorted ascending by strength. Computed once
    /// so the showdown kernel can binary-search a fixed order instead of
    /// re-sorting every time a reach vector changes.
    pub sorted_by_strength: Vec<usize>,
}

impl HandRange {
    /// Builds a range from hole cards and raw weights, dropping any combo
    /// that overlaps the board, and renormalizing the remaining weights to
    /// sum to 1.
    pub fn new(board: &Board, combos: Vec<(Hole, Probability)>) -> Self {
        let board_mask: u64 = board
            .cards
            .iter()
            .map(|c| u64::from(*c))
            .fold(0u64, |a, b| a | b);

        let mut hands: Vec<RangeHand> = combos
            .into_iter()
            .filter(|(hole, _)| {
                let hole_mask = u64::from(hole.c1) | u64::from(hole.c2);
                hole_mask & board_mask == 0
            })
            .map(|(hole, weight)| {
                let mut cards: Vec<Card> = board.cards.clone();
                cards.push(hole.c1);
                cards.push(hole.c2);
                let strength = Strength::from(cfr_cards::Hand::from(cards));
                RangeHand {
                    hole,
                    weight,
                    strength,
                }
            })
            .collect();

        let total: Probability = hands.iter().map(|h| h.weight).sum();
        if total > 0.0 {
            for hand in hands.iter_mut() {
                hand.weight /= total;
            }
        }

        let blocked = vec![Vec::new(); hands.len()];
        let mut sorted_by_strength: Vec<usize> = (0..hands.len()).collect();
        sorted_by_strength.sort_by_key(|&i| hands[i].strength);
        Self {
            hands,
            blocked,
            sorted_by_strength,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hands.len()
    }

    pub fn weight_sum(&self) -> Probability {
        self.hands.iter().map(|h| h.weight).sum()
    }

    pub fn blocked_by(&self, i: usize) -> &[usize] {
        &self.blocked[i]
    }

    /// For every hand in `self`, records which indices in `other` it
    /// blocks (shares a hole card with). Symmetric blocking — the caller
    /// is expected to call this once per ordered pair of ranges.
    pub fn index_blocking_against(&mut self, other: &HandRange) {
        for (i, hand) in self.hands.iter().enumerate() {
            let hole_mask = u64::from(hand.hole.c1) | u64::from(hand.hole.c2);
            self.blocked[i] = other
                .hands
                .iter()
                .enumerate()
                .filter(|(_, villain)| {
                    let villain_mask = u64::from(villain.hole.c1) | u64::from(villain.hole.c2);
                    villain_mask & hole_mask != 0
                })
                .map(|(j, _)| j)
                .collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfr_cards::{Rank, Suit};

    fn card(r: Rank, s: Suit) -> Card {
        Card::new(r, s)
    }

    #[test]
    fn drops_combos_overlapping_the_board() {
        let board = Board::new(vec![
            card(Rank::King, Suit::Spade),
            card(Rank::Ten, Suit::Heart),
            card(Rank::Seven, Suit::Spade),
            card(Rank::Four, Suit::Diamond),
            card(Rank::Two, Suit::Spade),
        ]);
        let combos = vec![
            (
                Hole::new(card(Rank::King, Suit::Spade), card(Rank::Ace, Suit::Club)),
                1.0,
            ),
            (
                Hole::new(card(Rank::Ace, Suit::Heart), card(Rank::Ace, Suit::Diamond)),
                1.0,
            ),
        ];
        let range = HandRange::new(&board, combos);
        assert_eq!(range.len(), 1);
        assert!((range.weight_sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn blocking_is_indexed_against_villain_range() {
        let board = Board::new(vec![
            card(Rank::King, Suit::Spade),
            card(Rank::Ten, Suit::Heart),
            card(Rank::Seven, Suit::Spade),
            card(Rank::Four, Suit::Diamond),
            card(Rank::Two, Suit::Spade),
        ]);
        let mut hero = HandRange::new(
            &board,
            vec![(Hole::new(card(Rank::Ace, Suit::Club), card(Rank::Ace, Suit::Diamond)), 1.0)],
        );
        let villain = HandRange::new(
            &board,
            vec![
                (Hole::new(card(Rank::Ace, Suit::Club), card(Rank::King, Suit::Club)), 1.0),
                (Hole::new(card(Rank::Queen, Suit::Club), card(Rank::Jack, Suit::Club)), 1.0),
            ],
        );
        hero.index_blocking_against(&villain);
        assert_eq!(hero.blocked_by(0), &[0]);
    }
}
