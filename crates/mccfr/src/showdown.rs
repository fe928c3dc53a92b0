use cfr_cards::Strength;
use cfr_core::{Chips, Probability, Utility};
use cfr_river::HandRange;

/// The payoff to a single hero hand against a single opponent hand:
/// win the pot minus hero's own contribution, lose hero's contribution,
/// or chop.
pub fn payoff_single(hero: Strength, villain: Strength, pot: Chips, hero_contrib: Chips) -> Utility {
    use std::cmp::Ordering::*;
    match hero.cmp(&villain) {
        Greater => (pot - hero_contrib) as Utility,
        Less => -(hero_contrib as Utility),
        Equal => pot as Utility / 2.0 - hero_contrib as Utility,
    }
}

/// Per-hero-hand showdown result: the raw (unnormalized) expected
/// payoff, summed over every unblocked opponent combo weighted by
/// `villain_reach`, and the valid opponent mass used to normalize it
/// into a conditional expected value.
pub struct ShowdownResult {
    pub raw: Vec<Utility>,
    pub valid_mass: Vec<Probability>,
}

impl ShowdownResult {
    /// Per-hand expected value, normalized by valid opponent mass.
    /// Unreached hero hands (zero valid mass) report zero.
    pub fn normalized(&self) -> Vec<Utility> {
        self.raw
            .iter()
            .zip(self.valid_mass.iter())
            .map(|(v, m)| if *m > 0.0 { v / m } else { 0.0 })
            .collect()
    }
}

/// Computes every hero hand's showdown value against `villain`, weighted
/// by `villain_reach` (one entry per villain combo, already folded with
/// range weight and path probability), in
/// `O(|villain| log |villain| + |hero| · (log |villain| + block work))`.
///
/// Sorts `villain` by strength once (precomputed in [`HandRange`] at
/// construction), builds cumulative reach sums over that order, then
/// for each hero hand binary-searches its strength to split the sorted
/// villain combos into weaker/tied/stronger and reads the three
/// aggregate sums in O(1), finally subtracting the individually-weighted
/// payoffs of combos blocked by the hero's own cards.
pub fn showdown_values(
    hero: &HandRange,
    villain: &HandRange,
    villain_reach: &[Probability],
    pot: Chips,
    hero_contrib: Chips,
) -> ShowdownResult {
    let order = &villain.sorted_by_strength;
    let n = order.len();

    let mut prefix = vec![0.0f32; n + 1];
    for (k, &idx) in order.iter().enumerate() {
        prefix[k + 1] = prefix[k] + villain_reach[idx];
    }
    let total = prefix[n];

    let strengths: Vec<Strength> = order.iter().map(|&idx| villain.hands[idx].strength).collect();

    let mut raw = Vec::with_capacity(hero.hands.len());
    let mut valid_mass = Vec::with_capacity(hero.hands.len());

    for (h_idx, h) in hero.hands.iter().enumerate() {
        let lo = strengths.partition_point(|s| *s < h.strength);
        let hi = strengths.partition_point(|s| *s <= h.strength);

        let weaker_mass = prefix[lo];
        let tied_mass = prefix[hi] - prefix[lo];
        let stronger_mass = total - prefix[hi];

        let mut value = weaker_mass * (pot - hero_contrib) as Utility
            + stronger_mass * -(hero_contrib as Utility)
            + tied_mass * (pot as Utility / 2.0 - hero_contrib as Utility);

        let mut blocked_mass = 0.0f32;
        for &j in hero.blocked_by(h_idx) {
            let w = villain_reach[j];
            blocked_mass += w;
            value -= w * payoff_single(h.strength, villain.hands[j].strength, pot, hero_contrib);
        }

        raw.push(value);
        valid_mass.push((total - blocked_mass).max(0.0));
    }

    ShowdownResult { raw, valid_mass }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfr_cards::{Board, Card, Hole, Rank, Suit};

    fn card(r: Rank, s: Suit) -> Card {
        Card::new(r, s)
    }

    fn small_board() -> Board {
        Board::new(vec![
            card(Rank::King, Suit::Spade),
            card(Rank::Ten, Suit::Heart),
            card(Rank::Seven, Suit::Spade),
            card(Rank::Four, Suit::Diamond),
            card(Rank::Two, Suit::Spade),
        ])
    }

    fn naive(
        hero: &HandRange,
        villain: &HandRange,
        villain_reach: &[Probability],
        pot: Chips,
        hero_contrib: Chips,
    ) -> Vec<Utility> {
        hero.hands
            .iter()
            .map(|h| {
                villain
                    .hands
                    .iter()
                    .enumerate()
                    .filter(|(_, o)| {
                        let h_mask = u64::from(h.hole.c1) | u64::from(h.hole.c2);
                        let o_mask = u64::from(o.hole.c1) | u64::from(o.hole.c2);
                        h_mask & o_mask == 0
                    })
                    .map(|(j, o)| villain_reach[j] * payoff_single(h.strength, o.strength, pot, hero_contrib))
                    .sum()
            })
            .collect()
    }

    #[test]
    fn matches_naive_o_n_squared_computation() {
        let board = small_board();
        let blocked: std::collections::HashSet<Card> = board.cards.iter().copied().collect();
        let deck: Vec<Card> = (0..52u8)
            .map(Card::from)
            .filter(|c| !blocked.contains(c))
            .collect();
        let mut combos = Vec::new();
        for i in 0..deck.len() {
            for j in (i + 1)..deck.len() {
                combos.push((Hole::new(deck[i], deck[j]), 1.0));
            }
        }
        let mut hero = HandRange::new(&board, combos.clone());
        let mut villain = HandRange::new(&board, combos);
        hero.index_blocking_against(&villain);
        villain.index_blocking_against(&hero);

        let villain_reach: Vec<Probability> = villain.hands.iter().map(|h| h.weight).collect();
        let fast = showdown_values(&hero, &villain, &villain_reach, 1000, 200);
        let slow = naive(&hero, &villain, &villain_reach, 1000, 200);

        assert_eq!(fast.raw.len(), slow.len());
        for (a, b) in fast.raw.iter().zip(slow.iter()) {
            assert!((a - b).abs() < 1e-3, "{a} != {b}");
        }
    }
}
