//! Integration test for spec scenario 5: the showdown kernel agrees with
//! a naive O(|hero|*|villain|) evaluator across many random river
//! subgames, not just one fixed board.

use cfr_cards::{Board, Card, Hole};
use cfr_core::{Chips, Probability, Utility};
use cfr_mccfr::{payoff_single, showdown_values};
use cfr_river::HandRange;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn naive_values(hero: &HandRange, villain: &HandRange, villain_reach: &[Probability], pot: Chips, hero_contrib: Chips) -> Vec<Utility> {
    hero.hands
        .iter()
        .enumerate()
        .map(|(h_idx, h)| {
            let blocked: std::collections::HashSet<usize> = hero.blocked_by(h_idx).iter().copied().collect();
            villain
                .hands
                .iter()
                .enumerate()
                .filter(|(j, _)| !blocked.contains(j))
                .map(|(j, o)| villain_reach[j] * payoff_single(h.strength, o.strength, pot, hero_contrib))
                .sum()
        })
        .collect()
}

#[test]
fn fast_kernel_matches_naive_across_fifty_random_subgames() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(11);

    for trial in 0..50u64 {
        let mut deck: Vec<Card> = (0..52u8).map(Card::from).collect();
        deck.shuffle(&mut rng);

        let board = Board::new(deck[0..5].to_vec());
        let mut remaining: Vec<Card> = deck[5..].to_vec();
        remaining.shuffle(&mut rng);

        let mut combos: Vec<(Hole, Probability)> = Vec::new();
        for i in 0..remaining.len() {
            for j in (i + 1)..remaining.len() {
                combos.push((Hole::new(remaining[i], remaining[j]), 1.0));
            }
        }
        combos.shuffle(&mut rng);
        assert!(combos.len() >= 600, "47-card deck yields {} combos", combos.len());

        let hero_combos = combos[0..300].to_vec();
        let villain_combos = combos[300..600].to_vec();

        let mut hero = HandRange::new(&board, hero_combos);
        let mut villain = HandRange::new(&board, villain_combos);
        hero.index_blocking_against(&villain);
        villain.index_blocking_against(&hero);
        assert_eq!(hero.len(), 300);
        assert_eq!(villain.len(), 300);

        let pot: Chips = 800 + (trial as Chips) * 37;
        let hero_contrib: Chips = 100 + (trial as Chips) * 5;
        let villain_reach: Vec<Probability> = villain.hands.iter().map(|h| h.weight).collect();

        let fast = showdown_values(&hero, &villain, &villain_reach, pot, hero_contrib);
        let slow = naive_values(&hero, &villain, &villain_reach, pot, hero_contrib);

        assert_eq!(fast.raw.len(), slow.len());
        for (i, (a, b)) in fast.raw.iter().zip(slow.iter()).enumerate() {
            assert!((a - b).abs() < 1e-3, "trial {trial} hand {i}: {a} != {b}");
        }
    }
}
