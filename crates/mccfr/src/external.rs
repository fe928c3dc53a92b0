//! External-sampling MCCFR for the river: one fresh hand pair sampled per
//! iteration instead of a full range sweep, reusing [`cfr_river::RiverGame`]'s
//! infoset keying and the same per-node regret math as [`crate::scalar`].

use crate::infoset::InfoSetStore;
use crate::policy::{policy_of, ConstantWeight, LinearWeight, Policy, PolicyRule};
use crate::regret::{FlooredRegret, RegretRule, VanillaRegret};
use crate::vector::VectorProfile;
use cfr_core::{Epoch, Probability, Utility};
use cfr_gameplay::{Game, Turn};
use cfr_river::{RiverAction, RiverGame, RiverState, RiverTree};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use std::collections::HashMap;
use std::rc::Rc;

/// Regret-based action pruning, skipped for the first `warmup` epochs and
/// then applied probabilistically so pruned branches still get revisited
/// with probability `explore`.
#[derive(Debug, Clone, Copy)]
pub struct PruningConfig {
    pub threshold: Utility,
    pub explore: Probability,
    pub warmup: Epoch,
}

#[derive(Debug, Clone, Copy)]
pub struct MccfrConfig {
    pub use_plus: bool,
    pub linear_weighting: bool,
    pub pruning: Option<PruningConfig>,
}

impl Default for MccfrConfig {
    fn default() -> Self {
        Self {
            use_plus: false,
            linear_weighting: false,
            pruning: None,
        }
    }
}

pub type MccfrProfile = HashMap<String, Policy<RiverAction>>;

/// External-sampling MCCFR trainer for a fixed river betting tree: each
/// iteration samples one hole-card pair per player from their ranges,
/// builds a transient [`RiverGame`] around it, and runs one traversal per
/// target player that enumerates the target's own actions exactly but
/// samples a single action at the opponent's nodes.
pub struct MccfrTrainer {
    tree: Rc<RiverTree>,
    store: InfoSetStore<RiverAction>,
    config: MccfrConfig,
    epoch: Epoch,
}

impl MccfrTrainer {
    pub fn new(tree: Rc<RiverTree>, config: MccfrConfig) -> Self {
        Self {
            tree,
            store: InfoSetStore::new(),
            config,
            epoch: 0,
        }
    }

    pub fn store(&self) -> &InfoSetStore<RiverAction> {
        &self.store
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Samples player 0's hand proportional to `p0_weight · Σ(unblocked
    /// p1 mass)` rather than plain `p0_weight` — a hand that blocks away
    /// more of the opponent's range is sampled less often, since it would
    /// otherwise be paired with fewer valid opponent combos on average.
    /// Player 1's hand is then drawn from its own weights restricted to
    /// (and renormalized over) the combos left unblocked by the sampled
    /// player-0 hand.
    fn sample_hands<R: Rng>(&self, rng: &mut R) -> [cfr_cards::Hole; 2] {
        let ranges = &self.tree.config().ranges;
        let p1_total = ranges[1].weight_sum();
        let weights: Vec<Probability> = ranges[0]
            .hands
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let blocked: Probability = ranges[0].blocked_by(i).iter().map(|&j| ranges[1].hands[j].weight).sum();
                h.weight * (p1_total - blocked).max(0.0)
            })
            .collect();
        let dist0 = WeightedIndex::new(&weights).expect("range must have an unblockable combo");
        let h0_idx = dist0.sample(rng);
        let hole0 = ranges[0].hands[h0_idx].hole;

        let blocked_by_h0: std::collections::HashSet<usize> = ranges[0].blocked_by(h0_idx).iter().copied().collect();
        let candidates: Vec<usize> = (0..ranges[1].hands.len()).filter(|i| !blocked_by_h0.contains(i)).collect();
        let candidate_weights: Vec<Probability> = candidates.iter().map(|&i| ranges[1].hands[i].weight).collect();
        let dist1 = WeightedIndex::new(&candidate_weights).expect("villain range has an unblocked combo");
        let hole1 = ranges[1].hands[candidates[dist1.sample(rng)]].hole;

        [hole0, hole1]
    }

    /// Runs `iterations` sampled traversals, two per iteration (one
    /// external-sampled pass per target player).
    pub fn run<R: Rng>(&mut self, iterations: usize, rng: &mut R) {
        log::debug!("mccfr: sampling {iterations} iterations from epoch {}", self.epoch);
        for _ in 0..iterations {
            self.epoch += 1;
            let hands = self.sample_hands(rng);
            let game = RiverGame::new(self.tree.clone(), hands);
            for target in 0..cfr_core::N {
                self.traverse(&game, &game.initial_state(), target, rng);
            }
        }
    }

    fn traverse<R: Rng>(&mut self, game: &RiverGame, state: &cfr_river::RiverState, target: usize, rng: &mut R) -> Utility {
        if game.is_terminal(state) {
            return game.terminal_utility(state, target);
        }
        match game.current_player(state) {
            Turn::Chance | Turn::Terminal => game.terminal_utility(state, target),
            Turn::Player(p) => {
                let key = game.infoset_key(state, p);
                let actions = game.legal_actions(state);
                self.store.get_or_insert(&key, &actions);
                let strategy = self.store.get(&key).unwrap().current_strategy();

                if p == target {
                    let pruned = self.pruned_mask(&key, rng);
                    let mut values = vec![0.0; actions.len()];
                    for (i, action) in actions.iter().enumerate() {
                        if pruned[i] {
                            values[i] = Utility::MIN / 2.0;
                            continue;
                        }
                        let next = game.next_state(state, action);
                        values[i] = self.traverse(game, &next, target, rng);
                    }
                    let node_value: Utility = strategy
                        .iter()
                        .zip(values.iter())
                        .filter(|(_, v)| **v > Utility::MIN / 4.0)
                        .map(|(s, v)| s * v)
                        .sum();

                    let epoch = self.epoch;
                    let entry = self.store.get_or_insert(&key, &actions);
                    for (i, v) in values.iter().enumerate() {
                        if *v <= Utility::MIN / 4.0 {
                            continue;
                        }
                        let delta = v - node_value;
                        entry.regret_sum[i] = if self.config.use_plus {
                            FlooredRegret::gain(entry.regret_sum[i], delta, epoch)
                        } else {
                            VanillaRegret::gain(entry.regret_sum[i], delta, epoch).max(VanillaRegret::floor())
                        };
                    }
                    for (i, s) in strategy.iter().enumerate() {
                        entry.strategy_sum[i] = if self.config.linear_weighting {
                            LinearWeight::learn(entry.strategy_sum[i], *s, epoch)
                        } else {
                            ConstantWeight::learn(entry.strategy_sum[i], *s, epoch)
                        };
                    }
                    node_value
                } else {
                    let dist = WeightedIndex::new(&strategy).expect("strategy sums to a positive total");
                    let chosen = dist.sample(rng);
                    let next = game.next_state(state, &actions[chosen]);
                    self.traverse(game, &next, target, rng)
                }
            }
        }
    }

    fn pruned_mask<R: Rng>(&self, key: &str, rng: &mut R) -> Vec<bool> {
        let entry = self.store.get(key).unwrap();
        let pruning = match self.config.pruning {
            Some(p) if self.epoch > p.warmup => p,
            _ => return vec![false; entry.regret_sum.len()],
        };
        entry
            .regret_sum
            .iter()
            .map(|&r| r < pruning.threshold && rng.random::<Probability>() > pruning.explore)
            .collect()
    }

    pub fn average_strategy_profile(&self) -> MccfrProfile {
        self.store
            .iter()
            .map(|(key, info)| (key.clone(), policy_of(&info.actions, &info.average_strategy())))
            .collect()
    }
}

/// Reshapes a per-hand-keyed [`MccfrProfile`] into the row-per-hand form
/// [`crate::best_response::exploitability_vector`] expects, by walking
/// the tree once and looking up each hero hand's policy at every visited
/// history. Hands the sampler never reached default to uniform, matching
/// the average-strategy fallback every other trainer here uses.
pub fn expand_mccfr_profile(tree: &RiverTree, profile: &MccfrProfile) -> VectorProfile {
    let mut out = VectorProfile::new();
    collect_mccfr_rows(tree, &tree.initial_state(), profile, &mut out);
    out
}

fn collect_mccfr_rows(tree: &RiverTree, state: &RiverState, profile: &MccfrProfile, out: &mut VectorProfile) {
    if tree.is_terminal(state) {
        return;
    }
    let acting = state.acting;
    let actions = tree.legal_actions(state);
    let key = tree.history_key(state);

    if !out.contains_key(&key) {
        let rows: Vec<Vec<Probability>> = tree.config().ranges[acting]
            .hands
            .iter()
            .map(|hand| {
                let infoset_key = format!("p{acting}:{}|{key}", hand.hole);
                match profile.get(&infoset_key) {
                    Some(row) => row.iter().map(|(_, p)| *p).collect(),
                    None => crate::infoset::uniform(actions.len()),
                }
            })
            .collect();
        out.insert(key, rows);
    }

    for action in &actions {
        let next = tree.next_state(state, *action);
        collect_mccfr_rows(tree, &next, profile, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfr_cards::{Card, Hole, Rank, Suit};
    use cfr_river::RiverConfigBuilder;
    use rand::SeedableRng;

    fn card(r: Rank, s: Suit) -> Card {
        Card::new(r, s)
    }

    #[test]
    fn mccfr_visits_infosets_for_both_players() {
        let board = vec![
            card(Rank::King, Suit::Spade),
            card(Rank::Ten, Suit::Heart),
            card(Rank::Seven, Suit::Spade),
            card(Rank::Four, Suit::Diamond),
            card(Rank::Two, Suit::Spade),
        ];
        let blocked: std::collections::HashSet<Card> = board.iter().copied().collect();
        let deck: Vec<Card> = (0..52u8).map(Card::from).filter(|c| !blocked.contains(c)).collect();
        let mut combos: Vec<(Hole, Probability)> = Vec::new();
        for i in 0..deck.len().min(10) {
            for j in (i + 1)..deck.len().min(10) {
                combos.push((Hole::new(deck[i], deck[j]), 1.0));
            }
        }
        let config = RiverConfigBuilder::new()
            .board(board)
            .pot(100)
            .stack(500)
            .bet_sizes(vec![1.0])
            .range(0, combos.clone())
            .range(1, combos)
            .build()
            .unwrap();
        let tree = Rc::new(RiverTree::new(config));
        let mut trainer = MccfrTrainer::new(tree, MccfrConfig::default());
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        trainer.run(200, &mut rng);
        assert!(!trainer.store().is_empty());
    }
}
