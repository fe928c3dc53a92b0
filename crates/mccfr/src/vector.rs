use crate::infoset::{regret_match, uniform};
use crate::policy::{ConstantWeight, DiscountedWeight, LinearWeight, PolicyRule};
use crate::regret::{DiscountedRegret, FlooredRegret, RegretRule, VanillaRegret};
use crate::showdown::showdown_values;
use cfr_core::{Epoch, Probability, Utility, N};
use cfr_river::{RiverAction, RiverState, RiverTree};
use std::collections::HashMap;

/// One vector information set: a row per hand in the acting player's
/// range, each an |actions|-length regret/strategy-sum pair.
#[derive(Debug, Clone)]
pub struct VectorInfoSet {
    pub actions: Vec<RiverAction>,
    pub regret_sum: Vec<Vec<Utility>>,
    pub strategy_sum: Vec<Vec<Probability>>,
    pub last_dcfr_iter: Epoch,
}

impl VectorInfoSet {
    fn new(actions: Vec<RiverAction>, num_hands: usize) -> Self {
        let n = actions.len();
        Self {
            actions,
            regret_sum: vec![vec![0.0; n]; num_hands],
            strategy_sum: vec![vec![0.0; n]; num_hands],
            last_dcfr_iter: 0,
        }
    }

    fn current_strategy(&self) -> Vec<Vec<Probability>> {
        self.regret_sum.iter().map(|row| regret_match(row)).collect()
    }

    /// Average strategy matrix; rows with no accumulated mass (an
    /// unreached hand) report uniform.
    pub fn average_strategy(&self) -> Vec<Vec<Probability>> {
        self.strategy_sum
            .iter()
            .map(|row| {
                let total: Probability = row.iter().sum();
                if total > 0.0 {
                    row.iter().map(|s| s / total).collect()
                } else {
                    uniform(self.actions.len())
                }
            })
            .collect()
    }
}

/// A snapshot of the average strategy at every visited history, keyed by
/// history token (the acting player is implied by the betting tree).
pub type VectorProfile = HashMap<String, Vec<Vec<Probability>>>;

#[derive(Debug, Clone, Copy)]
pub struct VectorCfrConfig {
    pub use_plus: bool,
    pub linear_weighting: bool,
    pub use_dcfr: bool,
    pub dcfr_alpha: f32,
    pub dcfr_beta: f32,
    pub dcfr_gamma: f32,
}

impl Default for VectorCfrConfig {
    fn default() -> Self {
        let (alpha, beta, gamma) = cfr_core::DCFR_DEFAULTS;
        Self {
            use_plus: false,
            linear_weighting: false,
            use_dcfr: false,
            dcfr_alpha: alpha,
            dcfr_beta: beta,
            dcfr_gamma: gamma,
        }
    }
}

/// Vector-form CFR over an entire [`RiverTree`] and both players' hand
/// ranges at once, using the showdown kernel at terminals instead of
/// resolving one sampled hand pair at a time.
pub struct VectorCfrTrainer {
    tree: std::rc::Rc<RiverTree>,
    store: HashMap<String, VectorInfoSet>,
    config: VectorCfrConfig,
    epoch: Epoch,
}

impl VectorCfrTrainer {
    pub fn new(tree: std::rc::Rc<RiverTree>, config: VectorCfrConfig) -> Self {
        Self {
            tree,
            store: HashMap::new(),
            config,
            epoch: 0,
        }
    }

    pub fn tree(&self) -> &RiverTree {
        &self.tree
    }

    fn apply_dcfr_decay(&mut self, key: &str) {
        if !self.config.use_dcfr {
            return;
        }
        let epoch = self.epoch;
        let (alpha, beta, gamma) = (self.config.dcfr_alpha, self.config.dcfr_beta, self.config.dcfr_gamma);
        if let Some(entry) = self.store.get_mut(key) {
            let skipped = epoch.saturating_sub(entry.last_dcfr_iter);
            if skipped == 0 {
                return;
            }
            let regret_rule = DiscountedRegret { alpha, beta };
            let pos_decay = regret_rule.decay(true, skipped);
            let neg_decay = regret_rule.decay(false, skipped);
            for row in entry.regret_sum.iter_mut() {
                for r in row.iter_mut() {
                    *r *= if *r >= 0.0 { pos_decay } else { neg_decay };
                }
            }
            let policy_decay = DiscountedWeight { gamma }.decayed(skipped);
            for row in entry.strategy_sum.iter_mut() {
                for s in row.iter_mut() {
                    *s *= policy_decay;
                }
            }
            entry.last_dcfr_iter = epoch;
        }
    }

    pub fn run(&mut self, iterations: usize) {
        log::debug!("vector cfr: running {iterations} iterations from epoch {}", self.epoch);
        for _ in 0..iterations {
            self.epoch += 1;
            for hero in 0..N {
                let root = self.tree.initial_state();
                let reach = [
                    self.tree.config().ranges[0].hands.iter().map(|h| h.weight).collect(),
                    self.tree.config().ranges[1].hands.iter().map(|h| h.weight).collect(),
                ];
                self.traverse(hero, &root, reach);
            }
        }
    }

    fn terminal_values(&self, hero: usize, state: &RiverState, villain_reach: &[Probability]) -> Vec<Utility> {
        let hero_range = &self.tree.config().ranges[hero];
        let villain_range = &self.tree.config().ranges[1 - hero];
        let pot = self.tree.config().pot + state.contrib[0] + state.contrib[1];
        let hero_contrib = state.contrib[hero];

        if let Some(folder) = state.folded {
            let payoff = if folder == hero {
                -(hero_contrib as Utility)
            } else {
                (pot - hero_contrib) as Utility
            };
            let total: Probability = villain_reach.iter().sum();
            hero_range
                .hands
                .iter()
                .enumerate()
                .map(|(h_idx, _)| {
                    let blocked: Probability =
                        hero_range.blocked_by(h_idx).iter().map(|&j| villain_reach[j]).sum();
                    (total - blocked).max(0.0) * payoff
                })
                .collect()
        } else {
            showdown_values(hero_range, villain_range, villain_reach, pot, hero_contrib).raw
        }
    }

    /// Returns the `hero`-indexed value vector at `state`, updating
    /// `hero`'s own infosets along the way; opponent infosets are read
    /// (via regret matching) but not updated in this pass.
    fn traverse(&mut self, hero: usize, state: &RiverState, reach: [Vec<Probability>; 2]) -> Vec<Utility> {
        if self.tree.is_terminal(state) {
            return self.terminal_values(hero, state, &reach[1 - hero]);
        }

        let acting = state.acting;
        let actions = self.tree.legal_actions(state);
        let key = self.tree.history_key(state);
        let range_len = self.tree.config().ranges[acting].len();

        self.store
            .entry(key.clone())
            .or_insert_with(|| VectorInfoSet::new(actions.clone(), range_len));
        self.apply_dcfr_decay(&key);
        let strategy = self.store.get(&key).unwrap().current_strategy();

        if acting == hero {
            let mut children = Vec::with_capacity(actions.len());
            for action in &actions {
                let next = self.tree.next_state(state, *action);
                children.push(self.traverse(hero, &next, reach.clone()));
            }

            let mut node_value = vec![0.0f32; range_len];
            for h in 0..range_len {
                for a in 0..actions.len() {
                    node_value[h] += strategy[h][a] * children[a][h];
                }
            }

            let epoch = self.epoch;
            let config = self.config;
            let own_reach = &reach[hero];
            let info = self.store.get_mut(&key).unwrap();
            for h in 0..range_len {
                for a in 0..actions.len() {
                    let delta = children[a][h] - node_value[h];
                    info.regret_sum[h][a] = if config.use_plus {
                        FlooredRegret::gain(info.regret_sum[h][a], delta, epoch)
                    } else {
                        VanillaRegret::gain(info.regret_sum[h][a], delta, epoch)
                            .max(VanillaRegret::floor())
                    };
                    let immediate = own_reach[h] * strategy[h][a];
                    info.strategy_sum[h][a] = if config.use_dcfr {
                        info.strategy_sum[h][a] + immediate
                    } else if config.linear_weighting {
                        LinearWeight::learn(info.strategy_sum[h][a], immediate, epoch)
                    } else {
                        ConstantWeight::learn(info.strategy_sum[h][a], immediate, epoch)
                    };
                }
            }
            node_value
        } else {
            let mut total = vec![0.0f32; self.tree.config().ranges[hero].len()];
            for (a, action) in actions.iter().enumerate() {
                let mut next_reach = reach.clone();
                for o in 0..range_len {
                    next_reach[acting][o] = reach[acting][o] * strategy[o][a];
                }
                let next = self.tree.next_state(state, *action);
                let child = self.traverse(hero, &next, next_reach);
                for h in 0..total.len() {
                    total[h] += child[h];
                }
            }
            total
        }
    }

    pub fn average_strategy_profile(&self) -> VectorProfile {
        self.store
            .iter()
            .map(|(key, info)| (key.clone(), info.average_strategy()))
            .collect()
    }

    pub fn store(&self) -> &HashMap<String, VectorInfoSet> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfr_cards::{Card, Hole, Rank, Suit};
    use cfr_core::Probability as P;
    use cfr_river::RiverConfigBuilder;
    use std::rc::Rc;

    fn card(r: Rank, s: Suit) -> Card {
        Card::new(r, s)
    }

    fn toy_tree() -> Rc<RiverTree> {
        let board = vec![
            card(Rank::King, Suit::Spade),
            card(Rank::Ten, Suit::Heart),
            card(Rank::Seven, Suit::Spade),
            card(Rank::Four, Suit::Diamond),
            card(Rank::Two, Suit::Spade),
        ];
        let blocked: std::collections::HashSet<Card> = board.iter().copied().collect();
        let deck: Vec<Card> = (0..52u8).map(Card::from).filter(|c| !blocked.contains(c)).collect();
        let mut combos: Vec<(Hole, P)> = Vec::new();
        for i in 0..deck.len().min(12) {
            for j in (i + 1)..deck.len().min(12) {
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
        Rc::new(RiverTree::new(config))
    }

    #[test]
    fn vector_cfr_reduces_regret_over_iterations() {
        let tree = toy_tree();
        let mut trainer = VectorCfrTrainer::new(tree, VectorCfrConfig::default());
        trainer.run(50);
        assert!(!trainer.store().is_empty());
        let profile = trainer.average_strategy_profile();
        for rows in profile.values() {
            for row in rows {
                let sum: Probability = row.iter().sum();
                assert!((sum - 1.0).abs() < 1e-4);
            }
        }
    }
}
