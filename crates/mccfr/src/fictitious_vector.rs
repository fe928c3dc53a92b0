//! Vector-form fictitious play over an entire river betting tree and
//! both players' hand ranges, mirroring [`crate::fictitious`] the way
//! [`crate::vector`] mirrors [`crate::scalar`].

use crate::best_response::best_response_value_vector;
use crate::infoset::uniform;
use crate::vector::VectorProfile;
use cfr_core::{Epoch, Probability};
use cfr_river::{RiverAction, RiverTree};
use std::collections::HashMap;
use std::rc::Rc;

pub use crate::fictitious::FictitiousPlayConfig as VectorFictitiousPlayConfig;

#[derive(Debug, Clone)]
struct VectorFpInfoSet {
    actions: Vec<RiverAction>,
    strategy_sum: Vec<Vec<Probability>>,
    last_strategy: Vec<Vec<Probability>>,
}

impl VectorFpInfoSet {
    fn new(actions: Vec<RiverAction>, num_hands: usize) -> Self {
        let row = uniform(actions.len());
        Self {
            strategy_sum: vec![vec![0.0; actions.len()]; num_hands],
            last_strategy: vec![row; num_hands],
            actions,
        }
    }

    fn add(&mut self, rows: &[Vec<Probability>], weight: Probability) {
        for (sum_row, new_row) in self.strategy_sum.iter_mut().zip(rows) {
            for (s, p) in sum_row.iter_mut().zip(new_row) {
                *s += weight * p;
            }
        }
        self.last_strategy = rows.to_vec();
    }
}

/// Fictitious play over the vector representation: at each iteration
/// both players' pure per-hand best responses (against the opponent's
/// current average range-strategy) are computed in one [`RiverTree`]
/// pass each, then folded into that player's strategy-sum matrix.
pub struct VectorFictitiousPlayTrainer {
    tree: Rc<RiverTree>,
    config: VectorFictitiousPlayConfig,
    stores: [HashMap<String, VectorFpInfoSet>; 2],
    total_weight: [Probability; 2],
    last_weight: [Probability; 2],
    iteration: Epoch,
}

impl VectorFictitiousPlayTrainer {
    pub fn new(tree: Rc<RiverTree>, config: VectorFictitiousPlayConfig) -> Self {
        Self {
            tree,
            config,
            stores: [HashMap::new(), HashMap::new()],
            total_weight: [0.0, 0.0],
            last_weight: [0.0, 0.0],
            iteration: 0,
        }
    }

    pub fn tree(&self) -> &RiverTree {
        &self.tree
    }

    fn profile_for(&self, player: usize, optimistic: bool) -> VectorProfile {
        let total = self.total_weight[player];
        let last = if optimistic { self.last_weight[player] } else { 0.0 };
        let denom = total + last;
        self.stores[player]
            .iter()
            .map(|(key, info)| {
                let rows: Vec<Vec<Probability>> = info
                    .strategy_sum
                    .iter()
                    .enumerate()
                    .map(|(h, sum_row)| {
                        if denom > 0.0 {
                            let mut base = sum_row.clone();
                            if optimistic && last > 0.0 {
                                for (b, p) in base.iter_mut().zip(&info.last_strategy[h]) {
                                    *b += last * p;
                                }
                            }
                            base.into_iter().map(|v| v / denom).collect()
                        } else {
                            uniform(info.actions.len())
                        }
                    })
                    .collect();
                (key.clone(), rows)
            })
            .collect()
    }

    fn update_player(&mut self, player: usize, br_profile: &VectorProfile, actions_by_key: &HashMap<String, Vec<RiverAction>>) {
        let weight = if self.config.linear_weighting {
            self.iteration as Probability
        } else {
            1.0
        };
        self.last_weight[player] = weight;
        self.total_weight[player] += weight;

        let keys: std::collections::HashSet<String> = self.stores[player]
            .keys()
            .cloned()
            .chain(br_profile.keys().cloned())
            .collect();

        for key in keys {
            let rows = match br_profile.get(&key) {
                Some(rows) => rows.clone(),
                None => self.stores[player][&key].last_strategy.clone(),
            };
            let actions = actions_by_key
                .get(&key)
                .cloned()
                .unwrap_or_else(|| self.stores[player][&key].actions.clone());
            let entry = self.stores[player]
                .entry(key)
                .or_insert_with(|| VectorFpInfoSet::new(actions, rows.len()));
            entry.add(&rows, weight);
        }
    }

    /// Runs `iterations` rounds of per-player best response.
    pub fn run(&mut self, iterations: usize) {
        for _ in 0..iterations {
            self.iteration += 1;
            if self.config.alternating {
                let (br0, acts0) = self.best_response_with_actions(0);
                self.update_player(0, &br0, &acts0);
                let (br1, acts1) = self.best_response_with_actions(1);
                self.update_player(1, &br1, &acts1);
            } else {
                let (br0, acts0) = self.best_response_with_actions(0);
                let (br1, acts1) = self.best_response_with_actions(1);
                self.update_player(0, &br0, &acts0);
                self.update_player(1, &br1, &acts1);
            }
        }
    }

    fn best_response_with_actions(&self, player: usize) -> (VectorProfile, HashMap<String, Vec<RiverAction>>) {
        let opponent_profile = self.profile_for(1 - player, self.config.optimistic);
        let (_, policy) = best_response_value_vector(&self.tree, &opponent_profile, player);
        let mut profile = VectorProfile::new();
        let mut actions_by_key = HashMap::new();
        for (key, (actions, best_per_hand)) in policy {
            let n = actions.len();
            let rows = best_per_hand
                .into_iter()
                .map(|best| {
                    let mut row = vec![0.0; n];
                    row[best] = 1.0;
                    row
                })
                .collect();
            actions_by_key.insert(key.clone(), actions);
            profile.insert(key, rows);
        }
        (profile, actions_by_key)
    }

    /// Snapshots the average strategy matrix at every infoset either
    /// player has reached.
    pub fn average_strategy_profile(&self) -> VectorProfile {
        let mut profile = VectorProfile::new();
        for player in 0..cfr_core::N {
            let denom = self.total_weight[player];
            for (key, info) in &self.stores[player] {
                let rows: Vec<Vec<Probability>> = info
                    .strategy_sum
                    .iter()
                    .map(|row| {
                        if denom > 0.0 {
                            row.iter().map(|s| s / denom).collect()
                        } else {
                            uniform(info.actions.len())
                        }
                    })
                    .collect();
                profile.insert(key.clone(), rows);
            }
        }
        profile
    }
}
