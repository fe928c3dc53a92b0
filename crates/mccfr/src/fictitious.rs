//! Scalar fictitious play: iterated best response in place of regret
//! matching.
//!
//! Supplements the distilled spec with a trainer present in the original
//! Python reference (`algorithms/fictitious_play.py`) and explicitly
//! named as an optional variant. Grounded in [`crate::scalar`]'s trainer
//! shape (a config struct, a `run`/`average_strategy_profile` public
//! contract) and [`crate::best_response`] for the best-response step
//! itself.

use crate::best_response::best_response_value;
use crate::infoset::uniform;
use crate::policy::{policy_of, Policy};
use crate::scalar::ScalarProfile;
use cfr_core::{Epoch, Probability};
use cfr_gameplay::Game;
use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::hash::Hash;

/// Update-rule options for fictitious play, mirroring the shape of
/// [`crate::scalar::ScalarCfrConfig`] for the subset of options that
/// apply here.
#[derive(Debug, Clone, Copy, Default)]
pub struct FictitiousPlayConfig {
    /// Fold the opponent's last iterate into its profile one extra time
    /// (weighted by that iterate's own assigned weight) before
    /// best-responding, per spec.md §4.5.
    pub optimistic: bool,
    /// Weight each iteration's best response by its iteration index
    /// rather than uniformly.
    pub linear_weighting: bool,
    /// Best-respond and update one player at a time instead of both
    /// simultaneously against the same snapshot.
    pub alternating: bool,
}

#[derive(Debug, Clone)]
struct FpInfoSet<A> {
    actions: Vec<A>,
    strategy_sum: Vec<Probability>,
    last_strategy: Vec<Probability>,
}

impl<A: Clone> FpInfoSet<A> {
    fn new(actions: Vec<A>) -> Self {
        let last_strategy = uniform(actions.len());
        Self {
            strategy_sum: vec![0.0; actions.len()],
            last_strategy,
            actions,
        }
    }

    fn add(&mut self, probs: &[Probability], weight: Probability) {
        for (sum, p) in self.strategy_sum.iter_mut().zip(probs) {
            *sum += weight * p;
        }
        self.last_strategy = probs.to_vec();
    }
}

/// Replaces regret matching with iterated best response: each iteration,
/// both players (or one, under `alternating`) best-respond to the
/// opponent's current average (optionally optimistic) profile, and that
/// response is folded into the player's own strategy sum.
pub struct FictitiousPlayTrainer<G: Game> {
    game: G,
    config: FictitiousPlayConfig,
    stores: [HashMap<String, FpInfoSet<G::Action>>; 2],
    total_weight: [Probability; 2],
    last_weight: [Probability; 2],
    iteration: Epoch,
}

impl<G: Game> FictitiousPlayTrainer<G>
where
    G::State: Hash + Eq + Clone,
    G::Action: Clone + Eq + Display,
{
    pub fn new(game: G, config: FictitiousPlayConfig) -> Self {
        Self {
            game,
            config,
            stores: [HashMap::new(), HashMap::new()],
            total_weight: [0.0, 0.0],
            last_weight: [0.0, 0.0],
            iteration: 0,
        }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn iteration(&self) -> Epoch {
        self.iteration
    }

    /// The accumulated average profile for one player, optionally folding
    /// in the last iterate (weighted by its own already-assigned weight,
    /// per spec.md's Open Question resolution) for use as the
    /// opponent-facing profile a best response is computed against.
    fn profile_for(&self, player: usize, optimistic: bool) -> ScalarProfile<G::Action> {
        let total = self.total_weight[player];
        let last = if optimistic { self.last_weight[player] } else { 0.0 };
        let denom = total + last;
        self.stores[player]
            .iter()
            .map(|(key, info)| {
                let probs: Vec<Probability> = if denom > 0.0 {
                    let mut base = info.strategy_sum.clone();
                    if optimistic && last > 0.0 {
                        for (b, p) in base.iter_mut().zip(&info.last_strategy) {
                            *b += last * p;
                        }
                    }
                    base.into_iter().map(|v| v / denom).collect()
                } else {
                    uniform(info.actions.len())
                };
                (key.clone(), policy_of(&info.actions, &probs))
            })
            .collect()
    }

    fn best_response_for(&self, player: usize) -> ScalarProfile<G::Action> {
        let opponent_profile = self.profile_for(1 - player, self.config.optimistic);
        best_response_value(&self.game, &opponent_profile, player).profile
    }

    /// Folds a player's best response into its strategy sum. Every key the
    /// player has ever reached is updated every iteration: keys the best
    /// response actually visited get its one-hot row, everything else
    /// carries its last strategy forward unchanged — matching the
    /// reference implementation, where an unreached infoset's weight in
    /// the average does not silently stall.
    fn update_player(&mut self, player: usize, br_profile: &ScalarProfile<G::Action>) {
        let weight = if self.config.linear_weighting {
            self.iteration as Probability
        } else {
            1.0
        };
        self.last_weight[player] = weight;
        self.total_weight[player] += weight;

        let keys: HashSet<String> = self.stores[player]
            .keys()
            .cloned()
            .chain(br_profile.keys().cloned())
            .collect();

        for key in keys {
            let row: Policy<G::Action> = match br_profile.get(&key) {
                Some(row) => row.clone(),
                None => {
                    let info = &self.stores[player][&key];
                    policy_of(&info.actions, &info.last_strategy)
                }
            };
            let actions: Vec<G::Action> = row.iter().map(|(a, _)| a.clone()).collect();
            let probs: Vec<Probability> = row.iter().map(|(_, p)| *p).collect();
            let entry = self.stores[player]
                .entry(key)
                .or_insert_with(|| FpInfoSet::new(actions));
            entry.add(&probs, weight);
        }
    }

    /// Runs `iterations` rounds of best-response / strategy-sum update.
    pub fn run(&mut self, iterations: usize) {
        for _ in 0..iterations {
            self.iteration += 1;
            if self.config.alternating {
                let br0 = self.best_response_for(0);
                self.update_player(0, &br0);
                let br1 = self.best_response_for(1);
                self.update_player(1, &br1);
            } else {
                let br0 = self.best_response_for(0);
                let br1 = self.best_response_for(1);
                self.update_player(0, &br0);
                self.update_player(1, &br1);
            }
        }
    }

    /// Snapshots the average strategy at every infoset either player has
    /// reached.
    pub fn average_strategy_profile(&self) -> ScalarProfile<G::Action> {
        let mut profile = ScalarProfile::new();
        for player in 0..cfr_core::N {
            let denom = self.total_weight[player];
            for (key, info) in &self.stores[player] {
                let probs: Vec<Probability> = if denom > 0.0 {
                    info.strategy_sum.iter().map(|s| s / denom).collect()
                } else {
                    uniform(info.actions.len())
                };
                profile.insert(key.clone(), policy_of(&info.actions, &probs));
            }
        }
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::best_response::exploitability_scalar;
    use cfr_gameplay::kuhn::KuhnGame;

    #[test]
    fn simultaneous_fp_reduces_kuhn_exploitability() {
        let game = KuhnGame;
        let mut trainer = FictitiousPlayTrainer::new(game, FictitiousPlayConfig::default());
        trainer.run(200);
        let profile = trainer.average_strategy_profile();
        let exp = exploitability_scalar(&game, &profile, 0.0);
        assert!(exp >= 0.0);
        assert!(exp < 0.5, "expected meaningful convergence, got {exp}");
    }

    #[test]
    fn alternating_and_optimistic_variants_also_converge() {
        let game = KuhnGame;
        let mut trainer = FictitiousPlayTrainer::new(
            game,
            FictitiousPlayConfig {
                optimistic: true,
                linear_weighting: true,
                alternating: true,
            },
        );
        trainer.run(200);
        let profile = trainer.average_strategy_profile();
        let exp = exploitability_scalar(&game, &profile, 0.0);
        assert!(exp >= 0.0 && exp < 0.5);
    }
}
