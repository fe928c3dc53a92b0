use crate::infoset::InfoSetStore;
use crate::policy::{policy_of, Policy};
use crate::regret::{DiscountedRegret, FlooredRegret, RegretRule, VanillaRegret};
use crate::policy::{ConstantWeight, DiscountedWeight, LinearWeight, PolicyRule};
use cfr_core::{Epoch, Probability, Utility};
use cfr_gameplay::{Game, Turn};
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

/// Update-rule options for the scalar CFR trainer, selecting among
/// vanilla CFR, CFR⁺, linear weighting, alternating updates, and DCFR.
#[derive(Debug, Clone, Copy)]
pub struct ScalarCfrConfig {
    pub use_plus: bool,
    pub linear_weighting: bool,
    pub alternating: bool,
    pub use_dcfr: bool,
    pub dcfr_alpha: f32,
    pub dcfr_beta: f32,
    pub dcfr_gamma: f32,
}

impl Default for ScalarCfrConfig {
    fn default() -> Self {
        let (alpha, beta, gamma) = cfr_core::DCFR_DEFAULTS;
        Self {
            use_plus: false,
            linear_weighting: false,
            alternating: false,
            use_dcfr: false,
            dcfr_alpha: alpha,
            dcfr_beta: beta,
            dcfr_gamma: gamma,
        }
    }
}

/// A snapshot of the average strategy at every visited infoset.
pub type ScalarProfile<A> = HashMap<String, Policy<A>>;

/// Vanilla/CFR⁺/linear/DCFR scalar CFR over a [`Game`]'s full state tree.
pub struct ScalarCfrTrainer<G: Game> {
    game: G,
    store: InfoSetStore<G::Action>,
    config: ScalarCfrConfig,
    epoch: Epoch,
    pending: HashMap<String, Vec<Utility>>,
}

impl<G: Game> ScalarCfrTrainer<G>
where
    G::State: Hash + Eq + Clone,
    G::Action: Clone + Eq + Display,
{
    pub fn new(game: G, config: ScalarCfrConfig) -> Self {
        Self {
            game,
            store: InfoSetStore::new(),
            config,
            epoch: 0,
            pending: HashMap::new(),
        }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn store(&self) -> &InfoSetStore<G::Action> {
        &self.store
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Runs `iterations` full training iterations. Each iteration is
    /// either one simultaneous traversal updating both players, or (when
    /// `alternating` is set) two traversals each updating one player. The
    /// pending CFR⁺ regret map — the only mode where updates are
    /// order-sensitive within an iteration (spec.md §5) — is flushed
    /// between traversals; every other mode applies its regret delta
    /// immediately as each infoset is visited.
    pub fn run(&mut self, iterations: usize) {
        log::debug!("scalar cfr: running {iterations} iterations from epoch {}", self.epoch);
        for _ in 0..iterations {
            self.epoch += 1;
            let root = self.game.initial_state();
            if self.config.alternating {
                for p in 0..cfr_core::N {
                    self.traverse(&root, Some(p), [1.0, 1.0]);
                    self.flush_pending();
                }
            } else {
                self.traverse(&root, None, [1.0, 1.0]);
                self.flush_pending();
            }
        }
    }

    /// Flushes the CFR⁺ pending-delta map. A no-op under every other mode
    /// since those apply their regret delta immediately in
    /// `visit_player_node` and never stage anything here.
    fn flush_pending(&mut self) {
        if !self.config.use_plus {
            debug_assert!(self.pending.is_empty());
            return;
        }
        for (key, deltas) in self.pending.drain() {
            if let Some(entry) = self.store.get_mut(&key) {
                for (i, delta) in deltas.into_iter().enumerate() {
                    entry.regret_sum[i] = FlooredRegret::gain(entry.regret_sum[i], delta, self.epoch);
                }
            }
        }
    }

    fn apply_dcfr_decay(&mut self, key: &str) {
        if !self.config.use_dcfr {
            return;
        }
        let epoch = self.epoch;
        let (alpha, beta, gamma) = (
            self.config.dcfr_alpha,
            self.config.dcfr_beta,
            self.config.dcfr_gamma,
        );
        if let Some(entry) = self.store.get_mut(key) {
            let skipped = epoch.saturating_sub(entry.last_dcfr_iter);
            if skipped == 0 {
                return;
            }
            let regret_rule = DiscountedRegret { alpha, beta };
            let pos_decay = regret_rule.decay(true, skipped);
            let neg_decay = regret_rule.decay(false, skipped);
            for r in entry.regret_sum.iter_mut() {
                *r *= if *r >= 0.0 { pos_decay } else { neg_decay };
            }
            let policy_decay = DiscountedWeight { gamma }.decayed(skipped);
            for s in entry.strategy_sum.iter_mut() {
                *s *= policy_decay;
            }
            entry.last_dcfr_iter = epoch;
        }
    }

    /// Returns the utility of `state` from player 0's perspective,
    /// recording regret and strategy-sum contributions along the way.
    fn traverse(
        &mut self,
        state: &G::State,
        update_player: Option<usize>,
        reach: [Probability; 2],
    ) -> Utility {
        if self.game.is_terminal(state) {
            return self.game.terminal_utility(state, 0);
        }
        match self.game.current_player(state) {
            Turn::Chance => {
                let mut total = 0.0;
                for (action, prob) in self.game.chance_outcomes(state) {
                    let next = self.game.next_state(state, &action);
                    let next_reach = [reach[0] * prob, reach[1] * prob];
                    total += prob * self.traverse(&next, update_player, next_reach);
                }
                total
            }
            Turn::Terminal => self.game.terminal_utility(state, 0),
            Turn::Player(p) => self.visit_player_node(state, p, update_player, reach),
        }
    }

    fn visit_player_node(
        &mut self,
        state: &G::State,
        p: usize,
        update_player: Option<usize>,
        reach: [Probability; 2],
    ) -> Utility {
        let key = self.game.infoset_key(state, p);
        let actions = self.game.legal_actions(state);
        self.apply_dcfr_decay(&key);
        self.store.get_or_insert(&key, &actions);
        let strategy = self.store.get(&key).unwrap().current_strategy();

        let mut values = Vec::with_capacity(actions.len());
        for (i, action) in actions.iter().enumerate() {
            let next = self.game.next_state(state, action);
            let mut next_reach = reach;
            next_reach[p] *= strategy[i];
            values.push(self.traverse(&next, update_player, next_reach));
        }
        let node_value: Utility = strategy.iter().zip(values.iter()).map(|(s, v)| s * v).sum();

        if update_player.is_none() || update_player == Some(p) {
            let opp_reach = reach[1 - p];
            let deltas: Vec<Utility> = values
                .iter()
                .map(|v| {
                    let raw = opp_reach * (v - node_value);
                    if p == 1 {
                        -raw
                    } else {
                        raw
                    }
                })
                .collect();

            if self.config.use_plus {
                // Staged and applied post-traversal (`flush_pending`) so an
                // infoset visited twice in one iteration doesn't bias the
                // opponent-side update with a partially-updated regret.
                self.pending
                    .entry(key.clone())
                    .or_insert_with(|| vec![0.0; actions.len()])
                    .iter_mut()
                    .zip(deltas)
                    .for_each(|(slot, delta)| *slot += delta);
            } else {
                // Vanilla, linear-weighted, and DCFR all apply immediately.
                // DCFR's decay already ran in `apply_dcfr_decay` above, so
                // the new delta is simply summed onto the (already-decayed)
                // accumulator, same as `vector.rs`'s traversal.
                let epoch = self.epoch;
                let entry = self.store.get_or_insert(&key, &actions);
                for (i, delta) in deltas.into_iter().enumerate() {
                    entry.regret_sum[i] = VanillaRegret::gain(entry.regret_sum[i], delta, epoch).max(VanillaRegret::floor());
                }
            }

            let own_reach = reach[p];
            let epoch = self.epoch;
            let entry = self.store.get_or_insert(&key, &actions);
            for (i, s) in strategy.iter().enumerate() {
                let immediate = own_reach * s;
                entry.strategy_sum[i] = if self.config.use_dcfr {
                    entry.strategy_sum[i] + immediate
                } else if self.config.linear_weighting {
                    LinearWeight::learn(entry.strategy_sum[i], immediate, epoch)
                } else {
                    ConstantWeight::learn(entry.strategy_sum[i], immediate, epoch)
                };
            }
        }

        node_value
    }

    /// Snapshots the average strategy at every visited infoset.
    pub fn average_strategy_profile(&self) -> ScalarProfile<G::Action> {
        self.store
            .iter()
            .map(|(key, info)| (key.clone(), policy_of(&info.actions, &info.average_strategy())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::best_response::exploitability_scalar;
    use cfr_gameplay::kuhn::KuhnGame;

    fn bet_probability(profile: &ScalarProfile<cfr_gameplay::kuhn::KuhnMove>, key: &str) -> Probability {
        let row = profile.get(key).expect("infoset reached");
        row.iter()
            .find(|(a, _)| a.to_string() == "b")
            .map(|(_, p)| *p)
            .unwrap_or(0.0)
    }

    #[test]
    fn vanilla_cfr_converges_to_known_kuhn_equilibrium() {
        let game = KuhnGame;
        let mut trainer = ScalarCfrTrainer::new(game, ScalarCfrConfig::default());
        trainer.run(20_000);

        let profile = trainer.average_strategy_profile();
        let exp = exploitability_scalar(&game, &profile, 0.0);
        assert!(exp <= 1e-3, "exploitability {exp} too high");

        // Player 0, holding the jack, should bet (bluff) roughly 1/3 of the time.
        let jack_bet = bet_probability(&profile, "J|");
        assert!((jack_bet - 1.0 / 3.0).abs() < 0.05, "J| bet prob {jack_bet}");

        // Player 0, holding the king, should bet (value) almost always.
        let king_bet = bet_probability(&profile, "K|");
        assert!(king_bet > 0.95, "K| bet prob {king_bet}");
    }

    #[test]
    fn cfr_plus_converges_faster_to_known_game_value() {
        let game = KuhnGame;
        let config = ScalarCfrConfig {
            use_plus: true,
            ..ScalarCfrConfig::default()
        };
        let mut trainer = ScalarCfrTrainer::new(game, config);
        trainer.run(5_000);

        let profile = trainer.average_strategy_profile();
        let exp = exploitability_scalar(&game, &profile, 0.0);
        assert!(exp <= 1e-4, "exploitability {exp} too high");

        // Tiny exploitability sandwiches the true game value between the
        // two best-response values; their midpoint approximates it closely.
        let br0 = crate::best_response::best_response_value(&game, &profile, 0).value;
        let br1 = crate::best_response::best_response_value(&game, &profile, 1).value;
        let game_value = (br0 - br1) / 2.0;
        assert!(
            (game_value - (-1.0 / 18.0)).abs() < 1e-3,
            "game value {game_value}"
        );

        for entry in trainer.store().iter().map(|(_, v)| v) {
            for &r in &entry.regret_sum {
                assert!(r >= 0.0, "CFR+ regret went negative: {r}");
            }
        }
    }

    #[test]
    fn average_strategy_rows_sum_to_one() {
        let game = KuhnGame;
        let mut trainer = ScalarCfrTrainer::new(game, ScalarCfrConfig::default());
        trainer.run(200);
        for row in trainer.average_strategy_profile().values() {
            let sum: Probability = row.iter().map(|(_, p)| p).sum();
            assert!((sum - 1.0).abs() < 1e-6, "row sums to {sum}");
        }
    }

    #[test]
    fn alternating_updates_flush_pending_between_players() {
        let game = KuhnGame;
        let config = ScalarCfrConfig {
            alternating: true,
            use_plus: true,
            ..ScalarCfrConfig::default()
        };
        let mut trainer = ScalarCfrTrainer::new(game, config);
        trainer.run(500);
        assert!(trainer.pending.is_empty());
        for entry in trainer.store().iter().map(|(_, v)| v) {
            for &r in &entry.regret_sum {
                assert!(r >= 0.0);
            }
        }
    }
}
