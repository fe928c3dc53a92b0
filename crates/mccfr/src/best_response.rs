use crate::scalar::ScalarProfile;
use crate::showdown::showdown_values;
use crate::vector::VectorProfile;
use cfr_core::{Probability, Utility};
use cfr_gameplay::{Game, Turn};
use cfr_river::{RiverAction, RiverState, RiverTree};
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

/// The expected value of the best-responding player, plus the pure
/// (one deterministic action per infoset) strategy that achieves it.
pub struct BestResponse<A> {
    pub value: Utility,
    pub policy: HashMap<String, A>,
    /// The same best response, expressed as a one-hot row per infoset
    /// (in `game.legal_actions` order) so it can be fed back into
    /// [`crate::scalar::ScalarProfile`]-shaped consumers such as the
    /// fictitious-play trainer without re-walking the tree.
    pub profile: ScalarProfile<A>,
}

/// Scalar best response: a single bottom-up pass using memoized
/// `state_value`. At the best-response player's own nodes, sibling
/// states sharing an infoset are resolved together the first time that
/// infoset is visited, choosing the action maximizing the aggregate
/// opponent-reach-weighted value; ties break toward the lowest action
/// index.
pub fn best_response_value<G>(game: &G, profile: &ScalarProfile<G::Action>, br_player: usize) -> BestResponse<G::Action>
where
    G: Game,
    G::State: Hash + Eq + Clone,
    G::Action: Clone + Eq + Display,
{
    let mut groups: HashMap<String, Vec<(G::State, Probability)>> = HashMap::new();
    collect(game, &game.initial_state(), [1.0, 1.0], br_player, profile, &mut groups);

    let mut memo: HashMap<G::State, Utility> = HashMap::new();
    let mut decisions: HashMap<String, usize> = HashMap::new();
    let root = game.initial_state();
    let value = state_value(game, &root, br_player, profile, &groups, &mut decisions, &mut memo);

    let mut policy = HashMap::new();
    let mut profile = ScalarProfile::new();
    for (key, idx) in decisions {
        if let Some((state, _)) = groups.get(&key).and_then(|states| states.first()) {
            let actions = game.legal_actions(state);
            policy.insert(key.clone(), actions[idx].clone());
            let row = actions
                .iter()
                .enumerate()
                .map(|(i, a)| (a.clone(), if i == idx { 1.0 } else { 0.0 }))
                .collect();
            profile.insert(key, row);
        }
    }

    BestResponse { value, policy, profile }
}

fn collect<G>(
    game: &G,
    state: &G::State,
    reach: [Probability; 2],
    br_player: usize,
    profile: &ScalarProfile<G::Action>,
    groups: &mut HashMap<String, Vec<(G::State, Probability)>>,
) where
    G: Game,
    G::State: Hash + Eq + Clone,
    G::Action: Clone + Eq + Display,
{
    if game.is_terminal(state) {
        return;
    }
    match game.current_player(state) {
        Turn::Terminal => {}
        Turn::Chance => {
            for (action, prob) in game.chance_outcomes(state) {
                let next = game.next_state(state, &action);
                collect(game, &next, [reach[0] * prob, reach[1] * prob], br_player, profile, groups);
            }
        }
        Turn::Player(p) => {
            let actions = game.legal_actions(state);
            if p == br_player {
                let key = game.infoset_key(state, p);
                groups
                    .entry(key)
                    .or_default()
                    .push((state.clone(), reach[1 - p]));
                for action in &actions {
                    let next = game.next_state(state, action);
                    collect(game, &next, reach, br_player, profile, groups);
                }
            } else {
                let key = game.infoset_key(state, p);
                let row = profile.get(&key);
                for (i, action) in actions.iter().enumerate() {
                    let prob = row
                        .and_then(|r| r.get(i).map(|(_, p)| *p))
                        .unwrap_or(1.0 / actions.len() as Probability);
                    let next = game.next_state(state, action);
                    let mut next_reach = reach;
                    next_reach[p] *= prob;
                    collect(game, &next, next_reach, br_player, profile, groups);
                }
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn state_value<G>(
    game: &G,
    state: &G::State,
    br_player: usize,
    profile: &ScalarProfile<G::Action>,
    groups: &HashMap<String, Vec<(G::State, Probability)>>,
    decisions: &mut HashMap<String, usize>,
    memo: &mut HashMap<G::State, Utility>,
) -> Utility
where
    G: Game,
    G::State: Hash + Eq + Clone,
    G::Action: Clone + Eq + Display,
{
    if let Some(v) = memo.get(state) {
        return *v;
    }
    if game.is_terminal(state) {
        let v = game.terminal_utility(state, br_player);
        memo.insert(state.clone(), v);
        return v;
    }
    let v = match game.current_player(state) {
        Turn::Terminal => game.terminal_utility(state, br_player),
        Turn::Chance => game
            .chance_outcomes(state)
            .into_iter()
            .map(|(action, prob)| {
                let next = game.next_state(state, &action);
                prob * state_value(game, &next, br_player, profile, groups, decisions, memo)
            })
            .sum(),
        Turn::Player(p) if p == br_player => {
            let key = game.infoset_key(state, p);
            let actions = game.legal_actions(state);
            let chosen = *decisions.entry(key.clone()).or_insert_with(|| {
                let members = groups.get(&key).cloned().unwrap_or_default();
                let mut best = 0usize;
                let mut best_value = Utility::MIN;
                for i in 0..actions.len() {
                    let mut total = 0.0;
                    for (member_state, opp_reach) in &members {
                        let next = game.next_state(member_state, &actions[i]);
                        total += opp_reach
                            * state_value(game, &next, br_player, profile, groups, decisions, memo);
                    }
                    if total > best_value {
                        best_value = total;
                        best = i;
                    }
                }
                best
            });
            let next = game.next_state(state, &actions[chosen]);
            state_value(game, &next, br_player, profile, groups, decisions, memo)
        }
        Turn::Player(p) => {
            let key = game.infoset_key(state, p);
            let actions = game.legal_actions(state);
            let row = profile.get(&key);
            actions
                .iter()
                .enumerate()
                .map(|(i, action)| {
                    let prob = row
                        .and_then(|r| r.get(i).map(|(_, p)| *p))
                        .unwrap_or(1.0 / actions.len() as Probability);
                    let next = game.next_state(state, action);
                    prob * state_value(game, &next, br_player, profile, groups, decisions, memo)
                })
                .sum()
        }
    };
    memo.insert(state.clone(), v);
    v
}

/// Exploitability for a scalar two-player zero-sum game:
/// `½ · (BR₀(profile₁) + BR₁(profile₀) − game_constant)`.
pub fn exploitability_scalar<G>(game: &G, profile: &ScalarProfile<G::Action>, game_constant: Utility) -> Utility
where
    G: Game,
    G::State: Hash + Eq + Clone,
    G::Action: Clone + Eq + Display,
{
    let br0 = best_response_value(game, profile, 0).value;
    let br1 = best_response_value(game, profile, 1).value;
    0.5 * (br0 + br1 - game_constant)
}

/// Vector best response at the river: a single pass carrying an
/// opponent reach vector; at the best-response player's own nodes the
/// pure best action is chosen per hero hand (each hand is its own
/// infoset), at opponent nodes reach is updated componentwise by the
/// opponent's average strategy.
pub fn best_response_value_vector(
    tree: &RiverTree,
    profile: &VectorProfile,
    br_player: usize,
) -> (Vec<Utility>, HashMap<String, (Vec<RiverAction>, Vec<usize>)>) {
    let mut policy = HashMap::new();
    let root = tree.initial_state();
    let villain_reach: Vec<Probability> = tree.config().ranges[1 - br_player]
        .hands
        .iter()
        .map(|h| h.weight)
        .collect();
    let raw = br_state_value(tree, &root, br_player, profile, &villain_reach, &mut policy);
    let hero_range = &tree.config().ranges[br_player];
    let normalized = raw
        .iter()
        .enumerate()
        .map(|(h_idx, v)| {
            let blocked: Probability = hero_range
                .blocked_by(h_idx)
                .iter()
                .map(|&j| villain_reach[j])
                .sum();
            let mass = (villain_reach.iter().sum::<Probability>() - blocked).max(0.0);
            if mass > 0.0 {
                v / mass
            } else {
                0.0
            }
        })
        .collect();
    (normalized, policy)
}

fn br_state_value(
    tree: &RiverTree,
    state: &RiverState,
    br_player: usize,
    profile: &VectorProfile,
    villain_reach: &[Probability],
    policy: &mut HashMap<String, (Vec<RiverAction>, Vec<usize>)>,
) -> Vec<Utility> {
    if tree.is_terminal(state) {
        return terminal_raw(tree, state, br_player, villain_reach);
    }
    let acting = state.acting;
    let actions = tree.legal_actions(state);
    let key = tree.history_key(state);

    if acting == br_player {
        let hero_len = tree.config().ranges[br_player].len();
        let mut per_action = Vec::with_capacity(actions.len());
        for action in &actions {
            let next = tree.next_state(state, *action);
            per_action.push(br_state_value(tree, &next, br_player, profile, villain_reach, policy));
        }
        let mut best = vec![0usize; hero_len];
        let mut value = vec![Utility::MIN; hero_len];
        for h in 0..hero_len {
            for (a, values) in per_action.iter().enumerate() {
                if values[h] > value[h] {
                    value[h] = values[h];
                    best[h] = a;
                }
            }
        }
        policy.insert(key, (actions.clone(), best));
        value
    } else {
        let rows = profile.get(&key);
        let villain_len = tree.config().ranges[acting].len();
        let default_row = crate::infoset::uniform(actions.len());
        let mut total = vec![0.0f32; tree.config().ranges[br_player].len()];
        for (a, action) in actions.iter().enumerate() {
            let mut next_reach = villain_reach.to_vec();
            for o in 0..villain_len {
                let prob = rows.and_then(|r| r.get(o)).map(|row| row[a]).unwrap_or(default_row[a]);
                next_reach[o] = villain_reach[o] * prob;
            }
            let next = tree.next_state(state, *action);
            let child = br_state_value(tree, &next, br_player, profile, &next_reach, policy);
            for h in 0..total.len() {
                total[h] += child[h];
            }
        }
        total
    }
}

fn terminal_raw(tree: &RiverTree, state: &RiverState, br_player: usize, villain_reach: &[Probability]) -> Vec<Utility> {
    let hero_range = &tree.config().ranges[br_player];
    let villain_range = &tree.config().ranges[1 - br_player];
    let pot = tree.config().pot + state.contrib[0] + state.contrib[1];
    let hero_contrib = state.contrib[br_player];

    if let Some(folder) = state.folded {
        let payoff = if folder == br_player {
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
                let blocked: Probability = hero_range.blocked_by(h_idx).iter().map(|&j| villain_reach[j]).sum();
                (total - blocked).max(0.0) * payoff
            })
            .collect()
    } else {
        showdown_values(hero_range, villain_range, villain_reach, pot, hero_contrib).raw
    }
}

/// Exploitability for the river subgame, offset by `game_constant` (the
/// base pot both players implicitly contributed before the subgame
/// began).
pub fn exploitability_vector(tree: &RiverTree, profile: &VectorProfile, game_constant: Utility) -> Utility {
    let (br0, _) = best_response_value_vector(tree, profile, 0);
    let (br1, _) = best_response_value_vector(tree, profile, 1);
    let range0 = &tree.config().ranges[0];
    let range1 = &tree.config().ranges[1];
    let ev0: Utility = br0
        .iter()
        .zip(range0.hands.iter())
        .map(|(v, h)| v * h.weight)
        .sum();
    let ev1: Utility = br1
        .iter()
        .zip(range1.hands.iter())
        .map(|(v, h)| v * h.weight)
        .sum();
    0.5 * (ev0 + ev1 - game_constant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfr_gameplay::kuhn::KuhnGame;

    #[test]
    fn uniform_profile_best_response_matches_known_kuhn_value() {
        let game = KuhnGame;
        let profile: ScalarProfile<_> = ScalarProfile::new();
        let br0 = best_response_value(&game, &profile, 0);
        assert!(br0.value.is_finite());

        // An empty profile falls back to uniform-random at every infoset
        // for whichever player isn't being best-responded to, so br1
        // against this same empty profile is exactly the best response to
        // a fully uniform-random opponent.
        let br1 = best_response_value(&game, &profile, 1);
        assert!(
            (br1.value - 1.0 / 18.0).abs() < 1e-12,
            "player 1 BR value {} vs expected {}",
            br1.value,
            1.0 / 18.0
        );
    }
}
