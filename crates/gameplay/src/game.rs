use cfr_core::{Probability, Utility};
use std::fmt::Display;
use std::hash::Hash;

/// Whose decision a state represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Player(usize),
    Chance,
    Terminal,
}

/// The capability set every game in this workspace implements: a
/// deterministic, side-effect-free view over hashable states, generalized
/// from the upstream `CfrGame` trait (which only exposed `root`/`turn`/
/// `apply`/`payoff`) to the full operation table trainers and the
/// best-response evaluator both need.
///
/// States are value objects — `next_state` returns a fresh state rather
/// than mutating `self` — so trees built from a `Game` are freely
/// shareable and cacheable by state.
pub trait Game {
    type State: Clone + Eq + Hash;
    type Action: Clone + Eq + Display;

    fn initial_state(&self) -> Self::State;

    fn is_terminal(&self, state: &Self::State) -> bool;

    fn current_player(&self, state: &Self::State) -> Turn;

    /// Stable-ordered legal actions at a player decision. Empty at chance
    /// or terminal states.
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Outcome distribution at a chance node; probabilities sum to 1.
    /// Empty at player or terminal states.
    fn chance_outcomes(&self, state: &Self::State) -> Vec<(Self::Action, Probability)>;

    fn next_state(&self, state: &Self::State, action: &Self::Action) -> Self::State;

    /// Identical for every state sharing one information set from
    /// `player`'s point of view.
    fn infoset_key(&self, state: &Self::State, player: usize) -> String;

    /// Terminal utility for `player`, reported in player-0 currency;
    /// callers negate for player 1. Only defined at terminal states.
    fn terminal_utility(&self, state: &Self::State, player: usize) -> Utility;
}
