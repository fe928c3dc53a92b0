use crate::action::RiverAction;
use crate::config::RiverConfig;
use crate::state::RiverState;
use cfr_cards::Hole;
use cfr_core::Chips;
use cfr_gameplay::Turn;
use std::cell::RefCell;
use std::collections::HashMap;

/// The pure betting-structure machinery shared by the scalar [`RiverGame`]
/// (one fixed hand pair) and the vector trainer (an entire range per
/// node): legal-action generation, next-state transition, and terminal
/// detection, all memoized on `(state, action)` since both are pure
/// functions of the betting history.
///
/// [`RiverGame`]: crate::game::RiverGame
pub struct RiverTree {
    config: RiverConfig,
    legal_cache: RefCell<HashMap<RiverState, Vec<RiverAction>>>,
    next_cache: RefCell<HashMap<(RiverState, RiverAction), RiverState>>,
}

impl RiverTree {
    pub fn new(config: RiverConfig) -> Self {
        Self {
            config,
            legal_cache: RefCell::new(HashMap::new()),
            next_cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RiverConfig {
        &self.config
    }

    pub fn initial_state(&self) -> RiverState {
        RiverState::root()
    }

    pub fn is_terminal(&self, state: &RiverState) -> bool {
        state.is_terminal()
    }

    pub fn current_player(&self, state: &RiverState) -> Turn {
        if state.is_terminal() {
            Turn::Terminal
        } else {
            Turn::Player(state.acting)
        }
    }

    fn pot_total(&self, state: &RiverState) -> Chips {
        self.config.pot + state.contrib[0] + state.contrib[1]
    }

    fn remaining_stack(&self, state: &RiverState, player: usize) -> Chips {
        self.config.stack - state.contrib[player]
    }

    fn sized_amounts(&self, sizes: &[f64], pot: Chips, cap: Chips) -> Vec<Chips> {
        let mut amounts: Vec<Chips> = sizes
            .iter()
            .map(|size| (pot as f64 * size).round() as Chips)
            .filter(|&amount| amount > 0)
            .map(|amount| amount.min(cap))
            .collect();
        if self.config.include_all_in && cap > 0 {
            amounts.push(cap);
        }
        amounts.sort_unstable();
        amounts.dedup();
        amounts
    }

    pub fn legal_actions(&self, state: &RiverState) -> Vec<RiverAction> {
        if state.is_terminal() {
            return Vec::new();
        }
        if let Some(cached) = self.legal_cache.borrow().get(state) {
            return cached.clone();
        }

        let acting = state.acting;
        let opponent = 1 - acting;
        let sizing = &self.config.sizing[acting];

        let actions = if state.facing_aggression() {
            let call_amount = state.contrib[opponent] - state.contrib[acting];
            let call_amount = call_amount.min(self.remaining_stack(state, acting));
            let mut actions = vec![RiverAction::Call(call_amount), RiverAction::Fold];

            if state.raises < self.config.max_raises {
                let pot_after_call = self.pot_total(state) + call_amount;
                let cap = self.remaining_stack(state, acting) - call_amount;
                let sizes = if state.raises == 1 {
                    &sizing.first_raises
                } else {
                    &sizing.next_raises
                };
                for amount in self.sized_amounts(sizes, pot_after_call, cap) {
                    actions.push(RiverAction::Raise(amount));
                }
            }
            actions
        } else {
            let mut actions = vec![RiverAction::Check];
            let pot = self.pot_total(state);
            let cap = self.remaining_stack(state, acting);
            for amount in self.sized_amounts(&sizing.first_bets, pot, cap) {
                actions.push(RiverAction::Bet(amount));
            }
            actions
        };

        self.legal_cache
            .borrow_mut()
            .insert(state.clone(), actions.clone());
        actions
    }

    pub fn next_state(&self, state: &RiverState, action: RiverAction) -> RiverState {
        let key = (state.clone(), action);
        if let Some(cached) = self.next_cache.borrow().get(&key) {
            return cached.clone();
        }

        let (state, action) = key;
        let acting = state.acting;
        let mut next = state.clone();
        next.history.push(action);

        match action {
            RiverAction::Fold => {
                next.folded = Some(acting);
            }
            RiverAction::Check => {
                next.checks = if matches!(state.history.last(), Some(RiverAction::Check)) {
                    state.checks + 1
                } else {
                    1
                };
                next.acting = 1 - acting;
            }
            RiverAction::Call(amount) => {
                next.contrib[acting] += amount;
                next.checks = 0;
            }
            RiverAction::Bet(amount) => {
                next.contrib[acting] += amount;
                next.checks = 0;
                next.raises += 1;
                next.acting = 1 - acting;
            }
            RiverAction::Raise(amount) => {
                let call_amount = state.contrib[1 - acting] - state.contrib[acting];
                next.contrib[acting] += call_amount + amount;
                next.checks = 0;
                next.raises += 1;
                next.acting = 1 - acting;
            }
        }

        self.next_cache.borrow_mut().insert((state, action), next.clone());
        next
    }

    pub fn history_key(&self, state: &RiverState) -> String {
        state.history_token()
    }
}

/// Shorthand used by callers that need both hole cards to compute a
/// showdown at a terminal river state.
pub type Showdown = (Hole, Hole);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RiverConfigBuilder;
    use cfr_cards::{Board, Card, Rank, Suit};
    use cfr_core::Probability;

    fn card(r: Rank, s: Suit) -> Card {
        Card::new(r, s)
    }

    fn sample_tree() -> RiverTree {
        let board = vec![
            card(Rank::King, Suit::Spade),
            card(Rank::Ten, Suit::Heart),
            card(Rank::Seven, Suit::Spade),
            card(Rank::Four, Suit::Diamond),
            card(Rank::Two, Suit::Spade),
        ];
        let blocked: std::collections::HashSet<Card> = board.iter().copied().collect();
        let deck: Vec<Card> = (0..52u8)
            .map(Card::from)
            .filter(|c| !blocked.contains(c))
            .collect();
        let mut combos: Vec<(Hole, Probability)> = Vec::new();
        for i in 0..deck.len() {
            for j in (i + 1)..deck.len() {
                combos.push((Hole::new(deck[i], deck[j]), 1.0));
            }
        }
        let config = RiverConfigBuilder::new()
            .board(board)
            .pot(1000)
            .stack(9500)
            .bet_sizes(vec![0.5, 1.0])
            .include_all_in(true)
            .range(0, combos.clone())
            .range(1, combos)
            .build()
            .unwrap();
        RiverTree::new(config)
    }

    #[test]
    fn root_offers_check_and_sized_bets() {
        let tree = sample_tree();
        let root = tree.initial_state();
        let actions = tree.legal_actions(&root);
        assert!(actions.contains(&RiverAction::Check));
        assert!(actions.iter().any(|a| matches!(a, RiverAction::Bet(_))));
    }

    #[test]
    fn two_checks_are_terminal() {
        let tree = sample_tree();
        let root = tree.initial_state();
        let s1 = tree.next_state(&root, RiverAction::Check);
        let s2 = tree.next_state(&s1, RiverAction::Check);
        assert!(tree.is_terminal(&s2));
    }

    #[test]
    fn calling_a_bet_is_terminal() {
        let tree = sample_tree();
        let root = tree.initial_state();
        let bet = tree
            .legal_actions(&root)
            .into_iter()
            .find(|a| matches!(a, RiverAction::Bet(_)))
            .unwrap();
        let s1 = tree.next_state(&root, bet);
        let call = tree
            .legal_actions(&s1)
            .into_iter()
            .find(|a| matches!(a, RiverAction::Call(_)))
            .unwrap();
        let s2 = tree.next_state(&s1, call);
        assert!(tree.is_terminal(&s2));
        assert_eq!(s2.contrib[0], s2.contrib[1]);
    }

    #[test]
    fn folding_ends_the_hand() {
        let tree = sample_tree();
        let root = tree.initial_state();
        let bet = tree
            .legal_actions(&root)
            .into_iter()
            .find(|a| matches!(a, RiverAction::Bet(_)))
            .unwrap();
        let s1 = tree.next_state(&root, bet);
        let s2 = tree.next_state(&s1, RiverAction::Fold);
        assert!(tree.is_terminal(&s2));
        assert_eq!(s2.folded, Some(1));
    }
}
