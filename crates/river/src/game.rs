use crate::action::RiverAction;
use crate::state::RiverState;
use crate::tree::RiverTree;
use cfr_cards::{Board, Hand, Hole, Strength};
use cfr_core::Utility;
use cfr_gameplay::{Game, Turn};
use std::rc::Rc;

/// The river game played out for one fixed pair of sampled hole cards —
/// the view scalar CFR and external-sampling MCCFR need when they
/// traverse the tree leaf-by-leaf for a single hand. The vector trainer
/// instead drives [`RiverTree`] directly against whole ranges and never
/// constructs one of these.
#[derive(Clone)]
pub struct RiverGame {
    tree: Rc<RiverTree>,
    hands: [Hole; 2],
    board: Board,
}

impl RiverGame {
    pub fn new(tree: Rc<RiverTree>, hands: [Hole; 2]) -> Self {
        let board = tree.config().board.clone();
        Self { tree, hands, board }
    }

    pub fn tree(&self) -> &RiverTree {
        &self.tree
    }

    pub fn hand(&self, player: usize) -> Hole {
        self.hands[player]
    }
}

impl Game for RiverGame {
    type State = RiverState;
    type Action = RiverAction;

    fn initial_state(&self) -> Self::State {
        self.tree.initial_state()
    }

    fn is_terminal(&self, state: &Self::State) -> bool {
        self.tree.is_terminal(state)
    }

    fn current_player(&self, state: &Self::State) -> Turn {
        self.tree.current_player(state)
    }

    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action> {
        self.tree.legal_actions(state)
    }

    fn chance_outcomes(&self, _state: &Self::State) -> Vec<(Self::Action, cfr_core::Probability)> {
        // The river game deals no further cards; hole cards are fixed at
        // construction and the range itself is handled outside the Game
        // capability set by the vector trainer.
        Vec::new()
    }

    fn next_state(&self, state: &Self::State, action: &Self::Action) -> Self::State {
        self.tree.next_state(state, *action)
    }

    fn infoset_key(&self, state: &Self::State, player: usize) -> String {
        format!("p{player}:{}|{}", self.hands[player], self.tree.history_key(state))
    }

    fn terminal_utility(&self, state: &Self::State, player: usize) -> Utility {
        assert!(self.is_terminal(state), "terminal_utility on non-terminal state");
        let pot = self.tree.config().pot + state.contrib[0] + state.contrib[1];

        let util0 = if let Some(folder) = state.folded {
            let winner = 1 - folder;
            if winner == 0 {
                (pot - state.contrib[0]) as Utility
            } else {
                -(state.contrib[0]) as Utility
            }
        } else {
            let mut cards0 = self.board.cards.clone();
            cards0.push(self.hands[0].c1);
            cards0.push(self.hands[0].c2);
            let mut cards1 = self.board.cards.clone();
            cards1.push(self.hands[1].c1);
            cards1.push(self.hands[1].c2);
            let s0 = Strength::from(Hand::from(cards0));
            let s1 = Strength::from(Hand::from(cards1));
            use std::cmp::Ordering::*;
            match s0.cmp(&s1) {
                Greater => (pot - state.contrib[0]) as Utility,
                Less => -(state.contrib[0]) as Utility,
                Equal => (pot as Utility) / 2.0 - state.contrib[0] as Utility,
            }
        };

        if player == 0 {
            util0
        } else {
            -util0
        }
    }
}
