use super::action::{KuhnAction, KuhnCard, DECK};
use super::state::{KuhnMove, KuhnState};
use crate::game::{Game, Turn};
use cfr_core::{Chips, Probability, Utility};

/// Kuhn poker: three-card deck, ante 1, a single bet size of 1, at most
/// one bet per hand. The canonical small game used to validate CFR
/// implementations end to end.
#[derive(Debug, Clone, Copy, Default)]
pub struct KuhnGame;

const ANTE: Chips = 1;
const BET: Chips = 1;

impl KuhnGame {
    /// Chip contribution each player has put in the pot by this point in
    /// the history, starting from the ante.
    fn contributions(&self, history: &[KuhnAction]) -> [Chips; 2] {
        let mut contrib = [ANTE, ANTE];
        let mut acting = 0usize;
        for action in history {
            match action {
                KuhnAction::Bet => contrib[acting] += BET,
                KuhnAction::Check if contrib[1 - acting] > contrib[acting] => {
                    contrib[acting] += BET
                } // call
                _ => {}
            }
            acting = 1 - acting;
        }
        contrib
    }
}

impl Game for KuhnGame {
    type State = KuhnState;
    type Action = KuhnMove;

    fn initial_state(&self) -> Self::State {
        KuhnState::root()
    }

    fn is_terminal(&self, state: &Self::State) -> bool {
        state.cards.is_some() && state.is_terminal_history()
    }

    fn current_player(&self, state: &Self::State) -> Turn {
        if state.cards.is_none() {
            Turn::Chance
        } else if state.is_terminal_history() {
            Turn::Terminal
        } else {
            Turn::Player(state.acting_player().expect("non-terminal dealt state"))
        }
    }

    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action> {
        if state.cards.is_none() || state.is_terminal_history() {
            return Vec::new();
        }
        let facing_bet = matches!(state.history.last(), Some(KuhnAction::Bet));
        if facing_bet {
            vec![
                KuhnMove::Play(KuhnAction::Check),
                KuhnMove::Play(KuhnAction::Fold),
            ]
        } else {
            vec![
                KuhnMove::Play(KuhnAction::Check),
                KuhnMove::Play(KuhnAction::Bet),
            ]
        }
    }

    fn chance_outcomes(&self, state: &Self::State) -> Vec<(Self::Action, Probability)> {
        if state.cards.is_some() {
            return Vec::new();
        }
        let mut outcomes = Vec::with_capacity(6);
        for &p0 in DECK.iter() {
            for &p1 in DECK.iter() {
                if p0 != p1 {
                    outcomes.push((KuhnMove::Deal(p0, p1), 1.0 / 6.0));
                }
            }
        }
        outcomes
    }

    fn next_state(&self, state: &Self::State, action: &Self::Action) -> Self::State {
        match action {
            KuhnMove::Deal(p0, p1) => KuhnState {
                cards: Some((*p0, *p1)),
                history: state.history.clone(),
            },
            KuhnMove::Play(a) => {
                let mut history = state.history.clone();
                history.push(*a);
                KuhnState {
                    cards: state.cards,
                    history,
                }
            }
        }
    }

    fn infoset_key(&self, state: &Self::State, player: usize) -> String {
        let card = state
            .cards
            .map(|(p0, p1)| if player == 0 { p0 } else { p1 })
            .expect("infoset_key requires a dealt state");
        format!("{card}|{}", state.history_token())
    }

    fn terminal_utility(&self, state: &Self::State, player: usize) -> Utility {
        assert!(self.is_terminal(state), "terminal_utility on non-terminal state");
        let (p0_card, p1_card) = state.cards.expect("dealt");
        let contrib = self.contributions(&state.history);

        let winner = if let Some(folded_at) = state
            .history
            .iter()
            .position(|a| *a == KuhnAction::Fold)
        {
            // whoever's turn it was when Fold was played is the folder
            1 - (folded_at % 2)
        } else if p0_card > p1_card {
            0
        } else {
            1
        };

        let util0 = if winner == 0 {
            contrib[1] as Utility
        } else {
            -(contrib[0] as Utility)
        };

        if player == 0 {
            util0
        } else {
            -util0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kuhn::action::KuhnCard::*;

    fn play(game: &KuhnGame, cards: (KuhnCard, KuhnCard), moves: &[KuhnAction]) -> KuhnState {
        let mut state = game.next_state(&game.initial_state(), &KuhnMove::Deal(cards.0, cards.1));
        for m in moves {
            state = game.next_state(&state, &KuhnMove::Play(*m));
        }
        state
    }

    #[test]
    fn check_check_showdown_favors_higher_card() {
        let game = KuhnGame;
        let state = play(&game, (King, Jack), &[KuhnAction::Check, KuhnAction::Check]);
        assert!(game.is_terminal(&state));
        assert_eq!(game.terminal_utility(&state, 0), 1.0);
        assert_eq!(game.terminal_utility(&state, 1), -1.0);
    }

    #[test]
    fn bet_fold_awards_pot_to_bettor() {
        let game = KuhnGame;
        let state = play(&game, (Jack, King), &[KuhnAction::Bet, KuhnAction::Fold]);
        assert_eq!(game.terminal_utility(&state, 0), 1.0);
    }

    #[test]
    fn check_bet_fold_awards_pot_to_bettor() {
        let game = KuhnGame;
        let state = play(
            &game,
            (King, Jack),
            &[KuhnAction::Check, KuhnAction::Bet, KuhnAction::Fold],
        );
        assert_eq!(game.terminal_utility(&state, 0), -1.0);
        assert_eq!(game.terminal_utility(&state, 1), 1.0);
    }

    #[test]
    fn bet_call_showdown_doubles_the_pot() {
        let game = KuhnGame;
        let state = play(&game, (King, Jack), &[KuhnAction::Bet, KuhnAction::Check]);
        assert_eq!(game.terminal_utility(&state, 0), 2.0);
    }

    #[test]
    fn infoset_key_hides_opponent_card() {
        let game = KuhnGame;
        let state = game.next_state(&game.initial_state(), &KuhnMove::Deal(King, Jack));
        assert_eq!(game.infoset_key(&state, 0), "K|");
        assert_eq!(game.infoset_key(&state, 1), "J|");
    }

    #[test]
    fn chance_outcomes_are_six_uniform_deals() {
        let game = KuhnGame;
        let outcomes = game.chance_outcomes(&game.initial_state());
        assert_eq!(outcomes.len(), 6);
        let total: Probability = outcomes.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
