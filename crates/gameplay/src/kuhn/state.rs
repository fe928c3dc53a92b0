use super::action::{KuhnAction, KuhnCard};
use std::fmt::{Display, Formatter, Result};

/// Either a chance deal (both players' hole cards at once) or a player
/// action. Kept as one enum so `Game::Action` has a single concrete type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KuhnMove {
    Deal(KuhnCard, KuhnCard),
    Play(KuhnAction),
}

impl Display for KuhnMove {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            KuhnMove::Deal(p0, p1) => write!(f, "deal({p0},{p1})"),
            KuhnMove::Play(a) => write!(f, "{a}"),
        }
    }
}

/// A Kuhn poker state: the cards dealt (once chance has acted) and the
/// sequence of player actions so far. `history` never contains a `Deal`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KuhnState {
    pub cards: Option<(KuhnCard, KuhnCard)>,
    pub history: Vec<KuhnAction>,
}

impl KuhnState {
    pub fn root() -> Self {
        Self {
            cards: None,
            history: Vec::new(),
        }
    }

    pub fn history_token(&self) -> String {
        self.history.iter().map(|a| a.to_string()).collect()
    }

    pub fn is_terminal_history(&self) -> bool {
        matches!(
            self.history_token().as_str(),
            "cc" | "bc" | "bf" | "cbc" | "cbf"
        )
    }

    /// `None` before the deal, otherwise the acting player's index.
    pub fn acting_player(&self) -> Option<usize> {
        if self.cards.is_none() || self.is_terminal_history() {
            None
        } else {
            Some(self.history.len() % 2)
        }
    }
}
