use crate::action::RiverAction;
use cfr_core::Chips;

/// A river betting state: history tokens, per-player contributions,
/// acting player, consecutive-check count, raise count, and the folding
/// player if any. `history` is redundant with the rest but kept for
/// display and for infoset keying.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RiverState {
    pub history: Vec<RiverAction>,
    pub contrib: [Chips; 2],
    pub acting: usize,
    pub checks: u8,
    pub raises: u8,
    pub folded: Option<usize>,
}

impl RiverState {
    pub fn root() -> Self {
        Self {
            history: Vec::new(),
            contrib: [0, 0],
            acting: 0,
            checks: 0,
            raises: 0,
            folded: None,
        }
    }

    pub fn history_token(&self) -> String {
        self.history.iter().map(|a| a.to_string()).collect()
    }

    pub fn facing_aggression(&self) -> bool {
        matches!(
            self.history.last(),
            Some(RiverAction::Bet(_)) | Some(RiverAction::Raise(_))
        )
    }

    pub fn is_terminal(&self) -> bool {
        self.folded.is_some()
            || self.checks >= 2
            || matches!(self.history.last(), Some(RiverAction::Call(_)))
    }
}
