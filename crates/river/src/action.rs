use cfr_core::Chips;
use std::fmt::{Display, Formatter, Result};

/// A river betting action. `Check`/`Call` both display as `c` and
/// `Bet`/`Raise` display as `{b|r}{amount}`; the richer variants are kept
/// internally so pot-size bookkeeping doesn't need to re-derive which
/// case applies from a bare history token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiverAction {
    Check,
    Call(Chips),
    Fold,
    Bet(Chips),
    Raise(Chips),
}

impl RiverAction {
    pub fn amount(&self) -> Chips {
        match self {
            RiverAction::Check | RiverAction::Fold => 0,
            RiverAction::Call(a) | RiverAction::Bet(a) | RiverAction::Raise(a) => *a,
        }
    }

    pub fn is_aggressive(&self) -> bool {
        matches!(self, RiverAction::Bet(_) | RiverAction::Raise(_))
    }

    pub fn is_passive(&self) -> bool {
        matches!(self, RiverAction::Check | RiverAction::Call(_))
    }
}

impl Display for RiverAction {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            RiverAction::Check | RiverAction::Call(_) => write!(f, "c"),
            RiverAction::Fold => write!(f, "f"),
            RiverAction::Bet(amount) => write!(f, "b{amount}"),
            RiverAction::Raise(amount) => write!(f, "r{amount}"),
        }
    }
}
