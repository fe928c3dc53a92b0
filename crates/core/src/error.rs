use thiserror::Error;

/// Configuration-time failures raised while building a game from external
/// input. Never produced once a game has been successfully constructed —
/// trainer and evaluator code downstream is pure and infallible.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("board has {len} cards, expected {expected}")]
    InvalidBoard { len: usize, expected: usize },

    #[error("board contains a duplicate card")]
    DuplicateBoardCard,

    #[error("player {player} has an empty hand range")]
    EmptyRange { player: usize },

    #[error("player {player}'s range sums to a non-positive weight")]
    NonPositiveWeight { player: usize },

    #[error("pot must be positive, got {pot}")]
    NonPositivePot { pot: i64 },

    #[error("stack must be positive, got {stack}")]
    NonPositiveStack { stack: i64 },

    #[error("player {player}'s range conflicts with the board or itself")]
    ConflictingRange { player: usize },
}
