//! Shared types, constants, and runtime plumbing used by every crate in the
//! solver workspace.
//!
//! Mirrors the role `rbp-core` plays upstream: a dependency-free foundation
//! that the cards, gameplay, river, and mccfr crates all sit on top of.

mod error;
mod interrupt;

pub use error::SolverError;
pub use interrupt::{interrupted, request_stop};

/// Number of players. The solver core only ever plays two-player zero-sum
/// games; nothing downstream generalizes past this.
pub const N: usize = 2;

/// A probability in `[0, 1]`.
pub type Probability = f32;

/// A utility value, reported in player-0 currency unless stated otherwise.
pub type Utility = f32;

/// A chip count. Signed because intermediate pot-odds arithmetic can go
/// negative before being clamped.
pub type Chips = i32;

/// Iteration index, also used as the DCFR decay exponent input.
pub type Epoch = usize;

/// Floor applied to accumulated regret before it is used in regret
/// matching, preventing pathological negative accumulation from stalling
/// convergence. Matches the order of magnitude used upstream.
pub const REGRET_MIN: Utility = -4e6;

/// `Probability::MIN_POSITIVE` under another name, used as the smallest
/// nonzero weight a hand-range entry may carry once normalized.
pub const POLICY_MIN: Probability = Probability::MIN_POSITIVE;

/// Default DCFR decay exponents, `(alpha, beta, gamma)`.
pub const DCFR_DEFAULTS: (f32, f32, f32) = (1.5, 0.0, 2.0);

/// Default linear-weighting growth exponent used by `LinearWeight`.
pub const LINEAR_GAMMA: f32 = 1.5;

/// Absolute tolerance used when comparing floating point strategy sums
/// and exploitability checkpoints in tests.
pub const EPSILON: f64 = 1e-9;
