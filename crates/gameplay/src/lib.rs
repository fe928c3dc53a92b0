//! The game capability set and its concrete implementations.
//!
//! - [`Game`] / [`Turn`] — the polymorphic capability every trainer and
//!   the best-response evaluator program against.
//! - [`kuhn`] — the three-card toy game used to validate CFR variants
//!   end to end.
//!
//! The river game lives in `cfr-river`; it depends on this crate for the
//! [`Game`] trait but is large enough to warrant its own crate.

mod game;
pub mod kuhn;

pub use game::*;
