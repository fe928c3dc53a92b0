//! Information-set store, trainers, and evaluation for the CFR solver core.
//!
//! - [`infoset`] — the shared regret/strategy-sum store and regret-matching
//!   primitive, used by every scalar trainer below.
//! - [`regret`] / [`policy`] — the pluggable update-rule traits
//!   (`RegretRule`, `PolicyRule`) that select among vanilla CFR, CFR⁺,
//!   linear weighting, and DCFR without duplicating the traversal code.
//! - [`scalar`] — the scalar CFR trainer (vanilla/CFR⁺/LCFR/DCFR,
//!   alternating updates) over any [`cfr_gameplay::Game`].
//! - [`external`] — external-sampling MCCFR over a [`cfr_river::RiverTree`].
//! - [`showdown`] — the O(N log N) showdown kernel vector trainers and
//!   best response both depend on.
//! - [`vector`] — vector-form CFR/CFR⁺ over an entire river hand range.
//! - [`fictitious`] / [`fictitious_vector`] — scalar and vector fictitious
//!   play, an alternative to regret matching.
//! - [`best_response`] — scalar and vector best response and
//!   exploitability.

mod best_response;
mod external;
mod fictitious;
mod fictitious_vector;
mod infoset;
mod policy;
mod regret;
mod scalar;
mod showdown;
mod vector;

pub use best_response::*;
pub use external::*;
pub use fictitious::*;
pub use fictitious_vector::*;
pub use infoset::*;
pub use policy::*;
pub use regret::*;
pub use scalar::*;
pub use showdown::*;
pub use vector::*;
