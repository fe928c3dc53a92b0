//! Strategy-sum weighting schemes for CFR variants.

use cfr_core::{Epoch, Probability, POLICY_MIN};
use std::fmt::Display;

/// A probability distribution over actions. A `Vec` rather than a map:
/// action counts are small (2-10 in poker) so linear scans beat hashing,
/// and iteration order stays stable for display and snapshotting.
pub type Policy<A> = Vec<(A, Probability)>;

pub fn policy_of<A: Clone>(actions: &[A], weights: &[Probability]) -> Policy<A> {
    actions
        .iter()
        .cloned()
        .zip(weights.iter().copied())
        .collect()
}

pub fn display_policy<A: Display>(policy: &Policy<A>) -> String {
    policy
        .iter()
        .map(|(a, p)| format!("{a}:{p:.3}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// How a strategy-sum accumulator absorbs a new iteration's contribution.
pub trait PolicyRule {
    /// Combines the existing accumulated strategy-sum entry with the new
    /// current-strategy weight for this iteration.
    fn learn(accumulated: Probability, immediate: Probability, epoch: Epoch) -> Probability;

    /// The decay applied to an already-accumulated strategy-sum entry
    /// before a skipped span of iterations (used only under DCFR).
    fn discount(_epoch: Epoch) -> Probability {
        1.0
    }
}

/// Every iteration contributes equally to the average strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantWeight;

impl PolicyRule for ConstantWeight {
    fn learn(accumulated: Probability, immediate: Probability, _epoch: Epoch) -> Probability {
        (accumulated + immediate).max(POLICY_MIN)
    }
}

/// Later iterations are weighted proportionally to their iteration
/// index, favoring the (presumably better-converged) recent strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearWeight;

impl PolicyRule for LinearWeight {
    fn learn(accumulated: Probability, immediate: Probability, epoch: Epoch) -> Probability {
        let t = epoch.max(1) as Probability;
        (accumulated + immediate * t).max(POLICY_MIN)
    }
    fn discount(epoch: Epoch) -> Probability {
        let t = epoch.max(1) as Probability;
        (t / (t + 1.0)).powf(cfr_core::LINEAR_GAMMA)
    }
}

/// DCFR's strategy-sum decay: `(t/(t+1))^gamma`, compounded across every
/// iteration skipped since the infoset's last visit.
#[derive(Debug, Clone, Copy)]
pub struct DiscountedWeight {
    pub gamma: f32,
}

impl Default for DiscountedWeight {
    fn default() -> Self {
        let (_alpha, _beta, gamma) = cfr_core::DCFR_DEFAULTS;
        Self { gamma }
    }
}

impl DiscountedWeight {
    /// The compounded `(t/(t+1))^gamma` decay across `skipped` iterations,
    /// using this instance's own `gamma` rather than the default.
    pub fn decayed(&self, skipped: Epoch) -> Probability {
        let mut factor = 1.0f32;
        for t in 1..=skipped.max(1) {
            let t = t as f32;
            factor *= (t / (t + 1.0)).powf(self.gamma);
        }
        factor
    }
}

impl PolicyRule for DiscountedWeight {
    fn learn(accumulated: Probability, immediate: Probability, epoch: Epoch) -> Probability {
        let decayed = accumulated * Self::default().decayed(epoch);
        decayed + immediate
    }
    fn discount(epoch: Epoch) -> Probability {
        Self::default().decayed(epoch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_weight_just_sums() {
        assert_eq!(ConstantWeight::learn(1.0, 1.0, 5), 2.0);
    }

    #[test]
    fn linear_weight_scales_by_epoch() {
        assert_eq!(LinearWeight::learn(0.0, 1.0, 10), 10.0);
    }

    #[test]
    fn policy_of_pairs_actions_with_weights() {
        let p = policy_of(&["c", "b"], &[0.3, 0.7]);
        assert_eq!(p, vec![("c", 0.3), ("b", 0.7)]);
    }
}
