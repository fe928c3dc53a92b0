use cfr_core::{Epoch, Probability, Utility};
use std::collections::HashMap;
use std::fmt::Display;

/// One scalar information set: the actions available there, accumulated
/// regret and strategy-sum vectors (parallel to `actions`), and the
/// epoch this set was last visited, needed to apply DCFR decay lazily.
#[derive(Debug, Clone)]
pub struct InfoSet<A> {
    pub actions: Vec<A>,
    pub regret_sum: Vec<Utility>,
    pub strategy_sum: Vec<Probability>,
    pub last_dcfr_iter: Epoch,
}

impl<A: Clone> InfoSet<A> {
    pub fn new(actions: Vec<A>) -> Self {
        let n = actions.len();
        Self {
            actions,
            regret_sum: vec![0.0; n],
            strategy_sum: vec![0.0; n],
            last_dcfr_iter: 0,
        }
    }

    /// `strategy[a] = max(regret[a], 0) / Σ max(regret, 0)`, uniform when
    /// the denominator is non-positive.
    pub fn current_strategy(&self) -> Vec<Probability> {
        regret_match(&self.regret_sum)
    }

    /// `strategy_sum / Σ strategy_sum`, uniform when the denominator is
    /// non-positive (an unreached infoset is reported as uniform).
    pub fn average_strategy(&self) -> Vec<Probability> {
        let total: Probability = self.strategy_sum.iter().sum();
        if total > 0.0 {
            self.strategy_sum.iter().map(|s| s / total).collect()
        } else {
            uniform(self.actions.len())
        }
    }
}

pub fn regret_match(regret_sum: &[Utility]) -> Vec<Probability> {
    let positives: Vec<Probability> = regret_sum.iter().map(|r| r.max(0.0)).collect();
    let total: Probability = positives.iter().sum();
    if total > 0.0 {
        positives.iter().map(|p| p / total).collect()
    } else {
        uniform(regret_sum.len())
    }
}

pub fn uniform(n: usize) -> Vec<Probability> {
    if n == 0 {
        return Vec::new();
    }
    vec![1.0 / n as Probability; n]
}

/// The shared mapping from infoset key to its record. Lookup misses are
/// inserted with zero-initialized regrets and the canonical action list
/// the game reports for that state.
#[derive(Debug, Clone, Default)]
pub struct InfoSetStore<A> {
    sets: HashMap<String, InfoSet<A>>,
}

impl<A: Clone + Eq + Display> InfoSetStore<A> {
    pub fn new() -> Self {
        Self {
            sets: HashMap::new(),
        }
    }

    pub fn get_or_insert(&mut self, key: &str, actions: &[A]) -> &mut InfoSet<A> {
        self.sets
            .entry(key.to_string())
            .or_insert_with(|| InfoSet::new(actions.to_vec()))
    }

    pub fn get(&self, key: &str) -> Option<&InfoSet<A>> {
        self.sets.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut InfoSet<A>> {
        self.sets.get_mut(key)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &InfoSet<A>)> {
        self.sets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regret_matching_is_uniform_when_all_nonpositive() {
        let strategy = regret_match(&[-1.0, -2.0, 0.0]);
        assert_eq!(strategy, vec![1.0 / 3.0; 3]);
    }

    #[test]
    fn regret_matching_normalizes_positive_regrets() {
        let strategy = regret_match(&[3.0, 1.0]);
        assert!((strategy[0] - 0.75).abs() < 1e-6);
        assert!((strategy[1] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn average_strategy_is_uniform_before_any_visit() {
        let set: InfoSet<&str> = InfoSet::new(vec!["c", "b"]);
        assert_eq!(set.average_strategy(), vec![0.5, 0.5]);
    }
}
