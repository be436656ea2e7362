//! Weighted categorical sampling over ordered label→weight tables.

use crate::error::CoreError;
use rand::distributions::{Distribution, Uniform, WeightedIndex};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// An ordered mapping from category label to non-negative weight.
///
/// Weights need not sum to 1; they are normalized by their sum at draw
/// time. Entry order is preserved and breaks ties downstream (allocator
/// sort, keyword ranking).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryDistribution {
    entries: Vec<(String, f64)>,
}

impl CategoryDistribution {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Builds a table from (label, weight) pairs, preserving order.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            entries: pairs.into_iter().map(|(l, w)| (l.into(), w)).collect(),
        }
    }

    /// Appends an entry.
    pub fn push(&mut self, label: impl Into<String>, weight: f64) {
        self.entries.push((label.into(), weight));
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates (label, weight) in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(l, w)| (l.as_str(), *w))
    }

    /// Label at position `index`.
    pub fn label_at(&self, index: usize) -> &str {
        &self.entries[index].0
    }

    /// Sum of all weights (not required to be 1).
    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w).sum()
    }

    /// Checks that the table can be sampled from: non-empty, all weights
    /// finite and non-negative, positive sum.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.entries.is_empty() {
            return Err(CoreError::invalid_distribution("empty category table"));
        }
        if let Some((label, _)) = self
            .entries
            .iter()
            .find(|(_, w)| !w.is_finite() || *w < 0.0)
        {
            return Err(CoreError::invalid_distribution(format!(
                "weight for '{label}' is negative or non-finite"
            )));
        }
        if self.total_weight() <= 0.0 {
            return Err(CoreError::invalid_distribution("all weights are zero"));
        }
        Ok(())
    }
}

/// Draws categories proportionally to weight from a seeded rng.
///
/// Repeated draws are independent; the sampler keeps no per-distribution
/// state. All entropy derives from the construction seed, so a run
/// replays exactly from the same seed.
pub struct WeightedSampler {
    rng: ChaCha8Rng,
}

impl WeightedSampler {
    /// Creates a sampler from a master seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draws one category label, with probability proportional to weight.
    pub fn sample<'a>(&mut self, dist: &'a CategoryDistribution) -> Result<&'a str, CoreError> {
        dist.validate()?;
        let index = WeightedIndex::new(dist.iter().map(|(_, w)| w))
            .map_err(|e| CoreError::invalid_distribution(e.to_string()))?;
        Ok(dist.label_at(index.sample(&mut self.rng)))
    }

    /// Draws one index from a bare weight slice.
    pub fn sample_index(&mut self, weights: &[f64]) -> Result<usize, CoreError> {
        if weights.is_empty() {
            return Err(CoreError::invalid_distribution("empty weight slice"));
        }
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(CoreError::invalid_distribution(
                "negative or non-finite weight",
            ));
        }
        let index = WeightedIndex::new(weights.iter())
            .map_err(|e| CoreError::invalid_distribution(e.to_string()))?;
        Ok(index.sample(&mut self.rng))
    }

    /// Draws a uniform integer in the inclusive range [lo, hi].
    pub fn sample_range(&mut self, lo: u32, hi: u32) -> u32 {
        Uniform::new_inclusive(lo, hi).sample(&mut self.rng)
    }

    /// Picks one element of a non-empty slice uniformly.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T, CoreError> {
        if items.is_empty() {
            return Err(CoreError::invalid_distribution("empty choice set"));
        }
        let index = self.sample_range(0, items.len() as u32 - 1) as usize;
        Ok(&items[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_converges_to_weights() {
        let dist = CategoryDistribution::from_pairs([("a", 1.0), ("b", 3.0)]);
        let mut sampler = WeightedSampler::new(42);

        let draws = 20_000;
        let mut b_count = 0;
        for _ in 0..draws {
            if sampler.sample(&dist).unwrap() == "b" {
                b_count += 1;
            }
        }

        let b_freq = b_count as f64 / draws as f64;
        assert!((b_freq - 0.75).abs() < 0.03, "b frequency was {b_freq}");
    }

    #[test]
    fn test_empty_distribution_rejected() {
        let dist = CategoryDistribution::new();
        let mut sampler = WeightedSampler::new(1);
        assert!(matches!(
            sampler.sample(&dist),
            Err(CoreError::InvalidDistribution(_))
        ));
    }

    #[test]
    fn test_zero_weight_distribution_rejected() {
        let dist = CategoryDistribution::from_pairs([("a", 0.0), ("b", 0.0)]);
        let mut sampler = WeightedSampler::new(1);
        assert!(matches!(
            sampler.sample(&dist),
            Err(CoreError::InvalidDistribution(_))
        ));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let dist = CategoryDistribution::from_pairs([("a", 1.0), ("b", -0.5)]);
        assert!(dist.validate().is_err());
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let dist =
            CategoryDistribution::from_pairs([("x", 2.0), ("y", 5.0), ("z", 1.0)]);
        let mut s1 = WeightedSampler::new(7);
        let mut s2 = WeightedSampler::new(7);

        for _ in 0..100 {
            assert_eq!(s1.sample(&dist).unwrap(), s2.sample(&dist).unwrap());
        }
    }

    #[test]
    fn test_sample_range_inclusive() {
        let mut sampler = WeightedSampler::new(9);
        for _ in 0..200 {
            let v = sampler.sample_range(25, 34);
            assert!((25..=34).contains(&v));
        }
    }

    #[test]
    fn test_choose_empty_rejected() {
        let mut sampler = WeightedSampler::new(1);
        let empty: &[u32] = &[];
        assert!(sampler.choose(empty).is_err());
    }
}
