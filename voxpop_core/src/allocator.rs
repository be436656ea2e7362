//! Population-proportional allocation of integer headcounts.
//!
//! Turns a table of absolute population magnitudes (which can span many
//! orders of magnitude) into an exact integer persona count per entity,
//! summing to the requested total.

use crate::distribution::CategoryDistribution;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// An exact integer headcount per entity.
///
/// Entities appear in descending population order; the counts always sum
/// to the requested total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationAllocation {
    counts: Vec<(String, usize)>,
}

impl PopulationAllocation {
    /// Iterates (entity, count) in descending population order.
    pub fn counts(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(l, c)| (l.as_str(), *c))
    }

    /// Count for one entity, if present.
    pub fn get(&self, label: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, c)| *c)
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, c)| c).sum()
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True when no entities are present.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Converts population magnitudes into exact integer headcounts.
///
/// Entities are processed in descending population order. Every entity
/// except the smallest takes `max(1, min(floor(total * share), budget
/// that keeps one unit per later entity))`; the smallest entity absorbs
/// the whole remaining budget. The remainder sink is deliberate policy:
/// rounding error lands on the smallest entity instead of being
/// redistributed proportionally.
pub struct PopulationAllocator;

impl PopulationAllocator {
    /// Allocates exactly `total` units across the entities of
    /// `populations`.
    ///
    /// When `total` is at least the number of entities, every entity
    /// receives at least 1. When it is smaller, the first `total`
    /// entities by descending population receive exactly 1 and the rest
    /// receive 0 (logged as a warning); the sum is still exactly
    /// `total`.
    pub fn allocate(
        populations: &CategoryDistribution,
        total: usize,
    ) -> Result<PopulationAllocation, CoreError> {
        populations.validate()?;
        let total_population = populations.total_weight();

        let mut entries: Vec<(String, f64)> = populations
            .iter()
            .map(|(l, w)| (l.to_string(), w))
            .collect();
        // Stable sort: table order breaks ties between equal populations.
        entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal)
        });

        if total < entries.len() {
            warn!(
                requested = total,
                entities = entries.len(),
                "allocation underflow: some entities receive zero personas"
            );
        }

        let last = entries.len() - 1;
        let mut counts: Vec<(String, usize)> = Vec::with_capacity(entries.len());
        let mut remaining = total;

        for (i, (label, population)) in entries.iter().take(last).enumerate() {
            if remaining == 0 {
                counts.push((label.clone(), 0));
                continue;
            }
            let entities_after = (last - i) as i64;
            let raw = (total as f64 * (population / total_population)).floor() as i64;
            let count = raw
                .min(remaining as i64 - entities_after)
                .max(1)
                .min(remaining as i64) as usize;
            counts.push((label.clone(), count));
            remaining -= count;
        }

        // Remainder sink: the smallest entity gets whatever is left.
        counts.push((entries[last].0.clone(), remaining));

        Ok(PopulationAllocation { counts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dist(pairs: &[(&str, f64)]) -> CategoryDistribution {
        CategoryDistribution::from_pairs(pairs.iter().map(|(l, w)| (*l, *w)))
    }

    #[test]
    fn test_reference_allocation() {
        let populations = dist(&[("A", 100.0), ("B", 10.0), ("C", 1.0)]);
        let allocation = PopulationAllocator::allocate(&populations, 20).unwrap();

        assert_eq!(allocation.total(), 20);
        assert_eq!(allocation.len(), 3);

        let a = allocation.get("A").unwrap();
        let b = allocation.get("B").unwrap();
        let c = allocation.get("C").unwrap();
        assert!(a >= 1 && b >= 1);
        assert!(a > b, "A ({a}) must outnumber B ({b})");
        // Remainder sink applies to the smallest entity.
        assert_eq!(a + b + c, 20);
    }

    #[test]
    fn test_every_entity_gets_one_when_total_allows() {
        let populations = dist(&[("big", 1e12), ("mid", 1e8), ("tiny", 1e5)]);
        let allocation = PopulationAllocator::allocate(&populations, 10).unwrap();

        assert_eq!(allocation.total(), 10);
        for (_, count) in allocation.counts() {
            assert!(count >= 1);
        }
    }

    #[test]
    fn test_underflow_first_entities_by_population() {
        let populations = dist(&[("small", 1.0), ("large", 100.0), ("mid", 10.0)]);
        let allocation = PopulationAllocator::allocate(&populations, 2).unwrap();

        assert_eq!(allocation.total(), 2);
        assert_eq!(allocation.get("large"), Some(1));
        assert_eq!(allocation.get("mid"), Some(1));
        assert_eq!(allocation.get("small"), Some(0));
    }

    #[test]
    fn test_single_entity_takes_everything() {
        let populations = dist(&[("only", 5.0)]);
        let allocation = PopulationAllocator::allocate(&populations, 50).unwrap();
        assert_eq!(allocation.get("only"), Some(50));
    }

    #[test]
    fn test_empty_table_rejected() {
        let populations = CategoryDistribution::new();
        assert!(PopulationAllocator::allocate(&populations, 10).is_err());
    }

    #[test]
    fn test_wide_magnitude_span() {
        let populations = dist(&[
            ("herring", 8e11),
            ("mackerel", 3e11),
            ("rat", 1e10),
            ("cattle", 1e9),
            ("wildebeest", 2e6),
            ("elephant", 5e5),
        ]);
        let allocation = PopulationAllocator::allocate(&populations, 100).unwrap();

        assert_eq!(allocation.total(), 100);
        assert!(allocation.get("herring").unwrap() > allocation.get("rat").unwrap());
        assert!(allocation.get("elephant").unwrap() >= 1);
    }

    proptest! {
        #[test]
        fn prop_allocation_sums_to_total(
            weights in prop::collection::vec(0.1f64..1e12, 1..12),
            extra in 0usize..500,
        ) {
            let pairs: Vec<(String, f64)> = weights
                .iter()
                .enumerate()
                .map(|(i, w)| (format!("e{i}"), *w))
                .collect();
            let populations = CategoryDistribution::from_pairs(pairs);
            let total = populations.len() + extra;

            let allocation = PopulationAllocator::allocate(&populations, total).unwrap();
            prop_assert_eq!(allocation.total(), total);
            prop_assert_eq!(allocation.len(), populations.len());
            // total >= entities, so nobody is left empty-handed.
            for (_, count) in allocation.counts() {
                prop_assert!(count >= 1);
            }
        }

        #[test]
        fn prop_underflow_still_sums(
            weights in prop::collection::vec(0.1f64..1e9, 2..10),
        ) {
            let pairs: Vec<(String, f64)> = weights
                .iter()
                .enumerate()
                .map(|(i, w)| (format!("e{i}"), *w))
                .collect();
            let populations = CategoryDistribution::from_pairs(pairs);
            let total = populations.len() - 1;

            let allocation = PopulationAllocator::allocate(&populations, total).unwrap();
            prop_assert_eq!(allocation.total(), total);
        }
    }
}
