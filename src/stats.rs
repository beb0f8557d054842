use crate::scoring::{CandidateMetrics, Tier};
use std::collections::BTreeMap;

pub const TOP_CANDIDATES: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct TopCandidate {
    pub name: String,
    pub score: f64,
    pub tier: Tier,
}

/// Pool-level summary of a ranked run.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateStats {
    pub total_candidates: usize,
    pub average_years: f64,
    pub average_match_percentage: f64,
    pub available_now: usize,
    /// Every tier is present, best first, even when its count is 0.
    pub tier_distribution: BTreeMap<Tier, usize>,
    pub top_candidates: Vec<TopCandidate>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PoolStats {
    /// No candidates at all; nothing to average.
    Empty,
    Summary(AggregateStats),
}

impl PoolStats {
    pub fn summary(&self) -> Option<&AggregateStats> {
        match self {
            PoolStats::Empty => None,
            PoolStats::Summary(stats) => Some(stats),
        }
    }
}

/// Reduce a ranked list to pool statistics.
///
/// Means are taken over everyone, unreadable candidates included. The top
/// entries are the head of the list, so it must already be ranked.
pub fn aggregate(ranked: &[CandidateMetrics]) -> PoolStats {
    if ranked.is_empty() {
        return PoolStats::Empty;
    }

    let total = ranked.len();
    let mut tier_distribution: BTreeMap<Tier, usize> = Tier::ALL.iter().map(|t| (*t, 0)).collect();
    for candidate in ranked {
        *tier_distribution.entry(candidate.tier).or_insert(0) += 1;
    }

    PoolStats::Summary(AggregateStats {
        total_candidates: total,
        average_years: ranked.iter().map(|c| c.years_experience).sum::<f64>() / total as f64,
        average_match_percentage: ranked.iter().map(|c| c.match_percentage).sum::<f64>()
            / total as f64,
        available_now: ranked.iter().filter(|c| c.available).count(),
        tier_distribution,
        top_candidates: ranked
            .iter()
            .take(TOP_CANDIDATES)
            .map(|c| TopCandidate {
                name: c.name.clone(),
                score: c.score,
                tier: c.tier,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ranked::tests::sample;
    use crate::scoring::rank;

    #[test]
    fn test_empty_pool_sentinel() {
        assert_eq!(aggregate(&[]), PoolStats::Empty);
        assert!(aggregate(&[]).summary().is_none());
    }

    #[test]
    fn test_aggregate_pool() {
        let mut low = sample(2, "Cara", 30.0);
        low.years_experience = 0.0;
        low.match_percentage = 0.0;
        low.available = false;
        let ranked = rank(vec![
            sample(0, "Alice", 85.0),
            sample(1, "Bob", 70.0),
            low,
            sample(3, "Dan", 50.0),
        ]);

        let stats = aggregate(&ranked);
        let stats = stats.summary().unwrap();
        assert_eq!(stats.total_candidates, 4);
        assert!((stats.average_years - 2.25).abs() < 1e-9);
        assert!((stats.average_match_percentage - 37.5).abs() < 1e-9);
        assert_eq!(stats.available_now, 3);
        assert_eq!(stats.tier_distribution[&Tier::Excellent], 1);
        assert_eq!(stats.tier_distribution[&Tier::Good], 1);
        assert_eq!(stats.tier_distribution[&Tier::Average], 1);
        assert_eq!(stats.tier_distribution[&Tier::Weak], 1);

        let top: Vec<&str> = stats.top_candidates.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(top, vec!["Alice", "Bob", "Dan"]);
    }

    #[test]
    fn test_all_tiers_present() {
        let stats = aggregate(&[sample(0, "Solo", 90.0)]);
        let stats = stats.summary().unwrap();
        let tiers: Vec<Tier> = stats.tier_distribution.keys().copied().collect();
        assert_eq!(tiers, Tier::ALL.to_vec());
        assert_eq!(stats.tier_distribution[&Tier::Weak], 0);
        assert_eq!(stats.top_candidates.len(), 1);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let ranked = rank(vec![sample(0, "A", 40.0), sample(1, "B", 75.0)]);
        assert_eq!(aggregate(&ranked), aggregate(&ranked));
    }
}
