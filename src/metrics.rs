use std::ops::RangeInclusive;

use async_graphql::SimpleObject;
use rand::Rng;
use serde::Serialize;

use crate::domain::Domain;

pub(crate) const SCORE_RANGE: RangeInclusive<i32> = 50..=95;

pub(crate) const MARKET_POTENTIAL: &str = "Market Potential";
pub(crate) const INNOVATION_SCORE: &str = "Innovation Score";
pub(crate) const INVESTMENT_ATTRACTIVENESS: &str = "Investment Attractiveness";

/// Display scores for one domain. These are placeholders drawn at random
/// and carry no relation to the domain's analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, SimpleObject)]
pub(crate) struct MetricRow {
    pub(crate) domain: String,
    pub(crate) market_potential: i32,
    pub(crate) innovation_score: i32,
    pub(crate) investment_attractiveness: i32,
}

impl MetricRow {
    /// The three scores in chart axis order.
    pub(crate) fn values(&self) -> [i32; 3] {
        [
            self.market_potential,
            self.innovation_score,
            self.investment_attractiveness,
        ]
    }
}

pub(crate) fn generate_metrics(domains: &[Domain]) -> Vec<MetricRow> {
    generate_metrics_with(domains, &mut rand::rng())
}

pub(crate) fn generate_metrics_with<R: Rng + ?Sized>(
    domains: &[Domain],
    rng: &mut R,
) -> Vec<MetricRow> {
    domains
        .iter()
        .map(|domain| MetricRow {
            domain: domain.label().to_string(),
            market_potential: rng.random_range(SCORE_RANGE),
            innovation_score: rng.random_range(SCORE_RANGE),
            investment_attractiveness: rng.random_range(SCORE_RANGE),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn one_row_per_domain_in_order() {
        let rows = generate_metrics(&[Domain::FinTech, Domain::Robotics]);
        let names: Vec<_> = rows.iter().map(|r| r.domain.as_str()).collect();
        assert_eq!(names, ["FinTech", "Robotics"]);
    }

    #[test]
    fn scores_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let rows = generate_metrics_with(&Domain::ALL, &mut rng);
            for row in rows {
                assert!(row.values().iter().all(|v| SCORE_RANGE.contains(v)));
            }
        }
    }

    #[test]
    fn fresh_draws_differ_between_runs() {
        let mut rng = StdRng::seed_from_u64(42);
        let first = generate_metrics_with(&Domain::ALL, &mut rng);
        let second = generate_metrics_with(&Domain::ALL, &mut rng);
        assert_ne!(first, second);
    }

    #[test]
    fn empty_selection_yields_no_rows() {
        assert!(generate_metrics(&[]).is_empty());
    }
}
