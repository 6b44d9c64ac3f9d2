//! Static parameter-importance table for typical RothC drivers.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters and raw impact weights, in declaration order.
pub const SENSITIVITY_WEIGHTS: [(&str, f64); 5] = [
    ("carbon_input_rate", 0.34),
    ("clay_content", 0.28),
    ("temperature_response", 0.16),
    ("moisture_modifier", 0.12),
    ("decomposition_rate_modifier", 0.10),
];

/// Relative influence of one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityRow {
    /// Parameter name.
    pub parameter: String,
    /// Normalized impact; all rows sum to 1.
    pub impact: f64,
    /// Dense rank by descending impact, starting at 1.
    pub rank: u32,
}

/// Build the sensitivity table, ordered by ascending rank.
#[must_use]
pub fn generate_sensitivity_results() -> Vec<SensitivityRow> {
    rank_impacts(&SENSITIVITY_WEIGHTS)
}

/// Normalize `weights` and rank them, ordered by ascending rank.
///
/// Equal impacts keep their input order.
#[must_use]
pub fn rank_impacts(weights: &[(&str, f64)]) -> Vec<SensitivityRow> {
    let total: f64 = weights.iter().map(|(_, w)| w).sum();
    let impacts: Vec<f64> = weights.iter().map(|(_, w)| w / total).collect();
    let ranks = dense_rank_descending(&impacts);

    let mut rows: Vec<SensitivityRow> = weights
        .iter()
        .zip(impacts)
        .zip(ranks)
        .map(|((&(name, _), impact), rank)| SensitivityRow {
            parameter: name.to_string(),
            impact,
            rank,
        })
        .collect();
    rows.sort_by_key(|r| r.rank);

    debug!(parameters = rows.len(), "ranked sensitivity parameters");
    rows
}

/// Dense rank: the largest value gets 1, ties share a rank, and the next
/// distinct value gets the previous rank plus one.
#[must_use]
pub fn dense_rank_descending(values: &[f64]) -> Vec<u32> {
    let mut distinct: Vec<f64> = values.to_vec();
    distinct.sort_by(|a, b| b.total_cmp(a));
    distinct.dedup();

    values
        .iter()
        .map(|v| {
            let pos = distinct.iter().position(|d| d == v).unwrap_or(0);
            u32::try_from(pos + 1).unwrap_or(u32::MAX)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impacts_sum_to_one() {
        let rows = generate_sensitivity_results();
        assert_eq!(rows.len(), 5);
        let sum: f64 = rows.iter().map(|r| r.impact).sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(rows.iter().all(|r| r.impact > 0.0 && r.impact <= 1.0));
    }

    #[test]
    fn test_ranked_order() {
        let rows = generate_sensitivity_results();
        let names: Vec<&str> = rows.iter().map(|r| r.parameter.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "carbon_input_rate",
                "clay_content",
                "temperature_response",
                "moisture_modifier",
                "decomposition_rate_modifier",
            ]
        );
        let ranks: Vec<u32> = rows.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_dense_rank_ties() {
        let ranks = dense_rank_descending(&[0.2, 0.5, 0.2, 0.1, 0.5]);
        assert_eq!(ranks, vec![2, 1, 2, 3, 1]);
    }

    #[test]
    fn test_normalizes_unnormalized_weights() {
        let rows = rank_impacts(&[("a", 2.0), ("b", 6.0), ("c", 2.0)]);
        assert_eq!(rows[0].parameter, "b");
        assert!((rows[0].impact - 0.6).abs() < 1e-12);
        assert_eq!(rows[0].rank, 1);
        // ties keep input order and share rank 2
        assert_eq!(rows[1].parameter, "a");
        assert_eq!(rows[2].parameter, "c");
        assert_eq!(rows[1].rank, 2);
        assert_eq!(rows[2].rank, 2);
    }

    #[test]
    fn test_ranks_are_dense() {
        let rows = rank_impacts(&[("a", 1.0), ("b", 1.0), ("c", 0.5), ("d", 0.25)]);
        let mut ranks: Vec<u32> = rows.iter().map(|r| r.rank).collect();
        ranks.dedup();
        assert_eq!(ranks, vec![1, 2, 3]);
        for pair in rows.windows(2) {
            assert!(pair[0].impact >= pair[1].impact);
        }
    }
}
