//! Per-query scoring for the search-index regression harness.
//!
//! Four sub-scores are combined into one normalized metric:
//!
//! ```text
//! combined = sum(score_i * weight_i) / sum(weight_i)   over applicable i
//! ```
//!
//! A sub-score that cannot be computed for a record (no positive
//! expectations, no hits, fewer than two order-comparable matches, no
//! negatives) drops out of the numerator and the denominator both.

use std::cmp::Ordering;
use std::collections::HashSet;

use anyhow::Result;

use crate::error::HarnessError;

use super::types::{ComponentWeights, QueryLine, ScoreBreakdown, SearchBackend};

/// Filtered probes for negative expectations look this deep into the index.
pub const NEGATIVE_PROBE_LIMIT: usize = 10;

/// Weighted division leaves a tiny imprecision when all four sub-scores are
/// in play; perfect scores are counted downstream by exact comparison, so
/// near-unity results are snapped.
const PERFECT_SNAP_EPSILON: f64 = 1e-13;

pub fn score_query_line(
    backend: &dyn SearchBackend,
    key_field: &str,
    line: &QueryLine,
    weights: &ComponentWeights,
) -> Result<ScoreBreakdown> {
    let expected = line.expected();
    let negatives = line.negatives();
    if expected.is_empty() && negatives.is_empty() {
        return Err(HarnessError::MissingExpectations {
            query: line.query.clone(),
        }
        .into());
    }

    // A minimal probe of one result still exercises the query when only
    // negatives were declared.
    let probe_limit = if expected.is_empty() { 1 } else { expected.len() };
    let hits = backend.search(&line.query, &line.doc_type, None, probe_limit)?;
    let hit_keys: Vec<&str> = hits.iter().map(|hit| hit.key.as_str()).collect();

    let mut precision = None;
    let mut recall = None;
    let mut order = None;
    if !expected.is_empty() {
        let expected_set: HashSet<&str> = expected.iter().map(String::as_str).collect();
        let hit_set: HashSet<&str> = hit_keys.iter().copied().collect();

        recall = Some(membership_fraction(
            expected.iter().map(String::as_str),
            &hit_set,
            expected.len(),
        ));
        if !hit_keys.is_empty() {
            precision = Some(membership_fraction(
                hit_keys.iter().copied(),
                &expected_set,
                hit_keys.len(),
            ));
        }

        let matched_hits: Vec<&str> = hit_keys
            .iter()
            .copied()
            .filter(|key| expected_set.contains(key))
            .collect();
        let recalled_expected: Vec<&str> = expected
            .iter()
            .map(String::as_str)
            .filter(|key| hit_set.contains(key))
            .collect();
        if matched_hits.len() > 1 {
            order = kendall_tau(&matched_hits, &recalled_expected).map(|tau| (tau + 1.0) / 2.0);
        }
    }

    let mut negatives_score = None;
    if !negatives.is_empty() {
        let mut excluded = 0_usize;
        for negative in negatives {
            let filtered = backend.search(
                &line.query,
                &line.doc_type,
                Some((key_field, negative)),
                NEGATIVE_PROBE_LIMIT,
            )?;
            if !filtered.iter().any(|hit| hit.key == *negative) {
                excluded += 1;
            }
        }
        negatives_score = Some(excluded as f64 / negatives.len() as f64);
    }

    let components = [
        (precision, weights.precision),
        (recall, weights.recall),
        (order, weights.order),
        (negatives_score, weights.negatives),
    ];

    Ok(ScoreBreakdown {
        precision,
        recall,
        order,
        negatives: negatives_score,
        combined: snap_perfect(weighted_mean(&components)),
    })
}

fn membership_fraction<'a>(
    values: impl Iterator<Item = &'a str>,
    members: &HashSet<&str>,
    total: usize,
) -> f64 {
    if total == 0 {
        return 0.0;
    }

    let matched = values.filter(|value| members.contains(value)).count();
    matched as f64 / total as f64
}

/// Weighted mean over the applicable components only. At least one component
/// is applicable once the expectation check has passed: recall whenever
/// positives exist, negatives otherwise.
fn weighted_mean(components: &[(Option<f64>, f64)]) -> f64 {
    let applicable: Vec<(f64, f64)> = components
        .iter()
        .filter_map(|(score, weight)| score.map(|value| (value, *weight)))
        .collect();

    let weight_total: f64 = applicable.iter().map(|(_, weight)| weight).sum();
    if weight_total == 0.0 {
        return 0.0;
    }

    let weighted_total: f64 = applicable
        .iter()
        .map(|(value, weight)| value * weight)
        .sum();
    weighted_total / weight_total
}

fn snap_perfect(score: f64) -> f64 {
    if (score - 1.0).abs() < PERFECT_SNAP_EPSILON {
        1.0
    } else {
        score
    }
}

/// Kendall tau-b between two positionally paired value sequences (excess
/// elements of the longer sequence are ignored).
///
/// Returns `None` when fewer than two pairs exist or when ties wipe out one
/// side's comparable pairs entirely.
fn kendall_tau<T: Ord>(left: &[T], right: &[T]) -> Option<f64> {
    let n = left.len().min(right.len());
    if n < 2 {
        return None;
    }

    let mut concordant = 0_u64;
    let mut discordant = 0_u64;
    let mut left_ties = 0_u64;
    let mut right_ties = 0_u64;
    for i in 0..n {
        for j in (i + 1)..n {
            let left_cmp = left[i].cmp(&left[j]);
            let right_cmp = right[i].cmp(&right[j]);
            if left_cmp == Ordering::Equal {
                left_ties += 1;
            }
            if right_cmp == Ordering::Equal {
                right_ties += 1;
            }
            if left_cmp == Ordering::Equal || right_cmp == Ordering::Equal {
                continue;
            }
            if left_cmp == right_cmp {
                concordant += 1;
            } else {
                discordant += 1;
            }
        }
    }

    let total = (n as u64) * (n as u64 - 1) / 2;
    let left_pairs = total - left_ties;
    let right_pairs = total - right_ties;
    if left_pairs == 0 || right_pairs == 0 {
        return None;
    }

    let denominator = ((left_pairs as f64) * (right_pairs as f64)).sqrt();
    Some((concordant as f64 - discordant as f64) / denominator)
}
