use std::cmp::Ordering;

use crate::allocation::config::RoundingMode;
use crate::types::allocation::CategoryAllocation;
use crate::types::identifiers::CategoryId;

pub struct RebalanceResult {
    pub counts: Vec<usize>,
    /// Number of single-slot corrections applied. Always `|sum(raw) - budget|`.
    pub steps: usize,
}

/// Round each share to an integer count. Negative shares become 0.
pub fn round_shares(shares: &[f64], rounding: RoundingMode) -> Vec<usize> {
    shares
        .iter()
        .map(|&share| {
            let rounded = rounding.round(share);
            if rounded.is_finite() && rounded > 0.0 {
                rounded as usize
            } else {
                0
            }
        })
        .collect()
}

/// Repair `counts` so they sum to `budget` exactly, one slot at a time.
///
/// `metric(counts, i)` ranks candidate `i`. Under budget the candidate with the
/// largest metric gains a slot; over budget the candidate with the smallest
/// metric among those still holding a slot loses one. Ties go to the earliest
/// candidate. Every step moves the sum one closer to `budget`.
pub fn rebalance<F>(mut counts: Vec<usize>, budget: usize, metric: F) -> RebalanceResult
where
    F: Fn(&[usize], usize) -> f64,
{
    let mut steps = 0;

    loop {
        let sum: usize = counts.iter().sum();
        let target = match sum.cmp(&budget) {
            Ordering::Equal => break,
            Ordering::Less => largest(&counts, &metric).map(|idx| (idx, true)),
            Ordering::Greater => smallest_holding(&counts, &metric).map(|idx| (idx, false)),
        };
        // Only reachable with no candidates at all
        let Some((idx, grow)) = target else {
            break;
        };
        if grow {
            counts[idx] += 1;
        } else {
            counts[idx] -= 1;
        }
        steps += 1;
    }

    RebalanceResult { counts, steps }
}

fn largest<F>(counts: &[usize], metric: &F) -> Option<usize>
where
    F: Fn(&[usize], usize) -> f64,
{
    let mut best: Option<(usize, f64)> = None;
    for idx in 0..counts.len() {
        let value = metric(counts, idx);
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

// Equivalent to scanning candidates in stable ascending-metric order and
// taking the first one with a slot left.
fn smallest_holding<F>(counts: &[usize], metric: &F) -> Option<usize>
where
    F: Fn(&[usize], usize) -> f64,
{
    let mut best: Option<(usize, f64)> = None;
    for idx in 0..counts.len() {
        if counts[idx] == 0 {
            continue;
        }
        let value = metric(counts, idx);
        match best {
            Some((_, best_value)) if value >= best_value => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Attach percentages and order rows by descending count, keeping candidate
/// order among equal counts.
pub fn finalize(
    category_ids: Vec<CategoryId>,
    counts: Vec<usize>,
    budget: usize,
) -> Vec<CategoryAllocation> {
    let mut rows: Vec<CategoryAllocation> = category_ids
        .into_iter()
        .zip(counts)
        .map(|(category_id, count)| CategoryAllocation::new(category_id, count, budget))
        .collect();

    rows.sort_by(|a, b| b.count.cmp(&a.count));

    debug_assert!(rows.windows(2).all(|w| w[0].count >= w[1].count));

    rows
}
