use serde::{Deserialize, Serialize};

use crate::types::identifiers::CategoryId;

/// One row of an allocation slate: how many display slots a category gets.
///
/// A slate always sums to its budget exactly. It is produced fresh by every
/// allocation call and replaces, never merges with, the previous slate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAllocation {
    pub category_id: CategoryId,
    /// Number of items (`N`) drawn from this category.
    pub count: usize,
    /// `count / budget * 100`, rounded to two decimals.
    pub percentage: f64,
}

impl CategoryAllocation {
    pub fn new(category_id: CategoryId, count: usize, budget: usize) -> Self {
        Self {
            category_id,
            count,
            percentage: percentage_of(count, budget),
        }
    }
}

/// `round(count / budget * 100, 2)`; zero for an empty budget.
pub fn percentage_of(count: usize, budget: usize) -> f64 {
    if budget == 0 {
        return 0.0;
    }
    let pct = count as f64 / budget as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Sum of `count` over a slate.
pub fn total_count(rows: &[CategoryAllocation]) -> usize {
    rows.iter().map(|row| row.count).sum()
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AllocationError {
    #[error("Invalid weight state: total interaction weight {total_weight} is not positive")]
    InvalidWeightState { total_weight: f64 },

    #[error("Invalid budget: {0}")]
    InvalidBudget(usize),

    #[error("Invalid average rank {avg_rank} for category {category}")]
    InvalidRank { category: CategoryId, avg_rank: f64 },
}
