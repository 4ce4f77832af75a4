pub mod observation;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::identifiers::{CategoryId, Region};
pub use observation::{Observation, VideoCategoryMap};

/// Categories whose average rank across regions exceeds this are not candidates.
pub const CANDIDATE_RANK_THRESHOLD: f64 = 10.0;

/// Popularity rank of a category inside one region. Rank 1 is the most watched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRank {
    pub region: Region,
    pub category_id: CategoryId,
    pub avg_watchtime: f64,
    pub rank: usize,
}

/// Mean of a category's per-region ranks, over the regions it appears in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAggregate {
    pub category_id: CategoryId,
    pub avg_rank: f64,
}

impl CategoryAggregate {
    pub fn new(category_id: impl Into<CategoryId>, avg_rank: f64) -> Self {
        Self {
            category_id: category_id.into(),
            avg_rank,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RankSummary {
    /// Per-region ranks of surviving candidates, ordered by (region, rank).
    pub ranks: Vec<CategoryRank>,
    /// Candidate categories ordered by category id.
    pub candidates: Vec<CategoryAggregate>,
}

impl RankSummary {
    fn empty() -> Self {
        Self {
            ranks: Vec::new(),
            candidates: Vec::new(),
        }
    }

    pub fn into_parts(self) -> (Vec<CategoryRank>, Vec<CategoryAggregate>) {
        (self.ranks, self.candidates)
    }
}

// Running mean of one (region, category) group.
struct WatchGroup {
    region: Region,
    category_id: CategoryId,
    total: f64,
    count: usize,
}

impl WatchGroup {
    fn mean(&self) -> f64 {
        self.total / self.count as f64
    }
}

/// Turns raw watch logs into per-region category ranks and the candidate set.
///
/// Stateless; identical input always yields identical ranks.
#[derive(Debug, Default, Clone, Copy)]
pub struct RankAggregator;

impl RankAggregator {
    pub fn compute_ranks(
        &self,
        observations: &[Observation],
        video_categories: &VideoCategoryMap,
    ) -> RankSummary {
        if observations.is_empty() || video_categories.is_empty() {
            debug!(
                observations = observations.len(),
                videos = video_categories.len(),
                "Nothing to rank"
            );
            return RankSummary::empty();
        }

        // 1. Join and group by (region, category)
        let mut groups: BTreeMap<(Region, CategoryId), WatchGroup> = BTreeMap::new();
        for obs in observations {
            let Some(category_id) = video_categories.get(&obs.video_id) else {
                continue;
            };
            let group = groups
                .entry((obs.region.clone(), category_id.clone()))
                .or_insert_with(|| WatchGroup {
                    region: obs.region.clone(),
                    category_id: category_id.clone(),
                    total: 0.0,
                    count: 0,
                });
            group.total += obs.watchtime;
            group.count += 1;
        }

        if groups.is_empty() {
            debug!(observations = observations.len(), "No observation matched a category");
            return RankSummary::empty();
        }

        // 2. Rank inside each region by descending mean watch time.
        // Members arrive in category id order; the stable sort keeps it among equal means.
        let mut by_region: BTreeMap<&Region, Vec<&WatchGroup>> = BTreeMap::new();
        for group in groups.values() {
            by_region.entry(&group.region).or_default().push(group);
        }

        let mut ranks = Vec::with_capacity(groups.len());
        for members in by_region.values_mut() {
            members.sort_by(|a, b| b.mean().total_cmp(&a.mean()));
            for (position, group) in members.iter().enumerate() {
                ranks.push(CategoryRank {
                    region: group.region.clone(),
                    category_id: group.category_id.clone(),
                    avg_watchtime: group.mean(),
                    rank: position + 1,
                });
            }
        }

        // 3. Average the ranks per category over the regions it appears in
        let mut rank_sums: BTreeMap<&CategoryId, (usize, usize)> = BTreeMap::new();
        for row in &ranks {
            let entry = rank_sums.entry(&row.category_id).or_insert((0, 0));
            entry.0 += row.rank;
            entry.1 += 1;
        }

        let candidates: Vec<CategoryAggregate> = rank_sums
            .into_iter()
            .map(|(category_id, (sum, regions))| CategoryAggregate {
                category_id: category_id.clone(),
                avg_rank: sum as f64 / regions as f64,
            })
            .filter(|agg| agg.avg_rank <= CANDIDATE_RANK_THRESHOLD)
            .collect();

        ranks.retain(|row| {
            candidates
                .iter()
                .any(|agg| agg.category_id == row.category_id)
        });

        debug!(
            groups = groups.len(),
            regions = by_region.len(),
            candidates = candidates.len(),
            "Category ranks computed"
        );

        RankSummary { ranks, candidates }
    }
}
