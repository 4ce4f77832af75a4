use crate::interaction::InteractionType;
use crate::ranking::CategoryAggregate;
use crate::types::allocation::CategoryAllocation;
use crate::types::identifiers::CategoryId;

/// Maps a category's average rank to its cold-start weight.
pub trait RankWeighting {
    fn weight(&self, avg_rank: f64) -> f64;
}

/// `1 / avg_rank`: lower rank number, more slots.
#[derive(Debug, Default, Clone, Copy)]
pub struct InverseRankWeighting;

impl RankWeighting for InverseRankWeighting {
    fn weight(&self, avg_rank: f64) -> f64 {
        1.0 / avg_rank
    }
}

/// Weight delta applied to a category each time an interaction on it is replayed.
pub trait InteractionWeights {
    fn delta(&self, interaction_type: InteractionType) -> f64;
}

/// like +1, dislike -1, comment +2, no rating -0.5
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardInteractionWeights;

impl InteractionWeights for StandardInteractionWeights {
    fn delta(&self, interaction_type: InteractionType) -> f64 {
        match interaction_type {
            InteractionType::Like => 1.0,
            InteractionType::Dislike => -1.0,
            InteractionType::Comment => 2.0,
            InteractionType::NoLikeEitherDislike => -0.5,
        }
    }
}

/// A row usable as the starting point of a warm allocation.
pub trait BaselineWeight {
    fn category_id(&self) -> &CategoryId;

    /// Previously allocated count, if the row carries one.
    fn baseline_count(&self) -> Option<usize>;

    fn initial_weight(&self) -> f64 {
        self.baseline_count().map_or(0.0, |n| n as f64)
    }
}

impl BaselineWeight for CategoryAllocation {
    fn category_id(&self) -> &CategoryId {
        &self.category_id
    }

    fn baseline_count(&self) -> Option<usize> {
        Some(self.count)
    }
}

// Rank-only rows have no prior count and start at weight 0.
impl BaselineWeight for CategoryAggregate {
    fn category_id(&self) -> &CategoryId {
        &self.category_id
    }

    fn baseline_count(&self) -> Option<usize> {
        None
    }
}
