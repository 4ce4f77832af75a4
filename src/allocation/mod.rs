pub mod config;
pub mod rebalancing;
pub mod weighting;

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::interaction::Interaction;
use crate::ranking::CategoryAggregate;
use crate::types::allocation::{AllocationError, CategoryAllocation};
use crate::types::identifiers::CategoryId;
pub use config::{EngineConfig, RoundingMode, DEFAULT_BUDGET};
pub use rebalancing::{finalize, rebalance, round_shares, RebalanceResult};
pub use weighting::{
    BaselineWeight, InteractionWeights, InverseRankWeighting, RankWeighting,
    StandardInteractionWeights,
};

/// Turns candidate categories and a session's interactions into an integer
/// slate that sums exactly to the budget.
///
/// The engine holds configuration only. Session state is passed in on every
/// call and never retained.
pub struct AllocationEngine<R = InverseRankWeighting, W = StandardInteractionWeights> {
	config: EngineConfig,
	rank_weighting: R,
	interaction_weights: W,
}

impl Default for AllocationEngine<InverseRankWeighting, StandardInteractionWeights> {
	fn default() -> Self {
		Self::with_config(EngineConfig::v0())
	}
}

impl AllocationEngine<InverseRankWeighting, StandardInteractionWeights> {
	pub fn with_config(config: EngineConfig) -> Self {
		Self {
			config,
			rank_weighting: InverseRankWeighting,
			interaction_weights: StandardInteractionWeights,
		}
	}
}

impl<R, W> AllocationEngine<R, W>
where
	R: RankWeighting,
	W: InteractionWeights,
{
	pub fn new(config: EngineConfig, rank_weighting: R, interaction_weights: W) -> Self {
		Self {
			config,
			rank_weighting,
			interaction_weights,
		}
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	/// Rank-based slate for a session with no interactions yet.
	pub fn cold_start_allocate(
		&self,
		candidates: &[CategoryAggregate],
	) -> Result<Vec<CategoryAllocation>, AllocationError> {
		self.cold_start_allocate_with_budget(candidates, self.config.budget)
	}

	pub fn cold_start_allocate_with_budget(
		&self,
		candidates: &[CategoryAggregate],
		budget: usize,
	) -> Result<Vec<CategoryAllocation>, AllocationError> {
		if budget == 0 {
			return Err(AllocationError::InvalidBudget(budget));
		}
		if candidates.is_empty() {
			debug!(budget, "Empty candidate set, returning empty slate");
			return Ok(Vec::new());
		}

		// 1. Weighting Phase
		let mut weights = Vec::with_capacity(candidates.len());
		for candidate in candidates {
			if !candidate.avg_rank.is_finite() || candidate.avg_rank <= 0.0 {
				return Err(AllocationError::InvalidRank {
					category: candidate.category_id.clone(),
					avg_rank: candidate.avg_rank,
				});
			}
			weights.push(self.rank_weighting.weight(candidate.avg_rank));
		}

		let total_weight: f64 = weights.iter().sum();
		if !(total_weight > 0.0 && total_weight.is_finite()) {
			warn!(total_weight, "Rank weights do not sum to a positive value");
			return Err(AllocationError::InvalidWeightState { total_weight });
		}

		// 2. Rounding Phase
		let proportions: Vec<f64> = weights.iter().map(|w| w / total_weight).collect();
		let shares: Vec<f64> = proportions.iter().map(|p| p * budget as f64).collect();
		let raw = round_shares(&shares, self.config.rounding);

		// 3. Rebalancing Phase (tie-break on proportion)
		let RebalanceResult { counts, steps } =
			rebalance(raw, budget, |_, idx| proportions[idx]);

		debug!(
			candidates = candidates.len(),
			budget,
			rebalance_steps = steps,
			"Cold-start allocation computed"
		);

		let ids = candidates.iter().map(|c| c.category_id.clone()).collect();
		Ok(finalize(ids, counts, budget))
	}

	/// Interaction-weighted slate. The full interaction log is replayed on top
	/// of the baseline counts on every call.
	pub fn warm_allocate<B>(
		&self,
		baseline: &[B],
		interactions: &[Interaction],
	) -> Result<Vec<CategoryAllocation>, AllocationError>
	where
		B: BaselineWeight,
	{
		self.warm_allocate_with_budget(baseline, interactions, self.config.budget)
	}

	pub fn warm_allocate_with_budget<B>(
		&self,
		baseline: &[B],
		interactions: &[Interaction],
		budget: usize,
	) -> Result<Vec<CategoryAllocation>, AllocationError>
	where
		B: BaselineWeight,
	{
		if budget == 0 {
			return Err(AllocationError::InvalidBudget(budget));
		}
		if baseline.is_empty() {
			debug!(budget, "Empty candidate set, returning empty slate");
			return Ok(Vec::new());
		}

		// 0. Start from the previous counts
		let mut weights: Vec<f64> = baseline.iter().map(|row| row.initial_weight()).collect();
		let mut position: HashMap<&CategoryId, usize> = HashMap::with_capacity(baseline.len());
		for (idx, row) in baseline.iter().enumerate() {
			position.entry(row.category_id()).or_insert(idx);
		}

		// 1. Replay Phase
		let mut ignored = 0usize;
		for interaction in interactions {
			match position.get(&interaction.category_id) {
				Some(&idx) => {
					weights[idx] += self.interaction_weights.delta(interaction.interaction_type);
				}
				None => ignored += 1,
			}
		}
		if ignored > 0 {
			debug!(ignored, "Interactions on non-candidate categories skipped");
		}

		// Individual weights may be negative; only the total is checked.
		let total_weight: f64 = weights.iter().sum();
		if !(total_weight > 0.0) {
			warn!(
				total_weight,
				interactions = interactions.len(),
				"Interaction weights collapsed, no allocation produced"
			);
			return Err(AllocationError::InvalidWeightState { total_weight });
		}

		// 2. Rounding Phase
		let shares: Vec<f64> = weights
			.iter()
			.map(|w| w / total_weight * budget as f64)
			.collect();
		let raw = round_shares(&shares, self.config.rounding);

		// 3. Rebalancing Phase (tie-break on current count)
		let RebalanceResult { counts, steps } =
			rebalance(raw, budget, |counts, idx| counts[idx] as f64);

		debug!(
			candidates = baseline.len(),
			interactions = interactions.len(),
			total_weight,
			budget,
			rebalance_steps = steps,
			"Warm allocation computed"
		);

		let ids = baseline.iter().map(|row| row.category_id().clone()).collect();
		Ok(finalize(ids, counts, budget))
	}
}
