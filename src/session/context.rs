use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::allocation::{AllocationEngine, InteractionWeights, RankWeighting};
use crate::interaction::{Interaction, InteractionLog, Rating};
use crate::ranking::CategoryAggregate;
use crate::types::allocation::{AllocationError, CategoryAllocation};
use crate::types::identifiers::{CategoryId, UserId, VideoId};

/// Per-session state owned by the caller and threaded through every
/// allocation call. Nothing here is shared between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    pub user_id: UserId,
    baseline: Vec<CategoryAllocation>,
    interactions: InteractionLog,
}

impl SessionContext {
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            baseline: Vec::new(),
            interactions: InteractionLog::new(),
        }
    }

    pub(crate) fn from_parts(
        user_id: UserId,
        baseline: Vec<CategoryAllocation>,
        interactions: InteractionLog,
    ) -> Self {
        Self {
            user_id,
            baseline,
            interactions,
        }
    }

    /// Current slate, which is also the weight baseline for the next warm call.
    pub fn baseline(&self) -> &[CategoryAllocation] {
        &self.baseline
    }

    pub fn interactions(&self) -> &InteractionLog {
        &self.interactions
    }

    /// Install a cold-start slate as the session baseline.
    pub fn start<R, W>(
        &mut self,
        engine: &AllocationEngine<R, W>,
        candidates: &[CategoryAggregate],
    ) -> Result<&[CategoryAllocation], AllocationError>
    where
        R: RankWeighting,
        W: InteractionWeights,
    {
        let slate = engine.cold_start_allocate(candidates)?;
        debug!(user_id = self.user_id.as_str(), rows = slate.len(), "Session started");
        self.baseline = slate;
        Ok(&self.baseline)
    }

    /// Recompute from ranks, discarding accumulated weight but keeping the log.
    pub fn restart<R, W>(
        &mut self,
        engine: &AllocationEngine<R, W>,
        candidates: &[CategoryAggregate],
    ) -> Result<&[CategoryAllocation], AllocationError>
    where
        R: RankWeighting,
        W: InteractionWeights,
    {
        self.start(engine, candidates)
    }

    pub fn record(&mut self, interaction: Interaction) {
        self.interactions.append(interaction);
    }

    pub fn record_feedback(
        &mut self,
        video_id: &VideoId,
        category_id: &CategoryId,
        rating: Rating,
        commented: bool,
    ) {
        self.interactions
            .record_feedback(&self.user_id, video_id, category_id, rating, commented);
    }

    /// Re-run warm allocation over the full log and adopt the result as the new baseline.
    ///
    /// On error the previous baseline stays in place.
    pub fn advance<R, W>(
        &mut self,
        engine: &AllocationEngine<R, W>,
    ) -> Result<&[CategoryAllocation], AllocationError>
    where
        R: RankWeighting,
        W: InteractionWeights,
    {
        match engine.warm_allocate(&self.baseline, self.interactions.entries()) {
            Ok(slate) => {
                self.baseline = slate;
                Ok(&self.baseline)
            }
            Err(err) => {
                warn!(
                    user_id = self.user_id.as_str(),
                    error = %err,
                    "Keeping previous slate"
                );
                Err(err)
            }
        }
    }
}
