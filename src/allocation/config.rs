use serde::{Deserialize, Serialize};

/// Default number of display slots in a slate.
pub const DEFAULT_BUDGET: usize = 10;

/// How raw fractional counts are rounded before rebalancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// 2.5 -> 3, -2.5 -> -3.
    #[default]
    HalfAwayFromZero,
    /// Banker's rounding: 2.5 -> 2, 3.5 -> 4.
    HalfEven,
}

impl RoundingMode {
    pub fn round(&self, value: f64) -> f64 {
        match self {
            RoundingMode::HalfAwayFromZero => value.round(),
            RoundingMode::HalfEven => {
                let rounded = value.round();
                if (value - value.trunc()).abs() == 0.5 {
                    2.0 * (value / 2.0).round()
                } else {
                    rounded
                }
            }
        }
    }
}

// Serializable, comparable, explicit defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub budget: usize,
    #[serde(default)]
    pub rounding: RoundingMode,
}

impl EngineConfig {
    pub fn v0() -> Self {
        Self {
            budget: DEFAULT_BUDGET,
            rounding: RoundingMode::HalfAwayFromZero,
        }
    }

    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::v0()
    }
}
