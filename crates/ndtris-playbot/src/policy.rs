//! Planner policy: budgets, lookahead and strategy selection.
//!
//! Every knob comes from [`PlaybotConfig`]; this module only combines them with
//! the board size and the runtime selection (profile, algorithm, override).
//!
//! # Budget
//!
//! ```text
//! scale  = clamp((cells / reference_cells) ^ scale_exponent, min_scale, max_scale)
//! budget = base_ms[bucket][profile] × scale
//! floor  = max(fast_budget / floor_divisor, floor_min_ms)
//! ceil   = max(ultra_budget × ceil_multiplier, ceil_min_ms)
//! ```
//!
//! The budget (or a caller override) is clamped to `[floor, ceil]`. A negative
//! or NaN override falls to the floor.

use serde::{Deserialize, Serialize};

use crate::config::{PlaybotConfig, SearchBounds};

/// Board dimensionality class that selects per-dimension tuning.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum DimensionBucket {
    #[serde(rename = "2d")]
    #[display("2d")]
    D2,
    #[serde(rename = "3d")]
    #[display("3d")]
    D3,
    /// Four or more axes.
    #[serde(rename = "4d")]
    #[display("4d")]
    D4Plus,
}

impl DimensionBucket {
    pub const ALL: [Self; 3] = [Self::D2, Self::D3, Self::D4Plus];

    #[must_use]
    pub fn from_dimension(dimension: usize) -> Self {
        match dimension {
            0..=2 => Self::D2,
            3 => Self::D3,
            _ => Self::D4Plus,
        }
    }
}

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum PlannerProfile {
    #[display("fast")]
    Fast,
    #[default]
    #[display("balanced")]
    Balanced,
    #[display("deep")]
    Deep,
    #[display("ultra")]
    Ultra,
}

impl PlannerProfile {
    pub const ALL: [Self; 4] = [Self::Fast, Self::Balanced, Self::Deep, Self::Ultra];

    /// Profile at `index`, clamped into the valid range.
    #[must_use]
    pub fn from_index_clamped(index: i64) -> Self {
        Self::ALL[clamp_index(index, Self::ALL.len())]
    }
}

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum PlannerAlgorithm {
    /// Heuristic on 2D boards; chosen per plan from board state otherwise.
    #[default]
    #[display("auto")]
    Auto,
    #[display("heuristic")]
    Heuristic,
    #[display("greedy_layer")]
    GreedyLayer,
}

impl PlannerAlgorithm {
    pub const ALL: [Self; 3] = [Self::Auto, Self::Heuristic, Self::GreedyLayer];

    #[must_use]
    pub fn from_index_clamped(index: i64) -> Self {
        Self::ALL[clamp_index(index, Self::ALL.len())]
    }
}

fn clamp_index(index: i64, len: usize) -> usize {
    usize::try_from(index.max(0)).map_or(len - 1, |i| i.min(len - 1))
}

/// Evaluation strategy actually used for one plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[display("heuristic")]
    Heuristic,
    #[display("greedy_layer")]
    GreedyLayer,
}

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum BotMode {
    /// Inert.
    #[default]
    #[display("off")]
    Off,
    /// Shows the planned placement without acting.
    #[display("assist")]
    Assist,
    /// Acts on its own timer.
    #[display("auto")]
    Auto,
    /// Acts once per explicit step request.
    #[display("step")]
    Step,
}

/// Runtime inputs of one policy resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyInputs {
    pub dimension: usize,
    pub cell_count: usize,
    /// Locked cells divided by cell count.
    pub occupancy_density: f64,
    /// Layers cleared so far in the session.
    pub lines_cleared: usize,
    pub profile: PlannerProfile,
    pub algorithm: PlannerAlgorithm,
    pub budget_override_ms: Option<f64>,
}

/// Everything the planner needs to know for one plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPolicy {
    pub bucket: DimensionBucket,
    pub strategy: Strategy,
    pub budget_ms: f64,
    pub lookahead_depth: usize,
    pub top_k: usize,
    pub lookahead_weight: f64,
    pub search_bounds: SearchBounds,
    pub candidate_cap: usize,
}

#[derive(Debug, Clone)]
pub struct PlannerPolicy {
    config: PlaybotConfig,
}

impl PlannerPolicy {
    #[must_use]
    pub fn new(config: PlaybotConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &PlaybotConfig {
        &self.config
    }

    #[must_use]
    pub fn resolve(&self, inputs: &PolicyInputs) -> ResolvedPolicy {
        let bucket = DimensionBucket::from_dimension(inputs.dimension);
        let config = &self.config;
        ResolvedPolicy {
            bucket,
            strategy: self.select_strategy(bucket, inputs),
            budget_ms: self.budget_ms(
                bucket,
                inputs.cell_count,
                inputs.profile,
                inputs.budget_override_ms,
            ),
            lookahead_depth: *config.lookahead.depth.get(inputs.profile),
            top_k: *config.lookahead.top_k.get(bucket).get(inputs.profile),
            lookahead_weight: config.lookahead.weight,
            search_bounds: *config.search.orientation_bounds.get(bucket),
            candidate_cap: self.candidate_cap(bucket, inputs.cell_count),
        }
    }

    fn select_strategy(&self, bucket: DimensionBucket, inputs: &PolicyInputs) -> Strategy {
        match inputs.algorithm {
            PlannerAlgorithm::Heuristic => Strategy::Heuristic,
            PlannerAlgorithm::GreedyLayer => Strategy::GreedyLayer,
            PlannerAlgorithm::Auto if inputs.dimension < 3 => Strategy::Heuristic,
            PlannerAlgorithm::Auto => {
                let auto = &self.config.algorithm;
                #[expect(clippy::cast_precision_loss)]
                let signal = auto.bias.get(bucket)
                    + auto.density_weight * inputs.occupancy_density
                    + auto.lines_weight * inputs.lines_cleared as f64;
                if signal >= auto.threshold {
                    Strategy::GreedyLayer
                } else {
                    Strategy::Heuristic
                }
            }
        }
    }

    /// Scale factor applied to the per-bucket base budgets.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn budget_scale(&self, bucket: DimensionBucket, cell_count: usize) -> f64 {
        let budget = &self.config.budget;
        let ratio = cell_count as f64 / budget.reference_cells.get(bucket);
        ratio
            .powf(budget.scale_exponent)
            .clamp(budget.min_scale, budget.max_scale)
    }

    /// Candidates scored per plan: the configured cap at the reference board
    /// size, scaled like the budget.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    #[must_use]
    pub fn candidate_cap(&self, bucket: DimensionBucket, cell_count: usize) -> usize {
        let cap = *self.config.search.candidate_cap.get(bucket) as f64;
        ((cap * self.budget_scale(bucket, cell_count)).round() as usize).max(1)
    }

    /// Lower and upper budget bounds for a board.
    #[must_use]
    pub fn budget_bounds(&self, bucket: DimensionBucket, cell_count: usize) -> (f64, f64) {
        let budget = &self.config.budget;
        let scale = self.budget_scale(bucket, cell_count);
        let base = budget.base_ms.get(bucket);
        let floor = (base.fast * scale / budget.floor_divisor).max(budget.floor_min_ms);
        let ceil = (base.ultra * scale * budget.ceil_multiplier)
            .max(budget.ceil_min_ms)
            .max(floor);
        (floor, ceil)
    }

    /// Planning budget in milliseconds.
    #[must_use]
    pub fn budget_ms(
        &self,
        bucket: DimensionBucket,
        cell_count: usize,
        profile: PlannerProfile,
        override_ms: Option<f64>,
    ) -> f64 {
        let (floor, ceil) = self.budget_bounds(bucket, cell_count);
        let requested = override_ms.unwrap_or_else(|| {
            self.config.budget.base_ms.get(bucket).get(profile)
                * self.budget_scale(bucket, cell_count)
        });
        if requested.is_nan() || requested < 0.0 {
            return floor;
        }
        requested.clamp(floor, ceil)
    }
}
