use chrono::{DateTime, Utc};
use ndtris_engine::GameConfig;
use ndtris_playbot::policy::{BotMode, PlannerAlgorithm, PlannerProfile, Strategy};
use serde::{Deserialize, Serialize};

/// A report stamped with the time it was produced.
///
/// The report's own fields stay at the top level of the JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recorded<T> {
    /// Timestamp when the report was written (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
    #[serde(flatten)]
    pub report: T,
}

impl<T> Recorded<T> {
    pub fn now(report: T) -> Self {
        Self {
            recorded_at: Utc::now(),
            report,
        }
    }
}

/// Summary of one headless bot session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoPlaySession {
    pub game: GameConfig,
    pub mode: BotMode,
    pub profile: PlannerProfile,
    pub algorithm: PlannerAlgorithm,
    pub pieces: usize,
    pub cleared_layers: usize,
    pub game_over: bool,
    pub ticks: usize,
    /// Last plan made for every locked piece
    pub plans: Vec<PlanRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRecord {
    /// Index of the piece (0-indexed, in lock order)
    pub piece: usize,
    pub candidates: usize,
    pub expected_clears: usize,
    pub elapsed_ms: f64,
    pub budget_ms: f64,
    pub strategy: Strategy,
    pub deadline_hit: bool,
}
