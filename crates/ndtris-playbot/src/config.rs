//! Persisted playbot tuning.
//!
//! The configuration is a single JSON document with no optional fields: a
//! missing field, an unknown field, a wrong type or an out-of-domain value is a
//! [`ConfigError`] at load time. `config/playbot.json` in the repository holds
//! the same values as [`PlaybotConfig::default`].

use std::{fs, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::policy::{DimensionBucket, PlannerProfile};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("failed to read playbot configuration {}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[display("malformed playbot configuration: {_0}")]
    Parse(serde_json::Error),
    #[display("invalid playbot configuration: {field} {reason}")]
    Invalid { field: String, reason: &'static str },
}

/// One value per dimension bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PerBucket<T> {
    #[serde(rename = "2d")]
    pub d2: T,
    #[serde(rename = "3d")]
    pub d3: T,
    #[serde(rename = "4d")]
    pub d4_plus: T,
}

impl<T> PerBucket<T> {
    #[must_use]
    pub fn get(&self, bucket: DimensionBucket) -> &T {
        match bucket {
            DimensionBucket::D2 => &self.d2,
            DimensionBucket::D3 => &self.d3,
            DimensionBucket::D4Plus => &self.d4_plus,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (DimensionBucket, &T)> + '_ {
        DimensionBucket::ALL
            .into_iter()
            .map(move |bucket| (bucket, self.get(bucket)))
    }
}

/// One value per planner profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PerProfile<T> {
    pub fast: T,
    pub balanced: T,
    pub deep: T,
    pub ultra: T,
}

impl<T> PerProfile<T> {
    #[must_use]
    pub fn get(&self, profile: PlannerProfile) -> &T {
        match profile {
            PlannerProfile::Fast => &self.fast,
            PlannerProfile::Balanced => &self.balanced,
            PlannerProfile::Deep => &self.deep,
            PlannerProfile::Ultra => &self.ultra,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlannerProfile, &T)> + '_ {
        PlannerProfile::ALL
            .into_iter()
            .map(move |profile| (profile, self.get(profile)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BudgetConfig {
    pub base_ms: PerBucket<PerProfile<f64>>,
    /// Cell count at which the base budget applies unscaled.
    pub reference_cells: PerBucket<f64>,
    pub scale_exponent: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub floor_divisor: f64,
    pub floor_min_ms: f64,
    pub ceil_multiplier: f64,
    pub ceil_min_ms: f64,
}

/// Inputs of the automatic heuristic / greedy-layer switch on 3+ axis boards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlgorithmConfig {
    pub bias: PerBucket<f64>,
    pub density_weight: f64,
    pub lines_weight: f64,
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LookaheadConfig {
    /// Plies considered; values above 1 enable one follow-up ply.
    pub depth: PerProfile<usize>,
    pub top_k: PerBucket<PerProfile<usize>>,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchBounds {
    pub max_depth: usize,
    pub max_states: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    pub orientation_bounds: PerBucket<SearchBounds>,
    /// Candidates per plan on a board of `budget.reference_cells`.
    pub candidate_cap: PerBucket<usize>,
    pub orientation_cache_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeuristicWeights {
    pub cleared: f64,
    pub aggregate_height: f64,
    pub holes: f64,
    pub roughness: f64,
    pub max_height: f64,
    pub loss_penalty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerConfig {
    /// Share of the gravity interval one bot action takes at speed level 1.
    pub tick_fraction: f64,
    pub min_tick_ms: u64,
    pub max_speed_level: u32,
    pub default_speed_level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BenchmarkConfig {
    /// p95 latency may exceed the budget by this factor before a dimension fails.
    pub safety_multiplier: f64,
    /// Plans timed per benchmark board.
    pub runs: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlaybotConfig {
    pub budget: BudgetConfig,
    pub algorithm: AlgorithmConfig,
    pub lookahead: LookaheadConfig,
    pub search: SearchConfig,
    pub heuristic: HeuristicWeights,
    pub controller: ControllerConfig,
    pub benchmark: BenchmarkConfig,
}

impl Default for PlaybotConfig {
    #[expect(clippy::too_many_lines)]
    fn default() -> Self {
        Self {
            budget: BudgetConfig {
                base_ms: PerBucket {
                    d2: PerProfile {
                        fast: 4.0,
                        balanced: 8.0,
                        deep: 16.0,
                        ultra: 32.0,
                    },
                    d3: PerProfile {
                        fast: 8.0,
                        balanced: 16.0,
                        deep: 32.0,
                        ultra: 64.0,
                    },
                    d4_plus: PerProfile {
                        fast: 12.0,
                        balanced: 24.0,
                        deep: 48.0,
                        ultra: 96.0,
                    },
                },
                reference_cells: PerBucket {
                    d2: 200.0,
                    d3: 300.0,
                    d4_plus: 640.0,
                },
                scale_exponent: 0.5,
                min_scale: 0.5,
                max_scale: 2.0,
                floor_divisor: 4.0,
                floor_min_ms: 2.0,
                ceil_multiplier: 2.0,
                ceil_min_ms: 50.0,
            },
            algorithm: AlgorithmConfig {
                bias: PerBucket {
                    d2: -1.0,
                    d3: -0.6,
                    d4_plus: 0.25,
                },
                density_weight: 1.0,
                lines_weight: 0.002,
                threshold: 0.0,
            },
            lookahead: LookaheadConfig {
                depth: PerProfile {
                    fast: 1,
                    balanced: 1,
                    deep: 2,
                    ultra: 2,
                },
                top_k: PerBucket {
                    d2: PerProfile {
                        fast: 1,
                        balanced: 4,
                        deep: 8,
                        ultra: 12,
                    },
                    d3: PerProfile {
                        fast: 1,
                        balanced: 3,
                        deep: 6,
                        ultra: 8,
                    },
                    d4_plus: PerProfile {
                        fast: 1,
                        balanced: 2,
                        deep: 3,
                        ultra: 4,
                    },
                },
                weight: 0.5,
            },
            search: SearchConfig {
                orientation_bounds: PerBucket {
                    d2: SearchBounds {
                        max_depth: 4,
                        max_states: 8,
                    },
                    d3: SearchBounds {
                        max_depth: 6,
                        max_states: 24,
                    },
                    d4_plus: SearchBounds {
                        max_depth: 8,
                        max_states: 192,
                    },
                },
                candidate_cap: PerBucket {
                    d2: 512,
                    d3: 2048,
                    d4_plus: 4096,
                },
                orientation_cache_capacity: 256,
            },
            heuristic: HeuristicWeights {
                cleared: 0.76,
                aggregate_height: 0.51,
                holes: 0.36,
                roughness: 0.18,
                max_height: 0.1,
                loss_penalty: 1.0e6,
            },
            controller: ControllerConfig {
                tick_fraction: 0.1,
                min_tick_ms: 10,
                max_speed_level: 10,
                default_speed_level: 5,
            },
            benchmark: BenchmarkConfig {
                safety_multiplier: 3.0,
                runs: 40,
            },
        }
    }
}

impl PlaybotConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Checks every value is finite and in its domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let budget = &self.budget;
        for (bucket, base) in budget.base_ms.iter() {
            for (profile, &ms) in base.iter() {
                positive(ms, || format!("budget.base_ms.{bucket}.{profile}"))?;
            }
        }
        for (bucket, &cells) in budget.reference_cells.iter() {
            positive(cells, || format!("budget.reference_cells.{bucket}"))?;
        }
        finite(budget.scale_exponent, || "budget.scale_exponent".into())?;
        positive(budget.min_scale, || "budget.min_scale".into())?;
        positive(budget.max_scale, || "budget.max_scale".into())?;
        ensure(
            budget.min_scale <= budget.max_scale,
            "budget.min_scale",
            "must not exceed budget.max_scale",
        )?;
        positive(budget.floor_divisor, || "budget.floor_divisor".into())?;
        non_negative(budget.floor_min_ms, || "budget.floor_min_ms".into())?;
        positive(budget.ceil_multiplier, || "budget.ceil_multiplier".into())?;
        non_negative(budget.ceil_min_ms, || "budget.ceil_min_ms".into())?;

        let algorithm = &self.algorithm;
        for (bucket, &bias) in algorithm.bias.iter() {
            finite(bias, || format!("algorithm.bias.{bucket}"))?;
        }
        finite(algorithm.density_weight, || "algorithm.density_weight".into())?;
        finite(algorithm.lines_weight, || "algorithm.lines_weight".into())?;
        finite(algorithm.threshold, || "algorithm.threshold".into())?;

        let lookahead = &self.lookahead;
        for (profile, &depth) in lookahead.depth.iter() {
            at_least_one(depth, || format!("lookahead.depth.{profile}"))?;
        }
        for (bucket, top_k) in lookahead.top_k.iter() {
            for (profile, &k) in top_k.iter() {
                at_least_one(k, || format!("lookahead.top_k.{bucket}.{profile}"))?;
            }
        }
        non_negative(lookahead.weight, || "lookahead.weight".into())?;

        let search = &self.search;
        for (bucket, bounds) in search.orientation_bounds.iter() {
            at_least_one(bounds.max_states, || {
                format!("search.orientation_bounds.{bucket}.max_states")
            })?;
        }
        for (bucket, &cap) in search.candidate_cap.iter() {
            at_least_one(cap, || format!("search.candidate_cap.{bucket}"))?;
        }
        at_least_one(search.orientation_cache_capacity, || {
            "search.orientation_cache_capacity".into()
        })?;

        let heuristic = &self.heuristic;
        finite(heuristic.cleared, || "heuristic.cleared".into())?;
        finite(heuristic.aggregate_height, || "heuristic.aggregate_height".into())?;
        finite(heuristic.holes, || "heuristic.holes".into())?;
        finite(heuristic.roughness, || "heuristic.roughness".into())?;
        finite(heuristic.max_height, || "heuristic.max_height".into())?;
        non_negative(heuristic.loss_penalty, || "heuristic.loss_penalty".into())?;

        let controller = &self.controller;
        positive(controller.tick_fraction, || "controller.tick_fraction".into())?;
        ensure(
            controller.min_tick_ms > 0,
            "controller.min_tick_ms",
            "must be at least 1",
        )?;
        ensure(
            controller.max_speed_level > 0,
            "controller.max_speed_level",
            "must be at least 1",
        )?;
        ensure(
            (1..=controller.max_speed_level).contains(&controller.default_speed_level),
            "controller.default_speed_level",
            "must be between 1 and controller.max_speed_level",
        )?;

        positive(self.benchmark.safety_multiplier, || {
            "benchmark.safety_multiplier".into()
        })?;
        at_least_one(self.benchmark.runs, || "benchmark.runs".into())?;
        Ok(())
    }
}

fn ensure(ok: bool, field: &str, reason: &'static str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field: field.to_owned(),
            reason,
        })
    }
}

fn check<F>(ok: bool, field: F, reason: &'static str) -> Result<(), ConfigError>
where
    F: FnOnce() -> String,
{
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field: field(),
            reason,
        })
    }
}

fn finite<F>(value: f64, field: F) -> Result<(), ConfigError>
where
    F: FnOnce() -> String,
{
    check(value.is_finite(), field, "must be finite")
}

fn positive<F>(value: f64, field: F) -> Result<(), ConfigError>
where
    F: FnOnce() -> String,
{
    check(value.is_finite() && value > 0.0, field, "must be finite and positive")
}

fn non_negative<F>(value: f64, field: F) -> Result<(), ConfigError>
where
    F: FnOnce() -> String,
{
    check(
        value.is_finite() && value >= 0.0,
        field,
        "must be finite and non-negative",
    )
}

fn at_least_one<F>(value: usize, field: F) -> Result<(), ConfigError>
where
    F: FnOnce() -> String,
{
    check(value >= 1, field, "must be at least 1")
}
