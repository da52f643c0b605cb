//! Deadline-bounded placement search.
//!
//! # How It Works
//!
//! 1. Resolve the policy (budget, strategy, lookahead, bounds) for the board
//! 2. Fetch the orientations of the piece from the cache
//! 3. Score every settled candidate, checking the deadline between candidates
//! 4. Pick the best score; ties go to the placement clearing more layers
//! 5. With lookahead enabled and time left, re-rank the top candidates by
//!    `immediate + weight × best_followup`, where the follow-up is the best
//!    placement of the next piece on the resulting board
//!
//! The deadline is never checked before the first candidate, so a board with
//! any legal placement always yields a plan. When the deadline expires during
//! lookahead the partial re-ranking is dropped and the immediate best is kept.

use std::{
    cmp::Ordering,
    time::{Duration, Instant},
};

use ndtris_engine::{Board, Orientation};

use crate::{
    candidate::{ColumnIndex, Placement, settled_placements},
    config::PlaybotConfig,
    evaluator::{PlacementEvaluator, Score, evaluator_for},
    orientation::OrientationCache,
    placement_analysis::PlacementAnalysis,
    policy::{
        PlannerAlgorithm, PlannerPolicy, PlannerProfile, PolicyInputs, ResolvedPolicy, Strategy,
    },
};

/// Whether the wall-clock budget bounds a plan.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PlanTiming {
    #[default]
    Deadline,
    /// Ignores the clock; only candidate caps bound the search. Plans are
    /// then reproducible.
    Unbounded,
}

/// Input of one planning call.
#[derive(Debug, Clone, Copy)]
pub struct PlanRequest<'a> {
    pub board: &'a Board,
    /// Orientation of the falling piece; candidates rotate about its pivot.
    pub orientation: &'a Orientation,
    /// Orientation the next piece spawns in, if known.
    pub next_orientation: Option<&'a Orientation>,
    pub lines_cleared: usize,
    pub profile: PlannerProfile,
    pub algorithm: PlannerAlgorithm,
    pub budget_override_ms: Option<f64>,
    pub timing: PlanTiming,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanStats {
    /// Candidates scored for the current piece.
    pub candidates: usize,
    pub expected_clears: usize,
    pub score: Score,
    pub elapsed: Duration,
    pub strategy: Strategy,
    pub budget_ms: f64,
    pub deadline_hit: bool,
    pub lookahead_applied: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanResult {
    pub placement: Placement,
    pub stats: PlanStats,
}

#[derive(Debug)]
struct Ranked {
    score: Score,
    cleared: usize,
    placement: Placement,
}

fn compare_ranked(a: &Ranked, b: &Ranked) -> Ordering {
    a.score
        .total_cmp(&b.score)
        .then_with(|| a.cleared.cmp(&b.cleared))
}

#[derive(Debug, Clone, Copy)]
struct Deadline(Option<Instant>);

impl Deadline {
    fn new(start: Instant, budget_ms: f64, timing: PlanTiming) -> Self {
        match timing {
            PlanTiming::Deadline => {
                Self(Some(start + Duration::from_secs_f64(budget_ms.max(0.0) / 1000.0)))
            }
            PlanTiming::Unbounded => Self(None),
        }
    }

    fn expired(self) -> bool {
        self.0.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Chooses target placements; owns the policy and the orientation cache.
#[derive(Debug)]
pub struct Planner {
    policy: PlannerPolicy,
    cache: OrientationCache,
}

impl Planner {
    #[must_use]
    pub fn new(config: PlaybotConfig) -> Self {
        let cache = OrientationCache::new(config.search.orientation_cache_capacity);
        Self {
            policy: PlannerPolicy::new(config),
            cache,
        }
    }

    #[must_use]
    pub fn policy(&self) -> &PlannerPolicy {
        &self.policy
    }

    #[must_use]
    pub fn orientation_cache(&self) -> &OrientationCache {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Resolves the policy a request would plan under.
    #[must_use]
    pub fn resolve_policy(&self, req: &PlanRequest<'_>) -> ResolvedPolicy {
        let geometry = req.board.geometry();
        let cell_count = geometry.cell_count();
        #[expect(clippy::cast_precision_loss)]
        let occupancy_density = req.board.occupied_count() as f64 / cell_count.max(1) as f64;
        self.policy.resolve(&PolicyInputs {
            dimension: geometry.dimension(),
            cell_count,
            occupancy_density,
            lines_cleared: req.lines_cleared,
            profile: req.profile,
            algorithm: req.algorithm,
            budget_override_ms: req.budget_override_ms,
        })
    }

    /// Plans the falling piece; `None` only when it has no legal placement.
    pub fn plan(&mut self, req: &PlanRequest<'_>) -> Option<PlanResult> {
        let start = Instant::now();
        let policy = self.resolve_policy(req);
        let deadline = Deadline::new(start, policy.budget_ms, req.timing);
        let evaluator = evaluator_for(policy.strategy, &self.policy.config().heuristic);
        let geometry = req.board.geometry();
        let orientations = self.cache.get_or_compute(
            req.orientation,
            geometry.dimension(),
            geometry.gravity_axis(),
            policy.search_bounds,
        );

        let index = ColumnIndex::new(req.board);
        let mut ranked = vec![];
        let mut deadline_hit = false;
        for placement in settled_placements(req.board, &index, &orientations, policy.candidate_cap)
        {
            if !ranked.is_empty() && deadline.expired() {
                deadline_hit = true;
                break;
            }
            let analysis = PlacementAnalysis::from_board(req.board, placement);
            ranked.push(Ranked {
                score: evaluator.evaluate_placement(&analysis),
                cleared: analysis.cleared_layers(),
                placement: analysis.into_placement(),
            });
        }
        let candidates = ranked.len();
        // stable sort keeps enumeration order among equal candidates
        ranked.sort_by(|a, b| compare_ranked(b, a));

        let mut lookahead_applied = false;
        if let Some(next) = req.next_orientation
            && policy.lookahead_depth > 1
            && !deadline.expired()
        {
            match self.lookahead(req.board, next, &ranked, &policy, &*evaluator, deadline) {
                Some(reranked) => {
                    ranked = reranked;
                    lookahead_applied = true;
                }
                None => deadline_hit = true,
            }
        }

        let best = ranked.into_iter().next()?;
        let stats = PlanStats {
            candidates,
            expected_clears: best.cleared,
            score: best.score,
            elapsed: start.elapsed(),
            strategy: policy.strategy,
            budget_ms: policy.budget_ms,
            deadline_hit,
            lookahead_applied,
        };
        log::debug!(
            "planned {} with {}: {} candidates, {} clears, score {}, {:?}{}",
            req.orientation,
            stats.strategy,
            stats.candidates,
            stats.expected_clears,
            stats.score,
            stats.elapsed,
            if deadline_hit { " (deadline)" } else { "" },
        );
        Some(PlanResult {
            placement: best.placement,
            stats,
        })
    }

    /// Re-ranks the top candidates with one extra ply; `None` when the
    /// deadline expired before every follow-up was scored.
    fn lookahead(
        &mut self,
        board: &Board,
        next: &Orientation,
        ranked: &[Ranked],
        policy: &ResolvedPolicy,
        evaluator: &dyn PlacementEvaluator,
        deadline: Deadline,
    ) -> Option<Vec<Ranked>> {
        let geometry = board.geometry();
        let next_orientations = self.cache.get_or_compute(
            next,
            geometry.dimension(),
            geometry.gravity_axis(),
            policy.search_bounds,
        );

        let mut reranked = vec![];
        for candidate in ranked.iter().take(policy.top_k.max(1)) {
            let after = PlacementAnalysis::from_board(board, candidate.placement.clone());
            let after_board = after.board_analysis().board();
            let index = ColumnIndex::new(after_board);
            let mut best_followup: Option<Score> = None;
            let followups = settled_placements(
                after_board,
                &index,
                &next_orientations,
                policy.candidate_cap,
            );
            for placement in followups {
                if deadline.expired() {
                    log::debug!("deadline hit during lookahead, keeping immediate best");
                    return None;
                }
                let score = evaluator.evaluate_placement(&PlacementAnalysis::from_board(
                    after_board,
                    placement,
                ));
                if best_followup.is_none_or(|best| score.total_cmp(&best).is_gt()) {
                    best_followup = Some(score);
                }
            }
            let followup = best_followup.unwrap_or_else(|| evaluator.loss_score());
            reranked.push(Ranked {
                score: candidate.score.combine(followup, policy.lookahead_weight),
                cleared: candidate.cleared,
                placement: candidate.placement.clone(),
            });
        }
        reranked.sort_by(|a, b| compare_ranked(b, a));
        Some(reranked)
    }
}
