//! Per-tick execution of plans.
//!
//! The controller plans once per piece and then walks the falling piece to the
//! target with the same atomic inputs a player has. Each acting tick performs
//! exactly one of:
//!
//! 1. piece still above the ceiling: soft drop, or lock when blocked
//! 2. orientation differs from the target: the next queued rotation step
//! 3. lateral position differs from the target: one step toward it
//! 4. otherwise: soft drop, or lock when blocked
//!
//! Any blocked rotation or move falls back to soft drop / lock, so a piece
//! always makes progress toward locking.
//!
//! Plans are memoized by a [`Fingerprint`] of the piece and board; the plan is
//! recomputed only when the fingerprint changes.

use std::{collections::VecDeque, fmt, mem};

use ndtris_engine::{CellId, RotationStep};

use crate::{
    candidate::Placement,
    config::PlaybotConfig,
    host::BotHost,
    planner::{PlanRequest, PlanStats, PlanTiming, Planner},
    policy::{BotMode, DimensionBucket, PlannerAlgorithm, PlannerProfile},
    rotation_path::RotationPathFinder,
};

/// Cheap key identifying the current piece on the current board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    pub shape_id: CellId,
    pub locked_cells: usize,
    pub pieces_drawn: usize,
}

impl Fingerprint {
    #[must_use]
    pub fn of<H>(host: &H) -> Self
    where
        H: BotHost + ?Sized,
    {
        Self {
            shape_id: host.falling_piece().shape_id(),
            locked_cells: host.board().occupied_count(),
            pieces_drawn: host.pieces_drawn(),
        }
    }
}

/// One atomic input issued by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum BotAction {
    #[display("rotate {_0}")]
    Rotate(RotationStep),
    #[display("move axis {axis} by {delta}")]
    Move { axis: usize, delta: i32 },
    #[display("soft drop")]
    SoftDrop,
    #[display("lock")]
    Lock,
}

/// Per-piece progress of the controller.
#[derive(Debug, Clone, Default)]
pub struct ControllerState {
    token: Option<Fingerprint>,
    target: Option<Placement>,
    rotation_queue: VecDeque<RotationStep>,
    rotation_path_computed: bool,
    accumulator_ms: u64,
}

impl ControllerState {
    #[must_use]
    pub fn token(&self) -> Option<Fingerprint> {
        self.token
    }

    #[must_use]
    pub fn target(&self) -> Option<&Placement> {
        self.target.as_ref()
    }

    #[must_use]
    pub fn rotation_queue(&self) -> &VecDeque<RotationStep> {
        &self.rotation_queue
    }

    fn begin_piece(&mut self, token: Fingerprint) {
        self.token = Some(token);
        self.target = None;
        self.rotation_queue.clear();
        self.rotation_path_computed = false;
    }
}

/// Drives a [`BotHost`] toward planned placements.
#[derive(Debug)]
pub struct BotController {
    planner: Planner,
    mode: BotMode,
    speed_level: u32,
    profile: PlannerProfile,
    algorithm: PlannerAlgorithm,
    budget_override_ms: Option<f64>,
    timing: PlanTiming,
    step_requested: bool,
    state: ControllerState,
    last_stats: Option<PlanStats>,
    last_error: Option<String>,
}

impl BotController {
    #[must_use]
    pub fn new(config: PlaybotConfig) -> Self {
        let speed_level = config
            .controller
            .default_speed_level
            .clamp(1, config.controller.max_speed_level.max(1));
        Self {
            planner: Planner::new(config),
            mode: BotMode::Off,
            speed_level,
            profile: PlannerProfile::default(),
            algorithm: PlannerAlgorithm::default(),
            budget_override_ms: None,
            timing: PlanTiming::Deadline,
            step_requested: false,
            state: ControllerState::default(),
            last_stats: None,
            last_error: None,
        }
    }

    fn config(&self) -> &PlaybotConfig {
        self.planner.policy().config()
    }

    #[must_use]
    pub fn mode(&self) -> BotMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: BotMode) {
        if self.mode != mode {
            log::debug!("bot mode {} -> {mode}", self.mode);
        }
        self.mode = mode;
        self.step_requested = false;
    }

    #[must_use]
    pub fn speed_level(&self) -> u32 {
        self.speed_level
    }

    /// Sets the bot speed, clamped to `1..=max_speed_level`.
    pub fn set_speed_level(&mut self, level: i64) {
        let max = self.config().controller.max_speed_level.max(1);
        self.speed_level = u32::try_from(level.max(1)).map_or(max, |level| level.min(max));
    }

    #[must_use]
    pub fn profile(&self) -> PlannerProfile {
        self.profile
    }

    pub fn set_profile(&mut self, profile: PlannerProfile) {
        self.profile = profile;
    }

    pub fn set_profile_index(&mut self, index: i64) {
        self.profile = PlannerProfile::from_index_clamped(index);
    }

    #[must_use]
    pub fn algorithm(&self) -> PlannerAlgorithm {
        self.algorithm
    }

    pub fn set_algorithm(&mut self, algorithm: PlannerAlgorithm) {
        self.algorithm = algorithm;
    }

    pub fn set_algorithm_index(&mut self, index: i64) {
        self.algorithm = PlannerAlgorithm::from_index_clamped(index);
    }

    /// Overrides the planning budget; the policy clamps it to the board's bounds.
    pub fn set_budget_override(&mut self, budget_ms: Option<f64>) {
        self.budget_override_ms = budget_ms;
    }

    pub fn set_timing(&mut self, timing: PlanTiming) {
        self.timing = timing;
    }

    /// Lets the next tick act in [`BotMode::Step`].
    pub fn request_step(&mut self) {
        self.step_requested = true;
    }

    /// Forgets the current piece, the preview and the last error.
    pub fn reset(&mut self) {
        self.state = ControllerState::default();
        self.step_requested = false;
        self.last_error = None;
    }

    #[must_use]
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Placement the current plan aims for.
    #[must_use]
    pub fn preview(&self) -> Option<&Placement> {
        self.state.target.as_ref()
    }

    #[must_use]
    pub fn last_stats(&self) -> Option<&PlanStats> {
        self.last_stats.as_ref()
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    /// Human-readable status for overlays and logs.
    #[must_use]
    pub fn status_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("bot: {}", self.mode),
            format!("speed: {}", self.speed_level),
            format!("profile: {} / {}", self.profile, self.algorithm),
        ];
        match &self.last_stats {
            Some(stats) => {
                lines.push(format!("candidates: {}", stats.candidates));
                lines.push(format!("expected clears: {}", stats.expected_clears));
                lines.push(format!(
                    "plan: {:.2} ms of {:.1} ms ({})",
                    stats.elapsed.as_secs_f64() * 1000.0,
                    stats.budget_ms,
                    stats.strategy
                ));
            }
            None => lines.push("candidates: -".to_owned()),
        }
        lines.push(format!(
            "error: {}",
            self.last_error.as_deref().unwrap_or("none")
        ));
        lines
    }

    /// Milliseconds between two acting ticks in [`BotMode::Auto`].
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    #[must_use]
    pub fn tick_interval_ms<H>(&self, host: &H) -> u64
    where
        H: BotHost + ?Sized,
    {
        let controller = &self.config().controller;
        let interval = host.gravity_interval_ms() as f64 * controller.tick_fraction
            / f64::from(self.speed_level.max(1));
        (interval.round() as u64).max(controller.min_tick_ms)
    }

    /// Advances the controller by `dt_ms`, performing at most one action.
    pub fn tick<H>(&mut self, host: &mut H, dt_ms: u64) -> Option<BotAction>
    where
        H: BotHost + ?Sized,
    {
        match self.mode {
            BotMode::Off => None,
            BotMode::Assist => {
                if host.is_active() {
                    self.refresh_plan(host);
                }
                None
            }
            BotMode::Auto => {
                if !host.is_active() {
                    return None;
                }
                let interval = self.tick_interval_ms(host);
                self.state.accumulator_ms = self.state.accumulator_ms.saturating_add(dt_ms);
                if self.state.accumulator_ms < interval {
                    return None;
                }
                // a long frame still buys a single action
                self.state.accumulator_ms = (self.state.accumulator_ms - interval).min(interval);
                Some(self.act(host))
            }
            BotMode::Step => {
                if !mem::take(&mut self.step_requested) || !host.is_active() {
                    return None;
                }
                Some(self.act(host))
            }
        }
    }

    /// Replans when the fingerprint changed since the last plan.
    fn refresh_plan<H>(&mut self, host: &H)
    where
        H: BotHost + ?Sized,
    {
        let token = Fingerprint::of(host);
        if self.state.token == Some(token) {
            return;
        }
        log::trace!("planning for {token}");
        self.state.begin_piece(token);
        let req = PlanRequest {
            board: host.board(),
            orientation: host.falling_piece().orientation(),
            next_orientation: host.next_orientation(),
            lines_cleared: host.lines_cleared(),
            profile: self.profile,
            algorithm: self.algorithm,
            budget_override_ms: self.budget_override_ms,
            timing: self.timing,
        };
        if let Some(result) = self.planner.plan(&req) {
            self.state.target = Some(result.placement);
            self.last_stats = Some(result.stats);
            self.last_error = None;
        } else {
            log::debug!("no legal placement for piece {}", token.shape_id);
            self.last_error = Some("no legal placement".to_owned());
        }
    }

    fn act<H>(&mut self, host: &mut H) -> BotAction
    where
        H: BotHost + ?Sized,
    {
        self.refresh_plan(host);
        let piece = host.falling_piece().clone();
        let geometry = host.board().geometry().clone();
        let gravity = geometry.gravity_axis();

        if piece.is_above_ceiling(gravity) {
            return drop_or_lock(host);
        }
        let Some(target) = self.state.target.clone() else {
            return drop_or_lock(host);
        };

        if piece.orientation() != target.orientation() {
            if self.state.rotation_queue.is_empty() && !self.state.rotation_path_computed {
                let bucket = DimensionBucket::from_dimension(geometry.dimension());
                let bounds = *self.config().search.orientation_bounds.get(bucket);
                let path = RotationPathFinder::new(bounds).path(
                    piece.orientation(),
                    target.orientation(),
                    geometry.dimension(),
                    gravity,
                );
                if path.is_empty() {
                    log::warn!("rotation target {} unreachable", target.orientation());
                    self.last_error = Some("rotation target unreachable".to_owned());
                }
                self.state.rotation_queue.extend(path);
                self.state.rotation_path_computed = true;
            }
            let Some(step) = self.state.rotation_queue.pop_front() else {
                return drop_or_lock(host);
            };
            if host.try_rotate(step).is_ok() {
                return BotAction::Rotate(step);
            }
            self.state.rotation_queue.push_front(step);
            return drop_or_lock(host);
        }

        let lateral = geometry
            .lateral_axes()
            .iter()
            .map(|&axis| (axis, target.pivot()[axis] - piece.pivot()[axis]))
            .find(|&(_, diff)| diff != 0);
        if let Some((axis, diff)) = lateral {
            let delta = diff.signum();
            if host.try_move(axis, delta).is_ok() {
                return BotAction::Move { axis, delta };
            }
            return drop_or_lock(host);
        }

        drop_or_lock(host)
    }
}

fn drop_or_lock<H>(host: &mut H) -> BotAction
where
    H: BotHost + ?Sized,
{
    if host.try_soft_drop().is_ok() {
        BotAction::SoftDrop
    } else {
        host.lock_and_spawn();
        BotAction::Lock
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "shape {} / {} locked / {} drawn",
            self.shape_id, self.locked_cells, self.pieces_drawn
        )
    }
}
