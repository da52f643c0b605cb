//! Move planning and incremental execution for the N-dimensional engine.
//!
//! The crate is layered from pure search up to the per-tick controller:
//!
//! ```text
//! BotController (one atomic action per tick)
//!     ↓ asks                      ↓ asks
//! Planner (deadline, lookahead)   RotationPathFinder (rotation BFS)
//!     ↓ uses
//! PlannerPolicy · OrientationCache · settled_placements · PlacementEvaluator
//! ```
//!
//! - [`policy`] resolves budgets, lookahead and the evaluation strategy from
//!   [`config::PlaybotConfig`] and the board size.
//! - [`orientation`] enumerates the distinct rotations of a piece by bounded BFS
//!   and caches them.
//! - [`candidate`] enumerates settled drop placements for every orientation.
//! - [`board_analysis`] and [`placement_analysis`] simulate a lock on a private
//!   board copy and measure the result.
//! - [`evaluator`] scores placements with a weighted heuristic or a
//!   lexicographic greedy-layer order.
//! - [`planner`] ties these together under a wall-clock deadline.
//! - [`rotation_path`] turns "current orientation → target orientation" into
//!   atomic rotation steps.
//! - [`controller`] drives a [`host::BotHost`] toward the plan one action per tick.
//! - [`dry_run`] and [`benchmark`] are headless drivers for regression and
//!   latency measurement.
//!
//! # Example
//!
//! ```
//! use ndtris_engine::{GameConfig, GameSession};
//! use ndtris_playbot::{
//!     config::PlaybotConfig,
//!     controller::BotController,
//!     policy::BotMode,
//! };
//!
//! let mut session = GameSession::new(&GameConfig::default()).unwrap();
//! let mut bot = BotController::new(PlaybotConfig::default());
//! bot.set_mode(BotMode::Auto);
//!
//! let dt = bot.tick_interval_ms(&session);
//! for _ in 0..300 {
//!     bot.tick(&mut session, dt);
//!     if session.stats().completed_pieces() > 0 {
//!         break;
//!     }
//! }
//! assert_eq!(session.stats().completed_pieces(), 1);
//! ```

pub mod benchmark;
pub mod board_analysis;
pub mod candidate;
pub mod config;
pub mod controller;
pub mod dry_run;
pub mod evaluator;
pub mod host;
pub mod orientation;
pub mod placement_analysis;
pub mod planner;
pub mod policy;
pub mod rotation_path;
