//! Small statistics helpers for planner latency reports.
//!
//! - [`percentiles`]: nearest-rank percentile computation and storage
//! - [`latency`]: count/mean/max/percentile summary of timing samples
//!
//! # Examples
//!
//! ```
//! use ndtris_stats::latency::LatencySummary;
//!
//! let summary = LatencySummary::new([4.0, 1.0, 3.0, 2.0]).unwrap();
//! assert_eq!(summary.count, 4);
//! assert_eq!(summary.max, 4.0);
//! assert_eq!(summary.mean, 2.5);
//! ```

pub mod latency;
pub mod percentiles;
