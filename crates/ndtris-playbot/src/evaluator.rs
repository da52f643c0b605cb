//! Placement scoring.
//!
//! Two strategies share the [`PlacementEvaluator`] interface:
//!
//! - [`HeuristicEvaluator`] computes a weighted sum of surface metrics,
//!
//!   ```text
//!   score = cleared·W₁ − aggregate_height·W₂ − holes·W₃ − roughness·W₄ − max_height·W₅
//!   ```
//!
//!   minus a fixed penalty when the piece locks above the ceiling.
//! - [`GreedyLayerEvaluator`] ranks placements lexicographically by
//!   `(alive, cleared, Σ layer_occupancy², −holes)`. Above three axes the
//!   weighted sum becomes noisy, while filling layers densely stays a reliable
//!   signal.
//!
//! Both evaluate a [`PlacementAnalysis`], so neither touches the live board.

use std::{cmp::Ordering, fmt};

use crate::{config::HeuristicWeights, placement_analysis::PlacementAnalysis, policy::Strategy};

/// Components of a greedy-layer score, compared in field order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerScore {
    pub alive: f64,
    pub cleared: f64,
    pub mass: f64,
    pub neg_holes: f64,
}

impl LayerScore {
    fn components(&self) -> [f64; 4] {
        [self.alive, self.cleared, self.mass, self.neg_holes]
    }
}

/// Score of a placement; higher is better.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    Heuristic(f64),
    GreedyLayer(LayerScore),
}

impl Score {
    /// Total order over scores of the same strategy.
    ///
    /// Heuristic scores sort below greedy-layer scores; the planner never
    /// mixes them.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Heuristic(a), Self::Heuristic(b)) => a.total_cmp(b),
            (Self::GreedyLayer(a), Self::GreedyLayer(b)) => a
                .components()
                .iter()
                .zip(b.components().iter())
                .map(|(x, y)| x.total_cmp(y))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal),
            (Self::Heuristic(_), Self::GreedyLayer(_)) => Ordering::Less,
            (Self::GreedyLayer(_), Self::Heuristic(_)) => Ordering::Greater,
        }
    }

    /// `self + weight × followup`, element-wise for greedy-layer scores.
    #[must_use]
    pub fn combine(self, followup: Self, weight: f64) -> Self {
        match (self, followup) {
            (Self::Heuristic(a), Self::Heuristic(b)) => Self::Heuristic(a + weight * b),
            (Self::GreedyLayer(a), Self::GreedyLayer(b)) => Self::GreedyLayer(LayerScore {
                alive: a.alive + weight * b.alive,
                cleared: a.cleared + weight * b.cleared,
                mass: a.mass + weight * b.mass,
                neg_holes: a.neg_holes + weight * b.neg_holes,
            }),
            (score, _) => score,
        }
    }

    /// Scalar view for reporting: the heuristic value, or the layer mass.
    #[must_use]
    pub fn value(&self) -> f64 {
        match self {
            Self::Heuristic(v) => *v,
            Self::GreedyLayer(s) => s.mass,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heuristic(v) => write!(f, "{v:.3}"),
            Self::GreedyLayer(s) => write!(
                f,
                "({}, {}, {}, {})",
                s.alive, s.cleared, s.mass, s.neg_holes
            ),
        }
    }
}

/// Evaluates piece placements by assigning scores.
pub trait PlacementEvaluator: fmt::Debug {
    fn strategy(&self) -> Strategy;

    /// Scores a placement (higher is better).
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> Score;

    /// Score of a position where the next piece has nowhere to go.
    fn loss_score(&self) -> Score;
}

#[derive(Debug, Clone)]
pub struct HeuristicEvaluator {
    weights: HeuristicWeights,
}

impl HeuristicEvaluator {
    #[must_use]
    pub fn new(weights: HeuristicWeights) -> Self {
        Self { weights }
    }
}

impl PlacementEvaluator for HeuristicEvaluator {
    fn strategy(&self) -> Strategy {
        Strategy::Heuristic
    }

    #[expect(clippy::cast_precision_loss)]
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> Score {
        let w = &self.weights;
        let board = analysis.board_analysis();
        let mut score = analysis.cleared_layers() as f64 * w.cleared
            - board.aggregate_height() as f64 * w.aggregate_height
            - board.num_holes() as f64 * w.holes
            - board.roughness() as f64 * w.roughness
            - board.max_height() as f64 * w.max_height;
        if !analysis.alive() {
            score -= w.loss_penalty;
        }
        Score::Heuristic(score)
    }

    fn loss_score(&self) -> Score {
        Score::Heuristic(-self.weights.loss_penalty)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyLayerEvaluator;

impl PlacementEvaluator for GreedyLayerEvaluator {
    fn strategy(&self) -> Strategy {
        Strategy::GreedyLayer
    }

    #[expect(clippy::cast_precision_loss)]
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> Score {
        let board = analysis.board_analysis();
        Score::GreedyLayer(LayerScore {
            alive: if analysis.alive() { 1.0 } else { 0.0 },
            cleared: analysis.cleared_layers() as f64,
            mass: board.layer_mass() as f64,
            neg_holes: -(board.num_holes() as f64),
        })
    }

    fn loss_score(&self) -> Score {
        Score::GreedyLayer(LayerScore {
            alive: 0.0,
            cleared: 0.0,
            mass: 0.0,
            neg_holes: 0.0,
        })
    }
}

/// Builds the evaluator of a strategy.
#[must_use]
pub fn evaluator_for(
    strategy: Strategy,
    weights: &HeuristicWeights,
) -> Box<dyn PlacementEvaluator> {
    match strategy {
        Strategy::Heuristic => Box::new(HeuristicEvaluator::new(weights.clone())),
        Strategy::GreedyLayer => Box::new(GreedyLayerEvaluator),
    }
}

#[cfg(test)]
mod tests {
    use ndtris_engine::{Board, Orientation, coord};

    use super::*;
    use crate::{candidate::Placement, config::PlaybotConfig};

    fn analyze(board: &Board, blocks: &[[i32; 2]], pivot: [i32; 2]) -> PlacementAnalysis {
        let orientation = Orientation::new(blocks.iter().map(|b| coord(b)));
        PlacementAnalysis::from_board(board, Placement::new(orientation, coord(&pivot)))
    }

    fn board() -> Board {
        Board::from_ascii(
            "
            ....
            ....
            ....
            ##..
            ",
        )
    }

    #[test]
    fn test_heuristic_prefers_flat_board() {
        let evaluator = HeuristicEvaluator::new(PlaybotConfig::default().heuristic);
        let domino = [[0, 0], [1, 0]];
        let flat = analyze(&board(), &domino, [2, 3]);
        let stacked = analyze(&board(), &domino, [0, 2]);
        let flat_score = evaluator.evaluate_placement(&flat);
        let stacked_score = evaluator.evaluate_placement(&stacked);
        assert_eq!(flat.cleared_layers(), 1);
        assert!(flat_score.total_cmp(&stacked_score).is_gt());
    }

    #[test]
    fn test_heuristic_penalizes_loss() {
        let weights = PlaybotConfig::default().heuristic;
        let evaluator = HeuristicEvaluator::new(weights.clone());
        let dead = analyze(&board(), &[[0, 0], [0, 1]], [3, -1]);
        assert!(!dead.alive());
        let Score::Heuristic(score) = evaluator.evaluate_placement(&dead) else {
            panic!("unexpected score variant");
        };
        assert!(score < -weights.loss_penalty + 10.0);
    }

    #[test]
    fn test_greedy_layer_is_lexicographic() {
        let evaluator = GreedyLayerEvaluator;
        // clearing beats any amount of mass
        let clear = evaluator.evaluate_placement(&analyze(&board(), &[[0, 0], [1, 0]], [2, 3]));
        let tall = evaluator.evaluate_placement(&analyze(&board(), &[[0, 0], [0, 1]], [2, 1]));
        assert!(clear.total_cmp(&tall).is_gt());
        assert!(tall.total_cmp(&evaluator.loss_score()).is_gt());

        let Score::GreedyLayer(layers) = clear else {
            panic!("unexpected score variant");
        };
        assert_eq!(layers.alive, 1.0);
        assert_eq!(layers.cleared, 1.0);
        assert_eq!(layers.mass, 0.0);
    }

    #[test]
    fn test_combine_is_elementwise() {
        let a = Score::GreedyLayer(LayerScore {
            alive: 1.0,
            cleared: 0.0,
            mass: 4.0,
            neg_holes: -1.0,
        });
        let b = Score::GreedyLayer(LayerScore {
            alive: 1.0,
            cleared: 2.0,
            mass: 2.0,
            neg_holes: 0.0,
        });
        let combined = a.combine(b, 0.5);
        assert_eq!(
            combined,
            Score::GreedyLayer(LayerScore {
                alive: 1.5,
                cleared: 1.0,
                mass: 5.0,
                neg_holes: -1.0,
            })
        );
        assert_eq!(
            Score::Heuristic(1.0).combine(Score::Heuristic(-4.0), 0.5),
            Score::Heuristic(-1.0)
        );
    }
}
