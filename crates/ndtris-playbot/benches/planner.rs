//! Planning latency on the benchmark boards.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use ndtris_engine::{GameSession, Orientation, ShapeSet};
use ndtris_playbot::{
    benchmark::benchmark_game,
    config::{PlaybotConfig, SearchBounds},
    orientation::enumerate_orientations,
    planner::{PlanRequest, PlanTiming, Planner},
    policy::{DimensionBucket, PlannerAlgorithm, PlannerProfile},
};

fn request<'a>(session: &'a GameSession, algorithm: PlannerAlgorithm) -> PlanRequest<'a> {
    PlanRequest {
        board: session.board(),
        orientation: session.falling_piece().orientation(),
        next_orientation: session.next_shape().map(|shape| shape.blocks()),
        lines_cleared: 0,
        profile: PlannerProfile::Balanced,
        algorithm,
        budget_override_ms: None,
        timing: PlanTiming::Unbounded,
    }
}

/// One full plan per bucket, without a deadline.
fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan");
    group.sample_size(20);
    for bucket in DimensionBucket::ALL {
        let session = GameSession::new(&benchmark_game(bucket, 0)).unwrap();
        for algorithm in [PlannerAlgorithm::Heuristic, PlannerAlgorithm::GreedyLayer] {
            let mut planner = Planner::new(PlaybotConfig::default());
            group.bench_function(format!("{bucket}/{algorithm}"), |b| {
                b.iter(|| planner.plan(black_box(&request(&session, algorithm))));
            });
        }
    }
    group.finish();
}

/// Orientation BFS of the largest 4D shape, uncached.
fn bench_orientations(c: &mut Criterion) {
    let game = benchmark_game(DimensionBucket::D4Plus, 0);
    let geometry = game.geometry().unwrap();
    let branch: Orientation = ShapeSet::Standard
        .shapes(&geometry)
        .into_iter()
        .find(|shape| shape.name() == "Branch4")
        .unwrap()
        .blocks()
        .clone();
    let bounds = SearchBounds {
        max_depth: 8,
        max_states: 192,
    };
    c.bench_function("orientations_4d", |b| {
        b.iter(|| enumerate_orientations(black_box(&branch), 4, 1, bounds));
    });
}

criterion_group!(benches, bench_plan, bench_orientations);
criterion_main!(benches);
