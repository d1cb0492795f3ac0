//! Regime lock tests: each canonical regime meets its declared expectations,
//! and the returned cost respects the regime's bound on the pinned optimum.

use ees_harness::contract::SearchWorld;
use ees_harness::runner::run_world;
use ees_harness::worlds::regimes::{
    regime_graph_reopening, regime_grid_maze, regime_grid_walled, regime_tiles_8,
    regime_tiles_unsolvable, Regime,
};
use ees_search::SearchDomain;
use lock_tests::optimal_cost;

fn check<W: SearchWorld>(regime: &Regime<W>) {
    let result = run_world(&regime.world, &regime.config).unwrap();
    let expect = &regime.expectations;
    assert_eq!(
        result.outcome.is_solved(),
        expect.expects_solution,
        "{}: solvability",
        regime.name
    );
    assert!(
        result.report.reopened >= expect.min_reopened,
        "{}: expected at least {} reopenings, saw {}",
        regime.name,
        expect.min_reopened,
        result.report.reopened
    );
    if let Some(opt) = expect.optimal_cost {
        assert_eq!(optimal_cost(&regime.world), Some(opt), "{}: pinned optimum", regime.name);
        let cost = result.outcome.cost().expect("solved regime reports a cost");
        assert!(
            cost <= regime.config.policy.weight * opt + 1e-9,
            "{}: cost {cost} exceeds bound",
            regime.name
        );
    }
    assert_eq!(
        result.report.selections.total(),
        result.report.nodes_expanded + u64::from(result.outcome.is_solved()),
        "{}: one selection per expansion plus the goal",
        regime.name
    );
}

// ACCEPTANCE: EES-REGIMES
#[test]
fn grid_maze_meets_expectations() {
    check(&regime_grid_maze().unwrap());
}

#[test]
fn grid_walled_meets_expectations() {
    check(&regime_grid_walled().unwrap());
}

#[test]
fn tiles_8_meets_expectations() {
    check(&regime_tiles_8().unwrap());
}

#[test]
fn tiles_unsolvable_meets_expectations() {
    check(&regime_tiles_unsolvable().unwrap());
}

#[test]
fn graph_reopening_meets_expectations() {
    check(&regime_graph_reopening().unwrap());
}

#[test]
fn initial_h_is_reported() {
    let regime = regime_tiles_8().unwrap();
    let result = run_world(&regime.world, &regime.config).unwrap();
    let start = regime.world.start_state();
    #[allow(clippy::cast_precision_loss)]
    let manhattan = regime.world.manhattan(&start) as f64;
    assert!((result.report.initial_h - manhattan).abs() < f64::EPSILON);
}
