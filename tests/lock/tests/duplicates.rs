//! Duplicate detection lock tests.
//!
//! Proves:
//! 1. A cheaper path to a closed state reopens it and the cheaper cost wins.
//! 2. A cheaper path to an open state updates it in place.
//! 3. Each state is expanded once, plus once more per reopening.
//! 4. An improved state carries the edge of its new path, so edge costs
//!    walked along the solution path add up to the reported cost.

use ees_harness::runner::{run_world, BiasChoiceV1, RunConfig};
use ees_harness::worlds::graph::{GraphState, GraphWorld};
use ees_harness::worlds::regimes::regime_graph_reopening;
use ees_search::bias::{GlobalAverageBias, NoBias};
use ees_search::policy::SearchPolicyV1;
use ees_search::report::SearchReportV1;
use ees_search::search::EesSearch;
use ees_search::SearchDomain;
use lock_tests::{random_graph, random_grid, seeded, start_distances};

fn walked_cost(world: &GraphWorld, path: &[GraphState]) -> f64 {
    path.iter().skip(1).map(|s| world.edge_cost(s)).sum()
}

// ---------------------------------------------------------------------------
// ACCEPTANCE: EES-DUP-REOPEN
// ---------------------------------------------------------------------------

#[test]
fn reopening_regime_recovers_cheap_route() {
    let regime = regime_graph_reopening().unwrap();
    let result = run_world(&regime.world, &regime.config).unwrap();
    assert_eq!(result.outcome.cost(), Some(12.0));
    assert!(result.report.reopened >= regime.expectations.min_reopened);
    let path: Vec<usize> = result.report.solution_path.iter().map(|s| s.vertex).collect();
    assert_eq!(path, vec![0, 1, 3, 4]);
}

#[test]
fn reopening_is_visible_in_expansion_order() {
    let regime = regime_graph_reopening().unwrap();
    let policy = SearchPolicyV1 {
        record_expansion_order: true,
        ..regime.config.policy.clone()
    };
    let engine = EesSearch::new(&regime.world, NoBias, policy).unwrap();
    let mut report = SearchReportV1::new();
    engine.run(&mut report);
    let order: Vec<usize> = report.expansion_order.iter().map(|s| s.vertex).collect();
    assert_eq!(order.iter().filter(|&&v| v == 3).count(), 2, "vertex 3 expanded twice: {order:?}");
    assert_eq!(report.reopened, 1);
}

// ---------------------------------------------------------------------------
// ACCEPTANCE: EES-DUP-UPDATE-OPEN
// ---------------------------------------------------------------------------

#[test]
fn cheaper_path_to_open_state_updates_it() {
    // 0 -> 1 (1), 0 -> 2 (5), 1 -> 2 (1), 2 -> 3 (1). Vertex 2 is first seen
    // at g = 5 and improved to g = 2 while still open.
    let world = GraphWorld::new(
        4,
        &[(0, 1, 1.0), (0, 2, 5.0), (1, 2, 1.0), (2, 3, 1.0)],
        0,
        3,
    )
    .unwrap();
    let config = RunConfig::new(SearchPolicyV1::with_weight(1.0), BiasChoiceV1::Uncorrected);
    let result = run_world(&world, &config).unwrap();
    assert_eq!(result.outcome.cost(), Some(3.0));
    assert_eq!(result.report.updated_open, 1);
    assert_eq!(result.report.reopened, 0);
    assert_eq!(result.report.duplicates, 1);
    let path: Vec<usize> = result.report.solution_path.iter().map(|s| s.vertex).collect();
    assert_eq!(path, vec![0, 1, 2, 3]);
    assert_eq!(Some(walked_cost(&world, &result.report.solution_path)), result.outcome.cost());
}

#[test]
fn updated_state_takes_the_edge_of_its_new_path() {
    // Vertex 3 is first reached over the 5-cost edge from 1, then improved
    // through 2 over a 1-cost edge.
    let world = GraphWorld::new(
        5,
        &[(0, 1, 1.0), (0, 2, 2.0), (1, 3, 5.0), (2, 3, 1.0), (3, 4, 1.0)],
        0,
        4,
    )
    .unwrap();
    let config = RunConfig::new(SearchPolicyV1::with_weight(1.0), BiasChoiceV1::Uncorrected);
    let result = run_world(&world, &config).unwrap();
    assert_eq!(result.outcome.cost(), Some(4.0));
    assert_eq!(result.report.updated_open, 1);
    let path = &result.report.solution_path;
    let vias: Vec<f64> = path.iter().map(|s| s.via).collect();
    assert_eq!(vias, vec![0.0, 2.0, 1.0, 1.0]);
    assert_eq!(Some(walked_cost(&world, path)), result.outcome.cost());
}

// ---------------------------------------------------------------------------
// ACCEPTANCE: EES-DUP-COUNTERS
// ---------------------------------------------------------------------------

#[test]
fn every_state_has_one_node() {
    let mut rng = seeded(0xD0_0001);
    for case in 0..15 {
        let world = random_grid(&mut rng, 10, 10, 15);
        let policy = SearchPolicyV1 {
            record_expansion_order: true,
            ..SearchPolicyV1::with_weight(1.5)
        };
        let engine = EesSearch::new(&world, GlobalAverageBias::new(), policy).unwrap();
        let mut report = SearchReportV1::new();
        engine.run(&mut report);

        assert!(report.duplicates <= report.nodes_generated, "case {case}");
        assert!(report.updated_open + report.reopened <= report.duplicates, "case {case}");
        let novel = report.nodes_generated - report.duplicates;
        // Novel states plus the start node bound the distinct expanded states.
        let mut expanded = report.expansion_order.clone();
        expanded.sort();
        expanded.dedup();
        assert!(expanded.len() as u64 <= novel + 1, "case {case}");
        // A state is re-expanded only after being reopened.
        let reexpansions = report.expansion_order.len() - expanded.len();
        assert!(reexpansions as u64 <= report.reopened, "case {case}");
    }
}

// ---------------------------------------------------------------------------
// ACCEPTANCE: EES-DUP-SOUNDNESS
// ---------------------------------------------------------------------------

#[test]
fn solution_path_follows_cheapest_known_routes() {
    // Parallel edges and consistent heuristics: every state on the returned
    // path sits at its Dijkstra distance, and each step is a real edge.
    let mut rng = seeded(0xD0_0002);
    for case in 0..40 {
        let scale = [1.0, 0.5, 0.0][case % 3];
        let world = random_graph(&mut rng, 10, 40, 9, true).with_scaled_heuristic(scale);
        let distances = start_distances(&world);
        let config = RunConfig::new(SearchPolicyV1::with_weight(1.0), BiasChoiceV1::Uncorrected);
        let result = run_world(&world, &config).unwrap();
        assert!(result.outcome.is_solved(), "case {case}: chain keeps the goal reachable");
        let path = &result.report.solution_path;

        let mut walked = 0.0;
        for pair in path.windows(2) {
            let step = world
                .successors(&pair[0])
                .into_iter()
                .any(|s| s.vertex == pair[1].vertex && s.via.to_bits() == pair[1].via.to_bits());
            assert!(step, "case {case}: {pair:?} is not an edge");
            walked += world.edge_cost(&pair[1]);
            assert_eq!(Some(&walked), distances.get(&pair[1]), "case {case}: {:?}", pair[1]);
        }
        assert_eq!(Some(walked), result.outcome.cost(), "case {case}");
    }
}
