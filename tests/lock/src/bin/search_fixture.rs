//! Binary that runs every canonical regime and prints deterministic output
//! lines for cross-process verification.
//!
//! Usage: `search_fixture`
//!
//! Output: one `regime.<name>.<field>=<value>` line per field, regimes in a
//! fixed order.

use ees_harness::contract::SearchWorld;
use ees_harness::runner::run_world;
use ees_harness::worlds::regimes::{
    regime_graph_reopening, regime_grid_maze, regime_grid_walled, regime_tiles_8,
    regime_tiles_unsolvable, Regime,
};

fn emit<W: SearchWorld>(regime: &Regime<W>) {
    let result = run_world(&regime.world, &regime.config).expect("regime run failed");
    let name = regime.name;
    let cost = result
        .outcome
        .cost()
        .map_or_else(|| "none".to_string(), ees_search::canon::cost_bits);
    println!("regime.{name}.run_digest={}", result.run_digest.as_str());
    println!("regime.{name}.report_digest={}", result.report_digest.as_str());
    println!("regime.{name}.policy_digest={}", result.policy_digest.as_str());
    println!("regime.{name}.solved={}", result.outcome.is_solved());
    println!("regime.{name}.cost_bits={cost}");
    println!("regime.{name}.nodes_expanded={}", result.report.nodes_expanded);
}

fn main() {
    emit(&regime_grid_maze().expect("grid_maze builds"));
    emit(&regime_grid_walled().expect("grid_walled builds"));
    emit(&regime_tiles_8().expect("tiles_8 builds"));
    emit(&regime_tiles_unsolvable().expect("tiles_unsolvable builds"));
    emit(&regime_graph_reopening().expect("graph_reopening builds"));
}
