//! Canonical regimes: matched `(world, config, expectations)` triples.
//!
//! Tests, benches, and the fixture binary should use these constructors
//! rather than assembling worlds and policies by hand, so a regime's stress
//! axis and its policy knobs cannot drift apart.
//!
//! All policy knobs are set explicitly.

use ees_search::policy::{SearchPolicyV1, TieBreakV1};

use crate::contract::WorldError;
use crate::runner::{BiasChoiceV1, RunConfig};

use super::graph::GraphWorld;
use super::grid::GridWorld;
use super::tiles::TilesWorld;

/// Test-side expectations for a regime.
#[derive(Debug, Clone, PartialEq)]
pub struct RegimeExpectations {
    /// Whether the run should end `Solved`.
    pub expects_solution: bool,
    /// Known optimal cost, when the regime pins one.
    pub optimal_cost: Option<f64>,
    /// Minimum reopenings the regime is built to provoke.
    pub min_reopened: u64,
}

/// A matched `(world, config, expectations)` triple.
#[derive(Debug, Clone)]
pub struct Regime<W> {
    pub name: &'static str,
    pub world: W,
    pub config: RunConfig,
    pub expectations: RegimeExpectations,
}

fn explicit_config(weight: f64, bias: BiasChoiceV1) -> RunConfig {
    RunConfig::new(
        SearchPolicyV1 {
            weight,
            focal_confidence: 0.95,
            default_variance: 100.0,
            tie_break: TieBreakV1::PreferShallow,
            record_expansion_order: false,
        },
        bias,
    )
}

const MAZE: &str = "
S....#..........
.###.#.######.#.
.#...#.#....#.#.
.#.###.#.##.#.#.
.#.....#..#.#.#.
.#####.##.#.#.#.
......5#..#...#.
.####9##.####.#.
.#......5.....#.
.#.##########.#.
.#..........#..G
";

/// **Maze** regime: walls force detours; two costly cells tempt shortcuts.
///
/// # Errors
///
/// Returns [`WorldError`] only if the built-in map is malformed.
pub fn regime_grid_maze() -> Result<Regime<GridWorld>, WorldError> {
    Ok(Regime {
        name: "grid_maze",
        world: GridWorld::parse(MAZE)?,
        config: explicit_config(2.0, BiasChoiceV1::GlobalAverage),
        expectations: RegimeExpectations {
            expects_solution: true,
            optimal_cost: Some(37.0),
            min_reopened: 0,
        },
    })
}

/// **Walled goal** regime: the goal is enclosed, so the frontier must be
/// exhausted.
///
/// # Errors
///
/// Returns [`WorldError`] only if the built-in map is malformed.
pub fn regime_grid_walled() -> Result<Regime<GridWorld>, WorldError> {
    let map = "
        S.....
        ..2...
        ...###
        ...#G#
        ...###
    ";
    Ok(Regime {
        name: "grid_walled",
        world: GridWorld::parse(map)?,
        config: explicit_config(1.5, BiasChoiceV1::GlobalAverage),
        expectations: RegimeExpectations {
            expects_solution: false,
            optimal_cost: None,
            min_reopened: 0,
        },
    })
}

/// **8-puzzle** regime: a solvable instance 22 moves from the goal.
///
/// # Errors
///
/// Returns [`WorldError`] only if the built-in layout is malformed.
pub fn regime_tiles_8() -> Result<Regime<TilesWorld>, WorldError> {
    Ok(Regime {
        name: "tiles_8",
        world: TilesWorld::new(3, vec![8, 1, 3, 4, 0, 2, 7, 6, 5])?,
        config: explicit_config(2.0, BiasChoiceV1::GlobalAverage),
        expectations: RegimeExpectations {
            expects_solution: true,
            optimal_cost: Some(22.0),
            min_reopened: 0,
        },
    })
}

/// **Unsolvable 2x2** regime: parity makes the goal unreachable.
///
/// # Errors
///
/// Returns [`WorldError`] only if the built-in layout is malformed.
pub fn regime_tiles_unsolvable() -> Result<Regime<TilesWorld>, WorldError> {
    Ok(Regime {
        name: "tiles_unsolvable",
        world: TilesWorld::new(2, vec![0, 2, 1, 3])?,
        config: explicit_config(1.0, BiasChoiceV1::GlobalAverage),
        expectations: RegimeExpectations {
            expects_solution: false,
            optimal_cost: None,
            min_reopened: 0,
        },
    })
}

/// **Reopening** regime: an admissible but inconsistent heuristic on vertex
/// 1 delays the cheap route, so vertex 3 is closed through 2 first and then
/// reopened through 1.
///
/// ```text
/// 0 →(1) 1 →(1) 3 →(10) 4
/// 0 →(3) 2 →(1) 3
/// ```
///
/// # Errors
///
/// Returns [`WorldError`] only if the built-in graph is malformed.
pub fn regime_graph_reopening() -> Result<Regime<GraphWorld>, WorldError> {
    let world = GraphWorld::new(
        5,
        &[(0, 1, 1.0), (0, 2, 3.0), (1, 3, 1.0), (2, 3, 1.0), (3, 4, 10.0)],
        0,
        4,
    )?
    .with_tables(vec![0.0, 4.0, 0.0, 0.0, 0.0], vec![0.0; 5])?;
    Ok(Regime {
        name: "graph_reopening",
        world,
        config: explicit_config(1.0, BiasChoiceV1::Uncorrected),
        expectations: RegimeExpectations {
            expects_solution: true,
            optimal_cost: Some(12.0),
            min_reopened: 1,
        },
    })
}
