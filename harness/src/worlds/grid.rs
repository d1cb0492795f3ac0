//! `GridWorld`: 4-connected pathfinding with walls and per-cell entry costs.
//!
//! Maps are text, one row per line:
//!
//! ```text
//! S..#
//! .3.#
//! ...G
//! ```
//!
//! `.` costs 1 to enter, `1`-`9` cost that digit, `#` is a wall, `S` and `G`
//! mark the start and goal (both cost 1). Blank lines and surrounding
//! whitespace are ignored.
//!
//! `h` is the Manhattan distance to the goal times the cheapest entry cost on
//! the map (admissible); `d` is the plain Manhattan distance.

use ees_search::contract::SearchDomain;

use crate::contract::{SearchWorld, WorldError};

/// A grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
}

impl GridCell {
    #[must_use]
    pub fn manhattan(self, other: Self) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

/// Parsed grid map.
#[derive(Debug, Clone)]
pub struct GridWorld {
    width: usize,
    height: usize,
    /// Entry cost per cell, row-major; `None` is a wall.
    cells: Vec<Option<u32>>,
    start: GridCell,
    goal: GridCell,
    min_cost: u32,
}

impl GridWorld {
    /// Parse a text map.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Malformed`] for ragged rows, unknown characters,
    /// or an empty map, and [`WorldError::Marker`] unless exactly one `S` and
    /// one `G` are present.
    pub fn parse(map: &str) -> Result<Self, WorldError> {
        let rows: Vec<&str> = map.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let Some(first) = rows.first() else {
            return Err(WorldError::Malformed {
                location: "map".into(),
                detail: "no rows".into(),
            });
        };
        let width = first.chars().count();

        let mut cells = Vec::with_capacity(width * rows.len());
        let mut starts = Vec::new();
        let mut goals = Vec::new();
        for (row, line) in rows.iter().enumerate() {
            if line.chars().count() != width {
                return Err(WorldError::Malformed {
                    location: format!("row {row}"),
                    detail: format!("expected {width} cells, found {}", line.chars().count()),
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let cell = match ch {
                    '#' => None,
                    '.' => Some(1),
                    'S' => {
                        starts.push(GridCell { row, col });
                        Some(1)
                    }
                    'G' => {
                        goals.push(GridCell { row, col });
                        Some(1)
                    }
                    '1'..='9' => ch.to_digit(10),
                    other => {
                        return Err(WorldError::Malformed {
                            location: format!("row {row}, col {col}"),
                            detail: format!("unknown cell {other:?}"),
                        })
                    }
                };
                cells.push(cell);
            }
        }

        let start = single(&starts, "start marker `S`")?;
        let goal = single(&goals, "goal marker `G`")?;
        let min_cost = cells.iter().flatten().copied().min().unwrap_or(1);

        Ok(Self {
            width,
            height: rows.len(),
            cells,
            start,
            goal,
            min_cost,
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn goal(&self) -> GridCell {
        self.goal
    }

    /// Entry cost of `cell`, `None` for walls and out-of-range cells.
    #[must_use]
    pub fn cost_at(&self, cell: GridCell) -> Option<u32> {
        if cell.row >= self.height || cell.col >= self.width {
            return None;
        }
        self.cells[cell.row * self.width + cell.col]
    }

    fn passable(&self, cell: GridCell) -> bool {
        self.cost_at(cell).is_some()
    }
}

fn single(found: &[GridCell], marker: &'static str) -> Result<GridCell, WorldError> {
    match found {
        [cell] => Ok(*cell),
        _ => Err(WorldError::Marker {
            marker,
            found: found.len(),
        }),
    }
}

impl SearchDomain for GridWorld {
    type State = GridCell;

    fn start_state(&self) -> GridCell {
        self.start
    }

    fn is_goal(&self, state: &GridCell) -> bool {
        *state == self.goal
    }

    #[allow(clippy::cast_precision_loss)]
    fn heuristic(&self, state: &GridCell) -> f64 {
        (state.manhattan(self.goal) as f64) * f64::from(self.min_cost)
    }

    #[allow(clippy::cast_precision_loss)]
    fn distance(&self, state: &GridCell) -> f64 {
        state.manhattan(self.goal) as f64
    }

    fn edge_cost(&self, state: &GridCell) -> f64 {
        f64::from(self.cost_at(*state).unwrap_or(0))
    }

    /// Up, left, right, down; walls and the map edge are skipped.
    fn successors(&self, state: &GridCell) -> Vec<GridCell> {
        let GridCell { row, col } = *state;
        let mut next = Vec::with_capacity(4);
        if row > 0 {
            next.push(GridCell { row: row - 1, col });
        }
        if col > 0 {
            next.push(GridCell { row, col: col - 1 });
        }
        next.push(GridCell { row, col: col + 1 });
        next.push(GridCell { row: row + 1, col });
        next.retain(|c| self.passable(*c));
        next
    }
}

impl SearchWorld for GridWorld {
    #[allow(clippy::unnecessary_literal_bound)]
    fn world_id(&self) -> &str {
        "grid"
    }

    fn render_state(&self, state: &GridCell) -> String {
        format!("r{}c{}", state.row, state.col)
    }
}
