//! `TilesWorld`: the sliding-tile puzzle on a `width x width` board.
//!
//! Tile `0` is the blank. The goal places the blank in the top-left corner
//! and tiles `1..n` in row-major order. Every move costs 1; `h` and `d` are
//! both the Manhattan distance summed over non-blank tiles.

use ees_search::contract::SearchDomain;

use crate::contract::{SearchWorld, WorldError};

/// A board configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    tiles: Box<[u8]>,
    blank: usize,
}

impl Board {
    /// Tiles in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    #[must_use]
    pub fn blank(&self) -> usize {
        self.blank
    }

    fn slide(&self, to: usize) -> Self {
        let mut tiles = self.tiles.clone();
        tiles.swap(self.blank, to);
        Self { tiles, blank: to }
    }
}

#[derive(Debug, Clone)]
pub struct TilesWorld {
    width: usize,
    start: Board,
}

impl TilesWorld {
    /// Build a puzzle from a start layout.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Malformed`] unless `tiles` is a permutation of
    /// `0..width*width` with `width >= 2`.
    pub fn new(width: usize, tiles: Vec<u8>) -> Result<Self, WorldError> {
        let n = width * width;
        if width < 2 || n > usize::from(u8::MAX) + 1 {
            return Err(WorldError::Malformed {
                location: "width".into(),
                detail: format!("unsupported board width {width}"),
            });
        }
        if tiles.len() != n {
            return Err(WorldError::Malformed {
                location: "tiles".into(),
                detail: format!("expected {n} tiles, found {}", tiles.len()),
            });
        }
        let mut seen = vec![false; n];
        for &t in &tiles {
            let t = usize::from(t);
            if t >= n || seen[t] {
                return Err(WorldError::Malformed {
                    location: "tiles".into(),
                    detail: format!("tile {t} repeated or out of range"),
                });
            }
            seen[t] = true;
        }
        let blank = tiles.iter().position(|&t| t == 0).unwrap_or(0);
        Ok(Self {
            width,
            start: Board {
                tiles: tiles.into_boxed_slice(),
                blank,
            },
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// The goal layout: `0, 1, ..., n-1`.
    #[must_use]
    pub fn goal_board(&self) -> Board {
        #[allow(clippy::cast_possible_truncation)]
        let tiles: Box<[u8]> = (0..self.width * self.width).map(|t| t as u8).collect();
        Board { tiles, blank: 0 }
    }

    /// Whether the goal is reachable from the start layout.
    ///
    /// Odd widths need an even inversion count. Even widths need the
    /// inversion count plus the blank's row to be even (blank's goal row is
    /// the top one).
    #[must_use]
    pub fn is_solvable(&self) -> bool {
        let tiles: Vec<u8> = self.start.tiles.iter().copied().filter(|&t| t != 0).collect();
        let mut inversions = 0usize;
        for i in 0..tiles.len() {
            inversions += tiles[i + 1..].iter().filter(|&&t| t < tiles[i]).count();
        }
        if self.width % 2 == 1 {
            inversions % 2 == 0
        } else {
            (inversions + self.start.blank / self.width) % 2 == 0
        }
    }

    /// Manhattan distance of every non-blank tile to its goal square.
    #[must_use]
    pub fn manhattan(&self, board: &Board) -> usize {
        board
            .tiles
            .iter()
            .enumerate()
            .filter(|(_, &t)| t != 0)
            .map(|(pos, &t)| {
                let goal = usize::from(t);
                (pos / self.width).abs_diff(goal / self.width)
                    + (pos % self.width).abs_diff(goal % self.width)
            })
            .sum()
    }
}

impl SearchDomain for TilesWorld {
    type State = Board;

    fn start_state(&self) -> Board {
        self.start.clone()
    }

    fn is_goal(&self, state: &Board) -> bool {
        state.blank == 0 && state.tiles.iter().enumerate().all(|(i, &t)| usize::from(t) == i)
    }

    #[allow(clippy::cast_precision_loss)]
    fn heuristic(&self, state: &Board) -> f64 {
        self.manhattan(state) as f64
    }

    #[allow(clippy::cast_precision_loss)]
    fn distance(&self, state: &Board) -> f64 {
        self.manhattan(state) as f64
    }

    fn edge_cost(&self, _state: &Board) -> f64 {
        1.0
    }

    /// Blank moves up, left, right, down.
    fn successors(&self, state: &Board) -> Vec<Board> {
        let w = self.width;
        let (row, col) = (state.blank / w, state.blank % w);
        let mut next = Vec::with_capacity(4);
        if row > 0 {
            next.push(state.slide(state.blank - w));
        }
        if col > 0 {
            next.push(state.slide(state.blank - 1));
        }
        if col + 1 < w {
            next.push(state.slide(state.blank + 1));
        }
        if row + 1 < w {
            next.push(state.slide(state.blank + w));
        }
        next
    }
}

impl SearchWorld for TilesWorld {
    #[allow(clippy::unnecessary_literal_bound)]
    fn world_id(&self) -> &str {
        "tiles"
    }

    fn render_state(&self, state: &Board) -> String {
        state
            .tiles
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}
