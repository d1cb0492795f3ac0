//! `GraphWorld`: an explicit directed graph with weighted edges.
//!
//! States are vertices tagged with the cost of the edge used to reach them.
//! The tag is what `edge_cost` reports; equality and hashing use the vertex
//! alone, so two paths to a vertex are duplicates regardless of the edge.
//!
//! Heuristic and distance tables default to zero. [`GraphWorld::with_scaled_heuristic`]
//! fills them from the exact cost-to-goal (reverse Dijkstra) scaled by a
//! factor in `[0, 1]` and the exact hop count (reverse BFS).

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};
use std::hash::{Hash, Hasher};

use ees_search::contract::SearchDomain;
use ees_search::node::OrdCost;

use crate::contract::{SearchWorld, WorldError};

/// A vertex reached through an edge of cost `via`.
#[derive(Debug, Clone, Copy)]
pub struct GraphState {
    pub vertex: usize,
    pub via: f64,
}

impl PartialEq for GraphState {
    fn eq(&self, other: &Self) -> bool {
        self.vertex == other.vertex
    }
}

impl Eq for GraphState {}

impl Hash for GraphState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.vertex.hash(state);
    }
}

#[derive(Debug, Clone)]
pub struct GraphWorld {
    adjacency: Vec<Vec<(usize, f64)>>,
    start: usize,
    goal: usize,
    h: Vec<f64>,
    d: Vec<f64>,
}

impl GraphWorld {
    /// Build a graph from `(from, to, cost)` edges. Successors keep the edge
    /// order given here.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Malformed`] for out-of-range vertices or
    /// negative / non-finite edge costs.
    pub fn new(
        vertex_count: usize,
        edges: &[(usize, usize, f64)],
        start: usize,
        goal: usize,
    ) -> Result<Self, WorldError> {
        for (name, v) in [("start", start), ("goal", goal)] {
            if v >= vertex_count {
                return Err(WorldError::Malformed {
                    location: name.into(),
                    detail: format!("vertex {v} out of range 0..{vertex_count}"),
                });
            }
        }
        let mut adjacency = vec![Vec::new(); vertex_count];
        for (i, &(from, to, cost)) in edges.iter().enumerate() {
            if from >= vertex_count || to >= vertex_count {
                return Err(WorldError::Malformed {
                    location: format!("edge {i}"),
                    detail: format!("{from} -> {to} out of range 0..{vertex_count}"),
                });
            }
            if !cost.is_finite() || cost < 0.0 {
                return Err(WorldError::Malformed {
                    location: format!("edge {i}"),
                    detail: format!("cost must be finite and >= 0, got {cost}"),
                });
            }
            adjacency[from].push((to, cost));
        }
        Ok(Self {
            adjacency,
            start,
            goal,
            h: vec![0.0; vertex_count],
            d: vec![0.0; vertex_count],
        })
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    #[must_use]
    pub fn goal(&self) -> usize {
        self.goal
    }

    /// Replace the heuristic and distance tables.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Malformed`] if a table length differs from the
    /// vertex count.
    pub fn with_tables(mut self, h: Vec<f64>, d: Vec<f64>) -> Result<Self, WorldError> {
        for (name, table) in [("heuristic", &h), ("distance", &d)] {
            if table.len() != self.vertex_count() {
                return Err(WorldError::Malformed {
                    location: name.into(),
                    detail: format!(
                        "expected {} entries, found {}",
                        self.vertex_count(),
                        table.len()
                    ),
                });
            }
        }
        self.h = h;
        self.d = d;
        Ok(self)
    }

    /// Heuristic = `scale` x exact cost-to-goal; distance = exact hop count.
    /// Vertices that cannot reach the goal get zero for both.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn with_scaled_heuristic(mut self, scale: f64) -> Self {
        let costs = self.costs_to_goal();
        let hops = self.hops_to_goal();
        self.h = costs.iter().map(|c| c.map_or(0.0, |c| c * scale)).collect();
        self.d = hops.iter().map(|n| n.map_or(0.0, |n| n as f64)).collect();
        self
    }

    /// Exact cost from every vertex to the goal, `None` if unreachable.
    #[must_use]
    pub fn costs_to_goal(&self) -> Vec<Option<f64>> {
        let reverse = self.reverse_adjacency();
        let mut best: Vec<Option<f64>> = vec![None; self.vertex_count()];
        let mut heap = BinaryHeap::new();
        best[self.goal] = Some(0.0);
        heap.push(Reverse((OrdCost::new(0.0), self.goal)));
        while let Some(Reverse((cost, v))) = heap.pop() {
            if best[v].is_some_and(|b| cost.get() > b) {
                continue;
            }
            for &(u, edge) in &reverse[v] {
                let candidate = cost.get() + edge;
                let improves = match best[u] {
                    Some(b) => candidate < b,
                    None => true,
                };
                if improves {
                    best[u] = Some(candidate);
                    heap.push(Reverse((OrdCost::new(candidate), u)));
                }
            }
        }
        best
    }

    /// Fewest edges from every vertex to the goal, `None` if unreachable.
    #[must_use]
    pub fn hops_to_goal(&self) -> Vec<Option<usize>> {
        let reverse = self.reverse_adjacency();
        let mut hops = vec![None; self.vertex_count()];
        let mut queue = VecDeque::from([self.goal]);
        hops[self.goal] = Some(0);
        while let Some(v) = queue.pop_front() {
            let next = hops[v].map_or(0, |n| n + 1);
            for &(u, _) in &reverse[v] {
                if hops[u].is_none() {
                    hops[u] = Some(next);
                    queue.push_back(u);
                }
            }
        }
        hops
    }

    fn reverse_adjacency(&self) -> Vec<Vec<(usize, f64)>> {
        let mut reverse = vec![Vec::new(); self.vertex_count()];
        for (from, edges) in self.adjacency.iter().enumerate() {
            for &(to, cost) in edges {
                reverse[to].push((from, cost));
            }
        }
        reverse
    }
}

impl SearchDomain for GraphWorld {
    type State = GraphState;

    fn start_state(&self) -> GraphState {
        GraphState {
            vertex: self.start,
            via: 0.0,
        }
    }

    fn is_goal(&self, state: &GraphState) -> bool {
        state.vertex == self.goal
    }

    fn heuristic(&self, state: &GraphState) -> f64 {
        self.h[state.vertex]
    }

    fn distance(&self, state: &GraphState) -> f64 {
        self.d[state.vertex]
    }

    fn edge_cost(&self, state: &GraphState) -> f64 {
        state.via
    }

    fn successors(&self, state: &GraphState) -> Vec<GraphState> {
        self.adjacency[state.vertex]
            .iter()
            .map(|&(vertex, via)| GraphState { vertex, via })
            .collect()
    }
}

impl SearchWorld for GraphWorld {
    #[allow(clippy::unnecessary_literal_bound)]
    fn world_id(&self) -> &str {
        "graph"
    }

    fn render_state(&self, state: &GraphState) -> String {
        format!("v{}", state.vertex)
    }
}
