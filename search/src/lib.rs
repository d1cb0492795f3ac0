//! Explicit Estimation Search: bounded-suboptimal best-first search.
//!
//! Given a [`SearchDomain`] with an admissible heuristic and a distance-to-go
//! estimate, [`EesSearch`] returns a goal whose cost is at most `w` times
//! optimal, steering expansions with online estimates of heuristic error.
//!
//! # Key types
//!
//! - [`EesSearch`]: the engine; one instance per run
//! - [`SearchPolicyV1`]: bound, focal confidence, variance default, tie-break
//! - [`BiasModel`]: global one-step error estimator consumed by the engine
//! - [`SearchReportV1`]: counters and solution path written by a run
//! - [`OrderedFrontier`]: `fHat`-ordered frontier with a threshold cursor

#![forbid(unsafe_code)]

pub mod bias;
pub mod canon;
pub mod closed;
pub mod contract;
pub mod error;
pub mod frontier;
pub mod node;
pub mod policy;
pub mod queue;
pub mod report;
pub mod search;
pub mod variance;

pub use bias::{BiasModel, GlobalAverageBias, NoBias};
pub use contract::SearchDomain;
pub use error::SearchError;
pub use frontier::OrderedFrontier;
pub use policy::{SearchPolicyV1, TieBreakV1};
pub use report::{SearchOutcome, SearchReportV1, SelectionSourceV1};
pub use search::EesSearch;
