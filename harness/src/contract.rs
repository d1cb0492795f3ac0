//! World contract: what a world must provide to be run by the harness.
//!
//! A world is a [`SearchDomain`] with a stable identifier and a textual
//! state rendering. Worlds may NOT implement hashing, report writing, or
//! policy handling; those are runner concerns.

use thiserror::Error;

use ees_search::contract::SearchDomain;

/// A search domain the runner can execute and report on.
pub trait SearchWorld: SearchDomain {
    /// Unique world identifier (e.g., `"grid"`).
    fn world_id(&self) -> &str;

    /// Stable, human-readable form of a state for reports.
    ///
    /// Must be injective over reachable states: report digests depend on it.
    fn render_state(&self, state: &Self::State) -> String;
}

/// Typed failure while constructing a world from its description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    /// The description is malformed.
    #[error("malformed world description at {location}: {detail}")]
    Malformed { location: String, detail: String },
    /// A required marker (start, goal) is missing or repeated.
    #[error("world must contain exactly one {marker}, found {found}")]
    Marker { marker: &'static str, found: usize },
}
