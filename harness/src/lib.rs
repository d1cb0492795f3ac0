//! EES Harness: worlds, runs, and run artifacts for the search engine.
//!
//! The harness runs a world through [`ees_search::EesSearch`] and binds the
//! outcome, report, and policy into a content-addressed run envelope.
//!
//! The harness does NOT implement search logic; it delegates to the engine.
//! Worlds provide domain data only; the harness owns orchestration.

#![forbid(unsafe_code)]

pub mod contract;
pub mod run_dir;
pub mod runner;
pub mod worlds;
