//! Harness runner: executes a world under a policy and binds the result to
//! content hashes.
//!
//! # Pipeline
//!
//! ```text
//! policy.validate() → policy.digest()
//!   → EesSearch::new(world, bias, policy) → run(report)
//!   → report digest → run envelope (world + policy + bias + report)
//!   → canonical bytes → run digest
//! ```

use serde_json::json;
use thiserror::Error;

use ees_search::bias::{BiasModel, GlobalAverageBias, NoBias};
use ees_search::canon::{canonical_hash, canonical_json_bytes, CanonError, ContentHash};
use ees_search::error::SearchError;
use ees_search::policy::SearchPolicyV1;
use ees_search::report::{SearchOutcome, SearchReportV1};
use ees_search::search::EesSearch;

use crate::contract::SearchWorld;

/// Domain prefix for run envelope hashing.
pub const DOMAIN_RUN_ENVELOPE: &[u8] = b"EES::RUN_ENVELOPE::V1\0";

/// Which bias estimator a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BiasChoiceV1 {
    /// [`GlobalAverageBias`]: running means of one-step errors.
    #[default]
    GlobalAverage,
    /// [`NoBias`]: corrected estimates equal raw ones.
    Uncorrected,
}

impl BiasChoiceV1 {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GlobalAverage => "global_average",
            Self::Uncorrected => "uncorrected",
        }
    }

    fn build(self) -> Box<dyn BiasModel> {
        match self {
            Self::GlobalAverage => Box::new(GlobalAverageBias::new()),
            Self::Uncorrected => Box::new(NoBias),
        }
    }
}

/// Everything the runner needs besides the world.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunConfig {
    pub policy: SearchPolicyV1,
    pub bias: BiasChoiceV1,
}

impl RunConfig {
    #[must_use]
    pub fn new(policy: SearchPolicyV1, bias: BiasChoiceV1) -> Self {
        Self { policy, bias }
    }
}

/// Error during a harness run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// Pre-flight search failure (invalid policy).
    #[error("search setup failed: {0}")]
    Search(#[from] SearchError),
    /// A report or envelope could not be canonicalized.
    #[error("canonical JSON failed: {0}")]
    Canon(#[from] CanonError),
}

/// Result of one harness run.
#[derive(Debug, Clone)]
pub struct RunResult<S> {
    pub world_id: String,
    pub outcome: SearchOutcome,
    pub report: SearchReportV1<S>,
    /// Digest of the report alone.
    pub report_digest: ContentHash,
    /// Digest of the policy snapshot.
    pub policy_digest: ContentHash,
    /// Canonical bytes of the run envelope.
    pub envelope_bytes: Vec<u8>,
    /// `canonical_hash(DOMAIN_RUN_ENVELOPE, envelope_bytes)`.
    pub run_digest: ContentHash,
}

/// Run `world` once under `config`.
///
/// # Errors
///
/// Returns [`RunError::Search`] if the policy is invalid and
/// [`RunError::Canon`] if an artifact cannot be canonicalized.
pub fn run_world<W: SearchWorld>(
    world: &W,
    config: &RunConfig,
) -> Result<RunResult<W::State>, RunError> {
    let policy_digest = config.policy.digest()?;
    let engine = EesSearch::new(world, config.bias.build(), config.policy.clone())?;

    let mut report = SearchReportV1::new();
    let outcome = engine.run(&mut report);

    let render = |s: &W::State| world.render_state(s);
    let report_digest = report.digest(render)?;
    let envelope = json!({
        "bias": config.bias.as_str(),
        "policy": config.policy.to_json(),
        "policy_digest": policy_digest.as_str(),
        "report": report.to_json(render),
        "report_digest": report_digest.as_str(),
        "schema_version": "run_envelope.v1",
        "world_id": world.world_id(),
    });
    let envelope_bytes = canonical_json_bytes(&envelope)?;
    let run_digest = canonical_hash(DOMAIN_RUN_ENVELOPE, &envelope_bytes);

    tracing::info!(
        world = world.world_id(),
        solved = outcome.is_solved(),
        expanded = report.nodes_expanded,
        run_digest = run_digest.as_str(),
        "harness run complete"
    );

    Ok(RunResult {
        world_id: world.world_id().to_string(),
        outcome,
        report,
        report_digest,
        policy_digest,
        envelope_bytes,
        run_digest,
    })
}
