//! Run directory persistence: write/read/verify a run envelope on disk.
//!
//! # Directory layout
//!
//! ```text
//! <dir>/
//!   run_envelope.json   : canonical JSON run envelope
//!   run_digest.txt      : ASCII digest string ("sha256:...")
//! ```
//!
//! The directory path is never part of any hash surface.
//!
//! # Fail-closed semantics
//!
//! - Missing file → error
//! - Extra file → error
//! - Malformed digest file → error
//! - Non-canonical envelope → error
//! - Digest mismatch → error

use std::path::Path;

use thiserror::Error;

use ees_search::canon::{
    canonical_hash, canonical_json_bytes, cost_from_bits, CanonError, ContentHash,
};

use crate::runner::{RunResult, DOMAIN_RUN_ENVELOPE};

const ENVELOPE_FILENAME: &str = "run_envelope.json";
const DIGEST_FILENAME: &str = "run_digest.txt";
const FILENAMES: &[&str] = &[ENVELOPE_FILENAME, DIGEST_FILENAME];

/// Error writing or reading a run directory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunDirError {
    #[error("I/O error: {detail}")]
    Io { detail: String },
    #[error("missing file: {filename}")]
    Missing { filename: &'static str },
    #[error("undeclared extra file: {name}")]
    ExtraFile { name: String },
    #[error("malformed digest: {stored}")]
    MalformedDigest { stored: String },
    #[error("run envelope parse error: {detail}")]
    Parse { detail: String },
    #[error("run envelope is not in canonical form")]
    NonCanonical,
    #[error("digest mismatch: stored={stored}, recomputed={recomputed}")]
    DigestMismatch { stored: String, recomputed: String },
    #[error("canonical JSON error: {0}")]
    Canon(#[from] CanonError),
}

fn io(err: &std::io::Error) -> RunDirError {
    RunDirError::Io {
        detail: err.to_string(),
    }
}

/// A verified run envelope loaded from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecordV1 {
    pub envelope: serde_json::Value,
    pub envelope_bytes: Vec<u8>,
    pub run_digest: ContentHash,
}

impl RunRecordV1 {
    /// `world_id` recorded in the envelope.
    #[must_use]
    pub fn world_id(&self) -> Option<&str> {
        self.envelope.get("world_id").and_then(serde_json::Value::as_str)
    }

    /// Solution cost decoded from the report's `cost_bits`, if solved.
    #[must_use]
    pub fn solution_cost(&self) -> Option<f64> {
        let bits = self.envelope.pointer("/report/outcome/cost_bits")?.as_str()?;
        cost_from_bits(bits)
    }
}

/// Write a run result to `dir`, creating it if needed.
///
/// # Errors
///
/// Returns [`RunDirError::Io`] on any filesystem failure.
pub fn write_run_dir<S>(result: &RunResult<S>, dir: &Path) -> Result<(), RunDirError> {
    std::fs::create_dir_all(dir).map_err(|e| io(&e))?;
    std::fs::write(dir.join(ENVELOPE_FILENAME), &result.envelope_bytes).map_err(|e| io(&e))?;
    std::fs::write(dir.join(DIGEST_FILENAME), result.run_digest.as_str()).map_err(|e| io(&e))?;
    Ok(())
}

/// Read and verify a run directory.
///
/// # Errors
///
/// Returns a [`RunDirError`] for any missing, extra, non-canonical, or
/// mismatching content.
pub fn read_run_dir(dir: &Path) -> Result<RunRecordV1, RunDirError> {
    for entry in std::fs::read_dir(dir).map_err(|e| io(&e))? {
        let name = entry.map_err(|e| io(&e))?.file_name().to_string_lossy().into_owned();
        if !FILENAMES.contains(&name.as_str()) {
            return Err(RunDirError::ExtraFile { name });
        }
    }

    let envelope_bytes = read_required(dir, ENVELOPE_FILENAME)?;
    let stored = read_required(dir, DIGEST_FILENAME)?;
    let stored = String::from_utf8_lossy(&stored).trim().to_string();
    let Some(stored) = ContentHash::parse(&stored) else {
        return Err(RunDirError::MalformedDigest { stored });
    };

    let envelope: serde_json::Value =
        serde_json::from_slice(&envelope_bytes).map_err(|e| RunDirError::Parse {
            detail: e.to_string(),
        })?;
    if canonical_json_bytes(&envelope)? != envelope_bytes {
        return Err(RunDirError::NonCanonical);
    }

    let recomputed = canonical_hash(DOMAIN_RUN_ENVELOPE, &envelope_bytes);
    if recomputed != stored {
        return Err(RunDirError::DigestMismatch {
            stored: stored.as_str().to_string(),
            recomputed: recomputed.as_str().to_string(),
        });
    }

    Ok(RunRecordV1 {
        envelope,
        envelope_bytes,
        run_digest: recomputed,
    })
}

fn read_required(dir: &Path, filename: &'static str) -> Result<Vec<u8>, RunDirError> {
    match std::fs::read(dir.join(filename)) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(RunDirError::Missing { filename })
        }
        Err(e) => Err(io(&e)),
    }
}
