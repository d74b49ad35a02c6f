//! Result verification.
//!
//! Success of a job is decided here and only here, by the presence of the
//! expected output artifact in the job's working directory. Exit codes
//! are deliberately not consulted: a job that exited nonzero but wrote
//! the artifact counts as a success, and a job that exited zero without
//! writing it does not.

use crate::dispatch::job::JobSpec;

/// The artifact whose presence is the sole success signal for a job.
pub const ARTIFACT: &str = "xout_spect1.fits";

/// Which jobs failed verification, ascending by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationOutcome {
    pub failed_ids: Vec<String>,
}

impl VerificationOutcome {
    pub fn all_succeeded(&self) -> bool {
        self.failed_ids.is_empty()
    }
}

/// Inspect every job directory for the expected artifact.
///
/// Pure function of on-disk state at call time. Call only after the
/// dispatcher's barrier has returned, once every job's filesystem effects
/// are complete.
pub fn verify(jobs: &[JobSpec]) -> VerificationOutcome {
    let mut failed_ids: Vec<String> = jobs
        .iter()
        .filter(|job| !job.work_dir.join(ARTIFACT).exists())
        .map(|job| job.id.clone())
        .collect();
    failed_ids.sort();
    VerificationOutcome { failed_ids }
}
