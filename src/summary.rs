//! Run summary persistence.
//!
//! Assembled by the driver from the core's outputs, append-only while the
//! run is in flight, sealed and written once at the end. The summary is
//! kept even when the combined log file is discarded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::Result;

/// File name of the sealed summary inside the run directory.
pub const SUMMARY_FILE: &str = "mxstar_summary.json";

#[derive(Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Per-job output traces, ordered by ascending job id.
    pub per_job_logs: Vec<String>,
    /// Ids whose working directory lacked the expected artifact, ascending.
    pub failed_ids: Vec<String>,
}

impl RunSummary {
    /// Write the sealed summary into the run directory.
    ///
    /// Writes to a temporary file first and renames into place, so a crash
    /// mid-write never leaves a truncated summary behind.
    pub fn save(&self, run_dir: &Path) -> Result<PathBuf> {
        let path = run_dir.join(SUMMARY_FILE);
        let contents = serde_json::to_string_pretty(self)?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, &contents)?;
        fs::rename(&temp_path, &path)?;

        Ok(path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}
