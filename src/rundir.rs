//! Work and run directory bookkeeping.
//!
//! Every invocation gets a fresh `mxstar.<n>` run directory under the base
//! work directory; the model directory beneath it (named after the job
//! group's `modelname` parameter) holds the numbered per-job directories
//! and the merged outputs.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::{Error, Result};

/// Prefix of per-run directories created under the work directory.
pub const RUN_DIR_PREFIX: &str = "mxstar.";

/// Regex capturing the `modelname=` value of a job command line, with or
/// without surrounding quotes.
static MODEL_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"modelname=['"]?([^'"\s]+)"#).unwrap());

/// Probe that the base work directory exists and is writable.
pub fn check_work_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(Error::WorkDir {
            path: path.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }
    let probe = path.join(".mxstar_write_probe");
    std::fs::write(&probe, b"").map_err(|e| Error::WorkDir {
        path: path.to_path_buf(),
        reason: format!("not writable: {}", e),
    })?;
    std::fs::remove_file(&probe)?;
    Ok(())
}

/// Create the first free `mxstar.<n>` directory (n starting at 1).
///
/// The create itself is the existence check, so two concurrent runs can
/// never claim the same suffix.
pub fn create_run_dir(work_dir: &Path) -> Result<PathBuf> {
    let mut n: u32 = 1;
    loop {
        let candidate = work_dir.join(format!("{}{}", RUN_DIR_PREFIX, n));
        match std::fs::create_dir(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Extract the model name from a job command line.
pub fn model_name(command: &str) -> Result<String> {
    MODEL_NAME_RE
        .captures(command)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| {
            Error::Validation(format!("no modelname parameter in command: {}", command))
        })
}
