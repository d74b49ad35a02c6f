//! Job labeling.
//!
//! Raw command strings become `JobSpec`s: each gets a fixed-width,
//! zero-padded decimal id assigned by input order and a freshly created
//! working directory named after that id. Ids sort lexicographically in
//! the same order they were assigned, so every report downstream can
//! simply sort strings.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use crate::{Error, Result};

/// One labeled job: identifier, isolated working directory, command line.
///
/// Immutable after labeling; ids and pad width never change for the
/// lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    pub id: String,
    pub work_dir: PathBuf,
    pub command_line: String,
}

/// Outcome of one executed job. Produced exactly once per `JobSpec`.
#[derive(Debug, Clone)]
pub struct JobResult {
    pub id: String,
    /// Human-readable trace: `Running: <dir>`, the process id, then the
    /// captured standard output, newline-joined.
    pub output: String,
    /// Exit information, opaque to the pipeline: verification never
    /// consults it.
    pub exit: Option<ExitStatus>,
}

/// Zero-padding width for a batch of `count` jobs.
pub fn pad_width(count: usize) -> usize {
    count.to_string().len()
}

/// Label the command strings and create one working directory per job.
///
/// A pre-existing directory with a job's name means the output location
/// is not fresh; that is `Error::JobDirExists`, propagated, never
/// retried.
pub fn label_jobs(commands: &[String], model_dir: &Path) -> Result<Vec<JobSpec>> {
    if commands.is_empty() {
        return Err(Error::Validation(
            "cannot label an empty job list".to_string(),
        ));
    }

    let width = pad_width(commands.len());
    let mut jobs = Vec::with_capacity(commands.len());

    for (index, command) in commands.iter().enumerate() {
        let id = format!("{:0width$}", index + 1, width = width);
        let work_dir = model_dir.join(&id);
        match std::fs::create_dir(&work_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(Error::JobDirExists(work_dir));
            }
            Err(e) => return Err(e.into()),
        }
        jobs.push(JobSpec {
            id,
            work_dir,
            command_line: command.clone(),
        });
    }

    Ok(jobs)
}
