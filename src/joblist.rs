//! Job-list acquisition.
//!
//! A run needs an ordered list of XSTAR command strings, one per line.
//! Either the caller supplies an existing joblist file (imported into the
//! run directory together with its table-descriptor sibling), or
//! `xstinitable` is driven to generate one: optional parameters are set
//! with `pset` first, then `xstinitable` runs interactively with the
//! required physical parameters in their canonical order and writes
//! `xstinitable.lis` plus `xstinitable.fits` into the run directory.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::toolkit::{Toolkit, PSET, XSTINITABLE};
use crate::{Error, Result};

/// Canonical file name of the generated command list.
pub const JOBLIST_FILE: &str = "xstinitable.lis";
/// Canonical file name of the shared table descriptor used at collation.
pub const DESCRIPTOR_FILE: &str = "xstinitable.fits";

/// Required `xstinitable` arguments, in the order the tool expects them.
pub const REQUIRED_PARAMS: [&str; 13] = [
    "spectrum",
    "trad",
    "cfrac",
    "density",
    "rlrad",
    "column",
    "columnint",
    "columnsof",
    "columnnst",
    "rlogxi",
    "rlogxiint",
    "rlogxisof",
    "rlogxinst",
];

/// Partition raw CLI arguments into canonically ordered required
/// parameters and pass-through optional (`pset`) parameters.
pub fn split_args(args: &[String]) -> (Vec<String>, Vec<String>) {
    let mut required: Vec<(usize, String)> = Vec::new();
    let mut optional: Vec<String> = Vec::new();

    for arg in args {
        let name = arg.split('=').next().unwrap_or("");
        match REQUIRED_PARAMS.iter().position(|p| *p == name) {
            Some(index) => required.push((index, arg.clone())),
            None => optional.push(arg.clone()),
        }
    }

    required.sort_by_key(|(index, _)| *index);
    (required.into_iter().map(|(_, arg)| arg).collect(), optional)
}

/// Obtain the joblist for this run, returning its path in the run
/// directory.
///
/// If the first argument names an existing file it is imported; otherwise
/// the arguments are handed to `xstinitable`.
pub fn acquire(args: &[String], toolkit: &Toolkit, run_dir: &Path) -> Result<PathBuf> {
    match args.first().map(Path::new) {
        Some(source) if source.is_file() => import(source, run_dir),
        _ => generate(args, toolkit, run_dir),
    }
}

/// Copy a caller-supplied joblist (and its `.lis`/`.fits` sibling, when
/// present) into the run directory under the canonical names. The caller
/// may name either file of the pair.
fn import(source: &Path, run_dir: &Path) -> Result<PathBuf> {
    std::fs::copy(source, run_dir.join(canonical_name(source)))?;

    let sibling = source.with_extension(match source.extension().and_then(|e| e.to_str()) {
        Some("fits") => "lis",
        _ => "fits",
    });
    if sibling.is_file() {
        std::fs::copy(&sibling, run_dir.join(canonical_name(&sibling)))?;
    }

    Ok(run_dir.join(JOBLIST_FILE))
}

fn canonical_name(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("fits") => DESCRIPTOR_FILE,
        _ => JOBLIST_FILE,
    }
}

/// Drive `pset`/`xstinitable` to produce a fresh joblist in the run
/// directory. `xstinitable` runs with inherited stdio so it can prompt
/// for any physical parameters not supplied on the command line.
fn generate(args: &[String], toolkit: &Toolkit, run_dir: &Path) -> Result<PathBuf> {
    let (required, optional) = split_args(args);

    for arg in &optional {
        let status = Command::new(toolkit.resolve(PSET))
            .arg(XSTINITABLE)
            .arg(arg)
            .current_dir(run_dir)
            .status()?;
        if !status.success() {
            return Err(Error::Validation(format!(
                "pset {} {} exited with {}",
                XSTINITABLE, arg, status
            )));
        }
    }

    let status = Command::new(toolkit.resolve(XSTINITABLE))
        .args(&required)
        .current_dir(run_dir)
        .status()?;
    if !status.success() {
        return Err(Error::Validation(format!(
            "{} exited with {}",
            XSTINITABLE, status
        )));
    }

    Ok(run_dir.join(JOBLIST_FILE))
}

/// Read the ordered command strings from a joblist file.
pub fn read_commands(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    let commands: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    if commands.is_empty() {
        return Err(Error::EmptyJobList(path.to_path_buf()));
    }
    Ok(commands)
}
