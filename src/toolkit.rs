//! HEASOFT toolkit environment.
//!
//! The external computation is carried out by HEASOFT executables
//! (`xstar`, driven through generated command lines, plus `xstinitable`
//! and `xstar2table`). This module locates the installation from the
//! `$FTOOLS` and `$HEADAS` environment variables and resolves executable
//! and template paths against it. Missing variables are configuration
//! errors raised before any job is dispatched.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Generates the job list and the shared table descriptor.
pub const XSTINITABLE: &str = "xstinitable";
/// Merges per-job spectra into the combined table model.
pub const XSTAR2TABLE: &str = "xstar2table";
/// Sets optional `xstinitable` parameters ahead of a generation run.
pub const PSET: &str = "pset";

/// Locations of the toolkit's executables and shared parameter template.
#[derive(Debug, Clone)]
pub struct Toolkit {
    ftools_dir: PathBuf,
    headas_dir: PathBuf,
}

impl Toolkit {
    /// Locate the toolkit from `$FTOOLS` and `$HEADAS`.
    ///
    /// # Errors
    ///
    /// Returns `Error::ToolkitNotSet` if either variable is missing.
    pub fn from_env() -> Result<Self> {
        let ftools = std::env::var_os("FTOOLS").ok_or(Error::ToolkitNotSet("FTOOLS"))?;
        let headas = std::env::var_os("HEADAS").ok_or(Error::ToolkitNotSet("HEADAS"))?;
        Ok(Self::new(PathBuf::from(ftools), PathBuf::from(headas)))
    }

    /// Build a toolkit rooted at explicit paths.
    ///
    /// Useful for tests or non-standard installations.
    pub fn new(ftools_dir: PathBuf, headas_dir: PathBuf) -> Self {
        Self {
            ftools_dir,
            headas_dir,
        }
    }

    /// Directory holding the toolkit executables.
    pub fn bin_dir(&self) -> PathBuf {
        self.ftools_dir.join("bin")
    }

    /// Absolute path of a toolkit executable by name.
    pub fn resolve(&self, name: &str) -> PathBuf {
        self.bin_dir().join(name)
    }

    /// The shared template parameter file copied into each job directory.
    pub fn template_par(&self) -> PathBuf {
        self.headas_dir.join("syspfiles").join("xstar.par")
    }

    /// Verify the executables a run needs are actually present.
    pub fn check(&self) -> Result<()> {
        let bin_dir = self.bin_dir();
        for name in [XSTINITABLE, XSTAR2TABLE] {
            which::which_in(name, Some(&bin_dir), &self.ftools_dir)
                .map_err(|_| Error::ToolkitBinaryNotFound(name.to_string()))?;
        }
        Ok(())
    }

    pub fn ftools_dir(&self) -> &Path {
        &self.ftools_dir
    }

    pub fn headas_dir(&self) -> &Path {
        &self.headas_dir
    }
}
