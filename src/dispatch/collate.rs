//! Collation of per-job spectra into one table model.
//!
//! Runs only when verification reported zero failures: the shared table
//! descriptor is copied to the three well-known output names, then
//! `xstar2table` folds each job's verified spectrum into them. The merge
//! runs sequentially in ascending id order; the downstream tool may be
//! sensitive to merge order.
//! The merge tool's own exit status is passed through unvalidated; spawn
//! and copy failures surface directly.

use std::path::Path;

use tokio::process::Command;

use crate::dispatch::job::JobSpec;
use crate::dispatch::verify::ARTIFACT;
use crate::joblist::DESCRIPTOR_FILE;
use crate::toolkit::{Toolkit, XSTAR2TABLE};
use crate::Result;

/// Names the shared descriptor is copied to before the merge.
pub const SHARED_OUTPUTS: [&str; 3] = ["xout_ain.fits", "xout_aout.fits", "xout_mtable.fits"];

/// Merge every job's spectrum into the combined table model.
pub async fn collate(
    toolkit: &Toolkit,
    run_dir: &Path,
    model_dir: &Path,
    jobs: &[JobSpec],
) -> Result<()> {
    let descriptor = run_dir.join(DESCRIPTOR_FILE);
    for name in SHARED_OUTPUTS {
        tokio::fs::copy(&descriptor, model_dir.join(name)).await?;
    }

    let mut ids: Vec<&str> = jobs.iter().map(|job| job.id.as_str()).collect();
    ids.sort_unstable();

    for id in ids {
        Command::new(toolkit.resolve(XSTAR2TABLE))
            .arg(format!("xstarspec=./{}/{}", id, ARTIFACT))
            .current_dir(model_dir)
            .status()
            .await?;
    }
    Ok(())
}
