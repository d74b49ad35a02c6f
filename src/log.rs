//! Run-scoped logging.
//!
//! Each run owns one `RunLog`: a sink that mirrors every message to stdout
//! and appends it to the run's combined log file. The sink is passed
//! explicitly to the components that report progress and lives exactly as
//! long as one run; after a fully successful aggregation the file is
//! removed unless the run was configured to keep it.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::Result;

/// Combined log sink for one run (file + console).
#[derive(Clone)]
pub struct RunLog {
    file: Arc<Mutex<File>>,
    path: PathBuf,
}

impl RunLog {
    /// Open the log file, truncating any previous contents.
    pub fn create(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Self {
            file: Arc::new(Mutex::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write one message to the console and the log file.
    ///
    /// Write failures are swallowed: losing a log line must never abort
    /// the run it describes.
    pub fn info(&self, msg: &str) {
        println!("{}", msg);
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{}", msg);
        }
    }

    /// Delete the log file (the `keep_log = false` path).
    pub fn remove(self) -> Result<()> {
        std::fs::remove_file(&self.path)?;
        Ok(())
    }
}
