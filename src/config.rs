use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::{Error, Result};

pub const DEFAULT_LOG_FILE: &str = "mxstar.log";
pub const DEFAULT_MAX_PROCESSES: usize = 4;

/// Run configuration: file-backed defaults, overridden by CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base output location; the run directory is created under it.
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
    /// Retain the combined log file after a successful aggregation.
    #[serde(default)]
    pub keep_log: bool,
    /// Log file name, resolved relative to the model directory.
    #[serde(default = "default_log_file")]
    pub log_file: String,
    /// Hard bound on concurrently executing jobs.
    #[serde(default = "default_max_processes")]
    pub max_processes: usize,
}

fn default_work_dir() -> PathBuf {
    PathBuf::from("./")
}

fn default_log_file() -> String {
    DEFAULT_LOG_FILE.to_string()
}

fn default_max_processes() -> usize {
    DEFAULT_MAX_PROCESSES
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            keep_log: false,
            log_file: default_log_file(),
            max_processes: default_max_processes(),
        }
    }
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| Error::Validation("No home directory".to_string()))?
            .join(".mxstar.toml"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(&path)?)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        fs::write(&path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Pre-flight sanity check; runs before anything is dispatched.
    pub fn validate(&self) -> Result<()> {
        if self.max_processes < 1 {
            return Err(Error::Validation(
                "max_processes must be at least 1".to_string(),
            ));
        }
        if self.log_file.is_empty() {
            return Err(Error::Validation("log_file cannot be empty".to_string()));
        }
        Ok(())
    }
}
