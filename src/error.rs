use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("${0} not set; initialize HEASOFT and rerun")]
    ToolkitNotSet(&'static str),

    #[error("Toolkit binary not found: {0}")]
    ToolkitBinaryNotFound(String),

    #[error("Work directory is not usable: {path}: {reason}")]
    WorkDir { path: PathBuf, reason: String },

    #[error("Job directory already exists: {0}")]
    JobDirExists(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Empty job list: {0}")]
    EmptyJobList(PathBuf),

    #[error("Worker task failed: {0}")]
    TaskJoin(String),

    #[error("Worker pool shut down before all jobs were dispatched")]
    PoolClosed,
}

pub type Result<T> = std::result::Result<T, Error>;
