pub mod config;
pub mod dispatch;
pub mod error;
pub mod joblist;
pub mod log;
pub mod rundir;
pub mod summary;
pub mod toolkit;

pub use config::Config;
pub use dispatch::{JobResult, JobSpec, VerificationOutcome, WorkerPool};
pub use error::{Error, Result};
pub use log::RunLog;
pub use toolkit::Toolkit;
