//! The dispatch pipeline: label, execute, verify, collate.
//!
//! Components depend strictly downward: the labeler produces `JobSpec`s,
//! the executor runs one of them, the worker pool runs many executors
//! under a concurrency bound, the verifier inspects every job directory
//! after the pool's barrier, and the collation trigger merges the spectra
//! only when the verifier reported zero failures.

mod collate;
mod executor;
mod job;
mod pool;
mod verify;

pub use collate::{collate, SHARED_OUTPUTS};
pub use executor::XstarRunner;
pub use job::{label_jobs, pad_width, JobResult, JobSpec};
pub use pool::{JobEvent, WorkerPool};
pub use verify::{verify, VerificationOutcome, ARTIFACT};
