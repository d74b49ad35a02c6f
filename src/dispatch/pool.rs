//! Bounded worker-pool dispatch.
//!
//! The pool runs one executor call per labeled job with at most
//! `capacity` in flight. It emits lifecycle events via a channel (the
//! receiver may be dropped; sends are best-effort) and blocks the caller
//! until every job has produced a result, a full barrier, because
//! verification and collation need complete knowledge of every job's
//! artifact before they can run.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

use crate::dispatch::job::{JobResult, JobSpec};
use crate::{Error, Result};

/// Events emitted by the pool for job lifecycle changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    /// A job has been admitted to an execution slot.
    Started {
        /// The job that started.
        id: String,
    },
    /// A job's executor call returned.
    Finished {
        /// The job that finished.
        id: String,
    },
}

/// Bounded set of execution slots for one dispatch batch.
///
/// # Example
///
/// ```ignore
/// use tokio::sync::mpsc;
/// use mxstar::dispatch::WorkerPool;
///
/// let (tx, mut rx) = mpsc::channel(100);
/// let pool = WorkerPool::new(4, tx);
/// let results = pool.dispatch(jobs, move |spec| {
///     let runner = runner.clone();
///     async move { runner.run(spec).await }
/// }).await?;
/// ```
pub struct WorkerPool {
    /// Maximum number of jobs executing concurrently.
    capacity: usize,
    /// Channel for emitting job events.
    event_tx: mpsc::Sender<JobEvent>,
}

impl WorkerPool {
    /// Create a pool with the given capacity.
    pub fn new(capacity: usize, event_tx: mpsc::Sender<JobEvent>) -> Self {
        Self { capacity, event_tx }
    }

    /// Maximum number of jobs executing concurrently.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Run the executor once per job, at most `capacity` at a time.
    ///
    /// A slot freed by a finishing job immediately admits the next
    /// unstarted job; no batching, no priorities, no job is ever split
    /// across slots. Returns when **all** jobs have produced a result.
    /// Result order is completion order; each result carries its own id,
    /// so callers re-establish input order by sorting.
    ///
    /// A job's own failure is never pool-fatal (executors report trouble
    /// inside their `JobResult`); only a failure of the pooling mechanism
    /// itself aborts the batch.
    pub async fn dispatch<R, Fut>(&self, jobs: Vec<JobSpec>, run: R) -> Result<Vec<JobResult>>
    where
        R: Fn(JobSpec) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = JobResult> + Send + 'static,
    {
        let total = jobs.len();
        let semaphore = Arc::new(Semaphore::new(self.capacity));
        let run = Arc::new(run);
        let mut workers: JoinSet<Result<JobResult>> = JoinSet::new();

        for spec in jobs {
            let semaphore = semaphore.clone();
            let run = run.clone();
            let event_tx = self.event_tx.clone();
            workers.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| Error::PoolClosed)?;

                let id = spec.id.clone();
                let _ = event_tx.send(JobEvent::Started { id: id.clone() }).await;
                let result = run(spec).await;
                let _ = event_tx.send(JobEvent::Finished { id }).await;
                Ok(result)
            });
        }

        let mut results = Vec::with_capacity(total);
        while let Some(joined) = workers.join_next().await {
            let result = joined.map_err(|e| Error::TaskJoin(e.to_string()))??;
            results.push(result);
        }
        Ok(results)
    }
}
