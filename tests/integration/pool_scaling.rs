//! Pool-capacity properties with simulated executors.
//!
//! Capacity affects throughput and timing only, never the outcome: for a
//! fixed set of jobs, the verified failed set must be identical whatever
//! the pool size. The simulated executors sleep for a deterministic
//! pseudo-random duration so completion order is thoroughly shuffled
//! between rounds.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::mpsc;

use mxstar::dispatch::{label_jobs, verify, JobResult, WorkerPool, ARTIFACT};

/// Deterministic per-id millisecond delay, varied by `salt` per round.
fn jitter(id: &str, salt: u64) -> u64 {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325 ^ salt;
    for b in id.bytes() {
        h ^= u64::from(b);
        h = h.wrapping_mul(0x0100_0000_01b3);
    }
    h % 23
}

/// Label 12 jobs in a fresh directory, dispatch simulated executors that
/// write the artifact for every id not in `failing`, and return the
/// verified failed set.
async fn simulated_batch(capacity: usize, salt: u64, failing: &[&str]) -> Vec<String> {
    let dir = TempDir::new().unwrap();
    let commands: Vec<String> = (1..=12).map(|i| format!("xstar job={}", i)).collect();
    let jobs = label_jobs(&commands, dir.path()).unwrap();

    let failing: Arc<HashSet<String>> =
        Arc::new(failing.iter().map(|s| s.to_string()).collect());
    let (tx, _rx) = mpsc::channel(1024);
    let pool = WorkerPool::new(capacity, tx);

    let results = pool
        .dispatch(jobs.clone(), move |spec| {
            let failing = failing.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(jitter(&spec.id, salt))).await;
                if !failing.contains(&spec.id) {
                    std::fs::write(spec.work_dir.join(ARTIFACT), "spectrum").unwrap();
                }
                JobResult {
                    id: spec.id,
                    output: String::new(),
                    exit: None,
                }
            }
        })
        .await
        .unwrap();

    assert_eq!(results.len(), jobs.len());
    verify(&jobs).failed_ids
}

#[tokio::test]
async fn test_failed_set_invariant_under_pool_size() {
    let expected = vec!["03".to_string(), "10".to_string()];

    for (round, capacity) in [1usize, 2, 3, 6, 12].into_iter().enumerate() {
        let failed = simulated_batch(capacity, round as u64 * 17 + 1, &["03", "10"]).await;
        assert_eq!(failed, expected, "capacity {} changed the outcome", capacity);
    }
}

#[tokio::test]
async fn test_clean_batch_stays_clean_at_any_capacity() {
    for capacity in [1usize, 4, 16] {
        let failed = simulated_batch(capacity, capacity as u64, &[]).await;
        assert!(failed.is_empty(), "capacity {} produced {:?}", capacity, failed);
    }
}

#[tokio::test]
async fn test_every_job_fails_when_nothing_writes() {
    let all: Vec<&str> = vec![
        "01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12",
    ];
    let failed = simulated_batch(3, 99, &all).await;

    let expected: Vec<String> = all.iter().map(|s| s.to_string()).collect();
    assert_eq!(failed, expected);
}
