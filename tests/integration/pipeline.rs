//! End-to-end pipeline scenarios against the stub toolkit.
//!
//! Each test drives the same sequence the driver does: dispatch the
//! labeled jobs through a bounded pool, verify artifacts after the
//! barrier, and collate only when nothing failed.

use std::collections::HashSet;

use crate::fixtures::TestRun;
use mxstar::dispatch::{collate, verify, JobResult, ARTIFACT, SHARED_OUTPUTS};

async fn dispatch(run: &TestRun, capacity: usize) -> Vec<JobResult> {
    let (pool, _rx) = run.pool(capacity);
    let runner = run.runner();
    pool.dispatch(run.jobs.clone(), move |spec| {
        let runner = runner.clone();
        async move { runner.run(spec).await }
    })
    .await
    .expect("dispatch failed")
}

fn id_set(results: &[JobResult]) -> HashSet<String> {
    results.iter().map(|r| r.id.clone()).collect()
}

#[tokio::test]
async fn test_one_failed_job_blocks_collation() {
    let run = TestRun::new(&[
        "xstar modelname=photo job=1",
        "xstar modelname=photo nofits=1",
        "xstar modelname=photo job=3",
    ]);

    let results = dispatch(&run, 2).await;
    assert_eq!(results.len(), 3);
    assert_eq!(
        id_set(&results),
        ["1", "2", "3"].iter().map(|s| s.to_string()).collect()
    );

    let outcome = verify(&run.jobs);
    assert_eq!(outcome.failed_ids, vec!["2"]);

    // The driver never collates after a verification failure; nothing
    // should have touched the shared outputs.
    assert!(run.merge_calls().is_empty());
    for name in SHARED_OUTPUTS {
        assert!(!run.model_dir.join(name).exists());
    }
}

#[tokio::test]
async fn test_clean_run_collates_every_job() {
    let run = TestRun::new(&[
        "xstar modelname=photo job=1",
        "xstar modelname=photo job=2",
        "xstar modelname=photo job=3",
    ]);

    let results = dispatch(&run, 2).await;
    assert_eq!(results.len(), 3);

    let outcome = verify(&run.jobs);
    assert!(outcome.all_succeeded());

    collate(&run.toolkit, &run.run_dir, &run.model_dir, &run.jobs)
        .await
        .expect("collation failed");

    for name in SHARED_OUTPUTS {
        assert_eq!(
            std::fs::read_to_string(run.model_dir.join(name)).unwrap(),
            "DESCRIPTOR"
        );
    }
    let expected: Vec<String> = (1..=3)
        .map(|i| format!("xstarspec=./{}/{}", i, ARTIFACT))
        .collect();
    assert_eq!(run.merge_calls(), expected);
}

#[tokio::test]
async fn test_nonzero_exit_with_artifact_counts_as_success() {
    // The executor is a dumb runner: the artifact decides, not the exit
    // code.
    let run = TestRun::new(&[
        "xstar modelname=photo rc=3",
        "xstar modelname=photo job=2",
    ]);

    let results = dispatch(&run, 2).await;
    let noisy = results.iter().find(|r| r.id == "1").unwrap();
    assert_eq!(noisy.exit.unwrap().code(), Some(3));

    assert!(verify(&run.jobs).all_succeeded());
}

#[tokio::test]
async fn test_zero_exit_without_artifact_counts_as_failure() {
    let run = TestRun::new(&[
        "xstar modelname=photo nofits=1",
        "xstar modelname=photo job=2",
    ]);

    let results = dispatch(&run, 1).await;
    let quiet = results.iter().find(|r| r.id == "1").unwrap();
    assert!(quiet.exit.unwrap().success());

    assert_eq!(verify(&run.jobs).failed_ids, vec!["1"]);
}

#[tokio::test]
async fn test_each_job_sees_its_own_pfiles() {
    let run = TestRun::new(&[
        "xstar modelname=photo job=1",
        "xstar modelname=photo job=2",
        "xstar modelname=photo job=3",
        "xstar modelname=photo job=4",
    ]);

    let results = dispatch(&run, 4).await;
    for result in &results {
        let job = run.jobs.iter().find(|j| j.id == result.id).unwrap();
        assert!(
            result
                .output
                .contains(&format!("PFILES={}", job.work_dir.display())),
            "job {} leaked another worker's PFILES:\n{}",
            result.id,
            result.output
        );
    }
}

#[tokio::test]
async fn test_traces_carry_running_header_and_output() {
    let run = TestRun::new(&[
        "xstar modelname=photo job=1",
        "xstar modelname=photo job=2",
    ]);

    let mut results = dispatch(&run, 2).await;
    results.sort_by(|a, b| a.id.cmp(&b.id));

    for (result, job) in results.iter().zip(&run.jobs) {
        assert!(result
            .output
            .starts_with(&format!("Running: {}", job.work_dir.display())));
        assert!(result.output.contains("worker"));
    }
}
