mod common;

use std::time::Duration;
use common::*;
use fx_infra::pipeline::scheduler::Scheduler;
use fx_infra::pipeline::Pipeline;

#[tokio::test]
async fn scenario_scheduler_runs_on_start() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.csv");

    let bcrp = ScriptedAdapter::quoting("bcrp", 3.7320, 3.7350);
    let pipeline = Pipeline::new(aggregator(&[bcrp]), &path);
    let scheduler = Scheduler::new(pipeline, Duration::from_secs(3600), true);

    let (pipeline, runs) = scheduler
        .run_until(tokio::time::sleep(Duration::from_millis(100)))
        .await;

    assert_eq!(runs, 1);
    assert_eq!(pipeline.history().records().unwrap().len(), 1);
}

#[tokio::test]
async fn scenario_scheduler_waits_when_not_running_on_start() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.csv");

    let bcrp = ScriptedAdapter::quoting("bcrp", 3.7320, 3.7350);
    let pipeline = Pipeline::new(aggregator(&[bcrp]), &path);
    let scheduler = Scheduler::new(pipeline, Duration::from_secs(3600), false);

    let (_, runs) = scheduler
        .run_until(tokio::time::sleep(Duration::from_millis(50)))
        .await;

    assert_eq!(runs, 0);
    assert!(!path.exists());
}
