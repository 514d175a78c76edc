mod common;

use common::*;
use fx_infra::error::Error;
use fx_infra::pipeline::Pipeline;

#[tokio::test]
async fn scenario_persistence_failure_still_returns_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("data");
    std::fs::write(&blocker, "not a directory").unwrap();

    let bcrp = ScriptedAdapter::quoting("bcrp", 3.7320, 3.7350);
    let mut pipeline = Pipeline::new(aggregator(&[bcrp]), blocker.join("history.csv"));

    let report = pipeline.run(false).await;

    assert!(!report.wrote());
    assert!(report.persistence_error().is_some());
    assert_eq!(report.snapshot.best_buy_source, Some(source("bcrp")));
    assert_eq!(report.snapshot.quotes[0].sell_rate(), Some(rate(3.735)));

    assert!(matches!(report.into_result(), Err(Error::IoError(_))));
}

#[tokio::test]
async fn scenario_foreign_header_is_a_persistence_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.csv");
    std::fs::write(&path, "timestamp,tc_bcrp_compra,tc_bcrp_venta\n2024-12-13 09:00:00,3.7,3.8\n").unwrap();

    let bcrp = ScriptedAdapter::quoting("bcrp", 3.7320, 3.7350);
    let mut pipeline = Pipeline::new(aggregator(&[bcrp]), &path);

    let report = pipeline.run(false).await;

    // Old layout has none of the tracked columns, so the run is a change
    assert!(report.snapshot.changed);
    assert!(matches!(report.persistence_error(), Some(Error::HistorySchemaMismatch { .. })));
    assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 2);
}
