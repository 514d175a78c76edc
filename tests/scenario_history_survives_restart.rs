mod common;

use common::*;
use fx_infra::pipeline::Pipeline;

#[tokio::test]
async fn scenario_history_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.csv");

    {
        let bcrp = ScriptedAdapter::quoting("bcrp", 3.7320, 3.7350);
        let rextie = ScriptedAdapter::failing("rextie");
        let mut pipeline = Pipeline::new(aggregator(&[bcrp, rextie]), &path);
        assert!(pipeline.run(false).await.wrote());
    }

    // Fresh process, same quotes: the persisted baseline is picked up
    let bcrp = ScriptedAdapter::quoting("bcrp", 3.7320, 3.7350);
    let rextie = ScriptedAdapter::failing("rextie");
    let mut pipeline = Pipeline::new(aggregator(&[bcrp, rextie]), &path);

    let report = pipeline.run(false).await;
    assert!(!report.snapshot.changed);
    assert!(!report.wrote());
    assert_eq!(pipeline.history().records().unwrap().len(), 1);
}
