mod common;

use common::*;
use fx_infra::pipeline::{Persistence, Pipeline};

#[tokio::test]
async fn scenario_all_sources_fail() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.csv");

    let bcrp = ScriptedAdapter::quoting("bcrp", 3.7320, 3.7350);
    let kambista = ScriptedAdapter::failing("kambista");
    let rextie = ScriptedAdapter::failing("rextie");
    let mut pipeline = Pipeline::new(aggregator(&[bcrp.clone(), kambista, rextie]), &path);
    pipeline.run(false).await;

    bcrp.fail();
    let report = pipeline.run(true).await;
    let snapshot = &report.snapshot;

    assert_eq!(snapshot.quotes.len(), 3);
    assert!(snapshot.quotes.iter().all(|q| !q.is_success()));
    assert_eq!(snapshot.best_buy_source, None);
    assert_eq!(snapshot.best_sell_source, None);
    assert!(snapshot.spreads.is_empty());
    assert!(matches!(report.persistence, Persistence::Written));

    let text = std::fs::read_to_string(&path).unwrap();
    let last_line = text.lines().last().unwrap();
    assert!(last_line.ends_with(",,,,,,,,,,,,true"));

    let last = pipeline.history().last_record().unwrap().unwrap();
    assert_eq!(last.get("bcrp_buy"), None);
    assert_eq!(last.get("best_buy"), None);
    assert_eq!(last.get("best_sell"), None);
}
