use lazy_static::lazy_static;
use prometheus::{
    Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry,
};
use crate::error::Result;

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // Pipeline metrics
    pub static ref PIPELINE_RUNS: IntCounter = IntCounter::new(
        "pipeline_runs_total",
        "Total number of pipeline runs"
    ).unwrap();

    pub static ref RUNS_WITHOUT_RECOMMENDATION: IntCounter = IntCounter::new(
        "runs_without_recommendation_total",
        "Runs where no source produced a usable quote"
    ).unwrap();

    // Source metrics
    pub static ref ADAPTER_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new("adapter_failures_total", "Failed quotes by source"),
        &["source"]
    ).unwrap();

    // History metrics
    pub static ref HISTORY_ROWS_APPENDED: IntCounter = IntCounter::new(
        "history_rows_appended_total",
        "Rows appended to the history log"
    ).unwrap();

    pub static ref PERSISTENCE_FAILURES: IntCounter = IntCounter::new(
        "persistence_failures_total",
        "History log reads or writes that failed"
    ).unwrap();

    // Latency metrics
    pub static ref RUN_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "pipeline_run_latency_seconds",
            "End-to-end pipeline run latency"
        ).buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0])
    ).unwrap();
}

pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(PIPELINE_RUNS.clone()))?;
    REGISTRY.register(Box::new(RUNS_WITHOUT_RECOMMENDATION.clone()))?;
    REGISTRY.register(Box::new(ADAPTER_FAILURES.clone()))?;
    REGISTRY.register(Box::new(HISTORY_ROWS_APPENDED.clone()))?;
    REGISTRY.register(Box::new(PERSISTENCE_FAILURES.clone()))?;
    REGISTRY.register(Box::new(RUN_LATENCY.clone()))?;
    Ok(())
}
