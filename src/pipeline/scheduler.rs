use std::future::Future;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use crate::config::ScheduleConfig;
use crate::pipeline::{Persistence, Pipeline};

/// Periodic trigger: runs the pipeline (never forcing a write) every
/// `interval` until `shutdown` resolves. A failed run is logged and the
/// schedule carries on.
pub struct Scheduler {
    pipeline: Pipeline,
    interval: Duration,
    run_on_start: bool,
}

impl Scheduler {
    pub fn new(pipeline: Pipeline, interval: Duration, run_on_start: bool) -> Self {
        Scheduler {
            pipeline,
            interval,
            run_on_start,
        }
    }

    pub fn from_config(pipeline: Pipeline, config: &ScheduleConfig) -> Self {
        Self::new(pipeline, Duration::from_secs(config.interval_secs), config.run_on_start)
    }

    /// Returns the pipeline and the number of completed runs. A run in
    /// progress is finished before shutdown is observed.
    pub async fn run_until<F>(mut self, shutdown: F) -> (Pipeline, u64)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        if !self.run_on_start {
            ticker.tick().await;
        }

        tracing::info!("Scheduler started, running every {:?}", self.interval);
        tokio::pin!(shutdown);
        let mut runs = 0u64;

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    tracing::info!("Scheduler stopped after {} runs", runs);
                    break;
                }
                _ = ticker.tick() => {
                    let report = self.pipeline.run(false).await;
                    runs += 1;
                    if let Persistence::Failed(e) = &report.persistence {
                        tracing::error!("Scheduled run {} could not persist: {}", runs, e);
                    }
                }
            }
        }

        (self.pipeline, runs)
    }
}
