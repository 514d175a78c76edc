pub mod scheduler;

use std::path::Path;
use std::time::Instant;
use tracing::Instrument;
use crate::config::loader::AppConfig;
use crate::error::{Error, Result};
use crate::observability::metrics::{
    PERSISTENCE_FAILURES, PIPELINE_RUNS, RUNS_WITHOUT_RECOMMENDATION, RUN_LATENCY,
};
use crate::observability::tracing::trace_pipeline_run;
use crate::persistence::history_log::HistoryLog;
use crate::persistence::record::HistoricalRecord;
use crate::persistence::schema::HistorySchema;
use crate::quotes::aggregator::QuoteAggregator;
use crate::quotes::connectors::build_adapter;
use crate::reconcile::best_option::BestOptionResolver;
use crate::reconcile::change_detector::ChangeDetector;
use crate::reconcile::spread::SpreadCalculator;
use crate::snapshot::Snapshot;
use crate::types::ids::SourceId;
use crate::types::timestamp::Timestamp;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Collecting,
    Deriving,
    DecidingPersistence,
    Done,
}

/// What happened to the history log during a run.
#[derive(Debug)]
pub enum Persistence {
    Written,
    /// Nothing changed and no write was forced.
    Skipped,
    /// Storage fault. Provider faults never end up here.
    Failed(Error),
}

/// Outcome of one run. The snapshot is always present, even when the write
/// failed, so callers can display the latest values unconditionally.
#[derive(Debug)]
pub struct RunReport {
    pub snapshot: Snapshot,
    pub persistence: Persistence,
}

impl RunReport {
    pub fn wrote(&self) -> bool {
        matches!(self.persistence, Persistence::Written)
    }

    pub fn persistence_error(&self) -> Option<&Error> {
        match &self.persistence {
            Persistence::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Treat a failed write as a failed run.
    pub fn into_result(self) -> Result<Snapshot> {
        match self.persistence {
            Persistence::Failed(e) => Err(e),
            Persistence::Written | Persistence::Skipped => Ok(self.snapshot),
        }
    }
}

/// One aggregation run: collect quotes, derive spreads and recommendations,
/// compare against history, append when something changed (or when forced).
/// The pipeline is the only writer of its history log.
pub struct Pipeline {
    aggregator: QuoteAggregator,
    history: HistoryLog,
    detector: ChangeDetector,
    stage: PipelineStage,
}

impl Pipeline {
    pub fn new(aggregator: QuoteAggregator, history_path: impl AsRef<Path>) -> Self {
        let schema = HistorySchema::new(aggregator.source_order());

        Pipeline {
            detector: ChangeDetector::new(&schema),
            history: HistoryLog::new(history_path, schema),
            aggregator,
            stage: PipelineStage::Idle,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let adapters = config.sources.iter()
            .map(build_adapter)
            .collect::<Result<Vec<_>>>()?;

        let mut aggregator = QuoteAggregator::new(adapters, config.plausibility.band())?;
        if let Some(timeout) = config.adapter_timeout() {
            aggregator = aggregator.with_adapter_timeout(timeout);
        }

        Ok(Self::new(aggregator, &config.history_path))
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub async fn run(&mut self, force_write: bool) -> RunReport {
        let span = trace_pipeline_run(force_write);
        self.run_inner(force_write).instrument(span).await
    }

    async fn run_inner(&mut self, force_write: bool) -> RunReport {
        let started = Instant::now();
        PIPELINE_RUNS.inc();

        self.enter(PipelineStage::Collecting);
        let mut snapshot = self.aggregator.aggregate(Timestamp::now()).await;

        self.enter(PipelineStage::Deriving);
        SpreadCalculator::apply(&mut snapshot);
        BestOptionResolver::apply(&mut snapshot);
        if !snapshot.has_recommendation() {
            RUNS_WITHOUT_RECOMMENDATION.inc();
        }

        self.enter(PipelineStage::DecidingPersistence);
        let previous = match self.history.last_record() {
            Ok(previous) => previous,
            Err(e) => {
                PERSISTENCE_FAILURES.inc();
                tracing::error!("Could not read last history record, comparing against nothing: {}", e);
                None
            }
        };
        snapshot.changed = self.detector.has_changed(&snapshot, previous.as_ref());

        let persistence = if snapshot.changed || force_write {
            let record = HistoricalRecord::from_snapshot(&snapshot, self.history.schema());
            match self.history.append(&record) {
                Ok(()) => Persistence::Written,
                Err(e) => {
                    PERSISTENCE_FAILURES.inc();
                    tracing::error!("Failed to persist snapshot {}: {}", snapshot.timestamp, e);
                    Persistence::Failed(e)
                }
            }
        } else {
            tracing::info!("No changes detected, history not updated");
            Persistence::Skipped
        };

        self.enter(PipelineStage::Done);
        log_summary(&snapshot, &persistence);
        RUN_LATENCY.observe(started.elapsed().as_secs_f64());

        RunReport { snapshot, persistence }
    }

    fn enter(&mut self, stage: PipelineStage) {
        tracing::debug!("Pipeline stage {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }
}

fn log_summary(snapshot: &Snapshot, persistence: &Persistence) {
    tracing::info!("Run summary at {}", snapshot.timestamp);
    for quote in &snapshot.quotes {
        match (quote.buy_rate(), quote.sell_rate()) {
            (Some(buy), Some(sell)) => tracing::info!("  {}: buy={}, sell={}", quote.source, buy, sell),
            _ => tracing::info!(
                "  {}: failed ({})",
                quote.source,
                quote.failure_reason().unwrap_or("unknown")
            ),
        }
    }

    let best = |source: &Option<SourceId>| {
        source.as_ref().map(|s| s.to_string()).unwrap_or_else(|| "none".to_string())
    };
    tracing::info!("  Best to buy USD: {}", best(&snapshot.best_buy_source));
    if let Some(saving) = snapshot.buy_advantage {
        tracing::info!("    saves S/ {} per $1,000", saving);
    }
    tracing::info!("  Best to sell USD: {}", best(&snapshot.best_sell_source));
    if let Some(gain) = snapshot.sell_advantage {
        tracing::info!("    earns S/ {} more per $1,000", gain);
    }
    tracing::info!("  Changed: {}, persistence: {:?}", snapshot.changed, persistence);
}
