use std::any::Any;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use futures_util::future::join_all;
use tokio::task::JoinError;
use tracing::Instrument;
use crate::error::{AdapterError, Error, Result};
use crate::observability::metrics::ADAPTER_FAILURES;
use crate::observability::tracing::trace_adapter_fetch;
use crate::quotes::adapter::SourceAdapter;
use crate::quotes::{PlausibilityBand, Quote};
use crate::snapshot::Snapshot;
use crate::types::ids::SourceId;
use crate::types::timestamp::Timestamp;

/// Queries every configured provider once per run and assembles the quotes
/// into a snapshot. A provider that errors, times out or panics shows up as a
/// failed quote; nothing escapes `aggregate`.
pub struct QuoteAggregator {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    band: PlausibilityBand,
    adapter_timeout: Option<Duration>,
}

impl QuoteAggregator {
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>, band: PlausibilityBand) -> Result<Self> {
        if adapters.is_empty() {
            return Err(Error::NoSourcesConfigured);
        }

        let mut seen = HashSet::new();
        for adapter in &adapters {
            if !seen.insert(adapter.source_id().clone()) {
                return Err(Error::DuplicateSource(adapter.source_id().to_string()));
            }
        }

        Ok(QuoteAggregator {
            adapters,
            band,
            adapter_timeout: None,
        })
    }

    /// Deadline applied on top of whatever the adapter does internally.
    pub fn with_adapter_timeout(mut self, timeout: Duration) -> Self {
        self.adapter_timeout = Some(timeout);
        self
    }

    /// Configured source order. Tie-breaks and the history columns follow it.
    pub fn source_order(&self) -> Vec<SourceId> {
        self.adapters.iter()
            .map(|a| a.source_id().clone())
            .collect()
    }

    pub async fn aggregate(&self, timestamp: Timestamp) -> Snapshot {
        let handles: Vec<_> = self.adapters.iter()
            .map(|adapter| {
                let adapter = Arc::clone(adapter);
                let timeout = self.adapter_timeout;
                let span = trace_adapter_fetch(adapter.source_id());

                tokio::spawn(
                    async move {
                        match timeout {
                            Some(limit) => tokio::time::timeout(limit, adapter.fetch())
                                .await
                                .unwrap_or(Err(AdapterError::Timeout(limit))),
                            None => adapter.fetch().await,
                        }
                    }
                    .instrument(span),
                )
            })
            .collect();

        let results = join_all(handles).await;

        let quotes = self.adapters.iter()
            .zip(results)
            .map(|(adapter, joined)| {
                let source = adapter.source_id().clone();
                let quote = match joined {
                    Ok(Ok(raw)) => self.band.validate(source, raw),
                    Ok(Err(e)) => Quote::failed(source, e.to_string()),
                    Err(e) => Quote::failed(source, describe_join_error(e)),
                };

                match quote.failure_reason() {
                    Some(reason) => {
                        ADAPTER_FAILURES.with_label_values(&[quote.source.as_str()]).inc();
                        tracing::warn!("Source {} failed: {}", quote.source, reason);
                    }
                    None => tracing::debug!(
                        "Source {} quoted buy={:?} sell={:?}",
                        quote.source,
                        quote.buy_rate(),
                        quote.sell_rate()
                    ),
                }

                quote
            })
            .collect();

        Snapshot::new(timestamp, quotes)
    }
}

fn describe_join_error(err: JoinError) -> String {
    if err.is_panic() {
        format!("adapter panicked: {}", panic_message(err.into_panic()))
    } else {
        format!("adapter task aborted: {}", err)
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
