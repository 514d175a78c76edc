#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use fx_infra::error::AdapterError;
use fx_infra::quotes::adapter::SourceAdapter;
use fx_infra::quotes::aggregator::QuoteAggregator;
use fx_infra::quotes::{PlausibilityBand, RawQuote};
use fx_infra::types::ids::SourceId;
use fx_infra::types::rate::Rate;

/// Adapter whose next answer the test can change between runs.
pub struct ScriptedAdapter {
    id: SourceId,
    next: Mutex<Option<RawQuote>>,
    calls: AtomicUsize,
}

impl ScriptedAdapter {
    pub fn quoting(id: &str, buy: f64, sell: f64) -> Arc<Self> {
        Arc::new(ScriptedAdapter {
            id: SourceId::from(id),
            next: Mutex::new(Some(RawQuote::new(Rate::from_f64(buy), Rate::from_f64(sell)))),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(id: &str) -> Arc<Self> {
        Arc::new(ScriptedAdapter {
            id: SourceId::from(id),
            next: Mutex::new(None),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn set(&self, buy: f64, sell: f64) {
        *self.next.lock().unwrap() = Some(RawQuote::new(Rate::from_f64(buy), Rate::from_f64(sell)));
    }

    pub fn fail(&self) {
        *self.next.lock().unwrap() = None;
    }

    /// Number of `fetch` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceAdapter for ScriptedAdapter {
    fn source_id(&self) -> &SourceId {
        &self.id
    }

    async fn fetch(&self) -> Result<RawQuote, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = *self.next.lock().unwrap();
        next.ok_or_else(|| AdapterError::Transport(format!("{} unreachable", self.id)))
    }
}

pub fn aggregator(adapters: &[Arc<ScriptedAdapter>]) -> QuoteAggregator {
    let adapters = adapters.iter()
        .map(|a| Arc::clone(a) as Arc<dyn SourceAdapter>)
        .collect();
    QuoteAggregator::new(adapters, PlausibilityBand::default()).unwrap()
}

pub fn rate(value: f64) -> Rate {
    Rate::from_f64(value)
}

pub fn source(id: &str) -> SourceId {
    SourceId::from(id)
}
