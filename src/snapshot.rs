use std::collections::HashMap;
use crate::quotes::Quote;
use crate::types::ids::SourceId;
use crate::types::rate::Rate;
use crate::types::timestamp::Timestamp;

/// Reconciled result of one pipeline run.
///
/// Built by the aggregator, enriched in place by the spread calculator and
/// best-option resolver, finalized by the change detector. The pipeline hands
/// it back by value once the run is done.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub timestamp: Timestamp,
    /// One entry per configured source, in configured order.
    pub quotes: Vec<Quote>,
    /// Only successful quotes have a spread.
    pub spreads: HashMap<SourceId, Rate>,
    pub best_buy_source: Option<SourceId>,
    pub best_sell_source: Option<SourceId>,
    /// Soles per $1,000 the recommendations beat the worst quote by.
    pub buy_advantage: Option<Rate>,
    pub sell_advantage: Option<Rate>,
    pub changed: bool,
}

impl Snapshot {
    pub fn new(timestamp: Timestamp, quotes: Vec<Quote>) -> Self {
        Snapshot {
            timestamp,
            quotes,
            spreads: HashMap::new(),
            best_buy_source: None,
            best_sell_source: None,
            buy_advantage: None,
            sell_advantage: None,
            changed: false,
        }
    }

    pub fn quote(&self, source: &SourceId) -> Option<&Quote> {
        self.quotes.iter().find(|q| &q.source == source)
    }

    pub fn spread(&self, source: &SourceId) -> Option<Rate> {
        self.spreads.get(source).copied()
    }

    pub fn successful_quotes(&self) -> impl Iterator<Item = &Quote> {
        self.quotes.iter().filter(|q| q.is_success())
    }

    pub fn failed_quotes(&self) -> impl Iterator<Item = &Quote> {
        self.quotes.iter().filter(|q| !q.is_success())
    }

    pub fn has_recommendation(&self) -> bool {
        self.best_buy_source.is_some() && self.best_sell_source.is_some()
    }
}
