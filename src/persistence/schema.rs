use crate::quotes::Quote;
use crate::types::ids::SourceId;
use crate::types::rate::Rate;

pub const TIMESTAMP_COLUMN: &str = "timestamp";
pub const BEST_BUY_COLUMN: &str = "best_buy";
pub const BEST_SELL_COLUMN: &str = "best_sell";
pub const CHANGED_COLUMN: &str = "changed";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateSide {
    Buy,
    Sell,
}

impl RateSide {
    pub fn rate_of(&self, quote: &Quote) -> Option<Rate> {
        match self {
            RateSide::Buy => quote.buy_rate(),
            RateSide::Sell => quote.sell_rate(),
        }
    }
}

/// A rate column the change detector compares against history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackedField {
    pub source: SourceId,
    pub side: RateSide,
    pub column: String,
}

/// Column layout of the history log, derived once from the configured
/// source order. The writer and the change detector both read it from here,
/// so the tracked set cannot drift between them.
///
/// Layout: `timestamp`, `<src>_buy`/`<src>_sell` per source,
/// `spread_<src>` per source, `best_buy`, `best_sell`, `changed`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistorySchema {
    sources: Vec<SourceId>,
}

impl HistorySchema {
    pub fn new(sources: Vec<SourceId>) -> Self {
        HistorySchema { sources }
    }

    pub fn sources(&self) -> &[SourceId] {
        &self.sources
    }

    pub fn buy_column(source: &SourceId) -> String {
        format!("{}_buy", source)
    }

    pub fn sell_column(source: &SourceId) -> String {
        format!("{}_sell", source)
    }

    pub fn spread_column(source: &SourceId) -> String {
        format!("spread_{}", source)
    }

    pub fn header(&self) -> Vec<String> {
        let mut header = Vec::with_capacity(4 + self.sources.len() * 3);
        header.push(TIMESTAMP_COLUMN.to_string());
        for source in &self.sources {
            header.push(Self::buy_column(source));
            header.push(Self::sell_column(source));
        }
        for source in &self.sources {
            header.push(Self::spread_column(source));
        }
        header.push(BEST_BUY_COLUMN.to_string());
        header.push(BEST_SELL_COLUMN.to_string());
        header.push(CHANGED_COLUMN.to_string());
        header
    }

    pub fn tracked_fields(&self) -> Vec<TrackedField> {
        self.sources.iter()
            .flat_map(|source| {
                [
                    TrackedField {
                        source: source.clone(),
                        side: RateSide::Buy,
                        column: Self::buy_column(source),
                    },
                    TrackedField {
                        source: source.clone(),
                        side: RateSide::Sell,
                        column: Self::sell_column(source),
                    },
                ]
            })
            .collect()
    }
}
