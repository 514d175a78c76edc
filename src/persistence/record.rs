use std::collections::HashMap;
use crate::error::Result;
use crate::persistence::schema::HistorySchema;
use crate::snapshot::Snapshot;
use crate::types::ids::SourceId;
use crate::types::rate::Rate;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceRates {
    pub source: SourceId,
    pub buy: Option<Rate>,
    pub sell: Option<Rate>,
    pub spread: Option<Rate>,
}

/// Flattened, persisted projection of a snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoricalRecord {
    pub timestamp: String,
    /// Schema order.
    pub rates: Vec<SourceRates>,
    pub best_buy: Option<SourceId>,
    pub best_sell: Option<SourceId>,
    pub changed: bool,
}

impl HistoricalRecord {
    pub fn from_snapshot(snapshot: &Snapshot, schema: &HistorySchema) -> Self {
        let rates = schema.sources().iter()
            .map(|source| {
                let quote = snapshot.quote(source);
                SourceRates {
                    source: source.clone(),
                    buy: quote.and_then(|q| q.buy_rate()),
                    sell: quote.and_then(|q| q.sell_rate()),
                    spread: snapshot.spread(source),
                }
            })
            .collect();

        HistoricalRecord {
            timestamp: snapshot.timestamp.to_string(),
            rates,
            best_buy: snapshot.best_buy_source.clone(),
            best_sell: snapshot.best_sell_source.clone(),
            changed: snapshot.changed,
        }
    }

    /// Fields in header order; absent values are empty strings.
    pub fn to_fields(&self) -> Vec<String> {
        fn text<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(ToString::to_string).unwrap_or_default()
        }

        let mut fields = Vec::with_capacity(4 + self.rates.len() * 3);
        fields.push(self.timestamp.clone());
        for rates in &self.rates {
            fields.push(text(&rates.buy));
            fields.push(text(&rates.sell));
        }
        for rates in &self.rates {
            fields.push(text(&rates.spread));
        }
        fields.push(text(&self.best_buy));
        fields.push(text(&self.best_sell));
        fields.push(self.changed.to_string());
        fields
    }
}

/// One history row read back as column name to raw text. Columns missing
/// from the file (older layout) or left empty read as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistoricalRow(HashMap<String, String>);

impl HistoricalRow {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        HistoricalRow(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn rate(&self, column: &str) -> Result<Option<Rate>> {
        self.get(column).map(Rate::parse_text).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotes::Quote;
    use crate::types::timestamp::Timestamp;

    #[test]
    fn failed_sources_flatten_to_empty_fields() {
        let schema = HistorySchema::new(vec![SourceId::from("bcrp"), SourceId::from("rextie")]);
        let mut snapshot = Snapshot::new(
            Timestamp::now(),
            vec![
                Quote::success(SourceId::from("bcrp"), Rate::from_f64(3.732), Rate::from_f64(3.735)),
                Quote::failed(SourceId::from("rextie"), "blocked"),
            ],
        );
        snapshot.spreads.insert(SourceId::from("bcrp"), Rate::from_f64(0.003));
        snapshot.best_buy_source = Some(SourceId::from("bcrp"));
        snapshot.best_sell_source = Some(SourceId::from("bcrp"));
        snapshot.changed = true;

        let fields = HistoricalRecord::from_snapshot(&snapshot, &schema).to_fields();

        assert_eq!(fields.len(), schema.header().len());
        assert_eq!(
            &fields[1..],
            &["3.7320", "3.7350", "", "", "0.0030", "", "bcrp", "bcrp", "true"]
        );
    }

    #[test]
    fn row_treats_blank_and_missing_as_absent() {
        let row = HistoricalRow::from_pairs([("bcrp_buy", "3.7320"), ("bcrp_sell", " ")]);

        assert_eq!(row.rate("bcrp_buy").unwrap(), Some(Rate::from_f64(3.732)));
        assert_eq!(row.rate("bcrp_sell").unwrap(), None);
        assert_eq!(row.rate("rextie_buy").unwrap(), None);
    }

    #[test]
    fn row_reports_garbage() {
        let row = HistoricalRow::from_pairs([("bcrp_buy", "N/A")]);
        assert!(row.rate("bcrp_buy").is_err());
    }
}
