use crate::quotes::Quote;
use crate::snapshot::Snapshot;
use crate::types::rate::Rate;

pub struct SpreadCalculator;

impl SpreadCalculator {
    /// `sell - buy` for a successful quote. A negative spread is kept as-is
    /// and only logged: provider data is trusted.
    pub fn spread(quote: &Quote) -> Option<Rate> {
        let spread = quote.sell_rate()? - quote.buy_rate()?;

        if spread.is_negative() {
            tracing::warn!("Negative spread detected for {}: {}", quote.source, spread);
        }

        Some(spread)
    }

    pub fn apply(snapshot: &mut Snapshot) {
        snapshot.spreads = snapshot.successful_quotes()
            .filter_map(|q| Self::spread(q).map(|s| (q.source.clone(), s)))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ids::SourceId;
    use crate::types::timestamp::Timestamp;

    #[test]
    fn spread_is_sell_minus_buy() {
        let quote = Quote::success(SourceId::from("bcrp"), Rate::from_f64(3.7320), Rate::from_f64(3.7350));
        let spread = SpreadCalculator::spread(&quote).unwrap();

        assert_eq!(spread, Rate::from_f64(0.003));
        assert_eq!(spread.to_string(), "0.0030");
    }

    #[test]
    fn negative_spread_is_retained() {
        let quote = Quote::success(SourceId::from("rextie"), Rate::from_f64(3.76), Rate::from_f64(3.75));
        assert_eq!(SpreadCalculator::spread(&quote), Some(Rate::from_f64(-0.01)));
    }

    #[test]
    fn failed_quote_has_no_spread() {
        let mut snapshot = Snapshot::new(
            Timestamp::now(),
            vec![
                Quote::success(SourceId::from("bcrp"), Rate::from_f64(3.71), Rate::from_f64(3.75)),
                Quote::failed(SourceId::from("kambista"), "timeout"),
            ],
        );

        SpreadCalculator::apply(&mut snapshot);

        assert_eq!(snapshot.spread(&SourceId::from("bcrp")), Some(Rate::from_f64(0.04)));
        assert_eq!(snapshot.spread(&SourceId::from("kambista")), None);
        assert_eq!(snapshot.spreads.len(), 1);
    }
}
