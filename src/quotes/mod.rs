pub mod adapter;
pub mod aggregator;
pub mod connectors;

use serde::{Deserialize, Serialize};
use crate::types::ids::SourceId;
use crate::types::rate::Rate;

/// Rates exactly as an adapter read them, before plausibility checks.
/// Either side may be missing when the provider page or payload was partial.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawQuote {
    pub buy: Option<Rate>,
    pub sell: Option<Rate>,
}

impl RawQuote {
    pub fn new(buy: Rate, sell: Rate) -> Self {
        RawQuote {
            buy: Some(buy),
            sell: Some(sell),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuoteOutcome {
    Success { buy: Rate, sell: Rate },
    Failed { reason: String },
}

/// Normalized result of one provider query for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Quote {
    pub source: SourceId,
    pub outcome: QuoteOutcome,
}

impl Quote {
    pub fn success(source: SourceId, buy: Rate, sell: Rate) -> Self {
        Quote {
            source,
            outcome: QuoteOutcome::Success { buy, sell },
        }
    }

    pub fn failed(source: SourceId, reason: impl Into<String>) -> Self {
        Quote {
            source,
            outcome: QuoteOutcome::Failed { reason: reason.into() },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, QuoteOutcome::Success { .. })
    }

    pub fn buy_rate(&self) -> Option<Rate> {
        match self.outcome {
            QuoteOutcome::Success { buy, .. } => Some(buy),
            QuoteOutcome::Failed { .. } => None,
        }
    }

    pub fn sell_rate(&self) -> Option<Rate> {
        match self.outcome {
            QuoteOutcome::Success { sell, .. } => Some(sell),
            QuoteOutcome::Failed { .. } => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match &self.outcome {
            QuoteOutcome::Success { .. } => None,
            QuoteOutcome::Failed { reason } => Some(reason.as_str()),
        }
    }
}

/// Range a USD/PEN rate must fall in to be believed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlausibilityBand {
    pub min: Rate,
    pub max: Rate,
}

impl PlausibilityBand {
    pub fn new(min: Rate, max: Rate) -> Self {
        PlausibilityBand { min, max }
    }

    pub fn contains(&self, rate: Rate) -> bool {
        rate.is_positive() && self.min <= rate && rate <= self.max
    }

    /// Turn an adapter reading into a quote. Missing or implausible rates
    /// yield a failed quote; the sell/buy ordering is not checked here.
    pub fn validate(&self, source: SourceId, raw: RawQuote) -> Quote {
        let (buy, sell) = match (raw.buy, raw.sell) {
            (Some(buy), Some(sell)) => (buy, sell),
            (None, None) => return Quote::failed(source, "no rates returned"),
            (None, Some(_)) => return Quote::failed(source, "incomplete data: buy rate missing"),
            (Some(_), None) => return Quote::failed(source, "incomplete data: sell rate missing"),
        };

        for (field, rate) in [("buy", buy), ("sell", sell)] {
            if !self.contains(rate) {
                tracing::warn!(
                    "{} {} rate out of range: {} (expected {}-{})",
                    source, field, rate, self.min, self.max
                );
                return Quote::failed(
                    source,
                    format!("{} rate {} outside plausible range {}-{}", field, rate, self.min, self.max),
                );
            }
        }

        Quote::success(source, buy, sell)
    }
}

impl Default for PlausibilityBand {
    fn default() -> Self {
        PlausibilityBand {
            min: Rate::from_ten_thousandths(30_000),  // 3.0000
            max: Rate::from_ten_thousandths(50_000),  // 5.0000
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(v: f64) -> Rate {
        Rate::from_f64(v)
    }

    #[test]
    fn complete_plausible_reading_succeeds() {
        let quote = PlausibilityBand::default()
            .validate(SourceId::from("bcrp"), RawQuote::new(rate(3.732), rate(3.735)));

        assert!(quote.is_success());
        assert_eq!(quote.buy_rate(), Some(rate(3.732)));
        assert_eq!(quote.sell_rate(), Some(rate(3.735)));
        assert_eq!(quote.failure_reason(), None);
    }

    #[test]
    fn partial_reading_fails_without_rates() {
        let raw = RawQuote { buy: Some(rate(3.71)), sell: None };
        let quote = PlausibilityBand::default().validate(SourceId::from("rextie"), raw);

        assert!(!quote.is_success());
        assert_eq!(quote.buy_rate(), None);
        assert_eq!(quote.failure_reason(), Some("incomplete data: sell rate missing"));
    }

    #[test]
    fn out_of_band_rate_fails() {
        let quote = PlausibilityBand::default()
            .validate(SourceId::from("kambista"), RawQuote::new(rate(3.71), rate(10.5)));

        assert!(!quote.is_success());
        assert!(quote.failure_reason().unwrap().contains("sell rate 10.5000"));
    }

    #[test]
    fn inverted_rates_are_still_accepted() {
        let quote = PlausibilityBand::default()
            .validate(SourceId::from("bcrp"), RawQuote::new(rate(3.76), rate(3.75)));

        assert!(quote.is_success());
    }

    #[test]
    fn non_positive_rates_never_plausible() {
        let band = PlausibilityBand::new(Rate::zero(), rate(5.0));
        assert!(!band.contains(Rate::zero()));
        assert!(band.contains(rate(0.0001)));
    }
}
