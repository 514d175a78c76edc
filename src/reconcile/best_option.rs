use crate::quotes::Quote;
use crate::snapshot::Snapshot;
use crate::types::ids::SourceId;
use crate::types::rate::Rate;

/// Recommendations for one run. Both sides are `None` when no provider
/// succeeded; that is a valid outcome, not an error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BestOptions {
    /// Where to buy dollars: lowest sell rate.
    pub best_buy: Option<SourceId>,
    /// Where to sell dollars: highest buy rate.
    pub best_sell: Option<SourceId>,
    /// Soles saved per $1,000 bought at `best_buy` instead of the highest
    /// sell rate. Only set when at least two sources quoted.
    pub buy_advantage: Option<Rate>,
    /// Extra soles per $1,000 sold at `best_sell` instead of the lowest buy
    /// rate. Only set when at least two sources quoted.
    pub sell_advantage: Option<Rate>,
}

pub struct BestOptionResolver;

impl BestOptionResolver {
    /// `quotes` must be in configured order. Ties keep the earlier source.
    pub fn resolve(quotes: &[Quote]) -> BestOptions {
        let best_buy = Self::pick(quotes, Quote::sell_rate, |candidate, best| candidate < best);
        let best_sell = Self::pick(quotes, Quote::buy_rate, |candidate, best| candidate > best);

        let sells: Vec<Rate> = quotes.iter().filter_map(Quote::sell_rate).collect();
        let buys: Vec<Rate> = quotes.iter().filter_map(Quote::buy_rate).collect();

        let buy_advantage = match (&best_buy, sells.iter().max()) {
            (Some((_, best)), Some(&worst)) if sells.len() > 1 => {
                Some((worst - *best).per_thousand_dollars())
            }
            _ => None,
        };
        let sell_advantage = match (&best_sell, buys.iter().min()) {
            (Some((_, best)), Some(&worst)) if buys.len() > 1 => {
                Some((*best - worst).per_thousand_dollars())
            }
            _ => None,
        };

        BestOptions {
            best_buy: best_buy.map(|(source, _)| source),
            best_sell: best_sell.map(|(source, _)| source),
            buy_advantage,
            sell_advantage,
        }
    }

    pub fn apply(snapshot: &mut Snapshot) {
        let best = Self::resolve(&snapshot.quotes);

        match (&best.best_buy, &best.best_sell) {
            (Some(buy), Some(sell)) => {
                tracing::info!("Best to buy USD: {}, best to sell USD: {}", buy, sell);
            }
            _ => tracing::warn!("No successful quotes; no recommendation for this run"),
        }

        snapshot.best_buy_source = best.best_buy;
        snapshot.best_sell_source = best.best_sell;
        snapshot.buy_advantage = best.buy_advantage;
        snapshot.sell_advantage = best.sell_advantage;
    }

    fn pick(
        quotes: &[Quote],
        rate_of: fn(&Quote) -> Option<Rate>,
        is_better: fn(Rate, Rate) -> bool,
    ) -> Option<(SourceId, Rate)> {
        let mut best: Option<(&Quote, Rate)> = None;

        for quote in quotes.iter().filter(|q| q.is_success()) {
            let Some(rate) = rate_of(quote) else { continue };
            match best {
                Some((_, best_rate)) if !is_better(rate, best_rate) => {}
                _ => best = Some((quote, rate)),
            }
        }

        best.map(|(quote, rate)| (quote.source.clone(), rate))
    }
}
