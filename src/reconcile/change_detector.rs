use crate::persistence::record::HistoricalRow;
use crate::persistence::schema::{HistorySchema, TrackedField};
use crate::snapshot::Snapshot;
use crate::types::rate::Rate;

/// Decides whether a snapshot differs from the last persisted row on any
/// tracked rate column (buy and sell of every configured source).
pub struct ChangeDetector {
    tracked: Vec<TrackedField>,
}

impl ChangeDetector {
    pub fn new(schema: &HistorySchema) -> Self {
        ChangeDetector {
            tracked: schema.tracked_fields(),
        }
    }

    /// No baseline always counts as a change. Absent on both sides is equal;
    /// absent on one side only is a change; rates are compared exactly.
    pub fn has_changed(&self, snapshot: &Snapshot, previous: Option<&HistoricalRow>) -> bool {
        let Some(previous) = previous else {
            tracing::info!("No previous record; treating snapshot as changed");
            return true;
        };

        for field in &self.tracked {
            let current = snapshot.quote(&field.source).and_then(|q| field.side.rate_of(q));
            let before = Self::previous_rate(previous, field);

            if current != before {
                tracing::info!(
                    "Change detected in {}: {} -> {}",
                    field.column,
                    fmt_rate(before),
                    fmt_rate(current)
                );
                return true;
            }
        }

        tracing::debug!("No change in {} tracked fields", self.tracked.len());
        false
    }

    fn previous_rate(previous: &HistoricalRow, field: &TrackedField) -> Option<Rate> {
        match previous.rate(&field.column) {
            Ok(rate) => rate,
            Err(e) => {
                tracing::warn!("Unreadable {} in previous record, treating as absent: {}", field.column, e);
                None
            }
        }
    }
}

fn fmt_rate(rate: Option<Rate>) -> String {
    rate.map(|r| r.to_string()).unwrap_or_else(|| "none".to_string())
}
