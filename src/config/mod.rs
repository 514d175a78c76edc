use serde::{Deserialize, Serialize};
use crate::quotes::PlausibilityBand;
use crate::types::ids::SourceId;
use crate::types::rate::Rate;

pub mod loader;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SourceConfig {
    pub source_id: SourceId,
    pub display_name: Option<String>,
    pub connection: ConnectionType,
}

impl SourceConfig {
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(self.source_id.as_str())
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConnectionType {
    /// JSON endpoint; rates located with RFC 6901 pointers.
    HttpJson {
        url: String,
        buy_pointer: String,
        sell_pointer: String,
        timeout_secs: Option<u64>,
    },
    /// Constant rates. Demo mode and offline runs.
    Fixed { buy: f64, sell: f64 },
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub interval_secs: u64,
    pub run_on_start: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig {
            interval_secs: 3600,  // hourly
            run_on_start: true,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct PlausibilityConfig {
    pub min: f64,
    pub max: f64,
}

impl PlausibilityConfig {
    pub fn band(&self) -> PlausibilityBand {
        PlausibilityBand::new(Rate::from_f64(self.min), Rate::from_f64(self.max))
    }
}

impl Default for PlausibilityConfig {
    fn default() -> Self {
        PlausibilityConfig {
            min: 3.0,
            max: 5.0,
        }
    }
}
