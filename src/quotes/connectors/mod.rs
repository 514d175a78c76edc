pub mod fixed;
pub mod http_json;

use std::sync::Arc;
use std::time::Duration;
use crate::config::{ConnectionType, SourceConfig};
use crate::error::Result;
use crate::quotes::adapter::SourceAdapter;
use crate::types::rate::Rate;

pub fn build_adapter(config: &SourceConfig) -> Result<Arc<dyn SourceAdapter>> {
    let source_id = config.source_id.clone();

    let adapter: Arc<dyn SourceAdapter> = match &config.connection {
        ConnectionType::HttpJson { url, buy_pointer, sell_pointer, timeout_secs } => {
            Arc::new(http_json::HttpJsonAdapter::new(
                source_id,
                url,
                buy_pointer,
                sell_pointer,
                timeout_secs.map(Duration::from_secs),
            )?)
        }
        ConnectionType::Fixed { buy, sell } => Arc::new(fixed::FixedAdapter::new(
            source_id,
            Rate::from_f64(*buy),
            Rate::from_f64(*sell),
        )),
    };

    tracing::info!("Configured source {} ({})", config.source_id, config.display_name());
    Ok(adapter)
}
