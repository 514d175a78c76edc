use std::time::Duration;
use async_trait::async_trait;
use serde_json::Value;
use crate::error::{AdapterError, Error, Result};
use crate::quotes::adapter::SourceAdapter;
use crate::quotes::RawQuote;
use crate::types::ids::SourceId;
use crate::types::rate::Rate;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Provider exposing its quote as JSON over HTTP. The buy and sell rates
/// are located with JSON pointers and may be numbers or text such as
/// `"S/ 3.7500"`.
pub struct HttpJsonAdapter {
    source_id: SourceId,
    url: String,
    buy_pointer: String,
    sell_pointer: String,
    client: reqwest::Client,
}

impl HttpJsonAdapter {
    pub fn new(
        source_id: SourceId,
        url: &str,
        buy_pointer: &str,
        sell_pointer: &str,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(|e| Error::ConfigError(format!("HTTP client for {}: {}", source_id, e)))?;

        Ok(HttpJsonAdapter {
            source_id,
            url: url.to_string(),
            buy_pointer: buy_pointer.to_string(),
            sell_pointer: sell_pointer.to_string(),
            client,
        })
    }
}

#[async_trait]
impl SourceAdapter for HttpJsonAdapter {
    fn source_id(&self) -> &SourceId {
        &self.source_id
    }

    async fn fetch(&self) -> std::result::Result<RawQuote, AdapterError> {
        tracing::info!("Requesting {} quote from {}", self.source_id, self.url);

        let response = self.client.get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AdapterError::Transport(e.to_string()))?;

        let body: Value = response.json()
            .await
            .map_err(|e| AdapterError::Decode(e.to_string()))?;

        extract_rates(&body, &self.buy_pointer, &self.sell_pointer)
    }
}

pub fn extract_rates(
    body: &Value,
    buy_pointer: &str,
    sell_pointer: &str,
) -> std::result::Result<RawQuote, AdapterError> {
    Ok(RawQuote {
        buy: rate_at(body, buy_pointer, "buy")?,
        sell: rate_at(body, sell_pointer, "sell")?,
    })
}

fn rate_at(
    body: &Value,
    pointer: &str,
    field: &'static str,
) -> std::result::Result<Option<Rate>, AdapterError> {
    match body.pointer(pointer) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64()
            .filter(|v| v.is_finite())
            .map(|v| Some(Rate::from_f64(v)))
            .ok_or_else(|| AdapterError::InvalidRate { field, raw: n.to_string() }),
        Some(Value::String(s)) => Rate::parse_text(s)
            .map(Some)
            .map_err(|_| AdapterError::InvalidRate { field, raw: s.clone() }),
        Some(other) => Err(AdapterError::Decode(format!(
            "{} at {} is not a rate: {}",
            field, pointer, other
        ))),
    }
}
