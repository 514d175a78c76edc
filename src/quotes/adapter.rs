use async_trait::async_trait;
use crate::error::AdapterError;
use crate::quotes::RawQuote;
use crate::types::ids::SourceId;

/// One exchange-rate provider.
///
/// `fetch` is called exactly once per pipeline run. Implementations own
/// their transport and timeout discipline; any fault they return (or any
/// panic) is recorded as a failed quote by the aggregator.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn source_id(&self) -> &SourceId;
    async fn fetch(&self) -> Result<RawQuote, AdapterError>;
}
