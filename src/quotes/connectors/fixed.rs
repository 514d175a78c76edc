use async_trait::async_trait;
use crate::error::AdapterError;
use crate::quotes::adapter::SourceAdapter;
use crate::quotes::RawQuote;
use crate::types::ids::SourceId;
use crate::types::rate::Rate;

/// Always quotes the same rates. Backs demo mode when no live provider is
/// reachable.
pub struct FixedAdapter {
    source_id: SourceId,
    quote: RawQuote,
}

impl FixedAdapter {
    pub fn new(source_id: SourceId, buy: Rate, sell: Rate) -> Self {
        FixedAdapter {
            source_id,
            quote: RawQuote::new(buy, sell),
        }
    }
}

#[async_trait]
impl SourceAdapter for FixedAdapter {
    fn source_id(&self) -> &SourceId {
        &self.source_id
    }

    async fn fetch(&self) -> Result<RawQuote, AdapterError> {
        Ok(self.quote)
    }
}
