pub mod types;
pub mod quotes;
pub mod snapshot;
pub mod reconcile;
pub mod persistence;
pub mod pipeline;
pub mod error;
pub mod config;
pub mod observability;

// Fixed currency pair
pub const BASE_CURRENCY: &str = "USD";
pub const QUOTE_CURRENCY: &str = "PEN";
