use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Configuration Errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Duplicate source identifier: {0}")]
    DuplicateSource(String),

    #[error("No sources configured")]
    NoSourcesConfigured,

    // Rate Errors
    #[error("Invalid rate text: {0:?}")]
    InvalidRate(String),

    // History Log Errors
    #[error("History header mismatch: expected [{expected}], found [{found}]")]
    HistorySchemaMismatch {
        expected: String,
        found: String,
    },

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // IO Errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // Observability Errors
    #[error("Metrics error: {0}")]
    MetricsError(#[from] prometheus::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Faults raised by a single provider. These never leave the aggregator;
/// they are downgraded to a failed quote carrying the message below.
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid {field} rate: {raw:?}")]
    InvalidRate {
        field: &'static str,
        raw: String,
    },

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}
