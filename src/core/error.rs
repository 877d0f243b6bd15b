//! Error types for the OTM flow pipeline

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OtmError {
    #[error("Invalid ticker: {0}")]
    InvalidTicker(String),

    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Chain fetch failed for {expiry}: {reason}")]
    ChainFetch { expiry: NaiveDate, reason: String },

    #[error("Malformed row: {0}")]
    MalformedRow(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
}

pub type OtmResult<T> = Result<T, OtmError>;

impl OtmError {
    pub fn invalid_ticker(msg: impl Into<String>) -> Self {
        Self::InvalidTicker(msg.into())
    }

    pub fn data_unavailable(msg: impl Into<String>) -> Self {
        Self::DataUnavailable(msg.into())
    }

    pub fn malformed_row(msg: impl Into<String>) -> Self {
        Self::MalformedRow(msg.into())
    }

    /// Wrap any failure that happened while fetching one expiration's chain.
    pub fn chain_fetch(expiry: NaiveDate, cause: &OtmError) -> Self {
        Self::ChainFetch {
            expiry,
            reason: cause.to_string(),
        }
    }
}
