//! Market data source trait and an in-memory implementation

use std::cell::Cell;
use std::collections::HashMap;

use chrono::NaiveDate;

use crate::core::{OptionChain, OtmError, OtmResult};

/// Provider of expirations, spot prices and option chains for a ticker.
///
/// Every call is a blocking request; callers issue them strictly in sequence.
pub trait MarketData {
    /// Available expirations in chronological order
    fn list_expirations(&self, ticker: &str) -> OtmResult<Vec<NaiveDate>>;

    /// Current price of the underlying
    fn spot_price(&self, ticker: &str) -> OtmResult<f64>;

    /// Full call and put sets for one expiration
    fn option_chain(&self, ticker: &str, expiry: NaiveDate) -> OtmResult<OptionChain>;

    /// Name of this source, for logs
    fn name(&self) -> &'static str;
}

/// In-memory market data for one ticker, used by tests and offline demos.
#[derive(Debug, Default)]
pub struct InMemoryMarketData {
    ticker: String,
    expirations: Vec<NaiveDate>,
    spot: Option<f64>,
    chains: HashMap<NaiveDate, OptionChain>,
    failures: HashMap<NaiveDate, String>,
    chain_requests: Cell<usize>,
}

impl InMemoryMarketData {
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            ..Default::default()
        }
    }

    pub fn with_spot(mut self, spot: f64) -> Self {
        self.spot = Some(spot);
        self
    }

    /// Register a chain; its expiry is appended to the expiration list.
    pub fn with_chain(mut self, chain: OptionChain) -> Self {
        if !self.expirations.contains(&chain.expiry) {
            self.expirations.push(chain.expiry);
        }
        self.chains.insert(chain.expiry, chain);
        self
    }

    /// List an expiration whose chain fetch will fail with `reason`.
    pub fn with_failing_chain(mut self, expiry: NaiveDate, reason: impl Into<String>) -> Self {
        if !self.expirations.contains(&expiry) {
            self.expirations.push(expiry);
        }
        self.failures.insert(expiry, reason.into());
        self
    }

    /// Number of `option_chain` calls served so far, failures included
    pub fn chain_requests(&self) -> usize {
        self.chain_requests.get()
    }

    fn check_ticker(&self, ticker: &str) -> OtmResult<()> {
        if ticker == self.ticker {
            Ok(())
        } else {
            Err(OtmError::invalid_ticker(format!("unknown symbol {}", ticker)))
        }
    }
}

impl MarketData for InMemoryMarketData {
    fn list_expirations(&self, ticker: &str) -> OtmResult<Vec<NaiveDate>> {
        self.check_ticker(ticker)?;
        Ok(self.expirations.clone())
    }

    fn spot_price(&self, ticker: &str) -> OtmResult<f64> {
        self.check_ticker(ticker)?;
        self.spot
            .ok_or_else(|| OtmError::data_unavailable(format!("no recent price for {}", ticker)))
    }

    fn option_chain(&self, ticker: &str, expiry: NaiveDate) -> OtmResult<OptionChain> {
        self.chain_requests.set(self.chain_requests.get() + 1);
        self.check_ticker(ticker)?;

        if let Some(reason) = self.failures.get(&expiry) {
            return Err(OtmError::Network(reason.clone()));
        }

        self.chains
            .get(&expiry)
            .cloned()
            .ok_or_else(|| OtmError::data_unavailable(format!("no chain for {} {}", ticker, expiry)))
    }

    fn name(&self) -> &'static str {
        "InMemory"
    }
}
